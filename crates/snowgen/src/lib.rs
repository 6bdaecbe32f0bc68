//! # snowgen
//!
//! A thread-safe generator of 64-bit Snowflake IDs.
//!
//! ```text
//!  | reserved (1) | timestamp (41) | datacenter ID (5) | worker ID (5) | sequence (12) |
//! ```
//!
//! Each [`SnowflakeGenerator`] owns one `(datacenter_id, worker_id)` slot and
//! issues up to 4096 IDs per millisecond. Callers are responsible for giving
//! concurrently running generators distinct slots; no coordination happens
//! between instances.
//!
//! ```
//! use snowgen::SnowflakeGenerator;
//!
//! let generator = SnowflakeGenerator::new(0, 0)?;
//! let id = generator.next_id()?;
//! println!("{id} {id:064b}");
//! # Ok::<(), snowgen::Error>(())
//! ```
//!
//! A clock that moves backwards is reported as [`Error::ClockRewound`] and
//! never silently produces a smaller or duplicate ID; what to do about it is
//! left to the caller. [`MonotonicClock`] avoids the condition entirely for
//! the life of the process.
//!
//! ## Features
//!
//! - `parking-lot`: use `parking_lot::Mutex` (no lock poisoning)
//! - `tracing`: emit spans and events from the generator
//! - `serde`: (de)serialize [`SnowflakeId`] as its native integer
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod generator;
mod id;
mod status;
mod time;

pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::status::*;
pub use crate::time::*;
