//! Log output for the `snowgen` binary.
//!
//! IDs are the program's output and go to stdout, so all logging is written
//! to stderr. Verbosity follows `RUST_LOG` and defaults to `info`; set
//! `RUST_LOG=snowgen=trace` to see a span per generated ID.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_file(true),
        )
        .try_init()?;

    Ok(())
}
