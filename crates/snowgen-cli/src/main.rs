//! Prints Snowflake IDs from one generator slot.
//!
//! ```bash
//! snowgen --worker-id 3 --datacenter-id 1 -n 5 --format both
//! WORKER_ID=3 ID_FORMAT=components snowgen
//! ```

mod config;
mod generate;
mod output;
mod telemetry;

use anyhow::Context;
use clap::Parser;
use config::{CliArgs, ClockKind, Config};
use generate::{RewindPolicy, next_id_with_retry};
use output::write_id;
use snowgen::{MonotonicClock, SnowflakeGenerator, SystemClock, TimeSource};
use std::io::{self, BufWriter, Write};
use std::time::{Duration, Instant};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = Config::try_from(args)?;

    init_telemetry()?;
    log_startup_info(&config);

    match config.clock {
        ClockKind::System => run(&config, SystemClock),
        ClockKind::Monotonic => run(&config, MonotonicClock::new()),
    }
}

fn run<T: TimeSource>(config: &Config, time: T) -> anyhow::Result<()> {
    let generator = SnowflakeGenerator::with_time_and_epoch(
        config.worker_id,
        config.datacenter_id,
        time,
        Duration::from_millis(config.epoch_ms),
    )?;
    let policy = RewindPolicy {
        retries: config.rewind_retries,
        max_wait: Duration::from_millis(config.max_rewind_ms),
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let start = Instant::now();

    for _ in 0..config.count {
        let id = next_id_with_retry(&generator, policy)?;
        write_id(&mut out, id, config.format).context("failed to write id")?;
    }
    out.flush().context("failed to flush output")?;

    tracing::info!(
        count = config.count,
        elapsed_us = start.elapsed().as_micros() as u64,
        "generated ids"
    );
    Ok(())
}

fn log_startup_info(config: &Config) {
    if cfg!(debug_assertions) {
        tracing::debug!("starting with full config: {:#?}", config);
    } else {
        tracing::debug!(
            worker_id = config.worker_id,
            datacenter_id = config.datacenter_id,
            count = config.count,
            "starting"
        );
    }
}
