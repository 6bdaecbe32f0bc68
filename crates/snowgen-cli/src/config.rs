use anyhow::bail;
use clap::{Parser, ValueEnum};
use snowgen::{DEFAULT_EPOCH, SnowflakeId, SystemClock, TimeSource};

/// Runtime configuration for the `snowgen` binary.
///
/// Every setting can be given as a flag or through the environment (a `.env`
/// file in the working directory is loaded first).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "snowgen",
    version,
    about = "Print Snowflake IDs from a single generator slot"
)]
pub struct CliArgs {
    /// Worker ID encoded into every ID (0-31).
    ///
    /// Each process sharing a datacenter ID needs its own worker ID.
    ///
    /// Environment variable: `WORKER_ID`
    #[arg(long, env = "WORKER_ID", default_value_t = 0)]
    pub worker_id: u64,

    /// Datacenter ID encoded into every ID (0-31).
    ///
    /// Environment variable: `DATACENTER_ID`
    #[arg(long, env = "DATACENTER_ID", default_value_t = 0)]
    pub datacenter_id: u64,

    /// Number of IDs to print.
    ///
    /// Environment variable: `ID_COUNT`
    #[arg(short = 'n', long, env = "ID_COUNT", default_value_t = 10)]
    pub count: usize,

    /// How each ID is printed.
    ///
    /// Environment variable: `ID_FORMAT`
    #[arg(long, env = "ID_FORMAT", value_enum, default_value_t = OutputFormat::Decimal)]
    pub format: OutputFormat,

    /// Time source backing the generator.
    ///
    /// `system` reads the wall clock on every call and reports clock rewinds;
    /// `monotonic` anchors to the wall clock once and never goes backwards.
    ///
    /// Environment variable: `ID_CLOCK`
    #[arg(long, env = "ID_CLOCK", value_enum, default_value_t = ClockKind::System)]
    pub clock: ClockKind,

    /// Epoch in Unix milliseconds. All generators sharing an ID space must
    /// agree on it.
    ///
    /// Environment variable: `ID_EPOCH_MS`
    #[arg(long, env = "ID_EPOCH_MS", default_value_t = DEFAULT_EPOCH.as_millis() as u64)]
    pub epoch_ms: u64,

    /// How many times to wait out a backwards clock jump before giving up.
    ///
    /// Environment variable: `REWIND_RETRIES`
    #[arg(long, env = "REWIND_RETRIES", default_value_t = 3)]
    pub rewind_retries: u32,

    /// Longest backwards clock jump, in milliseconds, that is waited out.
    /// A larger jump fails immediately.
    ///
    /// Environment variable: `MAX_REWIND_MS`
    #[arg(long, env = "MAX_REWIND_MS", default_value_t = 1000)]
    pub max_rewind_ms: u64,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// The ID as a decimal integer.
    Decimal,
    /// The ID as 64 binary digits.
    Binary,
    /// Decimal and binary, space separated.
    Both,
    /// Decimal followed by the decoded fields.
    Components,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockKind {
    System,
    Monotonic,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub worker_id: u64,
    pub datacenter_id: u64,
    pub count: usize,
    pub format: OutputFormat,
    pub clock: ClockKind,
    pub epoch_ms: u64,
    pub rewind_retries: u32,
    pub max_rewind_ms: u64,
}

impl TryFrom<CliArgs> for Config {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.worker_id > SnowflakeId::max_worker_id() {
            bail!(
                "WORKER_ID ({}) exceeds the worker ID space (max = {})",
                args.worker_id,
                SnowflakeId::max_worker_id()
            );
        }

        if args.datacenter_id > SnowflakeId::max_datacenter_id() {
            bail!(
                "DATACENTER_ID ({}) exceeds the datacenter ID space (max = {})",
                args.datacenter_id,
                SnowflakeId::max_datacenter_id()
            );
        }

        if args.count == 0 {
            bail!("ID_COUNT must be greater than 0");
        }

        let now = SystemClock.current_millis();
        if args.epoch_ms > now {
            bail!(
                "ID_EPOCH_MS ({}) is in the future (now = {})",
                args.epoch_ms,
                now
            );
        }

        Ok(Self {
            worker_id: args.worker_id,
            datacenter_id: args.datacenter_id,
            count: args.count,
            format: args.format,
            clock: args.clock,
            epoch_ms: args.epoch_ms,
            rewind_retries: args.rewind_retries,
            max_rewind_ms: args.max_rewind_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Config> {
        let args = CliArgs::try_parse_from(std::iter::once("snowgen").chain(args.iter().copied()))?;
        Config::try_from(args)
    }

    #[test]
    fn defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.worker_id, 0);
        assert_eq!(config.datacenter_id, 0);
        assert_eq!(config.count, 10);
        assert_eq!(config.format, OutputFormat::Decimal);
        assert_eq!(config.clock, ClockKind::System);
        assert_eq!(config.epoch_ms, 1_602_388_800_000);
        assert_eq!(config.rewind_retries, 3);
        assert_eq!(config.max_rewind_ms, 1000);
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "--worker-id",
            "31",
            "--datacenter-id",
            "7",
            "-n",
            "10001",
            "--format",
            "components",
            "--clock",
            "monotonic",
            "--max-rewind-ms",
            "50",
        ])
        .unwrap();
        assert_eq!(config.worker_id, 31);
        assert_eq!(config.datacenter_id, 7);
        assert_eq!(config.count, 10001);
        assert_eq!(config.format, OutputFormat::Components);
        assert_eq!(config.clock, ClockKind::Monotonic);
        assert_eq!(config.max_rewind_ms, 50);
    }

    #[test]
    fn rejects_out_of_range_slot() {
        let err = parse(&["--worker-id", "32"]).unwrap_err();
        assert!(err.to_string().contains("WORKER_ID (32)"));

        let err = parse(&["--datacenter-id", "32"]).unwrap_err();
        assert!(err.to_string().contains("DATACENTER_ID (32)"));
    }

    #[test]
    fn rejects_zero_count_and_future_epoch() {
        assert!(parse(&["--count", "0"]).is_err());

        let future = (SystemClock.current_millis() + 60_000).to_string();
        let err = parse(&["--epoch-ms", &future]).unwrap_err();
        assert!(err.to_string().contains("in the future"));
    }

    #[test]
    fn rejects_unknown_format() {
        assert!(parse(&["--format", "hex"]).is_err());
    }
}
