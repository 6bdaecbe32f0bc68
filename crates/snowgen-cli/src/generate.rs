use anyhow::Context;
use snowgen::{Error, SnowflakeGenerator, SnowflakeId, TimeSource};
use std::{thread, time::Duration};

/// How the CLI reacts to a backwards clock jump.
#[derive(Clone, Copy, Debug)]
pub struct RewindPolicy {
    /// Rewinds waited out per ID before giving up.
    pub retries: u32,
    /// Largest gap that is slept off; anything longer fails immediately.
    pub max_wait: Duration,
}

/// Issues the next ID, waiting out up to `policy.retries` backwards clock
/// jumps of at most `policy.max_wait` each.
///
/// A rewind is slept off for exactly the reported gap before the next
/// attempt; every other error is returned immediately.
pub fn next_id_with_retry<T: TimeSource>(
    generator: &SnowflakeGenerator<T>,
    policy: RewindPolicy,
) -> anyhow::Result<SnowflakeId> {
    let mut attempt = 0;
    loop {
        match generator.next_id() {
            Ok(id) => return Ok(id),
            Err(Error::ClockRewound { now, last })
                if attempt < policy.retries
                    && Duration::from_millis(last - now) <= policy.max_wait =>
            {
                attempt += 1;
                let behind_ms = last - now;
                tracing::warn!(
                    attempt,
                    retries = policy.retries,
                    behind_ms,
                    "clock rewound, waiting it out"
                );
                thread::sleep(Duration::from_millis(behind_ms));
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!(
                        "failed to generate id (worker {}, datacenter {}) after {attempt} retries",
                        generator.worker_id(),
                        generator.datacenter_id()
                    )
                });
            }
        }
    }
}
