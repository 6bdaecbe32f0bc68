use crate::config::OutputFormat;
use snowgen::SnowflakeId;
use std::io::{self, Write};

/// Writes one ID as a single line in the requested format.
pub fn write_id<W: Write>(out: &mut W, id: SnowflakeId, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Decimal => writeln!(out, "{id}"),
        OutputFormat::Binary => writeln!(out, "{id:064b}"),
        OutputFormat::Both => writeln!(out, "{id} {id:064b}"),
        OutputFormat::Components => writeln!(
            out,
            "{id} ts={} dc={} worker={} seq={}",
            id.timestamp(),
            id.datacenter_id(),
            id.worker_id(),
            id.sequence()
        ),
    }
}
