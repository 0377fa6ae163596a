//! # Pipeline
//!
//! Wires the stages together for one run:
//!
//! ```text
//! log file ──► decoder thread ══bounded══► fold_addresses ──► Symbolizer ──► report
//!                               channel    (or forward_raw)    (writer ∥ reader)
//! ```
//!
//! Each stage runs to completion before handing its result to the next, so
//! the address map and the statistics only ever have one writer.

use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{BufWriter, Read, Write};

use crate::analysis::ProfileStats;
use crate::config::{OutputMode, ProfileConfig};
use crate::domain::DecodeError;
use crate::export::JsonReportExporter;
use crate::profiling::{fold_addresses, forward_raw, spawn_decoder, AddressCounts};
use crate::report::write_text_report;
use crate::symbolization::Symbolizer;

/// Decode `reader` on a background thread and count samples per address
///
/// # Errors
/// Returns an error if the decoder thread cannot start, reading fails, or
/// the decoder dies before finishing
pub fn collect_address_counts<R>(reader: R) -> Result<AddressCounts, DecodeError>
where
    R: Read + Send + 'static,
{
    let stream = spawn_decoder(reader).map_err(DecodeError::Spawn)?;
    let folded = fold_addresses(&stream.events);
    let clean_exit = stream.join();

    let (counts, summary) = match folded {
        Err(DecodeError::Disconnected) if !clean_exit => return Err(DecodeError::DecoderPanicked),
        other => other?,
    };

    info!(
        "Decoded {} samples at {} distinct addresses",
        summary.accepted,
        counts.len()
    );
    Ok(counts)
}

/// Decode `reader` and print every sample address to `out`
///
/// # Errors
/// Returns an error if decoding or writing fails
pub fn dump_raw<R, W>(reader: R, out: &mut W) -> Result<u64, DecodeError>
where
    R: Read + Send + 'static,
    W: Write,
{
    let stream = spawn_decoder(reader).map_err(DecodeError::Spawn)?;
    let written = forward_raw(&stream.events, out);
    let clean_exit = stream.join();

    match written {
        Err(DecodeError::Disconnected) if !clean_exit => Err(DecodeError::DecoderPanicked),
        other => other,
    }
}

/// Decode, aggregate and symbolize a whole profile log
///
/// # Errors
/// Returns an error if decoding or symbol resolution fails
pub fn build_profile<R>(reader: R, symbolizer: &Symbolizer) -> Result<ProfileStats>
where
    R: Read + Send + 'static,
{
    let counts = collect_address_counts(reader).context("Failed to decode profile log")?;
    let stats = symbolizer.resolve_all(&counts).context("Failed to resolve sample addresses")?;
    Ok(stats)
}

/// Run the configured pipeline, writing the report to `out`
///
/// # Errors
/// Returns an error if any stage fails; nothing is written for a failed
/// report run
pub fn run<W: Write>(config: &ProfileConfig, out: &mut W) -> Result<()> {
    let log = File::open(&config.log_path).with_context(|| {
        format!("Failed to open profile log file '{}'", config.log_path.display())
    })?;

    match &config.mode {
        OutputMode::Raw => {
            let samples = dump_raw(log, out).context("Failed to decode profile log")?;
            info!("Printed {samples} raw samples");
        }
        OutputMode::Report { symbolizer, top_n, export, .. } => {
            let stats = build_profile(log, &Symbolizer::new(symbolizer.clone()))?;

            write_text_report(out, &stats, *top_n).context("Failed to write report")?;

            if let Some(export_path) = export {
                let file = File::create(export_path).with_context(|| {
                    format!("Failed to create report file '{}'", export_path.display())
                })?;
                JsonReportExporter::new(*top_n)
                    .export(&stats, BufWriter::new(file))
                    .context("Failed to export report")?;
                info!("Saved JSON report to {}", export_path.display());
            }
        }
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Address;
    use std::io::Cursor;

    #[test]
    fn test_collect_counts_from_bytes() {
        let bytes = vec![0x3E, 0x01, 0x00, 0x00, 0x00, 0x3E, 0x02, 0x00, 0x00, 0x00];
        let counts = collect_address_counts(Cursor::new(bytes)).unwrap();

        assert_eq!(counts.get(Address(1)), Some(1));
        assert_eq!(counts.get(Address(2)), Some(1));
        assert_eq!(counts.total_samples(), 2);
    }

    #[test]
    fn test_dump_raw_from_bytes() {
        let bytes = vec![0x3E, 0x01, 0x00, 0x00, 0x00, 0xFF, 0x3E, 0x02, 0x00, 0x00, 0x00];
        let mut out = Vec::new();
        let written = dump_raw(Cursor::new(bytes), &mut out).unwrap();

        assert_eq!(written, 1);
        assert_eq!(String::from_utf8(out).unwrap(), "0x00000002\n");
    }
}
