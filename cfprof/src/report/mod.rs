//! Text report rendering
//!
//! Prints the grand total followed by three ranked sections:
//!
//! ```text
//! 1523 samples in total
//!
//! Top 50 lines by sample count:
//!
//! [0x08003a10] src/main/flight/imu.c:imuUpdate:212 - 311 samples (20.42%)
//! ...
//!
//! Top 50 functions by sample count:
//!
//! src/main/flight/imu.c:imuUpdate - 402 samples (26.40%)
//! ...
//!
//! Top 50 files by sample count:
//!
//! src/main/flight/imu.c - 530 samples (34.80%)
//! ...
//! ```

use std::io::{self, Write};

use crate::analysis::{rank, ProfileStats};

/// Write the full ranked report
///
/// # Errors
/// Returns an error if writing to `out` fails
pub fn write_text_report<W: Write>(
    out: &mut W,
    stats: &ProfileStats,
    top_n: usize,
) -> io::Result<()> {
    writeln!(out, "{} samples in total\n", stats.total_samples())?;

    write_line_section(out, stats, top_n)?;
    write_function_section(out, stats, top_n)?;
    write_file_section(out, stats, top_n)?;

    Ok(())
}

fn write_line_section<W: Write>(
    out: &mut W,
    stats: &ProfileStats,
    top_n: usize,
) -> io::Result<()> {
    writeln!(out, "Top {top_n} lines by sample count:\n")?;

    for entry in rank(stats.lines(), stats.total_samples(), top_n) {
        let line = entry.definition;
        writeln!(
            out,
            "[{}] {}:{}:{} - {} samples ({:.2}%)",
            entry.stats.smallest_address,
            line.function.file,
            line.function.name,
            line.line,
            entry.stats.count,
            entry.percentage
        )?;
    }

    writeln!(out)
}

fn write_function_section<W: Write>(
    out: &mut W,
    stats: &ProfileStats,
    top_n: usize,
) -> io::Result<()> {
    writeln!(out, "Top {top_n} functions by sample count:\n")?;

    for entry in rank(stats.functions(), stats.total_samples(), top_n) {
        writeln!(
            out,
            "{} - {} samples ({:.2}%)",
            entry.definition, entry.stats.count, entry.percentage
        )?;
    }

    writeln!(out)
}

fn write_file_section<W: Write>(
    out: &mut W,
    stats: &ProfileStats,
    top_n: usize,
) -> io::Result<()> {
    writeln!(out, "Top {top_n} files by sample count:\n")?;

    for entry in rank(stats.files(), stats.total_samples(), top_n) {
        writeln!(
            out,
            "{} - {} samples ({:.2}%)",
            entry.definition, entry.stats.count, entry.percentage
        )?;
    }

    writeln!(out)
}
