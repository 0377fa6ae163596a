//! Parsing of symbolizer replies.
//!
//! `addr2line --addresses --functions` answers every request with three
//! lines:
//!
//! ```text
//! 0x08001234
//! pidController
//! /home/build/cleanflight/./src/main/flight/pid.c:142
//! ```
//!
//! The location line may also read `??:?` or `file.c:?` when the debug info
//! has no answer; that is a line number of 0, not an error.

use std::io::BufRead;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{Address, ResolveError, Resolution};

static FILENAME_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+):(\d+|\?+)$").expect("regex"));

static RELATIVE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:.*/)?\./").expect("regex"));

static DISCRIMINATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" \(discriminator \d+\)$").expect("regex"));

/// Parse the echoed address line (`0x0800abcd`, decimal also accepted)
///
/// # Errors
/// Returns [`ResolveError::MalformedAddress`] if the line is not a 32-bit number
pub fn parse_address_line(line: &str) -> Result<Address, ResolveError> {
    let trimmed = line.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => trimmed.parse::<u32>(),
    };

    parsed.map(Address).map_err(|_| ResolveError::MalformedAddress(line.to_string()))
}

/// Parse a `filename:line` location into a normalized filename and line number
///
/// # Errors
/// Returns [`ResolveError::MalformedLocation`] if the line has no `:line` suffix
pub fn parse_location_line(line: &str) -> Result<(String, u32), ResolveError> {
    let trimmed = line.trim_end();
    let trimmed = DISCRIMINATOR.replace(trimmed, "");

    let captures = FILENAME_LINE
        .captures(&trimmed)
        .ok_or_else(|| ResolveError::MalformedLocation(line.to_string()))?;

    let filename = normalize_filename(&captures[1]);
    // `?` or an out-of-range number both mean "unknown line"
    let line_num = captures[2].parse::<u32>().unwrap_or(0);

    Ok((filename, line_num))
}

/// Strip everything up to and including the last `/./` segment, or a
/// leading `./`
///
/// Firmware builds pass `./src/...` paths to the compiler, so the debug info
/// carries `/abs/build/dir/./src/main/...`; the report wants `src/main/...`.
#[must_use]
pub fn normalize_filename(filename: &str) -> String {
    RELATIVE_PREFIX.replace(filename, "").into_owned()
}

/// Reads reply triples off the symbolizer's stdout
pub struct ReplyReader<R: BufRead> {
    reader: R,
    buf: String,
}

impl<R: BufRead> ReplyReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buf: String::new() }
    }

    fn next_line(&mut self) -> Result<Option<String>, ResolveError> {
        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(self.buf.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }

    /// Read the next complete reply, `None` once the stream is exhausted
    ///
    /// # Errors
    /// Returns an error on I/O failure, a malformed line, or a reply cut off
    /// by end-of-stream
    pub fn next_reply(&mut self) -> Result<Option<Resolution>, ResolveError> {
        let Some(address_line) = self.next_line()? else {
            return Ok(None);
        };
        let address = parse_address_line(&address_line)?;

        let function = self.next_line()?.ok_or(ResolveError::TruncatedReply(address))?;
        let location = self.next_line()?.ok_or(ResolveError::TruncatedReply(address))?;
        let (file, line) = parse_location_line(&location)?;

        Ok(Some(Resolution { address, function, file, line }))
    }
}

impl<R: BufRead> Iterator for ReplyReader<R> {
    type Item = Result<Resolution, ResolveError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_reply().transpose()
    }
}
