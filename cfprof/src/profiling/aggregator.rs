//! Sample aggregation
//!
//! Two consumers of the sample stream:
//! - [`fold_addresses`] counts samples per address and only returns once the
//!   whole log has been read, since resolution needs the complete set.
//! - [`forward_raw`] prints every sample as-is, in decode order.

use std::collections::hash_map::{self, HashMap};
use std::io::Write;

use crossbeam_channel::Receiver;

use super::sample_stream::LogEvent;
use super::DecodeSummary;
use crate::domain::{Address, DecodeError};

/// Sample count per program-counter value
///
/// The sum of all counts equals the number of accepted frames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressCounts {
    counts: HashMap<Address, u64>,
    total_samples: u64,
}

impl AddressCounts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, pc: Address) {
        *self.counts.entry(pc).or_insert(0) += 1;
        self.total_samples += 1;
    }

    #[must_use]
    pub fn get(&self, pc: Address) -> Option<u64> {
        self.counts.get(&pc).copied()
    }

    /// Number of distinct addresses
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    #[must_use]
    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }

    pub fn addresses(&self) -> impl Iterator<Item = Address> + '_ {
        self.counts.keys().copied()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, Address, u64> {
        self.counts.iter()
    }
}

impl FromIterator<Address> for AddressCounts {
    fn from_iter<I: IntoIterator<Item = Address>>(iter: I) -> Self {
        let mut counts = Self::new();
        for pc in iter {
            counts.record(pc);
        }
        counts
    }
}

/// Count samples per address until the end of the log
///
/// # Errors
/// Returns an error if reading the log failed, or the decoder went away
/// without signalling the end of the stream
pub fn fold_addresses(
    events: &Receiver<LogEvent>,
) -> Result<(AddressCounts, DecodeSummary), DecodeError> {
    let mut counts = AddressCounts::new();

    for event in events {
        match event {
            LogEvent::Sample(record) => counts.record(record.pc),
            LogEvent::End(summary) => return Ok((counts, summary)),
            LogEvent::Failed(e) => return Err(DecodeError::Read(e)),
        }
    }

    Err(DecodeError::Disconnected)
}

/// Write each sample as `0x%08x` on its own line
///
/// Returns the number of samples written.
///
/// # Errors
/// Returns an error if reading the log or writing to `out` fails
pub fn forward_raw<W: Write>(events: &Receiver<LogEvent>, out: &mut W) -> Result<u64, DecodeError> {
    let mut written = 0;

    for event in events {
        match event {
            LogEvent::Sample(record) => {
                writeln!(out, "{}", record.pc).map_err(DecodeError::Output)?;
                written += 1;
            }
            LogEvent::End(_) => return Ok(written),
            LogEvent::Failed(e) => return Err(DecodeError::Read(e)),
        }
    }

    Err(DecodeError::Disconnected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SampleRecord;
    use crossbeam_channel::unbounded;

    fn feed(pcs: &[u32], terminate: bool) -> Receiver<LogEvent> {
        let (tx, rx) = unbounded();
        for &pc in pcs {
            tx.send(LogEvent::Sample(SampleRecord { pc: Address(pc) })).unwrap();
        }
        if terminate {
            tx.send(LogEvent::End(DecodeSummary::default())).unwrap();
        }
        rx
    }

    #[test]
    fn test_fold_counts_per_address() {
        let rx = feed(&[1, 2, 1, 1, 0], true);
        let (counts, _) = fold_addresses(&rx).unwrap();

        assert_eq!(counts.len(), 3);
        assert_eq!(counts.get(Address(1)), Some(3));
        assert_eq!(counts.get(Address(2)), Some(1));
        assert_eq!(counts.get(Address(0)), Some(1));
        assert_eq!(counts.total_samples(), 5);
    }

    #[test]
    fn test_fold_total_matches_sum_of_counts() {
        let rx = feed(&[9, 9, 8, 7, 9, 8], true);
        let (counts, _) = fold_addresses(&rx).unwrap();

        let sum: u64 = counts.iter().map(|(_, &c)| c).sum();
        assert_eq!(sum, counts.total_samples());
    }

    #[test]
    fn test_fold_requires_end_marker() {
        let rx = feed(&[1, 2], false);
        assert!(matches!(fold_addresses(&rx), Err(DecodeError::Disconnected)));
    }

    #[test]
    fn test_fold_surfaces_read_failure() {
        let (tx, rx) = unbounded();
        tx.send(LogEvent::Failed(std::io::Error::other("boom"))).unwrap();
        assert!(matches!(fold_addresses(&rx), Err(DecodeError::Read(_))));
    }

    #[test]
    fn test_raw_output_keeps_decode_order() {
        let rx = feed(&[0x0800_0100, 1, 0x0800_0100], true);
        let mut out = Vec::new();
        let written = forward_raw(&rx, &mut out).unwrap();

        assert_eq!(written, 3);
        assert_eq!(String::from_utf8(out).unwrap(), "0x08000100\n0x00000001\n0x08000100\n");
    }
}
