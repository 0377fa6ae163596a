//! # Sample Stream
//!
//! Runs the [`FrameDecoder`] on its own thread and hands records to the
//! consumer through a bounded channel. The decoder blocks when the queue is
//! full; the consumer blocks while it is empty.
//!
//! The stream always ends with an explicit [`LogEvent::End`] or
//! [`LogEvent::Failed`] item, so an address of `0` is just another sample.

use std::io::{self, Read};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};
use log::{debug, warn};

use super::frame_decoder::{DecodeSummary, FrameDecoder};
use crate::domain::SampleRecord;

/// Queue depth between the decoder thread and the consumer
pub const SAMPLE_QUEUE_CAPACITY: usize = 50;

/// Item flowing from the decoder thread to the consumer
#[derive(Debug)]
pub enum LogEvent {
    Sample(SampleRecord),
    /// The log was fully consumed
    End(DecodeSummary),
    /// Reading the log failed; no further items follow
    Failed(io::Error),
}

/// Handle to a running decoder thread
pub struct SampleStream {
    pub events: Receiver<LogEvent>,
    handle: JoinHandle<()>,
}

impl SampleStream {
    /// Wait for the decoder thread to exit
    ///
    /// Returns `false` if the thread panicked.
    pub fn join(self) -> bool {
        drop(self.events);
        self.handle.join().is_ok()
    }
}

/// Spawn the decoder thread over `reader`
///
/// # Errors
/// Returns an error if the OS refuses to create the thread
pub fn spawn_decoder<R>(reader: R) -> io::Result<SampleStream>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = bounded(SAMPLE_QUEUE_CAPACITY);
    let handle = thread::Builder::new()
        .name("frame-decoder".to_string())
        .spawn(move || decode_into(reader, &tx))?;

    Ok(SampleStream { events: rx, handle })
}

fn decode_into<R: Read>(reader: R, tx: &Sender<LogEvent>) {
    let mut decoder = FrameDecoder::new(reader);

    for item in decoder.by_ref() {
        let event = match item {
            Ok(record) => LogEvent::Sample(record),
            Err(e) => {
                // Receiver may already be gone; nothing left to report to
                let _ = tx.send(LogEvent::Failed(e));
                return;
            }
        };
        if tx.send(event).is_err() {
            debug!("Sample consumer hung up, stopping decoder");
            return;
        }
    }

    let summary = decoder.summary();
    debug!(
        "Decoded {} frames ({} malformed, {} truncated, {} noise bytes)",
        summary.accepted, summary.malformed, summary.truncated, summary.noise_bytes
    );
    if summary.malformed > 0 {
        warn!("Discarded {} malformed frames while decoding the log", summary.malformed);
    }

    let _ = tx.send(LogEvent::End(summary));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_ends_with_summary() {
        let bytes: &'static [u8] = &[0x3E, 0x01, 0x00, 0x00, 0x00, 0x3E, 0x02, 0x00, 0x00, 0x00];
        let stream = spawn_decoder(bytes).unwrap();

        let mut pcs = Vec::new();
        let mut summary = None;
        for event in stream.events.iter() {
            match event {
                LogEvent::Sample(record) => pcs.push(record.pc.0),
                LogEvent::End(s) => {
                    summary = Some(s);
                    break;
                }
                LogEvent::Failed(e) => panic!("unexpected read failure: {e}"),
            }
        }

        assert_eq!(pcs, vec![1, 2]);
        assert_eq!(summary.unwrap().accepted, 2);
        assert!(stream.join());
    }

    #[test]
    fn test_more_samples_than_queue_capacity() {
        let mut bytes = Vec::new();
        for pc in 0..(SAMPLE_QUEUE_CAPACITY as u32 * 4) {
            bytes.push(b'>');
            bytes.extend_from_slice(&pc.to_le_bytes());
        }
        let stream = spawn_decoder(std::io::Cursor::new(bytes)).unwrap();

        let samples = stream
            .events
            .iter()
            .take_while(|e| matches!(e, LogEvent::Sample(_)))
            .count();

        assert_eq!(samples, SAMPLE_QUEUE_CAPACITY * 4);
        assert!(stream.join());
    }
}
