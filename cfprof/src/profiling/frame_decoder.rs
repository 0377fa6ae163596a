//! # Frame Decoding
//!
//! The firmware writes one frame per sample: a `>` start marker followed by
//! the sampled program counter as 4 little-endian bytes. There is no length
//! prefix and no checksum, and captured logs routinely contain partial
//! frames from buffer overruns on the target. The decoder therefore
//! resynchronizes on the marker byte instead of failing.
//!
//! ## Acceptance rule
//!
//! A frame counts only if the byte right after its address is another `>`
//! or the end of the stream:
//!
//! ```text
//! 3E 01 00 00 00 3E 02 00 00 00        -> [0x1, 0x2]
//! 3E 01 00 00 00 FF 3E 02 00 00 00     -> [0x2]   (0xFF breaks frame 1)
//! 3E 01 00                             -> []      (truncated)
//! ```
//!
//! Framing problems are counted in [`DecodeSummary`] and never reported as
//! errors. Only real I/O failures of the underlying reader are.

use std::io::{self, BufReader, ErrorKind, Read};

use crate::domain::{Address, SampleRecord};

/// Start-of-frame marker (`>`)
pub const FRAME_START: u8 = b'>';

/// Number of address bytes following the marker
pub const ADDRESS_BYTES: usize = 4;

/// Counters describing how the byte stream was consumed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    /// Frames emitted as samples
    pub accepted: u64,
    /// Complete frames rejected because no marker or EOF followed them
    pub malformed: u64,
    /// Frames cut short by the end of the stream
    pub truncated: u64,
    /// Bytes skipped while looking for a marker
    pub noise_bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Scanning,
    AtMarker,
    Finished,
}

/// Lazy decoder over a byte stream
///
/// Yields `io::Result<SampleRecord>`; once it returns `None` (or an error)
/// it stays finished.
pub struct FrameDecoder<R: Read> {
    reader: BufReader<R>,
    state: State,
    summary: DecodeSummary,
}

impl<R: Read> FrameDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            state: State::Scanning,
            summary: DecodeSummary::default(),
        }
    }

    /// Counters accumulated so far
    #[must_use]
    pub fn summary(&self) -> DecodeSummary {
        self.summary
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }

    fn read_address(&mut self) -> io::Result<Option<Address>> {
        let mut bytes = [0u8; ADDRESS_BYTES];
        match self.reader.read_exact(&mut bytes) {
            Ok(()) => Ok(Some(Address(u32::from_le_bytes(bytes)))),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn step(&mut self) -> io::Result<Option<SampleRecord>> {
        loop {
            match self.state {
                State::Finished => return Ok(None),
                State::Scanning => match self.read_byte()? {
                    None => self.state = State::Finished,
                    Some(FRAME_START) => self.state = State::AtMarker,
                    Some(_) => self.summary.noise_bytes += 1,
                },
                State::AtMarker => {
                    let Some(pc) = self.read_address()? else {
                        self.summary.truncated += 1;
                        self.state = State::Finished;
                        continue;
                    };

                    match self.read_byte()? {
                        None => {
                            self.state = State::Finished;
                            self.summary.accepted += 1;
                            return Ok(Some(SampleRecord { pc }));
                        }
                        Some(FRAME_START) => {
                            // The terminator is also the next frame's marker
                            self.summary.accepted += 1;
                            return Ok(Some(SampleRecord { pc }));
                        }
                        Some(_) => {
                            self.summary.malformed += 1;
                            self.summary.noise_bytes += 1;
                            self.state = State::Scanning;
                        }
                    }
                }
            }
        }
    }
}

impl<R: Read> Iterator for FrameDecoder<R> {
    type Item = io::Result<SampleRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.step() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => {
                self.state = State::Finished;
                Some(Err(e))
            }
        }
    }
}
