//! Structured error types for cfprof
//!
//! Using thiserror for automatic Display implementation and error chaining.

use super::types::Address;
use std::process::ExitStatus;
use thiserror::Error;

/// Failures while reading the sample stream
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to read profile log: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to write raw samples: {0}")]
    Output(#[source] std::io::Error),

    #[error("Failed to start frame decoder thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Sample stream ended without an end-of-log marker")]
    Disconnected,

    #[error("Frame decoder thread panicked")]
    DecoderPanicked,
}

/// Failures while driving the external symbolizer
///
/// Every variant aborts resolution: dropping or double counting an address
/// would silently corrupt the statistics.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Failed to run '{program}', is it on the $PATH? ({source})")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to capture symbolizer {0}")]
    PipeUnavailable(&'static str),

    #[error("Bad address line from symbolizer: '{0}'")]
    MalformedAddress(String),

    #[error("Failed to parse filename/line number from '{0}'")]
    MalformedLocation(String),

    #[error("Symbolizer reply for {0} ended before its location line")]
    TruncatedReply(Address),

    #[error("Symbolizer gave us an address {0} which we didn't ask for")]
    UnexpectedAddress(Address),

    #[error("Symbolizer answered {0} more than once")]
    DuplicateReply(Address),

    #[error("Symbolizer answered {received} of {expected} addresses")]
    MissingReplies { expected: usize, received: usize },

    #[error("Symbolizer exited with {0}")]
    SymbolizerFailed(ExitStatus),

    #[error("Symbolizer reply thread panicked")]
    ReaderPanicked,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
