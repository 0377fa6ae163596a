//! Profiling core modules
//!
//! Everything between the raw log bytes and the per-address sample counts:
//! - Frame decoding state machine
//! - Decoder thread and bounded sample channel
//! - Aggregation (counting) and raw pass-through

pub mod aggregator;
pub mod frame_decoder;
pub mod sample_stream;

// Re-export common types
pub use aggregator::{fold_addresses, forward_raw, AddressCounts};
pub use frame_decoder::{DecodeSummary, FrameDecoder, FRAME_START};
pub use sample_stream::{spawn_decoder, LogEvent, SampleStream, SAMPLE_QUEUE_CAPACITY};
