//! # Symbol Resolution
//!
//! Turns the sampled program counters into file, function and line, using an
//! external `addr2line`-compatible tool (by default the one shipped with the
//! ARM GNU toolchain) run against the firmware ELF image.
//!
//! ## Protocol
//!
//! The tool is started once per run with `--addresses --functions` and fed
//! one address per line on stdin. For each address it prints three lines:
//!
//! ```text
//! -> 0x8001234
//! <- 0x08001234
//! <- pidController
//! <- /home/build/cleanflight/./src/main/flight/pid.c:142
//! ```
//!
//! ## Avoiding pipe deadlock
//!
//! A firmware image sampled for a few minutes easily produces thousands of
//! distinct addresses. Writing all requests before reading any reply stalls
//! both sides once the OS pipe buffers fill up: the tool blocks writing
//! replies nobody reads, and we block writing requests it no longer reads.
//! So the reply reader is started on its own thread before the first request
//! is written:
//!
//! ```text
//!   calling thread              symbolizer              symbolizer-reply thread
//!   ──────────────              ──────────              ───────────────────────
//!   write 0x... ──stdin──►   addr2line   ──stdout──►   ReplyReader
//!   write 0x...                                        match echoed address
//!   close stdin                                        ProfileStats::record
//!   join ◄───────────────────────────────────────────  EOF -> stats
//! ```
//!
//! Replies are matched by the address they echo, never by position.
//!
//! ## Failure policy
//!
//! Anything unexpected from the tool aborts the whole resolution: a reply
//! that cannot be parsed, an address that was never asked for, a duplicate
//! reply, or a request left unanswered. Skipping one would silently skew the
//! percentages of everything else.
//!
//! ## Module Structure
//!
//! - **`symbolizer`**: subprocess launch and the writer/reader pair
//! - **`reply_parser`**: line-level parsing and filename normalization

pub mod reply_parser;
pub mod symbolizer;

pub use reply_parser::{normalize_filename, parse_address_line, parse_location_line, ReplyReader};
pub use symbolizer::{
    collect_replies, write_requests, Symbolizer, SymbolizerCommand, DEFAULT_SYMBOLIZER,
};
