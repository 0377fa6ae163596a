//! # cfprof - Flight Controller Sampling Profile Analyzer
//!
//! cfprof reads the raw sampling-profiler log written by flight-controller
//! firmware (one program-counter sample per frame), works out where the CPU
//! time went, and prints the hottest source lines, functions and files.
//!
//! The firmware only captures addresses: there is no room on the target to
//! symbolize anything. All interpretation happens here, on the host, with the
//! help of the toolchain's `addr2line`.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  Flight Controller Firmware                     │
//! │         timer ISR samples PC ──► '>' + 4 LE bytes to log        │
//! └───────────────────────┬─────────────────────────────────────────┘
//!                         │ raw log file (noisy, no checksums)
//!                         ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     cfprof (This Crate)                         │
//! │                                                                 │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────┐         │
//! │  │    Frame     │══▶│  Aggregator  │──▶│ Symbolizer   │         │
//! │  │   Decoder    │   │ (addr→count) │   │ (addr2line)  │         │
//! │  └──────────────┘   └──────────────┘   └──────┬───────┘         │
//! │     thread      bounded                       │                 │
//! │                 channel                       ▼                 │
//! │                                        ┌──────────────┐         │
//! │                                        │   Analysis   │         │
//! │                                        │ (stats/rank) │         │
//! │                                        └──────┬───────┘         │
//! │                                               ▼                 │
//! │                          ┌──────────────┐   ┌──────────────┐    │
//! │                          │    Report    │   │    Export    │    │
//! │                          │   (stdout)   │   │    (JSON)    │    │
//! │                          └──────────────┘   └──────────────┘    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`profiling`]: frame decoding, the decoder thread, and sample aggregation
//! - [`symbolization`]: driving the external symbolizer without pipe deadlock
//! - [`analysis`]: the four-way statistics model and ranking
//! - [`report`]: the text report
//! - [`export`]: JSON export of the same report
//! - [`pipeline`]: stage composition for one run
//! - [`cli`], [`config`], [`preflight`]: argument parsing, the immutable run
//!   configuration, and input validation
//! - [`domain`]: core types (`Address`, file/function/line identities) and errors
//!
//! ## Typical Usage
//!
//! ```bash
//! # Ranked report
//! cfprof --log profile.bin --elf obj/main/cleanflight_NAZE.elf
//!
//! # Decoded addresses only
//! cfprof --log profile.bin --raw
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod domain;
pub mod export;
pub mod pipeline;
pub mod preflight;
pub mod profiling;
pub mod report;
pub mod symbolization;
