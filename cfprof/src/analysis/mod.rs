//! Analysis logic for profiling data
//!
//! This module contains the statistics model and ranking, separated from
//! symbolization and from report rendering.

pub mod profile_stats;
pub mod ranking;

pub use profile_stats::{EntityStatistics, LineStatistics, ProfileStats, SampleCount};
pub use ranking::{percentage, rank, RankedEntry, DEFAULT_TOP_N};
