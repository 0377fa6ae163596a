//! Hotspot ranking.
//!
//! Turns one of the [`ProfileStats`](super::ProfileStats) views into a list
//! sorted by sample count, most frequent first, cut to the requested size.
//!
//! # Ties
//!
//! Entries with equal counts keep whatever order the underlying `HashMap`
//! yields them in. That order is arbitrary and can change between runs; it
//! is not a tie-break.

// Percentage calculations intentionally convert u64 to f64
#![allow(clippy::cast_precision_loss)]

use std::collections::HashMap;

use super::profile_stats::SampleCount;

/// Default number of entries per report section
pub const DEFAULT_TOP_N: usize = 50;

/// One row of a ranked section
#[derive(Debug, Clone)]
pub struct RankedEntry<'a, D, S> {
    pub definition: &'a D,
    pub stats: &'a S,
    /// Share of the overall total (0.0 - 100.0)
    pub percentage: f64,
}

/// `count` as a percentage of `overall`, 0.0 when nothing was sampled.
#[must_use]
pub fn percentage(count: u64, overall: u64) -> f64 {
    if overall == 0 {
        return 0.0;
    }
    (count as f64 * 100.0) / overall as f64
}

/// Sort `entries` by descending count and keep the first `top_n`.
#[must_use]
pub fn rank<'a, D, S>(
    entries: &'a HashMap<D, S>,
    overall: u64,
    top_n: usize,
) -> Vec<RankedEntry<'a, D, S>>
where
    S: SampleCount,
{
    let mut ranked: Vec<RankedEntry<'a, D, S>> = entries
        .iter()
        .map(|(definition, stats)| RankedEntry {
            definition,
            stats,
            percentage: percentage(stats.count(), overall),
        })
        .collect();

    // Stable sort so equal counts keep the map's iteration order
    ranked.sort_by_key(|entry| std::cmp::Reverse(entry.stats.count()));
    ranked.truncate(top_n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::EntityStatistics;

    fn entries(counts: &[(&'static str, u64)]) -> HashMap<&'static str, EntityStatistics> {
        counts.iter().map(|&(name, count)| (name, EntityStatistics { count })).collect()
    }

    #[test]
    fn test_rank_sorts_descending() {
        let map = entries(&[("idle", 2), ("gyro", 9), ("pid", 5), ("mixer", 5)]);
        let ranked = rank(&map, 21, 10);

        assert_eq!(ranked.len(), 4);
        assert_eq!(*ranked[0].definition, "gyro");
        for pair in ranked.windows(2) {
            assert!(pair[0].stats.count >= pair[1].stats.count);
        }
    }

    #[test]
    fn test_rank_limits_to_top_n() {
        let map = entries(&[("a", 1), ("b", 2), ("c", 3), ("d", 4)]);

        assert_eq!(rank(&map, 10, 2).len(), 2);
        assert_eq!(rank(&map, 10, 2)[0].stats.count, 4);
        assert_eq!(rank(&map, 10, 100).len(), 4);
        assert!(rank(&map, 10, 0).is_empty());
    }

    #[test]
    fn test_rank_calculates_percentages() {
        let map = entries(&[("a", 1), ("b", 3)]);
        let ranked = rank(&map, 4, 10);

        assert!((ranked[0].percentage - 75.0).abs() < 0.001);
        assert!((ranked[1].percentage - 25.0).abs() < 0.001);
    }

    #[test]
    fn test_percentage_with_zero_overall() {
        assert!(percentage(0, 0).abs() < f64::EPSILON);
        assert!(percentage(5, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rank_empty_map() {
        let map: HashMap<&str, EntityStatistics> = HashMap::new();
        assert!(rank(&map, 0, DEFAULT_TOP_N).is_empty());
    }
}
