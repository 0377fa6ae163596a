//! Profile statistics model.
//!
//! Folds per-address sample counts into four independent views:
//!
//! ```text
//! Resolution(0x08001234 -> pid.c:pidController:42) x count
//!     │
//!     ├──► addresses[0x08001234]            = count       (assigned)
//!     ├──► lines[pid.c:pidController:42]    += count, min address
//!     ├──► functions[pid.c:pidController]   += count
//!     ├──► files[pid.c]                     += count
//!     └──► overall                          += count
//! ```
//!
//! Each address is resolved exactly once, so after resolution every view
//! sums to the same total.

use serde::Serialize;
use std::collections::HashMap;

use crate::domain::{Address, FileDefinition, FunctionDefinition, LineDefinition, Resolution};

/// Anything that carries a sample count, so rankings can be generic
pub trait SampleCount {
    fn count(&self) -> u64;
}

/// Sample count for an address, function or file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityStatistics {
    pub count: u64,
}

impl SampleCount for EntityStatistics {
    fn count(&self) -> u64 {
        self.count
    }
}

/// Sample count for a source line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineStatistics {
    pub count: u64,
    /// Lowest address attributed to this line, shown as its representative
    pub smallest_address: Address,
}

impl SampleCount for LineStatistics {
    fn count(&self) -> u64 {
        self.count
    }
}

#[derive(Debug, Default)]
pub struct ProfileStats {
    addresses: HashMap<Address, EntityStatistics>,
    lines: HashMap<LineDefinition, LineStatistics>,
    functions: HashMap<FunctionDefinition, EntityStatistics>,
    files: HashMap<FileDefinition, EntityStatistics>,
    overall: EntityStatistics,
}

impl ProfileStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute `count` samples to the location in `resolution`.
    ///
    /// Callers must record each address at most once; the resolver enforces
    /// that before calling.
    pub fn record(&mut self, resolution: &Resolution, count: u64) {
        let line_def = resolution.line_definition();
        let function_def = line_def.function.clone();
        let file_def = function_def.file.clone();

        self.files.entry(file_def).or_default().count += count;
        self.functions.entry(function_def).or_default().count += count;

        self.lines
            .entry(line_def)
            .and_modify(|stats| {
                stats.count += count;
                stats.smallest_address = stats.smallest_address.min(resolution.address);
            })
            .or_insert(LineStatistics { count, smallest_address: resolution.address });

        self.addresses.insert(resolution.address, EntityStatistics { count });

        self.overall.count += count;
    }

    #[must_use]
    pub fn addresses(&self) -> &HashMap<Address, EntityStatistics> {
        &self.addresses
    }

    #[must_use]
    pub fn lines(&self) -> &HashMap<LineDefinition, LineStatistics> {
        &self.lines
    }

    #[must_use]
    pub fn functions(&self) -> &HashMap<FunctionDefinition, EntityStatistics> {
        &self.functions
    }

    #[must_use]
    pub fn files(&self) -> &HashMap<FileDefinition, EntityStatistics> {
        &self.files
    }

    #[must_use]
    pub fn overall(&self) -> EntityStatistics {
        self.overall
    }

    /// Grand total, the denominator for percentages
    #[must_use]
    pub fn total_samples(&self) -> u64 {
        self.overall.count
    }
}
