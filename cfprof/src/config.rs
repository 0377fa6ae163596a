//! Run configuration
//!
//! Built once from the command line and passed by reference into the
//! pipeline; nothing reads process-wide state.

use std::path::PathBuf;

use crate::analysis::DEFAULT_TOP_N;
use crate::symbolization::{SymbolizerCommand, DEFAULT_SYMBOLIZER};

/// Firmware image assumed when none is given
pub const DEFAULT_ELF: &str = "cleanflight_NAZE.elf";

/// What the run produces
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Decoded addresses only, one per line, no symbolization
    Raw,
    /// Aggregated, symbolized and ranked report
    Report {
        elf_path: PathBuf,
        symbolizer: SymbolizerCommand,
        top_n: usize,
        export: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileConfig {
    pub log_path: PathBuf,
    pub mode: OutputMode,
}

impl ProfileConfig {
    /// Raw-address dump of `log_path`
    #[must_use]
    pub fn raw(log_path: impl Into<PathBuf>) -> Self {
        Self { log_path: log_path.into(), mode: OutputMode::Raw }
    }

    /// Full report using the default symbolizer and section size
    #[must_use]
    pub fn report(log_path: impl Into<PathBuf>, elf_path: impl Into<PathBuf>) -> Self {
        let elf_path = elf_path.into();
        let symbolizer = SymbolizerCommand::addr2line(DEFAULT_SYMBOLIZER, &elf_path);
        Self {
            log_path: log_path.into(),
            mode: OutputMode::Report { elf_path, symbolizer, top_n: DEFAULT_TOP_N, export: None },
        }
    }

    #[must_use]
    pub fn is_raw(&self) -> bool {
        matches!(self.mode, OutputMode::Raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_defaults() {
        let config = ProfileConfig::report("flight.log", "fw.elf");
        assert!(!config.is_raw());

        let OutputMode::Report { elf_path, symbolizer, top_n, export } = config.mode else {
            panic!("expected report mode");
        };
        assert_eq!(elf_path, PathBuf::from("fw.elf"));
        assert_eq!(symbolizer.program, DEFAULT_SYMBOLIZER);
        assert_eq!(top_n, 50);
        assert!(export.is_none());
    }
}
