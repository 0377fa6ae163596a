//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

use crate::analysis::DEFAULT_TOP_N;
use crate::config::{OutputMode, ProfileConfig, DEFAULT_ELF};
use crate::symbolization::{SymbolizerCommand, DEFAULT_SYMBOLIZER};

#[derive(Parser, Debug)]
#[command(
    name = "cfprof",
    version,
    about = "Find CPU hotspots in flight-controller sampling profiles",
    after_help = "\
EXAMPLES:
    cfprof --log profile.bin --elf obj/main/cleanflight_NAZE.elf
    cfprof --log profile.bin --raw                   Dump decoded addresses
    cfprof --log profile.bin --top 20 --export hot.json"
)]
pub struct Args {
    /// Profile log file captured from the flight controller
    #[arg(short, long, value_name = "FILE")]
    pub log: PathBuf,

    /// Firmware ELF image that produced the profile
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_ELF)]
    pub elf: PathBuf,

    /// Only print raw addresses, perform no analysis
    #[arg(long)]
    pub raw: bool,

    /// Number of entries per report section
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    /// addr2line-compatible tool used for symbolization (searched on $PATH)
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_SYMBOLIZER)]
    pub symbolizer: String,

    /// Also write the ranked report as JSON
    #[arg(long, value_name = "FILE", conflicts_with = "raw")]
    pub export: Option<PathBuf>,
}

impl Args {
    /// Freeze the parsed arguments into the run configuration
    #[must_use]
    pub fn into_config(self) -> ProfileConfig {
        let mode = if self.raw {
            OutputMode::Raw
        } else {
            OutputMode::Report {
                symbolizer: SymbolizerCommand::addr2line(self.symbolizer, &self.elf),
                elf_path: self.elf,
                top_n: self.top,
                export: self.export,
            }
        };

        ProfileConfig { log_path: self.log, mode }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["cfprof", "--log", "profile.bin"]).unwrap();
        assert_eq!(args.elf, PathBuf::from("cleanflight_NAZE.elf"));
        assert_eq!(args.top, 50);
        assert!(!args.raw);
        assert_eq!(args.symbolizer, "arm-none-eabi-addr2line");
    }

    #[test]
    fn test_log_is_required() {
        assert!(Args::try_parse_from(["cfprof"]).is_err());
    }

    #[test]
    fn test_raw_conflicts_with_export() {
        let result =
            Args::try_parse_from(["cfprof", "-l", "p.bin", "--raw", "--export", "out.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_into_config_report_mode() {
        let args = Args::try_parse_from([
            "cfprof",
            "-l",
            "p.bin",
            "-e",
            "fw.elf",
            "-n",
            "5",
            "--symbolizer",
            "llvm-addr2line",
        ])
        .unwrap();
        let config = args.into_config();

        assert_eq!(config.log_path, PathBuf::from("p.bin"));
        let OutputMode::Report { elf_path, symbolizer, top_n, .. } = config.mode else {
            panic!("expected report mode");
        };
        assert_eq!(elf_path, PathBuf::from("fw.elf"));
        assert_eq!(symbolizer.program, "llvm-addr2line");
        assert_eq!(top_n, 5);
    }

    #[test]
    fn test_into_config_raw_mode() {
        let args = Args::try_parse_from(["cfprof", "-l", "p.bin", "--raw"]).unwrap();
        assert!(args.into_config().is_raw());
    }
}
