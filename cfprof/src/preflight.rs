//! Pre-flight checks for cfprof
//!
//! Validates the input files before any thread or subprocess is started.
//! Provides clear, actionable error messages when requirements aren't met.

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::path::Path;

use crate::config::{OutputMode, ProfileConfig};

/// Run all pre-flight checks for `config`
///
/// # Errors
/// Returns an error describing the first input that is missing or unreadable
pub fn run_preflight_checks(config: &ProfileConfig) -> Result<()> {
    check_log_readable(&config.log_path)?;
    if let OutputMode::Report { elf_path, .. } = &config.mode {
        check_elf_exists(elf_path)?;
    }
    Ok(())
}

/// Check the profile log exists and can be opened
fn check_log_readable(log_path: &Path) -> Result<()> {
    if !log_path.exists() {
        bail!(
            "Profile log not found: {}\n\n\
             Pass the file captured from the flight controller with --log.",
            log_path.display()
        );
    }
    if log_path.is_dir() {
        bail!(
            "Not a file: {}\n\n\
             --log must point to a profile log, not a directory.",
            log_path.display()
        );
    }
    File::open(log_path)
        .with_context(|| format!("Failed to open profile log file '{}'", log_path.display()))?;
    Ok(())
}

/// Check the firmware image exists and is a regular file
fn check_elf_exists(elf_path: &Path) -> Result<()> {
    if !elf_path.exists() {
        bail!(
            "Firmware image not found: {}\n\n\
             Pass the .elf that matches the profiled firmware with --elf.",
            elf_path.display()
        );
    }
    if !elf_path.is_file() {
        bail!(
            "Not a file: {}\n\n\
             --elf must point to the firmware image, not a directory.",
            elf_path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_log_not_found() {
        let result = check_log_readable(Path::new("/nonexistent/path/to/profile.bin"));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Profile log not found"));
    }

    #[test]
    fn test_log_is_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_log_readable(dir.path()).unwrap_err().to_string();
        assert!(err.contains("Not a file"));
    }

    #[test]
    fn test_raw_mode_skips_elf_check() {
        let mut log = tempfile::NamedTempFile::new().unwrap();
        log.write_all(b">\x01\x00\x00\x00").unwrap();

        assert!(run_preflight_checks(&ProfileConfig::raw(log.path())).is_ok());

        let report = ProfileConfig::report(log.path(), "/nonexistent/fw.elf");
        let err = run_preflight_checks(&report).unwrap_err().to_string();
        assert!(err.contains("Firmware image not found"));
    }
}
