use serde::Serialize;
use std::io::Write;

use crate::analysis::{rank, ProfileStats};
use crate::domain::{Address, ExportError};

/// One ranked source line
#[derive(Debug, Serialize)]
struct LineRow<'a> {
    address: Address,
    file: &'a str,
    function: &'a str,
    line: u32,
    count: u64,
    percentage: f64,
}

/// One ranked function
#[derive(Debug, Serialize)]
struct FunctionRow<'a> {
    file: &'a str,
    function: &'a str,
    count: u64,
    percentage: f64,
}

/// One ranked file
#[derive(Debug, Serialize)]
struct FileRow<'a> {
    file: &'a str,
    count: u64,
    percentage: f64,
}

/// Top-level JSON document
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    total_samples: u64,
    top_n: usize,
    lines: Vec<LineRow<'a>>,
    functions: Vec<FunctionRow<'a>>,
    files: Vec<FileRow<'a>>,
}

/// Writes the same ranked sections as the text report, as JSON
pub struct JsonReportExporter {
    top_n: usize,
}

impl JsonReportExporter {
    #[must_use]
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    /// Serialize the ranked report to `writer`
    ///
    /// # Errors
    /// Returns an error if serialization or writing fails
    pub fn export<W: Write>(
        &self,
        stats: &ProfileStats,
        mut writer: W,
    ) -> Result<(), ExportError> {
        let report = self.build(stats);
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    fn build<'a>(&self, stats: &'a ProfileStats) -> JsonReport<'a> {
        let total = stats.total_samples();

        let lines = rank(stats.lines(), total, self.top_n)
            .into_iter()
            .map(|entry| LineRow {
                address: entry.stats.smallest_address,
                file: &entry.definition.function.file.filename,
                function: &entry.definition.function.name,
                line: entry.definition.line,
                count: entry.stats.count,
                percentage: entry.percentage,
            })
            .collect();

        let functions = rank(stats.functions(), total, self.top_n)
            .into_iter()
            .map(|entry| FunctionRow {
                file: &entry.definition.file.filename,
                function: &entry.definition.name,
                count: entry.stats.count,
                percentage: entry.percentage,
            })
            .collect();

        let files = rank(stats.files(), total, self.top_n)
            .into_iter()
            .map(|entry| FileRow {
                file: &entry.definition.filename,
                count: entry.stats.count,
                percentage: entry.percentage,
            })
            .collect();

        JsonReport { total_samples: total, top_n: self.top_n, lines, functions, files }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Resolution;

    #[test]
    fn test_export_contains_ranked_sections() {
        let mut stats = ProfileStats::new();
        stats.record(
            &Resolution {
                address: Address(0x0800_0040),
                function: "systemInit".to_string(),
                file: "src/main/drivers/system.c".to_string(),
                line: 12,
            },
            2,
        );

        let mut out = Vec::new();
        JsonReportExporter::new(10).export(&stats, &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(json["total_samples"], 2);
        assert_eq!(json["lines"][0]["address"], 0x0800_0040);
        assert_eq!(json["lines"][0]["line"], 12);
        assert_eq!(json["functions"][0]["function"], "systemInit");
        assert_eq!(json["files"][0]["file"], "src/main/drivers/system.c");
        assert_eq!(json["files"][0]["percentage"], 100.0);
    }
}
