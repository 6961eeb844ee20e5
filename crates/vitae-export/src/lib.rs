//! CSV export sink for vitae search reports.
//!
//! Writes one file per run under a configured output directory, named from
//! the sanitized query and a UTC timestamp:
//! `results_<query>_<YYYYMMDDTHHMMSSZ>.csv`.

pub mod error;

pub use error::{ExportError, Result};

use chrono::Utc;
use std::fs::{self, File};
use std::path::PathBuf;
use vitae_scanner::SearchReport;

/// Writes search reports as CSV files.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    output_dir: PathBuf,
}

impl CsvExporter {
    /// Create an exporter targeting `output_dir` (created on demand).
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write the report's row set and return the file path.
    ///
    /// Columns: `profile_url, resume_found, resume_links, error`. Multiple
    /// links are joined with `"; "`; the error column is empty for completed
    /// checks.
    pub fn export(&self, report: &SearchReport) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let timestamp = Utc::now().format("%Y%m%dT%H%M%SZ");
        let filename = format!("results_{}_{timestamp}.csv", sanitize_query(&report.query));
        let path = self.output_dir.join(filename);

        let file = File::create(&path)?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(["profile_url", "resume_found", "resume_links", "error"])?;
        for row in report.rows() {
            let links = row.resume_links.join("; ");
            writer.write_record([
                row.profile_url.as_str(),
                if row.resume_found { "true" } else { "false" },
                links.as_str(),
                row.error.as_deref().unwrap_or(""),
            ])?;
        }
        writer.flush()?;

        tracing::info!(
            path = %path.display(),
            rows = report.profiles_checked(),
            "report exported"
        );
        Ok(path)
    }
}

/// Replace anything path-hostile in the query with underscores.
fn sanitize_query(query: &str) -> String {
    query
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
