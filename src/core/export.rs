use crate::domain::model::Estimate;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const BUNDLE_NAME: &str = "memcalc_report.zip";
pub const CSV_NAME: &str = "frontier.csv";
pub const TSV_NAME: &str = "frontier.tsv";
pub const JSON_NAME: &str = "estimate.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReport {
    pub generated_at: DateTime<Utc>,
    pub estimate: Estimate,
}

#[derive(Debug, Serialize)]
struct FrontierRow {
    precision: &'static str,
    seq_length: u32,
    batch_size: f64,
}

/// Writes the frontier tables and the full estimate as one zip bundle.
pub struct ReportExporter<S: Storage> {
    storage: S,
}

impl<S: Storage> ReportExporter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Returns where the bundle ended up.
    pub fn export(&self, estimate: &Estimate) -> Result<String> {
        let report = ExportReport {
            generated_at: Utc::now(),
            estimate: estimate.clone(),
        };

        let csv_output = frontier_table(estimate, b',')?;
        let tsv_output = frontier_table(estimate, b'\t')?;
        let json_output = serde_json::to_string_pretty(&report)?;

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            zip.start_file::<_, ()>(CSV_NAME, FileOptions::default())?;
            zip.write_all(&csv_output)?;

            zip.start_file::<_, ()>(TSV_NAME, FileOptions::default())?;
            zip.write_all(&tsv_output)?;

            zip.start_file::<_, ()>(JSON_NAME, FileOptions::default())?;
            zip.write_all(json_output.as_bytes())?;

            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing report bundle ({} bytes) to storage", zip_data.len());
        self.storage.write_file(BUNDLE_NAME, &zip_data)?;

        Ok(self.storage.describe(BUNDLE_NAME))
    }
}

/// One row per frontier point, all precisions, widest first.
pub fn frontier_table(estimate: &Estimate, delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    for row in &estimate.precisions {
        for point in &row.frontier.points {
            writer.serialize(FrontierRow {
                precision: row.frontier.precision.label(),
                seq_length: point.seq_length,
                batch_size: point.batch_size,
            })?;
        }
    }

    // serialize() only emits the header alongside the first row
    if estimate.precisions.iter().all(|p| p.frontier.points.is_empty()) {
        writer.write_record(["precision", "seq_length", "batch_size"])?;
    }

    writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()).into())
}
