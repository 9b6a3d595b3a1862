use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::config::MappingConfig;
use crate::constants::OUTPUT_FILE_NAME;
use crate::csv_io;
use crate::error::Result;
use crate::table::OutputTable;

/// A fully mapped report, serialized and ready to be written
#[derive(Debug, Clone)]
pub struct MappedReport {
    pub table: OutputTable,
    pub bytes: Vec<u8>,
    pub rows_read: usize,
}

impl MappedReport {
    pub fn sha256_hex(&self) -> String {
        sha256_hex(&self.bytes)
    }
}

/// Result of one mapping run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub profile: String,
    pub input_file: String,
    pub output_file: String,
    pub rows_read: usize,
    pub rows_written: usize,
    pub columns: usize,
    pub generated_at: DateTime<Utc>,
    pub output_sha256: String,
}

impl RunSummary {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Path of the report inside `output_dir`
pub fn output_path(output_dir: &Path) -> PathBuf {
    output_dir.join(OUTPUT_FILE_NAME)
}

/// Read, map and serialize one export with one profile
pub struct ReportPipeline<'a> {
    config: &'a MappingConfig,
}

impl<'a> ReportPipeline<'a> {
    pub fn new(config: &'a MappingConfig) -> Self {
        Self { config }
    }

    /// Map a whole export held in `input`. Nothing is produced unless every
    /// step succeeds.
    #[instrument(skip(self, input), fields(profile = %self.config.name()))]
    pub fn run<R: Read>(&self, input: R) -> Result<MappedReport> {
        let rows = csv_io::read_rows(input)?;
        info!("Read {} input rows", rows.len());

        let table = OutputTable::build(self.config, &rows)?;
        let bytes = csv_io::table_to_bytes(&table)?;
        debug!(
            columns = table.column_count(),
            bytes = bytes.len(),
            "Serialized report"
        );

        Ok(MappedReport {
            rows_read: rows.len(),
            table,
            bytes,
        })
    }

    /// Map `input_path` and write the report into `output_dir` under its
    /// fixed file name
    #[instrument(skip(self), fields(profile = %self.config.name()))]
    pub fn run_file(&self, input_path: &Path, output_dir: &Path) -> Result<RunSummary> {
        let file = File::open(input_path)?;
        let report = self.run(file)?;

        fs::create_dir_all(output_dir)?;
        let out_path = output_path(output_dir);
        fs::write(&out_path, &report.bytes)?;
        info!(
            "Wrote {} rows to {}",
            report.table.row_count(),
            out_path.display()
        );

        Ok(RunSummary {
            profile: self.config.name().to_string(),
            input_file: input_path.display().to_string(),
            output_file: out_path.display().to_string(),
            rows_read: report.rows_read,
            rows_written: report.table.row_count(),
            columns: report.table.column_count(),
            generated_at: Utc::now(),
            output_sha256: report.sha256_hex(),
        })
    }
}
