//! Load scheduled and actual repayments from CSV
//!
//! Default layout is a `data/` directory holding
//! `scheduled_loan_repayments.csv` and `actual_loan_repayments.csv`.

use super::{ActualRepayment, ScheduledRepayment};
use crate::error::{LoanError, Result};
use csv::Reader;
use log::{debug, info};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

pub const SCHEDULED_FILE: &str = "scheduled_loan_repayments.csv";
pub const ACTUAL_FILE: &str = "actual_loan_repayments.csv";

/// Directories searched, in order, when no data directory is given
pub const DEFAULT_DATA_DIRS: [&str; 2] = ["data", "Task_2/data"];

fn read_rows<T: DeserializeOwned, R: std::io::Read>(reader: R) -> Result<Vec<T>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut rows = Vec::new();

    for result in csv_reader.deserialize() {
        let row: T = result?;
        rows.push(row);
    }

    Ok(rows)
}

/// Load scheduled repayments from a CSV file
pub fn load_scheduled<P: AsRef<Path>>(path: P) -> Result<Vec<ScheduledRepayment>> {
    let path = path.as_ref();
    let rows = read_rows(std::fs::File::open(path)?)?;
    debug!("{}: {} scheduled rows", path.display(), rows.len());
    Ok(rows)
}

/// Load scheduled repayments from any reader (e.g., string buffer)
pub fn load_scheduled_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<ScheduledRepayment>> {
    read_rows(reader)
}

/// Load actual repayments from a CSV file
pub fn load_actual<P: AsRef<Path>>(path: P) -> Result<Vec<ActualRepayment>> {
    let path = path.as_ref();
    let rows = read_rows(std::fs::File::open(path)?)?;
    debug!("{}: {} actual rows", path.display(), rows.len());
    Ok(rows)
}

/// Load actual repayments from any reader
pub fn load_actual_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<ActualRepayment>> {
    read_rows(reader)
}

/// Pick the data directory: the explicit one if given, otherwise the first
/// default candidate under `base` that contains the scheduled file.
pub fn resolve_data_dir(explicit: Option<&Path>, base: &Path) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }

    DEFAULT_DATA_DIRS
        .iter()
        .map(|dir| base.join(dir))
        .find(|dir| dir.join(SCHEDULED_FILE).is_file())
        .ok_or_else(|| LoanError::DataDirNotFound {
            searched: DEFAULT_DATA_DIRS
                .iter()
                .map(|dir| base.join(dir).display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

/// Both raw input tables
#[derive(Debug, Clone, Default)]
pub struct LoanDataset {
    pub scheduled: Vec<ScheduledRepayment>,
    pub actual: Vec<ActualRepayment>,
}

impl LoanDataset {
    pub fn new(scheduled: Vec<ScheduledRepayment>, actual: Vec<ActualRepayment>) -> Self {
        Self { scheduled, actual }
    }

    /// Load both files from a directory
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_paths(&dir.join(SCHEDULED_FILE), &dir.join(ACTUAL_FILE))
    }

    pub fn load_from_paths(scheduled: &Path, actual: &Path) -> Result<Self> {
        let dataset = Self::new(load_scheduled(scheduled)?, load_actual(actual)?);
        info!(
            "Loaded {} scheduled and {} actual repayment rows",
            dataset.scheduled.len(),
            dataset.actual.len()
        );
        Ok(dataset)
    }
}
