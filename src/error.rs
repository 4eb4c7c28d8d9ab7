//! Error types for loan data loading and metric calculation

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, LoanError>;

#[derive(Error, Debug)]
pub enum LoanError {
    /// Underlying CSV read/parse failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// None of the candidate data directories hold the input files
    #[error("no data directory found (searched: {searched})")]
    DataDirNotFound { searched: String },

    /// A (LoanID, Month) present in one table but not the other
    #[error("loan {loan_id} month {month} present in {present_in} repayments only")]
    UnmatchedRow {
        loan_id: String,
        month: u32,
        present_in: &'static str,
    },

    /// A (LoanID, Month) appearing more than once in one table
    #[error("duplicate {table} row for loan {loan_id} month {month}")]
    DuplicateRow {
        loan_id: String,
        month: u32,
        table: &'static str,
    },

    #[error("loan {loan_id} has inconsistent LoanAmount ({first} vs {other})")]
    InconsistentLoanAmount {
        loan_id: String,
        first: f64,
        other: f64,
    },

    #[error("loan {loan_id} has invalid month {month} (months are 1-based)")]
    InvalidMonth { loan_id: String, month: u32 },

    /// Non-finite or negative amount in an input column
    #[error("loan {loan_id} month {month}: invalid {column} value {value}")]
    InvalidValue {
        loan_id: String,
        month: u32,
        column: &'static str,
        value: f64,
    },

    #[error("balance table contains no loans")]
    EmptyPortfolio,

    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}
