//! Loan Analytics - amortization, default and prepayment metrics for a loan book
//!
//! This library provides:
//! - Loading scheduled and actual monthly repayments from CSV
//! - A strict 1:1 merge of the two tables on (LoanID, Month)
//! - Per-loan amortization with monthly compounding interest
//! - Type 1 / type 2 default rates, portfolio CPR and predicted credit loss

pub mod error;
pub mod loans;
pub mod balances;
pub mod metrics;

// Re-export commonly used types
pub use error::{LoanError, Result};
pub use loans::{LoanDataset, MergedRepayment};
pub use balances::{BalanceBuilder, BalanceConfig, BalanceTable, LoanBalanceRecord, calculate_balances};
pub use metrics::{MetricsConfig, PortfolioMetrics, LossConfig, ExposureBasis};
