//! Per-loan amortization: running balance, accrued interest and the enriched table

mod state;
mod builder;
mod table;

pub use state::{LoanBalanceState, MonthStep};
pub use builder::{BalanceBuilder, BalanceConfig, calculate_balances};
pub use table::{BalanceTable, LoanBalanceRecord, MonthlyPortfolioRow};

/// Round to cents, half away from zero
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
