//! Portfolio metrics over the balance table
//!
//! Every metric is a pure read over an immutable [`BalanceTable`]; a failure
//! in one does not affect the others.

mod default_rate;
mod prepayment;
mod loss;

pub use default_rate::{type_1_default_rate, type_2_default_rate, DEFAULT_TYPE_2_THRESHOLD};
pub use prepayment::{monthly_smm, portfolio_cpr, MonthlySmm};
pub use loss::{predicted_loss, ExposureBasis, LossConfig, DEFAULT_RECOVERY_RATE};

use crate::balances::BalanceTable;
use crate::error::{LoanError, Result};
use serde::Serialize;
use std::ops::RangeInclusive;

pub const MONTHS_PER_YEAR: u32 = 12;

/// Months belonging to a loan year (year 1 = months 1..=12)
pub fn year_months(year: u32) -> Result<RangeInclusive<u32>> {
    if year == 0 {
        return Err(LoanError::InvalidParameter {
            name: "year",
            value: 0.0,
            reason: "loan years are 1-based",
        });
    }
    let last = year
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or(LoanError::InvalidParameter {
            name: "year",
            value: year as f64,
            reason: "month index out of range",
        })?;
    Ok(last - MONTHS_PER_YEAR + 1..=last)
}

/// Settings for computing the full metric set
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Loan year assessed for type 2 defaults
    pub default_year: u32,

    /// Unpaid share of the year's scheduled total that triggers a type 2 default
    pub type_2_threshold: f64,

    pub loss: LossConfig,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            default_year: 1,
            type_2_threshold: DEFAULT_TYPE_2_THRESHOLD,
            loss: LossConfig::default(),
        }
    }
}

/// The four headline portfolio figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioMetrics {
    pub loan_count: usize,
    pub loan_months: usize,
    /// Percent (0-100)
    pub type_1_default_rate: f64,
    /// Percent (0-100)
    pub type_2_default_rate: f64,
    /// Annualized CPR, percent (0-100)
    pub cpr: f64,
    /// Expected loss for the configured loss year, currency
    pub predicted_loss: f64,
}

impl PortfolioMetrics {
    /// Compute all metrics. The loss uses the type 2 rate as probability of default.
    pub fn compute(table: &BalanceTable, config: &MetricsConfig) -> Result<Self> {
        let type_1 = type_1_default_rate(table)?;
        let type_2 = type_2_default_rate(table, config.default_year, config.type_2_threshold)?;
        let cpr = portfolio_cpr(table)?;
        let loss = predicted_loss(table, type_2 / 100.0, &config.loss)?;

        Ok(Self {
            loan_count: table.loan_count(),
            loan_months: table.len(),
            type_1_default_rate: type_1,
            type_2_default_rate: type_2,
            cpr,
            predicted_loss: loss,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balances::BalanceBuilder;
    use crate::loans::MergedRepayment;

    #[test]
    fn test_year_months() {
        assert_eq!(year_months(1).unwrap(), 1..=12);
        assert_eq!(year_months(2).unwrap(), 13..=24);
        assert!(year_months(0).is_err());
        assert_eq!(year_months(u32::MAX / 12).unwrap().end(), &(u32::MAX / 12 * 12));
        assert!(matches!(
            year_months(400_000_000),
            Err(LoanError::InvalidParameter { name: "year", .. })
        ));
    }

    #[test]
    fn test_compute_all_metrics() {
        let mut rows = Vec::new();
        for (loan_id, short_month) in [("A", None), ("B", Some(3))] {
            for month in 1..=24 {
                let paid = if Some(month) == short_month { 0.0 } else { 461.45 };
                rows.push(MergedRepayment {
                    loan_id: loan_id.to_string(),
                    month,
                    scheduled_repayment: 461.45,
                    actual_repayment: paid,
                    unscheduled_principal: 0.0,
                    loan_amount: 10_000.0,
                });
            }
        }
        let table = BalanceBuilder::default().build(&rows).unwrap();
        let metrics = PortfolioMetrics::compute(&table, &MetricsConfig::default()).unwrap();

        assert_eq!(metrics.loan_count, 2);
        assert_eq!(metrics.loan_months, 48);
        assert_eq!(metrics.type_1_default_rate, 50.0);
        // One missed month is 1/12 of the year, under the 15% threshold
        assert_eq!(metrics.type_2_default_rate, 0.0);
        assert_eq!(metrics.cpr, 0.0);
        assert_eq!(metrics.predicted_loss, 0.0);
    }
}
