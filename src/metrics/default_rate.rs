//! Type 1 and type 2 default rates

use super::year_months;
use crate::balances::BalanceTable;
use crate::error::{LoanError, Result};
use log::debug;
use std::collections::{BTreeMap, BTreeSet};

/// Unpaid share of the annual scheduled total above which a loan is a type 2 default
pub const DEFAULT_TYPE_2_THRESHOLD: f64 = 0.15;

/// Percent of loans that missed any scheduled repayment in full at least once
pub fn type_1_default_rate(table: &BalanceTable) -> Result<f64> {
    let total = table.loan_count();
    if total == 0 {
        return Err(LoanError::EmptyPortfolio);
    }

    let defaulted: BTreeSet<&str> = table
        .rows()
        .iter()
        .filter(|r| r.actual_repayment < r.scheduled_repayment)
        .map(|r| r.loan_id.as_str())
        .collect();

    debug!("Type 1 defaults: {} of {} loans", defaulted.len(), total);
    Ok(100.0 * defaulted.len() as f64 / total as f64)
}

/// Percent of loans whose unpaid total over `year` exceeds `threshold` of
/// that year's scheduled total.
///
/// Totals are taken per loan over the 12 months of the year, so a missed
/// month that is later caught up does not count. The denominator is every
/// loan in the table.
pub fn type_2_default_rate(table: &BalanceTable, year: u32, threshold: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(LoanError::InvalidParameter {
            name: "threshold",
            value: threshold,
            reason: "must be a fraction between 0 and 1",
        });
    }
    let months = year_months(year)?;

    let total = table.loan_count();
    if total == 0 {
        return Err(LoanError::EmptyPortfolio);
    }

    // (scheduled, actual) per loan
    let mut sums: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for row in table.rows_in_months(months) {
        let entry = sums.entry(row.loan_id.as_str()).or_insert((0.0, 0.0));
        entry.0 += row.scheduled_repayment;
        entry.1 += row.actual_repayment;
    }

    let defaulted = sums
        .values()
        .filter(|(scheduled, actual)| scheduled - actual > threshold * scheduled)
        .count();

    debug!("Type 2 defaults (year {}): {} of {} loans", year, defaulted, total);
    Ok(100.0 * defaulted as f64 / total as f64)
}
