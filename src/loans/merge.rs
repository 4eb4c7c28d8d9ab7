//! Join scheduled and actual repayments 1:1 on (LoanID, Month)

use super::{ActualRepayment, MergedRepayment, ScheduledRepayment};
use crate::error::{LoanError, Result};
use log::debug;
use std::collections::{BTreeMap, HashMap};

/// Merge the two tables, failing on any row without a partner.
///
/// Output is ordered by (LoanID, Month).
pub fn merge_repayments(
    scheduled: &[ScheduledRepayment],
    actual: &[ActualRepayment],
) -> Result<Vec<MergedRepayment>> {
    let mut by_key: BTreeMap<(&str, u32), &ScheduledRepayment> = BTreeMap::new();
    let mut loan_amounts: HashMap<&str, f64> = HashMap::new();

    for row in scheduled {
        check_month(&row.loan_id, row.month)?;
        check_amount(&row.loan_id, row.month, "ScheduledRepayment", row.scheduled_repayment)?;
        check_amount(&row.loan_id, row.month, "LoanAmount", row.loan_amount)?;

        let first = *loan_amounts
            .entry(row.loan_id.as_str())
            .or_insert(row.loan_amount);
        if first != row.loan_amount {
            return Err(LoanError::InconsistentLoanAmount {
                loan_id: row.loan_id.clone(),
                first,
                other: row.loan_amount,
            });
        }

        if by_key.insert((row.loan_id.as_str(), row.month), row).is_some() {
            return Err(LoanError::DuplicateRow {
                loan_id: row.loan_id.clone(),
                month: row.month,
                table: "scheduled",
            });
        }
    }

    let mut actual_by_key: HashMap<(&str, u32), &ActualRepayment> = HashMap::with_capacity(actual.len());
    for row in actual {
        check_month(&row.loan_id, row.month)?;
        check_amount(&row.loan_id, row.month, "ActualRepayment", row.actual_repayment)?;
        if !row.unscheduled_principal.is_finite() {
            return Err(LoanError::InvalidValue {
                loan_id: row.loan_id.clone(),
                month: row.month,
                column: "UnscheduledPrincipal",
                value: row.unscheduled_principal,
            });
        }

        let key = (row.loan_id.as_str(), row.month);
        if actual_by_key.insert(key, row).is_some() {
            return Err(LoanError::DuplicateRow {
                loan_id: row.loan_id.clone(),
                month: row.month,
                table: "actual",
            });
        }
        if !by_key.contains_key(&key) {
            return Err(LoanError::UnmatchedRow {
                loan_id: row.loan_id.clone(),
                month: row.month,
                present_in: "actual",
            });
        }
    }

    let mut merged = Vec::with_capacity(by_key.len());
    for (key, sched) in by_key {
        let act = actual_by_key.get(&key).ok_or_else(|| LoanError::UnmatchedRow {
            loan_id: key.0.to_string(),
            month: key.1,
            present_in: "scheduled",
        })?;

        merged.push(MergedRepayment {
            loan_id: sched.loan_id.clone(),
            month: sched.month,
            scheduled_repayment: sched.scheduled_repayment,
            actual_repayment: act.actual_repayment,
            unscheduled_principal: act.unscheduled_principal,
            loan_amount: sched.loan_amount,
        });
    }

    debug!("Merged {} loan-months across {} loans", merged.len(), loan_amounts.len());
    Ok(merged)
}

fn check_month(loan_id: &str, month: u32) -> Result<()> {
    if month == 0 {
        return Err(LoanError::InvalidMonth {
            loan_id: loan_id.to_string(),
            month,
        });
    }
    Ok(())
}

/// Amounts must be finite and non-negative
fn check_amount(loan_id: &str, month: u32, column: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(LoanError::InvalidValue {
            loan_id: loan_id.to_string(),
            month,
            column,
            value,
        });
    }
    Ok(())
}
