//! Balance builder: walks each loan's months in order and records the
//! opening balance, accrued interest and closing balance

use super::round_cents;
use super::state::LoanBalanceState;
use super::table::{BalanceTable, LoanBalanceRecord};
use crate::error::{LoanError, Result};
use crate::loans::{merge_repayments, LoanDataset, MergedRepayment};
use log::{debug, info};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Configuration for the amortization pass
#[derive(Debug, Clone)]
pub struct BalanceConfig {
    /// Nominal annual interest rate
    pub annual_rate: f64,

    /// Compounding periods per year (12 for monthly)
    pub periods_per_year: u32,

    /// Round start/end balances and interest to cents in the output
    pub round_output: bool,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            annual_rate: 0.10,
            periods_per_year: 12,
            round_output: true,
        }
    }
}

impl BalanceConfig {
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / self.periods_per_year as f64
    }
}

/// Builds the [`BalanceTable`] from merged loan-months
pub struct BalanceBuilder {
    config: BalanceConfig,
}

impl BalanceBuilder {
    pub fn new(config: BalanceConfig) -> Self {
        Self { config }
    }

    /// Run the amortization for every loan.
    ///
    /// Loans are independent and processed in parallel; input order does not
    /// matter, months are sorted within each loan.
    pub fn build(&self, merged: &[MergedRepayment]) -> Result<BalanceTable> {
        let mut loans: BTreeMap<&str, Vec<&MergedRepayment>> = BTreeMap::new();
        for row in merged {
            loans.entry(row.loan_id.as_str()).or_default().push(row);
        }

        let per_loan: Vec<Vec<LoanBalanceRecord>> = loans
            .into_par_iter()
            .map(|(_, mut months)| {
                months.sort_by_key(|r| r.month);
                self.build_loan(&months)
            })
            .collect::<Result<_>>()?;

        let rows: Vec<LoanBalanceRecord> = per_loan.into_iter().flatten().collect();
        info!("Built {} balance rows", rows.len());

        Ok(BalanceTable::from_rows(rows))
    }

    /// Fold a single loan's months (already sorted ascending)
    fn build_loan(&self, months: &[&MergedRepayment]) -> Result<Vec<LoanBalanceRecord>> {
        let Some(first) = months.first() else {
            return Ok(Vec::new());
        };

        let mut state = LoanBalanceState::new(first.loan_amount, self.config.monthly_rate());
        let mut rows = Vec::with_capacity(months.len());

        for row in months {
            if row.month <= state.month {
                return Err(LoanError::DuplicateRow {
                    loan_id: row.loan_id.clone(),
                    month: row.month,
                    table: "merged",
                });
            }

            let step = state.advance(row.month, row.actual_repayment);
            rows.push(LoanBalanceRecord {
                loan_id: row.loan_id.clone(),
                month: row.month,
                scheduled_repayment: row.scheduled_repayment,
                actual_repayment: row.actual_repayment,
                unscheduled_principal: row.unscheduled_principal,
                loan_amount: row.loan_amount,
                loan_balance_start: self.output(step.balance_start),
                loan_balance_end: self.output(step.balance_end),
                interest_payment: self.output(step.interest),
            });
        }

        debug!(
            "Loan {}: {} months, closing balance {:.2}",
            first.loan_id,
            rows.len(),
            state.balance
        );

        Ok(rows)
    }

    fn output(&self, value: f64) -> f64 {
        if self.config.round_output {
            round_cents(value)
        } else {
            value
        }
    }
}

impl Default for BalanceBuilder {
    fn default() -> Self {
        Self::new(BalanceConfig::default())
    }
}

/// Merge the raw tables and build balances with default terms
pub fn calculate_balances(dataset: &LoanDataset) -> Result<BalanceTable> {
    let merged = merge_repayments(&dataset.scheduled, &dataset.actual)?;
    BalanceBuilder::default().build(&merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loans::{ActualRepayment, ScheduledRepayment};
    use approx::assert_relative_eq;

    fn merged(loan_id: &str, month: u32, scheduled: f64, actual: f64, amount: f64) -> MergedRepayment {
        MergedRepayment {
            loan_id: loan_id.to_string(),
            month,
            scheduled_repayment: scheduled,
            actual_repayment: actual,
            unscheduled_principal: 0.0,
            loan_amount: amount,
        }
    }

    /// 24-month level schedule for a loan at 10% with some irregular payments
    fn two_year_loan(loan_id: &str, amount: f64, payment: f64, adjust: &[(u32, f64)]) -> Vec<MergedRepayment> {
        (1..=24)
            .map(|m| {
                let paid = adjust
                    .iter()
                    .find(|(month, _)| *month == m)
                    .map(|(_, p)| *p)
                    .unwrap_or(payment);
                merged(loan_id, m, payment, paid, amount)
            })
            .collect()
    }

    #[test]
    fn test_two_month_scenario() {
        let rows = vec![merged("1", 1, 600.0, 600.0, 1200.0), merged("1", 2, 600.0, 600.0, 1200.0)];
        let table = BalanceBuilder::default().build(&rows).unwrap();

        let first = &table.rows()[0];
        assert_eq!(first.loan_balance_start, 1200.0);
        assert_eq!(first.interest_payment, 10.0);
        assert_eq!(first.loan_balance_end, 610.0);

        let second = &table.rows()[1];
        assert_eq!(second.loan_balance_start, 610.0);
        assert_eq!(second.interest_payment, 5.08);
        assert_eq!(second.loan_balance_end, 15.08);
    }

    #[test]
    fn test_months_processed_in_order_regardless_of_input_order() {
        let mut rows = two_year_loan("A", 10_000.0, 461.45, &[]);
        rows.reverse();
        let reversed = BalanceBuilder::default().build(&rows).unwrap();
        rows.reverse();
        let forward = BalanceBuilder::default().build(&rows).unwrap();

        assert_eq!(reversed, forward);
        assert_eq!(forward.rows()[0].month, 1);
        assert_eq!(forward.rows()[23].month, 24);
    }

    #[test]
    fn test_balance_chain_and_non_negative() {
        let mut rows = two_year_loan("A", 10_000.0, 461.45, &[(3, 0.0), (4, 0.0), (10, 2_000.0)]);
        rows.extend(two_year_loan("B", 5_000.0, 230.72, &[(1, 6_000.0)]));
        let table = BalanceBuilder::default().build(&rows).unwrap();

        for loan_id in table.loan_ids() {
            let loan_rows: Vec<_> = table.rows_for_loan(loan_id).collect();
            assert_eq!(loan_rows[0].loan_balance_start, loan_rows[0].loan_amount);
            for pair in loan_rows.windows(2) {
                assert_eq!(pair[1].loan_balance_start, pair[0].loan_balance_end);
            }
            assert!(loan_rows.iter().all(|r| r.loan_balance_end >= 0.0));
        }

        // Loan B paid off in month 1 and stays at zero
        assert!(table.rows_for_loan("B").all(|r| r.loan_balance_end == 0.0));
    }

    #[test]
    fn test_level_payment_amortizes_to_zero() {
        // Level payment for 10,000 over 24 months at 10% is 461.45
        let rows = two_year_loan("A", 10_000.0, 461.45, &[]);
        let table = BalanceBuilder::default().build(&rows).unwrap();
        let last = table.rows().last().unwrap();
        assert_relative_eq!(last.loan_balance_end, 0.0, epsilon = 0.05);
    }

    #[test]
    fn test_loans_are_independent() {
        let a = two_year_loan("A", 10_000.0, 461.45, &[(5, 0.0)]);
        let b = two_year_loan("B", 8_000.0, 369.16, &[]);

        let alone = BalanceBuilder::default().build(&b).unwrap();
        let mut both_rows = a.clone();
        both_rows.extend(b);
        let both = BalanceBuilder::default().build(&both_rows).unwrap();

        let b_alone: Vec<_> = alone.rows_for_loan("B").cloned().collect();
        let b_with_a: Vec<_> = both.rows_for_loan("B").cloned().collect();
        assert_eq!(b_alone, b_with_a);
    }

    #[test]
    fn test_rebuild_is_identical() {
        let rows = two_year_loan("A", 10_000.0, 461.45, &[(7, 100.0)]);
        let builder = BalanceBuilder::default();
        assert_eq!(builder.build(&rows).unwrap(), builder.build(&rows).unwrap());
    }

    #[test]
    fn test_unrounded_output() {
        let builder = BalanceBuilder::new(BalanceConfig {
            round_output: false,
            ..Default::default()
        });
        let table = builder.build(&[merged("1", 1, 0.0, 0.0, 1000.0)]).unwrap();
        assert_relative_eq!(table.rows()[0].interest_payment, 1000.0 / 120.0, epsilon = 1e-12);
    }

    #[test]
    fn test_duplicate_month_rejected() {
        let rows = vec![merged("1", 1, 1.0, 1.0, 10.0), merged("1", 1, 1.0, 1.0, 10.0)];
        let err = BalanceBuilder::default().build(&rows).unwrap_err();
        assert!(matches!(err, LoanError::DuplicateRow { table: "merged", .. }));
    }

    #[test]
    fn test_calculate_balances_from_dataset() {
        let dataset = LoanDataset::new(
            vec![ScheduledRepayment {
                loan_id: "9".into(),
                month: 1,
                scheduled_repayment: 600.0,
                loan_amount: 1200.0,
            }],
            vec![ActualRepayment {
                loan_id: "9".into(),
                month: 1,
                actual_repayment: 600.0,
                unscheduled_principal: 0.0,
            }],
        );
        let table = calculate_balances(&dataset).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].loan_balance_end, 610.0);
    }
}
