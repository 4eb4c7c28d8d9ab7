//! The enriched loan-month balance table

use crate::error::Result;
use crate::loans::LoanId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::ops::RangeInclusive;
use std::path::Path;

/// One loan-month after the amortization pass
///
/// Serialized column names match the enriched CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanBalanceRecord {
    #[serde(rename = "LoanID")]
    pub loan_id: LoanId,
    #[serde(rename = "Month")]
    pub month: u32,
    #[serde(rename = "ScheduledRepayment")]
    pub scheduled_repayment: f64,
    #[serde(rename = "ActualRepayment")]
    pub actual_repayment: f64,
    #[serde(rename = "UnscheduledPrincipal")]
    pub unscheduled_principal: f64,
    #[serde(rename = "LoanAmount")]
    pub loan_amount: f64,
    #[serde(rename = "LoanBalanceStart")]
    pub loan_balance_start: f64,
    #[serde(rename = "LoanBalanceEnd")]
    pub loan_balance_end: f64,
    #[serde(rename = "InterestPayment")]
    pub interest_payment: f64,
}

/// Portfolio totals for a single month
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyPortfolioRow {
    pub month: u32,
    pub loans: usize,
    pub total_scheduled: f64,
    pub total_actual: f64,
    pub total_unscheduled_principal: f64,
    pub total_balance_start: f64,
    pub total_balance_end: f64,
    pub total_interest: f64,
}

/// Read-only table of balance records ordered by (LoanID, Month)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceTable {
    rows: Vec<LoanBalanceRecord>,
}

impl BalanceTable {
    pub fn from_rows(mut rows: Vec<LoanBalanceRecord>) -> Self {
        rows.sort_by(|a, b| a.loan_id.cmp(&b.loan_id).then(a.month.cmp(&b.month)));
        Self { rows }
    }

    pub fn rows(&self) -> &[LoanBalanceRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct loan identifiers, in table order
    pub fn loan_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.rows.iter().map(|r| r.loan_id.as_str()).collect();
        ids.dedup();
        ids
    }

    pub fn loan_count(&self) -> usize {
        self.loan_ids().len()
    }

    pub fn rows_for_loan<'a>(&'a self, loan_id: &'a str) -> impl Iterator<Item = &'a LoanBalanceRecord> + 'a {
        self.rows.iter().filter(move |r| r.loan_id == loan_id)
    }

    pub fn rows_in_months(&self, months: RangeInclusive<u32>) -> impl Iterator<Item = &LoanBalanceRecord> + '_ {
        self.rows.iter().filter(move |r| months.contains(&r.month))
    }

    /// Aggregate the table by month, ascending
    pub fn by_month(&self) -> Vec<MonthlyPortfolioRow> {
        let mut months: BTreeMap<u32, MonthlyPortfolioRow> = BTreeMap::new();

        for row in &self.rows {
            let agg = months.entry(row.month).or_insert_with(|| MonthlyPortfolioRow {
                month: row.month,
                ..Default::default()
            });
            agg.loans += 1;
            agg.total_scheduled += row.scheduled_repayment;
            agg.total_actual += row.actual_repayment;
            agg.total_unscheduled_principal += row.unscheduled_principal;
            agg.total_balance_start += row.loan_balance_start;
            agg.total_balance_end += row.loan_balance_end;
            agg.total_interest += row.interest_payment;
        }

        months.into_values().collect()
    }

    /// Write the enriched table as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in &self.rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_csv_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_csv(std::fs::File::create(path)?)
    }
}
