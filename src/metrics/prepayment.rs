//! Prepayment speed: single monthly mortality (SMM) and conditional prepayment rate (CPR)

use super::MONTHS_PER_YEAR;
use crate::balances::BalanceTable;
use crate::error::{LoanError, Result};
use log::{debug, warn};
use serde::Serialize;

/// Portfolio SMM for one month
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlySmm {
    pub month: u32,
    pub unscheduled_principal: f64,
    pub balance_start: f64,
    /// None when the month opens with no outstanding balance
    pub smm: Option<f64>,
}

/// SMM per month: unscheduled principal over the portfolio's opening balance
pub fn monthly_smm(table: &BalanceTable) -> Vec<MonthlySmm> {
    table
        .by_month()
        .into_iter()
        .map(|m| MonthlySmm {
            month: m.month,
            unscheduled_principal: m.total_unscheduled_principal,
            balance_start: m.total_balance_start,
            smm: (m.total_balance_start != 0.0)
                .then(|| m.total_unscheduled_principal / m.total_balance_start),
        })
        .collect()
}

/// Annualized portfolio CPR as a percent.
///
/// Mean SMM is the geometric mean `prod(1 + SMM)^(1/12) - 1` and
/// `CPR = 1 - (1 - mean)^12`. The exponent is always 12, independent of how
/// many months carry a defined SMM; undefined months are left out of the
/// product.
pub fn portfolio_cpr(table: &BalanceTable) -> Result<f64> {
    if table.is_empty() {
        return Err(LoanError::EmptyPortfolio);
    }

    let months = monthly_smm(table);
    let excluded = months.iter().filter(|m| m.smm.is_none()).count();
    if excluded > 0 {
        warn!("{} month(s) with zero opening balance excluded from SMM", excluded);
    }

    let growth: f64 = months.iter().filter_map(|m| m.smm).map(|smm| 1.0 + smm).product();
    let periods = MONTHS_PER_YEAR as f64;
    let mean_smm = growth.powf(1.0 / periods) - 1.0;
    let cpr = 1.0 - (1.0 - mean_smm).powf(periods);

    debug!("Mean SMM {:.6}, CPR {:.4}%", mean_smm, cpr * 100.0);
    Ok(cpr * 100.0)
}
