//! Expected credit loss for a loan year

use super::{year_months, MONTHS_PER_YEAR};
use crate::balances::{round_cents, BalanceTable};
use crate::error::{LoanError, Result};
use log::debug;

pub const DEFAULT_RECOVERY_RATE: f64 = 0.80;

/// Which balances make up the exposure at default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExposureBasis {
    /// Sum of closing balances over every month of the loss year
    #[default]
    YearMonthEnds,
    /// Portfolio closing balance at the last month of the preceding year
    PriorYearClose,
}

#[derive(Debug, Clone)]
pub struct LossConfig {
    /// Fraction of a defaulted balance expected back
    pub recovery_rate: f64,

    /// Loan year the loss is predicted for
    pub year: u32,

    pub exposure: ExposureBasis,
}

impl Default for LossConfig {
    fn default() -> Self {
        Self {
            recovery_rate: DEFAULT_RECOVERY_RATE,
            year: 2,
            exposure: ExposureBasis::default(),
        }
    }
}

impl LossConfig {
    pub fn loss_given_default(&self) -> f64 {
        1.0 - self.recovery_rate
    }
}

/// `probability_of_default * exposure * (1 - recovery_rate)`, rounded to cents.
///
/// `probability_of_default` is a fraction (a percent rate divided by 100);
/// the caller picks which default definition feeds it.
pub fn predicted_loss(table: &BalanceTable, probability_of_default: f64, config: &LossConfig) -> Result<f64> {
    check_fraction("probability_of_default", probability_of_default)?;
    check_fraction("recovery_rate", config.recovery_rate)?;
    let months = year_months(config.year)?;

    let exposure: f64 = match config.exposure {
        ExposureBasis::YearMonthEnds => table.rows_in_months(months).map(|r| r.loan_balance_end).sum(),
        ExposureBasis::PriorYearClose => {
            if config.year < 2 {
                return Err(LoanError::InvalidParameter {
                    name: "year",
                    value: config.year as f64,
                    reason: "prior-year exposure needs a preceding loan year",
                });
            }
            let close = (config.year - 1) * MONTHS_PER_YEAR;
            table.rows_in_months(close..=close).map(|r| r.loan_balance_end).sum()
        }
    };

    let loss = probability_of_default * exposure * config.loss_given_default();
    debug!(
        "Year {} exposure {:.2} ({:?}), PD {:.4}, loss {:.2}",
        config.year, exposure, config.exposure, probability_of_default, loss
    );

    Ok(round_cents(loss))
}

fn check_fraction(name: &'static str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(LoanError::InvalidParameter {
            name,
            value,
            reason: "must be a fraction between 0 and 1",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balances::LoanBalanceRecord;

    fn row(month: u32, end: f64) -> LoanBalanceRecord {
        LoanBalanceRecord {
            loan_id: "A".to_string(),
            month,
            scheduled_repayment: 0.0,
            actual_repayment: 0.0,
            unscheduled_principal: 0.0,
            loan_amount: 1000.0,
            loan_balance_start: end,
            loan_balance_end: end,
            interest_payment: 0.0,
        }
    }

    fn table() -> BalanceTable {
        // Month-end balance of 100 * month
        BalanceTable::from_rows((1..=24).map(|m| row(m, 100.0 * m as f64)).collect())
    }

    #[test]
    fn test_year_two_month_ends() {
        // Sum of 1300..=2400 step 100 = 22200
        let loss = predicted_loss(&table(), 0.5, &LossConfig::default()).unwrap();
        assert_eq!(loss, 2220.0);
    }

    #[test]
    fn test_prior_year_close() {
        let config = LossConfig {
            exposure: ExposureBasis::PriorYearClose,
            ..Default::default()
        };
        // 0.25 * 1200 * 0.2
        let loss = predicted_loss(&table(), 0.25, &config).unwrap();
        assert_eq!(loss, 60.0);
    }

    #[test]
    fn test_zero_pd_or_full_recovery() {
        assert_eq!(predicted_loss(&table(), 0.0, &LossConfig::default()).unwrap(), 0.0);

        let config = LossConfig {
            recovery_rate: 1.0,
            ..Default::default()
        };
        assert_eq!(predicted_loss(&table(), 0.3, &config).unwrap(), 0.0);
    }

    #[test]
    fn test_rounded_to_cents() {
        let loss = predicted_loss(&table(), 1.0 / 3.0, &LossConfig::default()).unwrap();
        assert_eq!(loss, 1480.0);

        let table = BalanceTable::from_rows(vec![row(13, 10.0)]);
        let loss = predicted_loss(&table, 1.0 / 3.0, &LossConfig::default()).unwrap();
        assert_eq!(loss, 0.67);
    }

    #[test]
    fn test_percent_pd_rejected() {
        let err = predicted_loss(&table(), 25.0, &LossConfig::default()).unwrap_err();
        assert!(matches!(err, LoanError::InvalidParameter { name: "probability_of_default", .. }));
    }

    #[test]
    fn test_prior_year_close_needs_year_two() {
        let config = LossConfig {
            year: 1,
            exposure: ExposureBasis::PriorYearClose,
            ..Default::default()
        };
        assert!(predicted_loss(&table(), 0.1, &config).is_err());
    }
}
