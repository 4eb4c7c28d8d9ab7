//! Running balance for a single loan as its months are walked in order

/// Balance state of one loan between months
#[derive(Debug, Clone)]
pub struct LoanBalanceState {
    /// Last processed month (0 before the first month)
    pub month: u32,

    /// Outstanding balance carried into the next month, unrounded
    pub balance: f64,

    /// Periodic interest rate applied to the opening balance
    pub monthly_rate: f64,
}

/// Outcome of rolling one month forward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthStep {
    pub balance_start: f64,
    pub interest: f64,
    pub balance_end: f64,
}

impl LoanBalanceState {
    /// Opening state at loan origination
    pub fn new(loan_amount: f64, monthly_rate: f64) -> Self {
        Self {
            month: 0,
            balance: loan_amount,
            monthly_rate,
        }
    }

    /// Accrue interest on the opening balance, then apply the payment.
    ///
    /// The balance floors at zero; any excess payment is dropped rather than
    /// carried as a credit.
    pub fn advance(&mut self, month: u32, payment: f64) -> MonthStep {
        let balance_start = self.balance;
        let interest = balance_start * self.monthly_rate;
        let balance_end = (balance_start + interest - payment).max(0.0);

        self.month = month;
        self.balance = balance_end;

        MonthStep {
            balance_start,
            interest,
            balance_end,
        }
    }
}
