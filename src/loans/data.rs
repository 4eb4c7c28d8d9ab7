//! Loan repayment records matching the scheduled/actual CSV layouts

use serde::{Deserialize, Serialize};

/// Loan identifier, kept opaque so numeric and alphanumeric IDs both load
pub type LoanId = String;

/// One scheduled loan-month (scheduled_loan_repayments.csv)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledRepayment {
    #[serde(rename = "LoanID")]
    pub loan_id: LoanId,

    /// Month of the loan term, 1-based
    #[serde(rename = "Month")]
    pub month: u32,

    #[serde(rename = "ScheduledRepayment")]
    pub scheduled_repayment: f64,

    /// Original principal, repeated on every month of the loan
    #[serde(rename = "LoanAmount")]
    pub loan_amount: f64,
}

/// One observed loan-month (actual_loan_repayments.csv)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActualRepayment {
    #[serde(rename = "LoanID")]
    pub loan_id: LoanId,

    #[serde(rename = "Month")]
    pub month: u32,

    #[serde(rename = "ActualRepayment")]
    pub actual_repayment: f64,

    /// Portion of the payment that prepaid principal ahead of schedule
    #[serde(rename = "UnscheduledPrincipal")]
    pub unscheduled_principal: f64,
}

/// Scheduled and actual figures for the same loan-month
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRepayment {
    pub loan_id: LoanId,
    pub month: u32,
    pub scheduled_repayment: f64,
    pub actual_repayment: f64,
    pub unscheduled_principal: f64,
    pub loan_amount: f64,
}
