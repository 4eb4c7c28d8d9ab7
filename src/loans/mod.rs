//! Loan repayment records, CSV loading and the schedule/actual merge

mod data;
mod merge;
pub mod loader;

pub use data::{ActualRepayment, LoanId, MergedRepayment, ScheduledRepayment};
pub use merge::merge_repayments;
pub use loader::{
    load_actual, load_actual_from_reader, load_scheduled, load_scheduled_from_reader,
    resolve_data_dir, LoanDataset,
};
