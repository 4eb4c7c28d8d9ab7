//! Export the enriched loan balance table
//!
//! Writes one row per loan-month with opening/closing balance and interest,
//! followed by a month-by-month portfolio summary on stdout.

use anyhow::{Context, Result};
use loan_analytics::{calculate_balances, loans::resolve_data_dir, LoanDataset};
use std::env;
use std::path::PathBuf;
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::init();

    let start = Instant::now();
    let mut args = env::args().skip(1);
    let output_path = args.next().unwrap_or_else(|| "loan_balances.csv".to_string());
    let data_dir = args.next().map(PathBuf::from);

    let cwd = env::current_dir().context("reading working directory")?;
    let dir = resolve_data_dir(data_dir.as_deref(), &cwd)?;
    println!("Loading repayments from {}...", dir.display());

    let dataset = LoanDataset::load_from_dir(&dir)
        .with_context(|| format!("loading repayments from {}", dir.display()))?;
    let table = calculate_balances(&dataset).context("building loan balances")?;
    println!(
        "Built {} rows for {} loans in {:?}",
        table.len(),
        table.loan_count(),
        start.elapsed()
    );

    table
        .write_csv_path(&output_path)
        .with_context(|| format!("writing {}", output_path))?;
    println!("Output written to {}", output_path);

    println!("\n{:>5} {:>6} {:>14} {:>14} {:>12} {:>12}", "Month", "Loans", "BOP Balance", "EOP Balance", "Interest", "Unsched");
    println!("{}", "-".repeat(68));
    for row in table.by_month() {
        println!(
            "{:>5} {:>6} {:>14.2} {:>14.2} {:>12.2} {:>12.2}",
            row.month,
            row.loans,
            row.total_balance_start,
            row.total_balance_end,
            row.total_interest,
            row.total_unscheduled_principal,
        );
    }

    Ok(())
}
