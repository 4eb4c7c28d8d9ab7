//! Loan Analytics CLI
//!
//! Loads the scheduled and actual repayment files, builds the balance table
//! and reports the portfolio default, prepayment and loss metrics.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use loan_analytics::{
    loans::{loader, merge_repayments, resolve_data_dir},
    metrics::{DEFAULT_RECOVERY_RATE, DEFAULT_TYPE_2_THRESHOLD},
    BalanceBuilder, BalanceConfig, ExposureBasis, LoanDataset, LossConfig, MetricsConfig,
    PortfolioMetrics,
};
use std::path::PathBuf;

/// Default, prepayment and loss metrics for a two-year loan book
#[derive(Parser, Debug)]
#[command(name = "loan_analytics")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the two repayment CSVs (default: data/ or Task_2/data/)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Scheduled repayments CSV, overrides --data-dir
    #[arg(long)]
    scheduled: Option<PathBuf>,

    /// Actual repayments CSV, overrides --data-dir
    #[arg(long)]
    actual: Option<PathBuf>,

    /// Nominal annual interest rate
    #[arg(long, default_value_t = 0.10)]
    annual_rate: f64,

    /// Unpaid fraction of the year's scheduled total that marks a type 2 default
    #[arg(long, default_value_t = DEFAULT_TYPE_2_THRESHOLD)]
    type2_threshold: f64,

    /// Loan year assessed for type 2 defaults
    #[arg(long, default_value_t = 1)]
    default_year: u32,

    /// Loan year the loss is predicted for
    #[arg(long, default_value_t = 2)]
    loss_year: u32,

    #[arg(long, default_value_t = DEFAULT_RECOVERY_RATE)]
    recovery_rate: f64,

    /// Balances making up the exposure at default
    #[arg(long, value_enum, default_value = "year-month-ends")]
    exposure: Exposure,

    /// Emit JSON instead of a text report
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Exposure {
    YearMonthEnds,
    PriorYearClose,
}

impl From<Exposure> for ExposureBasis {
    fn from(value: Exposure) -> Self {
        match value {
            Exposure::YearMonthEnds => ExposureBasis::YearMonthEnds,
            Exposure::PriorYearClose => ExposureBasis::PriorYearClose,
        }
    }
}

impl Cli {
    fn balance_config(&self) -> BalanceConfig {
        BalanceConfig {
            annual_rate: self.annual_rate,
            ..Default::default()
        }
    }

    fn metrics_config(&self) -> MetricsConfig {
        MetricsConfig {
            default_year: self.default_year,
            type_2_threshold: self.type2_threshold,
            loss: LossConfig {
                recovery_rate: self.recovery_rate,
                year: self.loss_year,
                exposure: self.exposure.into(),
            },
        }
    }
}

fn load(cli: &Cli) -> Result<LoanDataset> {
    let dir = match (&cli.scheduled, &cli.actual) {
        (Some(_), Some(_)) => None,
        _ => {
            let cwd = std::env::current_dir().context("reading working directory")?;
            Some(resolve_data_dir(cli.data_dir.as_deref(), &cwd)?)
        }
    };

    let scheduled = cli
        .scheduled
        .clone()
        .or_else(|| dir.as_ref().map(|d| d.join(loader::SCHEDULED_FILE)))
        .context("no scheduled repayments file")?;
    let actual = cli
        .actual
        .clone()
        .or_else(|| dir.as_ref().map(|d| d.join(loader::ACTUAL_FILE)))
        .context("no actual repayments file")?;

    LoanDataset::load_from_paths(&scheduled, &actual)
        .with_context(|| format!("loading {} and {}", scheduled.display(), actual.display()))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let dataset = load(&cli)?;

    let merged = merge_repayments(&dataset.scheduled, &dataset.actual)
        .context("merging scheduled and actual repayments")?;
    let table = BalanceBuilder::new(cli.balance_config())
        .build(&merged)
        .context("building loan balances")?;

    let config = cli.metrics_config();
    let report = PortfolioMetrics::compute(&table, &config).context("computing portfolio metrics")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Loan Analytics v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");
    println!("Loans: {} ({} loan-months)", report.loan_count, report.loan_months);
    println!();
    println!("  Type 1 default rate:        {:>10.4}%", report.type_1_default_rate);
    println!(
        "  Type 2 default rate (Y{}):   {:>10.4}%",
        config.default_year, report.type_2_default_rate
    );
    println!("  Portfolio CPR:              {:>10.4}%", report.cpr);
    println!(
        "  Predicted loss (Y{}):        {:>10.2}",
        config.loss.year, report.predicted_loss
    );

    Ok(())
}
