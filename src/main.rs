//! Mortgage Simulator CLI
//!
//! Runs the straight-amortization baseline and the two taxed fund
//! strategies over historical data and writes one CSV report per strategy.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use rust_decimal::Decimal;
use serde::Serialize;

use mortgage_sim::market::loader;
use mortgage_sim::simulation::{write_report, AmortizationSummary, FundSummary};
use mortgage_sim::{AccountKind, RunParameters, SimulationDriver};

#[derive(Parser)]
#[command(
    name = "mortgage_sim",
    about = "Compare straight amortization against taxed fund investment strategies"
)]
struct Args {
    /// Loan principal
    #[arg(long, default_value = "3000000")]
    loan: Decimal,

    /// Nominal annual interest rate as a fraction
    #[arg(long, default_value = "0.03")]
    rate: Decimal,

    /// First simulated month (YYYY-MM-DD)
    #[arg(long, default_value = "1990-03-01")]
    start: NaiveDate,

    /// Horizon in years
    #[arg(long, default_value_t = 30)]
    years: u32,

    /// Monthly amortization; defaults to principal / years / 12
    #[arg(long)]
    amortization: Option<Decimal>,

    /// Nasdaq share-price export file
    #[arg(long)]
    prices: PathBuf,

    /// SLR rate history CSV
    #[arg(long)]
    rates: PathBuf,

    /// Directory the three report CSVs are written to
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Print the run summary as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct RunSummary {
    mortgage: AmortizationSummary,
    insurance: FundSummary,
    direct: FundSummary,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let prices = loader::load_price_series(&args.prices)
        .with_context(|| format!("loading prices from {}", args.prices.display()))?;
    let rates = loader::load_rate_series(&args.rates)
        .with_context(|| format!("loading rates from {}", args.rates.display()))?;

    let driver = SimulationDriver::new(
        Arc::new(prices),
        Arc::new(rates),
        RunParameters {
            loan: args.loan,
            annual_rate: args.rate,
            start_date: args.start,
            years: args.years,
            amortization: args.amortization,
        },
    );

    let mortgage = driver.run_amortization();
    let insurance = driver
        .run_fund(AccountKind::Insurance)
        .context("insurance-account simulation failed")?;
    let direct = driver
        .run_fund(AccountKind::Direct)
        .context("direct-account simulation failed")?;

    write_report(&args.output_dir.join("mortgage.csv"), &mortgage.rows)?;
    write_report(&args.output_dir.join("insurance.csv"), &insurance.rows)?;
    write_report(&args.output_dir.join("direct.csv"), &direct.rows)?;

    let summary = RunSummary {
        mortgage: mortgage.summary(),
        insurance: insurance.summary(),
        direct: direct.summary(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Mortgage Simulator v0.1.0");
    println!("=========================\n");
    println!(
        "Loan {} at {} over {} years, amortizing {}/month",
        args.loan,
        args.rate,
        args.years,
        driver.params().monthly_amortization()
    );

    println!("\nStraight amortization ({} months):", summary.mortgage.months);
    println!("  Total interest paid: {}", summary.mortgage.total_interest_paid);
    println!("  Total paid:          {}", summary.mortgage.total_paid);
    println!("  Final debt:          {}", summary.mortgage.final_debt);

    for (name, s) in [("Insurance account", &summary.insurance), ("Direct account", &summary.direct)] {
        println!("\n{} ({} months):", name, s.months);
        println!("  Total interest paid: {}", s.total_interest_paid);
        println!("  Total deposited:     {}", s.total_deposited);
        println!("  Total tax paid:      {}", s.total_tax_paid);
        println!("  Final market value:  {}", s.final_market_value);
        println!("  After-tax value:     {}", s.final_liquidation_value);
    }

    println!("\nReports written to: {}", args.output_dir.display());
    Ok(())
}
