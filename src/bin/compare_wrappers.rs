//! Side-by-side comparison of the three tax wrappers
//!
//! Runs the same parameters through the Basic, Direct and Insurance
//! wrappers and prints one summary line per wrapper.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use rust_decimal::Decimal;

use mortgage_sim::market::loader;
use mortgage_sim::{AccountKind, RunParameters, SimulationDriver};

#[derive(Parser)]
#[command(name = "compare_wrappers", about = "Compare tax wrappers on identical runs")]
struct Args {
    #[arg(long, default_value = "3000000")]
    loan: Decimal,

    #[arg(long, default_value = "0.03")]
    rate: Decimal,

    #[arg(long, default_value = "1990-03-01")]
    start: NaiveDate,

    #[arg(long, default_value_t = 30)]
    years: u32,

    #[arg(long)]
    prices: PathBuf,

    #[arg(long)]
    rates: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let prices = Arc::new(
        loader::load_price_series(&args.prices)
            .with_context(|| format!("loading prices from {}", args.prices.display()))?,
    );
    let rates = Arc::new(
        loader::load_rate_series(&args.rates)
            .with_context(|| format!("loading rates from {}", args.rates.display()))?,
    );

    let driver = SimulationDriver::new(
        prices,
        rates,
        RunParameters {
            loan: args.loan,
            annual_rate: args.rate,
            start_date: args.start,
            years: args.years,
            amortization: None,
        },
    );

    println!(
        "{:<12} {:>16} {:>14} {:>16} {:>16}",
        "Wrapper", "Deposited", "Tax paid", "Market value", "After-tax value"
    );
    println!("{}", "-".repeat(78));

    for (name, kind) in [
        ("Basic", AccountKind::Basic),
        ("Direct", AccountKind::Direct),
        ("Insurance", AccountKind::Insurance),
    ] {
        let summary = driver
            .run_fund(kind)
            .with_context(|| format!("{name} simulation failed"))?
            .summary();
        println!(
            "{:<12} {:>16} {:>14} {:>16} {:>16}",
            name,
            summary.total_deposited,
            summary.total_tax_paid,
            summary.final_market_value,
            summary.final_liquidation_value
        );
    }

    Ok(())
}
