//! Per-month output rows, run results and the CSV report sink

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SimResult;

/// One month of the straight-amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub date: NaiveDate,
    pub interest: Decimal,
    pub interest_after_deduction: Decimal,
    pub remaining_debt: Decimal,
    pub total_interest_paid: Decimal,
    pub total_amortized: Decimal,
    pub total_paid: Decimal,
    pub capital_minus_total_paid: Decimal,
}

/// One month of a fund-account strategy run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundRow {
    pub date: NaiveDate,
    pub share_price: Decimal,
    /// Cash moved into (positive) or out of (negative) the account.
    pub cash_flow: Decimal,
    /// Shares bought (positive) or sold (negative) this month.
    pub shares_traded: i64,
    pub shares_held: u64,
    pub cash: Decimal,
    pub market_value: Decimal,
    /// Tax scheduled for settlement at the next month entry.
    pub due_tax: Decimal,
    pub total_tax_paid: Decimal,
    pub total_interest_paid: Decimal,
    pub total_deposited: Decimal,
    pub total_outlay: Decimal,
    /// Value after selling everything and paying 30% capital gains tax.
    pub liquidation_value: Decimal,
}

/// Complete straight-amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub rows: Vec<AmortizationRow>,
}

/// Summary of an amortization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSummary {
    pub months: usize,
    pub total_interest_paid: Decimal,
    pub total_amortized: Decimal,
    pub total_paid: Decimal,
    pub final_debt: Decimal,
}

impl AmortizationResult {
    pub fn summary(&self) -> AmortizationSummary {
        let last = self.rows.last();
        AmortizationSummary {
            months: self.rows.len(),
            total_interest_paid: last.map(|r| r.total_interest_paid).unwrap_or_default(),
            total_amortized: last.map(|r| r.total_amortized).unwrap_or_default(),
            total_paid: last.map(|r| r.total_paid).unwrap_or_default(),
            final_debt: last.map(|r| r.remaining_debt).unwrap_or_default(),
        }
    }
}

/// Complete fund-strategy run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundResult {
    pub rows: Vec<FundRow>,
}

/// Summary of a fund-strategy run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundSummary {
    pub months: usize,
    pub total_interest_paid: Decimal,
    pub total_deposited: Decimal,
    pub total_tax_paid: Decimal,
    pub final_market_value: Decimal,
    pub final_liquidation_value: Decimal,
}

impl FundResult {
    pub fn summary(&self) -> FundSummary {
        let last = self.rows.last();
        FundSummary {
            months: self.rows.len(),
            total_interest_paid: last.map(|r| r.total_interest_paid).unwrap_or_default(),
            total_deposited: last.map(|r| r.total_deposited).unwrap_or_default(),
            total_tax_paid: last.map(|r| r.total_tax_paid).unwrap_or_default(),
            final_market_value: last.map(|r| r.market_value).unwrap_or_default(),
            final_liquidation_value: last.map(|r| r.liquidation_value).unwrap_or_default(),
        }
    }
}

/// Write one header row followed by one row per simulated month.
pub fn write_report<R: Serialize>(path: &Path, rows: &[R]) -> SimResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::ymd;
    use rust_decimal_macros::dec;

    #[test]
    fn test_write_report_emits_header_and_rows() {
        let rows = vec![AmortizationRow {
            date: ymd(2020, 1, 25),
            interest: dec!(3000.00),
            interest_after_deduction: dec!(2100.00),
            remaining_debt: dec!(1150000),
            total_interest_paid: dec!(3000.00),
            total_amortized: dec!(50000.00),
            total_paid: dec!(53000.00),
            capital_minus_total_paid: dec!(-1203000.00),
        }];

        let path = std::env::temp_dir().join("mortgage_sim_report_test.csv");
        write_report(&path, &rows).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let mut lines = written.lines();
        assert!(lines.next().unwrap().starts_with("date,interest,"));
        assert!(lines.next().unwrap().starts_with("2020-01-25,3000.00,"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_empty_result_summary() {
        let result = FundResult { rows: vec![] };
        assert_eq!(result.summary().months, 0);
        assert_eq!(result.summary().total_deposited, dec!(0));
    }
}
