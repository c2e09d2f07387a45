//! Error taxonomy for the simulation engine
//!
//! Invariant violations are fatal and abort the run; data gaps in the price
//! series are handled by fallback inside `PriceSeries` and only surface as
//! errors when no earlier quote exists at all.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// All failure modes of a simulation run.
#[derive(Debug, Error)]
pub enum SimError {
    /// `deposit`/`withdraw` called with a negative amount.
    #[error("negative cash amount {amount} passed to {operation}")]
    NegativeCashAmount {
        operation: &'static str,
        amount: Decimal,
    },

    /// Buying shares would cost more than the cash held in the account.
    #[error("purchase of {count} shares costs {cost} but only {available} is available")]
    InsufficientCash {
        count: u64,
        cost: Decimal,
        available: Decimal,
    },

    /// Withdrawing more cash than the account holds.
    #[error("withdrawal of {requested} exceeds available cash {available}")]
    WithdrawalExceedsCash {
        requested: Decimal,
        available: Decimal,
    },

    /// Selling more shares than the account holds.
    #[error("cannot sell {requested} shares, only {held} held")]
    InsufficientShares { requested: u64, held: u64 },

    /// A scheduled tax deduction exceeds the cash available at settlement.
    #[error("tax deduction {due} exceeds available cash {available} on {date}")]
    TaxSettlementShortfall {
        due: Decimal,
        available: Decimal,
        date: NaiveDate,
    },

    /// The scheduled tax deduction went negative, or a quarterly delta
    /// came out negative. Indicates a modeling inconsistency.
    #[error("negative tax deduction {amount} on {date}")]
    NegativeTaxDeduction { amount: Decimal, date: NaiveDate },

    /// No share price on record on or before the queried date.
    #[error("no share price on record on or before {date}")]
    PriceUnavailable { date: NaiveDate },

    /// Rate queried before the first entry of the rate series.
    #[error("no rate on record on or before {date}")]
    RateUnavailable { date: NaiveDate },

    /// Rate queried past the last entry of the rate series. The legacy
    /// behavior here was undefined; we refuse to extrapolate.
    #[error("rate series ends at {last} but {date} was queried")]
    RateSeriesExhausted { date: NaiveDate, last: NaiveDate },

    /// A monetary quantity could not be converted to a whole share count.
    #[error("cannot derive a whole share count from amount {amount} at price {price}")]
    ShareCount { amount: Decimal, price: Decimal },

    /// Input file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV in an input or output file.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Unparseable field in an input file.
    #[error("cannot parse {what} from {value:?}")]
    Parse { what: &'static str, value: String },
}

/// Convenience alias used throughout the crate.
pub type SimResult<T> = Result<T, SimError>;
