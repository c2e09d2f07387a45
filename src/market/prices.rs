//! Date-indexed share price series with backward fallback

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{SimError, SimResult};

/// Historical closing prices for the underlying fund, immutable for the
/// duration of a simulation run.
///
/// Quotes do not exist for every calendar date (weekends, holidays, gaps in
/// the export). `lookup` therefore answers with the most recent positive
/// quote on or before the queried date.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    prices: BTreeMap<NaiveDate, Decimal>,
}

impl PriceSeries {
    /// Build a series from (date, closing price) pairs.
    pub fn new(quotes: impl IntoIterator<Item = (NaiveDate, Decimal)>) -> Self {
        Self {
            prices: quotes.into_iter().collect(),
        }
    }

    /// Earliest date with any quote, if the series is non-empty.
    pub fn earliest_date(&self) -> Option<NaiveDate> {
        self.prices.keys().next().copied()
    }

    /// Price in force on `date`: the exact quote if one exists, otherwise
    /// the closest earlier positive quote. Zero quotes are treated as
    /// missing data. Fails only when no positive quote exists on or before
    /// `date`.
    pub fn lookup(&self, date: NaiveDate) -> SimResult<Decimal> {
        self.prices
            .range(..=date)
            .rev()
            .map(|(_, price)| *price)
            .find(|price| *price > Decimal::ZERO)
            .ok_or(SimError::PriceUnavailable { date })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::ymd;
    use rust_decimal_macros::dec;

    fn series() -> PriceSeries {
        PriceSeries::new([
            (ymd(2020, 1, 1), dec!(105)),
            (ymd(2020, 1, 3), dec!(0)),
            (ymd(2020, 1, 6), dec!(110)),
        ])
    }

    #[test]
    fn test_exact_quote() {
        assert_eq!(series().lookup(ymd(2020, 1, 6)).unwrap(), dec!(110));
    }

    #[test]
    fn test_falls_back_to_prior_quote() {
        // No quote on the 2nd; closest earlier is the 1st.
        assert_eq!(series().lookup(ymd(2020, 1, 2)).unwrap(), dec!(105));
    }

    #[test]
    fn test_zero_quote_is_skipped() {
        // The 3rd has a zero close; fall back past it to the 1st.
        assert_eq!(series().lookup(ymd(2020, 1, 4)).unwrap(), dec!(105));
    }

    #[test]
    fn test_before_earliest_is_an_error() {
        assert!(matches!(
            series().lookup(ymd(2019, 12, 31)),
            Err(SimError::PriceUnavailable { .. })
        ));
    }
}
