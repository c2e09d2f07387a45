//! Government reference rate (SLR) as a date-indexed step function

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{SimError, SimResult};

/// A sorted sequence of (effective date, rate) pairs forming a step
/// function. Rates are fractions (0.03 = 3%), converted from percent at
/// load time. Immutable once constructed.
#[derive(Debug, Clone, Default)]
pub struct RateSeries {
    entries: Vec<(NaiveDate, Decimal)>,
}

impl RateSeries {
    /// Build a series from (effective date, fractional rate) pairs. Entries
    /// are sorted by date; on duplicate dates the last value wins.
    pub fn new(entries: impl IntoIterator<Item = (NaiveDate, Decimal)>) -> Self {
        let mut entries: Vec<_> = entries.into_iter().collect();
        entries.sort_by_key(|(date, _)| *date);
        entries.dedup_by_key(|(date, _)| *date);
        Self { entries }
    }

    /// Rate in force on `date`: the value attached to the latest entry
    /// whose effective date is `<= date`.
    ///
    /// Querying before the first entry, or past the last entry, is an
    /// explicit error. The legacy lookup silently produced nothing past the
    /// series end; this implementation refuses to extrapolate instead.
    pub fn rate_effective_on(&self, date: NaiveDate) -> SimResult<Decimal> {
        let pos = self.entries.partition_point(|(effective, _)| *effective <= date);
        if pos == 0 {
            return Err(SimError::RateUnavailable { date });
        }
        if pos == self.entries.len() {
            // `date` is at or past the final entry. The final entry itself
            // is still answerable; anything later is exhaustion.
            let (last, rate) = self.entries[pos - 1];
            if date > last {
                return Err(SimError::RateSeriesExhausted { date, last });
            }
            return Ok(rate);
        }
        Ok(self.entries[pos - 1].1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::ymd;
    use rust_decimal_macros::dec;

    fn series() -> RateSeries {
        RateSeries::new([
            (ymd(2018, 11, 30), dec!(0.0051)),
            (ymd(2019, 11, 30), dec!(-0.0009)),
            (ymd(2020, 11, 30), dec!(-0.0010)),
        ])
    }

    #[test]
    fn test_step_function_lookup() {
        let s = series();
        assert_eq!(s.rate_effective_on(ymd(2018, 11, 30)).unwrap(), dec!(0.0051));
        assert_eq!(s.rate_effective_on(ymd(2019, 6, 1)).unwrap(), dec!(0.0051));
        assert_eq!(s.rate_effective_on(ymd(2019, 11, 30)).unwrap(), dec!(-0.0009));
        assert_eq!(s.rate_effective_on(ymd(2020, 11, 30)).unwrap(), dec!(-0.0010));
    }

    #[test]
    fn test_before_first_entry_is_an_error() {
        assert!(matches!(
            series().rate_effective_on(ymd(2018, 11, 29)),
            Err(SimError::RateUnavailable { .. })
        ));
    }

    #[test]
    fn test_past_last_entry_is_exhaustion() {
        assert!(matches!(
            series().rate_effective_on(ymd(2020, 12, 1)),
            Err(SimError::RateSeriesExhausted { .. })
        ));
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let s = RateSeries::new([
            (ymd(2020, 11, 30), dec!(0.02)),
            (ymd(2018, 11, 30), dec!(0.01)),
        ]);
        assert_eq!(s.rate_effective_on(ymd(2019, 1, 1)).unwrap(), dec!(0.01));
    }
}
