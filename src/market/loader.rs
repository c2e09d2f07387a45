//! Loaders for the historical input files
//!
//! Two formats are supported:
//! - The Nasdaq share-price export: a `sep=;` preamble followed by
//!   semicolon-separated values in records of seven fields (date first,
//!   closing price fourth), with commas as thousands separators. Not
//!   actually CSV, so it is parsed by hand.
//! - The SLR rate history: a real CSV with a header row, a date column in
//!   one of two historical formats (`m/d/yyyy` or `yyyy/m/d`) and the rate
//!   as a percentage.

use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;

use super::{PriceSeries, RateSeries};
use crate::error::{SimError, SimResult};

/// Number of fields per record in the Nasdaq export.
const PRICE_RECORD_FIELDS: usize = 7;

/// Load the share-price series from a Nasdaq export file.
pub fn load_price_series(path: &Path) -> SimResult<PriceSeries> {
    parse_price_export(&fs::read_to_string(path)?)
}

/// Load the SLR rate series from a CSV file. Percent values are converted
/// to fractions here so [`RateSeries`] always answers in fractions.
pub fn load_rate_series(path: &Path) -> SimResult<RateSeries> {
    parse_rate_csv(fs::File::open(path)?)
}

/// Parse the semicolon-separated price export.
pub fn parse_price_export(raw: &str) -> SimResult<PriceSeries> {
    let fields: Vec<&str> = raw.split(';').collect();
    // Drop the "sep=" preamble token, then the header record.
    let records = fields
        .iter()
        .skip(1)
        .map(|f| f.trim())
        .collect::<Vec<_>>();

    let mut quotes = Vec::new();
    for record in records.chunks(PRICE_RECORD_FIELDS).skip(1) {
        if record.len() < 4 {
            break;
        }
        let date = match parse_iso_date(record[0]) {
            Some(date) => date,
            None => {
                warn!("skipping price record with unparseable date {:?}", record[0]);
                continue;
            }
        };
        let closing = record[3].replace(',', "");
        match closing.parse::<Decimal>() {
            Ok(price) => quotes.push((date, price)),
            Err(_) => warn!("skipping price for {}: cannot parse {:?}", date, record[3]),
        }
    }

    Ok(PriceSeries::new(quotes))
}

/// Parse the SLR rate CSV from any reader.
pub fn parse_rate_csv<R: Read>(reader: R) -> SimResult<RateSeries> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut entries = Vec::new();

    for result in reader.records() {
        let record = result?;
        let date_field = record.get(0).unwrap_or("").trim();
        let rate_field = record.get(1).unwrap_or("").trim();

        let date = parse_rate_date(date_field).ok_or_else(|| SimError::Parse {
            what: "rate effective date",
            value: date_field.to_string(),
        })?;
        let percent: Decimal = rate_field.parse().map_err(|_| SimError::Parse {
            what: "rate percentage",
            value: rate_field.to_string(),
        })?;
        entries.push((date, percent / Decimal::from(100)));
    }

    Ok(RateSeries::new(entries))
}

/// Leading `yyyy-mm-dd` of a price record's date field.
fn parse_iso_date(field: &str) -> Option<NaiveDate> {
    let head = field.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// The rate history mixes `m/d/yyyy` and `yyyy/m/d` date formats.
fn parse_rate_date(field: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(field, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(field, "%Y/%m/%d"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::ymd;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_price_export() {
        let raw = "sep=;Date;Bid;Ask;Closing price;High;Low;Volume;\
                   2022-03-09;1;2;2,230.25;3;4;5;\
                   2022-03-10;1;2;2,241.50;3;4;5";
        let series = parse_price_export(raw).unwrap();
        assert_eq!(series.lookup(ymd(2022, 3, 9)).unwrap(), dec!(2230.25));
        assert_eq!(series.lookup(ymd(2022, 3, 10)).unwrap(), dec!(2241.50));
    }

    #[test]
    fn test_price_export_skips_bad_closing() {
        let raw = "sep=;Date;Bid;Ask;Closing price;High;Low;Volume;\
                   2022-03-09;1;2;n/a;3;4;5;\
                   2022-03-10;1;2;100;3;4;5";
        let series = parse_price_export(raw).unwrap();
        assert!(series.lookup(ymd(2022, 3, 9)).is_err());
        assert_eq!(series.lookup(ymd(2022, 3, 10)).unwrap(), dec!(100));
    }

    #[test]
    fn test_parse_rate_csv_both_date_formats() {
        let raw = "Date,Rate,Comment\n11/30/2018,0.51,x\n2019/11/30,-0.09,y\n";
        let series = parse_rate_csv(raw.as_bytes()).unwrap();
        assert_eq!(
            series.rate_effective_on(ymd(2018, 11, 30)).unwrap(),
            dec!(0.0051)
        );
        assert_eq!(
            series.rate_effective_on(ymd(2019, 11, 30)).unwrap(),
            dec!(-0.0009)
        );
    }

    #[test]
    fn test_parse_rate_csv_rejects_bad_date() {
        let raw = "Date,Rate,Comment\nnot-a-date,0.51,x\n";
        assert!(matches!(
            parse_rate_csv(raw.as_bytes()),
            Err(SimError::Parse { .. })
        ));
    }
}
