//! Calendar parsing for the fixed flat-file date formats.
//!
//! The persisted contract stores dates as `DD/MM/YYYY`, times as `HH:MM:SS`
//! and month-year inputs as `MM/YYYY`. These formats must round-trip
//! exactly, so everything that touches date text goes through this module.

use chrono::NaiveDate;

use crate::{EngineError, ResultEngine};

/// Calendar date pattern of the persisted files (`05/03/2024`).
pub const DATE_FORMAT: &str = "%d/%m/%Y";
/// Clock time pattern of the persisted files (`14:03:59`).
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Parses query or file text under [`DATE_FORMAT`].
pub fn parse_date(text: &str) -> ResultEngine<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|_| EngineError::InvalidDate(format!("expected DD/MM/YYYY, got {text:?}")))
}

/// Formats a date back into the canonical file spelling.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Aggregation bucket key: a calendar month.
///
/// Field order matters: the derived `Ord` compares `(year, month)`
/// lexicographically, which is exactly the inclusive month-range predicate
/// the aggregation relies on. Do not reorder the fields or replace the
/// comparison with day-level date arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl From<NaiveDate> for MonthKey {
    fn from(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

/// Parses month-year input text (`03/2024`) into a [`MonthKey`].
pub fn parse_month_year(text: &str) -> ResultEngine<MonthKey> {
    let invalid = || EngineError::InvalidDate(format!("expected MM/YYYY, got {text:?}"));

    let (month_text, year_text) = text.trim().split_once('/').ok_or_else(invalid)?;
    let month: u32 = month_text.trim().parse().map_err(|_| invalid())?;
    let year: i32 = year_text.trim().parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }

    Ok(MonthKey { year, month })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_text_round_trips() {
        let date = parse_date("05/03/2024").unwrap();
        assert_eq!(format_date(date), "05/03/2024");
    }

    #[test]
    fn short_spellings_are_normalized() {
        let date = parse_date("5/3/2024").unwrap();
        assert_eq!(format_date(date), "05/03/2024");
    }

    #[test]
    fn rejects_other_patterns() {
        assert!(parse_date("2024-03-05").is_err());
        assert!(parse_date("31/02/2024").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn month_keys_order_across_year_boundaries() {
        let dec = parse_month_year("12/2023").unwrap();
        let jan = parse_month_year("01/2024").unwrap();
        assert!(dec < jan);
        assert_eq!(jan, MonthKey::new(2024, 1));
    }

    #[test]
    fn month_year_rejects_out_of_range() {
        assert!(parse_month_year("13/2024").is_err());
        assert!(parse_month_year("0/2024").is_err());
        assert!(parse_month_year("march 2024").is_err());
    }
}
