//! Date helpers
//!
//! Records carry dates as `dd.mm.yyyy` strings; Postgres hands back ISO
//! `yyyy-mm-dd` inside comma-joined aggregates. Display strings spell the
//! month out in the Russian genitive ("05 марта 2017 года").

use chrono::{Datelike, NaiveDate};

use crate::error::{EpdcError, Result};

/// Layout used by every record date field
pub const RU_DATE_FORMAT: &str = "%d.%m.%Y";

/// Layout Postgres uses when a `date` is cast to text
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

const GENITIVE_MONTHS: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// Parse a `dd.mm.yyyy` date.
pub fn parse_ru_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), RU_DATE_FORMAT)
        .map_err(|_| EpdcError::invalid_date(value, "dd.mm.yyyy"))
}

/// Render a date as `dd.mm.yyyy`.
pub fn format_ru_date(date: NaiveDate) -> String {
    date.format(RU_DATE_FORMAT).to_string()
}

/// Re-render an ISO `yyyy-mm-dd` date as `dd.mm.yyyy`.
///
/// Returns an empty string when the input does not parse.
pub fn iso_to_ru_date(value: &str) -> String {
    NaiveDate::parse_from_str(value.trim(), ISO_DATE_FORMAT)
        .map(format_ru_date)
        .unwrap_or_default()
}

/// Spell out a `dd.mm.yyyy` date, e.g. `"05 марта 2017 года"`.
///
/// Returns an empty string when the input does not parse.
pub fn month_string(value: &str) -> String {
    parse_ru_date(value)
        .map(month_string_for)
        .unwrap_or_default()
}

/// Spell out a parsed date, e.g. `"05 марта 2017 года"`.
pub fn month_string_for(date: NaiveDate) -> String {
    let month = GENITIVE_MONTHS[date.month0() as usize];
    format!("{:02} {} {:04} года", date.day(), month, date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ru_dates() {
        let date = parse_ru_date("12.05.2016").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2016, 5, 12).unwrap());
    }

    #[test]
    fn rejects_bad_ru_dates() {
        assert!(matches!(
            parse_ru_date("2016-05-12").unwrap_err(),
            EpdcError::InvalidDate { .. }
        ));
        assert!(parse_ru_date("31.02.2017").is_err());
        assert!(parse_ru_date("").is_err());
    }

    #[test]
    fn iso_to_ru() {
        assert_eq!(iso_to_ru_date("2016-05-12"), "12.05.2016");
        assert_eq!(iso_to_ru_date("12.05.2016"), "");
        assert_eq!(iso_to_ru_date(""), "");
    }

    #[test]
    fn month_strings() {
        assert_eq!(month_string("05.03.2017"), "05 марта 2017 года");
        assert_eq!(month_string("01.01.2000"), "01 января 2000 года");
        assert_eq!(month_string("31.12.1999"), "31 декабря 1999 года");
    }

    #[test]
    fn month_string_of_garbage_is_empty() {
        assert_eq!(month_string("not a date"), "");
        assert_eq!(month_string(""), "");
    }

    #[test]
    fn every_month_has_a_name() {
        for month in 1..=12 {
            let date = NaiveDate::from_ymd_opt(2020, month, 1).unwrap();
            let rendered = month_string_for(date);
            assert!(rendered.ends_with("2020 года"), "{rendered}");
            assert!(!rendered.contains("  "), "{rendered}");
        }
    }
}
