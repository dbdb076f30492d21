//! Null-value conversions
//!
//! Directory records carry plain values: an empty string, a zero id or an
//! empty date string all mean "not set". The database stores those as NULL.
//! Outbound helpers turn plain values into bind parameters, inbound helpers
//! flatten scanned `Option`s back into plain values.
//!
//! List queries fold one-to-many relations into a single column with
//! `array_to_string(array_agg(DISTINCT x), ',')`; the `split_*` helpers undo
//! that.

use chrono::NaiveDate;

use crate::dates::{format_ru_date, iso_to_ru_date, parse_ru_date};

/// Separator used by the aggregate columns
pub const JOIN_SEPARATOR: char = ',';

// ---------------------------------------------------------------------------
// Outbound: plain value -> bind parameter
// ---------------------------------------------------------------------------

/// `""` binds as NULL.
pub fn text_or_null(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// `0` binds as NULL.
pub fn id_or_null(value: i64) -> Option<i64> {
    if value == 0 {
        None
    } else {
        Some(value)
    }
}

/// A `dd.mm.yyyy` string binds as a date; unparseable input and the zero
/// date `01.01.0001` bind as NULL.
pub fn ru_date_or_null(value: &str) -> Option<NaiveDate> {
    let date = parse_ru_date(value).ok()?;
    // 01.01.0001 is what an unset date field renders as
    if NaiveDate::from_ymd_opt(1, 1, 1) == Some(date) {
        return None;
    }
    Some(date)
}

// ---------------------------------------------------------------------------
// Inbound: scanned column -> plain value
// ---------------------------------------------------------------------------

/// NULL text reads as `""`.
pub fn text(value: Option<String>) -> String {
    value.unwrap_or_default()
}

/// NULL ids read as `0`.
pub fn id(value: Option<i64>) -> i64 {
    value.unwrap_or_default()
}

/// NULL flags read as `false`.
pub fn flag(value: Option<bool>) -> bool {
    value.unwrap_or_default()
}

/// NULL dates read as `""`, others render `dd.mm.yyyy`.
pub fn ru_date(value: Option<NaiveDate>) -> String {
    value.map(format_ru_date).unwrap_or_default()
}

/// Split an aggregate column into its values.
///
/// NULL and `""` (a LEFT JOIN with no matches) give an empty list.
pub fn split_joined(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(JOIN_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Split an aggregate of ISO dates, re-rendering each as `dd.mm.yyyy`.
///
/// Segments that fail to parse come back as `""` so positions line up with
/// the source aggregate.
pub fn split_joined_dates(value: Option<&str>) -> Vec<String> {
    split_joined(value)
        .iter()
        .map(|s| iso_to_ru_date(s))
        .collect()
}

/// Split an aggregate of integers. Segments that are not valid `i64` are
/// skipped.
pub fn split_joined_numbers(value: Option<&str>) -> Vec<i64> {
    split_joined(value)
        .iter()
        .filter_map(|s| s.parse::<i64>().ok())
        .collect()
}

/// Membership test used when reconciling stored numbers.
pub fn contains_id(needle: i64, haystack: &[i64]) -> bool {
    haystack.iter().any(|&v| v == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outbound_text() {
        assert_eq!(text_or_null(""), None);
        assert_eq!(text_or_null("ООО Ромашка"), Some("ООО Ромашка"));
        assert_eq!(text_or_null(" "), Some(" "));
    }

    #[test]
    fn outbound_ids() {
        assert_eq!(id_or_null(0), None);
        assert_eq!(id_or_null(42), Some(42));
        assert_eq!(id_or_null(-1), Some(-1));
    }

    #[test]
    fn outbound_dates() {
        assert_eq!(
            ru_date_or_null("12.05.2016"),
            NaiveDate::from_ymd_opt(2016, 5, 12)
        );
        assert_eq!(ru_date_or_null("01.01.0001"), None);
        assert_eq!(ru_date_or_null(""), None);
        assert_eq!(ru_date_or_null("2016-05-12"), None);
    }

    #[test]
    fn inbound_defaults() {
        assert_eq!(text(None), "");
        assert_eq!(text(Some("x".into())), "x");
        assert_eq!(id(None), 0);
        assert_eq!(id(Some(7)), 7);
        assert!(!flag(None));
        assert!(flag(Some(true)));
        assert_eq!(ru_date(None), "");
        assert_eq!(
            ru_date(NaiveDate::from_ymd_opt(2001, 9, 3)),
            "03.09.2001"
        );
    }

    #[test]
    fn split_empty_aggregate() {
        assert!(split_joined(None).is_empty());
        assert!(split_joined(Some("")).is_empty());
        assert!(split_joined(Some(",")).is_empty());
    }

    #[test]
    fn split_values() {
        assert_eq!(
            split_joined(Some("a@b.ru,c@d.ru")),
            vec!["a@b.ru".to_string(), "c@d.ru".to_string()]
        );
    }

    #[test]
    fn split_dates() {
        assert_eq!(
            split_joined_dates(Some("2016-05-12,2017-01-31")),
            vec!["12.05.2016".to_string(), "31.01.2017".to_string()]
        );
        assert_eq!(split_joined_dates(Some("junk")), vec![String::new()]);
    }

    #[test]
    fn split_numbers_skips_garbage() {
        assert_eq!(
            split_joined_numbers(Some("4951234567,abc,84950001122")),
            vec![4951234567, 84950001122]
        );
    }

    #[test]
    fn membership() {
        assert!(contains_id(3, &[1, 2, 3]));
        assert!(!contains_id(4, &[1, 2, 3]));
        assert!(!contains_id(0, &[]));
    }
}
