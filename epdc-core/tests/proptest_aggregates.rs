//! Property tests for the comma-joined aggregate helpers

use epdc_core::nulls::{split_joined, split_joined_dates, split_joined_numbers};
use proptest::prelude::*;

proptest! {
    /// Whatever Postgres hands back, splitting never yields empty segments
    #[test]
    fn split_never_yields_empty_segments(raw in "[a-z0-9@., ]{0,64}") {
        for part in split_joined(Some(&raw)) {
            prop_assert!(!part.is_empty());
            prop_assert!(!part.contains(','));
        }
    }

    /// Phone aggregates built from i64 values come back in order
    #[test]
    fn numbers_survive_aggregation(values in prop::collection::vec(any::<i64>(), 0..16)) {
        let joined = values
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",");
        prop_assert_eq!(split_joined_numbers(Some(&joined)), values);
    }

    /// Date aggregates keep one entry per segment
    #[test]
    fn date_split_keeps_positions(
        days in prop::collection::vec((1990i32..2030, 1u32..=12, 1u32..=28), 1..8)
    ) {
        let joined = days
            .iter()
            .map(|(y, m, d)| format!("{y:04}-{m:02}-{d:02}"))
            .collect::<Vec<_>>()
            .join(",");
        let rendered = split_joined_dates(Some(&joined));
        prop_assert_eq!(rendered.len(), days.len());
        for ((y, m, d), out) in days.iter().zip(rendered) {
            prop_assert_eq!(out, format!("{d:02}.{m:02}.{y:04}"));
        }
    }
}

#[test]
fn null_aggregate_is_empty() {
    assert!(split_joined(None).is_empty());
    assert!(split_joined_numbers(None).is_empty());
    assert!(split_joined_dates(None).is_empty());
}
