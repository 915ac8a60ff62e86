//! As-of date recovery.
//!
//! Candidates look like `03/10/2025` or `3-10-2025`. Month-first is tried
//! before day-first; the first reading that is a real calendar date wins.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::strategies;
use crate::types::{DateStrategy, ResolvedDate};

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})([/-])(\d{1,2})([/-])(\d{4})").expect("valid regex")
});

/// Labels that usually sit next to the report's cut-off date.
pub const DATE_LABELS: &[&str] = &["fecha", "corte", "actualiz"];

/// Valid dates in `text`, in order of appearance.
///
/// Candidates with mixed separators or touching further digits are dropped
/// before any format is tried.
#[must_use]
pub fn dates_in(text: &str) -> Vec<NaiveDate> {
    let bytes = text.as_bytes();
    DATE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let digit_before = whole
                .start()
                .checked_sub(1)
                .and_then(|i| bytes.get(i))
                .is_some_and(u8::is_ascii_digit);
            let digit_after = bytes.get(whole.end()).is_some_and(u8::is_ascii_digit);
            if digit_before || digit_after || caps[2] != caps[4] {
                return None;
            }
            let first: u32 = caps[1].parse().ok()?;
            let second: u32 = caps[3].parse().ok()?;
            let year: i32 = caps[5].parse().ok()?;
            NaiveDate::from_ymd_opt(year, first, second)
                .or_else(|| NaiveDate::from_ymd_opt(year, second, first))
        })
        .collect()
}

fn first_date(text: &str) -> Option<NaiveDate> {
    dates_in(text).into_iter().next()
}

fn label_proximity(lines: &[&str], lookahead: usize) -> Option<NaiveDate> {
    lines.iter().enumerate().find_map(|(idx, line)| {
        let labelled = DATE_LABELS
            .iter()
            .any(|label| strategies::after_label(line, label).is_some());
        if !labelled {
            return None;
        }
        first_date(line).or_else(|| {
            lines
                .iter()
                .skip(idx + 1)
                .take(lookahead)
                .find_map(|next| first_date(next))
        })
    })
}

fn aggregate_window(lines: &[&str], aggregate_labels: &[String], window: usize) -> Option<NaiveDate> {
    let start = lines.iter().position(|line| {
        aggregate_labels
            .iter()
            .any(|label| strategies::after_label(line, label).is_some())
    })?;
    lines
        .iter()
        .skip(start)
        .take(window)
        .find_map(|line| first_date(line))
}

/// Runs the date cascade: label proximity, then the window opened by the
/// first aggregate label, then the first date anywhere.
#[must_use]
pub fn resolve_as_of(
    lines: &[&str],
    aggregate_labels: &[String],
    lookahead: usize,
    window: usize,
) -> Option<ResolvedDate> {
    let cascade: [(DateStrategy, &dyn Fn() -> Option<NaiveDate>); 3] = [
        (DateStrategy::LabelProximity, &|| label_proximity(lines, lookahead)),
        (DateStrategy::AggregateWindow, &|| {
            aggregate_window(lines, aggregate_labels, window)
        }),
        (DateStrategy::FirstInDocument, &|| {
            lines.iter().find_map(|line| first_date(line))
        }),
    ];

    cascade.iter().find_map(|(strategy, run)| {
        let date = run()?;
        tracing::debug!(?strategy, %date, "as-of date resolved");
        Some(ResolvedDate {
            date,
            strategy: *strategy,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn labels() -> Vec<String> {
        vec!["Parqueaderos".to_string(), "Peajes".to_string()]
    }

    #[test]
    fn month_first_then_day_first() {
        assert_eq!(dates_in("03/10/2025"), vec![ymd(2025, 3, 10)]);
        assert_eq!(dates_in("25/09/2025"), vec![ymd(2025, 9, 25)]);
        assert_eq!(dates_in("9-26-2025"), vec![ymd(2025, 9, 26)]);
    }

    #[test]
    fn impossible_dates_are_rejected() {
        assert!(dates_in("31/31/2025").is_empty());
        assert!(dates_in("02/30/2025").is_empty());
    }

    #[test]
    fn mixed_separators_are_rejected() {
        assert!(dates_in("03/10-2025").is_empty());
    }

    #[test]
    fn dates_inside_longer_digit_runs_are_rejected() {
        assert!(dates_in("103/10/2025").is_empty());
        assert!(dates_in("03/10/20251").is_empty());
        assert!(dates_in("ref 12345/10/2025").is_empty());
    }

    #[test]
    fn labelled_date_beats_earlier_unlabelled_one() {
        let lines = ["01/02/2024", "Parqueaderos", "5", "Fecha de corte", "09/26/2025"];
        let resolved = resolve_as_of(&lines, &labels(), 3, 8).unwrap();
        assert_eq!(resolved.date, ymd(2025, 9, 26));
        assert_eq!(resolved.strategy, DateStrategy::LabelProximity);
    }

    #[test]
    fn window_after_aggregate_label() {
        let lines = ["Informe 01/02/2024", "x", "Parqueaderos", "5", "Peajes", "0", "03/10/2025"];
        let resolved = resolve_as_of(&lines, &labels(), 3, 8).unwrap();
        assert_eq!(resolved.canonical(), "10/03/2025");
        assert_eq!(resolved.strategy, DateStrategy::AggregateWindow);
    }

    #[test]
    fn falls_back_to_first_date_in_document() {
        let lines = ["Informe 01/02/2024", "sin etiquetas"];
        let resolved = resolve_as_of(&lines, &labels(), 3, 8).unwrap();
        assert_eq!(resolved.date, ymd(2024, 1, 2));
        assert_eq!(resolved.strategy, DateStrategy::FirstInDocument);
    }

    #[test]
    fn no_date_anywhere() {
        assert!(resolve_as_of(&["Parqueaderos", "5"], &labels(), 3, 8).is_none());
    }
}
