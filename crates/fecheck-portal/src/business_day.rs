//! The calendar day an invoice summary is scoped to.

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left unescaped inside a query value (RFC 3986 unreserved).
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// One local calendar day at a fixed UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessDay {
    date: NaiveDate,
    offset_hours: i32,
}

impl BusinessDay {
    #[must_use]
    pub fn new(date: NaiveDate, offset_hours: i32) -> Self {
        Self { date, offset_hours }
    }

    /// Today's date as seen from `offset_hours` east of UTC.
    ///
    /// Offsets outside ±23 h fall back to UTC.
    #[must_use]
    pub fn today(offset_hours: i32) -> Self {
        let offset = FixedOffset::east_opt(offset_hours * 3600)
            .unwrap_or_else(|| Utc.fix());
        let date = Utc::now().with_timezone(&offset).date_naive();
        Self { date, offset_hours }
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Offset as the backends expect it, e.g. `-5:00` or `+1:00`.
    #[must_use]
    pub fn offset_label(&self) -> String {
        let sign = if self.offset_hours < 0 { '-' } else { '+' };
        format!("{sign}{}:00", self.offset_hours.unsigned_abs())
    }

    /// Inclusive whole-day filter on the transaction date column.
    #[must_use]
    pub fn transdate_filter(&self) -> String {
        let day = self.date.format("%Y-%m-%d");
        let offset = self.offset_label();
        format!("t.transdate between '{day} 00:00:00 {offset}' and '{day} 23:59:59 {offset}'")
    }

    /// [`Self::transdate_filter`] percent-encoded for use as a query value.
    #[must_use]
    pub fn encoded_transdate_filter(&self) -> String {
        utf8_percent_encode(&self.transdate_filter(), QUERY_VALUE).to_string()
    }
}
