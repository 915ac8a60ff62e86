//! Individual extraction strategies over a [`RenderedPage`](crate::RenderedPage).
//!
//! Each function answers for one label and knows nothing about priority;
//! the cascade lives in [`crate::engine`].

mod dom;
mod text;

pub use dom::{dom_neighbor, table_rows, table_scan};
pub use text::{document_regex, line_proximity, windowed_cooccurrence};

use fecheck_core::numeric::{scan_numeric_tokens, NumericToken};

/// Numeric tokens that are not fragments of a date or a clock time.
pub(crate) fn count_tokens(text: &str) -> Vec<NumericToken> {
    let bytes = text.as_bytes();
    let joined = |idx: Option<usize>| {
        idx.and_then(|i| bytes.get(i))
            .is_some_and(|b| matches!(b, b'/' | b'-' | b':'))
    };
    scan_numeric_tokens(text)
        .into_iter()
        .filter(|token| !joined(token.start.checked_sub(1)) && !joined(Some(token.end)))
        .collect()
}

/// First count token in `text`.
pub(crate) fn first_count(text: &str) -> Option<u64> {
    count_tokens(text).first().map(|token| token.value)
}

/// Byte offset of the first ASCII case-insensitive match of `label`.
pub(crate) fn label_start(line: &str, label: &str) -> Option<usize> {
    let needle = label.to_ascii_lowercase();
    if needle.is_empty() {
        return None;
    }
    line.to_ascii_lowercase().find(&needle)
}

/// Byte offset just past the first ASCII case-insensitive match of `label`.
pub(crate) fn after_label(line: &str, label: &str) -> Option<usize> {
    label_start(line, label).map(|start| start + label.len())
}

/// `text` cut just before the earliest occurrence of any `stops` label.
pub(crate) fn up_to_stop<'a>(text: &'a str, stops: &[&str]) -> &'a str {
    let cut = stops
        .iter()
        .filter_map(|stop| label_start(text, stop))
        .min()
        .unwrap_or(text.len());
    &text[..cut]
}
