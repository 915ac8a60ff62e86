//! Fallback pending-count discovery in rendered console pages.

use fecheck_core::numeric::first_numeric_token;

/// Lines searched after a marker line when the marker line has no number.
pub const MARKER_LOOKAHEAD: usize = 9;

fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return None;
    }
    haystack.to_ascii_lowercase().find(&needle)
}

/// Count associated with `marker` in line-delimited page text.
///
/// The marker match is ASCII case-insensitive. The first numeric token after
/// the marker on the same line wins; otherwise the first token in the next
/// `lookahead` lines. The scan ends where any of `other_markers` appears, so
/// an entity row without a number never takes the next entity's count.
/// Later marker occurrences are tried if an earlier one yields nothing.
#[must_use]
pub fn count_near_marker(
    lines: &[String],
    marker: &str,
    other_markers: &[String],
    lookahead: usize,
) -> Option<u64> {
    let needle_len = marker.trim().len();
    let head = |text: &str| -> usize {
        other_markers
            .iter()
            .filter_map(|other| find_ci(text, other))
            .min()
            .unwrap_or(text.len())
    };

    lines.iter().enumerate().find_map(|(idx, line)| {
        let start = find_ci(line, marker)?;
        let rest = &line[start + needle_len..];
        let following = lines.iter().skip(idx + 1).take(lookahead).map(String::as_str);
        for segment in std::iter::once(rest).chain(following) {
            let cut = head(segment);
            if let Some(count) = first_numeric_token(&segment[..cut]) {
                return Some(count);
            }
            if cut < segment.len() {
                return None;
            }
        }
        None
    })
}
