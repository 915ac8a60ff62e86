use regex::RegexBuilder;

use super::{after_label, count_tokens, first_count, label_start, up_to_stop};

/// Count on the label's line after the label, else the first count in the
/// next `lookahead` lines. Later label lines are tried if an earlier one
/// yields nothing.
///
/// The scan ends at the first occurrence of any `stops` label, so a metric
/// without a number never borrows the next metric's value.
#[must_use]
pub fn line_proximity(
    lines: &[&str],
    label: &str,
    stops: &[&str],
    lookahead: usize,
) -> Option<u64> {
    lines.iter().enumerate().find_map(|(idx, line)| {
        let end = after_label(line, label)?;
        std::iter::once(&line[end..])
            .chain(lines.iter().skip(idx + 1).take(lookahead).copied())
            .try_for_each(|segment| {
                let head = up_to_stop(segment, stops);
                match first_count(head) {
                    Some(count) => Err(Some(count)),
                    None if head.len() < segment.len() => Err(None),
                    None => Ok(()),
                }
            })
            .err()
            .flatten()
    })
}

/// `label[^0-9]*(token)` over the whole text, case-insensitive.
///
/// A date or time directly after the label does not count, nor does a
/// token reached by passing one of the `stops` labels.
#[must_use]
pub fn document_regex(text: &str, label: &str, stops: &[&str]) -> Option<u64> {
    let pattern = format!(r"{}[^0-9]*", regex::escape(label));
    let re = RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()?;
    let found = re.find_iter(text).find_map(|m| {
        let crosses_stop = stops
            .iter()
            .any(|stop| label_start(m.as_str(), stop).is_some_and(|pos| pos > 0));
        if crosses_stop {
            return None;
        }
        let rest = &text[m.end()..];
        count_tokens(rest)
            .first()
            .filter(|token| token.start == 0)
            .map(|token| token.value)
    });
    found
}

/// Positional assignment inside the first window holding both labels.
///
/// The window opens at a line containing either label and spans `window`
/// lines. Counts in the window go, in order, to `first` then `second`; a
/// window with fewer than two counts assigns nothing.
#[must_use]
pub fn windowed_cooccurrence(
    lines: &[&str],
    first: &str,
    second: &str,
    window: usize,
) -> (Option<u64>, Option<u64>) {
    fn has(line: &str, label: &str) -> bool {
        after_label(line, label).is_some()
    }

    for (idx, line) in lines.iter().enumerate() {
        if !has(line, first) && !has(line, second) {
            continue;
        }
        let slice = &lines[idx..lines.len().min(idx + window)];
        let both = slice.iter().any(|l| has(l, first)) && slice.iter().any(|l| has(l, second));
        if !both {
            continue;
        }
        let values: Vec<u64> = slice
            .iter()
            .flat_map(|l| count_tokens(l))
            .map(|token| token.value)
            .take(2)
            .collect();
        return match values[..] {
            [a, b] => (Some(a), Some(b)),
            _ => (None, None),
        };
    }
    (None, None)
}
