//! Numeric-token primitives shared by the page scanners.
//!
//! A numeric token is either a comma-grouped thousands number (`1,234`,
//! `12,345,678`) or a plain digit run. At any position the comma-grouped
//! form is preferred so `1,234` is never split into `1` and `234`.

/// Byte span and value of one token inside the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericToken {
    pub start: usize,
    pub end: usize,
    pub value: u64,
}

/// Scans `text` left to right and returns every numeric token.
///
/// A leading run of 1–3 digits followed by one or more `,ddd` groups (each
/// group not followed by a further digit) is one token; anything else is a
/// plain digit run. Runs too large for `u64` are skipped.
#[must_use]
pub fn scan_numeric_tokens(text: &str) -> Vec<NumericToken> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < len {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }

        let start = i;
        while i < len && bytes[i].is_ascii_digit() {
            i += 1;
        }
        let mut end = i;

        if end - start <= 3 {
            loop {
                let group_end = end + 4;
                let is_group = group_end <= len
                    && bytes[end] == b','
                    && bytes[end + 1..group_end].iter().all(u8::is_ascii_digit)
                    && !(group_end < len && bytes[group_end].is_ascii_digit());
                if !is_group {
                    break;
                }
                end = group_end;
            }
        }

        if let Some(value) = parse_numeric_token(&text[start..end]) {
            tokens.push(NumericToken { start, end, value });
        }
        i = end;
    }

    tokens
}

/// Parses a single token (`"1,234"` or `"1234"`) into a count.
#[must_use]
pub fn parse_numeric_token(token: &str) -> Option<u64> {
    let digits: String = token.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<u64>().ok()
}

/// First numeric token in `text`.
#[must_use]
pub fn first_numeric_token(text: &str) -> Option<u64> {
    scan_numeric_tokens(text).first().map(|t| t.value)
}

/// Returns the value when the whole trimmed `text` is exactly one token.
#[must_use]
pub fn purely_numeric(text: &str) -> Option<u64> {
    let trimmed = text.trim();
    match scan_numeric_tokens(trimmed).as_slice() {
        [only] if only.start == 0 && only.end == trimmed.len() => Some(only.value),
        _ => None,
    }
}
