//! Per-entity breakdown table recovery.

use fecheck_core::numeric::purely_numeric;
use scraper::Html;

use crate::strategies::table_rows;
use crate::types::{BreakdownRow, BreakdownStrategy};

/// Column headers and control labels that are never entities.
pub const HEADER_TOKENS: &[&str] = &[
    "ASOCIADO",
    "PEAJE",
    "PEAJES",
    "PORCENTAJE",
    "PARQUEADEROS",
    "TOTAL",
    "CANTIDAD",
];

/// Headers that only the breakdown table carries; the text window anchors
/// on these, never on the aggregate card labels.
pub const COLUMN_HEADERS: &[&str] = &["ASOCIADO", "CANTIDAD", "PORCENTAJE", "PEAJE"];

fn matches_any(tokens: &[&str], text: &str) -> bool {
    let trimmed = text.trim();
    tokens.iter().any(|token| token.eq_ignore_ascii_case(trimmed))
}

fn is_header(text: &str) -> bool {
    matches_any(HEADER_TOKENS, text)
}

/// Drops header rows and exact duplicates, keeping first occurrences.
#[must_use]
pub fn clean_rows(rows: Vec<BreakdownRow>) -> Vec<BreakdownRow> {
    let mut kept: Vec<BreakdownRow> = Vec::with_capacity(rows.len());
    for row in rows {
        if row.entity.trim().is_empty() || is_header(&row.entity) || kept.contains(&row) {
            continue;
        }
        kept.push(row);
    }
    kept
}

/// Entity from the first non-numeric cell, count from the first purely
/// numeric cell after it.
#[must_use]
pub fn from_table_rows(rows: &[Vec<String>]) -> Vec<BreakdownRow> {
    rows.iter()
        .filter_map(|cells| {
            let entity_idx = cells
                .iter()
                .position(|cell| !cell.trim().is_empty() && purely_numeric(cell).is_none())?;
            let count = cells[entity_idx + 1..]
                .iter()
                .find_map(|cell| purely_numeric(cell))?;
            Some(BreakdownRow {
                entity: cells[entity_idx].trim().to_string(),
                count,
            })
        })
        .collect()
}

/// `(entity line, numeric line)` pairs within `window` lines after the
/// header run that starts at the first breakdown column header.
#[must_use]
pub fn from_text_window(lines: &[&str], window: usize) -> Vec<BreakdownRow> {
    let Some(anchor) = lines.iter().position(|line| matches_any(COLUMN_HEADERS, line)) else {
        return Vec::new();
    };
    let start = lines[anchor..]
        .iter()
        .position(|line| !is_header(line))
        .map_or(lines.len(), |offset| anchor + offset);
    let slice = &lines[start..lines.len().min(start + window)];

    let mut rows = Vec::new();
    let mut idx = 0;
    while idx + 1 < slice.len() {
        let entity = slice[idx];
        match (purely_numeric(entity), purely_numeric(slice[idx + 1])) {
            (None, Some(count)) if !is_header(entity) => {
                rows.push(BreakdownRow {
                    entity: entity.trim().to_string(),
                    count,
                });
                idx += 2;
            }
            _ => idx += 1,
        }
    }
    rows
}

/// Table rows first, then the text window; cleaned either way.
#[must_use]
pub fn resolve_breakdown(
    document: &Html,
    lines: &[&str],
    window: usize,
) -> Option<(Vec<BreakdownRow>, BreakdownStrategy)> {
    let from_table = clean_rows(from_table_rows(&table_rows(document)));
    if !from_table.is_empty() {
        tracing::debug!(rows = from_table.len(), "breakdown from table rows");
        return Some((from_table, BreakdownStrategy::TableScan));
    }

    let from_text = clean_rows(from_text_window(lines, window));
    if !from_text.is_empty() {
        tracing::debug!(rows = from_text.len(), "breakdown from text window");
        return Some((from_text, BreakdownStrategy::WindowedText));
    }

    tracing::debug!("no breakdown rows found");
    None
}
