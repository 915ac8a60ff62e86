use std::sync::LazyLock;

use fecheck_core::numeric::purely_numeric;
use scraper::{ElementRef, Html, Node, Selector};

use super::after_label;

static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"tr, [role="row"]"#).expect("valid selector"));
static CELL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        r#"td, th, [role="cell"], [role="gridcell"], [role="columnheader"], [role="rowheader"]"#,
    )
    .expect("valid selector")
});
static ANY_ELEMENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("*").expect("valid selector"));

fn own_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|child| child.value().as_text().map(|t| t.trim().to_owned()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn full_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

/// First purely numeric sibling of an element whose own text holds `label`.
#[must_use]
pub fn dom_neighbor(document: &Html, label: &str) -> Option<u64> {
    document
        .select(&ANY_ELEMENT)
        .filter(|element| after_label(&own_text(*element), label).is_some())
        .find_map(|element| {
            let parent = element.parent()?;
            parent
                .children()
                .filter(|sibling| *sibling != *element)
                .find_map(|sibling| match sibling.value() {
                    Node::Text(text) => purely_numeric(text),
                    Node::Element(_) => ElementRef::wrap(sibling)
                        .and_then(|el| purely_numeric(&full_text(el))),
                    _ => None,
                })
        })
}

/// Cell texts of every `<tr>` and ARIA `role="row"` in document order.
#[must_use]
pub fn table_rows(document: &Html) -> Vec<Vec<String>> {
    document
        .select(&ROW_SELECTOR)
        .map(|row| {
            row.select(&CELL_SELECTOR)
                .map(|cell| full_text(cell).split_whitespace().collect::<Vec<_>>().join(" "))
                .collect::<Vec<_>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect()
}

/// Value of the cell right after the first cell mentioning `label`.
#[must_use]
pub fn table_scan(rows: &[Vec<String>], label: &str) -> Option<u64> {
    rows.iter().find_map(|cells| {
        cells.iter().enumerate().find_map(|(idx, cell)| {
            after_label(cell, label)?;
            cells.get(idx + 1).and_then(|next| purely_numeric(next))
        })
    })
}
