//! Visible text of an HTML document, one trimmed line per text fragment.

use scraper::Html;

/// Elements whose text never reaches the screen.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Non-empty trimmed lines of the text a browser would display for `html`.
///
/// Each text node contributes its own lines, so adjacent table cells or
/// `div`s end up on separate lines.
#[must_use]
pub fn visible_lines(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .tree
        .root()
        .descendants()
        .filter_map(|node| node.value().as_text().map(|text| (node, text)))
        .filter(|(node, _)| {
            !node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
            })
        })
        .flat_map(|(_, text)| {
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_owned)
                .collect::<Vec<_>>()
        })
        .collect()
}

/// [`visible_lines`] joined with newlines.
#[must_use]
pub fn visible_text(html: &str) -> String {
    visible_lines(html).join("\n")
}
