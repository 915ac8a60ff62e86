//! Rendered dashboard content.

use fecheck_core::text::visible_text;
use scraper::Html;

/// Text and markup of one rendered page.
///
/// `text` is line-delimited visible text; `html` may be empty when only text
/// was captured, in which case the DOM strategies find nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedPage {
    pub text: String,
    pub html: String,
}

impl RenderedPage {
    #[must_use]
    pub fn new(text: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            html: html.into(),
        }
    }

    /// Page whose visible text is derived from `html`.
    #[must_use]
    pub fn from_html(html: impl Into<String>) -> Self {
        let html = html.into();
        Self {
            text: visible_text(&html),
            html,
        }
    }

    /// Non-empty trimmed lines of the visible text.
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        self.text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }

    #[must_use]
    pub fn document(&self) -> Html {
        Html::parse_document(&self.html)
    }

    /// `true` when every label occurs in the text (ASCII case-insensitive).
    #[must_use]
    pub fn contains_all(&self, labels: &[String]) -> bool {
        let haystack = self.text.to_ascii_lowercase();
        labels
            .iter()
            .all(|label| haystack.contains(&label.to_ascii_lowercase()))
    }
}
