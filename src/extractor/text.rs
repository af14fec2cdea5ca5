//! HTML-to-text conversion.
//!
//! Strips non-content elements structurally, picks a content region
//! (`<main>`, then `<article>`, then the whole cleaned document), and
//! linearizes the remaining markup into newline-separated plain text.

use scraper::{ElementRef, Html, Selector};

/// Tags whose subtrees carry no readable content. Removal is structural
/// (subtree detach), so their text can never leak into the output.
const NOISE_TAGS: &str = "script, style, noscript, iframe, svg, nav, footer, header, form, \
                          img, picture, video, audio, canvas, aside, figure";

/// Content-region candidates, tried in order; first match wins.
const REGION_TAGS: [&str; 2] = ["main", "article"];

/// Plain text extracted from an HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    /// Newline-separated readable text, no blank lines.
    pub content: String,
    /// Number of whitespace-delimited tokens in `content`.
    pub word_count: usize,
}

/// Extract readable text from raw HTML.
pub fn extract_readable_text(html: &str) -> ExtractedText {
    let mut document = Html::parse_document(html);
    strip_noise(&mut document);

    let content = linearize(content_region(&document));
    let word_count = content.split_whitespace().count();

    ExtractedText {
        content,
        word_count,
    }
}

/// Detach every noise-tag subtree from the document tree.
fn strip_noise(document: &mut Html) {
    let Ok(selector) = Selector::parse(NOISE_TAGS) else {
        return;
    };
    let doomed: Vec<_> = document.select(&selector).map(|el| el.id()).collect();
    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Pick the content region: first `<main>`, else first `<article>`, else
/// the whole (already-cleaned) document. No scoring.
fn content_region(document: &Html) -> ElementRef<'_> {
    for tag in REGION_TAGS {
        if let Ok(selector) = Selector::parse(tag) {
            if let Some(element) = document.select(&selector).next() {
                return element;
            }
        }
    }
    document.root_element()
}

/// Flatten a region to text: each text chunk on its own line, every line
/// trimmed, empty lines dropped.
fn linearize(region: ElementRef<'_>) -> String {
    region
        .text()
        .collect::<Vec<_>>()
        .join("\n")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
