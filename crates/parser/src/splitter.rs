//! Splitting a full document into per-slide raw text blocks.

use deck_core::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Matches a slide header line in any of its historical spellings:
/// `Slide 1`, `## Slide 2: Architecture`, `## **SLIDE 3: TITLE SLIDE**`,
/// `**Slide 4**`. Case-insensitive, bold/italic markers optional.
static SLIDE_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?mi)^[ \t]*(?:#{1,6}[ \t]+)?[*_]*[ \t]*slide[ \t]+(\d+)[*_]*(?:[ \t]*:[ \t]*([^\r\n]*?))?[ \t\r]*$",
    )
    .unwrap()
});

/// One slide's raw segment of the document, before field extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSlide {
    /// Number as written in the header. Gaps and duplicates are kept as-is.
    pub number: u32,

    /// Type label from the header, with bold markers stripped.
    /// `None` when the header declared no type.
    pub declared_type: Option<String>,

    /// Body text from the end of this header to the start of the next,
    /// trimmed of surrounding whitespace.
    pub body: String,
}

/// Split a document into raw slides, in header-occurrence order.
///
/// Fails with [`Error::NoSlidesFound`] when no header line matches; every
/// other irregularity (gaps, duplicates, empty bodies) passes through.
pub fn split_document(text: &str) -> Result<Vec<RawSlide>> {
    struct Header {
        number: u32,
        declared_type: Option<String>,
        body_start: usize,
        header_start: usize,
    }

    let mut headers: Vec<Header> = Vec::new();

    for caps in SLIDE_HEADER_RE.captures_iter(text) {
        let whole = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        // Digits that overflow u32 fail the parse; such lines are not headers.
        let number: u32 = match caps.get(1).and_then(|m| m.as_str().parse().ok()) {
            Some(n) => n,
            None => continue,
        };
        let declared_type = caps
            .get(2)
            .map(|m| clean_type_label(m.as_str()))
            .filter(|label| !label.is_empty());

        headers.push(Header {
            number,
            declared_type,
            body_start: whole.end(),
            header_start: whole.start(),
        });
    }

    if headers.is_empty() {
        return Err(Error::NoSlidesFound);
    }

    log::debug!("Found {} slide headers", headers.len());

    let mut slides = Vec::with_capacity(headers.len());
    for i in 0..headers.len() {
        let body_end = headers
            .get(i + 1)
            .map(|next| next.header_start)
            .unwrap_or(text.len());
        let header = &headers[i];

        slides.push(RawSlide {
            number: header.number,
            declared_type: header.declared_type.clone(),
            body: text[header.body_start..body_end].trim().to_string(),
        });
    }

    Ok(slides)
}

/// Strip bold/italic markers and surrounding whitespace from a type label.
fn clean_type_label(label: &str) -> String {
    label
        .trim()
        .trim_matches(|c| c == '*' || c == '_')
        .trim()
        .to_string()
}
