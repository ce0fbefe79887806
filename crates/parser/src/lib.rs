//! Markdown slide document parser: document splitting, section extraction,
//! and content bullet parsing.
//!
//! Parsing is a pure function of the document text. The only fatal outcome
//! is a document with no slide headers at all; everything else degrades to
//! field defaults.

pub mod bullets;
pub mod sections;
pub mod splitter;

pub use sections::{extract_sections, SlideSections};
pub use splitter::{split_document, RawSlide};

use deck_core::{Result, Slide, DEFAULT_SLIDE_TYPE};

/// Parse a full markdown document into slide records, in document order.
pub fn parse_document(text: &str) -> Result<Vec<Slide>> {
    let raw_slides = split_document(text)?;
    log::debug!("Parsing {} slides", raw_slides.len());
    Ok(raw_slides.into_iter().map(parse_slide).collect())
}

/// Assemble one slide record from its raw document segment.
pub fn parse_slide(raw: RawSlide) -> Slide {
    let sections = extract_sections(&raw.body);

    let slide_type = raw
        .declared_type
        .unwrap_or_else(|| DEFAULT_SLIDE_TYPE.to_string());

    let mut slide = Slide::new(raw.number, slide_type);
    slide.title = sections.title;
    slide.subtitle = sections.subtitle;
    slide.content = bullets::parse_content(&sections.content);
    slide.graphic = sections.graphic;
    slide.speaker_notes = sections.speaker_notes;
    slide.raw_content = raw.body;
    slide
}
