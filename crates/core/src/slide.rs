//! Domain types for representing parsed slide content.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Slide type label used when a header declares none.
pub const DEFAULT_SLIDE_TYPE: &str = "CONTENT";

/// A single parsed slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// Slide number as declared in the header (not a positional counter).
    pub number: u32,

    /// Free-form type label from the header, e.g. "TITLE SLIDE" or "CONTENT".
    pub slide_type: String,

    /// Slide title; empty if the source omitted a Title field.
    pub title: String,

    /// Optional subtitle.
    pub subtitle: Option<String>,

    /// Ordered content items; empty when no Content field was present.
    pub content: Vec<ContentItem>,

    /// Natural-language image description, if one was declared.
    /// `None` when absent, empty, or a "None"/"[None]" placeholder.
    pub graphic: Option<String>,

    /// Free-text speaker notes, passed through untouched.
    pub speaker_notes: Option<String>,

    /// The original unparsed body text, kept for diagnostics.
    pub raw_content: String,

    /// Resolved image file, attached by the orchestrator after acquisition.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image_path: Option<PathBuf>,
}

impl Slide {
    /// Create a new slide with the given number and type label.
    pub fn new(number: u32, slide_type: impl Into<String>) -> Self {
        Self {
            number,
            slide_type: slide_type.into(),
            title: String::new(),
            subtitle: None,
            content: Vec::new(),
            graphic: None,
            speaker_notes: None,
            raw_content: String::new(),
            image_path: None,
        }
    }

    /// Texts of all bullet items, in order. Ignores labels and quoted lines.
    pub fn bullet_texts(&self) -> Vec<&str> {
        self.content
            .iter()
            .filter_map(|item| match item {
                ContentItem::Bullet { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// One item inside a slide's Content region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentItem {
    /// A bullet or numbered-list line with a 3-tier indentation level.
    Bullet { text: String, level: u8 },

    /// A bold-prefixed label line inside Content that is not a bullet.
    SubsectionLabel { text: String },

    /// A blockquote or code-fence line.
    QuotedLine { text: String },
}

impl ContentItem {
    /// Create a bullet with the level clamped to the 0..=2 range.
    pub fn bullet(text: impl Into<String>, level: u8) -> Self {
        Self::Bullet {
            text: text.into(),
            level: level.min(2),
        }
    }

    /// The item's text, regardless of variant.
    pub fn text(&self) -> &str {
        match self {
            Self::Bullet { text, .. }
            | Self::SubsectionLabel { text }
            | Self::QuotedLine { text } => text,
        }
    }
}

/// Bucket a leading-space count into the 3-tier indentation level.
///
/// 0-1 spaces are top level, 2-3 one level in, anything deeper is level 2.
pub fn indent_level(leading_spaces: usize) -> u8 {
    match leading_spaces {
        0..=1 => 0,
        2..=3 => 1,
        _ => 2,
    }
}
