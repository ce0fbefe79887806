//! Mapping from free-form slide type labels to rendering archetypes.

use serde::{Deserialize, Serialize};

/// The fixed set of rendering shapes a slide can be dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideArchetype {
    /// Opening slide: title, subtitle, date.
    Title,
    /// Divider between sections; also used for Q&A and contact slides.
    SectionBreak,
    /// Slide built around a single image.
    ImageFocused,
    /// Default bulleted content slide.
    Content,
}

impl SlideArchetype {
    /// Resolve a declared slide type label to an archetype.
    ///
    /// The lookup is total: the label is trimmed and uppercased, matched
    /// against the known vocabulary, and anything unrecognized (typos, new
    /// labels, empty strings) falls through to `Content`.
    pub fn from_type_label(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "TITLE" | "TITLE SLIDE" | "COVER" => Self::Title,
            "SECTION" | "SECTION BREAK" | "SECTION HEADER" | "DIVIDER" | "AGENDA BREAK"
            | "Q&A" | "QA" | "QUESTIONS" | "CONTACT" | "THANK YOU" | "CLOSING" => {
                Self::SectionBreak
            }
            "IMAGE" | "IMAGE SLIDE" | "VISUAL" | "FULL IMAGE" | "ARCHITECTURE" | "DIAGRAM" => {
                Self::ImageFocused
            }
            _ => Self::Content,
        }
    }
}
