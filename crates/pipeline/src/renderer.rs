//! The deck renderer capability boundary.
//!
//! The orchestrator never constructs visual layout itself; it dispatches
//! each slide to exactly one of these operations on an external backend.

use deck_core::{ContentItem, Result};
use std::path::Path;

/// One operation per rendering archetype, plus the final save.
///
/// Implementations own their internal slide ordering; the orchestrator only
/// guarantees it calls these in ascending document order.
pub trait DeckRenderer {
    /// Opening slide with title, optional subtitle, and optional date line.
    fn add_title_slide(&mut self, title: &str, subtitle: Option<&str>, date: Option<&str>)
        -> Result<()>;

    /// Section divider (also used for Q&A and contact slides).
    fn add_section_break(&mut self, title: &str) -> Result<()>;

    /// Slide built around a single image, no bullet content.
    fn add_image_slide(&mut self, title: &str, image_path: &Path, subtitle: Option<&str>)
        -> Result<()>;

    /// Bulleted slide with an accompanying image.
    fn add_text_and_image_slide(
        &mut self,
        title: &str,
        bullets: &[ContentItem],
        image_path: &Path,
    ) -> Result<()>;

    /// Plain bulleted content slide; the text-only fallback for every
    /// image-bearing archetype.
    fn add_content_slide(
        &mut self,
        title: &str,
        subtitle: Option<&str>,
        bullets: &[ContentItem],
    ) -> Result<()>;

    /// Persist the assembled document to `path`.
    fn save(&mut self, path: &Path) -> Result<()>;
}
