//! Plain-text outline renderer.
//!
//! The built-in rendering backend: each archetype becomes a text block in a
//! flat outline document. Binary deck containers are out of scope; anything
//! that speaks `DeckRenderer` can replace this.

use deck_core::{ContentItem, Error, Result};
use deck_pipeline::DeckRenderer;
use std::fs;
use std::path::Path;

/// Renderer producing a flat text outline, one block per slide.
#[derive(Debug, Default)]
pub struct OutlineRenderer {
    blocks: Vec<String>,
}

impl OutlineRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn format_bullets(bullets: &[ContentItem]) -> String {
        bullets
            .iter()
            .map(|item| match item {
                ContentItem::Bullet { text, level } => {
                    format!("{}- {}", "  ".repeat(*level as usize), text)
                }
                ContentItem::SubsectionLabel { .. } => item.text().to_string(),
                ContentItem::QuotedLine { .. } => format!("> {}", item.text()),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl DeckRenderer for OutlineRenderer {
    fn add_title_slide(
        &mut self,
        title: &str,
        subtitle: Option<&str>,
        date: Option<&str>,
    ) -> Result<()> {
        let mut block = format!("==== {} ====", title);
        if let Some(subtitle) = subtitle {
            block.push_str(&format!("\n{}", subtitle));
        }
        if let Some(date) = date {
            block.push_str(&format!("\n{}", date));
        }
        self.blocks.push(block);
        Ok(())
    }

    fn add_section_break(&mut self, title: &str) -> Result<()> {
        self.blocks.push(format!("---- {} ----", title));
        Ok(())
    }

    fn add_image_slide(
        &mut self,
        title: &str,
        image_path: &Path,
        subtitle: Option<&str>,
    ) -> Result<()> {
        let mut block = format!("{}\n[image: {}]", title, image_path.display());
        if let Some(subtitle) = subtitle {
            block.push_str(&format!("\n{}", subtitle));
        }
        self.blocks.push(block);
        Ok(())
    }

    fn add_text_and_image_slide(
        &mut self,
        title: &str,
        bullets: &[ContentItem],
        image_path: &Path,
    ) -> Result<()> {
        self.blocks.push(format!(
            "{}\n{}\n[image: {}]",
            title,
            Self::format_bullets(bullets),
            image_path.display()
        ));
        Ok(())
    }

    fn add_content_slide(
        &mut self,
        title: &str,
        subtitle: Option<&str>,
        bullets: &[ContentItem],
    ) -> Result<()> {
        let mut block = title.to_string();
        if let Some(subtitle) = subtitle {
            block.push_str(&format!("\n{}", subtitle));
        }
        let bullets = Self::format_bullets(bullets);
        if !bullets.is_empty() {
            block.push_str(&format!("\n{}", bullets));
        }
        self.blocks.push(block);
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<()> {
        let mut document = self.blocks.join("\n\n");
        if !document.is_empty() {
            document.push('\n');
        }
        fs::write(path, document)
            .map_err(|err| Error::SaveFailed(format!("{}: {}", path.display(), err)))?;
        Ok(())
    }
}
