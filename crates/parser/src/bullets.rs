//! Per-line classification of a slide's Content region into content items.
//!
//! Rules are tried in order, first match wins; lines matching no rule are
//! dropped so malformed content degrades instead of aborting the parse.

use crate::sections;
use deck_core::{indent_level, ContentItem};
use regex::Regex;
use std::sync::LazyLock;

/// `- text` or `* text`, with leading spaces carrying the nesting level.
static DASH_BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^( *)[-*][ \t]+(.*)$").unwrap());

/// `1. text`; the ordinal is discarded, only indentation matters.
static NUMBERED_BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^( *)\d+\.[ \t]+(.*)$").unwrap());

/// Parse a raw Content region into an ordered sequence of content items.
pub fn parse_content(text: &str) -> Vec<ContentItem> {
    text.lines().filter_map(classify_line).collect()
}

/// Classify one line, or `None` for blank/unrecognized lines.
fn classify_line(line: &str) -> Option<ContentItem> {
    if let Some(caps) = DASH_BULLET_RE
        .captures(line)
        .or_else(|| NUMBERED_BULLET_RE.captures(line))
    {
        let spaces = caps.get(1).map(|m| m.as_str().len()).unwrap_or(0);
        let text = caps.get(2).map(|m| m.as_str().trim_end()).unwrap_or("");
        if text.is_empty() {
            return None;
        }
        return Some(ContentItem::bullet(text, indent_level(spaces)));
    }

    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    if (trimmed.starts_with("**") || trimmed.starts_with("__"))
        && trimmed.contains(':')
        && sections::match_section_label(trimmed).is_none()
    {
        let text = strip_bold_markers(trimmed);
        if !text.is_empty() {
            return Some(ContentItem::SubsectionLabel { text });
        }
        return None;
    }

    if let Some(quoted) = trimmed.strip_prefix('>') {
        let text = quoted.trim();
        if !text.is_empty() {
            return Some(ContentItem::QuotedLine { text: text.to_string() });
        }
        return None;
    }
    if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
        return Some(ContentItem::QuotedLine { text: trimmed.to_string() });
    }

    log::trace!("Dropping unrecognized content line: {:?}", line);
    None
}

/// Remove bold marker pairs from a subsection label line.
fn strip_bold_markers(text: &str) -> String {
    text.replace("**", "").replace("__", "").trim().to_string()
}
