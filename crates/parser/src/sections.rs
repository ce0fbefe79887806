//! Extraction of labeled field regions from a slide body.
//!
//! Implemented as an ordered-rule scanner over lines rather than one large
//! pattern: a line either begins a known major section, ends one (horizontal
//! rule), or belongs to whatever region is currently open.

use regex::Regex;
use std::sync::LazyLock;

/// Regex to collapse whitespace runs (including newlines) into one space.
static WHITESPACE_COLLAPSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// The fixed vocabulary of field markers recognized inside a slide body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLabel {
    Title,
    Subtitle,
    Content,
    Graphic,
    SpeakerNotes,
    Background,
    Sources,
    ImplementationGuidance,
}

/// Label spellings, multi-word entries first so prefix checks stay unambiguous.
const LABELS: &[(&str, SectionLabel)] = &[
    ("implementation guidance", SectionLabel::ImplementationGuidance),
    ("speaker notes", SectionLabel::SpeakerNotes),
    ("subtitle", SectionLabel::Subtitle),
    ("background", SectionLabel::Background),
    ("sources", SectionLabel::Sources),
    ("content", SectionLabel::Content),
    ("graphic", SectionLabel::Graphic),
    ("title", SectionLabel::Title),
];

/// The extracted field regions of one slide body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideSections {
    pub title: String,
    pub subtitle: Option<String>,
    /// Raw Content region text, indentation preserved for the bullet parser.
    pub content: String,
    pub graphic: Option<String>,
    pub speaker_notes: Option<String>,
}

/// Check whether a line is a label line of the form
/// `**FieldName:**` / `FieldName:` (bold markers and case both optional).
///
/// Returns the label and the remainder of the line after the colon.
pub fn match_section_label(line: &str) -> Option<(SectionLabel, &str)> {
    let stripped = line.trim().trim_start_matches(|c| c == '*' || c == '_');

    for &(name, label) in LABELS {
        if stripped.len() < name.len()
            || !stripped.is_char_boundary(name.len())
            || !stripped[..name.len()].eq_ignore_ascii_case(name)
        {
            continue;
        }
        // After the name: optional closing bold markers and spaces, then ':'.
        let rest = stripped[name.len()..]
            .trim_start_matches(|c| c == '*' || c == '_')
            .trim_start();
        if let Some(value) = rest.strip_prefix(':') {
            return Some((label, value));
        }
    }

    None
}

/// Whether a line terminates a multi-line region: either it begins a new
/// major section itself, or it is a horizontal rule.
pub fn is_section_boundary(line: &str) -> bool {
    match_section_label(line).is_some() || is_horizontal_rule(line)
}

fn is_horizontal_rule(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3 && trimmed.chars().all(|c| c == '-')
}

/// Extract all labeled field regions from one slide's raw body text.
///
/// Missing labels simply leave defaults; this function never fails. The
/// first occurrence of a label wins; later duplicates are ignored.
pub fn extract_sections(body: &str) -> SlideSections {
    let lines: Vec<&str> = body.lines().collect();
    let mut out = SlideSections::default();

    let mut i = 0;
    while i < lines.len() {
        let Some((label, inline_value)) = match_section_label(lines[i]) else {
            i += 1;
            continue;
        };

        match label {
            SectionLabel::Title => {
                if out.title.is_empty() {
                    out.title = clean_inline_value(inline_value);
                }
                i += 1;
            }
            SectionLabel::Subtitle => {
                if out.subtitle.is_none() {
                    let value = clean_inline_value(inline_value);
                    if !value.is_empty() {
                        out.subtitle = Some(value);
                    }
                }
                i += 1;
            }
            SectionLabel::Content => {
                let (text, next) = collect_region(&lines, i, inline_value);
                if out.content.is_empty() {
                    out.content = text;
                }
                i = next;
            }
            SectionLabel::Graphic => {
                let (text, next) = collect_region(&lines, i, inline_value);
                if out.graphic.is_none() {
                    out.graphic = normalize_graphic(&text);
                }
                i = next;
            }
            SectionLabel::SpeakerNotes => {
                let (text, next) = collect_region(&lines, i, inline_value);
                if out.speaker_notes.is_none() && !text.is_empty() {
                    out.speaker_notes = Some(text);
                }
                i = next;
            }
            // Recognized so they bound other regions, but not carried
            // on the slide record.
            SectionLabel::Background
            | SectionLabel::Sources
            | SectionLabel::ImplementationGuidance => {
                let (_, next) = collect_region(&lines, i, inline_value);
                i = next;
            }
        }
    }

    out
}

/// Collect a multi-line region starting at the label line `start`.
///
/// Runs from the text after the label through the line before the next
/// section boundary (or end of body). Returns the region text and the
/// index of the first unconsumed line. Inner indentation is preserved;
/// only leading/trailing blank lines are dropped.
fn collect_region(lines: &[&str], start: usize, inline_value: &str) -> (String, usize) {
    let mut collected: Vec<String> = Vec::new();

    // Leftover bold markers from a `**Content:**` style label are noise,
    // not a first content line.
    let first = inline_value.trim();
    if !first.is_empty() && !first.chars().all(|c| c == '*' || c == '_') {
        collected.push(first.trim_end().to_string());
    }

    let mut i = start + 1;
    while i < lines.len() {
        if is_section_boundary(lines[i]) {
            break;
        }
        collected.push(lines[i].trim_end().to_string());
        i += 1;
    }

    while collected.first().is_some_and(|l| l.trim().is_empty()) {
        collected.remove(0);
    }
    while collected.last().is_some_and(|l| l.trim().is_empty()) {
        collected.pop();
    }

    (collected.join("\n"), i)
}

/// Clean a single-line field value: trim and drop stray bold markers.
fn clean_inline_value(value: &str) -> String {
    value
        .trim()
        .trim_matches(|c| c == '*' || c == '_')
        .trim()
        .to_string()
}

/// Normalize a Graphic region to a single-line description, or `None`
/// for empty text and the "None"/"[None]" placeholders.
fn normalize_graphic(text: &str) -> Option<String> {
    let collapsed = WHITESPACE_COLLAPSE_RE.replace_all(text, " ");
    let cleaned = collapsed.trim().trim_matches(|c| c == '*' || c == '_').trim();

    if cleaned.is_empty()
        || cleaned.eq_ignore_ascii_case("none")
        || cleaned.eq_ignore_ascii_case("[none]")
    {
        None
    } else {
        Some(cleaned.to_string())
    }
}
