//! Core domain types, errors, and archetype dispatch
//! for markdown deck building.

pub mod archetype;
pub mod error;
pub mod slide;

pub use archetype::SlideArchetype;
pub use error::{Error, Result};
pub use slide::{indent_level, ContentItem, Slide, DEFAULT_SLIDE_TYPE};
