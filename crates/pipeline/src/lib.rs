//! Deck assembly pipeline: orchestration of parsing, image acquisition,
//! renderer dispatch, and the final save, with progress reporting.

pub mod images;
pub mod orchestrator;
pub mod progress;
pub mod renderer;

pub use images::{
    image_path_for, AcquisitionOutcome, ImageAcquirer, ImageError, ImageGenerator, ImageSize,
    ImageStyle, RetryPolicy,
};
pub use orchestrator::{BuildConfig, BuildReport, Orchestrator, Stage};
pub use progress::{LogSink, NullSink, ProgressEvent, ProgressSink};
pub use renderer::DeckRenderer;
