//! Image acquisition: the generator capability boundary, retry policy,
//! on-disk naming convention, and atomic image writes.

use deck_core::Slide;
use rand::Rng;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Opaque style configuration passed through to the generator.
#[derive(Debug, Clone, Default)]
pub struct ImageStyle {
    /// Free-text style descriptor appended to every prompt by the backend.
    pub descriptor: String,
}

/// Output size hint for the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Standard,
    High,
}

/// Failure modes of a single generation request.
#[derive(Error, Debug)]
pub enum ImageError {
    /// Network or service hiccup; worth retrying.
    #[error("transient image generation failure: {0}")]
    Transient(String),

    /// Content-safety rejection; terminal for this request.
    #[error("content safety rejection: {0}")]
    SafetyRejected(String),
}

impl ImageError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// External image generation capability: prompt in, raw image bytes out.
pub trait ImageGenerator {
    fn generate(
        &self,
        prompt: &str,
        style: &ImageStyle,
        size: ImageSize,
        suppress_text: bool,
    ) -> std::result::Result<Vec<u8>, ImageError>;
}

/// Exponential backoff with jitter for transient generation failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub multiplier: f64,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            multiplier: 2.0,
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Delay to sleep after the given 1-based failed attempt.
    ///
    /// Grows exponentially, capped at `max_delay`, with half the interval
    /// randomized so simultaneous clients don't retry in lockstep.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exp = self.base_delay.as_secs_f64()
            * self.multiplier.powi(attempt.saturating_sub(1) as i32);
        let capped = exp.min(self.max_delay.as_secs_f64());
        let jittered = capped / 2.0 + rand::thread_rng().gen_range(0.0..=capped / 2.0);
        Duration::from_secs_f64(jittered)
    }
}

/// The load-bearing naming convention: `slide-{number}.jpg` under the
/// images directory. Prior-run images are discovered by this name alone.
pub fn image_path_for(images_dir: &Path, number: u32) -> PathBuf {
    images_dir.join(format!("slide-{}.jpg", number))
}

/// Run one generation request through the retry policy.
///
/// Retryable failures sleep and try again up to `max_attempts`; safety
/// rejections return immediately.
pub fn generate_with_retry(
    generator: &dyn ImageGenerator,
    prompt: &str,
    style: &ImageStyle,
    size: ImageSize,
    suppress_text: bool,
    policy: &RetryPolicy,
) -> std::result::Result<Vec<u8>, ImageError> {
    let mut attempt = 1;
    loop {
        match generator.generate(prompt, style, size, suppress_text) {
            Ok(bytes) => return Ok(bytes),
            Err(err) if err.is_retryable() && attempt < policy.max_attempts => {
                let delay = policy.delay_after(attempt);
                log::warn!(
                    "Image generation attempt {}/{} failed ({}), retrying in {:?}",
                    attempt,
                    policy.max_attempts,
                    err,
                    delay
                );
                thread::sleep(delay);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Write image bytes without ever leaving a partial file at `path`.
pub fn write_image_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("jpg.tmp");
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)
}

/// Result of the acquisition stage, by slide number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcquisitionOutcome {
    pub generated: Vec<u32>,
    pub reused: Vec<u32>,
    pub failed: Vec<u32>,
}

/// Sequential per-slide image acquisition.
///
/// One request per slide with a graphic description; failures are recorded
/// per slide and never stop later slides from being attempted.
pub struct ImageAcquirer<'a> {
    pub images_dir: PathBuf,
    pub style: ImageStyle,
    pub size: ImageSize,
    pub suppress_text: bool,
    pub force_regenerate: bool,
    pub retry: RetryPolicy,
    pub generator: &'a dyn ImageGenerator,
}

impl ImageAcquirer<'_> {
    pub fn acquire(&self, slides: &[Slide]) -> AcquisitionOutcome {
        let mut outcome = AcquisitionOutcome::default();

        for slide in slides {
            let Some(prompt) = slide.graphic.as_deref() else {
                continue;
            };
            let path = image_path_for(&self.images_dir, slide.number);

            if !self.force_regenerate && path.exists() {
                log::debug!("Reusing existing image for slide {}", slide.number);
                outcome.reused.push(slide.number);
                continue;
            }

            match generate_with_retry(
                self.generator,
                prompt,
                &self.style,
                self.size,
                self.suppress_text,
                &self.retry,
            ) {
                Ok(bytes) => match write_image_atomic(&path, &bytes) {
                    Ok(()) => outcome.generated.push(slide.number),
                    Err(err) => {
                        log::warn!("Failed to write image for slide {}: {}", slide.number, err);
                        outcome.failed.push(slide.number);
                    }
                },
                Err(err) => {
                    log::warn!("Image acquisition failed for slide {}: {}", slide.number, err);
                    outcome.failed.push(slide.number);
                }
            }
        }

        outcome
    }
}
