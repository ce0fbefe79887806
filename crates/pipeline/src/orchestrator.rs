//! The assembly orchestrator: markdown in, rendered deck on disk out.
//!
//! Drives `Parsing -> ImageAcquisition -> Building -> Saving`, reporting
//! each boundary through the progress sink. Parse failures abort before any
//! external call; image failures stay per-slide; the final save is the
//! single commit point.

use crate::images::{
    image_path_for, AcquisitionOutcome, ImageAcquirer, ImageGenerator, ImageSize, ImageStyle,
    RetryPolicy,
};
use crate::progress::{ProgressEvent, ProgressSink};
use crate::renderer::DeckRenderer;
use deck_core::{Error, Result, Slide, SlideArchetype};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Workflow stage, with `Failed` reachable from any of the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Parsing,
    ImageAcquisition,
    Building,
    Saving,
    Done,
    Failed,
}

/// Configuration for one build run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Where the assembled document is committed.
    pub output_path: PathBuf,

    /// Decided before acquisition begins; skips the whole image stage.
    pub skip_images: bool,

    /// Regenerate images even when a prior run's file exists.
    pub force_regenerate: bool,

    /// Optional date line for the title slide.
    pub date: Option<String>,

    pub image_style: ImageStyle,
    pub image_size: ImageSize,
    pub suppress_image_text: bool,
    pub retry: RetryPolicy,
}

impl BuildConfig {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            skip_images: false,
            force_regenerate: false,
            date: None,
            image_style: ImageStyle::default(),
            image_size: ImageSize::Standard,
            suppress_image_text: true,
            retry: RetryPolicy::default(),
        }
    }

    /// Images live in an `images/` directory beside the output document.
    pub fn images_dir(&self) -> PathBuf {
        match self.output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join("images"),
            _ => PathBuf::from("images"),
        }
    }
}

/// Summary of a completed run, including the partial-completion note.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub slides: usize,
    pub images_generated: usize,
    pub images_reused: usize,
    /// Slide numbers whose image could not be acquired; those slides were
    /// rendered text-only.
    pub images_failed: Vec<u32>,
    pub output: PathBuf,
}

/// Sequences one document through parse, acquisition, build, and save.
pub struct Orchestrator<'a> {
    config: BuildConfig,
    renderer: &'a mut dyn DeckRenderer,
    generator: Option<&'a dyn ImageGenerator>,
    sink: &'a mut dyn ProgressSink,
    stage: Stage,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        config: BuildConfig,
        renderer: &'a mut dyn DeckRenderer,
        generator: Option<&'a dyn ImageGenerator>,
        sink: &'a mut dyn ProgressSink,
    ) -> Self {
        Self {
            config,
            renderer,
            generator,
            sink,
            stage: Stage::Parsing,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Run the full workflow over one document's text.
    pub fn run(&mut self, document_text: &str) -> Result<BuildReport> {
        let started = Instant::now();
        self.sink.emit(ProgressEvent::workflow_started());

        // Parsing: the one fatal early exit, before any external call.
        self.stage = Stage::Parsing;
        self.sink.emit(ProgressEvent::step_started("parse", 0));
        let mut slides = match deck_parser::parse_document(document_text) {
            Ok(slides) => slides,
            Err(err) => return self.fail("parse", err),
        };
        self.sink.emit(ProgressEvent::step_completed(
            "parse",
            vec![format!("{} slides", slides.len())],
        ));

        // Image acquisition: skippable, per-slide failures isolated.
        self.stage = Stage::ImageAcquisition;
        self.sink.emit(ProgressEvent::step_started("images", 1));
        let outcome = self.acquire_images(&slides);
        for &number in &outcome.failed {
            self.sink.emit(ProgressEvent::step_failed(
                "images",
                format!("image for slide {} unavailable", number),
                true,
            ));
        }
        if !outcome.failed.is_empty() {
            self.sink.emit(ProgressEvent::checkpoint(
                format!(
                    "{} slide image(s) unavailable; rendering those slides text-only",
                    outcome.failed.len()
                ),
                false,
            ));
        }
        self.sink.emit(ProgressEvent::step_completed(
            "images",
            vec![
                format!("{} generated", outcome.generated.len()),
                format!("{} reused", outcome.reused.len()),
            ],
        ));

        // Resolve image paths: freshly generated or a prior run's file,
        // discovered by the naming convention alone.
        let images_dir = self.config.images_dir();
        for slide in &mut slides {
            let path = image_path_for(&images_dir, slide.number);
            if path.exists() {
                slide.image_path = Some(path);
            }
        }

        // Building: ascending document order, one renderer call per slide.
        self.stage = Stage::Building;
        self.sink.emit(ProgressEvent::step_started("build", 2));
        for slide in &slides {
            if let Err(err) = self.render_slide(slide) {
                return self.fail("build", err);
            }
        }
        self.sink.emit(ProgressEvent::step_completed(
            "build",
            vec![format!("{} slides rendered", slides.len())],
        ));

        // Saving: the single commit point.
        self.stage = Stage::Saving;
        self.sink.emit(ProgressEvent::step_started("save", 3));
        if let Err(err) = self.commit() {
            return self.fail("save", err);
        }
        self.stage = Stage::Done;
        self.sink.emit(ProgressEvent::workflow_completed(
            self.config.output_path.display().to_string(),
            started.elapsed().as_secs_f64(),
        ));

        Ok(BuildReport {
            slides: slides.len(),
            images_generated: outcome.generated.len(),
            images_reused: outcome.reused.len(),
            images_failed: outcome.failed,
            output: self.config.output_path.clone(),
        })
    }

    fn acquire_images(&self, slides: &[Slide]) -> AcquisitionOutcome {
        let generator = match (self.config.skip_images, self.generator) {
            (false, Some(generator)) => generator,
            _ => {
                log::info!("Image acquisition skipped");
                return AcquisitionOutcome::default();
            }
        };

        let acquirer = ImageAcquirer {
            images_dir: self.config.images_dir(),
            style: self.config.image_style.clone(),
            size: self.config.image_size,
            suppress_text: self.config.suppress_image_text,
            force_regenerate: self.config.force_regenerate,
            retry: self.config.retry.clone(),
            generator,
        };
        acquirer.acquire(slides)
    }

    /// Dispatch one slide to its archetype's renderer operation, falling
    /// back to the plain content layout when a wanted image is missing.
    fn render_slide(&mut self, slide: &Slide) -> Result<()> {
        let archetype = SlideArchetype::from_type_label(&slide.slide_type);
        let image = slide.image_path.as_deref();

        match (archetype, image) {
            (SlideArchetype::Title, _) => self.renderer.add_title_slide(
                &slide.title,
                slide.subtitle.as_deref(),
                self.config.date.as_deref(),
            ),
            (SlideArchetype::SectionBreak, _) => self.renderer.add_section_break(&slide.title),
            (SlideArchetype::ImageFocused, Some(path)) if slide.content.is_empty() => self
                .renderer
                .add_image_slide(&slide.title, path, slide.subtitle.as_deref()),
            (SlideArchetype::ImageFocused, Some(path))
            | (SlideArchetype::Content, Some(path)) => {
                self.renderer
                    .add_text_and_image_slide(&slide.title, &slide.content, path)
            }
            (SlideArchetype::ImageFocused, None) | (SlideArchetype::Content, None) => {
                if archetype == SlideArchetype::ImageFocused {
                    log::warn!(
                        "Slide {} wants an image but none resolved; using content layout",
                        slide.number
                    );
                }
                self.renderer.add_content_slide(
                    &slide.title,
                    slide.subtitle.as_deref(),
                    &slide.content,
                )
            }
        }
    }

    /// Create the output directory and commit via save-then-rename, so a
    /// failed save never leaves a partial file at the final path.
    fn commit(&mut self) -> Result<()> {
        let output = self.config.output_path.clone();
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|err| Error::SaveFailed(format!("{}: {}", parent.display(), err)))?;
            }
        }

        let staging = staging_path(&output);
        self.renderer.save(&staging)?;
        fs::rename(&staging, &output)
            .map_err(|err| Error::SaveFailed(format!("{}: {}", output.display(), err)))?;
        Ok(())
    }

    fn fail(&mut self, step: &str, err: Error) -> Result<BuildReport> {
        self.stage = Stage::Failed;
        self.sink
            .emit(ProgressEvent::step_failed(step, err.to_string(), false));
        Err(err)
    }
}

fn staging_path(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "deck".to_string());
    output.with_file_name(format!("{}.tmp", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::{write_image_atomic, ImageError};
    use crate::progress::NullSink;
    use deck_core::ContentItem;
    use std::cell::RefCell;
    use std::time::Duration;

    const TWO_SLIDE_DOC: &str = "\
## **SLIDE 1: TITLE SLIDE**
**Title:** Launch Plan
**Subtitle:** Spring rollout

## **SLIDE 2: CONTENT**
**Title:** Timeline
**Content:**
- Kickoff
- Build
  - Integration week
**Graphic:** abstract blue waves
";

    /// Renderer that records the operation and title of every call.
    #[derive(Default)]
    struct RecordingRenderer {
        calls: Vec<String>,
        fail_save: bool,
    }

    impl DeckRenderer for RecordingRenderer {
        fn add_title_slide(
            &mut self,
            title: &str,
            _subtitle: Option<&str>,
            _date: Option<&str>,
        ) -> Result<()> {
            self.calls.push(format!("title:{}", title));
            Ok(())
        }

        fn add_section_break(&mut self, title: &str) -> Result<()> {
            self.calls.push(format!("section:{}", title));
            Ok(())
        }

        fn add_image_slide(
            &mut self,
            title: &str,
            _image_path: &Path,
            _subtitle: Option<&str>,
        ) -> Result<()> {
            self.calls.push(format!("image:{}", title));
            Ok(())
        }

        fn add_text_and_image_slide(
            &mut self,
            title: &str,
            _bullets: &[ContentItem],
            _image_path: &Path,
        ) -> Result<()> {
            self.calls.push(format!("text_image:{}", title));
            Ok(())
        }

        fn add_content_slide(
            &mut self,
            title: &str,
            _subtitle: Option<&str>,
            _bullets: &[ContentItem],
        ) -> Result<()> {
            self.calls.push(format!("content:{}", title));
            Ok(())
        }

        fn save(&mut self, path: &Path) -> Result<()> {
            if self.fail_save {
                return Err(Error::SaveFailed("disk full".into()));
            }
            fs::write(path, self.calls.join("\n")).map_err(Error::Io)?;
            Ok(())
        }
    }

    struct FixedGenerator {
        result: fn() -> std::result::Result<Vec<u8>, ImageError>,
        prompts: RefCell<Vec<String>>,
    }

    impl FixedGenerator {
        fn ok() -> Self {
            Self {
                result: || Ok(vec![0xFF, 0xD8]),
                prompts: RefCell::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                result: || Err(ImageError::SafetyRejected("rejected".into())),
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl ImageGenerator for FixedGenerator {
        fn generate(
            &self,
            prompt: &str,
            _style: &ImageStyle,
            _size: ImageSize,
            _suppress_text: bool,
        ) -> std::result::Result<Vec<u8>, ImageError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            (self.result)()
        }
    }

    /// Sink recording event discriminants in delivery order.
    #[derive(Default)]
    struct VecSink {
        names: Vec<&'static str>,
    }

    impl ProgressSink for VecSink {
        fn emit(&mut self, event: ProgressEvent) {
            self.names.push(match event {
                ProgressEvent::WorkflowStarted { .. } => "workflow_started",
                ProgressEvent::StepStarted { .. } => "step_started",
                ProgressEvent::StepCompleted { .. } => "step_completed",
                ProgressEvent::Checkpoint { .. } => "checkpoint",
                ProgressEvent::StepFailed { .. } => "step_failed",
                ProgressEvent::WorkflowCompleted { .. } => "workflow_completed",
            });
        }
    }

    fn test_config(dir: &Path) -> BuildConfig {
        let mut config = BuildConfig::new(dir.join("deck.txt"));
        config.retry = RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(1),
            multiplier: 2.0,
            max_delay: Duration::from_millis(2),
        };
        config
    }

    #[test]
    fn test_end_to_end_two_slide_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = RecordingRenderer::default();
        let generator = FixedGenerator::ok();
        let mut sink = NullSink;

        let config = test_config(dir.path());
        let output = config.output_path.clone();
        let mut orchestrator =
            Orchestrator::new(config, &mut renderer, Some(&generator), &mut sink);

        let report = orchestrator.run(TWO_SLIDE_DOC).unwrap();

        assert_eq!(report.slides, 2);
        assert_eq!(report.images_generated, 1);
        assert!(report.images_failed.is_empty());
        assert_eq!(orchestrator.stage(), Stage::Done);

        // Exactly one acquisition request, keyed by slide 2's graphic.
        assert_eq!(
            generator.prompts.borrow().as_slice(),
            ["abstract blue waves"]
        );
        assert!(dir.path().join("images").join("slide-2.jpg").exists());

        assert_eq!(
            renderer.calls,
            vec!["title:Launch Plan", "text_image:Timeline"]
        );
        assert!(output.exists());
        assert!(!staging_path(&output).exists());
    }

    #[test]
    fn test_image_failure_falls_back_to_content_slide() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = RecordingRenderer::default();
        let generator = FixedGenerator::failing();
        let mut sink = NullSink;

        let config = test_config(dir.path());
        let mut orchestrator =
            Orchestrator::new(config, &mut renderer, Some(&generator), &mut sink);

        let report = orchestrator.run(TWO_SLIDE_DOC).unwrap();

        assert_eq!(report.images_failed, vec![2]);
        assert_eq!(orchestrator.stage(), Stage::Done);
        assert_eq!(
            renderer.calls,
            vec!["title:Launch Plan", "content:Timeline"]
        );
    }

    #[test]
    fn test_skip_images_mode_makes_no_requests() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = RecordingRenderer::default();
        let generator = FixedGenerator::ok();
        let mut sink = NullSink;

        let mut config = test_config(dir.path());
        config.skip_images = true;
        let mut orchestrator =
            Orchestrator::new(config, &mut renderer, Some(&generator), &mut sink);

        orchestrator.run(TWO_SLIDE_DOC).unwrap();
        assert!(generator.prompts.borrow().is_empty());
        assert_eq!(
            renderer.calls,
            vec!["title:Launch Plan", "content:Timeline"]
        );
    }

    #[test]
    fn test_prior_run_images_discovered_even_when_skipping() {
        let dir = tempfile::tempdir().unwrap();
        write_image_atomic(&dir.path().join("images").join("slide-2.jpg"), b"prior").unwrap();

        let mut renderer = RecordingRenderer::default();
        let mut sink = NullSink;
        let mut config = test_config(dir.path());
        config.skip_images = true;
        let mut orchestrator = Orchestrator::new(config, &mut renderer, None, &mut sink);

        orchestrator.run(TWO_SLIDE_DOC).unwrap();
        assert_eq!(
            renderer.calls,
            vec!["title:Launch Plan", "text_image:Timeline"]
        );
    }

    #[test]
    fn test_parse_failure_aborts_before_external_calls() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = RecordingRenderer::default();
        let generator = FixedGenerator::ok();
        let mut sink = VecSink::default();

        let config = test_config(dir.path());
        let mut orchestrator =
            Orchestrator::new(config, &mut renderer, Some(&generator), &mut sink);

        let err = orchestrator.run("no slides here").unwrap_err();
        assert!(matches!(err, Error::NoSlidesFound));
        assert_eq!(orchestrator.stage(), Stage::Failed);
        assert!(renderer.calls.is_empty());
        assert!(generator.prompts.borrow().is_empty());
        assert_eq!(
            sink.names,
            vec!["workflow_started", "step_started", "step_failed"]
        );
    }

    #[test]
    fn test_save_failure_is_fatal_and_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = RecordingRenderer {
            fail_save: true,
            ..Default::default()
        };
        let mut sink = NullSink;

        let config = test_config(dir.path());
        let output = config.output_path.clone();
        let mut orchestrator = Orchestrator::new(config, &mut renderer, None, &mut sink);

        let err = orchestrator.run(TWO_SLIDE_DOC).unwrap_err();
        assert!(matches!(err, Error::SaveFailed(_)));
        assert_eq!(orchestrator.stage(), Stage::Failed);
        assert!(!output.exists());
    }

    #[test]
    fn test_event_order_matches_stage_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = RecordingRenderer::default();
        let mut sink = VecSink::default();

        let mut config = test_config(dir.path());
        config.skip_images = true;
        let mut orchestrator = Orchestrator::new(config, &mut renderer, None, &mut sink);
        orchestrator.run(TWO_SLIDE_DOC).unwrap();

        assert_eq!(
            sink.names,
            vec![
                "workflow_started",
                "step_started",
                "step_completed",
                "step_started",
                "step_completed",
                "step_started",
                "step_completed",
                "step_started",
                "workflow_completed",
            ]
        );
    }

    #[test]
    fn test_section_break_and_image_focused_dispatch() {
        let dir = tempfile::tempdir().unwrap();
        write_image_atomic(&dir.path().join("images").join("slide-2.jpg"), b"img").unwrap();

        let doc = "\
## Slide 1: Q&A
Title: Questions?

## Slide 2: ARCHITECTURE
Title: System View
Graphic: a block diagram

## Slide 3: ARCHITECTURE
Title: Missing Image
Graphic: never generated
";
        let mut renderer = RecordingRenderer::default();
        let mut sink = NullSink;
        let mut config = test_config(dir.path());
        config.skip_images = true;
        let mut orchestrator = Orchestrator::new(config, &mut renderer, None, &mut sink);
        orchestrator.run(doc).unwrap();

        assert_eq!(
            renderer.calls,
            vec![
                "section:Questions?",
                "image:System View",
                "content:Missing Image",
            ]
        );
    }
}
