//! Application state: the current logo, its preview and AI generation status.
//!
//! [`LogoStudio`] is the single owner of the configuration. Every transition
//! (a form edit, a patch, a reset or an AI response) builds a new
//! [`LogoConfig`] and swaps it in behind a fresh `Arc`, re-rendering the
//! preview immediately. Nothing mutates the current config in place, so a
//! caller holding the previous `Arc` keeps seeing the previous logo.
//!
//! # Generation
//!
//! AI generation is split into three steps so the remote call can run off the
//! owning thread:
//!
//! 1. [`LogoStudio::begin_generation`] moves the studio to
//!    [`GenerationState::Generating`] and hands out a [`GenerationRequest`]
//! 2. [`GenerationRequest::run`] or [`GenerationRequest::spawn`] calls the
//!    completion service and yields a [`GenerationOutcome`]
//! 3. [`LogoStudio::complete_generation`] applies the outcome
//!
//! Only one request is in flight at a time. While generating, edits and new
//! submissions are rejected with [`StudioError::Busy`]. An outcome whose
//! request is no longer current (for example after [`LogoStudio::reset`]) is
//! discarded.
//!
//! ```
//! use logoforge::ai::{CompletionRequest, CompletionService, GenerationError};
//! use logoforge::{GenerationState, LogoStudio};
//!
//! struct Offline;
//!
//! impl CompletionService for Offline {
//!     fn complete(&self, _: &CompletionRequest) -> Result<String, GenerationError> {
//!         Err(GenerationError::Network("offline".into()))
//!     }
//! }
//!
//! let mut studio = LogoStudio::new();
//! let before = studio.config().clone();
//!
//! let request = studio.begin_generation("make it green").unwrap();
//! let outcome = request.run(&Offline);
//! assert!(studio.complete_generation(outcome));
//!
//! assert!(matches!(studio.state(), GenerationState::Failed { .. }));
//! assert!(std::sync::Arc::ptr_eq(studio.config(), &before));
//! ```

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ai::{CompletionService, GenerationError, generate_logo_modification};
use crate::config::{ConfigError, LogoConfig, LogoConfigPatch};
use crate::edit::LogoEdit;
use crate::export::{ExportArtifact, ExportError, ExportOptions, Exporter, export_svg};
use crate::render::{LogoSvg, render_logo};

// ============================================================================
// Errors
// ============================================================================

/// Error returned when the studio refuses a transition.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("a generation request is already in progress")]
    Busy,

    #[error("the prompt is empty")]
    EmptyPrompt,

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    /// Generation ran and failed. Carries the user-facing message.
    #[error("{0}")]
    GenerationFailed(&'static str),
}

// ============================================================================
// Generation State
// ============================================================================

/// Where the studio is in the AI generation cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Generating { request_id: u64 },
    /// The last request failed; the config is unchanged.
    Failed { message: &'static str },
}

/// One in-flight generation, detached from the studio.
///
/// Holds a snapshot of the config at submission time, so the studio is free
/// while the request runs.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    id: u64,
    base: Arc<LogoConfig>,
    prompt: String,
}

impl GenerationRequest {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Calls `service` on the current thread.
    pub fn run(self, service: &dyn CompletionService) -> GenerationOutcome {
        debug!(request_id = self.id, "running generation request");
        let result = generate_logo_modification(service, &self.base, &self.prompt);
        GenerationOutcome {
            request_id: self.id,
            result,
        }
    }

    /// Calls `service` on a background thread.
    pub fn spawn(self, service: Arc<dyn CompletionService>) -> JoinHandle<GenerationOutcome> {
        thread::spawn(move || self.run(service.as_ref()))
    }
}

/// The result of a [`GenerationRequest`], to be handed back to the studio.
#[derive(Debug)]
pub struct GenerationOutcome {
    request_id: u64,
    result: Result<LogoConfig, GenerationError>,
}

impl GenerationOutcome {
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

// ============================================================================
// LogoStudio
// ============================================================================

/// The editable logo and everything shown around it.
#[derive(Debug)]
pub struct LogoStudio {
    config: Arc<LogoConfig>,
    /// Preview of `config`, refreshed on every replacement.
    rendered: LogoSvg,
    state: GenerationState,
    prompt: String,
    next_request_id: u64,
}

impl Default for LogoStudio {
    fn default() -> Self {
        Self::new()
    }
}

impl LogoStudio {
    /// Creates a studio showing the default logo.
    pub fn new() -> Self {
        let config = LogoConfig::default();
        Self {
            rendered: render_logo(&config),
            config: Arc::new(config),
            state: GenerationState::Idle,
            prompt: String::new(),
            next_request_id: 1,
        }
    }

    /// Creates a studio starting from `config`, which must be valid.
    pub fn with_config(config: LogoConfig) -> Result<Self, StudioError> {
        config.validate()?;
        let mut studio = Self::new();
        studio.replace(config);
        Ok(studio)
    }

    pub fn config(&self) -> &Arc<LogoConfig> {
        &self.config
    }

    /// The preview of the current config.
    pub fn render(&self) -> &LogoSvg {
        &self.rendered
    }

    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.state, GenerationState::Generating { .. })
    }

    /// The message to display, if the last generation failed.
    pub fn error_message(&self) -> Option<&'static str> {
        match self.state {
            GenerationState::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    // ------------------------------------------------------------------------
    // Manual changes
    // ------------------------------------------------------------------------

    /// Applies one form-control edit.
    pub fn edit(&mut self, edit: LogoEdit) -> Result<(), StudioError> {
        self.ensure_idle()?;
        let next = edit.apply(&self.config);
        self.replace(next);
        Ok(())
    }

    /// Merges `patch` over the current config. Nothing changes if the result
    /// is invalid.
    pub fn apply_patch(&mut self, patch: &LogoConfigPatch) -> Result<(), StudioError> {
        self.ensure_idle()?;
        let next = self.config.merged(patch);
        next.validate()?;
        self.replace(next);
        Ok(())
    }

    /// Restores the default logo and clears the prompt and any error.
    ///
    /// An in-flight request is abandoned; its outcome will be discarded.
    pub fn reset(&mut self) {
        if let GenerationState::Generating { request_id } = self.state {
            info!(request_id, "reset abandons in-flight generation");
        }
        self.replace(LogoConfig::default());
        self.prompt.clear();
        self.state = GenerationState::Idle;
    }

    // ------------------------------------------------------------------------
    // Generation
    // ------------------------------------------------------------------------

    /// Submits `prompt` for generation.
    pub fn begin_generation(
        &mut self,
        prompt: impl Into<String>,
    ) -> Result<GenerationRequest, StudioError> {
        self.ensure_idle()?;
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(StudioError::EmptyPrompt);
        }

        let id = self.next_request_id;
        self.next_request_id += 1;
        self.prompt = prompt.clone();
        self.state = GenerationState::Generating { request_id: id };
        debug!(request_id = id, "generation started");

        Ok(GenerationRequest {
            id,
            base: Arc::clone(&self.config),
            prompt,
        })
    }

    /// Applies `outcome` if it answers the current request.
    ///
    /// Returns `false` when the outcome is stale and was ignored.
    pub fn complete_generation(&mut self, outcome: GenerationOutcome) -> bool {
        match self.state {
            GenerationState::Generating { request_id } if request_id == outcome.request_id => {}
            _ => {
                debug!(
                    request_id = outcome.request_id,
                    "discarding stale generation outcome"
                );
                return false;
            }
        }

        match outcome.result {
            Ok(config) => {
                self.replace(config);
                self.state = GenerationState::Idle;
            }
            Err(e) => {
                warn!(request_id = outcome.request_id, "generation failed: {e}");
                self.state = GenerationState::Failed {
                    message: e.user_message(),
                };
            }
        }
        true
    }

    /// Submits `prompt` and waits for the result on the current thread.
    pub fn generate(
        &mut self,
        service: &dyn CompletionService,
        prompt: impl Into<String>,
    ) -> Result<(), StudioError> {
        let request = self.begin_generation(prompt)?;
        let outcome = request.run(service);
        self.complete_generation(outcome);
        match self.error_message() {
            Some(message) => Err(StudioError::GenerationFailed(message)),
            None => Ok(()),
        }
    }

    // ------------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------------

    pub fn export_svg(&self) -> ExportArtifact {
        export_svg(&self.config, &self.rendered)
    }

    pub fn export_png(
        &self,
        exporter: &Exporter,
        opts: &ExportOptions,
    ) -> Result<ExportArtifact, ExportError> {
        exporter.export_png(&self.config, &self.rendered, opts)
    }

    fn ensure_idle(&self) -> Result<(), StudioError> {
        if self.is_generating() {
            return Err(StudioError::Busy);
        }
        Ok(())
    }

    fn replace(&mut self, config: LogoConfig) {
        self.rendered = render_logo(&config);
        self.config = Arc::new(config);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{CompletionRequest, GENERIC_FAILURE_MESSAGE};
    use crate::config::FontOption;
    use crate::edit::{ColorSlot, Slider};
    use palette::Srgb;

    struct Reply(&'static str);

    impl CompletionService for Reply {
        fn complete(&self, _: &CompletionRequest) -> Result<String, GenerationError> {
            Ok(self.0.to_string())
        }
    }

    struct Offline;

    impl CompletionService for Offline {
        fn complete(&self, _: &CompletionRequest) -> Result<String, GenerationError> {
            Err(GenerationError::Network("connection refused".into()))
        }
    }

    #[test]
    fn starts_with_default_logo() {
        let studio = LogoStudio::new();
        assert_eq!(**studio.config(), LogoConfig::default());
        assert_eq!(studio.state(), &GenerationState::Idle);
        assert!(studio.render().markup().contains(">imo</tspan>"));
    }

    #[test]
    fn edits_replace_config_and_preview() {
        let mut studio = LogoStudio::new();
        let before = studio.config().clone();

        studio.edit(LogoEdit::TextMain("Acme".into())).unwrap();
        studio
            .edit(LogoEdit::Color(ColorSlot::Background, Srgb::new(0x11, 0x22, 0x33)))
            .unwrap();
        studio.edit(LogoEdit::Font(FontOption::Georgia)).unwrap();
        studio.edit(LogoEdit::Slider(Slider::GapSize, 500.0)).unwrap();

        let config = studio.config();
        assert!(!Arc::ptr_eq(config, &before));
        assert_eq!(before.text_main, "Dimo");
        assert_eq!(config.text_main, "Acme");
        assert_eq!(config.bg_color, "#112233");
        assert_eq!(config.font_family, "Georgia, serif");
        assert_eq!(config.gap_size, 100.0);
        assert!(studio.render().markup().contains(">cme</tspan>"));
        assert!(studio.render().markup().contains("fill=\"#112233\""));
    }

    #[test]
    fn invalid_patch_changes_nothing() {
        let mut studio = LogoStudio::new();
        let before = studio.config().clone();
        let patch = LogoConfigPatch {
            bg_color: Some("not-a-color".into()),
            ..Default::default()
        };

        assert!(matches!(
            studio.apply_patch(&patch),
            Err(StudioError::InvalidConfig(_))
        ));
        assert!(Arc::ptr_eq(studio.config(), &before));
    }

    #[test]
    fn reset_restores_defaults_and_clears_prompt() {
        let mut studio = LogoStudio::new();
        studio.edit(LogoEdit::TextTagline("ROOFING".into())).unwrap();
        studio.generate(&Offline, "anything").unwrap_err();
        assert_eq!(studio.error_message(), Some(GENERIC_FAILURE_MESSAGE));

        studio.reset();
        assert_eq!(**studio.config(), LogoConfig::default());
        assert_eq!(studio.render(), &render_logo(&LogoConfig::default()));
        assert_eq!(studio.prompt(), "");
        assert_eq!(studio.error_message(), None);
    }

    #[test]
    fn successful_generation_replaces_config() {
        let mut studio = LogoStudio::new();
        studio
            .generate(&Reply(r##"{"bgColor": "#FFFFFF", "colorTagline": "#000000"}"##), "invert")
            .unwrap();

        assert_eq!(studio.state(), &GenerationState::Idle);
        assert_eq!(studio.config().bg_color, "#FFFFFF");
        assert_eq!(studio.config().text_main, "Dimo");
        assert_eq!(studio.prompt(), "invert");
    }

    #[test]
    fn failed_generation_keeps_same_config() {
        let mut studio = LogoStudio::new();
        let before = studio.config().clone();

        let err = studio.generate(&Offline, "make it pop").unwrap_err();
        assert_eq!(err.to_string(), GENERIC_FAILURE_MESSAGE);
        assert!(Arc::ptr_eq(studio.config(), &before));
        assert_eq!(
            studio.state(),
            &GenerationState::Failed {
                message: GENERIC_FAILURE_MESSAGE
            }
        );
    }

    #[test]
    fn malformed_reply_keeps_same_config() {
        let mut studio = LogoStudio::new();
        let before = studio.config().clone();

        studio
            .generate(&Reply(r#"{"gapSize": "huge"}"#), "wider")
            .unwrap_err();
        assert!(Arc::ptr_eq(studio.config(), &before));
    }

    #[test]
    fn blank_prompt_is_rejected() {
        let mut studio = LogoStudio::new();
        assert!(matches!(
            studio.begin_generation("   "),
            Err(StudioError::EmptyPrompt)
        ));
        assert_eq!(studio.state(), &GenerationState::Idle);
    }

    #[test]
    fn busy_studio_rejects_edits_and_resubmission() {
        let mut studio = LogoStudio::new();
        let request = studio.begin_generation("bolder").unwrap();

        assert!(matches!(
            studio.edit(LogoEdit::TextMain("X".into())),
            Err(StudioError::Busy)
        ));
        assert!(matches!(
            studio.apply_patch(&LogoConfigPatch::new()),
            Err(StudioError::Busy)
        ));
        assert!(matches!(
            studio.begin_generation("again"),
            Err(StudioError::Busy)
        ));

        assert!(studio.complete_generation(request.run(&Reply(r#"{"textMain": "Bold"}"#))));
        assert_eq!(studio.config().text_main, "Bold");
        studio.edit(LogoEdit::TextMain("X".into())).unwrap();
    }

    #[test]
    fn outcome_after_reset_is_stale() {
        let mut studio = LogoStudio::new();
        let request = studio.begin_generation("purple").unwrap();
        studio.reset();

        let outcome = request.run(&Reply(r#"{"bgColor": "purple"}"#));
        assert!(outcome.is_success());
        assert!(!studio.complete_generation(outcome));
        assert_eq!(**studio.config(), LogoConfig::default());
        assert_eq!(studio.state(), &GenerationState::Idle);
    }

    #[test]
    fn outcome_of_superseded_request_is_stale() {
        let mut studio = LogoStudio::new();
        let first = studio.begin_generation("one").unwrap();
        studio.reset();
        let second = studio.begin_generation("two").unwrap();
        assert_ne!(first.id(), second.id());

        assert!(!studio.complete_generation(first.run(&Reply(r#"{"textMain": "One"}"#))));
        assert!(studio.is_generating());
        assert!(studio.complete_generation(second.run(&Reply(r#"{"textMain": "Two"}"#))));
        assert_eq!(studio.config().text_main, "Two");
    }

    #[test]
    fn request_uses_config_at_submission() {
        let mut studio = LogoStudio::new();
        studio.edit(LogoEdit::TextMain("Snap".into())).unwrap();
        let request = studio.begin_generation("tagline only").unwrap();

        let outcome = request.run(&Reply(r#"{"textTagline": "SHOT"}"#));
        studio.complete_generation(outcome);
        assert_eq!(studio.config().text_main, "Snap");
        assert_eq!(studio.config().text_tagline, "SHOT");
    }

    #[test]
    fn spawned_request_completes_on_background_thread() {
        let mut studio = LogoStudio::new();
        let request = studio.begin_generation("serif").unwrap();
        let service: Arc<dyn CompletionService> = Arc::new(Reply(r#"{"fontFamily": "Georgia, serif"}"#));

        let outcome = request.spawn(service).join().unwrap();
        assert!(studio.complete_generation(outcome));
        assert_eq!(studio.config().font_family, "Georgia, serif");
    }

    #[test]
    fn exports_follow_current_config() {
        let mut studio = LogoStudio::new();
        studio.edit(LogoEdit::TextSecondary("X".into())).unwrap();

        let svg = studio.export_svg();
        assert_eq!(svg.file_name, "Dimo_X_logo.svg");
        assert_eq!(svg.bytes, studio.render().markup().as_bytes());

        let png = studio
            .export_png(&Exporter::without_system_fonts(), &ExportOptions::default())
            .unwrap();
        assert_eq!(png.file_name, "Dimo_X_logo.png");
    }

    #[test]
    fn with_config_validates() {
        let bad = LogoConfig {
            letter_spacing_main: f64::INFINITY,
            ..Default::default()
        };
        assert!(LogoStudio::with_config(bad).is_err());

        let good = LogoConfig {
            text_main: "Ok".into(),
            ..Default::default()
        };
        let studio = LogoStudio::with_config(good).unwrap();
        assert_eq!(studio.config().text_main, "Ok");
    }
}
