//! AI-assisted configuration changes.
//!
//! The current [`LogoConfig`] and a free-text instruction are sent to a
//! completion service together with a description of the expected output. The
//! service answers with configuration JSON, which is merged over the current
//! config and validated before it is returned. Nothing is applied on failure.
//!
//! # Example
//!
//! ```
//! use logoforge::ai::{CompletionRequest, CompletionService, GenerationError, generate_logo_modification};
//! use logoforge::LogoConfig;
//!
//! struct Canned;
//!
//! impl CompletionService for Canned {
//!     fn complete(&self, _request: &CompletionRequest) -> Result<String, GenerationError> {
//!         Ok(r##"{"bgColor": "#1E3A8A", "gapSize": 32}"##.to_string())
//!     }
//! }
//!
//! let current = LogoConfig::default();
//! let next = generate_logo_modification(&Canned, &current, "navy background, wider gap").unwrap();
//! assert_eq!(next.bg_color, "#1E3A8A");
//! assert_eq!(next.gap_size, 32.0);
//! assert_eq!(next.text_main, current.text_main);
//! ```

pub mod gemini;
pub mod schema;

pub use gemini::GeminiClient;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::{ConfigError, LogoConfig, LogoConfigPatch};

/// The single message shown to users for any generation failure.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Could not generate logo. Please check your API key or try a different prompt.";

// ============================================================================
// Errors
// ============================================================================

/// Why a generation attempt failed.
///
/// Callers presenting errors to users should show [`GENERIC_FAILURE_MESSAGE`]
/// regardless of the variant; the detail is for logs.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no API key configured (set GEMINI_API_KEY)")]
    MissingCredentials,

    #[error("completion request failed: {0}")]
    Network(String),

    #[error("completion service returned HTTP {0}")]
    Status(u16),

    #[error("malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("completion produced an invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl GenerationError {
    /// The message to show to users.
    pub fn user_message(&self) -> &'static str {
        GENERIC_FAILURE_MESSAGE
    }
}

// ============================================================================
// Service Seam
// ============================================================================

/// Everything a completion service needs to answer one request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_instruction: String,
    pub prompt: String,
    /// Description of the expected JSON output.
    pub response_schema: Value,
}

impl CompletionRequest {
    /// Builds the request for modifying `current` according to `instruction`.
    pub fn for_modification(
        current: &LogoConfig,
        instruction: &str,
    ) -> Result<Self, GenerationError> {
        let prompt = schema::build_prompt(current, instruction)
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
        Ok(Self {
            system_instruction: schema::SYSTEM_INSTRUCTION.to_string(),
            prompt,
            response_schema: schema::response_schema(),
        })
    }
}

/// A remote text-generation endpoint returning structured data.
///
/// Implementations return the model's raw JSON text.
pub trait CompletionService: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError>;
}

// ============================================================================
// Generation
// ============================================================================

/// Asks `service` for a modified version of `current`.
///
/// `current` is never mutated. Any failure is logged and returned as a single
/// [`GenerationError`]; there is no retry.
pub fn generate_logo_modification(
    service: &dyn CompletionService,
    current: &LogoConfig,
    instruction: &str,
) -> Result<LogoConfig, GenerationError> {
    let result = CompletionRequest::for_modification(current, instruction)
        .and_then(|request| {
            debug!(prompt_len = request.prompt.len(), "sending completion request");
            service.complete(&request)
        })
        .and_then(|text| parse_response(current, &text));

    match &result {
        Ok(config) => info!(text_main = %config.text_main, "generated logo modification"),
        Err(e) => error!("logo generation failed: {e}"),
    }
    result
}

/// Parses the service's text into a complete, validated config.
///
/// The text may be wrapped in a Markdown code fence. Fields the service left
/// out keep their current values.
pub fn parse_response(current: &LogoConfig, text: &str) -> Result<LogoConfig, GenerationError> {
    let json = strip_code_fence(text);
    let patch = LogoConfigPatch::from_json(json)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    if patch.is_empty() {
        return Err(GenerationError::MalformedResponse(
            "response contains no configuration fields".to_string(),
        ));
    }

    let next = patch.apply_to(current);
    next.validate()?;
    Ok(next)
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an info string such as `json` on the opening line
    let inner = match inner.find('\n') {
        Some(newline) => &inner[newline + 1..],
        None => inner.strip_prefix("json").unwrap_or(inner),
    };
    inner.trim_end().trim_end_matches("```").trim()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replies with a scripted result and records the requests it saw.
    struct Scripted {
        reply: Result<String, u16>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl Scripted {
        fn ok(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn status(code: u16) -> Self {
            Self {
                reply: Err(code),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl CompletionService for Scripted {
        fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(code) => Err(GenerationError::Status(*code)),
            }
        }
    }

    #[test]
    fn full_response_replaces_config() {
        let mut wanted = LogoConfig::default();
        wanted.font_family = "Georgia, serif".into();
        wanted.gap_size = 45.0;
        let service = Scripted::ok(&wanted.to_json().unwrap());

        let next = generate_logo_modification(&service, &LogoConfig::default(), "serif").unwrap();
        assert_eq!(next, wanted);
    }

    #[test]
    fn request_carries_config_instruction_and_schema() {
        let service = Scripted::ok(r#"{"textMain": "Nova"}"#);
        generate_logo_modification(&service, &LogoConfig::default(), "rename to Nova").unwrap();

        let seen = service.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].prompt.contains("\"textMain\": \"Dimo\""));
        assert!(seen[0].prompt.contains("rename to Nova"));
        assert_eq!(seen[0].response_schema["type"], "OBJECT");
    }

    #[test]
    fn fenced_json_is_accepted() {
        let text = "```json\n{\"textTagline\": \"BUILDERS\"}\n```";
        let next = parse_response(&LogoConfig::default(), text).unwrap();
        assert_eq!(next.text_tagline, "BUILDERS");
    }

    #[test]
    fn service_failure_is_returned() {
        let service = Scripted::status(503);
        let err = generate_logo_modification(&service, &LogoConfig::default(), "x").unwrap_err();
        assert!(matches!(err, GenerationError::Status(503)));
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn malformed_responses_are_rejected() {
        let current = LogoConfig::default();
        for text in ["", "not json", "[1, 2]", "{}", r#"{"gapSize": "wide"}"#] {
            let err = parse_response(&current, text).unwrap_err();
            assert!(
                matches!(err, GenerationError::MalformedResponse(_)),
                "{text:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn invalid_colors_are_rejected() {
        let err = parse_response(&LogoConfig::default(), r#"{"colorMain": "reddish"}"#).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidConfig(_)));
    }

    #[test]
    fn strip_code_fence_variants() {
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("```json\n{}\n```\n"), "{}");
        assert_eq!(strip_code_fence("```json{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn single_line_fence_is_accepted() {
        let text = "```json{\"gapSize\": 12}```";
        let next = parse_response(&LogoConfig::default(), text).unwrap();
        assert_eq!(next.gap_size, 12.0);
    }
}
