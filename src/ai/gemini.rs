//! Gemini `generateContent` client.

use std::time::Duration;

use serde_json::{Value, json};
use tracing::{debug, warn};

use super::{CompletionRequest, CompletionService, GenerationError};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variables checked for the API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Blocking client for the Gemini API.
///
/// A missing API key is not an error until a request is made, so the client
/// can always be constructed and the failure is reported like any other.
pub struct GeminiClient {
    agent: ureq::Agent,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Creates a client reading the API key from the environment.
    pub fn from_env() -> Self {
        let api_key = API_KEY_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|key| !key.trim().is_empty());
        Self::new(api_key)
    }

    pub fn new(api_key: Option<String>) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .into();
        Self {
            agent,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl CompletionService for GeminiClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(GenerationError::MissingCredentials)?;

        let url = self.endpoint();
        debug!(%url, model = %self.model, "calling gemini");

        let response: Value = self
            .agent
            .post(&url)
            .header("x-goog-api-key", api_key)
            .send_json(build_payload(request))
            .map_err(|e| match e {
                ureq::Error::StatusCode(code) => {
                    warn!(code, "gemini returned an error status");
                    GenerationError::Status(code)
                }
                other => GenerationError::Network(other.to_string()),
            })?
            .into_body()
            .read_json()
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        extract_text(&response)
    }
}

fn build_payload(request: &CompletionRequest) -> Value {
    json!({
        "systemInstruction": {
            "parts": [{ "text": request.system_instruction }]
        },
        "contents": [{
            "role": "user",
            "parts": [{ "text": request.prompt }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": request.response_schema,
        }
    })
}

/// Concatenates the non-thought text parts of the first candidate.
fn extract_text(response: &Value) -> Result<String, GenerationError> {
    let parts = response
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
        .ok_or_else(|| GenerationError::MalformedResponse("no candidates in response".into()))?;

    let text: String = parts
        .iter()
        .filter(|p| !p.get("thought").and_then(|t| t.as_bool()).unwrap_or(false))
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.trim().is_empty() {
        return Err(GenerationError::MalformedResponse(
            "response has no text".into(),
        ));
    }
    Ok(text)
}
