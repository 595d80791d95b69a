//! GeminiAssistant - Gemini REST implementation of the assistant text gateway.
//!
//! Sends one user-role entry per call (persona instruction followed by the prompt)
//! and returns the first text part of the response. Every failure is mapped to a
//! fixed fallback reply; nothing is retried.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use solaris_core::AssistantError;
use solaris_core::config::AssistantConfig;
use solaris_core::gateway::AssistantGateway;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Reply when no API key is configured. Returned without a network call.
pub const ASSISTANT_SETUP_REQUIRED: &str = "⚠️ Solaris AI needs an API key to be configured.";
/// Reply when the request or its response fails.
pub const ASSISTANT_TECHNICAL_ISSUE: &str = "Oops! I ran into a technical problem. Please try again later.";
/// Reply when the model answers without any text.
pub const ASSISTANT_NO_IDEA: &str = "I couldn't think of anything right now! 🤯";

/// Assistant gateway that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiAssistant {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiAssistant {
    /// Creates an assistant with the provided API key and the default model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::build(Some(api_key.into()))
    }

    /// Creates an assistant with no credential. Every completion returns
    /// [`ASSISTANT_SETUP_REQUIRED`].
    pub fn unconfigured() -> Self {
        Self::build(None)
    }

    /// Model name defaults to `gemini-3-flash-preview` if not specified.
    pub fn from_config(config: &AssistantConfig) -> Self {
        let assistant = Self::build(config.api_key.clone());
        match &config.model_name {
            Some(model) if !model.trim().is_empty() => assistant.with_model(model.trim()),
            _ => assistant,
        }
    }

    fn build(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides the API base URL (models collection).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn try_complete(
        &self,
        prompt: &str,
        persona_instruction: &str,
    ) -> Result<String, AssistantError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AssistantError::MissingCredential)?;
        let body = GenerateContentRequest::single_turn(prompt, persona_instruction);
        self.send_request(api_key, &body).await
    }

    async fn send_request(
        &self,
        api_key: &str,
        body: &GenerateContentRequest,
    ) -> Result<String, AssistantError> {
        let url = format!(
            "{}/{model}:generateContent",
            self.base_url,
            model = self.model,
        );

        let response = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .json(body)
            .send()
            .await
            .map_err(|err| AssistantError::Transport(err.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| AssistantError::Decode(err.without_url().to_string()))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl AssistantGateway for GeminiAssistant {
    async fn complete(&self, prompt: &str, persona_instruction: &str) -> String {
        match self.try_complete(prompt, persona_instruction).await {
            Ok(text) => text,
            Err(AssistantError::MissingCredential) => {
                tracing::debug!("[Assistant] No API key configured");
                ASSISTANT_SETUP_REQUIRED.to_string()
            }
            Err(AssistantError::EmptyResponse) => {
                tracing::warn!("[Assistant] Response carried no text");
                ASSISTANT_NO_IDEA.to_string()
            }
            Err(err) => {
                tracing::error!("[Assistant] Completion failed: {}", err);
                ASSISTANT_TECHNICAL_ISSUE.to_string()
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

impl GenerateContentRequest {
    fn single_turn(prompt: &str, persona_instruction: &str) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: format!("{persona_instruction} User says: {prompt}"),
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, AssistantError> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .filter(|text| !text.trim().is_empty())
        .ok_or(AssistantError::EmptyResponse)
}

fn map_http_error(status: StatusCode, body: String) -> AssistantError {
    let message = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.clone());

    AssistantError::Status {
        status: status.as_u16(),
        message,
    }
}
