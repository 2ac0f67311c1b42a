//! HTTP adapter for the Gemini text-generation API.

use std::{env, time::Duration};

use gestor_config::InsightSettings;
use gestor_core::{InsightError, InsightProvider};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Blocking client for `models/{model}:generateContent`.
pub struct GeminiProvider {
    agent: ureq::Agent,
    timeout: Option<Duration>,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    api_key_env: String,
}

impl GeminiProvider {
    pub fn new(settings: &InsightSettings, api_key: Option<String>) -> Self {
        let timeout = settings
            .timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        let mut builder = ureq::AgentBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            agent: builder.build(),
            timeout,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            api_key_env: settings.api_key_env.clone(),
        }
    }

    /// Reads the API key from the environment variable named in `settings`.
    pub fn from_settings(settings: &InsightSettings) -> Self {
        Self::new(settings, env::var(&settings.api_key_env).ok())
    }

    pub fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl InsightProvider for GeminiProvider {
    fn generate(&self, prompt: &str) -> Result<String, InsightError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| InsightError::MissingApiKey(self.api_key_env.clone()))?;

        debug!(model = %self.model, "requesting insight");
        let response = self
            .agent
            .post(&self.url())
            .query("key", key)
            .send_json(GenerateRequest::from_prompt(prompt))
            .map_err(|err| InsightError::Transport(err.to_string()))?;
        let body: GenerateResponse = response
            .into_json()
            .map_err(|err| InsightError::InvalidResponse(err.to_string()))?;
        body.text()
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

impl GenerateRequest {
    fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Result<String, InsightError> {
        let candidate = self
            .candidates
            .first()
            .ok_or_else(|| InsightError::InvalidResponse("no candidates returned".into()))?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .map(|part| part.text.as_str())
            .collect();
        if text.trim().is_empty() {
            return Err(InsightError::InvalidResponse("empty candidate text".into()));
        }
        Ok(text)
    }
}
