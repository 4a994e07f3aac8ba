//! Gemini client: implements the core `ContentGenerator` trait over
//! `models/{model}:generateContent`.

use async_trait::async_trait;
use readme_bot_core::contract::{BoxError, ContentGenerator};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::http::{build_client, join_segments, parse_base_url, read_json};

pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-pro";
const SERVICE: &str = "Gemini";

pub struct GeminiClient {
    client: reqwest::Client,
    base_url: Url,
    model: String,
    api_key: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    pub fn single_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

// Finish reasons after which the candidate text must not be used.
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "LANGUAGE",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
];

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    ///
    /// Blocked or text-less answers are errors, never an empty document.
    pub fn text(self) -> Result<String, BoxError> {
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);
        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(match block_reason {
                Some(reason) => format!("Gemini returned no candidates (blocked: {})", reason),
                None => "Gemini returned no candidates".to_string(),
            }
            .into());
        };
        if let Some(reason) = candidate.finish_reason.as_deref() {
            tracing::debug!(finish_reason = reason, "Gemini candidate finished");
            if BLOCKING_FINISH_REASONS.contains(&reason) {
                return Err(format!("Gemini response blocked (finish reason: {})", reason).into());
            }
        }
        let texts: Vec<String> = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if texts.is_empty() {
            return Err("Gemini returned a candidate without text".into());
        }
        Ok(texts.concat())
    }
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Result<Self, BoxError> {
        let base_url = parse_base_url(base_url)?;
        tracing::info!(base_url = %base_url, model, "Initialized GeminiClient");
        Ok(Self {
            client: build_client()?,
            base_url,
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub(crate) fn generate_url(&self) -> Result<Url, BoxError> {
        let action = format!("{}:generateContent", self.model);
        join_segments(&self.base_url, ["v1beta", "models", action.as_str()])
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate_content(&self, prompt: &str) -> Result<String, BoxError> {
        let url = self.generate_url()?;
        tracing::info!(model = %self.model, prompt_bytes = prompt.len(), "Requesting generation");

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&GenerateContentRequest::single_prompt(prompt))
            .send()
            .await?;
        let generated: GenerateContentResponse = read_json(SERVICE, response).await?;
        let text = generated.text()?;

        tracing::info!(response_bytes = text.len(), "Generation complete");
        Ok(text)
    }
}
