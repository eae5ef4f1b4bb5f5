//! Gemini `generateContent` client.
//!
//! The API key travels in the `x-goog-api-key` header rather than the query string,
//! so request URLs are safe to log.

use std::time::{Duration, Instant};

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use super::{http_client, status_error, timeout_from_env, TextModel, USER_AGENT_VALUE};
use crate::error::ModelError;

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Clone)]
pub struct Gemini {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
  pub temperature: f32,
}

impl Gemini {
  /// Construct the client if we find GEMINI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.trim().is_empty())?;
    let base_url = std::env::var("GEMINI_BASE_URL")
      .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into());
    let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.0-flash".into());
    Self::new(api_key, base_url, model, timeout_from_env())
  }

  pub fn new(api_key: String, base_url: String, model: String, timeout: Duration) -> Option<Self> {
    let client = http_client(timeout)?;
    Some(Self { client, api_key, base_url, model, temperature: 0.7 })
  }

  #[instrument(level = "info", skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
  async fn generate_content(&self, prompt: &str) -> Result<String, ModelError> {
    let url = format!("{}/models/{}:generateContent", self.base_url.trim_end_matches('/'), self.model);
    let req = GenerateRequest {
      contents: vec![Content { parts: vec![Part { text: Some(prompt.to_string()) }] }],
      generation_config: GenerationConfig { temperature: self.temperature },
    };

    let start = Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, USER_AGENT_VALUE)
      .header(CONTENT_TYPE, "application/json")
      .header(API_KEY_HEADER, &self.api_key)
      .json(&req).send().await?;

    if !res.status().is_success() {
      let err = status_error(res).await;
      error!(elapsed = ?start.elapsed(), error = %err, "Gemini call failed");
      return Err(err);
    }

    let body: GenerateResponse = res.json().await?;
    if let Some(usage) = &body.usage_metadata {
      info!(prompt_tokens = ?usage.prompt_token_count, completion_tokens = ?usage.candidates_token_count, total_tokens = ?usage.total_token_count, "Gemini usage");
    }

    let candidate = body.candidates.into_iter().next().ok_or_else(|| {
      let reason = body.prompt_feedback
        .and_then(|f| f.block_reason)
        .unwrap_or_else(|| "no candidates".into());
      ModelError::Malformed(format!("Gemini returned no candidates ({reason})"))
    })?;
    let content = candidate.content
      .ok_or_else(|| ModelError::Malformed("Gemini candidate has no content".into()))?;

    // Multi-part replies are concatenated in order.
    let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();

    info!(elapsed = ?start.elapsed(), response_len = text.len(), "Gemini response received");
    Ok(text)
  }
}

impl TextModel for Gemini {
  async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
    self.generate_content(prompt).await
  }

  fn model_name(&self) -> &str { &self.model }
}

// --- generateContent DTOs ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
  contents: Vec<Content>,
  generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
  #[serde(default)]
  parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  text: Option<String>,
}

#[derive(Serialize)]
struct GenerationConfig { temperature: f32 }

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
  #[serde(default)]
  candidates: Vec<Candidate>,
  #[serde(default)]
  prompt_feedback: Option<PromptFeedback>,
  #[serde(default)]
  usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
  #[serde(default)]
  content: Option<Content>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
  #[serde(default)]
  block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
  #[serde(default)] prompt_token_count: Option<u32>,
  #[serde(default)] candidates_token_count: Option<u32>,
  #[serde(default)] total_token_count: Option<u32>,
}
