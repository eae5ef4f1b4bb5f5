//! Minimal OpenAI-compatible client (chat.completions, plain text only).
//!
//! Calls are instrumented and log model names, latencies, and response sizes (not contents).
//!
//! NOTE: We never log the API key or prompt text.

use std::time::{Duration, Instant};

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use super::{http_client, status_error, timeout_from_env, TextModel, USER_AGENT_VALUE};
use crate::error::ModelError;

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
  pub temperature: f32,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty())?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
    Self::new(api_key, base_url, model, timeout_from_env())
  }

  pub fn new(api_key: String, base_url: String, model: String, timeout: Duration) -> Option<Self> {
    let client = http_client(timeout)?;
    Some(Self { client, api_key, base_url, model, temperature: 0.7 })
  }

  #[instrument(level = "info", skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
  async fn chat_plain(&self, prompt: &str) -> Result<String, ModelError> {
    let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![ChatMessageReq { role: "user".into(), content: prompt.into() }],
      temperature: self.temperature,
    };

    let start = Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, USER_AGENT_VALUE)
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await?;

    if !res.status().is_success() {
      let err = status_error(res).await;
      error!(elapsed = ?start.elapsed(), error = %err, "OpenAI call failed");
      return Err(err);
    }

    let body: ChatCompletionResponse = res.json().await?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let choice = body.choices.into_iter().next()
      .ok_or_else(|| ModelError::Malformed("no choices in completion".into()))?;
    let text = choice.message.content.unwrap_or_default();

    info!(elapsed = ?start.elapsed(), response_len = text.len(), "OpenAI response received");
    Ok(text)
  }
}

impl TextModel for OpenAI {
  async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
    self.chat_plain(prompt).await
  }

  fn model_name(&self) -> &str { &self.model }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use wiremock::matchers::{header, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  fn client(server: &MockServer) -> OpenAI {
    OpenAI::new("sk-test".into(), server.uri(), "gpt-4o-mini".into(), Duration::from_secs(5)).unwrap()
  }

  #[tokio::test]
  async fn returns_first_choice_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/chat/completions"))
      .and(header("authorization", "Bearer sk-test"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "choices": [{"message": {"role": "assistant", "content": "  Hindi\n"}}],
        "usage": {"prompt_tokens": 10, "completion_tokens": 1, "total_tokens": 11}
      })))
      .expect(1)
      .mount(&server)
      .await;

    let text = client(&server).generate("which language?").await.unwrap();
    assert_eq!(text, "  Hindi\n");
  }

  #[tokio::test]
  async fn http_error_carries_provider_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .and(path("/chat/completions"))
      .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
        "error": {"message": "Rate limit reached", "type": "requests"}
      })))
      .mount(&server)
      .await;

    let err = client(&server).generate("hi").await.unwrap_err();
    match err {
      ModelError::Status { status, message } => {
        assert_eq!(status, 429);
        assert_eq!(message, "Rate limit reached");
      }
      other => panic!("expected Status, got {other:?}"),
    }
  }

  #[tokio::test]
  async fn empty_choices_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
      .mount(&server)
      .await;

    let err = client(&server).generate("hi").await.unwrap_err();
    assert!(matches!(err, ModelError::Malformed(_)));
  }
}
