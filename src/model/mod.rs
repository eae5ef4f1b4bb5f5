//! The text-generation collaborator: one prompt in, one text blob out.
//!
//! Pipelines are generic over [`TextModel`]. The process picks a concrete provider
//! once at start-up through [`ModelClient::from_env`] and hands it to the `Tutor`.

use std::future::Future;
use std::time::Duration;

use tracing::info;

use crate::error::{ModelError, TutorError};

pub mod gemini;
pub mod openai;
#[cfg(test)]
pub(crate) mod scripted;

pub use gemini::Gemini;
pub use openai::OpenAI;

const USER_AGENT_VALUE: &str = "vidya-tutor/0.1";

/// Anything that can turn a prompt into text.
pub trait TextModel {
  /// Send `prompt` and return the raw reply text (not trimmed).
  fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, ModelError>> + Send;

  /// Model name for logs.
  fn model_name(&self) -> &str;
}

/// Which hosted API to talk to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
  Gemini,
  OpenAI,
}

impl Provider {
  pub fn parse(s: &str) -> Option<Self> {
    match s.trim().to_lowercase().as_str() {
      "gemini" | "google" => Some(Self::Gemini),
      "openai" => Some(Self::OpenAI),
      _ => None,
    }
  }
}

/// Runtime-selected provider.
#[derive(Clone)]
pub enum ModelClient {
  Gemini(Gemini),
  OpenAI(OpenAI),
}

impl ModelClient {
  /// Choose a provider from TUTOR_MODEL_PROVIDER, or from whichever API key is set
  /// (Gemini first). Fails when no usable credential is found.
  pub fn from_env() -> Result<Self, TutorError> {
    let requested = match std::env::var("TUTOR_MODEL_PROVIDER") {
      Ok(v) => Some(Provider::parse(&v).ok_or_else(|| {
        TutorError::Config(format!("unknown TUTOR_MODEL_PROVIDER '{v}' (expected gemini or openai)"))
      })?),
      Err(_) => None,
    };

    let client = match requested {
      Some(Provider::Gemini) => Gemini::from_env().map(Self::Gemini),
      Some(Provider::OpenAI) => OpenAI::from_env().map(Self::OpenAI),
      None => Gemini::from_env()
        .map(Self::Gemini)
        .or_else(|| OpenAI::from_env().map(Self::OpenAI)),
    };

    let client = client.ok_or_else(|| {
      TutorError::Config("no model credential: set GEMINI_API_KEY or OPENAI_API_KEY".into())
    })?;
    info!(target: "vidya_tutor", model = %client.model_name(), "Model client ready");
    Ok(client)
  }
}

impl TextModel for ModelClient {
  async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
    match self {
      Self::Gemini(c) => c.generate(prompt).await,
      Self::OpenAI(c) => c.generate(prompt).await,
    }
  }

  fn model_name(&self) -> &str {
    match self {
      Self::Gemini(c) => c.model_name(),
      Self::OpenAI(c) => c.model_name(),
    }
  }
}

/// Request timeout from MODEL_TIMEOUT_SECS (default 20s).
pub(crate) fn timeout_from_env() -> Duration {
  let secs = std::env::var("MODEL_TIMEOUT_SECS")
    .ok()
    .and_then(|s| s.parse::<u64>().ok())
    .filter(|s| *s > 0)
    .unwrap_or(20);
  Duration::from_secs(secs)
}

pub(crate) fn http_client(timeout: Duration) -> Option<reqwest::Client> {
  reqwest::Client::builder().timeout(timeout).build().ok()
}

/// Turn a non-2xx response into `ModelError::Status`, preferring the provider's message.
pub(crate) async fn status_error(res: reqwest::Response) -> ModelError {
  let status = res.status();
  let body = res.text().await.unwrap_or_default();
  let message = extract_error_message(&body).unwrap_or(body);
  ModelError::Status { status: status.as_u16(), message }
}

/// Both providers wrap errors as `{"error": {"message": "..."}}`.
fn extract_error_message(body: &str) -> Option<String> {
  #[derive(serde::Deserialize)]
  struct EWrap { error: EObj }
  #[derive(serde::Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}
