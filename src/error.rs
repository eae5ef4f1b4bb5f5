//! Error types.
//!
//! `ModelError` covers the single network boundary (the text-generation service).
//! `TutorError` is what pipeline steps return; orchestrators turn it into a failure
//! envelope at the outermost level.

/// Failure talking to the hosted model.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
  /// Connection, TLS, timeout or body-read failure.
  #[error("model transport error: {0}")]
  Transport(String),

  /// Non-2xx answer (auth, quota, bad request...). `message` is the provider's own
  /// error text when it could be extracted.
  #[error("model HTTP {status}: {message}")]
  Status { status: u16, message: String },

  /// 2xx answer whose body did not have the expected shape.
  #[error("malformed model response: {0}")]
  Malformed(String),
}

impl From<reqwest::Error> for ModelError {
  fn from(e: reqwest::Error) -> Self {
    if e.is_decode() {
      Self::Malformed(e.to_string())
    } else {
      Self::Transport(e.to_string())
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum TutorError {
  /// A required top-level key is absent; the message is shown to the caller as-is.
  #[error("{0}")]
  Missing(&'static str),

  /// Present but unusable input (wrong type, non-positive count...).
  #[error("invalid request: {0}")]
  InvalidRequest(String),

  #[error(transparent)]
  Model(#[from] ModelError),

  /// Provider selection / credential problems at start-up.
  #[error("config error: {0}")]
  Config(String),
}

impl TutorError {
  pub fn invalid(msg: impl Into<String>) -> Self {
    Self::InvalidRequest(msg.into())
  }
}

pub type Result<T> = std::result::Result<T, TutorError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn error_display_formatting() {
    let err = TutorError::Missing("Student profile is required");
    assert_eq!(err.to_string(), "Student profile is required");

    let err = TutorError::invalid("grade must be a positive integer");
    assert_eq!(err.to_string(), "invalid request: grade must be a positive integer");

    let err: TutorError = ModelError::Status { status: 429, message: "quota exceeded".into() }.into();
    assert_eq!(err.to_string(), "model HTTP 429: quota exceeded");
  }
}
