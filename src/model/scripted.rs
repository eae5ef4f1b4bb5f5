//! In-memory model for pipeline tests: replays queued replies and records prompts.

use std::collections::VecDeque;
use std::sync::Mutex;

use super::TextModel;
use crate::error::ModelError;

#[derive(Default)]
pub(crate) struct ScriptedModel {
  replies: Mutex<VecDeque<Result<String, ModelError>>>,
  prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
  pub fn new() -> Self { Self::default() }

  pub fn reply(self, text: &str) -> Self {
    self.replies.lock().unwrap().push_back(Ok(text.to_string()));
    self
  }

  pub fn fail(self, err: ModelError) -> Self {
    self.replies.lock().unwrap().push_back(Err(err));
    self
  }

  pub fn calls(&self) -> usize { self.prompts.lock().unwrap().len() }

  pub fn prompts(&self) -> Vec<String> { self.prompts.lock().unwrap().clone() }
}

impl TextModel for ScriptedModel {
  async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
    self.prompts.lock().unwrap().push(prompt.to_string());
    self.replies
      .lock()
      .unwrap()
      .pop_front()
      .unwrap_or_else(|| Err(ModelError::Transport("script exhausted".into())))
  }

  fn model_name(&self) -> &str { "scripted" }
}
