//! Language handling for the analogy pipeline: detect the question's language,
//! translate it to English for prompting, and translate the answer back.
//!
//! Both steps are best-effort. A failed model call never fails the request; the
//! step falls back to passing text through unchanged.

use tracing::{debug, instrument, warn};

use crate::config::Prompts;
use crate::context::{detection_prompt, translate_question_prompt, translate_response_prompt};
use crate::error::ModelError;
use crate::model::TextModel;

pub const ENGLISH: &str = "English";

/// Languages the analogy prompts have been tuned for.
pub const SUPPORTED_LANGUAGES: [&str; 12] = [
  "English", "Hindi", "Bengali", "Tamil", "Telugu", "Marathi",
  "Gujarati", "Kannada", "Malayalam", "Punjabi", "Odia", "Assamese",
];

pub fn supported_languages() -> &'static [&'static str] {
  &SUPPORTED_LANGUAGES
}

pub fn is_supported(language: &str) -> bool {
  SUPPORTED_LANGUAGES.iter().any(|l| l.eq_ignore_ascii_case(language.trim()))
}

pub fn is_english(language: &str) -> bool {
  language.to_lowercase() == "english"
}

/// Detected language plus the question in English.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguagePair {
  pub detected_language: String,
  pub translated_question: String,
}

impl LanguagePair {
  fn passthrough(question: &str) -> Self {
    Self { detected_language: ENGLISH.to_string(), translated_question: question.to_string() }
  }
}

/// Detect + translate-in. Any model failure yields `("English", question)`.
#[instrument(level = "info", skip(model, prompts, question), fields(question_len = question.len()))]
pub async fn process_question<M: TextModel>(model: &M, prompts: &Prompts, question: &str) -> LanguagePair {
  match try_process_question(model, prompts, question).await {
    Ok(pair) => pair,
    Err(e) => {
      warn!(target: "pipeline", error = %e, "Language detection/translation failed; assuming English");
      LanguagePair::passthrough(question)
    }
  }
}

async fn try_process_question<M: TextModel>(
  model: &M,
  prompts: &Prompts,
  question: &str,
) -> Result<LanguagePair, ModelError> {
  let detected = model.generate(&detection_prompt(prompts, question)).await?;
  let detected_language = detected.trim().to_string();
  debug!(target: "pipeline", %detected_language, "Language detected");

  let translated_question = if is_english(&detected_language) {
    question.to_string()
  } else {
    let prompt = translate_question_prompt(prompts, &detected_language, question);
    model.generate(&prompt).await?.trim().to_string()
  };

  Ok(LanguagePair { detected_language, translated_question })
}

/// Translate-out. Runs only when both the preferred and the detected language are
/// non-English; a question detected as English is answered in English even if the
/// caller prefers another language. On failure the answer is returned unchanged.
#[instrument(level = "info", skip(model, prompts, response), fields(%preferred_language, %detected_language, response_len = response.len()))]
pub async fn translate_response<M: TextModel>(
  model: &M,
  prompts: &Prompts,
  response: String,
  preferred_language: &str,
  detected_language: &str,
) -> String {
  if is_english(preferred_language) || is_english(detected_language) {
    return response;
  }

  let prompt = translate_response_prompt(prompts, preferred_language, &response);
  match model.generate(&prompt).await {
    Ok(text) => text.trim().to_string(),
    Err(e) => {
      warn!(target: "pipeline", error = %e, "Answer translation failed; returning untranslated answer");
      response
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::scripted::ScriptedModel;

  #[tokio::test]
  async fn english_question_is_not_translated() {
    let model = ScriptedModel::new().reply(" english \n");
    let pair = process_question(&model, &Prompts::default(), "Why does it rain?").await;
    assert_eq!(pair.detected_language, "english");
    assert_eq!(pair.translated_question, "Why does it rain?");
    assert_eq!(model.calls(), 1);
  }

  #[tokio::test]
  async fn non_english_question_is_translated_and_trimmed() {
    let model = ScriptedModel::new().reply("Hindi").reply("  Why does it rain?\n");
    let pair = process_question(&model, &Prompts::default(), "ye barish kyu hoti hai?").await;
    assert_eq!(pair, LanguagePair {
      detected_language: "Hindi".into(),
      translated_question: "Why does it rain?".into(),
    });
    let prompts = model.prompts();
    assert!(prompts[1].starts_with("Translate the following Hindi text to English:"));
  }

  #[tokio::test]
  async fn detection_failure_assumes_english() {
    let model = ScriptedModel::new().fail(ModelError::Transport("down".into()));
    let pair = process_question(&model, &Prompts::default(), "kya hai?").await;
    assert_eq!(pair, LanguagePair::passthrough("kya hai?"));
  }

  #[tokio::test]
  async fn translation_failure_also_falls_back_to_english() {
    let model = ScriptedModel::new().reply("Tamil").fail(ModelError::Transport("down".into()));
    let pair = process_question(&model, &Prompts::default(), "mazhai").await;
    assert_eq!(pair.detected_language, "English");
    assert_eq!(pair.translated_question, "mazhai");
  }

  #[tokio::test]
  async fn detected_english_with_hindi_preference_stays_english() {
    let model = ScriptedModel::new();
    let out = translate_response(&model, &Prompts::default(), "Rain comes from clouds.".into(), "Hindi", "English").await;
    assert_eq!(out, "Rain comes from clouds.");
    assert_eq!(model.calls(), 0);
  }

  #[tokio::test]
  async fn both_non_english_translates_answer() {
    let model = ScriptedModel::new().reply(" बादलों से बारिश होती है। ");
    let out = translate_response(&model, &Prompts::default(), "Rain comes from clouds.".into(), "hindi", "Hindi").await;
    assert_eq!(out, "बादलों से बारिश होती है।");
    assert!(model.prompts()[0].starts_with("Translate the following English text to hindi"));
  }

  #[tokio::test]
  async fn answer_translation_failure_keeps_answer() {
    let model = ScriptedModel::new().fail(ModelError::Malformed("bad".into()));
    let out = translate_response(&model, &Prompts::default(), "answer".into(), "Tamil", "Tamil").await;
    assert_eq!(out, "answer");
  }

  #[test]
  fn supported_language_lookup() {
    assert_eq!(supported_languages().len(), 12);
    assert!(is_supported(" odia"));
    assert!(!is_supported("Klingon"));
  }
}
