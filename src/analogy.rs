//! Analogy pipeline: language detection → question translation → analogy prompt →
//! model → answer translation → envelope.
//!
//! The language steps are best-effort (see `language`); only the analogy call
//! itself can fail the request.

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::context::analogy_prompt;
use crate::domain::AnalogyRequest;
use crate::error::Result;
use crate::language::{is_supported, process_question, translate_response};
use crate::model::TextModel;
use crate::protocol::{analogy_request_from_json, rejection, AnalogyOut, Envelope, Pipeline};
use crate::state::Tutor;
use crate::util::{trunc_for_log, LOG_PREVIEW_CHARS};

impl<M: TextModel> Tutor<M> {
  /// Entry point for a raw JSON document. Missing or invalid input is answered
  /// without calling the model.
  #[instrument(level = "info", skip_all)]
  pub async fn analogy_from_json(&self, payload: &Value) -> Envelope<AnalogyOut> {
    match analogy_request_from_json(payload) {
      Ok(req) => self.generate_analogy(&req).await,
      Err(e) => {
        warn!(target: "pipeline", error = %e, "Rejected analogy request");
        Envelope::Failure(rejection(&e, payload, Pipeline::Analogy))
      }
    }
  }

  #[instrument(
    level = "info",
    skip(self, req),
    fields(student_id = %req.student_context.student_id, subject = %req.subject, preferred_language = %req.preferred_language)
  )]
  pub async fn generate_analogy(&self, req: &AnalogyRequest) -> Envelope<AnalogyOut> {
    match self.run_analogy(req).await {
      Ok(out) => {
        info!(target: "pipeline", detected_language = %out.detected_language, analogy_len = out.analogy.len(), "Analogy generated");
        Envelope::Success(out)
      }
      Err(e) => {
        error!(target: "pipeline", error = %e, "Analogy generation failed");
        Envelope::failure(e.to_string(), Some(req.student_context.student_id.clone()))
      }
    }
  }

  async fn run_analogy(&self, req: &AnalogyRequest) -> Result<AnalogyOut> {
    let ctx = &req.student_context;
    if !is_supported(&req.preferred_language) {
      debug!(target: "pipeline", preferred_language = %req.preferred_language, "Preferred language outside the supported list");
    }

    let pair = process_question(&self.model, &self.prompts, &req.question).await;

    let (bucket, regional) = self.regions.lookup(&ctx.cultural_context, &ctx.region);
    let prompt = analogy_prompt(&self.prompts, req, regional, &pair.translated_question);
    debug!(target: "pipeline", stage = "built", bucket = bucket.as_str(), prompt_len = prompt.len());

    let raw = self.model.generate(&prompt).await?;
    debug!(target: "pipeline", stage = "invoked", response_len = raw.len(), preview = %trunc_for_log(&raw, LOG_PREVIEW_CHARS));

    let analogy = translate_response(
      &self.model,
      &self.prompts,
      raw,
      &req.preferred_language,
      &pair.detected_language,
    )
    .await;
    debug!(target: "pipeline", stage = "normalized");

    Ok(AnalogyOut {
      student_id: ctx.student_id.clone(),
      original_question: req.question.clone(),
      detected_language: pair.detected_language,
      translated_question: pair.translated_question,
      subject: req.subject.clone(),
      topic: req.topic.clone(),
      analogy,
      cultural_context: ctx.cultural_context.clone(),
      region: ctx.region.clone(),
      generated_at: Utc::now(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::context::fixtures::analogy_request;
  use crate::error::ModelError;
  use crate::model::scripted::ScriptedModel;
  use crate::protocol::MISSING_ANALOGY_FIELDS;
  use serde_json::json;

  #[tokio::test]
  async fn missing_required_fields_never_call_the_model() {
    let tutor = Tutor::new(ScriptedModel::new().reply("unused"));
    for payload in [json!({"question": "why?"}), json!({"student_context": {"student_id": "s1"}}), json!({})] {
      let env = tutor.analogy_from_json(&payload).await;
      let failure = env.into_result().unwrap_err();
      assert_eq!(failure.error, MISSING_ANALOGY_FIELDS);
    }
    assert_eq!(tutor.model.calls(), 0);
  }

  #[tokio::test]
  async fn invalid_grade_fails_before_any_call() {
    let tutor = Tutor::new(ScriptedModel::new());
    let env = tutor
      .analogy_from_json(&json!({"student_context": {"student_id": "s9", "grade": 0}, "question": "why?"}))
      .await;
    let failure = env.into_result().unwrap_err();
    assert!(failure.error.contains("grade must be a positive integer"));
    assert_eq!(failure.student_id.as_deref(), Some("s9"));
    assert_eq!(tutor.model.calls(), 0);
  }

  #[tokio::test]
  async fn hindi_question_round_trips_through_translation() {
    let model = ScriptedModel::new()
      .reply("Hindi\n")
      .reply("Why does it rain?")
      .reply("1. **Simple Explanation**: Water rises from fields...")
      .reply("  1. **सरल व्याख्या**: ...  ");
    let tutor = Tutor::new(model);

    let out = tutor.generate_analogy(&analogy_request()).await.into_result().unwrap();
    assert_eq!(out.student_id, "123");
    assert_eq!(out.original_question, "ye barish kyu hoti hai?");
    assert_eq!(out.detected_language, "Hindi");
    assert_eq!(out.translated_question, "Why does it rain?");
    assert_eq!(out.analogy, "1. **सरल व्याख्या**: ...");
    assert_eq!(out.cultural_context, "rural");
    assert_eq!(out.region, "north india");

    let prompts = tutor.model.prompts();
    assert_eq!(prompts.len(), 4);
    assert!(prompts[2].contains("QUESTION TO EXPLAIN: \"Why does it rain?\""));
    assert!(prompts[2].contains("bullock cart"));
    assert!(prompts[3].contains("Translate the following English text to hindi"));
  }

  #[tokio::test]
  async fn english_detection_skips_answer_translation_even_with_hindi_preference() {
    let model = ScriptedModel::new().reply("English").reply("Clouds are like a full water pot.");
    let tutor = Tutor::new(model);
    let mut req = analogy_request();
    req.question = "Why does it rain?".into();
    req.preferred_language = "Hindi".into();

    let out = tutor.generate_analogy(&req).await.into_result().unwrap();
    assert_eq!(out.analogy, "Clouds are like a full water pot.");
    assert_eq!(out.translated_question, "Why does it rain?");
    assert_eq!(tutor.model.calls(), 2);
  }

  #[tokio::test]
  async fn tribal_region_selects_tribal_profile() {
    let model = ScriptedModel::new().reply("English").reply("analogy");
    let tutor = Tutor::new(model);
    let mut req = analogy_request();
    req.student_context.cultural_context = "Urban".into();
    req.student_context.region = "Tribal Belt".into();
    req.preferred_language = "English".into();

    tutor.generate_analogy(&req).await.into_result().unwrap();
    let analogy_prompt = &tutor.model.prompts()[1];
    assert!(analogy_prompt.contains("tribal dance"));
    assert!(!analogy_prompt.contains("metro"));
  }

  #[tokio::test]
  async fn analogy_call_failure_becomes_failure_envelope() {
    let model = ScriptedModel::new()
      .reply("English")
      .fail(ModelError::Status { status: 500, message: "internal".into() });
    let tutor = Tutor::new(model);

    let env = tutor.generate_analogy(&analogy_request()).await;
    let v = serde_json::to_value(&env).unwrap();
    assert_eq!(v, json!({"success": false, "error": "model HTTP 500: internal", "student_id": "123"}));
  }

  #[tokio::test]
  async fn success_envelope_shape() {
    let model = ScriptedModel::new().reply("English").reply("text");
    let tutor = Tutor::new(model);
    let payload = json!({
      "student_context": {"student_id": "123", "name": "GURU", "grade": 5, "region": "north india",
                          "local_language": "hindi", "cultural_context": "rural", "familiar_concepts": ["farming"]},
      "question": "Why does it rain?",
      "subject": "environment"
    });

    let v = serde_json::to_value(tutor.analogy_from_json(&payload).await).unwrap();
    assert_eq!(v["success"], json!(true));
    assert_eq!(v["analogy"], json!("text"));
    assert_eq!(v["topic"], json!("Basic Concepts"));
    let ts = v["generated_at"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok(), "{ts}");
  }
}
