//! Exercise pipeline: profile prompt → one model call → exercise parser → envelope.

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::context::exercise_prompt;
use crate::domain::ExerciseRequest;
use crate::error::Result;
use crate::exercises::parse_exercises;
use crate::model::TextModel;
use crate::protocol::{exercise_request_from_json, rejection, Envelope, ExerciseSetOut, PersonalizationFactors, Pipeline};
use crate::state::Tutor;
use crate::util::{trunc_for_log, LOG_PREVIEW_CHARS};

impl<M: TextModel> Tutor<M> {
  /// Entry point for a raw JSON document. Missing or invalid input is answered
  /// without calling the model.
  #[instrument(level = "info", skip_all)]
  pub async fn exercises_from_json(&self, payload: &Value) -> Envelope<ExerciseSetOut> {
    match exercise_request_from_json(payload) {
      Ok(req) => self.generate_exercises(&req).await,
      Err(e) => {
        warn!(target: "pipeline", error = %e, "Rejected exercise request");
        Envelope::Failure(rejection(&e, payload, Pipeline::Exercises))
      }
    }
  }

  #[instrument(
    level = "info",
    skip(self, req),
    fields(student_id = %req.student_profile.student_id, subject = %req.subject, count = req.exercise_count)
  )]
  pub async fn generate_exercises(&self, req: &ExerciseRequest) -> Envelope<ExerciseSetOut> {
    match self.run_exercises(req).await {
      Ok(out) => {
        info!(target: "pipeline", produced = out.exercises.len(), "Exercises generated");
        Envelope::Success(out)
      }
      Err(e) => {
        error!(target: "pipeline", error = %e, "Exercise generation failed");
        Envelope::failure(e.to_string(), Some(req.student_profile.student_id.clone()))
      }
    }
  }

  async fn run_exercises(&self, req: &ExerciseRequest) -> Result<ExerciseSetOut> {
    let prompt = exercise_prompt(&self.prompts, req);
    debug!(target: "pipeline", stage = "built", prompt_len = prompt.len());

    let raw = self.model.generate(&prompt).await?;
    debug!(target: "pipeline", stage = "invoked", response_len = raw.len(), preview = %trunc_for_log(&raw, LOG_PREVIEW_CHARS));

    let exercises = parse_exercises(&raw, req);
    debug!(target: "pipeline", stage = "normalized", records = exercises.len());

    let student = &req.student_profile;
    Ok(ExerciseSetOut {
      student_id: student.student_id.clone(),
      subject: req.subject.clone(),
      topic: req.topic.clone(),
      exercises,
      generated_at: Utc::now(),
      personalization_factors: PersonalizationFactors {
        learning_level: student.learning_level.clone(),
        learning_style: student.learning_style.clone(),
        targeted_weaknesses: student.weaknesses.clone(),
      },
    })
  }
}
