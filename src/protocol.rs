//! Public request/response shapes (serde ready).
//!
//! Inbound payloads are loose JSON documents: optional fields fall back to
//! defaults, required keys are checked before anything else happens, and numeric
//! fields are validated when converting into domain requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::domain::{AnalogyRequest, ExerciseRecord, ExerciseRequest, StudentContext, StudentProfile};
use crate::error::{Result, TutorError};
use crate::util::lenient;

pub const MISSING_ANALOGY_FIELDS: &str = "Student context and question are required";
pub const MISSING_STUDENT_PROFILE: &str = "Student profile is required";

//
// Inbound
//

fn has_key(payload: &Value, key: &str) -> bool {
  payload.get(key).is_some_and(|v| !v.is_null())
}

/// Best-effort student id for failure envelopes when full parsing did not succeed.
pub fn peek_student_id(payload: &Value, context_key: &str) -> Option<String> {
  match payload.get(context_key)?.get("student_id")? {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  }
}

fn d_grade() -> i64 { 1 }
fn d_rural_india() -> String { "Rural India".into() }
fn d_hindi() -> String { "Hindi".into() }
fn d_rural() -> String { "rural".into() }
fn d_general() -> String { "General".into() }
fn d_basic_concepts() -> String { "Basic Concepts".into() }
fn d_simple() -> String { "simple".into() }
fn d_english() -> String { "English".into() }
fn d_beginner() -> String { "beginner".into() }
fn d_visual() -> String { "visual".into() }
fn d_mathematics() -> String { "Mathematics".into() }
fn d_basic_operations() -> String { "Basic Operations".into() }
fn d_exercise_count() -> i64 { 5 }
fn d_exercise_types() -> Vec<String> { vec!["multiple_choice".into()] }

fn positive(value: i64, field: &str) -> Result<u32> {
  u32::try_from(value)
    .ok()
    .filter(|v| *v > 0)
    .ok_or_else(|| TutorError::invalid(format!("{field} must be a positive integer (got {value})")))
}

#[derive(Debug, Deserialize)]
struct StudentContextIn {
  #[serde(default, deserialize_with = "lenient::string")] student_id: String,
  #[serde(default)] name: String,
  #[serde(default = "d_grade")] grade: i64,
  #[serde(default = "d_rural_india")] region: String,
  #[serde(default = "d_hindi")] local_language: String,
  #[serde(default = "d_rural")] cultural_context: String,
  #[serde(default, deserialize_with = "lenient::string_list")] familiar_concepts: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AnalogyPayload {
  student_context: StudentContextIn,
  question: String,
  #[serde(default = "d_general")] subject: String,
  #[serde(default = "d_basic_concepts")] topic: String,
  #[serde(default = "d_simple")] complexity_level: String,
  #[serde(default = "d_english")] preferred_language: String,
}

/// Build an `AnalogyRequest` from a JSON document.
pub fn analogy_request_from_json(payload: &Value) -> Result<AnalogyRequest> {
  if !has_key(payload, "student_context") || !has_key(payload, "question") {
    return Err(TutorError::Missing(MISSING_ANALOGY_FIELDS));
  }
  let p: AnalogyPayload = serde_json::from_value(payload.clone())
    .map_err(|e| TutorError::invalid(e.to_string()))?;
  let ctx = p.student_context;

  Ok(AnalogyRequest {
    student_context: StudentContext {
      grade: positive(ctx.grade, "grade")?,
      student_id: ctx.student_id,
      name: ctx.name,
      region: ctx.region,
      local_language: ctx.local_language,
      cultural_context: ctx.cultural_context,
      familiar_concepts: ctx.familiar_concepts,
    },
    question: p.question,
    subject: p.subject,
    topic: p.topic,
    complexity_level: p.complexity_level,
    preferred_language: p.preferred_language,
  })
}

#[derive(Debug, Deserialize)]
struct StudentProfileIn {
  #[serde(default, deserialize_with = "lenient::string")] student_id: String,
  #[serde(default)] name: String,
  #[serde(default = "d_grade")] grade: i64,
  #[serde(default = "d_beginner")] learning_level: String,
  #[serde(default = "d_visual")] learning_style: String,
  #[serde(default, deserialize_with = "lenient::string_list")] weaknesses: Vec<String>,
  #[serde(default, deserialize_with = "lenient::string_list")] strengths: Vec<String>,
  #[serde(default = "d_english")] language_preference: String,
}

#[derive(Debug, Deserialize)]
struct ExercisePayload {
  student_profile: StudentProfileIn,
  #[serde(default = "d_mathematics")] subject: String,
  #[serde(default = "d_basic_operations")] topic: String,
  #[serde(default = "d_beginner")] difficulty_level: String,
  #[serde(default = "d_exercise_count")] exercise_count: i64,
  #[serde(default = "d_exercise_types", deserialize_with = "lenient::string_list")] exercise_types: Vec<String>,
}

/// Build an `ExerciseRequest` from a JSON document.
pub fn exercise_request_from_json(payload: &Value) -> Result<ExerciseRequest> {
  if !has_key(payload, "student_profile") {
    return Err(TutorError::Missing(MISSING_STUDENT_PROFILE));
  }
  let p: ExercisePayload = serde_json::from_value(payload.clone())
    .map_err(|e| TutorError::invalid(e.to_string()))?;
  let profile = p.student_profile;

  Ok(ExerciseRequest {
    student_profile: StudentProfile {
      grade: positive(profile.grade, "grade")?,
      student_id: profile.student_id,
      name: profile.name,
      learning_level: profile.learning_level,
      learning_style: profile.learning_style,
      weaknesses: profile.weaknesses,
      strengths: profile.strengths,
      language_preference: profile.language_preference,
    },
    subject: p.subject,
    topic: p.topic,
    difficulty_level: p.difficulty_level,
    exercise_count: positive(p.exercise_count, "exercise_count")?,
    exercise_types: p.exercise_types,
  })
}

/// Which pipeline a document is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
  Analogy,
  Exercises,
}

impl Pipeline {
  /// Documents with a `student_profile` key are exercise requests; anything else
  /// is treated as an analogy request.
  pub fn for_payload(payload: &Value) -> Self {
    if payload.get("student_profile").is_some() {
      Pipeline::Exercises
    } else {
      Pipeline::Analogy
    }
  }

  fn context_key(&self) -> &'static str {
    match self {
      Pipeline::Analogy => "student_context",
      Pipeline::Exercises => "student_profile",
    }
  }
}

/// A validated request, already routed.
#[derive(Debug, Clone)]
pub enum Inbound {
  Analogy(AnalogyRequest),
  Exercises(ExerciseRequest),
}

/// Failure body for a document that was rejected before any model call.
pub fn rejection(err: &TutorError, payload: &Value, pipeline: Pipeline) -> Failure {
  Failure { error: err.to_string(), student_id: peek_student_id(payload, pipeline.context_key()) }
}

/// Parse, route and validate one raw request document.
pub fn inbound_from_str(text: &str) -> std::result::Result<Inbound, Failure> {
  let payload: Value = serde_json::from_str(text).map_err(|e| Failure {
    error: TutorError::invalid(e.to_string()).to_string(),
    student_id: None,
  })?;
  inbound_from_json(&payload)
}

pub fn inbound_from_json(payload: &Value) -> std::result::Result<Inbound, Failure> {
  let pipeline = Pipeline::for_payload(payload);
  let parsed = match pipeline {
    Pipeline::Analogy => analogy_request_from_json(payload).map(Inbound::Analogy),
    Pipeline::Exercises => exercise_request_from_json(payload).map(Inbound::Exercises),
  };
  parsed.map_err(|e| rejection(&e, payload, pipeline))
}

//
// Outbound
//

/// Result of one pipeline run. Serializes with a boolean `success` flag next to
/// the payload fields.
#[derive(Debug, Clone)]
pub enum Envelope<T> {
  Success(T),
  Failure(Failure),
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Failure {
  pub error: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub student_id: Option<String>,
}

impl<T> Envelope<T> {
  pub fn failure(error: impl Into<String>, student_id: Option<String>) -> Self {
    Envelope::Failure(Failure { error: error.into(), student_id })
  }

  pub fn is_success(&self) -> bool { matches!(self, Envelope::Success(_)) }

  pub fn into_result(self) -> std::result::Result<T, Failure> {
    match self {
      Envelope::Success(t) => Ok(t),
      Envelope::Failure(f) => Err(f),
    }
  }
}

#[derive(Serialize)]
struct Tagged<'a, B: Serialize> {
  success: bool,
  #[serde(flatten)]
  body: &'a B,
}

impl<T: Serialize> Serialize for Envelope<T> {
  fn serialize<S: Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
    match self {
      Envelope::Success(body) => Tagged { success: true, body }.serialize(s),
      Envelope::Failure(body) => Tagged { success: false, body }.serialize(s),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalogyOut {
  pub student_id: String,
  pub original_question: String,
  pub detected_language: String,
  pub translated_question: String,
  pub subject: String,
  pub topic: String,
  pub analogy: String,
  pub cultural_context: String,
  pub region: String,
  pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExerciseSetOut {
  pub student_id: String,
  pub subject: String,
  pub topic: String,
  pub exercises: Vec<ExerciseRecord>,
  pub generated_at: DateTime<Utc>,
  pub personalization_factors: PersonalizationFactors,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PersonalizationFactors {
  pub learning_level: String,
  pub learning_style: String,
  pub targeted_weaknesses: Vec<String>,
}
