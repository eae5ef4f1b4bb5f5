//! Domain models: learner contexts, the two request kinds, and exercise records.
//!
//! Requests are validated when built from an inbound payload (see `protocol`), so
//! values here always carry a positive `grade` and `exercise_count`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Who is asking for an analogy, and what their surroundings look like.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudentContext {
  pub student_id: String,
  pub name: String,
  pub grade: u32,
  /// Geographic region / state / country, free text.
  pub region: String,
  pub local_language: String,
  /// Free-form tag such as "rural", "urban" or "tribal".
  pub cultural_context: String,
  pub familiar_concepts: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalogyRequest {
  pub student_context: StudentContext,
  /// The question as typed by the student, in any language.
  pub question: String,
  pub subject: String,
  pub topic: String,
  /// simple | moderate | complex (not enforced).
  pub complexity_level: String,
  pub preferred_language: String,
}

/// Learner profile driving exercise personalization.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudentProfile {
  pub student_id: String,
  pub name: String,
  pub grade: u32,
  /// beginner | intermediate | advanced (not enforced).
  pub learning_level: String,
  /// visual | auditory | kinesthetic | reading_writing (not enforced).
  pub learning_style: String,
  pub weaknesses: Vec<String>,
  pub strengths: Vec<String>,
  pub language_preference: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExerciseRequest {
  pub student_profile: StudentProfile,
  pub subject: String,
  pub topic: String,
  pub difficulty_level: String,
  pub exercise_count: u32,
  /// multiple_choice, short_answer, problem_solving, ... (open set).
  pub exercise_types: Vec<String>,
}

/// One practice question.
///
/// Records parsed from model output keep the model's object exactly as sent: no
/// keys are added (apart from an `id` when it had none) and no values are coerced.
/// The accessors below read the well-known keys.
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(transparent)]
pub struct ExerciseRecord {
  fields: Map<String, Value>,
}

impl ExerciseRecord {
  /// Accept one item of the model's `exercises` array. Non-objects are rejected;
  /// a missing or null `id` becomes the item's 1-based `position`.
  pub fn from_model_item(item: Value, position: usize) -> Option<Self> {
    let Value::Object(mut fields) = item else {
      return None;
    };
    if fields.get("id").map_or(true, Value::is_null) {
      fields.insert("id".into(), Value::from(position as u64));
    }
    Some(Self { fields })
  }

  pub fn id(&self) -> &Value {
    self.fields.get("id").unwrap_or(&Value::Null)
  }

  pub fn kind(&self) -> Option<&str> {
    self.text("type")
  }

  pub fn question(&self) -> Option<&str> {
    self.text("question")
  }

  /// Answer choices, when the model sent a list.
  pub fn options(&self) -> Option<Vec<&str>> {
    match self.fields.get("options")? {
      Value::Array(items) => Some(items.iter().filter_map(Value::as_str).collect()),
      _ => None,
    }
  }

  pub fn correct_answer(&self) -> Option<&str> {
    self.text("correct_answer")
  }

  /// String value of any key; `None` when absent or not a string.
  pub fn text(&self, key: &str) -> Option<&str> {
    self.fields.get(key).and_then(Value::as_str)
  }

  /// Raw value of any key, including ones the model invented.
  pub fn get(&self, key: &str) -> Option<&Value> {
    self.fields.get(key)
  }
}

impl From<Map<String, Value>> for ExerciseRecord {
  fn from(fields: Map<String, Value>) -> Self {
    Self { fields }
  }
}
