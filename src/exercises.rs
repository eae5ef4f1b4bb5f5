//! Turning model text into `ExerciseRecord`s.
//!
//! Primary path: slice from the first `{` to the last `}` and parse that as JSON.
//! The slice is positional, not brace-balanced: text holding two separate objects
//! yields an unparseable slice and lands in the fallback path.
//!
//! Fallback path: one placeholder record per non-empty line, up to the requested
//! count. These records carry the line as question text and nothing else of value.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::{ExerciseRecord, ExerciseRequest};

pub const DEFAULT_EXERCISE_TYPE: &str = "short_answer";
pub const PLACEHOLDER_ANSWER: &str = "Answer will be provided by teacher";
pub const PLACEHOLDER_EXPLANATION: &str = "Detailed explanation will be provided";

/// Parse model output into at most `req.exercise_count` records.
pub fn parse_exercises(text: &str, req: &ExerciseRequest) -> Vec<ExerciseRecord> {
  let limit = req.exercise_count as usize;

  let Some(slice) = json_slice(text) else {
    debug!(target: "pipeline", "No JSON object in model output; using line fallback");
    return fallback_exercises(text, req);
  };

  match records_from_json(slice) {
    Ok(mut records) => {
      if records.len() > limit {
        debug!(target: "pipeline", returned = records.len(), limit, "Model returned extra exercises; truncating");
        records.truncate(limit);
      }
      records
    }
    Err(e) => {
      warn!(target: "pipeline", error = %e, "Model output JSON did not parse; using line fallback");
      fallback_exercises(text, req)
    }
  }
}

/// Text between the first `{` and the last `}` inclusive.
fn json_slice(text: &str) -> Option<&str> {
  let start = text.find('{')?;
  let end = text.rfind('}')?;
  (end > start).then(|| &text[start..=end])
}

fn records_from_json(slice: &str) -> Result<Vec<ExerciseRecord>, serde_json::Error> {
  let parsed: Value = serde_json::from_str(slice)?;
  let Some(Value::Array(items)) = parsed.get("exercises") else {
    return Ok(Vec::new());
  };

  let records = items
    .iter()
    .enumerate()
    .filter_map(|(pos, item)| {
      let rec = ExerciseRecord::from_model_item(item.clone(), pos + 1);
      if rec.is_none() {
        warn!(target: "pipeline", position = pos + 1, "Skipping exercise item that is not an object");
      }
      rec
    })
    .collect();
  Ok(records)
}

/// One placeholder record per trimmed, non-empty line, ids from 1.
pub fn fallback_exercises(text: &str, req: &ExerciseRequest) -> Vec<ExerciseRecord> {
  let kind = req
    .exercise_types
    .first()
    .cloned()
    .unwrap_or_else(|| DEFAULT_EXERCISE_TYPE.to_string());
  let objective = format!("Practice {} concepts", req.topic);
  let notes = format!("Adapted for {} learning style", req.student_profile.learning_style);

  text
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .take(req.exercise_count as usize)
    .enumerate()
    .map(|(i, line)| {
      let mut fields = Map::new();
      fields.insert("id".into(), Value::from(i as u64 + 1));
      fields.insert("type".into(), Value::from(kind.as_str()));
      fields.insert("question".into(), Value::from(line));
      fields.insert("correct_answer".into(), Value::from(PLACEHOLDER_ANSWER));
      fields.insert("explanation".into(), Value::from(PLACEHOLDER_EXPLANATION));
      fields.insert("difficulty".into(), Value::from(req.difficulty_level.as_str()));
      fields.insert("learning_objective".into(), Value::from(objective.as_str()));
      fields.insert("personalization_notes".into(), Value::from(notes.as_str()));
      ExerciseRecord::from(fields)
    })
    .collect()
}
