//! Loading tutor configuration (prompt templates + regional profile overrides) from TOML.
//!
//! Every key is optional; anything not present keeps its built-in default.
//!
//! ```toml
//! [prompts]
//! detect_language_template = "Which language is this? {question}"
//!
//! [regions.urban_india]
//! common_concepts = ["metro", "auto rickshaw"]
//! occupations = ["engineer"]
//! festivals = ["Diwali"]
//! food = ["vada pav"]
//! ```

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{error, info, warn};

use crate::regions::{CulturalBucket, RegionTable, RegionalProfile};

pub const CONFIG_PATH_ENV: &str = "TUTOR_CONFIG_PATH";

#[derive(Clone, Debug, Deserialize, Default)]
pub struct TutorConfig {
  #[serde(default)]
  pub prompts: Prompts,
  /// Keyed by bucket name (`rural_india`, `urban_india`, `tribal_areas`).
  #[serde(default)]
  pub regions: HashMap<String, RegionalProfile>,
}

impl TutorConfig {
  /// Built-in regional table with configured overrides applied.
  /// Unknown bucket names are logged and ignored.
  pub fn region_table(&self) -> RegionTable {
    let mut overrides = HashMap::new();
    for (name, profile) in &self.regions {
      match CulturalBucket::parse(name) {
        Some(bucket) => {
          overrides.insert(bucket, profile.clone());
        }
        None => warn!(target: "vidya_tutor", bucket = %name, "Ignoring unknown region bucket in config"),
      }
    }
    RegionTable::with_overrides(&overrides)
  }
}

/// Prompt templates. Placeholders are `{name}` and are filled in a single pass
/// (see `util::fill_template`).
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Prompts {
  /// `{question}`
  pub detect_language_template: String,
  /// `{language}`, `{question}`
  pub translate_question_template: String,
  /// Student fields, regional lists, `{question}`, `{subject}`, `{topic}`, `{complexity_level}`
  pub analogy_template: String,
  /// `{language}`, `{response}`
  pub translate_response_template: String,
  /// Profile fields and exercise requirements
  pub exercise_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      detect_language_template: DETECT_LANGUAGE.into(),
      translate_question_template: TRANSLATE_QUESTION.into(),
      analogy_template: ANALOGY.into(),
      translate_response_template: TRANSLATE_RESPONSE.into(),
      exercise_template: EXERCISES.into(),
    }
  }
}

const DETECT_LANGUAGE: &str = r#"Analyze the following text and determine the language it's written in:
"{question}"

Respond with just the language name (e.g., "Hindi", "Bengali", "Tamil", "English", etc.)"#;

const TRANSLATE_QUESTION: &str = r#"Translate the following {language} text to English:
"{question}"

Provide only the English translation without any additional text."#;

const ANALOGY: &str = r#"You are an expert teacher who specializes in creating culturally relevant analogies for students.

STUDENT CONTEXT:
- Name: {name}
- Grade: {grade}
- Region: {region}
- Local Language: {local_language}
- Cultural Context: {cultural_context}
- Familiar Concepts: {familiar_concepts}

REGIONAL/CULTURAL INFORMATION:
- Common local concepts: {common_concepts}
- Local occupations: {occupations}
- Local festivals: {festivals}
- Local food: {food}

QUESTION TO EXPLAIN: "{question}"
SUBJECT: {subject}
TOPIC: {topic}
COMPLEXITY LEVEL: {complexity_level}

TASK:
Create a detailed, culturally relevant analogy that explains the concept in the question using:
1. Local and familiar concepts from the student's environment
2. Everyday experiences the student can relate to
3. Simple language appropriate for grade {grade}
4. Step-by-step explanation building from familiar to unfamiliar
5. Examples from local culture, geography, or daily life

STRUCTURE YOUR RESPONSE AS:
1. **Simple Explanation**: Start with a basic explanation in simple terms
2. **Local Analogy**: Provide a detailed analogy using familiar local concepts
3. **Connection**: Clearly connect the analogy back to the original concept
4. **Example**: Give a practical example from the student's local environment
5. **Summary**: Summarize the key learning points

Make sure the analogy is:
- Culturally sensitive and appropriate
- Age-appropriate for grade {grade}
- Easy to understand and remember
- Relevant to the student's daily life experience"#;

const TRANSLATE_RESPONSE: &str = r#"Translate the following English text to {language}, maintaining the structure and cultural references:

"{response}"

Make sure to:
1. Keep the educational structure intact
2. Maintain cultural references and analogies
3. Use appropriate language level for a grade school student
4. Preserve the key learning concepts

Provide only the translated text."#;

const EXERCISES: &str = r#"You are an expert educational content creator. Generate {exercise_count} personalized practice exercises for a student with the following profile:

STUDENT PROFILE:
- Name: {name}
- Grade: {grade}
- Learning Level: {learning_level}
- Learning Style: {learning_style}
- Primary Language: {language_preference}
- Weaknesses: {weaknesses}
- Strengths: {strengths}

EXERCISE REQUIREMENTS:
- Subject: {subject}
- Topic: {topic}
- Difficulty Level: {difficulty_level}
- Exercise Types: {exercise_types}

PERSONALIZATION GUIDELINES:
1. Target the student's identified weaknesses while building on their strengths
2. Adapt to their learning style:
   - Visual: Include diagrams, charts, or visual elements
   - Auditory: Include sound-based or rhythm-based elements
   - Kinesthetic: Include hands-on or movement-based activities
   - Reading/Writing: Focus on text-based exercises
3. Use appropriate complexity for their learning level
4. If language preference is not English, provide translations or explanations in their preferred language
5. Create scaffolded exercises that gradually increase in difficulty

OUTPUT FORMAT:
Provide the response as a JSON object with the following structure:
{
    "exercises": [
        {
            "id": 1,
            "type": "exercise_type",
            "question": "exercise question/prompt",
            "options": ["option1", "option2", "option3", "option4"] (for multiple choice),
            "correct_answer": "correct answer or explanation",
            "explanation": "detailed explanation of the solution",
            "difficulty": "beginner/intermediate/advanced",
            "learning_objective": "what this exercise aims to teach",
            "personalization_notes": "how this addresses student's specific needs"
        }
    ]
}

Generate exercises that are engaging, age-appropriate, and specifically designed to help this student overcome their weaknesses while leveraging their learning style."#;

/// Parse a TOML document into a `TutorConfig`.
pub fn parse_config(text: &str) -> Result<TutorConfig, toml::de::Error> {
  toml::from_str::<TutorConfig>(text)
}

/// Attempt to load `TutorConfig` from TUTOR_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<TutorConfig> {
  let path = std::env::var(CONFIG_PATH_ENV).ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "vidya_tutor", %path, region_overrides = cfg.regions.len(), "Loaded tutor config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "vidya_tutor", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "vidya_tutor", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_prompt_override_keeps_other_defaults() {
    let cfg = parse_config(
      r#"
[prompts]
detect_language_template = "Language of: {question}"

[regions.tribal_areas]
common_concepts = ["sal forest"]
occupations = ["honey collector"]
festivals = ["Sarhul"]
food = ["millet"]
"#,
    )
    .unwrap();

    assert_eq!(cfg.prompts.detect_language_template, "Language of: {question}");
    assert_eq!(cfg.prompts.analogy_template, Prompts::default().analogy_template);

    let table = cfg.region_table();
    assert_eq!(table.get(CulturalBucket::TribalAreas).festivals, vec!["Sarhul"]);
  }

  #[test]
  fn empty_document_is_all_defaults() {
    let cfg = parse_config("").unwrap();
    assert_eq!(cfg.prompts, Prompts::default());
    assert!(cfg.regions.is_empty());
  }

  #[test]
  fn unknown_region_bucket_is_ignored() {
    let cfg = parse_config("[regions.mars]\ncommon_concepts = [\"dust\"]\noccupations = []\nfestivals = []\nfood = []\n").unwrap();
    let table = cfg.region_table();
    assert_eq!(table.get(CulturalBucket::RuralIndia), &crate::regions::builtin_profile(CulturalBucket::RuralIndia));
  }
}
