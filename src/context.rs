//! Prompt construction for both pipelines.
//!
//! Everything here is a pure function of its inputs: no clock, no randomness, so
//! the same request always renders the same prompt.

use crate::config::Prompts;
use crate::domain::{AnalogyRequest, ExerciseRequest};
use crate::regions::RegionalProfile;
use crate::util::{fill_template, join_list};

pub fn detection_prompt(prompts: &Prompts, question: &str) -> String {
  fill_template(&prompts.detect_language_template, &[("question", question)])
}

pub fn translate_question_prompt(prompts: &Prompts, language: &str, question: &str) -> String {
  fill_template(
    &prompts.translate_question_template,
    &[("language", language), ("question", question)],
  )
}

pub fn translate_response_prompt(prompts: &Prompts, language: &str, response: &str) -> String {
  fill_template(
    &prompts.translate_response_template,
    &[("language", language), ("response", response)],
  )
}

/// Analogy prompt: student context, the matched regional profile and the
/// (already English) question.
pub fn analogy_prompt(
  prompts: &Prompts,
  req: &AnalogyRequest,
  regional: &RegionalProfile,
  question_en: &str,
) -> String {
  let ctx = &req.student_context;
  let grade = ctx.grade.to_string();
  let familiar = join_list(&ctx.familiar_concepts);
  let common = join_list(&regional.common_concepts);
  let occupations = join_list(&regional.occupations);
  let festivals = join_list(&regional.festivals);
  let food = join_list(&regional.food);

  fill_template(
    &prompts.analogy_template,
    &[
      ("name", &ctx.name),
      ("grade", &grade),
      ("region", &ctx.region),
      ("local_language", &ctx.local_language),
      ("cultural_context", &ctx.cultural_context),
      ("familiar_concepts", &familiar),
      ("common_concepts", &common),
      ("occupations", &occupations),
      ("festivals", &festivals),
      ("food", &food),
      ("question", question_en),
      ("subject", &req.subject),
      ("topic", &req.topic),
      ("complexity_level", &req.complexity_level),
    ],
  )
}

pub fn exercise_prompt(prompts: &Prompts, req: &ExerciseRequest) -> String {
  let student = &req.student_profile;
  let count = req.exercise_count.to_string();
  let grade = student.grade.to_string();
  let weaknesses = join_list(&student.weaknesses);
  let strengths = join_list(&student.strengths);
  let types = join_list(&req.exercise_types);

  fill_template(
    &prompts.exercise_template,
    &[
      ("exercise_count", &count),
      ("name", &student.name),
      ("grade", &grade),
      ("learning_level", &student.learning_level),
      ("learning_style", &student.learning_style),
      ("language_preference", &student.language_preference),
      ("weaknesses", &weaknesses),
      ("strengths", &strengths),
      ("subject", &req.subject),
      ("topic", &req.topic),
      ("difficulty_level", &req.difficulty_level),
      ("exercise_types", &types),
    ],
  )
}


#[cfg(test)]
mod tests {
  use super::fixtures::*;
  use super::*;
  use crate::regions::{builtin_profile, CulturalBucket};

  #[test]
  fn analogy_prompt_dumps_profile_and_region() {
    let req = analogy_request();
    let regional = builtin_profile(CulturalBucket::RuralIndia);
    let p = analogy_prompt(&Prompts::default(), &req, &regional, "Why does it rain?");

    assert!(p.starts_with("You are an expert teacher"));
    assert!(p.contains("- Name: GURU"));
    assert!(p.contains("- Grade: 5"));
    assert!(p.contains("- Familiar Concepts: farming"));
    assert!(p.contains("- Common local concepts: farming, village market, bullock cart"));
    assert!(p.contains("QUESTION TO EXPLAIN: \"Why does it rain?\""));
    assert!(p.contains("appropriate for grade 5"));
    assert!(p.contains("5. **Summary**"));
    assert!(!p.contains("{grade}"));
  }

  #[test]
  fn prompts_are_byte_identical_across_runs() {
    let prompts = Prompts::default();
    let req = analogy_request();
    let regional = builtin_profile(CulturalBucket::UrbanIndia);
    assert_eq!(
      analogy_prompt(&prompts, &req, &regional, &req.question),
      analogy_prompt(&prompts, &req, &regional, &req.question)
    );

    let ex = exercise_request();
    assert_eq!(exercise_prompt(&prompts, &ex), exercise_prompt(&prompts, &ex));
  }

  #[test]
  fn exercise_prompt_describes_json_shape() {
    let p = exercise_prompt(&Prompts::default(), &exercise_request());
    assert!(p.contains("Generate 5 personalized practice exercises"));
    assert!(p.contains("- Strengths: visualization, creativity"));
    assert!(p.contains("- Exercise Types: multiple_choice"));
    assert!(p.contains("\"exercises\": ["));
    assert!(p.contains("\"personalization_notes\""));
  }

  #[test]
  fn empty_lists_degrade_to_empty_text() {
    let mut ex = exercise_request();
    ex.student_profile.weaknesses.clear();
    ex.exercise_types.clear();
    let p = exercise_prompt(&Prompts::default(), &ex);
    assert!(p.contains("- Weaknesses: \n"));
    assert!(p.contains("- Exercise Types: \n"));
  }

  #[test]
  fn translation_prompts_name_the_language() {
    let prompts = Prompts::default();
    assert!(translate_question_prompt(&prompts, "Hindi", "ye kya hai").starts_with("Translate the following Hindi text to English:"));
    assert!(translate_response_prompt(&prompts, "Tamil", "Rain falls.").contains("\"Rain falls.\""));
    assert!(detection_prompt(&prompts, "hola").contains("\"hola\""));
  }
}
