//! Small utility helpers used across modules.

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
///
/// Substitution is a single left-to-right pass: text coming from a value is never
/// scanned again, so a student question containing `{topic}` stays literal.
/// Braces that do not name a known key (JSON examples in prompts) are copied as-is.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = String::with_capacity(tpl.len());
  let mut rest = tpl;
  while let Some(open) = rest.find('{') {
    out.push_str(&rest[..open]);
    let after = &rest[open + 1..];
    let hit = after.find('}').and_then(|close| {
      let key = &after[..close];
      pairs.iter().find(|(k, _)| *k == key).map(|(_, v)| (close, *v))
    });
    match hit {
      Some((close, value)) => {
        out.push_str(value);
        rest = &after[close + 1..];
      }
      None => {
        out.push('{');
        rest = after;
      }
    }
  }
  out.push_str(rest);
  out
}

/// Join a list for prompt rendering; empty lists render as an empty string.
pub fn join_list(items: &[String]) -> String {
  items.join(", ")
}

/// Characters of model output shown in debug logs.
pub const LOG_PREVIEW_CHARS: usize = 160;

/// Log-safe truncation for large strings (char-boundary aware).
pub fn trunc_for_log(s: &str, max_chars: usize) -> String {
  if s.chars().count() <= max_chars {
    s.to_string()
  } else {
    let head: String = s.chars().take(max_chars).collect();
    format!("{}… ({} bytes total)", head, s.len())
  }
}

/// Forgiving serde helpers for payloads we do not fully control
/// (model output, hand-written request documents).
pub mod lenient {
  use serde::{Deserialize, Deserializer};
  use serde_json::Value;

  fn scalar_to_string(v: Value) -> Option<String> {
    match v {
      Value::String(s) => Some(s),
      Value::Null => None,
      Value::Number(n) => Some(n.to_string()),
      Value::Bool(b) => Some(b.to_string()),
      other => Some(other.to_string()),
    }
  }

  /// String, number or bool as text; null becomes "".
  pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(scalar_to_string(Value::deserialize(d)?).unwrap_or_default())
  }

  /// A list of scalars, or a single scalar promoted to a one-item list.
  pub fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
      Value::Array(items) => items.into_iter().filter_map(scalar_to_string).collect(),
      other => scalar_to_string(other).into_iter().collect(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde::Deserialize;

  #[test]
  fn fill_template_replaces_known_keys_only() {
    let out = fill_template("Hi {name}, JSON {\"id\": 1} and {unknown}.", &[("name", "Guru")]);
    assert_eq!(out, "Hi Guru, JSON {\"id\": 1} and {unknown}.");
  }

  #[test]
  fn fill_template_does_not_reexpand_values() {
    let out = fill_template("Q: {question} / T: {topic}", &[("question", "what is {topic}?"), ("topic", "rain")]);
    assert_eq!(out, "Q: what is {topic}? / T: rain");
  }

  #[test]
  fn fill_template_handles_unclosed_brace() {
    assert_eq!(fill_template("open { {x}", &[("x", "1")]), "open { 1");
  }

  #[test]
  fn trunc_for_log_is_char_safe() {
    let s = "बारिश क्यों होती है";
    let t = trunc_for_log(s, 3);
    assert!(t.starts_with("बार"));
    assert!(t.contains("bytes total"));
    assert_eq!(trunc_for_log("short", 10), "short");
  }

  #[derive(Deserialize)]
  struct Loose {
    #[serde(default, deserialize_with = "lenient::string")]
    id: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    tags: Vec<String>,
  }

  #[test]
  fn lenient_accepts_numbers_and_single_strings() {
    let p: Loose = serde_json::from_str(r#"{"id": 1234, "tags": "focus"}"#).unwrap();
    assert_eq!(p.id, "1234");
    assert_eq!(p.tags, vec!["focus"]);

    let p: Loose = serde_json::from_str(r#"{"id": null, "tags": [1, "two", true]}"#).unwrap();
    assert_eq!(p.id, "");
    assert_eq!(p.tags, vec!["1".to_string(), "two".into(), "true".into()]);
  }
}
