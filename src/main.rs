//! Vidya Tutor · one-shot runner
//!
//! Reads one JSON request document from stdin and prints the response envelope to
//! stdout. Documents with a `student_profile` go to the exercise pipeline,
//! everything else to the analogy pipeline. Input that is not JSON, or that
//! misses required fields, gets a failure envelope without touching the model.
//!
//! Important env variables:
//!   TUTOR_MODEL_PROVIDER : "gemini" | "openai" (default: whichever key is set, Gemini first)
//!   GEMINI_API_KEY       : enables the Gemini client
//!   GEMINI_MODEL         : default "gemini-2.0-flash"
//!   GEMINI_BASE_URL      : default "https://generativelanguage.googleapis.com/v1beta"
//!   OPENAI_API_KEY       : enables the OpenAI-compatible client
//!   OPENAI_MODEL         : default "gpt-4o-mini"
//!   OPENAI_BASE_URL      : default "https://api.openai.com/v1"
//!   MODEL_TIMEOUT_SECS   : per-call timeout, default 20
//!   TUTOR_CONFIG_PATH    : path to TOML config (prompt templates + regional profiles)
//!   LOG_LEVEL            : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT           : "pretty" (default) or "json"

use tokio::io::AsyncReadExt;
use tracing::{info, instrument, warn};

use vidya_tutor::protocol::{inbound_from_str, Envelope, Inbound};
use vidya_tutor::{telemetry, ModelClient, Tutor, TutorError};

fn build_tutor() -> Result<Tutor<ModelClient>, TutorError> {
  // The model handle is built once and owned by the service.
  Ok(Tutor::from_env(ModelClient::from_env()?))
}

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let mut input = String::new();
  tokio::io::stdin().read_to_string(&mut input).await?;

  // Rejected documents are answered before a model client is needed.
  let out = match inbound_from_str(&input) {
    Err(failure) => {
      warn!(target: "vidya_tutor", error = %failure.error, "Rejected request");
      serde_json::to_string_pretty(&Envelope::<()>::Failure(failure))?
    }
    Ok(Inbound::Analogy(req)) => {
      info!(target: "vidya_tutor", pipeline = "analogy", "Dispatching request");
      serde_json::to_string_pretty(&build_tutor()?.generate_analogy(&req).await)?
    }
    Ok(Inbound::Exercises(req)) => {
      info!(target: "vidya_tutor", pipeline = "exercises", "Dispatching request");
      serde_json::to_string_pretty(&build_tutor()?.generate_exercises(&req).await)?
    }
  };

  println!("{out}");
  Ok(())
}
