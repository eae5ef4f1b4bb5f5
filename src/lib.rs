//! Vidya Tutor · localized analogies and personalized practice exercises
//!
//! Two request pipelines over one hosted text-generation model:
//! - analogies: detect the question's language, translate it, ask for a culturally
//!   grounded analogy, translate the answer back (`Tutor::analogy_from_json`)
//! - exercises: render the learner profile into a prompt and recover structured
//!   exercise records from the reply (`Tutor::exercises_from_json`)
//!
//! Every pipeline call returns an `Envelope`; errors never escape to the caller.

pub mod analogy;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod exercises;
pub mod language;
pub mod model;
pub mod practice;
pub mod protocol;
pub mod regions;
pub mod state;
pub mod telemetry;
pub mod util;

pub use error::{ModelError, Result, TutorError};
pub use model::{ModelClient, TextModel};
pub use protocol::Envelope;
pub use state::Tutor;
