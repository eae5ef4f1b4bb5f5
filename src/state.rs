//! The `Tutor` service: the model handle, prompt templates and regional table,
//! built once and shared by both pipelines.
//!
//! Nothing in here changes after construction; every request works on its own
//! data and only reads from the service.

use tracing::{info, instrument};

use crate::config::{load_config_from_env, Prompts, TutorConfig};
use crate::model::TextModel;
use crate::regions::RegionTable;

pub struct Tutor<M> {
    pub model: M,
    pub prompts: Prompts,
    pub regions: RegionTable,
}

impl<M: TextModel> Tutor<M> {
    /// Service with built-in prompts and regional profiles.
    pub fn new(model: M) -> Self {
        Self::with_config(model, TutorConfig::default())
    }

    pub fn with_config(model: M, cfg: TutorConfig) -> Self {
        let regions = cfg.region_table();
        Self { model, prompts: cfg.prompts, regions }
    }

    /// Load TOML overrides from TUTOR_CONFIG_PATH (if set) around the given model.
    #[instrument(level = "info", skip_all)]
    pub fn from_env(model: M) -> Self {
        let cfg = load_config_from_env().unwrap_or_default();
        info!(target: "vidya_tutor", model = %model.model_name(), region_overrides = cfg.regions.len(), "Tutor service ready");
        Self::with_config(model, cfg)
    }
}
