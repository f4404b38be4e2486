use framelog_trace::ReconstructOptions;

use crate::SnapshotSchema;

pub const SCOPE_OPEN_ENV: &str = "FRAMELOG_SCOPE_OPEN";
pub const SCOPE_CLOSE_ENV: &str = "FRAMELOG_SCOPE_CLOSE";
pub const FIELDS_ENV: &str = "FRAMELOG_FIELDS";
pub const IMAGE_SCALE_ENV: &str = "FRAMELOG_IMAGE_SCALE";

pub const DEFAULT_IMAGE_SCALE: f64 = 1.0;

/// Settings for one profiling session and its rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilerConfig {
    /// Which properties are snapshotted.
    pub schema: SnapshotSchema,
    /// Scope names and labels used when reconstructing the trace.
    pub reconstruct: ReconstructOptions,
    /// Display scale for the surface snapshot.
    pub image_scale: f64,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            schema: SnapshotSchema::Discover,
            reconstruct: ReconstructOptions::default(),
            image_scale: DEFAULT_IMAGE_SCALE,
        }
    }
}

impl ProfilerConfig {
    /// Defaults, overridden by any `FRAMELOG_*` variables that are set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(name) = lookup(SCOPE_OPEN_ENV).filter(|v| !v.is_empty()) {
            config.reconstruct.scope_open = name;
        }
        if let Some(name) = lookup(SCOPE_CLOSE_ENV).filter(|v| !v.is_empty()) {
            config.reconstruct.scope_close = name;
        }
        if let Some(schema) = lookup(FIELDS_ENV).and_then(|raw| SnapshotSchema::from_list(&raw)) {
            config.schema = schema;
        }
        if let Some(raw) = lookup(IMAGE_SCALE_ENV) {
            match raw.trim().parse::<f64>() {
                Ok(scale) if scale.is_finite() && scale > 0.0 => config.image_scale = scale,
                _ => tracing::warn!(value = %raw, "ignoring invalid {IMAGE_SCALE_ENV}"),
            }
        }

        config
    }
}
