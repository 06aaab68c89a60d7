use serde::{Deserialize, Serialize};

use super::defaults;

/// Orchestrator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Debounce window for paint/view events (milliseconds). Rapid events
    /// within the window coalesce to the most recent one.
    pub debounce_ms: u64,
    /// Distance percentile for background estimation, in (0, 100).
    pub background_percentile: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debounce_ms: defaults::DEFAULT_DEBOUNCE_MS,
            background_percentile: defaults::DEFAULT_BACKGROUND_PERCENTILE,
        }
    }
}
