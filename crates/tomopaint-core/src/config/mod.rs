//! Subsystem configuration. All structs are serde-round-trippable and
//! fully defaulted; there is no CLI surface, only the array store paths
//! and tuning knobs.

pub mod defaults;

mod engine_config;
mod learn_config;
mod store_config;

pub use engine_config::EngineConfig;
pub use learn_config::{BoostParams, ForestParams, LearnConfig};
pub use store_config::StoreConfig;

use serde::{Deserialize, Serialize};

/// Top-level configuration aggregating every subsystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomopaintConfig {
    pub store: StoreConfig,
    pub learn: LearnConfig,
    pub engine: EngineConfig,
}
