//! # tomopaint-core
//!
//! Foundation crate for the tomopaint annotation engine.
//! Defines volume types, spatial masks, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod labels;
pub mod traits;
pub mod volume;

// Re-export the most commonly used types at the crate root.
pub use config::TomopaintConfig;
pub use errors::{TomoError, TomoResult};
pub use labels::{ClassHistogram, ClassifierKind, FeatureSelection, FeatureSetId};
pub use volume::{RegionScope, SpatialMask, ViewRect, VolumeShape};
