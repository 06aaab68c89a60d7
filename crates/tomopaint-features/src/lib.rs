//! # tomopaint-features
//!
//! Resolves a user-chosen region scope into a concrete spatial mask and
//! fetches per-voxel feature vectors over it, concatenating the selected
//! feature sets along the feature axis.

mod memory;
mod provider;
mod selector;

pub use memory::MemoryFeatureArray;
pub use provider::FeatureProvider;
pub use selector::resolve;
