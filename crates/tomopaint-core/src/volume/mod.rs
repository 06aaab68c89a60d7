//! Volume geometry: shapes, masks, and region scopes.

mod mask;
mod shape;

pub use mask::{RegionScope, SpatialMask, ViewRect};
pub use shape::VolumeShape;
