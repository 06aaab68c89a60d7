//! Region scope → spatial mask resolution.

use tomopaint_core::volume::{RegionScope, SpatialMask, VolumeShape};

/// Resolve a scope into a concrete mask over `shape`.
///
/// `WholeVolume` covers the full extent on every axis. `CurrentView` is a
/// single-slice range on the depth axis intersected with the on-screen
/// rectangle on (Y, X); the result is clamped to the volume, so a view
/// panned past the edge yields the visible intersection (possibly empty
/// for a plane beyond the last slice).
pub fn resolve(scope: &RegionScope, shape: VolumeShape) -> SpatialMask {
    match scope {
        RegionScope::WholeVolume => SpatialMask::full(shape),
        RegionScope::CurrentView { plane, rect } => {
            SpatialMask::new(*plane..plane + 1, rect.y_range(), rect.x_range()).clamp_to(shape)
        }
    }
}
