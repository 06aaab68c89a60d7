use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::errors::VolumeError;

use super::VolumeShape;

/// On-screen rectangular extent on the (Y, X) axes of the displayed plane.
///
/// Corners are validated at construction: an inverted rectangle (min past
/// max on either axis) is rejected instead of silently producing an empty
/// mask downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRect {
    min_y: usize,
    min_x: usize,
    max_y: usize,
    max_x: usize,
}

impl ViewRect {
    /// Create a rectangle from corner coordinates, min corner first.
    pub fn new(
        min_y: usize,
        min_x: usize,
        max_y: usize,
        max_x: usize,
    ) -> Result<Self, VolumeError> {
        if min_y > max_y {
            return Err(VolumeError::InvertedRect { axis: "y", min: min_y, max: max_y });
        }
        if min_x > max_x {
            return Err(VolumeError::InvertedRect { axis: "x", min: min_x, max: max_x });
        }
        Ok(Self { min_y, min_x, max_y, max_x })
    }

    pub fn y_range(&self) -> Range<usize> {
        self.min_y..self.max_y
    }

    pub fn x_range(&self) -> Range<usize> {
        self.min_x..self.max_x
    }
}

/// A user-chosen training scope, resolved into a [`SpatialMask`] per
/// interaction by the region selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionScope {
    /// The full volume extent on every axis.
    WholeVolume,
    /// The currently displayed plane intersected with the on-screen rect.
    CurrentView { plane: usize, rect: ViewRect },
}

/// A rectangular sub-region of the volume: one half-open index range per
/// axis, (Z, Y, X) order. Recomputed per interaction, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpatialMask {
    pub z: Range<usize>,
    pub y: Range<usize>,
    pub x: Range<usize>,
}

impl SpatialMask {
    pub fn new(z: Range<usize>, y: Range<usize>, x: Range<usize>) -> Self {
        Self { z, y, x }
    }

    /// The full extent of a volume.
    pub fn full(shape: VolumeShape) -> Self {
        Self { z: 0..shape.z, y: 0..shape.y, x: 0..shape.x }
    }

    /// Number of voxels covered by the mask.
    pub fn num_voxels(&self) -> usize {
        self.z.len() * self.y.len() * self.x.len()
    }

    /// Extent of the mask itself, as a shape.
    pub fn shape(&self) -> VolumeShape {
        VolumeShape::new(self.z.len(), self.y.len(), self.x.len())
    }

    pub fn is_empty(&self) -> bool {
        self.num_voxels() == 0
    }

    /// Clamp every axis range to the given volume extent.
    pub fn clamp_to(&self, shape: VolumeShape) -> Self {
        let clamp = |r: &Range<usize>, len: usize| r.start.min(len)..r.end.min(len);
        Self {
            z: clamp(&self.z, shape.z),
            y: clamp(&self.y, shape.y),
            x: clamp(&self.x, shape.x),
        }
    }

    /// Error unless the mask lies entirely inside the volume.
    pub fn check_within(&self, shape: VolumeShape) -> Result<(), VolumeError> {
        if self.z.end > shape.z || self.y.end > shape.y || self.x.end > shape.x {
            return Err(VolumeError::OutOfBounds {
                mask: self.to_string(),
                shape: shape.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for SpatialMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}..{}, {}..{}, {}..{}]",
            self.z.start, self.z.end, self.y.start, self.y.end, self.x.start, self.x.end
        )
    }
}
