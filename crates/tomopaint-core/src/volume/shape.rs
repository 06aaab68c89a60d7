use std::fmt;

use serde::{Deserialize, Serialize};

/// Spatial extent of a volume, (Z, Y, X) in index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeShape {
    pub z: usize,
    pub y: usize,
    pub x: usize,
}

impl VolumeShape {
    pub fn new(z: usize, y: usize, x: usize) -> Self {
        Self { z, y, x }
    }

    /// Total number of voxels.
    pub fn num_voxels(&self) -> usize {
        self.z * self.y * self.x
    }

    /// Shape as an array, (Z, Y, X) order.
    pub fn as_array(&self) -> [usize; 3] {
        [self.z, self.y, self.x]
    }

    /// Extent along a given axis (0 = Z, 1 = Y, 2 = X).
    pub fn axis_len(&self, axis: usize) -> usize {
        self.as_array()[axis]
    }

    /// True if the (z, y, x) index lies inside the volume.
    pub fn contains(&self, z: usize, y: usize, x: usize) -> bool {
        z < self.z && y < self.y && x < self.x
    }
}

impl From<[usize; 3]> for VolumeShape {
    fn from(a: [usize; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

impl fmt::Display for VolumeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.z, self.y, self.x)
    }
}
