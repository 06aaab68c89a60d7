//! Workspace-wide constants. Config defaults live in `config::defaults`.

/// Tomopaint system version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Label value meaning "no annotation yet".
pub const LABEL_UNLABELED: i32 = 0;

/// Reserved label for the background class.
pub const LABEL_BACKGROUND: i32 = 1;

/// Zarr format version written by the store.
pub const ZARR_FORMAT: u8 = 2;

/// Dtype written for label arrays (little-endian i32, matches the
/// painting/prediction arrays the viewer expects).
pub const LABEL_DTYPE: &str = "<i4";

/// Dtype for image and feature arrays.
pub const FLOAT_DTYPE: &str = "<f4";

/// Chunk-file name separator ("z.y.x" chunk keys).
pub const DIMENSION_SEPARATOR: char = '.';
