//! The `.zarray` metadata document, zarr v2.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use tomopaint_core::constants::{DIMENSION_SEPARATOR, ZARR_FORMAT};
use tomopaint_core::errors::StoreError;

pub const ZARRAY_FILE: &str = ".zarray";

/// Zarr v2 array metadata. We only ever write uncompressed C-order arrays
/// with a `.` dimension separator; reading rejects anything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZarrArrayMeta {
    pub chunks: Vec<usize>,
    pub compressor: Option<serde_json::Value>,
    pub dtype: String,
    pub fill_value: serde_json::Value,
    pub filters: Option<serde_json::Value>,
    pub order: String,
    pub shape: Vec<usize>,
    pub zarr_format: u8,
    #[serde(default)]
    pub dimension_separator: Option<String>,
}

impl ZarrArrayMeta {
    /// Metadata for a freshly created array.
    pub fn create(shape: Vec<usize>, chunks: Vec<usize>, dtype: &str) -> Self {
        Self {
            chunks,
            compressor: None,
            dtype: dtype.to_string(),
            fill_value: serde_json::json!(0),
            filters: None,
            order: "C".to_string(),
            shape,
            zarr_format: ZARR_FORMAT,
            dimension_separator: Some(DIMENSION_SEPARATOR.to_string()),
        }
    }

    pub fn load(array_dir: &Path) -> Result<Self, StoreError> {
        let meta_path = array_dir.join(ZARRAY_FILE);
        let text = fs::read_to_string(&meta_path).map_err(|e| StoreError::ArrayNotFound {
            path: format!("{} ({e})", meta_path.display()),
        })?;
        let meta: Self =
            serde_json::from_str(&text).map_err(|e| StoreError::MetadataInvalid {
                path: meta_path.display().to_string(),
                reason: e.to_string(),
            })?;
        meta.validate(array_dir)?;
        Ok(meta)
    }

    pub fn save(&self, array_dir: &Path) -> Result<(), StoreError> {
        let meta_path = array_dir.join(ZARRAY_FILE);
        let text = serde_json::to_string_pretty(self).map_err(|e| StoreError::MetadataInvalid {
            path: meta_path.display().to_string(),
            reason: e.to_string(),
        })?;
        fs::write(&meta_path, text).map_err(|e| StoreError::ChunkIo {
            path: meta_path.display().to_string(),
            message: e.to_string(),
        })
    }

    fn validate(&self, array_dir: &Path) -> Result<(), StoreError> {
        let path = array_dir.display().to_string();
        if self.zarr_format != ZARR_FORMAT {
            return Err(StoreError::MetadataInvalid {
                path,
                reason: format!("zarr_format {} (expected {ZARR_FORMAT})", self.zarr_format),
            });
        }
        if self.compressor.is_some() {
            return Err(StoreError::MetadataInvalid {
                path,
                reason: "compressed arrays are not supported".to_string(),
            });
        }
        if self.order != "C" {
            return Err(StoreError::MetadataInvalid {
                path,
                reason: format!("order {:?} (expected \"C\")", self.order),
            });
        }
        if self.shape.len() != self.chunks.len() || self.shape.is_empty() {
            return Err(StoreError::MetadataInvalid {
                path,
                reason: format!(
                    "shape rank {} vs chunks rank {}",
                    self.shape.len(),
                    self.chunks.len()
                ),
            });
        }
        if self.chunks.iter().any(|&c| c == 0) {
            return Err(StoreError::MetadataInvalid {
                path,
                reason: "zero-length chunk dimension".to_string(),
            });
        }
        Ok(())
    }

    /// Separator for chunk-file names; zarr defaults to `.` when absent.
    pub fn separator(&self) -> char {
        self.dimension_separator
            .as_deref()
            .and_then(|s| s.chars().next())
            .unwrap_or(DIMENSION_SEPARATOR)
    }

    /// Fill value as f64 (covers both integer and float dtypes).
    pub fn fill_f64(&self) -> f64 {
        self.fill_value.as_f64().unwrap_or(0.0)
    }
}
