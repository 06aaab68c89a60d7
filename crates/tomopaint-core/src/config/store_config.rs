use serde::{Deserialize, Serialize};

use super::defaults;

/// Array keys under the dataset root and creation parameters for the
/// mutable label arrays. The image and feature arrays must already exist;
/// painting and prediction are created on first access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub image_key: String,
    pub intensity_key: String,
    pub embedding_key: String,
    pub painting_key: String,
    pub prediction_key: String,
    /// Chunk edge length for newly created label arrays.
    pub chunk_edge: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            image_key: defaults::DEFAULT_IMAGE_KEY.to_string(),
            intensity_key: defaults::DEFAULT_INTENSITY_KEY.to_string(),
            embedding_key: defaults::DEFAULT_EMBEDDING_KEY.to_string(),
            painting_key: defaults::DEFAULT_PAINTING_KEY.to_string(),
            prediction_key: defaults::DEFAULT_PREDICTION_KEY.to_string(),
            chunk_edge: defaults::DEFAULT_CHUNK_EDGE,
        }
    }
}
