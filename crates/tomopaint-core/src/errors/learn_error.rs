/// Trainer / predictor errors.
#[derive(Debug, thiserror::Error)]
pub enum LearnError {
    #[error("invalid classifier params: {reason}")]
    InvalidParams { reason: String },

    #[error("dimension mismatch: {labels} labels for {samples} feature rows")]
    DimensionMismatch { labels: usize, samples: usize },

    #[error("feature matrix has zero columns")]
    EmptyFeatureDim,
}
