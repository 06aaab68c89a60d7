/// Storage-layer errors for chunked array I/O.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("array not found at {path}")]
    ArrayNotFound { path: String },

    #[error("invalid array metadata at {path}: {reason}")]
    MetadataInvalid { path: String, reason: String },

    #[error("unsupported dtype {dtype:?} (store handles {supported})")]
    DtypeUnsupported { dtype: String, supported: &'static str },

    #[error("chunk I/O failed at {path}: {message}")]
    ChunkIo { path: String, message: String },

    #[error("array shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },
}
