/// Geometry errors for masks and region selection.
#[derive(Debug, thiserror::Error)]
pub enum VolumeError {
    #[error("inverted rectangle on {axis} axis: min {min} > max {max}")]
    InvertedRect { axis: &'static str, min: usize, max: usize },

    #[error("mask {mask} exceeds volume extent {shape}")]
    OutOfBounds { mask: String, shape: String },

    #[error("shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },
}
