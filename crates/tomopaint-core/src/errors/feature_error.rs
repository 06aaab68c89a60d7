/// Feature-provider errors.
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error("no feature set selected for computation")]
    NoFeatureSetSelected,

    #[error("feature set {set} spatial shape {actual} does not match volume {expected}")]
    SpatialShapeMismatch { set: String, expected: String, actual: String },
}
