//! Error taxonomy: one enum per subsystem, aggregated into [`TomoError`].

mod engine_error;
mod feature_error;
mod learn_error;
mod store_error;
mod volume_error;

pub use engine_error::EngineError;
pub use feature_error::FeatureError;
pub use learn_error::LearnError;
pub use store_error::StoreError;
pub use volume_error::VolumeError;

/// Top-level error type for the tomopaint workspace.
#[derive(Debug, thiserror::Error)]
pub enum TomoError {
    #[error(transparent)]
    Volume(#[from] VolumeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error(transparent)]
    Learn(#[from] LearnError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result alias used across the workspace.
pub type TomoResult<T> = Result<T, TomoError>;
