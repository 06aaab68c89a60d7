/// Orchestrator errors.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("background worker stopped: {reason}")]
    WorkerStopped { reason: String },

    #[error("background estimation already in progress")]
    EstimationInProgress,
}
