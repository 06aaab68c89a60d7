//! # tomopaint-engine
//!
//! The interactive annotation orchestrator. Paint strokes and control
//! changes restart a debounce window; when it elapses, a single worker
//! thread runs a fit/predict cycle: fetch features over the active
//! region, train on the painted voxels, predict every voxel in the
//! region, and write the result back to the prediction array. Submissions
//! that arrive while a cycle runs coalesce into one queued job, latest
//! wins.
//!
//! Background estimation is a separate one-at-a-time pass that paints
//! the most median-like voxels (by embedding distance) as background.

mod background;
mod debounce;
mod engine;
mod worker;

pub use background::BackgroundReport;
pub use debounce::Debouncer;
pub use engine::{AnnotationEngine, ControlState, CycleReport};
pub use worker::{JobSlot, Worker};
