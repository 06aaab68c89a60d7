//! # tomopaint-store
//!
//! Durable chunked array storage for the annotation engine.
//!
//! Arrays live on disk in zarr v2 layout: a per-array directory holding a
//! `.zarray` JSON metadata document and one raw little-endian file per
//! chunk, named by chunk indices joined with `.`. Compression is not used
//! (`compressor: null`), so any zarr v2 reader can open what we write.
//!
//! Three roles:
//! - [`ChunkedArray`] — generic N-dimensional read/write array.
//! - [`VolumeDataset`] — the image + feature + label arrays under one root.
//! - [`LabelStore`] — a mutable label array behind the single
//!   writer-exclusion lock every mutation source must share.

mod chunked;
mod dataset;
mod label_store;
mod meta;

pub use chunked::{ChunkedArray, Element};
pub use dataset::{FeatureArray, VolumeDataset};
pub use label_store::LabelStore;
pub use meta::ZarrArrayMeta;
