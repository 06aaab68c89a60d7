//! Named defaults backing the config `Default` impls.

/// Forest: number of trees.
pub const DEFAULT_FOREST_TREES: usize = 50;
/// Forest: maximum tree depth.
pub const DEFAULT_FOREST_MAX_DEPTH: usize = 10;
/// Forest: per-tree bootstrap subsample fraction.
pub const DEFAULT_FOREST_SUBSAMPLE: f64 = 0.05;
/// Forest: minimum samples per leaf.
pub const DEFAULT_MIN_SAMPLES_LEAF: usize = 1;

/// Boosting: number of rounds.
pub const DEFAULT_BOOST_ROUNDS: usize = 100;
/// Boosting: shrinkage applied to each round's contribution.
pub const DEFAULT_BOOST_LEARNING_RATE: f64 = 0.1;
/// Boosting: depth of each regression tree.
pub const DEFAULT_BOOST_MAX_DEPTH: usize = 3;

/// Debounce window for paint/view events (milliseconds).
pub const DEFAULT_DEBOUNCE_MS: u64 = 1000;
/// Background estimation: distance percentile below which a voxel is
/// marked background.
pub const DEFAULT_BACKGROUND_PERCENTILE: f64 = 1.0;

/// Chunk edge length for newly created label arrays.
pub const DEFAULT_CHUNK_EDGE: usize = 32;

/// Store keys under the dataset root, original layout.
pub const DEFAULT_IMAGE_KEY: &str = "crop/original_data";
pub const DEFAULT_INTENSITY_KEY: &str = "features/intensity";
pub const DEFAULT_EMBEDDING_KEY: &str = "features/embedding";
pub const DEFAULT_PAINTING_KEY: &str = "painting";
pub const DEFAULT_PREDICTION_KEY: &str = "prediction";
