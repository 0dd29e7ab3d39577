//! System constants and configuration defaults for the forest predictor.

use crate::core::types::*;

/// Number of edges leaving every interior node.
pub const EDGES_PER_NODE: usize = 2;

/// Version tag written into every forest snapshot.
/// Snapshots with a different version are rejected on load.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Default number of threads for batch prediction.
/// 0 means use all available cores.
pub const DEFAULT_NUM_THREADS: usize = 0;

/// Default minimum number of rows before batch prediction goes parallel.
/// Smaller batches are evaluated on the calling thread.
pub const DEFAULT_PARALLEL_MIN_ROWS: usize = 1024;

/// Default initial capacity of the node arena.
pub const DEFAULT_NODE_CAPACITY: usize = 0;

/// Default verbosity level for logging.
pub const DEFAULT_VERBOSITY: VerbosityLevel = VerbosityLevel::Info;

/// Library version string.
pub const FOREST_PREDICTOR_VERSION: &str = env!("CARGO_PKG_VERSION");
