//! Configuration management for the forest predictor.

pub mod core;

pub use self::core::{
    Config, ConfigBuilder, ENV_NODE_CAPACITY, ENV_NUM_THREADS, ENV_PARALLEL_MIN_ROWS,
    ENV_VERBOSITY,
};
