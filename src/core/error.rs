//! Error handling and error types for the forest predictor.
//!
//! Every failure is reported synchronously at the call that caused it and
//! leaves the forest in its last valid state. The core performs no retries.

use crate::core::types::{FeatureIndex, NodeIndex};
use std::io;
use thiserror::Error;

/// Main error type for the forest predictor library.
#[derive(Error, Debug)]
pub enum ForestError {
    /// A split addressed an already-split edge, or an out-of-range node or edge
    #[error("Invalid growth point: node {node}, edge {edge}: {reason}")]
    GrowthPointInvalid {
        /// Parent node named by the growth point
        node: NodeIndex,
        /// Edge index named by the growth point
        edge: usize,
        /// Why the growth point cannot be split
        reason: String,
    },

    /// A per-tree query named a node that is not a tree root
    #[error("Unknown tree: node {root} is not a tree root")]
    UnknownTree {
        /// Node index passed as a tree root
        root: NodeIndex,
    },

    /// A feature accessor rejected a value or could not produce one
    #[error("Invalid feature value at index {index}: {value}, {reason}")]
    FeatureValueInvalid {
        /// Feature being read
        index: FeatureIndex,
        /// Offending value, NaN when none was produced
        value: f64,
        /// Accessor's explanation
        reason: String,
    },

    /// Configuration and validation errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Rejected value
        value: String,
        /// Constraint the value violates
        reason: String,
    },

    /// Input dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected shape
        expected: String,
        /// Shape received
        actual: String,
    },

    /// Snapshot rejected during reconstruction
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message
        message: String,
    },

    /// Thread pool creation errors
    #[error("Threading error: {message}")]
    Threading {
        /// Error message
        message: String,
    },

    /// File I/O errors
    #[error("I/O error: {source}")]
    IO {
        /// Underlying error
        #[from]
        source: io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {source}")]
    Json {
        /// Underlying error
        #[from]
        source: serde_json::Error,
    },

    /// Bincode serialization errors
    #[error("Bincode error: {source}")]
    Bincode {
        /// Underlying error
        #[from]
        source: bincode::Error,
    },

    /// TOML parsing errors
    #[error("TOML error: {source}")]
    TomlDe {
        /// Underlying error
        #[from]
        source: toml::de::Error,
    },

    /// TOML writing errors
    #[error("TOML error: {source}")]
    TomlSer {
        /// Underlying error
        #[from]
        source: toml::ser::Error,
    },
}

/// Type alias for Results using ForestError
pub type Result<T> = std::result::Result<T, ForestError>;

impl ForestError {
    /// Create a growth point error
    pub fn growth_point_invalid<S: Into<String>>(node: NodeIndex, edge: usize, reason: S) -> Self {
        ForestError::GrowthPointInvalid {
            node,
            edge,
            reason: reason.into(),
        }
    }

    /// Create an unknown tree error
    pub fn unknown_tree(root: NodeIndex) -> Self {
        ForestError::UnknownTree { root }
    }

    /// Create a feature value error
    pub fn feature_value_invalid<S: Into<String>>(index: FeatureIndex, value: f64, reason: S) -> Self {
        ForestError::FeatureValueInvalid {
            index,
            value,
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        ForestError::Config {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        ForestError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch<E, A>(expected: E, actual: A) -> Self
    where
        E: Into<String>,
        A: Into<String>,
    {
        ForestError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        ForestError::Serialization {
            message: message.into(),
        }
    }

    /// Create a threading error
    pub fn threading<S: Into<String>>(message: S) -> Self {
        ForestError::Threading {
            message: message.into(),
        }
    }

    /// Check if this error is recoverable.
    ///
    /// Recoverable errors leave the forest untouched; the caller may retry
    /// with corrected input.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ForestError::GrowthPointInvalid { .. } => true,
            ForestError::UnknownTree { .. } => true,
            ForestError::FeatureValueInvalid { .. } => true,
            ForestError::Config { .. } => false,
            ForestError::InvalidParameter { .. } => false,
            ForestError::DimensionMismatch { .. } => false,
            ForestError::Serialization { .. } => false,
            ForestError::Threading { .. } => true,
            ForestError::IO { .. } => false,
            ForestError::Json { .. } => false,
            ForestError::Bincode { .. } => false,
            ForestError::TomlDe { .. } => false,
            ForestError::TomlSer { .. } => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            ForestError::GrowthPointInvalid { .. } => "growth_point_invalid",
            ForestError::UnknownTree { .. } => "unknown_tree",
            ForestError::FeatureValueInvalid { .. } => "feature_value_invalid",
            ForestError::Config { .. } => "config",
            ForestError::InvalidParameter { .. } => "invalid_parameter",
            ForestError::DimensionMismatch { .. } => "dimension_mismatch",
            ForestError::Serialization { .. } => "serialization",
            ForestError::Threading { .. } => "threading",
            ForestError::IO { .. } => "io",
            ForestError::Json { .. } => "json",
            ForestError::Bincode { .. } => "bincode",
            ForestError::TomlDe { .. } => "toml",
            ForestError::TomlSer { .. } => "toml",
        }
    }
}

/// Builds a [`ForestError::Config`] from a message or format arguments.
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::core::error::ForestError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::ForestError::config(format!($fmt, $($arg)*))
    };
}

/// Builds a [`ForestError::Serialization`] from a message or format arguments.
#[macro_export]
macro_rules! serialization_error {
    ($msg:expr) => {
        $crate::core::error::ForestError::serialization($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::core::error::ForestError::serialization(format!($fmt, $($arg)*))
    };
}

/// Returns early with `Err($err.into())` unless `$cond` holds.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            return Err($err.into());
        }
    };
}
