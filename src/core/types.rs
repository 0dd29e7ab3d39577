//! Core data types for the forest predictor.
//!
//! This module defines the handle types used to address the node arena and
//! the small enumerations shared by the forest engine, the prediction
//! pipeline and the configuration layer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Interior node identifier type.
///
/// Nodes are numbered from zero in creation order and the number is never
/// reused, so a `NodeIndex` stays valid for the lifetime of its forest.
pub type NodeIndex = usize;

/// Feature index type for identifying features of an example.
pub type FeatureIndex = usize;

/// Prediction value type. Edge contributions and sums are double precision.
pub type Score = f64;

/// One of the two outcomes of an interior node's split rule.
///
/// `Left` is edge 0 and is taken when the feature value is less than or
/// equal to the threshold; `Right` is edge 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Branch {
    /// Edge 0
    Left = 0,
    /// Edge 1
    Right = 1,
}

impl Branch {
    /// Both branches in edge order.
    pub const ALL: [Branch; 2] = [Branch::Left, Branch::Right];

    /// Returns the edge index (0 or 1) of this branch.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts an edge index into a branch, `None` for anything but 0 or 1.
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Branch::Left),
            1 => Some(Branch::Right),
            _ => None,
        }
    }

    /// Picks the branch for a threshold comparison: `Left` iff `value <= threshold`.
    pub fn from_threshold(value: f64, threshold: f64) -> Self {
        if value <= threshold {
            Branch::Left
        } else {
            Branch::Right
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Verbosity levels for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerbosityLevel {
    /// Fatal errors only
    Fatal = -1,
    /// Warnings and errors
    Warning = 0,
    /// Information, warnings, and errors
    Info = 1,
    /// Debug information
    Debug = 2,
}

impl Default for VerbosityLevel {
    fn default() -> Self {
        VerbosityLevel::Info
    }
}

impl VerbosityLevel {
    /// SILENT mode (no output)
    pub const SILENT: Self = VerbosityLevel::Fatal;

    /// Returns the `log` filter matching this verbosity.
    pub fn level_filter(self) -> log::LevelFilter {
        match self {
            VerbosityLevel::Fatal => log::LevelFilter::Error,
            VerbosityLevel::Warning => log::LevelFilter::Warn,
            VerbosityLevel::Info => log::LevelFilter::Info,
            VerbosityLevel::Debug => log::LevelFilter::Debug,
        }
    }

    /// Parses a verbosity name or numeric level (-1 to 2).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fatal" | "silent" | "-1" => Some(VerbosityLevel::Fatal),
            "warning" | "warn" | "0" => Some(VerbosityLevel::Warning),
            "info" | "1" => Some(VerbosityLevel::Info),
            "debug" | "2" => Some(VerbosityLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for VerbosityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerbosityLevel::Fatal => write!(f, "fatal"),
            VerbosityLevel::Warning => write!(f, "warning"),
            VerbosityLevel::Info => write!(f, "info"),
            VerbosityLevel::Debug => write!(f, "debug"),
        }
    }
}
