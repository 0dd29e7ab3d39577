//! Utility helpers.

pub mod statistics;

pub use statistics::VectorStatistics;
