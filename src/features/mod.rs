//! Feature vector collaborators.
//!
//! Dense rows are plain slices, `Vec`s and `ndarray` views (see
//! [`FeatureAccessor`](crate::core::traits::FeatureAccessor)); this module
//! adds the sparse binary representation.

pub mod sparse_binary;

pub use sparse_binary::SparseBinaryVector;
