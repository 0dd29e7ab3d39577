//! Forest persistence.
//!
//! The forest exposes its ordered node list and root list as a
//! [`ForestSnapshot`]; this module round-trips snapshots through JSON and
//! bincode and rebuilds validated forests from them.

pub mod snapshot;

pub use snapshot::{ForestSnapshot, SerializationFormat};
