//! Forest snapshots: the ordered node list and root list that fully describe
//! a forest, in a form serde can round-trip.
//!
//! Loading a snapshot checks that it describes a forest `split` could have
//! grown: targets point forward, every node has exactly one parent or is a
//! root, and roots are in creation order.

use crate::core::constants::SNAPSHOT_FORMAT_VERSION;
use crate::core::error::{ForestError, Result};
use crate::core::traits::{EdgePredictor, Persistable, SplitRule};
use crate::core::types::{Branch, NodeIndex};
use crate::forest::{ForestPredictor, InteriorNode};
use crate::serialization_error;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serializable image of a forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestSnapshot<R, P> {
    /// Snapshot layout version
    pub format_version: u32,
    /// Interior nodes in creation order
    pub nodes: Vec<InteriorNode<R, P>>,
    /// Tree roots in creation order
    pub roots: Vec<NodeIndex>,
}

impl<R, P> Persistable for ForestSnapshot<R, P>
where
    R: Serialize + DeserializeOwned,
    P: Serialize + DeserializeOwned,
{
}

/// Supported snapshot encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SerializationFormat {
    /// Native bincode format (fast, compact)
    Bincode,
    /// JSON format (human-readable, portable)
    Json,
}

impl SerializationFormat {
    /// Picks the format from a file extension: `.json` is JSON, anything else bincode.
    pub fn from_path<Q: AsRef<Path>>(path: Q) -> Self {
        match path.as_ref().extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SerializationFormat::Json,
            _ => SerializationFormat::Bincode,
        }
    }
}

impl Default for SerializationFormat {
    fn default() -> Self {
        SerializationFormat::Bincode
    }
}

impl std::fmt::Display for SerializationFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SerializationFormat::Bincode => write!(f, "bincode"),
            SerializationFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for SerializationFormat {
    type Err = ForestError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "bincode" | "bin" => Ok(SerializationFormat::Bincode),
            "json" => Ok(SerializationFormat::Json),
            _ => Err(serialization_error!("Unknown format: {}", s)),
        }
    }
}

impl<R: SplitRule, P: EdgePredictor> ForestPredictor<R, P> {
    /// Copies the forest into a snapshot.
    pub fn to_snapshot(&self) -> ForestSnapshot<R, P> {
        ForestSnapshot {
            format_version: SNAPSHOT_FORMAT_VERSION,
            nodes: self.nodes().to_vec(),
            roots: self.roots().to_vec(),
        }
    }

    /// Rebuilds a forest from a snapshot, rejecting structures that are not
    /// a valid forest.
    pub fn from_snapshot(snapshot: ForestSnapshot<R, P>) -> Result<Self> {
        validate_snapshot(&snapshot)?;
        log::debug!(
            "Loaded forest snapshot with {} trees and {} interior nodes",
            snapshot.roots.len(),
            snapshot.nodes.len()
        );
        Ok(Self::from_parts_unchecked(snapshot.nodes, snapshot.roots))
    }
}

impl<R, P> ForestPredictor<R, P>
where
    R: SplitRule + Serialize + DeserializeOwned,
    P: EdgePredictor + Serialize + DeserializeOwned,
{
    /// Serializes the forest as JSON.
    ///
    /// JSON has no encoding for NaN or infinity, so a forest holding a
    /// non-finite threshold or edge value is rejected with
    /// [`ForestError::Serialization`]. Use bincode for such forests.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        check_finite(self.nodes())?;
        let snapshot = self.to_snapshot();
        let json = if pretty {
            serde_json::to_string_pretty(&snapshot)?
        } else {
            serde_json::to_string(&snapshot)?
        };
        Ok(json)
    }

    /// Parses a forest from JSON produced by [`to_json`](Self::to_json).
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: ForestSnapshot<R, P> = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    /// Writes the forest to `path`, as JSON for `.json` files and bincode otherwise.
    pub fn save_to_file<Q: AsRef<Path>>(&self, path: Q) -> Result<()> {
        let path = path.as_ref();
        match SerializationFormat::from_path(path) {
            SerializationFormat::Json => std::fs::write(path, self.to_json(true)?)?,
            SerializationFormat::Bincode => self.to_snapshot().save_to_file(path)?,
        }
        log::debug!("Saved forest to {}", path.display());
        Ok(())
    }

    /// Reads a forest written by [`save_to_file`](Self::save_to_file).
    pub fn load_from_file<Q: AsRef<Path>>(path: Q) -> Result<Self> {
        let path = path.as_ref();
        match SerializationFormat::from_path(path) {
            SerializationFormat::Json => Self::from_json(&std::fs::read_to_string(path)?),
            SerializationFormat::Bincode => Self::from_snapshot(ForestSnapshot::load_from_file(path)?),
        }
    }
}

fn check_finite<R: SplitRule, P: EdgePredictor>(nodes: &[InteriorNode<R, P>]) -> Result<()> {
    for (index, node) in nodes.iter().enumerate() {
        if !node.split_rule().is_finite() {
            return Err(serialization_error!(
                "Node {} has a non-finite split rule {:?}, which JSON cannot represent",
                index,
                node.split_rule()
            ));
        }
        if let Some(branch) = Branch::ALL.into_iter().find(|&b| !node.edge(b).predictor().is_finite()) {
            return Err(serialization_error!(
                "Node {} edge {} has non-finite value {}, which JSON cannot represent",
                index,
                branch,
                node.edge(branch).value()
            ));
        }
    }
    Ok(())
}

fn validate_snapshot<R, P>(snapshot: &ForestSnapshot<R, P>) -> Result<()> {
    if snapshot.format_version != SNAPSHOT_FORMAT_VERSION {
        return Err(serialization_error!(
            "Unsupported snapshot version {}, expected {}",
            snapshot.format_version,
            SNAPSHOT_FORMAT_VERSION
        ));
    }

    let num_nodes = snapshot.nodes.len();
    let mut has_parent = vec![false; num_nodes];

    let mut previous_root = None;
    for &root in &snapshot.roots {
        if root >= num_nodes {
            return Err(serialization_error!("Root {} out of range ({} nodes)", root, num_nodes));
        }
        if previous_root.map_or(false, |prev| root <= prev) {
            return Err(serialization_error!("Roots must be strictly increasing, found {} after {:?}", root, previous_root));
        }
        previous_root = Some(root);
        has_parent[root] = true;
    }

    for (index, node) in snapshot.nodes.iter().enumerate() {
        for branch in Branch::ALL {
            let Some(target) = node.edges()[branch.index()].target() else {
                continue;
            };
            if target <= index || target >= num_nodes {
                return Err(serialization_error!(
                    "Node {} edge {} points at invalid node {}",
                    index,
                    branch,
                    target
                ));
            }
            if has_parent[target] {
                return Err(serialization_error!("Node {} is reachable more than once", target));
            }
            has_parent[target] = true;
        }
    }

    if let Some(orphan) = has_parent.iter().position(|&seen| !seen) {
        return Err(serialization_error!("Node {} belongs to no tree", orphan));
    }

    Ok(())
}
