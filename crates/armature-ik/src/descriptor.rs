//! TOML rig descriptions.
//!
//! A [`RigDescriptor`] is the on-disk form of a rig: a flat list of nodes
//! with parent references by name. Nodes must be declared parent-first.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use nalgebra::{Isometry3, Translation3, UnitQuaternion};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rig::Rig;

/// Errors from parsing or building a rig description.
#[derive(Debug, Error)]
pub enum RigError {
    #[error("Failed to read rig file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Rig description has no nodes")]
    Empty,

    #[error("Duplicate node name: {0}")]
    DuplicateNode(String),

    #[error("Node {node} references unknown parent {parent} (parents must be declared first)")]
    UnknownParent { node: String, parent: String },
}

/// One node in a rig description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub name: String,
    /// Parent node name. Omit for a root node.
    #[serde(default)]
    pub parent: Option<String>,
    /// Translation relative to the parent frame, meters.
    #[serde(default)]
    pub translation: [f32; 3],
    /// Orientation as roll-pitch-yaw, radians.
    #[serde(default)]
    pub rotation_rpy: [f32; 3],
    /// Whether the solver may rotate this node.
    #[serde(default)]
    pub joint: bool,
}

impl NodeDescriptor {
    fn local_pose(&self) -> Isometry3<f32> {
        let translation = Translation3::new(
            self.translation[0],
            self.translation[1],
            self.translation[2],
        );
        let rotation = UnitQuaternion::from_euler_angles(
            self.rotation_rpy[0],
            self.rotation_rpy[1],
            self.rotation_rpy[2],
        );
        Isometry3::from_parts(translation, rotation)
    }
}

/// A complete rig description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigDescriptor {
    #[serde(rename = "node", default)]
    pub nodes: Vec<NodeDescriptor>,
}

impl RigDescriptor {
    /// Parse a descriptor from TOML text.
    pub fn parse_str(content: &str) -> Result<Self, RigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a descriptor from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse_str(&content)
    }

    /// Build a [`Rig`] from this description.
    pub fn build(&self) -> Result<Rig, RigError> {
        if self.nodes.is_empty() {
            return Err(RigError::Empty);
        }

        let mut seen = HashSet::new();
        let mut rig = Rig::new();
        for desc in &self.nodes {
            if !seen.insert(desc.name.as_str()) {
                return Err(RigError::DuplicateNode(desc.name.clone()));
            }
            let parent = match &desc.parent {
                Some(parent_name) => Some(rig.find(parent_name).ok_or_else(|| {
                    RigError::UnknownParent {
                        node: desc.name.clone(),
                        parent: parent_name.clone(),
                    }
                })?),
                None => None,
            };
            rig.add_node(desc.name.clone(), parent, desc.local_pose(), desc.joint);
        }
        Ok(rig)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
