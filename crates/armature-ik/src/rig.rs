//! Transform hierarchy backing the IK solver.
//!
//! Nodes live in a flat arena indexed by [`NodeId`]. Parents are always
//! inserted before their children, so index order is a valid root-to-tip
//! topological order and world poses can be composed by walking parent
//! links upward.

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};

/// Handle to a node in a [`Rig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index of this node.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0
    }
}

/// One transform node.
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique name within the rig.
    pub name: String,
    /// Parent node, `None` for a root.
    pub parent: Option<NodeId>,
    /// Pose relative to the parent frame (or world, for roots).
    pub local: Isometry3<f32>,
    /// Whether the solver may rotate this node.
    pub is_joint: bool,
}

/// Arena of transform nodes.
#[derive(Debug, Clone, Default)]
pub struct Rig {
    nodes: Vec<Node>,
}

impl Rig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node under `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not refer to an existing node.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeId>,
        local: Isometry3<f32>,
        is_joint: bool,
    ) -> NodeId {
        if let Some(p) = parent {
            assert!(p.0 < self.nodes.len(), "parent node does not exist");
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.into(),
            parent,
            local,
            is_joint,
        });
        id
    }

    /// Insert a rotatable joint node.
    pub fn add_joint(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeId>,
        local: Isometry3<f32>,
    ) -> NodeId {
        self.add_node(name, parent, local, true)
    }

    /// Insert a non-joint node (tooltip, target, anchor).
    pub fn add_marker(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeId>,
        local: Isometry3<f32>,
    ) -> NodeId {
        self.add_node(name, parent, local, false)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[must_use]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Look up a node by name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    /// All node ids in insertion (root-to-tip topological) order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    /// World pose of a node, composed up the parent chain.
    #[must_use]
    pub fn world_pose(&self, id: NodeId) -> Isometry3<f32> {
        let node = &self.nodes[id.0];
        match node.parent {
            Some(parent) => self.world_pose(parent) * node.local,
            None => node.local,
        }
    }

    /// World-space position of a node.
    #[must_use]
    pub fn world_position(&self, id: NodeId) -> Vector3<f32> {
        self.world_pose(id).translation.vector
    }

    pub fn set_local_pose(&mut self, id: NodeId, local: Isometry3<f32>) {
        self.nodes[id.0].local = local;
    }

    pub fn set_local_translation(&mut self, id: NodeId, translation: Vector3<f32>) {
        self.nodes[id.0].local.translation = Translation3::from(translation);
    }

    /// Apply a rotation in the node's own local frame.
    pub fn rotate_local(&mut self, id: NodeId, delta: &UnitQuaternion<f32>) {
        let node = &mut self.nodes[id.0];
        node.local.rotation = node.local.rotation * delta;
    }

    /// Root of the hierarchy containing `id`.
    #[must_use]
    pub fn topmost_ancestor(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            current = parent;
        }
        current
    }

    /// Whether `id` lies in the subtree rooted at `ancestor` (inclusive).
    #[must_use]
    pub fn is_descendant_or_self(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == ancestor {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
