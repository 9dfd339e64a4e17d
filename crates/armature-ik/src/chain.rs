//! Joint chain discovery.
//!
//! A [`JointChain`] is the ordered set of joints the solver sweeps for one
//! tooltip. Joints are stored tip-first, which is the order a CCD pass
//! visits them; the two joints closest to the tooltip carry a `near_tip`
//! flag and take damped steps.

use crate::rig::{NodeId, Rig};

/// How many joints from the tip get the damped near-tip treatment.
const NEAR_TIP_COUNT: usize = 2;

/// One rotatable joint in a chain.
#[derive(Debug, Clone, Copy)]
pub struct ChainJoint {
    /// The rig node this joint rotates.
    pub node: NodeId,
    /// Whether this joint is among the closest to the tooltip.
    pub near_tip: bool,
}

/// An ordered joint chain, tip-first.
#[derive(Debug, Clone)]
pub struct JointChain {
    joints: Vec<ChainJoint>,
    tooltip: NodeId,
}

impl JointChain {
    /// Discover the chain driving `tooltip`.
    ///
    /// Collects every joint node in the hierarchy containing `tooltip`
    /// (excluding the tooltip itself), ordered tip-first. A tooltip with no
    /// joint ancestors yields an empty chain, which the driver treats as a
    /// no-op.
    #[must_use]
    pub fn discover(rig: &Rig, tooltip: NodeId) -> Self {
        let root = rig.topmost_ancestor(tooltip);
        let mut joints: Vec<ChainJoint> = rig
            .ids()
            .filter(|&id| {
                id != tooltip && rig.node(id).is_joint && rig.is_descendant_or_self(id, root)
            })
            .map(|node| ChainJoint {
                node,
                near_tip: false,
            })
            .collect();

        // Arena order is root-to-tip; a CCD pass runs tip-first.
        joints.reverse();
        for (i, joint) in joints.iter_mut().enumerate() {
            joint.near_tip = i < NEAR_TIP_COUNT;
        }

        Self { joints, tooltip }
    }

    /// Build a chain from an explicit tip-first joint list.
    #[must_use]
    pub fn from_joints(joints: Vec<ChainJoint>, tooltip: NodeId) -> Self {
        Self { joints, tooltip }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Joints in tip-first order.
    #[must_use]
    pub fn joints(&self) -> &[ChainJoint] {
        &self.joints
    }

    #[must_use]
    pub const fn tooltip(&self) -> NodeId {
        self.tooltip
    }

    /// Total segment length from the base joint's pivot to the tooltip.
    ///
    /// Upper bound on the distance the tooltip can cover from that pivot,
    /// useful for reachability checks in tests and demos.
    #[must_use]
    pub fn reach(&self, rig: &Rig) -> f32 {
        let Some(base) = self.joints.last() else {
            return 0.0;
        };
        let mut total = 0.0;
        let mut current = self.tooltip;
        while current != base.node {
            total += rig.node(current).local.translation.vector.norm();
            match rig.node(current).parent {
                Some(parent) => current = parent,
                None => break,
            }
        }
        total
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Isometry3, Translation3, UnitQuaternion};

    fn translation(x: f32, y: f32, z: f32) -> Isometry3<f32> {
        Isometry3::from_parts(Translation3::new(x, y, z), UnitQuaternion::identity())
    }

    fn three_joint_rig() -> (Rig, NodeId) {
        let mut rig = Rig::new();
        let base = rig.add_marker("base", None, Isometry3::identity());
        let shoulder = rig.add_joint("shoulder", Some(base), Isometry3::identity());
        let elbow = rig.add_joint("elbow", Some(shoulder), translation(0.0, 0.0, 1.0));
        let wrist = rig.add_joint("wrist", Some(elbow), translation(0.0, 0.0, 1.0));
        let tooltip = rig.add_marker("tooltip", Some(wrist), translation(0.0, 0.0, 0.5));
        (rig, tooltip)
    }

    #[test]
    fn discover_orders_joints_tip_first() {
        let (rig, tooltip) = three_joint_rig();
        let chain = JointChain::discover(&rig, tooltip);

        assert_eq!(chain.len(), 3);
        let names: Vec<&str> = chain
            .joints()
            .iter()
            .map(|j| rig.node(j.node).name.as_str())
            .collect();
        assert_eq!(names, vec!["wrist", "elbow", "shoulder"]);
    }

    #[test]
    fn discover_flags_first_two_as_near_tip() {
        let (rig, tooltip) = three_joint_rig();
        let chain = JointChain::discover(&rig, tooltip);

        let flags: Vec<bool> = chain.joints().iter().map(|j| j.near_tip).collect();
        assert_eq!(flags, vec![true, true, false]);
    }

    #[test]
    fn discover_skips_non_joint_nodes() {
        let (rig, tooltip) = three_joint_rig();
        let chain = JointChain::discover(&rig, tooltip);
        let base = rig.find("base").unwrap();
        assert!(chain.joints().iter().all(|j| j.node != base));
        assert!(chain.joints().iter().all(|j| j.node != tooltip));
    }

    #[test]
    fn tooltip_without_joints_gives_empty_chain() {
        let mut rig = Rig::new();
        let root = rig.add_marker("root", None, Isometry3::identity());
        let tip = rig.add_marker("tip", Some(root), translation(1.0, 0.0, 0.0));
        let chain = JointChain::discover(&rig, tip);
        assert!(chain.is_empty());
        assert_relative_eq!(chain.reach(&rig), 0.0);
    }

    #[test]
    fn single_joint_chain_is_near_tip() {
        let mut rig = Rig::new();
        let joint = rig.add_joint("j", None, Isometry3::identity());
        let tip = rig.add_marker("tip", Some(joint), translation(0.0, 0.0, 1.0));
        let chain = JointChain::discover(&rig, tip);
        assert_eq!(chain.len(), 1);
        assert!(chain.joints()[0].near_tip);
    }

    #[test]
    fn reach_sums_segment_lengths() {
        let (rig, tooltip) = three_joint_rig();
        let chain = JointChain::discover(&rig, tooltip);
        // elbow (1.0) + wrist (1.0) + tooltip (0.5) from the shoulder pivot.
        assert_relative_eq!(chain.reach(&rig), 2.5, epsilon = 1e-6);
    }

    #[test]
    fn from_joints_preserves_order() {
        let (rig, tooltip) = three_joint_rig();
        let discovered = JointChain::discover(&rig, tooltip);
        let rebuilt = JointChain::from_joints(discovered.joints().to_vec(), tooltip);
        assert_eq!(rebuilt.len(), discovered.len());
        assert_eq!(rebuilt.tooltip(), tooltip);
    }
}
