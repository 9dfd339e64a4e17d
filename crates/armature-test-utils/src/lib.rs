//! Shared rig fixtures for tests and demos.

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};

use armature_ik::{NodeId, Rig};

/// Build a serial chain of joints stacked along +Z.
///
/// One joint per segment: `joint_1` sits at the base, each following
/// joint is offset by the previous segment length, and the tooltip hangs
/// off the last joint by the final segment length. Returns the rig and
/// the tooltip node.
///
/// # Panics
///
/// Panics if `segment_lengths` is empty.
#[must_use]
pub fn planar_chain(segment_lengths: &[f32]) -> (Rig, NodeId) {
    assert!(!segment_lengths.is_empty(), "need at least one segment");

    let mut rig = Rig::new();
    let base = rig.add_marker("base", None, Isometry3::identity());

    let mut parent = rig.add_joint("joint_1", Some(base), Isometry3::identity());
    for (i, &length) in segment_lengths[..segment_lengths.len() - 1].iter().enumerate() {
        parent = rig.add_joint(
            format!("joint_{}", i + 2),
            Some(parent),
            offset_z(length),
        );
    }

    let last = segment_lengths[segment_lengths.len() - 1];
    let tooltip = rig.add_marker("tooltip", Some(parent), offset_z(last));
    (rig, tooltip)
}

/// Like [`planar_chain`], but every joint after the first starts bent by
/// `bend` radians about +Y, so the chain begins folded rather than
/// straight.
#[must_use]
pub fn bent_planar_chain(segment_lengths: &[f32], bend: f32) -> (Rig, NodeId) {
    let (mut rig, tooltip) = planar_chain(segment_lengths);
    let bend_rotation = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), bend);
    for id in rig.ids().collect::<Vec<_>>() {
        let node = rig.node(id);
        if node.is_joint && node.name != "joint_1" {
            rig.rotate_local(id, &bend_rotation);
        }
    }
    (rig, tooltip)
}

fn offset_z(length: f32) -> Isometry3<f32> {
    Isometry3::from_parts(
        Translation3::new(0.0, 0.0, length),
        UnitQuaternion::identity(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use armature_ik::JointChain;

    #[test]
    fn planar_chain_stacks_along_z() {
        let (rig, tooltip) = planar_chain(&[1.0, 1.0, 0.5]);
        assert_eq!(rig.len(), 5);
        let pos = rig.world_position(tooltip);
        assert_relative_eq!(pos.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(pos.z, 2.5, epsilon = 1e-6);
    }

    #[test]
    fn planar_chain_discovers_one_joint_per_segment() {
        let (rig, tooltip) = planar_chain(&[1.0, 1.0, 1.0]);
        let chain = JointChain::discover(&rig, tooltip);
        assert_eq!(chain.len(), 3);
        assert_relative_eq!(chain.reach(&rig), 3.0, epsilon = 1e-6);
    }

    #[test]
    fn bent_chain_folds_the_tooltip_off_axis() {
        let (rig, tooltip) = bent_planar_chain(&[1.0, 1.0], 0.5);
        let pos = rig.world_position(tooltip);
        assert!(pos.x.abs() > 0.1);
        assert!(pos.z < 2.0);
    }
}
