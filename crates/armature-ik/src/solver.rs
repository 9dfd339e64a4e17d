//! Cyclic coordinate descent solver.
//!
//! One pass sweeps the chain tip-first. Each joint is rotated, in its own
//! local frame, so the pivot-to-tooltip ray swings toward the
//! pivot-to-target ray, with the step angle clamped per joint. A single
//! pass does not converge; the driver runs one pass per tick and lets
//! convergence emerge across ticks.

use nalgebra::{Point3, UnitQuaternion, UnitVector3};

use armature_core::SolverConfig;

use crate::chain::{ChainJoint, JointChain};
use crate::rig::{NodeId, Rig};

/// Rotation axes shorter than this are treated as undefined (tip and
/// target anti-parallel in the joint frame).
const AXIS_EPS: f32 = 1e-6;

/// What happened to one joint during a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointOutcome {
    /// The joint took a corrective rotation.
    Rotated,
    /// The correction angle was below the minimum; nothing applied.
    Aligned,
    /// Geometry was degenerate (zero-length ray or undefined axis); skipped.
    Degenerate,
}

/// Summary of one solver pass.
#[derive(Debug, Clone, Copy)]
pub struct PassReport {
    /// Tooltip-to-target distance before the pass.
    pub distance_before: f32,
    /// Tooltip-to-target distance after the pass.
    pub distance_after: f32,
    /// How many joints took a rotation.
    pub rotated_joints: usize,
}

/// CCD solver.
pub struct CcdSolver {
    config: SolverConfig,
}

impl CcdSolver {
    #[must_use]
    pub const fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(SolverConfig::default())
    }

    #[must_use]
    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Evaluate and (when warranted) rotate a single joint.
    ///
    /// Works in the joint's local frame: the current tooltip and target
    /// positions are inverse-transformed, and the joint's local rotation is
    /// right-multiplied by the axis-angle correction between the two rays.
    pub fn evaluate_joint(
        &self,
        rig: &mut Rig,
        joint: &ChainJoint,
        tooltip: NodeId,
        target: NodeId,
    ) -> JointOutcome {
        let joint_pose = rig.world_pose(joint.node);
        let tip_world = Point3::from(rig.world_position(tooltip));
        let target_world = Point3::from(rig.world_position(target));

        let to_tip = joint_pose.inverse_transform_point(&tip_world).coords;
        let to_target = joint_pose.inverse_transform_point(&target_world).coords;

        // A tooltip or target sitting on the pivot gives no direction.
        if to_tip.norm() < self.config.epsilon || to_target.norm() < self.config.epsilon {
            return JointOutcome::Degenerate;
        }
        let from = to_tip.normalize();
        let to = to_target.normalize();

        let angle = from.dot(&to).clamp(-1.0, 1.0).acos();
        if angle < self.config.min_rotation {
            return JointOutcome::Aligned;
        }

        let axis = from.cross(&to);
        if axis.norm() < AXIS_EPS {
            return JointOutcome::Degenerate;
        }

        let cap = if joint.near_tip {
            self.config.max_step_angle * self.config.near_tip_scale
        } else {
            self.config.max_step_angle
        };
        let step = angle.min(cap);

        let rotation = UnitQuaternion::from_axis_angle(&UnitVector3::new_normalize(axis), step);
        rig.rotate_local(joint.node, &rotation);
        JointOutcome::Rotated
    }

    /// Run one tip-first pass over the chain.
    ///
    /// World positions are re-read before each joint, so corrections made
    /// earlier in the pass are visible to the joints after them.
    pub fn solve_pass(&self, rig: &mut Rig, chain: &JointChain, target: NodeId) -> PassReport {
        let tooltip = chain.tooltip();
        let distance_before =
            (rig.world_position(tooltip) - rig.world_position(target)).norm();

        let mut rotated_joints = 0;
        for joint in chain.joints() {
            if self.evaluate_joint(rig, joint, tooltip, target) == JointOutcome::Rotated {
                rotated_joints += 1;
            }
        }

        let distance_after =
            (rig.world_position(tooltip) - rig.world_position(target)).norm();

        PassReport {
            distance_before,
            distance_after,
            rotated_joints,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
