//! Per-tooltip IK driver.
//!
//! An [`IkDriver`] owns the joint chain, the target node, and a
//! [`CcdSolver`]. The owner calls [`tick`] once per fixed step; each tick
//! runs at most one solver pass and reports what it did.
//!
//! [`tick`]: IkDriver::tick

use nalgebra::{Isometry3, Translation3, UnitQuaternion};

use armature_core::{SimTime, SolverConfig, TickContext};

use crate::chain::JointChain;
use crate::rig::{NodeId, Rig};
use crate::solver::CcdSolver;

/// Name given to a synthesized target node.
const SYNTHESIZED_TARGET_NAME: &str = "ik_target";

/// What one tick did.
#[derive(Debug, Clone, Copy)]
pub struct TickReport {
    /// Simulation time at the start of the tick.
    pub time: SimTime,
    /// Tick index.
    pub index: u64,
    /// Tooltip-to-target distance entering the tick.
    pub distance_before: f32,
    /// Tooltip-to-target distance leaving the tick.
    pub distance_after: f32,
    /// Joints rotated this tick. Zero when already on target.
    pub rotated_joints: usize,
}

/// Drives one joint chain toward one target node.
pub struct IkDriver {
    chain: JointChain,
    target: NodeId,
    solver: CcdSolver,
}

impl IkDriver {
    /// Attach a driver to the hierarchy containing `tooltip`.
    ///
    /// The chain is discovered from the tooltip's hierarchy. When no
    /// `target` is given, a target node is synthesized: a marker parented
    /// to the hierarchy root, placed at the tooltip's current world
    /// position with identity orientation, so the chain holds its pose
    /// until the target is moved.
    pub fn attach(
        rig: &mut Rig,
        tooltip: NodeId,
        target: Option<NodeId>,
        config: SolverConfig,
    ) -> Self {
        let chain = JointChain::discover(rig, tooltip);
        let target = target.unwrap_or_else(|| synthesize_target(rig, tooltip));
        Self {
            chain,
            target,
            solver: CcdSolver::new(config),
        }
    }

    /// Build a driver from an explicit chain and target.
    #[must_use]
    pub fn with_chain(chain: JointChain, target: NodeId, config: SolverConfig) -> Self {
        Self {
            chain,
            target,
            solver: CcdSolver::new(config),
        }
    }

    #[must_use]
    pub const fn chain(&self) -> &JointChain {
        &self.chain
    }

    #[must_use]
    pub const fn target(&self) -> NodeId {
        self.target
    }

    /// Point the driver at a different target node.
    pub fn retarget(&mut self, target: NodeId) {
        self.target = target;
    }

    /// Current tooltip-to-target distance.
    #[must_use]
    pub fn distance(&self, rig: &Rig) -> f32 {
        (rig.world_position(self.chain.tooltip()) - rig.world_position(self.target)).norm()
    }

    /// Advance the chain by one tick.
    ///
    /// Runs a single solver pass, except when the chain is empty or the
    /// tooltip is already within epsilon of the target. In both of those
    /// cases the rig is left untouched, so a settled chain stays
    /// bit-identical across ticks.
    pub fn tick(&mut self, rig: &mut Rig, ctx: &TickContext) -> TickReport {
        let distance = self.distance(rig);
        if self.chain.is_empty() || distance <= self.solver.config().epsilon {
            return TickReport {
                time: ctx.time,
                index: ctx.index,
                distance_before: distance,
                distance_after: distance,
                rotated_joints: 0,
            };
        }

        let pass = self.solver.solve_pass(rig, &self.chain, self.target);
        TickReport {
            time: ctx.time,
            index: ctx.index,
            distance_before: pass.distance_before,
            distance_after: pass.distance_after,
            rotated_joints: pass.rotated_joints,
        }
    }
}

/// Create a marker at the tooltip's current world position, parented to
/// the hierarchy root.
fn synthesize_target(rig: &mut Rig, tooltip: NodeId) -> NodeId {
    let root = rig.topmost_ancestor(tooltip);
    let tip_world = rig.world_position(tooltip);
    let target_world = Isometry3::from_parts(
        Translation3::from(tip_world),
        UnitQuaternion::identity(),
    );
    let local = rig.world_pose(root).inverse() * target_world;
    rig.add_marker(SYNTHESIZED_TARGET_NAME, Some(root), local)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
