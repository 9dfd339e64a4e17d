//! Cyclic coordinate descent (CCD) inverse kinematics.
//!
//! A [`Rig`] is an arena of named transform nodes. A [`JointChain`] is the
//! ordered set of rotatable joints driving one tooltip, and [`IkDriver`]
//! advances the chain toward a target node one CCD pass per fixed tick.

pub mod chain;
pub mod descriptor;
pub mod driver;
pub mod rig;
pub mod solver;

pub use chain::{ChainJoint, JointChain};
pub use descriptor::{NodeDescriptor, RigDescriptor, RigError};
pub use driver::{IkDriver, TickReport};
pub use rig::{Node, NodeId, Rig};
pub use solver::{CcdSolver, JointOutcome, PassReport};
