// armature-core: Config, errors, and tick scheduling for the armature IK workspace.

pub mod config;
pub mod error;
pub mod time;

pub use config::{SessionConfig, SolverConfig};
pub use error::ConfigError;
pub use time::{SimTime, TickClock, TickContext};
