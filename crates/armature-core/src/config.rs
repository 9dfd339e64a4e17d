use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_max_step_angle() -> f32 {
    0.5
}
const fn default_near_tip_scale() -> f32 {
    0.5
}
const fn default_epsilon() -> f32 {
    1e-4
}
const fn default_min_rotation() -> f32 {
    1e-5
}
const fn default_tick_dt() -> f64 {
    1.0 / 60.0
}
const fn default_max_ticks_per_frame() -> u32 {
    10
}
const fn default_settle_tolerance() -> f32 {
    1e-3
}

// ---------------------------------------------------------------------------
// SolverConfig
// ---------------------------------------------------------------------------

/// Tunables for the CCD solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Largest rotation a joint may take in a single pass, radians
    /// (default: 0.5).
    #[serde(default = "default_max_step_angle")]
    pub max_step_angle: f32,

    /// Step scale applied to the joints nearest the tooltip (default: 0.5).
    #[serde(default = "default_near_tip_scale")]
    pub near_tip_scale: f32,

    /// Distance below which the tooltip counts as on target, and below
    /// which a pivot-to-point ray is considered degenerate (default: 1e-4).
    #[serde(default = "default_epsilon")]
    pub epsilon: f32,

    /// Corrections smaller than this angle are not applied (default: 1e-5).
    #[serde(default = "default_min_rotation")]
    pub min_rotation: f32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_step_angle: default_max_step_angle(),
            near_tip_scale: default_near_tip_scale(),
            epsilon: default_epsilon(),
            min_rotation: default_min_rotation(),
        }
    }
}

impl SolverConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_step_angle <= 0.0 {
            return Err(ConfigError::InvalidMaxStepAngle(self.max_step_angle));
        }
        if self.near_tip_scale <= 0.0 || self.near_tip_scale > 1.0 {
            return Err(ConfigError::NearTipScaleOutOfRange(self.near_tip_scale));
        }
        if self.epsilon <= 0.0 {
            return Err(ConfigError::InvalidEpsilon(self.epsilon));
        }
        if self.min_rotation < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "min_rotation".into(),
                message: format!("must be >= 0, got {}", self.min_rotation),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Session-level configuration: tick scheduling plus solver tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Fixed timestep in seconds (default: 1/60).
    #[serde(default = "default_tick_dt")]
    pub tick_dt: f64,

    /// Tick budget per `accumulate` call (default: 10). Guards against a
    /// long stall producing an unbounded burst of catch-up steps.
    #[serde(default = "default_max_ticks_per_frame")]
    pub max_ticks_per_frame: u32,

    /// Tooltip-to-target distance at which a session counts as settled
    /// (default: 1e-3).
    #[serde(default = "default_settle_tolerance")]
    pub settle_tolerance: f32,

    #[serde(default)]
    pub solver: SolverConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_dt: default_tick_dt(),
            max_ticks_per_frame: default_max_ticks_per_frame(),
            settle_tolerance: default_settle_tolerance(),
            solver: SolverConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Load a session configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_dt <= 0.0 {
            return Err(ConfigError::InvalidTickDt(self.tick_dt));
        }
        if self.max_ticks_per_frame == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_ticks_per_frame".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.settle_tolerance <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "settle_tolerance".into(),
                message: format!("must be positive, got {}", self.settle_tolerance),
            });
        }
        self.solver.validate()
    }

    /// Tick rate in Hz.
    pub fn tick_hz(&self) -> f64 {
        1.0 / self.tick_dt
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
