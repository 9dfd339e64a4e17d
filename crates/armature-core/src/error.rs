use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid tick_dt: {0} (must be > 0)")]
    InvalidTickDt(f64),

    #[error("Invalid max_step_angle: {0} (must be > 0)")]
    InvalidMaxStepAngle(f32),

    #[error("Invalid epsilon: {0} (must be > 0)")]
    InvalidEpsilon(f32),

    #[error("near_tip_scale must be in (0, 1], got {0}")]
    NearTipScaleOutOfRange(f32),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}
