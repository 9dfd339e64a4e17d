//! Shared rig descriptions for the demo binaries.

/// Three-joint arm, segments stacked along +Z, total reach 2.5 m.
pub const THREE_JOINT_ARM_TOML: &str = r#"
[[node]]
name = "base"

[[node]]
name = "shoulder"
parent = "base"
joint = true

[[node]]
name = "elbow"
parent = "shoulder"
translation = [0.0, 0.0, 1.0]
joint = true

[[node]]
name = "wrist"
parent = "elbow"
translation = [0.0, 0.0, 1.0]
joint = true

[[node]]
name = "tooltip"
parent = "wrist"
translation = [0.0, 0.0, 0.5]
"#;
