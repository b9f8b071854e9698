//! Shared types for the rubix renderer.
//!
//! Everything here is plain data. The intent state is written by input
//! handling and read (and partially cleared) by the scene update stage; it never
//! owns GPU resources.

pub mod config;
pub mod intent;
pub mod types;

pub use config::{AppConfig, ConfigError};
pub use intent::AppState;
pub use types::{Axis, CameraPreset, CullMode, Face, FillMode, FrameInput};

/// Depth of the frame resource ring. Every dirty mutation must reach this many
/// slots before it is considered converged.
pub const FRAME_RESOURCE_COUNT: usize = 3;

/// Number of sub-cubes in the 3x3x3 grid.
pub const CUBE_COUNT: usize = 27;
