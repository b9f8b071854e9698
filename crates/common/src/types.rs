use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rasterizer fill mode requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillMode {
    #[default]
    Solid,
    Wireframe,
}

/// Rasterizer cull mode requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CullMode {
    #[default]
    None,
    Front,
    Back,
}

/// Where the camera eye comes from this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraPreset {
    /// Spherical orbit around the origin, driven by mouse drags.
    #[default]
    Free,
    Front,
    Top,
    Right,
    /// One-shot: restore the starting orbit, then fall back to `Free`.
    Origin,
    /// Eye translated by the arrow keys, still aimed at the origin.
    Pan,
}

/// A principal axis, used for the whole-cube spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

/// One face of the cube that can be turned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    Front,
    Left,
    Right,
    Back,
    Top,
    Bottom,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Left,
        Face::Right,
        Face::Back,
        Face::Top,
        Face::Bottom,
    ];

    /// Axis the face turns about.
    pub fn axis(self) -> Axis {
        match self {
            Face::Front | Face::Back => Axis::Z,
            Face::Left | Face::Right => Axis::X,
            Face::Top | Face::Bottom => Axis::Y,
        }
    }

    /// Dense index, usable for per-face bookkeeping arrays.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Error returned when a mode name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseModeError {
    kind: &'static str,
    value: String,
}

impl ParseModeError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl FromStr for FillMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "solid" | "s" => Ok(FillMode::Solid),
            "wireframe" | "w" => Ok(FillMode::Wireframe),
            _ => Err(ParseModeError::new("fill mode", s)),
        }
    }
}

impl FromStr for CullMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "n" => Ok(CullMode::None),
            "front" | "f" => Ok(CullMode::Front),
            "back" | "b" => Ok(CullMode::Back),
            _ => Err(ParseModeError::new("cull mode", s)),
        }
    }
}

impl FromStr for Axis {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x" => Ok(Axis::X),
            "y" => Ok(Axis::Y),
            "z" => Ok(Axis::Z),
            _ => Err(ParseModeError::new("axis", s)),
        }
    }
}

impl FromStr for Face {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "front" | "f" => Ok(Face::Front),
            "left" | "l" => Ok(Face::Left),
            "right" | "r" => Ok(Face::Right),
            "back" | "b" => Ok(Face::Back),
            "top" | "t" => Ok(Face::Top),
            "bottom" | "d" => Ok(Face::Bottom),
            _ => Err(ParseModeError::new("face", s)),
        }
    }
}

impl fmt::Display for FillMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FillMode::Solid => "solid",
            FillMode::Wireframe => "wireframe",
        })
    }
}

impl fmt::Display for CullMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CullMode::None => "none",
            CullMode::Front => "front",
            CullMode::Back => "back",
        })
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        })
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Face::Front => "front",
            Face::Left => "left",
            Face::Right => "right",
            Face::Back => "back",
            Face::Top => "top",
            Face::Bottom => "bottom",
        })
    }
}

impl fmt::Display for CameraPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CameraPreset::Free => "free",
            CameraPreset::Front => "front",
            CameraPreset::Top => "top",
            CameraPreset::Right => "right",
            CameraPreset::Origin => "origin",
            CameraPreset::Pan => "pan",
        })
    }
}

/// Per-frame values handed over by the platform layer.
///
/// Drags are raw pixel deltas accumulated since the previous frame. `pan` is
/// the arrow-key direction on the x/z plane, each component in -1..=1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    pub delta_seconds: f32,
    pub total_seconds: f32,
    pub client_size: UVec2,
    pub orbit_drag: Vec2,
    pub zoom_drag: Vec2,
    pub pan: Vec2,
}

impl FrameInput {
    /// Input for a frame with no user interaction.
    pub fn idle(delta_seconds: f32, total_seconds: f32, client_size: UVec2) -> Self {
        Self {
            delta_seconds,
            total_seconds,
            client_size,
            orbit_drag: Vec2::ZERO,
            zoom_drag: Vec2::ZERO,
            pan: Vec2::ZERO,
        }
    }

    /// Width over height, guarding against a minimised window.
    pub fn aspect_ratio(&self) -> f32 {
        self.client_size.x.max(1) as f32 / self.client_size.y.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_axes() {
        assert_eq!(Face::Front.axis(), Axis::Z);
        assert_eq!(Face::Back.axis(), Axis::Z);
        assert_eq!(Face::Left.axis(), Axis::X);
        assert_eq!(Face::Right.axis(), Axis::X);
        assert_eq!(Face::Top.axis(), Axis::Y);
        assert_eq!(Face::Bottom.axis(), Axis::Y);
    }

    #[test]
    fn face_indices_are_dense() {
        for (i, face) in Face::ALL.iter().enumerate() {
            assert_eq!(face.index(), i);
        }
    }

    #[test]
    fn parse_modes() {
        assert_eq!("wireframe".parse::<FillMode>(), Ok(FillMode::Wireframe));
        assert_eq!("B".parse::<CullMode>(), Ok(CullMode::Back));
        assert_eq!("y".parse::<Axis>(), Ok(Axis::Y));
        assert_eq!("d".parse::<Face>(), Ok(Face::Bottom));
        assert!("sideways".parse::<Face>().is_err());
    }

    #[test]
    fn aspect_ratio_survives_zero_height() {
        let input = FrameInput::idle(0.016, 1.0, UVec2::new(800, 0));
        assert_eq!(input.aspect_ratio(), 800.0);
    }
}
