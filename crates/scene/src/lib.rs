//! Cube scene: the authoritative CPU-side state the frame loop draws.
//!
//! # Invariants
//! - Item `i` always owns object constant slot `i`; slots are assigned once at
//!   build time and never move.
//! - Every mutation of an item or material marks it dirty for the full ring
//!   depth, so each frame slot receives its own copy.
//! - Face index sets are fixed; a face turn always moves the same nine slots.

pub mod arena;
pub mod camera;
pub mod cube;
pub mod dirty;
pub mod faces;
pub mod item;
pub mod lights;
pub mod mesh;
pub mod update;

pub use arena::{Arena, ArenaKey, GeometryKey, Material, MaterialKey, MeshGeometry, SubmeshArgs};
pub use camera::OrbitCamera;
pub use cube::CubeScene;
pub use dirty::DirtyCounter;
pub use faces::FaceSets;
pub use item::{RenderItem, RenderItems};
pub use lights::{Light, LightRig};
pub use mesh::{MeshData, Vertex};
pub use update::{SceneUpdate, TickReport};
