//! wgpu backend for the rubix frame loop.
//!
//! Implements `rubix_render::FrameBackend`: per-slot uniform buffers bound
//! with dynamic offsets, a fence driven by queue completion callbacks, and
//! one prebuilt pipeline per rasterizer variant.
//!
//! # Invariants
//! - Slot buffers are only written through `FrameBackend::upload`, which the
//!   driver calls after the slot's fence has passed.
//! - Geometry and the sticker atlas are uploaded once and never change.

mod backend;
mod fence;
mod geometry;
mod pipelines;
mod shaders;
mod slot;
mod texture;

pub use backend::{BackendOptions, WgpuBackend};
pub use fence::WgpuFence;
pub use pipelines::BindLayouts;
pub use slot::WgpuSlot;
