//! Frame-synchronized rendering core, independent of any graphics API.
//!
//! # Invariants
//! - A slot's constant buffers are never written while the GPU's completed
//!   fence value is below the value stamped on that slot at its last submit.
//! - Fence values handed out by the ring strictly increase.
//! - Dirty items and materials reach every slot before they count as clean.
//! - The pipeline is chosen once per frame from the latched fill and cull
//!   modes; drawing never changes it mid-pass.
//!
//! Backends plug in through [`FrameBackend`]. [`HeadlessBackend`] runs the
//! whole loop without a GPU and is what the CLI and tests drive.

pub mod backend;
pub mod constants;
pub mod draw;
pub mod driver;
pub mod error;
pub mod fence;
pub mod pipeline;
pub mod resource;
pub mod ring;
pub mod sync;
pub mod upload;

pub use backend::{FrameBackend, Hazard, HeadlessBackend, HeadlessSlot, SubmittedFrame};
pub use constants::{LightConstants, MaterialConstants, ObjectConstants, PassConstants};
pub use draw::{ConstantStrides, DrawCall, FramePlan, plan_frame};
pub use driver::{DriverOptions, FrameDriver, FrameStats};
pub use error::FrameError;
pub use fence::{Fence, SimulatedFence};
pub use pipeline::{PipelineVariant, RasterState};
pub use resource::{FrameResource, SlotLayout};
pub use ring::{FrameRing, FrameSlot};
pub use upload::UploadBuffer;
