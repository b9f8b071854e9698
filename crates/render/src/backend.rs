//! The seam between the frame loop and a graphics API.

use crate::draw::FramePlan;
use crate::error::FrameError;
use crate::fence::{Fence, SimulatedFence};
use crate::pipeline::PipelineVariant;
use crate::resource::{FrameResource, SlotLayout};
use std::fmt::Write as _;
use std::ops::Range;

/// A graphics backend driven by [`crate::FrameDriver`].
///
/// The driver owns the frame ring; the backend owns the GPU objects behind
/// each slot (`Slot`) and the fence the ring gates on. `upload` is only
/// called for a slot after the ring has confirmed the GPU is done with it.
pub trait FrameBackend {
    type Fence: Fence;
    type Slot;

    /// Minimum alignment of a dynamic uniform buffer offset.
    fn uniform_alignment(&self) -> usize;

    fn create_slot(
        &mut self,
        index: usize,
        layout: &SlotLayout,
    ) -> Result<Self::Slot, FrameError>;

    fn fence_mut(&mut self) -> &mut Self::Fence;

    /// Push the slot's staged constant bytes to its GPU buffers.
    fn upload(
        &mut self,
        slot: usize,
        resource: &mut FrameResource<Self::Slot>,
    ) -> Result<(), FrameError>;

    /// Record the plan into the slot's command stream and submit it. The
    /// driver signals the fence immediately afterwards.
    fn submit(
        &mut self,
        slot: usize,
        resource: &mut FrameResource<Self::Slot>,
        plan: &FramePlan,
    ) -> Result<(), FrameError>;
}

/// GPU-side copy of one slot's buffers, as the headless backend sees them.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSlot {
    pub index: usize,
    pub objects: Vec<u8>,
    pub materials: Vec<u8>,
    pub pass: Vec<u8>,
    /// Fence value that retires this slot's latest submission.
    pub in_flight_fence: u64,
}

/// A submission captured by the headless backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedFrame {
    pub slot: usize,
    pub pipeline: PipelineVariant,
    pub draws: usize,
    pub object_offsets: Vec<u32>,
}

/// A write into a slot the simulated GPU had not finished reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hazard {
    pub slot: usize,
    pub in_flight_fence: u64,
    pub completed: u64,
}

/// Backend with no GPU: uploads copy into byte mirrors, submissions are
/// recorded, and the fence is simulated.
///
/// Every upload is checked against the slot's in-flight fence, so a broken
/// gate shows up as a [`Hazard`] instead of silent corruption.
#[derive(Debug)]
pub struct HeadlessBackend {
    fence: SimulatedFence,
    alignment: usize,
    submissions: Vec<SubmittedFrame>,
    hazards: Vec<Hazard>,
    uploaded_bytes: u64,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new(256)
    }
}

impl HeadlessBackend {
    pub fn new(alignment: usize) -> Self {
        Self {
            fence: SimulatedFence::new(),
            alignment,
            submissions: Vec::new(),
            hazards: Vec::new(),
            uploaded_bytes: 0,
        }
    }

    pub fn fence(&self) -> &SimulatedFence {
        &self.fence
    }

    pub fn submissions(&self) -> &[SubmittedFrame] {
        &self.submissions
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn uploaded_bytes(&self) -> u64 {
        self.uploaded_bytes
    }

    /// Human-readable summary of what the backend has seen.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Headless backend (submitted={}, fence signalled={}, completed={}) ===",
            self.submissions.len(),
            self.fence.signalled_value(),
            self.fence.completed_value()
        );
        let _ = writeln!(out, "Uploaded bytes: {}", self.uploaded_bytes);
        let _ = writeln!(out, "GPU waits: {}", self.fence.waits());
        let _ = writeln!(out, "Hazards: {}", self.hazards.len());
        if let Some(last) = self.submissions.last() {
            let _ = writeln!(
                out,
                "Last frame: slot={} pipeline={} draws={}",
                last.slot, last.pipeline, last.draws
            );
        }
        out
    }
}

fn mirror(dst: &mut [u8], src: &[u8], range: Option<Range<usize>>) -> u64 {
    match range {
        Some(range) => {
            dst[range.clone()].copy_from_slice(&src[range.clone()]);
            range.len() as u64
        }
        None => 0,
    }
}

impl FrameBackend for HeadlessBackend {
    type Fence = SimulatedFence;
    type Slot = HeadlessSlot;

    fn uniform_alignment(&self) -> usize {
        self.alignment
    }

    fn create_slot(
        &mut self,
        index: usize,
        layout: &SlotLayout,
    ) -> Result<HeadlessSlot, FrameError> {
        let layout_only: FrameResource<()> = FrameResource::new(layout, ());
        Ok(HeadlessSlot {
            index,
            objects: vec![0; layout_only.objects.byte_size()],
            materials: vec![0; layout_only.materials.byte_size()],
            pass: vec![0; layout_only.pass.byte_size()],
            in_flight_fence: 0,
        })
    }

    fn fence_mut(&mut self) -> &mut SimulatedFence {
        &mut self.fence
    }

    fn upload(
        &mut self,
        slot: usize,
        resource: &mut FrameResource<HeadlessSlot>,
    ) -> Result<(), FrameError> {
        let gpu = &mut resource.gpu;
        let completed = self.fence.completed_value();
        if completed < gpu.in_flight_fence {
            tracing::error!(
                "slot {slot} written while fence {} in flight (completed {completed})",
                gpu.in_flight_fence
            );
            self.hazards.push(Hazard {
                slot,
                in_flight_fence: gpu.in_flight_fence,
                completed,
            });
        }
        let range = resource.objects.take_dirty_range();
        self.uploaded_bytes += mirror(&mut gpu.objects, resource.objects.bytes(), range);
        let range = resource.materials.take_dirty_range();
        self.uploaded_bytes += mirror(&mut gpu.materials, resource.materials.bytes(), range);
        let range = resource.pass.take_dirty_range();
        self.uploaded_bytes += mirror(&mut gpu.pass, resource.pass.bytes(), range);
        Ok(())
    }

    fn submit(
        &mut self,
        slot: usize,
        resource: &mut FrameResource<HeadlessSlot>,
        plan: &FramePlan,
    ) -> Result<(), FrameError> {
        // The ring signals the next fence value right after this returns.
        resource.gpu.in_flight_fence = self.fence.signalled_value() + 1;
        self.submissions.push(SubmittedFrame {
            slot,
            pipeline: plan.pipeline,
            draws: plan.draws.len(),
            object_offsets: plan.draws.iter().map(|d| d.object_offset).collect(),
        });
        tracing::trace!(
            "headless submit slot {} ({} draws, {})",
            resource.gpu.index,
            plan.draws.len(),
            plan.pipeline
        );
        Ok(())
    }
}
