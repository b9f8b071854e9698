use crate::backend::FrameBackend;
use crate::draw::{ConstantStrides, plan_frame};
use crate::error::FrameError;
use crate::pipeline::PipelineVariant;
use crate::resource::{FrameResource, SlotLayout};
use crate::ring::FrameRing;
use crate::sync::{
    PassInputs, build_pass_constants, sync_material_constants, sync_object_constants,
};
use rubix_common::config::RenderConfig;
use rubix_common::{AppState, FRAME_RESOURCE_COUNT, FrameInput};
use rubix_scene::{CubeScene, SceneUpdate, TickReport};
use std::time::Duration;

/// Frame loop settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverOptions {
    pub fence_timeout: Duration,
    pub clear_color: [f32; 4],
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self::from_config(&RenderConfig::default())
    }
}

impl DriverOptions {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            fence_timeout: Duration::from_millis(config.fence_timeout_ms),
            clear_color: config.clear_color,
        }
    }
}

/// What one call to [`FrameDriver::run_frame`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub frame: u64,
    pub slot: usize,
    pub fence_value: u64,
    pub objects_synced: usize,
    pub materials_synced: usize,
    pub pipeline: PipelineVariant,
    pub draws: usize,
    /// Whether acquiring the slot had to wait on the GPU.
    pub stalled: bool,
    pub tick: TickReport,
}

/// Runs the per-frame sequence against a backend:
/// acquire slot, update scene, sync constants, upload, record, submit, signal.
pub struct FrameDriver<B: FrameBackend> {
    backend: B,
    ring: FrameRing<FrameResource<B::Slot>>,
    update: SceneUpdate,
    options: DriverOptions,
    frames: u64,
}

impl<B: FrameBackend> FrameDriver<B> {
    /// Build the ring for `scene` with one backend slot per frame resource.
    pub fn new(
        mut backend: B,
        scene: &CubeScene,
        update: SceneUpdate,
        options: DriverOptions,
    ) -> Result<Self, FrameError> {
        let layout = SlotLayout {
            object_count: scene.object_capacity(),
            material_count: scene.material_capacity(),
            uniform_alignment: backend.uniform_alignment(),
        };
        let ring = FrameRing::from_fn(FRAME_RESOURCE_COUNT, options.fence_timeout, |i| {
            Ok(FrameResource::new(&layout, backend.create_slot(i, &layout)?))
        })?;
        tracing::info!(
            "frame ring ready: {} slots, {} objects, {} materials, {}-byte alignment",
            ring.depth(),
            layout.object_count,
            layout.material_count,
            layout.uniform_alignment
        );
        Ok(Self {
            backend,
            ring,
            update,
            options,
            frames: 0,
        })
    }

    /// Produce one frame. Any error is fatal to the render loop.
    pub fn run_frame(
        &mut self,
        scene: &mut CubeScene,
        intent: &mut AppState,
        input: &FrameInput,
    ) -> Result<FrameStats, FrameError> {
        let stalls_before = self.ring.stalls();
        let slot = self.ring.acquire(self.backend.fence_mut())?;
        let stalled = self.ring.stalls() > stalls_before;

        let tick = self.update.tick(scene, intent, input);

        let resource = self.ring.current_mut();
        let objects_synced = sync_object_constants(&mut scene.items, &mut resource.objects)?;
        let materials_synced =
            sync_material_constants(&mut scene.materials, &mut resource.materials)?;
        let pass = build_pass_constants(&PassInputs::gather(scene, input));
        resource.pass.copy_data(0, &pass)?;
        self.backend.upload(slot, resource)?;

        let strides = ConstantStrides {
            object: resource.objects.stride(),
            material: resource.materials.stride(),
        };
        let plan = plan_frame(
            scene,
            intent,
            input.client_size,
            self.options.clear_color,
            strides,
        );
        self.backend.submit(slot, resource, &plan)?;
        let fence_value = self.ring.signal(self.backend.fence_mut())?;

        self.frames += 1;
        let stats = FrameStats {
            frame: self.frames,
            slot,
            fence_value,
            objects_synced,
            materials_synced,
            pipeline: plan.pipeline,
            draws: plan.draws.len(),
            stalled,
            tick,
        };
        tracing::trace!(?stats, "frame submitted");
        Ok(stats)
    }

    /// Wait for every submitted frame to retire.
    pub fn flush(&mut self) -> Result<(), FrameError> {
        self.ring.flush(self.backend.fence_mut())?;
        tracing::debug!("flushed through fence {}", self.ring.fence_counter());
        Ok(())
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn ring(&self) -> &FrameRing<FrameResource<B::Slot>> {
        &self.ring
    }

    pub fn update(&self) -> &SceneUpdate {
        &self.update
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
