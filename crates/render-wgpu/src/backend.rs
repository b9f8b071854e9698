use crate::fence::WgpuFence;
use crate::geometry::GeometryTable;
use crate::pipelines::{BindLayouts, DEPTH_FORMAT, PipelineSet};
use crate::slot::WgpuSlot;
use crate::texture::GpuTexture;
use rubix_assets::TextureAtlas;
use rubix_render::{FrameBackend, FrameError, FramePlan, FrameResource, SlotLayout, UploadBuffer};
use rubix_scene::CubeScene;
use std::sync::Arc;

/// Device-level options decided by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendOptions {
    /// Whether the device was created with `POLYGON_MODE_LINE`.
    pub line_fill: bool,
}

/// wgpu implementation of [`FrameBackend`].
///
/// Each ring slot gets its own uniform buffers and bind groups; the command
/// encoder is created per frame and consumed by `submit`, which is the wgpu
/// equivalent of resetting a per-slot allocator once its fence has passed.
pub struct WgpuBackend {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    fence: WgpuFence,
    layouts: BindLayouts,
    pipelines: PipelineSet,
    geometries: GeometryTable,
    textures: Vec<GpuTexture>,
    depth_view: wgpu::TextureView,
    uniform_alignment: usize,
}

impl WgpuBackend {
    /// Build the backend and configure `surface`. Scene geometry and the atlas
    /// are uploaded once here; only constants change per frame.
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
        scene: &CubeScene,
        atlas: &TextureAtlas,
        options: BackendOptions,
    ) -> Self {
        surface.configure(&device, &config);
        let layouts = BindLayouts::new(&device);
        let pipelines = PipelineSet::new(&device, &layouts, config.format, options.line_fill);
        let geometries = GeometryTable::upload_all(&device, scene.geometries.iter());
        let textures = vec![GpuTexture::upload(&device, &queue, &layouts.texture, atlas)];
        let depth_view = create_depth_view(&device, config.width, config.height);
        let uniform_alignment = device.limits().min_uniform_buffer_offset_alignment as usize;
        let fence = WgpuFence::new(Arc::clone(&device), Arc::clone(&queue));
        tracing::info!(
            "wgpu backend ready: {}x{} {:?}, uniform alignment {uniform_alignment}",
            config.width,
            config.height,
            config.format
        );
        Self {
            device,
            queue,
            surface,
            config,
            fence,
            layouts,
            pipelines,
            geometries,
            textures,
            depth_view,
            uniform_alignment,
        }
    }

    /// Reconfigure the surface and depth buffer. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_view = create_depth_view(&self.device, width, height);
        tracing::debug!("surface resized to {width}x{height}");
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn bind_layouts(&self) -> &BindLayouts {
        &self.layouts
    }

    fn write_range<T: bytemuck::Pod>(
        &self,
        target: &wgpu::Buffer,
        staging: &mut UploadBuffer<T>,
    ) {
        if let Some(range) = staging.take_dirty_range() {
            self.queue
                .write_buffer(target, range.start as u64, &staging.bytes()[range]);
        }
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

impl FrameBackend for WgpuBackend {
    type Fence = WgpuFence;
    type Slot = WgpuSlot;

    fn uniform_alignment(&self) -> usize {
        self.uniform_alignment
    }

    fn create_slot(
        &mut self,
        index: usize,
        layout: &SlotLayout,
    ) -> Result<WgpuSlot, FrameError> {
        Ok(WgpuSlot::new(&self.device, &self.layouts, index, layout))
    }

    fn fence_mut(&mut self) -> &mut WgpuFence {
        &mut self.fence
    }

    fn upload(
        &mut self,
        _slot: usize,
        resource: &mut FrameResource<WgpuSlot>,
    ) -> Result<(), FrameError> {
        self.write_range(&resource.gpu.objects, &mut resource.objects);
        self.write_range(&resource.gpu.materials, &mut resource.materials);
        self.write_range(&resource.gpu.pass, &mut resource.pass);
        Ok(())
    }

    fn submit(
        &mut self,
        slot: usize,
        resource: &mut FrameResource<WgpuSlot>,
        plan: &FramePlan,
    ) -> Result<(), FrameError> {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => Some(frame),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                tracing::warn!("surface lost or outdated, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                None
            }
            Err(wgpu::SurfaceError::Timeout) => {
                tracing::warn!("surface acquire timed out, skipping draw");
                None
            }
            Err(e) => return Err(FrameError::Surface(e.to_string())),
        };

        // The queue still gets a submission without a target, so the fence
        // signalled after this call has work to retire behind.
        if let Some(frame) = &frame {
            let view = frame.texture.create_view(&Default::default());
            let gpu = &resource.gpu;
            let [r, g, b, a] = plan.clear_color.map(f64::from);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            let (width, height) = (self.config.width, self.config.height);
            pass.set_viewport(0.0, 0.0, width as f32, height as f32, 0.0, 1.0);
            pass.set_scissor_rect(0, 0, width, height);
            pass.set_pipeline(self.pipelines.get(plan.pipeline));
            pass.set_bind_group(0, &gpu.pass_bind_group, &[]);

            for draw in &plan.draws {
                let Some(geometry) = self.geometries.get(draw.geometry) else {
                    tracing::warn!("draw for item {} has no geometry", draw.item);
                    continue;
                };
                let Some(texture) = self.textures.get(draw.texture as usize) else {
                    tracing::warn!("draw for item {} has no texture {}", draw.item, draw.texture);
                    continue;
                };
                pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
                pass.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
                pass.set_bind_group(1, &gpu.object_bind_group, &[draw.object_offset]);
                pass.set_bind_group(2, &gpu.material_bind_group, &[draw.material_offset]);
                pass.set_bind_group(3, &texture.bind_group, &[]);
                pass.draw_indexed(
                    draw.start_index..draw.start_index + draw.index_count,
                    draw.base_vertex,
                    0..1,
                );
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        if let Some(frame) = frame {
            frame.present();
        }
        tracing::trace!("submitted slot {slot} ({} draws)", plan.draws.len());
        Ok(())
    }
}
