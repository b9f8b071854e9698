use crate::shaders;
use rubix_common::{CullMode, FillMode};
use rubix_render::{MaterialConstants, ObjectConstants, PassConstants, PipelineVariant};
use rubix_scene::Vertex;
use std::mem::size_of;
use std::num::NonZeroU64;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

fn uniform_entry(size: usize, dynamic: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: dynamic,
            min_binding_size: NonZeroU64::new(size as u64),
        },
        count: None,
    }
}

/// The four bind group layouts shared by every pipeline variant.
pub struct BindLayouts {
    pub pass: wgpu::BindGroupLayout,
    pub object: wgpu::BindGroupLayout,
    pub material: wgpu::BindGroupLayout,
    pub texture: wgpu::BindGroupLayout,
}

impl BindLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let pass = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("pass_bind_group_layout"),
            entries: &[uniform_entry(size_of::<PassConstants>(), false)],
        });
        let object = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_bind_group_layout"),
            entries: &[uniform_entry(size_of::<ObjectConstants>(), true)],
        });
        let material = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bind_group_layout"),
            entries: &[uniform_entry(size_of::<MaterialConstants>(), true)],
        });
        let texture = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        Self {
            pass,
            object,
            material,
            texture,
        }
    }
}

/// One render pipeline per [`PipelineVariant`], built up front.
pub struct PipelineSet {
    pipelines: Vec<wgpu::RenderPipeline>,
}

impl PipelineSet {
    /// `line_fill` says whether the device supports line polygon mode; without
    /// it the wireframe variant falls back to solid fill.
    pub fn new(
        device: &wgpu::Device,
        layouts: &BindLayouts,
        surface_format: wgpu::TextureFormat,
        line_fill: bool,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cube_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::CUBE_SHADER.into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cube_pipeline_layout"),
            bind_group_layouts: &[
                &layouts.pass,
                &layouts.object,
                &layouts.material,
                &layouts.texture,
            ],
            push_constant_ranges: &[],
        });
        if !line_fill {
            tracing::warn!("POLYGON_MODE_LINE unsupported; wireframe renders solid");
        }

        let pipelines = PipelineVariant::ALL
            .iter()
            .map(|&variant| {
                let raster = variant.raster_state();
                let polygon_mode = match raster.fill {
                    FillMode::Wireframe if line_fill => wgpu::PolygonMode::Line,
                    _ => wgpu::PolygonMode::Fill,
                };
                let cull_mode = match raster.cull {
                    CullMode::None => None,
                    CullMode::Front => Some(wgpu::Face::Front),
                    CullMode::Back => Some(wgpu::Face::Back),
                };
                device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some(variant.label()),
                    layout: Some(&layout),
                    vertex: wgpu::VertexState {
                        module: &shader,
                        entry_point: Some("vs_main"),
                        compilation_options: Default::default(),
                        buffers: &[wgpu::VertexBufferLayout {
                            array_stride: size_of::<Vertex>() as u64,
                            step_mode: wgpu::VertexStepMode::Vertex,
                            attributes: &wgpu::vertex_attr_array![
                                0 => Float32x3,
                                1 => Float32x3,
                                2 => Float32x2,
                            ],
                        }],
                    },
                    fragment: Some(wgpu::FragmentState {
                        module: &shader,
                        entry_point: Some("fs_main"),
                        compilation_options: Default::default(),
                        targets: &[Some(wgpu::ColorTargetState {
                            format: surface_format,
                            blend: Some(wgpu::BlendState::REPLACE),
                            write_mask: wgpu::ColorWrites::ALL,
                        })],
                    }),
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        front_face: wgpu::FrontFace::Cw,
                        cull_mode,
                        polygon_mode,
                        ..Default::default()
                    },
                    depth_stencil: Some(wgpu::DepthStencilState {
                        format: DEPTH_FORMAT,
                        depth_write_enabled: true,
                        depth_compare: wgpu::CompareFunction::Less,
                        stencil: Default::default(),
                        bias: Default::default(),
                    }),
                    multisample: Default::default(),
                    multiview: None,
                    cache: None,
                })
            })
            .collect();
        Self { pipelines }
    }

    pub fn get(&self, variant: PipelineVariant) -> &wgpu::RenderPipeline {
        &self.pipelines[variant.index()]
    }
}
