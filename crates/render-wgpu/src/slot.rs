use crate::pipelines::BindLayouts;
use rubix_render::{MaterialConstants, ObjectConstants, PassConstants, SlotLayout};
use rubix_render::constants::aligned_size;
use std::mem::size_of;
use std::num::NonZeroU64;

/// GPU half of one frame resource: the three constant buffers and the bind
/// groups over them. Object and material groups are bound with a dynamic
/// offset per draw.
pub struct WgpuSlot {
    pub index: usize,
    pub objects: wgpu::Buffer,
    pub materials: wgpu::Buffer,
    pub pass: wgpu::Buffer,
    pub object_bind_group: wgpu::BindGroup,
    pub material_bind_group: wgpu::BindGroup,
    pub pass_bind_group: wgpu::BindGroup,
}

fn uniform_buffer(device: &wgpu::Device, label: &str, size: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: size.max(1) as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn bind_window(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
    record_size: usize,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: NonZeroU64::new(record_size as u64),
            }),
        }],
    })
}

impl WgpuSlot {
    pub fn new(
        device: &wgpu::Device,
        layouts: &BindLayouts,
        index: usize,
        layout: &SlotLayout,
    ) -> Self {
        let align = layout.uniform_alignment;
        let object_bytes = aligned_size(size_of::<ObjectConstants>(), align) * layout.object_count;
        let material_bytes =
            aligned_size(size_of::<MaterialConstants>(), align) * layout.material_count;
        let pass_bytes = aligned_size(size_of::<PassConstants>(), align);

        let objects = uniform_buffer(device, &format!("object_cb_{index}"), object_bytes);
        let materials = uniform_buffer(device, &format!("material_cb_{index}"), material_bytes);
        let pass = uniform_buffer(device, &format!("pass_cb_{index}"), pass_bytes);

        let object_bind_group = bind_window(
            device,
            &format!("object_bind_group_{index}"),
            &layouts.object,
            &objects,
            size_of::<ObjectConstants>(),
        );
        let material_bind_group = bind_window(
            device,
            &format!("material_bind_group_{index}"),
            &layouts.material,
            &materials,
            size_of::<MaterialConstants>(),
        );
        let pass_bind_group = bind_window(
            device,
            &format!("pass_bind_group_{index}"),
            &layouts.pass,
            &pass,
            size_of::<PassConstants>(),
        );

        Self {
            index,
            objects,
            materials,
            pass,
            object_bind_group,
            material_bind_group,
            pass_bind_group,
        }
    }
}
