use rubix_scene::{ArenaKey, GeometryKey, MeshGeometry};
use wgpu::util::DeviceExt;

/// Vertex and index buffers for one scene geometry.
pub struct GpuGeometry {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuGeometry {
    pub fn upload(device: &wgpu::Device, geometry: &MeshGeometry) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{}_vertex_buffer", geometry.name)),
            contents: bytemuck::cast_slice(&geometry.mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        // Index buffer sizes must be a multiple of 4 bytes.
        let mut indices = geometry.mesh.indices.clone();
        if indices.len() % 2 == 1 {
            indices.push(0);
        }
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{}_index_buffer", geometry.name)),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.mesh.index_count(),
        }
    }
}

/// GPU copies of every geometry, indexed like the scene's geometry arena.
pub struct GeometryTable {
    entries: Vec<GpuGeometry>,
}

impl GeometryTable {
    pub fn upload_all<'a>(
        device: &wgpu::Device,
        geometries: impl Iterator<Item = (GeometryKey, &'a MeshGeometry)>,
    ) -> Self {
        let mut entries = Vec::new();
        for (key, geometry) in geometries {
            debug_assert_eq!(key.index(), entries.len());
            entries.push(GpuGeometry::upload(device, geometry));
        }
        Self { entries }
    }

    pub fn get(&self, key: GeometryKey) -> Option<&GpuGeometry> {
        self.entries.get(key.index())
    }
}
