use crate::arena::{Arena, GeometryKey, Material, MaterialKey, MeshGeometry, SubmeshArgs};
use crate::camera::OrbitCamera;
use crate::item::RenderItems;
use crate::lights::LightRig;
use crate::mesh::build_box;
use glam::{Vec3, Vec4};
use rubix_common::config::CameraConfig;

pub const BOX_GEOMETRY: &str = "boxGeo";
pub const BOX_SUBMESH: &str = "box";
pub const CUBE_MATERIAL: &str = "rubixCube";

/// Everything the frame loop draws: resources, the item table, camera and
/// lights.
#[derive(Debug, Clone)]
pub struct CubeScene {
    pub geometries: Arena<GeometryKey, MeshGeometry>,
    pub materials: Arena<MaterialKey, Material>,
    pub items: RenderItems,
    pub camera: OrbitCamera,
    pub lights: LightRig,
    box_geometry: GeometryKey,
    cube_material: MaterialKey,
    box_draw: SubmeshArgs,
}

impl CubeScene {
    pub fn new(camera: &CameraConfig) -> Self {
        let mut geometries = Arena::new();
        let geometry = MeshGeometry::single(BOX_GEOMETRY, BOX_SUBMESH, build_box(1.0, 1.0, 1.0));
        let box_draw = SubmeshArgs {
            index_count: geometry.mesh.index_count(),
            start_index: 0,
            base_vertex: 0,
        };
        let box_geometry = geometries.insert(BOX_GEOMETRY, geometry);

        let mut materials = Arena::new();
        let mut material = Material::new(CUBE_MATERIAL, 0);
        material.diffuse_texture = 0;
        material.diffuse_albedo = Vec4::ONE;
        material.fresnel_r0 = Vec3::splat(0.05);
        material.roughness = 0.2;
        let cube_material = materials.insert(CUBE_MATERIAL, material);

        let items = RenderItems::build_cube_grid(box_geometry, cube_material, box_draw);
        tracing::debug!("built cube scene with {} items", items.len());

        Self {
            geometries,
            materials,
            items,
            camera: OrbitCamera::new(camera),
            lights: LightRig::default(),
            box_geometry,
            cube_material,
            box_draw,
        }
    }

    /// Discard all item transforms and rebuild the grid. Every item comes back
    /// dirty for every slot.
    pub fn rebuild_items(&mut self) {
        self.items =
            RenderItems::build_cube_grid(self.box_geometry, self.cube_material, self.box_draw);
    }

    /// Number of object constant slots each frame resource must hold.
    pub fn object_capacity(&self) -> usize {
        self.items.len()
    }

    /// Number of material constant slots each frame resource must hold.
    pub fn material_capacity(&self) -> usize {
        self.materials
            .iter()
            .map(|(_, m)| m.cb_index + 1)
            .max()
            .unwrap_or(0)
    }
}

impl Default for CubeScene {
    fn default() -> Self {
        Self::new(&CameraConfig::default())
    }
}
