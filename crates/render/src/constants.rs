//! Constant buffer records, laid out to match the shader's uniform structs.
//!
//! Matrices are stored column-major, which is what both glam and WGSL use, so
//! no transpose happens on the way to the GPU.

use bytemuck::{Pod, Zeroable};
use rubix_scene::lights::MAX_LIGHTS;
use rubix_scene::{Light, Material, RenderItem};

/// Per-item constants.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ObjectConstants {
    pub world: [[f32; 4]; 4],
    pub tex_transform: [[f32; 4]; 4],
}

impl ObjectConstants {
    pub fn from_item(item: &RenderItem) -> Self {
        Self {
            world: item.world().to_cols_array_2d(),
            tex_transform: item.tex_transform.to_cols_array_2d(),
        }
    }
}

/// Per-material constants.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MaterialConstants {
    pub diffuse_albedo: [f32; 4],
    pub fresnel_r0: [f32; 3],
    pub roughness: f32,
    pub mat_transform: [[f32; 4]; 4],
}

impl MaterialConstants {
    pub fn from_material(material: &Material) -> Self {
        Self {
            diffuse_albedo: material.diffuse_albedo.to_array(),
            fresnel_r0: material.fresnel_r0.to_array(),
            roughness: material.roughness,
            mat_transform: material.transform.to_cols_array_2d(),
        }
    }
}

/// One light as the shader sees it.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightConstants {
    pub strength: [f32; 3],
    pub falloff_start: f32,
    pub direction: [f32; 3],
    pub falloff_end: f32,
    pub position: [f32; 3],
    pub spot_power: f32,
}

impl From<&Light> for LightConstants {
    fn from(light: &Light) -> Self {
        Self {
            strength: light.strength.to_array(),
            falloff_start: light.falloff_start,
            direction: light.direction.to_array(),
            falloff_end: light.falloff_end,
            position: light.position.to_array(),
            spot_power: light.spot_power,
        }
    }
}

/// Per-pass constants, rebuilt every frame.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PassConstants {
    pub view: [[f32; 4]; 4],
    pub inv_view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub inv_proj: [[f32; 4]; 4],
    pub view_proj: [[f32; 4]; 4],
    pub inv_view_proj: [[f32; 4]; 4],
    pub eye_pos: [f32; 3],
    pub _pad0: f32,
    pub render_target_size: [f32; 2],
    pub inv_render_target_size: [f32; 2],
    pub near_z: f32,
    pub far_z: f32,
    pub total_time: f32,
    pub delta_time: f32,
    pub ambient_light: [f32; 4],
    pub lights: [LightConstants; MAX_LIGHTS],
}

/// Round `size` up to a multiple of `alignment`.
pub fn aligned_size(size: usize, alignment: usize) -> usize {
    size.div_ceil(alignment.max(1)) * alignment.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn record_sizes_match_shader_layout() {
        assert_eq!(size_of::<ObjectConstants>(), 128);
        assert_eq!(size_of::<MaterialConstants>(), 96);
        assert_eq!(size_of::<LightConstants>(), 48);
        assert_eq!(size_of::<PassConstants>(), 448 + 48 * MAX_LIGHTS);
    }

    #[test]
    fn aligned_sizes() {
        assert_eq!(aligned_size(128, 256), 256);
        assert_eq!(aligned_size(256, 256), 256);
        assert_eq!(aligned_size(1216, 256), 1280);
        assert_eq!(aligned_size(96, 1), 96);
    }
}
