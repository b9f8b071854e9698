//! CPU to frame-slot constant synchronization.

use crate::constants::{LightConstants, MaterialConstants, ObjectConstants, PassConstants};
use crate::error::FrameError;
use crate::upload::UploadBuffer;
use bytemuck::Zeroable;
use glam::{Mat4, UVec2, Vec3, Vec4};
use rubix_common::FrameInput;
use rubix_scene::lights::MAX_LIGHTS;
use rubix_scene::{Arena, CubeScene, Material, MaterialKey, RenderItems};

/// Copy every dirty item into its slot of the current frame's object buffer
/// and consume one dirty count. Returns how many items were copied.
pub fn sync_object_constants(
    items: &mut RenderItems,
    buffer: &mut UploadBuffer<ObjectConstants>,
) -> Result<usize, FrameError> {
    let mut copied = 0;
    for item in items.iter_mut() {
        if !item.dirty.is_dirty() {
            continue;
        }
        buffer.copy_data(item.cb_index(), &ObjectConstants::from_item(item))?;
        item.dirty.consume();
        copied += 1;
    }
    Ok(copied)
}

/// Same as [`sync_object_constants`], for materials.
pub fn sync_material_constants(
    materials: &mut Arena<MaterialKey, Material>,
    buffer: &mut UploadBuffer<MaterialConstants>,
) -> Result<usize, FrameError> {
    let mut copied = 0;
    for (_, material) in materials.iter_mut() {
        if !material.dirty.is_dirty() {
            continue;
        }
        buffer.copy_data(material.cb_index, &MaterialConstants::from_material(material))?;
        material.dirty.consume();
        copied += 1;
    }
    Ok(copied)
}

/// Inputs to the per-pass constants, captured from the scene and frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PassInputs {
    pub view: Mat4,
    pub proj: Mat4,
    pub eye: Vec3,
    pub client_size: UVec2,
    pub near: f32,
    pub far: f32,
    pub total_seconds: f32,
    pub delta_seconds: f32,
    pub ambient: Vec4,
    pub lights: [LightConstants; MAX_LIGHTS],
}

impl PassInputs {
    pub fn gather(scene: &CubeScene, input: &FrameInput) -> Self {
        let camera = &scene.camera;
        let mut lights = [LightConstants::zeroed(); MAX_LIGHTS];
        for (slot, light) in lights.iter_mut().zip(&scene.lights.lights) {
            *slot = LightConstants::from(light);
        }
        Self {
            view: camera.view_matrix(),
            proj: camera.projection_matrix(input.aspect_ratio()),
            eye: camera.eye(),
            client_size: input.client_size,
            near: camera.near,
            far: camera.far,
            total_seconds: input.total_seconds,
            delta_seconds: input.delta_seconds,
            ambient: scene.lights.ambient,
            lights,
        }
    }
}

/// Build the pass record. Pure: identical inputs give identical bytes.
pub fn build_pass_constants(inputs: &PassInputs) -> PassConstants {
    let view_proj = inputs.proj * inputs.view;
    let size = inputs.client_size.as_vec2();
    let inv_size = if size.x > 0.0 && size.y > 0.0 {
        size.recip()
    } else {
        glam::Vec2::ZERO
    };
    PassConstants {
        view: inputs.view.to_cols_array_2d(),
        inv_view: inputs.view.inverse().to_cols_array_2d(),
        proj: inputs.proj.to_cols_array_2d(),
        inv_proj: inputs.proj.inverse().to_cols_array_2d(),
        view_proj: view_proj.to_cols_array_2d(),
        inv_view_proj: view_proj.inverse().to_cols_array_2d(),
        eye_pos: inputs.eye.to_array(),
        _pad0: 0.0,
        render_target_size: size.to_array(),
        inv_render_target_size: inv_size.to_array(),
        near_z: inputs.near,
        far_z: inputs.far,
        total_time: inputs.total_seconds,
        delta_time: inputs.delta_seconds,
        ambient_light: inputs.ambient.to_array(),
        lights: inputs.lights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rubix_common::{CUBE_COUNT, FRAME_RESOURCE_COUNT};

    fn object_buffer() -> UploadBuffer<ObjectConstants> {
        UploadBuffer::new("objects", CUBE_COUNT, 256)
    }

    #[test]
    fn fresh_scene_converges_after_ring_depth_frames() {
        let mut scene = CubeScene::default();
        let mut buffers: Vec<_> = (0..FRAME_RESOURCE_COUNT).map(|_| object_buffer()).collect();
        for buffer in &mut buffers {
            let copied = sync_object_constants(&mut scene.items, buffer).unwrap();
            assert_eq!(copied, CUBE_COUNT);
        }
        assert!(!scene.items.any_dirty());
        let mut extra = object_buffer();
        assert_eq!(sync_object_constants(&mut scene.items, &mut extra).unwrap(), 0);

        for buffer in &buffers {
            for item in scene.items.iter() {
                assert_eq!(
                    buffer.read(item.cb_index()),
                    Some(ObjectConstants::from_item(item))
                );
            }
        }
    }

    #[test]
    fn only_dirty_items_are_copied() {
        let mut scene = CubeScene::default();
        let mut buffer = object_buffer();
        for _ in 0..FRAME_RESOURCE_COUNT {
            sync_object_constants(&mut scene.items, &mut buffer).unwrap();
        }
        scene
            .items
            .get_mut(5)
            .unwrap()
            .pose(Mat4::from_rotation_x(0.3));
        let mut fresh = object_buffer();
        assert_eq!(sync_object_constants(&mut scene.items, &mut fresh).unwrap(), 1);
        assert_eq!(fresh.writes(), 1);
        assert_eq!(
            fresh.read(5),
            Some(ObjectConstants::from_item(scene.items.get(5).unwrap()))
        );
    }

    #[test]
    fn materials_sync_like_objects() {
        let mut scene = CubeScene::default();
        let mut buffer = UploadBuffer::new("materials", 1, 256);
        for _ in 0..FRAME_RESOURCE_COUNT {
            assert_eq!(
                sync_material_constants(&mut scene.materials, &mut buffer).unwrap(),
                1
            );
        }
        assert_eq!(
            sync_material_constants(&mut scene.materials, &mut buffer).unwrap(),
            0
        );
        let written = buffer.read(0).unwrap();
        assert_eq!(written.roughness, 0.2);
        assert_eq!(written.fresnel_r0, [0.05; 3]);
    }

    #[test]
    fn pass_constants_are_deterministic() {
        let scene = CubeScene::default();
        let input = FrameInput::idle(0.016, 3.0, UVec2::new(1280, 720));
        let a = build_pass_constants(&PassInputs::gather(&scene, &input));
        let b = build_pass_constants(&PassInputs::gather(&scene, &input));
        assert_eq!(bytemuck::bytes_of(&a), bytemuck::bytes_of(&b));
        assert_eq!(a.render_target_size, [1280.0, 720.0]);
        assert_eq!(a.near_z, 1.0);
        assert_eq!(a.far_z, 1000.0);
        assert_eq!(a.total_time, 3.0);
        assert_eq!(a.lights[2].position, [0.0, -6.0, 0.0]);
        assert_eq!(a.lights[4], LightConstants::zeroed());
    }

    #[test]
    fn pass_inverse_matrices_invert() {
        let scene = CubeScene::default();
        let input = FrameInput::idle(0.016, 0.0, UVec2::new(800, 600));
        let pass = build_pass_constants(&PassInputs::gather(&scene, &input));
        let vp = Mat4::from_cols_array_2d(&pass.view_proj);
        let inv = Mat4::from_cols_array_2d(&pass.inv_view_proj);
        assert!((vp * inv).abs_diff_eq(Mat4::IDENTITY, 1e-3));
    }

    #[test]
    fn zero_sized_client_does_not_produce_infinities() {
        let scene = CubeScene::default();
        let input = FrameInput::idle(0.016, 0.0, UVec2::ZERO);
        let pass = build_pass_constants(&PassInputs::gather(&scene, &input));
        assert_eq!(pass.inv_render_target_size, [0.0, 0.0]);
    }
}
