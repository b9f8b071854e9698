use crate::pipeline::PipelineVariant;
use glam::UVec2;
use rubix_common::AppState;
use rubix_scene::{CubeScene, GeometryKey};

/// One indexed draw, with the dynamic offsets that select its constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub item: usize,
    pub geometry: GeometryKey,
    pub index_count: u32,
    pub start_index: u32,
    pub base_vertex: i32,
    pub object_offset: u32,
    pub material_offset: u32,
    pub texture: u32,
}

/// Everything a backend needs to record one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub pipeline: PipelineVariant,
    pub clear_color: [f32; 4],
    pub viewport: UVec2,
    pub draws: Vec<DrawCall>,
}

/// Byte strides of the current slot's object and material buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantStrides {
    pub object: usize,
    pub material: usize,
}

/// Plan the frame: pick the pipeline from the latched modes and emit one draw
/// per item in buffer order.
pub fn plan_frame(
    scene: &CubeScene,
    intent: &AppState,
    viewport: UVec2,
    clear_color: [f32; 4],
    strides: ConstantStrides,
) -> FramePlan {
    let pipeline = PipelineVariant::select(intent.fill_mode(), intent.cull_mode());
    let draws = scene
        .items
        .iter()
        .filter_map(|item| {
            let Some(material) = scene.materials.get(item.material) else {
                tracing::warn!("item {} has no material, skipped", item.cb_index());
                return None;
            };
            Some(DrawCall {
                item: item.cb_index(),
                geometry: item.geometry,
                index_count: item.draw.index_count,
                start_index: item.draw.start_index,
                base_vertex: item.draw.base_vertex,
                object_offset: (item.cb_index() * strides.object) as u32,
                material_offset: (material.cb_index * strides.material) as u32,
                texture: material.diffuse_texture,
            })
        })
        .collect();
    FramePlan {
        pipeline,
        clear_color,
        viewport,
        draws,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rubix_common::{CUBE_COUNT, CullMode, FillMode};

    const STRIDES: ConstantStrides = ConstantStrides {
        object: 256,
        material: 256,
    };

    #[test]
    fn one_draw_per_item_in_buffer_order() {
        let scene = CubeScene::default();
        let plan = plan_frame(
            &scene,
            &AppState::new(),
            UVec2::new(640, 480),
            [0.0; 4],
            STRIDES,
        );
        assert_eq!(plan.draws.len(), CUBE_COUNT);
        for (i, draw) in plan.draws.iter().enumerate() {
            assert_eq!(draw.item, i);
            assert_eq!(draw.object_offset, (i * 256) as u32);
            assert_eq!(draw.material_offset, 0);
            assert_eq!(draw.index_count, 36);
        }
        assert_eq!(plan.pipeline, PipelineVariant::Opaque);
    }

    #[test]
    fn pipeline_follows_intent() {
        let scene = CubeScene::default();
        let mut intent = AppState::new();
        intent.set_fill_mode(FillMode::Wireframe);
        let plan = plan_frame(&scene, &intent, UVec2::ONE, [0.0; 4], STRIDES);
        assert_eq!(plan.pipeline, PipelineVariant::Wireframe);
        intent.set_cull_mode(CullMode::Back);
        let plan = plan_frame(&scene, &intent, UVec2::ONE, [0.0; 4], STRIDES);
        assert_eq!(plan.pipeline, PipelineVariant::BackCull);
    }
}
