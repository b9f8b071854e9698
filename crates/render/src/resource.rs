use crate::constants::{MaterialConstants, ObjectConstants, PassConstants};
use crate::upload::UploadBuffer;

/// Sizes a frame resource is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotLayout {
    pub object_count: usize,
    pub material_count: usize,
    /// Minimum byte alignment of a dynamic uniform offset.
    pub uniform_alignment: usize,
}

/// Everything one frame in flight owns: staging copies of its three constant
/// buffers plus whatever the backend keeps per slot (command encoder state,
/// GPU buffers, bind groups).
#[derive(Debug)]
pub struct FrameResource<G> {
    pub objects: UploadBuffer<ObjectConstants>,
    pub materials: UploadBuffer<MaterialConstants>,
    pub pass: UploadBuffer<PassConstants>,
    pub gpu: G,
}

impl<G> FrameResource<G> {
    pub fn new(layout: &SlotLayout, gpu: G) -> Self {
        Self {
            objects: UploadBuffer::new(
                "object constants",
                layout.object_count,
                layout.uniform_alignment,
            ),
            materials: UploadBuffer::new(
                "material constants",
                layout.material_count,
                layout.uniform_alignment,
            ),
            pass: UploadBuffer::new("pass constants", 1, layout.uniform_alignment),
            gpu,
        }
    }
}
