use crate::arena::{GeometryKey, MaterialKey, SubmeshArgs};
use crate::dirty::DirtyCounter;
use glam::{Mat4, Vec3};
use rubix_common::CUBE_COUNT;

/// Grid coordinates of each axis, in build order.
pub const GRID_STEPS: [f32; 3] = [-1.0, 0.0, 1.0];

/// One drawable sub-cube.
///
/// `base` is the resting transform: the grid placement with face turns
/// applied. `world` is what gets drawn, the whole-cube spin applied to `base`.
/// The spin is never multiplied into `world` incrementally.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    base: Mat4,
    world: Mat4,
    pub tex_transform: Mat4,
    pub dirty: DirtyCounter,
    cb_index: usize,
    pub geometry: GeometryKey,
    pub material: MaterialKey,
    pub draw: SubmeshArgs,
}

impl RenderItem {
    pub fn new(
        cb_index: usize,
        world: Mat4,
        geometry: GeometryKey,
        material: MaterialKey,
        draw: SubmeshArgs,
    ) -> Self {
        Self {
            base: world,
            world,
            tex_transform: Mat4::IDENTITY,
            dirty: DirtyCounter::new(),
            cb_index,
            geometry,
            material,
            draw,
        }
    }

    pub fn world(&self) -> Mat4 {
        self.world
    }

    /// Fixed slot in the per-frame object constant buffer.
    pub fn cb_index(&self) -> usize {
        self.cb_index
    }

    pub fn base(&self) -> Mat4 {
        self.base
    }

    /// Place the item at `spin` applied to its resting transform.
    pub fn pose(&mut self, spin: Mat4) {
        self.world = spin * self.base;
        self.dirty.mark();
    }

    /// Rotate the resting transform about the origin, then re-pose under
    /// `spin`.
    pub fn turn(&mut self, rotation: Mat4, spin: Mat4) {
        self.base = rotation * self.base;
        self.pose(spin);
    }

    /// Adopt the current world transform as the resting transform.
    pub fn settle(&mut self) {
        self.base = self.world;
    }

    pub fn translation(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }
}

/// The 27 sub-cubes, stored in constant-buffer order.
///
/// The position in the table always equals the item's buffer index, so lookups
/// by index are direct.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderItems {
    items: Vec<RenderItem>,
}

impl RenderItems {
    /// Lay out the 3x3x3 grid, x outermost and z innermost, so the item at
    /// grid position `(x, y, z)` has index `(x + 1) * 9 + (y + 1) * 3 + (z + 1)`.
    pub fn build_cube_grid(
        geometry: GeometryKey,
        material: MaterialKey,
        draw: SubmeshArgs,
    ) -> Self {
        let mut items = Vec::with_capacity(CUBE_COUNT);
        for x in GRID_STEPS {
            for y in GRID_STEPS {
                for z in GRID_STEPS {
                    let world = Mat4::from_translation(Vec3::new(x, y, z));
                    items.push(RenderItem::new(items.len(), world, geometry, material, draw));
                }
            }
        }
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RenderItem> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut RenderItem> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenderItem> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, RenderItem> {
        self.items.iter_mut()
    }

    /// Whether any item still needs copying into some slot.
    pub fn any_dirty(&self) -> bool {
        self.items.iter().any(|i| i.dirty.is_dirty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaKey;
    use rubix_common::FRAME_RESOURCE_COUNT;

    fn grid() -> RenderItems {
        RenderItems::build_cube_grid(
            GeometryKey::from_index(0),
            MaterialKey::from_index(0),
            SubmeshArgs {
                index_count: 36,
                start_index: 0,
                base_vertex: 0,
            },
        )
    }

    #[test]
    fn grid_has_27_items_indexed_by_position() {
        let items = grid();
        assert_eq!(items.len(), CUBE_COUNT);
        for (i, item) in items.iter().enumerate() {
            assert_eq!(item.cb_index(), i);
            let t = item.translation() + Vec3::ONE;
            let expected = t.x as usize * 9 + t.y as usize * 3 + t.z as usize;
            assert_eq!(expected, i);
        }
    }

    #[test]
    fn fresh_items_are_dirty_for_every_slot() {
        let items = grid();
        assert!(items.iter().all(|i| i.dirty.remaining() == FRAME_RESOURCE_COUNT));
    }

    #[test]
    fn turn_premultiplies_and_marks_dirty() {
        let mut items = grid();
        let item = items.get_mut(26).unwrap();
        item.dirty = DirtyCounter::clean();
        item.turn(Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2), Mat4::IDENTITY);
        assert_eq!(item.dirty.remaining(), FRAME_RESOURCE_COUNT);
        // (1, 1, 1) rotated a quarter turn about +Y.
        let t = item.translation();
        assert!((t - Vec3::new(1.0, 1.0, -1.0)).length() < 1e-5, "{t}");
        assert_eq!(item.base(), item.world());
    }

    #[test]
    fn pose_does_not_touch_the_resting_transform() {
        let mut items = grid();
        let item = items.get_mut(26).unwrap();
        let base = item.base();
        for _ in 0..10 {
            item.pose(Mat4::from_rotation_x(0.7));
        }
        assert_eq!(item.base(), base);
        assert!(item.world().abs_diff_eq(Mat4::from_rotation_x(0.7) * base, 1e-6));

        item.settle();
        assert_eq!(item.base(), item.world());
    }
}
