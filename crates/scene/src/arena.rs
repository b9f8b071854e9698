//! Name-addressed storage for geometries and materials.
//!
//! Render items hold typed keys into these arenas rather than references, so
//! the item table never borrows from the resources it draws with.

use crate::dirty::DirtyCounter;
use crate::mesh::MeshData;
use glam::{Mat4, Vec3, Vec4};
use std::collections::BTreeMap;
use std::marker::PhantomData;

/// A typed index into an [`Arena`].
pub trait ArenaKey: Copy {
    fn from_index(index: usize) -> Self;
    fn index(self) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryKey(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialKey(u32);

impl ArenaKey for GeometryKey {
    fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

impl ArenaKey for MaterialKey {
    fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Insertion-ordered storage with a name lookup.
#[derive(Debug, Clone)]
pub struct Arena<K, T> {
    entries: Vec<T>,
    names: BTreeMap<String, usize>,
    _key: PhantomData<K>,
}

impl<K: ArenaKey, T> Default for Arena<K, T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            names: BTreeMap::new(),
            _key: PhantomData,
        }
    }
}

impl<K: ArenaKey, T> Arena<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under `name`. Re-inserting a name replaces the entry in place
    /// and keeps its key.
    pub fn insert(&mut self, name: impl Into<String>, value: T) -> K {
        let name = name.into();
        if let Some(&index) = self.names.get(&name) {
            self.entries[index] = value;
            return K::from_index(index);
        }
        let index = self.entries.len();
        self.entries.push(value);
        self.names.insert(name, index);
        K::from_index(index)
    }

    pub fn get(&self, key: K) -> Option<&T> {
        self.entries.get(key.index())
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.entries.get_mut(key.index())
    }

    pub fn key_of(&self, name: &str) -> Option<K> {
        self.names.get(name).map(|&i| K::from_index(i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, v)| (K::from_index(i), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (K, &mut T)> {
        self.entries
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (K::from_index(i), v))
    }
}

/// Index range of one drawable part of a geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmeshArgs {
    pub index_count: u32,
    pub start_index: u32,
    pub base_vertex: i32,
}

/// A mesh plus its named submeshes.
#[derive(Debug, Clone)]
pub struct MeshGeometry {
    pub name: String,
    pub mesh: MeshData,
    pub submeshes: BTreeMap<String, SubmeshArgs>,
}

impl MeshGeometry {
    /// Geometry with a single submesh spanning the whole mesh.
    pub fn single(name: impl Into<String>, submesh: impl Into<String>, mesh: MeshData) -> Self {
        let args = SubmeshArgs {
            index_count: mesh.index_count(),
            start_index: 0,
            base_vertex: 0,
        };
        Self {
            name: name.into(),
            mesh,
            submeshes: BTreeMap::from([(submesh.into(), args)]),
        }
    }

    pub fn submesh(&self, name: &str) -> Option<SubmeshArgs> {
        self.submeshes.get(name).copied()
    }
}

/// Surface parameters for the lighting model.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// Slot in the per-frame material constant buffer.
    pub cb_index: usize,
    /// Slot in the texture table.
    pub diffuse_texture: u32,
    pub diffuse_albedo: Vec4,
    pub fresnel_r0: Vec3,
    pub roughness: f32,
    pub transform: Mat4,
    pub dirty: DirtyCounter,
}

impl Material {
    pub fn new(name: impl Into<String>, cb_index: usize) -> Self {
        Self {
            name: name.into(),
            cb_index,
            diffuse_texture: 0,
            diffuse_albedo: Vec4::ONE,
            fresnel_r0: Vec3::splat(0.01),
            roughness: 0.25,
            transform: Mat4::IDENTITY,
            dirty: DirtyCounter::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_box;

    #[test]
    fn insert_and_lookup_by_name() {
        let mut arena: Arena<MaterialKey, Material> = Arena::new();
        let a = arena.insert("a", Material::new("a", 0));
        let b = arena.insert("b", Material::new("b", 1));
        assert_ne!(a, b);
        assert_eq!(arena.key_of("b"), Some(b));
        assert_eq!(arena.get(a).map(|m| m.cb_index), Some(0));
        assert_eq!(arena.key_of("missing"), None);
    }

    #[test]
    fn reinsert_keeps_key() {
        let mut arena: Arena<MaterialKey, Material> = Arena::new();
        let a = arena.insert("a", Material::new("a", 0));
        let mut replacement = Material::new("a", 0);
        replacement.roughness = 0.9;
        assert_eq!(arena.insert("a", replacement), a);
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.get(a).map(|m| m.roughness), Some(0.9));
    }

    #[test]
    fn single_submesh_spans_mesh() {
        let geo = MeshGeometry::single("boxGeo", "box", build_box(1.0, 1.0, 1.0));
        let args = geo.submesh("box").unwrap();
        assert_eq!(args.index_count, 36);
        assert_eq!(args.start_index, 0);
        assert!(geo.submesh("sphere").is_none());
    }
}
