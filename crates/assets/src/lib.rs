//! Sticker atlas for the cube.
//!
//! The atlas is a grid of `ATLAS_COLUMNS` x `ATLAS_ROWS` cells, one per face,
//! indexed by `Face::index()`. The mesh maps each box side into its cell, so a
//! replacement PNG only needs to keep that layout.
//!
//! The renderer consumes the atlas as plain RGBA8 pixels; it never touches the
//! file system itself.

use glam::Vec2;
use rubix_common::Face;
use std::path::Path;

pub const ATLAS_COLUMNS: u32 = 3;
pub const ATLAS_ROWS: u32 = 2;

const CELL_SIZE: u32 = 64;
const BORDER: u32 = 4;
const BORDER_COLOR: [u8; 4] = [20, 20, 20, 255];

/// Errors from atlas operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("invalid atlas: {0}")]
    InvalidAtlas(String),
}

/// Sticker colour for each face, in `Face::ALL` order.
pub fn face_color(face: Face) -> [u8; 4] {
    match face {
        Face::Front => [0, 155, 72, 255],
        Face::Left => [255, 88, 0, 255],
        Face::Right => [183, 18, 52, 255],
        Face::Back => [0, 70, 173, 255],
        Face::Top => [255, 255, 255, 255],
        Face::Bottom => [255, 213, 0, 255],
    }
}

/// UV rectangle `(min, max)` of a face's cell.
pub fn cell_uv(face: Face) -> (Vec2, Vec2) {
    let i = face.index() as u32;
    let col = (i % ATLAS_COLUMNS) as f32;
    let row = (i / ATLAS_COLUMNS) as f32;
    let size = Vec2::new(1.0 / ATLAS_COLUMNS as f32, 1.0 / ATLAS_ROWS as f32);
    let min = Vec2::new(col, row) * size;
    (min, min + size)
}

/// RGBA8 texture holding one sticker cell per face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureAtlas {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureAtlas {
    /// Build the default atlas: a flat colour per cell with a dark border.
    pub fn procedural() -> Self {
        let width = CELL_SIZE * ATLAS_COLUMNS;
        let height = CELL_SIZE * ATLAS_ROWS;
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let (cx, cy) = (x % CELL_SIZE, y % CELL_SIZE);
                let on_border = cx < BORDER
                    || cy < BORDER
                    || cx >= CELL_SIZE - BORDER
                    || cy >= CELL_SIZE - BORDER;
                let color = if on_border {
                    BORDER_COLOR
                } else {
                    let cell = (y / CELL_SIZE) * ATLAS_COLUMNS + x / CELL_SIZE;
                    face_color(Face::ALL[cell as usize])
                };
                pixels.extend_from_slice(&color);
            }
        }
        Self {
            name: "procedural_atlas".into(),
            width,
            height,
            pixels,
        }
    }

    /// Load an atlas from an image file (PNG).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let path = path.as_ref();
        let image = image::open(path)?.to_rgba8();
        let (width, height) = image.dimensions();
        if width < ATLAS_COLUMNS || height < ATLAS_ROWS {
            return Err(AssetError::InvalidAtlas(format!(
                "{} is {width}x{height}, smaller than the {ATLAS_COLUMNS}x{ATLAS_ROWS} cell grid",
                path.display()
            )));
        }
        tracing::info!("loaded atlas {} ({width}x{height})", path.display());
        Ok(Self {
            name: path.display().to_string(),
            width,
            height,
            pixels: image.into_raw(),
        })
    }

    /// Load from `path` when given, otherwise fall back to the procedural atlas.
    pub fn load_or_procedural(path: Option<&Path>) -> Result<Self, AssetError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::procedural()),
        }
    }

    /// Row stride in bytes.
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn procedural_atlas_size() {
        let atlas = TextureAtlas::procedural();
        assert_eq!(atlas.width, 192);
        assert_eq!(atlas.height, 128);
        assert_eq!(atlas.pixels.len(), (192 * 128 * 4) as usize);
    }

    #[test]
    fn cell_centres_carry_face_colours() {
        let atlas = TextureAtlas::procedural();
        for face in Face::ALL {
            let (min, max) = cell_uv(face);
            let centre = (min + max) * 0.5;
            let x = (centre.x * atlas.width as f32) as u32;
            let y = (centre.y * atlas.height as f32) as u32;
            assert_eq!(atlas.pixel(x, y), face_color(face), "{face:?}");
        }
    }

    #[test]
    fn cell_edges_are_borders() {
        let atlas = TextureAtlas::procedural();
        assert_eq!(atlas.pixel(0, 0), BORDER_COLOR);
        assert_eq!(atlas.pixel(CELL_SIZE, CELL_SIZE + 1), BORDER_COLOR);
    }

    #[test]
    fn cells_tile_the_unit_square() {
        let (min, _) = cell_uv(Face::Front);
        assert_eq!(min, Vec2::ZERO);
        let (_, max) = cell_uv(Face::Bottom);
        assert!((max - Vec2::ONE).length() < 1e-6);
    }

    #[test]
    fn png_round_trip() {
        let atlas = TextureAtlas::procedural();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.png");
        image::save_buffer(
            &path,
            &atlas.pixels,
            atlas.width,
            atlas.height,
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();

        let loaded = TextureAtlas::load(&path).unwrap();
        assert_eq!(loaded.width, atlas.width);
        assert_eq!(loaded.pixels, atlas.pixels);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(TextureAtlas::load("/nonexistent/atlas.png").is_err());
        assert!(TextureAtlas::load_or_procedural(None).is_ok());
    }
}
