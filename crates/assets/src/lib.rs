//! Textures for the sprite batch: PNG loading, procedural maps, and a
//! content-addressed store.
//!
//! The renderer consumes textures by [`TextureId`], never by file path.

use framelab_common::Rgba;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

/// Content-addressed texture ID computed from the pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u64);

/// Errors from texture operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("texture not found: {0:?}")]
    NotFound(TextureId),
    #[error("{width}x{height} texture needs {expected} bytes, got {actual}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// Decoded RGBA8 image, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Texture {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, AssetError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(AssetError::InvalidDimensions {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decode a PNG from disk.
    pub fn load_png(path: impl AsRef<Path>) -> Result<Self, AssetError> {
        let image = image::open(path.as_ref())?.to_rgba8();
        let (width, height) = image.dimensions();
        Self::new(width, height, image.into_raw())
    }

    /// Two-color checkerboard with square cells of `cell` pixels.
    pub fn checkerboard(width: u32, height: u32, cell: u32, a: [u8; 4], b: [u8; 4]) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let cell = cell.max(1);
        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                let even = ((x / cell) + (y / cell)) % 2 == 0;
                pixels.extend_from_slice(if even { &a } else { &b });
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Texel at integer coordinates, clamped to the edges.
    pub fn texel(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let i = (y * self.width as usize + x) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Nearest-texel sample. `u` runs left to right, `v` top to bottom, both in `0..=1`.
    pub fn sample(&self, u: f32, v: f32) -> Rgba {
        let x = (u.clamp(0.0, 1.0) * self.width as f32) as u32;
        let y = (v.clamp(0.0, 1.0) * self.height as f32) as u32;
        Rgba::from_rgba8(self.texel(x, y))
    }

    fn content_id(&self) -> TextureId {
        let mut hasher = Sha256::new();
        hasher.update(self.width.to_le_bytes());
        hasher.update(self.height.to_le_bytes());
        hasher.update(&self.pixels);
        let result = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&result[..8]);
        TextureId(u64::from_le_bytes(bytes))
    }
}

/// Content-addressed texture registry. Identical pixels share one entry.
#[derive(Debug, Clone, Default)]
pub struct TextureStore {
    textures: BTreeMap<TextureId, Texture>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a texture and return its ID.
    pub fn insert(&mut self, texture: Texture) -> TextureId {
        let id = texture.content_id();
        self.textures.entry(id).or_insert(texture);
        id
    }

    /// Decode a PNG and register it.
    pub fn load_png(&mut self, path: impl AsRef<Path>) -> Result<TextureId, AssetError> {
        let path = path.as_ref();
        let texture = Texture::load_png(path)?;
        tracing::info!(
            "loaded texture {} ({}x{})",
            path.display(),
            texture.width(),
            texture.height()
        );
        Ok(self.insert(texture))
    }

    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(&id)
    }

    pub fn require(&self, id: TextureId) -> Result<&Texture, AssetError> {
        self.get(id).ok_or(AssetError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

pub fn crate_info() -> &'static str {
    "framelab-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    #[test]
    fn new_rejects_wrong_length() {
        let err = Texture::new(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            AssetError::InvalidDimensions {
                expected: 16,
                actual: 15,
                ..
            }
        ));
    }

    #[test]
    fn new_rejects_empty() {
        assert!(Texture::new(0, 4, Vec::new()).is_err());
    }

    #[test]
    fn checkerboard_alternates() {
        let t = Texture::checkerboard(4, 4, 2, RED, BLUE);
        assert_eq!(t.texel(0, 0), RED);
        assert_eq!(t.texel(2, 0), BLUE);
        assert_eq!(t.texel(2, 2), RED);
        assert_eq!(t.pixels().len(), 64);
    }

    #[test]
    fn texel_clamps_to_edge() {
        let t = Texture::checkerboard(4, 4, 2, RED, BLUE);
        assert_eq!(t.texel(100, 100), t.texel(3, 3));
    }

    #[test]
    fn sample_uses_top_left_origin() {
        let mut pixels = Vec::new();
        pixels.extend_from_slice(&RED); // top row
        pixels.extend_from_slice(&BLUE); // bottom row
        let t = Texture::new(1, 2, pixels).unwrap();
        assert_eq!(t.sample(0.5, 0.1), Rgba::from_rgba8(RED));
        assert_eq!(t.sample(0.5, 0.9), Rgba::from_rgba8(BLUE));
        assert_eq!(t.sample(0.5, 1.0), Rgba::from_rgba8(BLUE));
    }

    #[test]
    fn content_addressed_dedup() {
        let mut store = TextureStore::new();
        let id1 = store.insert(Texture::checkerboard(8, 8, 2, RED, BLUE));
        let id2 = store.insert(Texture::checkerboard(8, 8, 2, RED, BLUE));
        let id3 = store.insert(Texture::checkerboard(8, 8, 4, RED, BLUE));
        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn require_missing_texture() {
        let store = TextureStore::new();
        assert!(matches!(
            store.require(TextureId(1)),
            Err(AssetError::NotFound(TextureId(1)))
        ));
    }

    #[test]
    fn load_png_round_trip() {
        let tmp = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        let mut img = image::RgbaImage::new(3, 2);
        img.put_pixel(0, 0, image::Rgba(RED));
        img.put_pixel(2, 1, image::Rgba(BLUE));
        img.save(tmp.path()).unwrap();

        let mut store = TextureStore::new();
        let id = store.load_png(tmp.path()).unwrap();
        let t = store.get(id).unwrap();
        assert_eq!((t.width(), t.height()), (3, 2));
        assert_eq!(t.texel(0, 0), RED);
        assert_eq!(t.texel(2, 1), BLUE);
    }

    #[test]
    fn load_missing_png_fails() {
        let mut store = TextureStore::new();
        assert!(store.load_png("/no/such/map.png").is_err());
        assert!(store.is_empty());
    }
}
