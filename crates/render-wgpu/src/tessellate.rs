use bytemuck::{Pod, Zeroable};
use framelab_assets::{AssetError, Texture, TextureId, TextureStore};
use framelab_common::Rgba;
use framelab_render::{DrawCommand, DrawList};
use glam::Vec2;
use std::collections::BTreeMap;

/// Segments used to approximate a circle outline.
pub const CIRCLE_SEGMENTS: usize = 20;

/// Upper bound on sprite cells per axis. Larger textures are downsampled.
pub const MAX_SPRITE_CELLS: u32 = 128;

/// World-space vertex with a flat color.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ColorVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl ColorVertex {
    fn new(position: Vec2, color: Rgba) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
        }
    }
}

/// Text left for the overlay pass; positions stay in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub position: Vec2,
    pub color: Rgba,
}

/// GPU-ready geometry for one draw list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tessellation {
    /// Pairs of vertices, one pair per line segment.
    pub lines: Vec<ColorVertex>,
    /// Triples of vertices, one triple per triangle.
    pub triangles: Vec<ColorVertex>,
    pub texts: Vec<TextRun>,
}

impl Tessellation {
    fn segment(&mut self, from: Vec2, to: Vec2, color: Rgba) {
        self.lines.push(ColorVertex::new(from, color));
        self.lines.push(ColorVertex::new(to, color));
    }
}

fn push_quad(out: &mut Vec<ColorVertex>, min: Vec2, max: Vec2, color: Rgba) {
    let corners = [
        min,
        Vec2::new(max.x, min.y),
        max,
        min,
        max,
        Vec2::new(min.x, max.y),
    ];
    out.extend(corners.into_iter().map(|p| ColorVertex::new(p, color)));
}

/// Sample a texture into a grid of flat-colored quads covering `position..position + size`.
fn sprite_grid(texture: &Texture, position: Vec2, size: Vec2, tint: Rgba) -> Vec<ColorVertex> {
    let cols = texture.width().min(MAX_SPRITE_CELLS);
    let rows = texture.height().min(MAX_SPRITE_CELLS);
    let cell = size / Vec2::new(cols as f32, rows as f32);
    let mut out = Vec::with_capacity((cols * rows) as usize * 6);
    for row in 0..rows {
        // Texture rows run top to bottom; world y runs up.
        let v = (row as f32 + 0.5) / rows as f32;
        let y = position.y + size.y - cell.y * (row + 1) as f32;
        for col in 0..cols {
            let u = (col as f32 + 0.5) / cols as f32;
            let min = Vec2::new(position.x + cell.x * col as f32, y);
            let color = texture.sample(u, v).modulate(tint);
            push_quad(&mut out, min, min + cell, color);
        }
    }
    out
}

/// Cache key for one sprite placement. Textures are content-addressed and
/// immutable, so the id stands in for the pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct SpriteKey {
    texture: TextureId,
    position: [u32; 2],
    size: [u32; 2],
    tint: [u32; 4],
}

impl SpriteKey {
    fn new(texture: TextureId, position: Vec2, size: Vec2, tint: Rgba) -> Self {
        Self {
            texture,
            position: position.to_array().map(f32::to_bits),
            size: size.to_array().map(f32::to_bits),
            tint: tint.to_array().map(f32::to_bits),
        }
    }
}

/// Tessellator that keeps sprite grids between frames.
///
/// A sprite drawn with the same texture, placement and tint as last frame
/// reuses its vertices. Entries not drawn in a frame are evicted, so the
/// cache never holds more than one frame's sprites.
#[derive(Debug, Default)]
pub struct Tessellator {
    sprites: BTreeMap<SpriteKey, Vec<ColorVertex>>,
}

impl Tessellator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sprite placements currently cached.
    pub fn cached_sprites(&self) -> usize {
        self.sprites.len()
    }

    /// Flatten a draw list into line and triangle vertices.
    ///
    /// Sprites become a grid of flat-colored quads sampled from their texture.
    pub fn tessellate(
        &mut self,
        list: &DrawList,
        textures: &TextureStore,
    ) -> Result<Tessellation, AssetError> {
        let mut previous = std::mem::take(&mut self.sprites);
        let mut out = Tessellation::default();
        for command in list.commands() {
            match command {
                DrawCommand::Circle {
                    center,
                    radius,
                    axis,
                    color,
                } => {
                    let step = std::f32::consts::TAU / CIRCLE_SEGMENTS as f32;
                    for i in 0..CIRCLE_SEGMENTS {
                        let a = *center + Vec2::from_angle(step * i as f32) * *radius;
                        let b = *center + Vec2::from_angle(step * (i + 1) as f32) * *radius;
                        out.segment(a, b, *color);
                    }
                    out.segment(*center, *center + *axis * *radius, *color);
                }
                DrawCommand::Polygon { points, color } => {
                    if points.len() < 2 {
                        continue;
                    }
                    for (i, from) in points.iter().enumerate() {
                        let to = points[(i + 1) % points.len()];
                        out.segment(*from, to, *color);
                    }
                }
                DrawCommand::Sprite {
                    texture,
                    position,
                    size,
                    tint,
                } => {
                    let key = SpriteKey::new(*texture, *position, *size, *tint);
                    let vertices = match previous.remove(&key).or_else(|| self.sprites.remove(&key)) {
                        Some(vertices) => vertices,
                        None => sprite_grid(textures.require(*texture)?, *position, *size, *tint),
                    };
                    out.triangles.extend_from_slice(&vertices);
                    self.sprites.insert(key, vertices);
                }
                DrawCommand::Text {
                    text,
                    position,
                    color,
                } => out.texts.push(TextRun {
                    text: text.clone(),
                    position: *position,
                    color: *color,
                }),
            }
        }
        tracing::trace!(
            cached = self.sprites.len(),
            evicted = previous.len(),
            "tessellated draw list"
        );
        Ok(out)
    }
}

/// Tessellate without keeping a sprite cache.
pub fn tessellate(list: &DrawList, textures: &TextureStore) -> Result<Tessellation, AssetError> {
    Tessellator::new().tessellate(list, textures)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    fn approx(a: [f32; 2], b: Vec2) -> bool {
        (Vec2::from_array(a) - b).length() < 1e-4
    }

    #[test]
    fn circle_is_closed_ring_plus_axis() {
        let mut list = DrawList::new();
        list.push(DrawCommand::Circle {
            center: Vec2::new(1.0, 1.0),
            radius: 2.0,
            axis: Vec2::Y,
            color: Rgba::WHITE,
        });
        let t = tessellate(&list, &TextureStore::new()).unwrap();
        assert_eq!(t.lines.len(), (CIRCLE_SEGMENTS + 1) * 2);
        assert!(approx(t.lines[0].position, Vec2::new(3.0, 1.0)));
        let last_ring = t.lines[CIRCLE_SEGMENTS * 2 - 1].position;
        assert!(approx(last_ring, Vec2::new(3.0, 1.0)));
        let axis_end = t.lines.last().unwrap().position;
        assert!(approx(axis_end, Vec2::new(1.0, 3.0)));
    }

    #[test]
    fn polygon_outline_closes() {
        let mut list = DrawList::new();
        list.push(DrawCommand::Polygon {
            points: vec![Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y],
            color: Rgba::BLACK,
        });
        let t = tessellate(&list, &TextureStore::new()).unwrap();
        assert_eq!(t.lines.len(), 8);
        assert!(approx(t.lines[7].position, Vec2::ZERO));
        assert!(t.triangles.is_empty());
    }

    #[test]
    fn degenerate_polygon_is_skipped() {
        let mut list = DrawList::new();
        list.push(DrawCommand::Polygon {
            points: vec![Vec2::ZERO],
            color: Rgba::BLACK,
        });
        let t = tessellate(&list, &TextureStore::new()).unwrap();
        assert!(t.lines.is_empty());
    }

    #[test]
    fn sprite_cells_follow_texture_rows() {
        let mut store = TextureStore::new();
        let mut pixels = Vec::new();
        pixels.extend_from_slice(&RED); // top
        pixels.extend_from_slice(&BLUE); // bottom
        let id = store.insert(Texture::new(1, 2, pixels).unwrap());

        let mut list = DrawList::new();
        list.push(DrawCommand::Sprite {
            texture: id,
            position: Vec2::ZERO,
            size: Vec2::new(10.0, 10.0),
            tint: Rgba::WHITE,
        });
        let t = tessellate(&list, &store).unwrap();
        assert_eq!(t.triangles.len(), 12);
        // First cell is the top row, drawn in the upper half.
        assert_eq!(t.triangles[0].color, Rgba::from_rgba8(RED).to_array());
        assert!(approx(t.triangles[0].position, Vec2::new(0.0, 5.0)));
        assert_eq!(t.triangles[6].color, Rgba::from_rgba8(BLUE).to_array());
        assert!(approx(t.triangles[6].position, Vec2::ZERO));
    }

    #[test]
    fn large_sprite_is_capped() {
        let mut store = TextureStore::new();
        let id = store.insert(Texture::checkerboard(512, 256, 8, RED, BLUE));
        let mut list = DrawList::new();
        list.push(DrawCommand::Sprite {
            texture: id,
            position: Vec2::ZERO,
            size: Vec2::new(100.0, 100.0),
            tint: Rgba::WHITE,
        });
        let t = tessellate(&list, &store).unwrap();
        let cells = (MAX_SPRITE_CELLS * MAX_SPRITE_CELLS) as usize;
        assert_eq!(t.triangles.len(), cells * 6);
    }

    #[test]
    fn missing_texture_is_error() {
        let mut list = DrawList::new();
        list.push(DrawCommand::Sprite {
            texture: TextureId(42),
            position: Vec2::ZERO,
            size: Vec2::ONE,
            tint: Rgba::WHITE,
        });
        assert!(matches!(
            tessellate(&list, &TextureStore::new()),
            Err(AssetError::NotFound(TextureId(42)))
        ));
    }

    #[test]
    fn text_passes_through() {
        let mut list = DrawList::new();
        list.push(DrawCommand::Text {
            text: "Hello World".into(),
            position: Vec2::new(360.0, 360.0),
            color: Rgba::WHITE,
        });
        let t = tessellate(&list, &TextureStore::new()).unwrap();
        assert_eq!(t.texts.len(), 1);
        assert_eq!(t.texts[0].text, "Hello World");
    }

    fn map_sprite(store: &mut TextureStore) -> DrawList {
        let id = store.insert(Texture::checkerboard(4, 4, 2, RED, BLUE));
        let mut list = DrawList::new();
        list.push(DrawCommand::Sprite {
            texture: id,
            position: Vec2::ZERO,
            size: Vec2::new(100.0, 100.0),
            tint: Rgba::WHITE,
        });
        list
    }

    #[test]
    fn cached_sprite_matches_fresh_tessellation() {
        let mut store = TextureStore::new();
        let list = map_sprite(&mut store);
        let mut tessellator = Tessellator::new();
        let first = tessellator.tessellate(&list, &store).unwrap();
        let second = tessellator.tessellate(&list, &store).unwrap();
        assert_eq!(tessellator.cached_sprites(), 1);
        assert_eq!(first, second);
        assert_eq!(second, tessellate(&list, &store).unwrap());
    }

    #[test]
    fn cache_hit_skips_texture_lookup() {
        let mut store = TextureStore::new();
        let list = map_sprite(&mut store);
        let mut tessellator = Tessellator::new();
        let first = tessellator.tessellate(&list, &store).unwrap();
        let again = tessellator.tessellate(&list, &TextureStore::new()).unwrap();
        assert_eq!(first.triangles, again.triangles);
    }

    #[test]
    fn undrawn_sprites_are_evicted() {
        let mut store = TextureStore::new();
        let list = map_sprite(&mut store);
        let mut tessellator = Tessellator::new();
        tessellator.tessellate(&list, &store).unwrap();
        tessellator.tessellate(&DrawList::new(), &store).unwrap();
        assert_eq!(tessellator.cached_sprites(), 0);
    }

    #[test]
    fn moved_sprite_is_rebuilt() {
        let mut store = TextureStore::new();
        let list = map_sprite(&mut store);
        let mut tessellator = Tessellator::new();
        tessellator.tessellate(&list, &store).unwrap();

        let DrawCommand::Sprite { texture, .. } = list.commands()[0] else {
            panic!("expected sprite");
        };
        let mut moved = DrawList::new();
        moved.push(DrawCommand::Sprite {
            texture,
            position: Vec2::new(1.0, 0.0),
            size: Vec2::new(100.0, 100.0),
            tint: Rgba::WHITE,
        });
        let t = tessellator.tessellate(&moved, &store).unwrap();
        assert!(approx(t.triangles[0].position, Vec2::new(1.0, 75.0)));
        assert_eq!(tessellator.cached_sprites(), 1);
    }
}
