//! Deterministic rasterizer for unit tests

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::config::TextConfig;

use super::rasterizer::{FontMetrics, GlyphRasterizer, RasterizedGlyph};

#[derive(Debug, Clone, Copy)]
pub struct FakeGlyph {
    pub width: u32,
    pub height: u32,
    pub bearing_x: f32,
    pub bearing_y: f32,
    pub advance: f32,
}

impl FakeGlyph {
    pub fn new(width: u32, height: u32, advance: f32) -> Self {
        Self {
            width,
            height,
            bearing_x: 0.0,
            bearing_y: height as f32,
            advance,
        }
    }
}

/// Serves glyphs from a fixed table; bitmaps are filled with the codepoint's low byte
pub struct FakeRasterizer {
    glyphs: HashMap<u32, FakeGlyph>,
    pixel_size: f32,
    calls: Rc<Cell<usize>>,
}

impl FakeRasterizer {
    pub fn new(glyphs: impl IntoIterator<Item = (u32, FakeGlyph)>) -> Self {
        Self {
            glyphs: glyphs.into_iter().collect(),
            pixel_size: 16.0,
            calls: Rc::new(Cell::new(0)),
        }
    }

    /// Printable ASCII: 8x12 bitmaps advancing 10px, except 'B' (12px) and
    /// space (empty bitmap, 5px)
    pub fn latin() -> Self {
        let printable = (0x21u32..=0x7E).map(|cp| {
            let advance = if cp == u32::from('B') { 12.0 } else { 10.0 };
            let glyph = FakeGlyph { bearing_x: 1.0, ..FakeGlyph::new(8, 12, advance) };
            (cp, glyph)
        });
        Self::new(printable.chain([(0x20, FakeGlyph::new(0, 0, 5.0))]))
    }

    pub fn with_pixel_size(mut self, pixel_size: f32) -> Self {
        self.pixel_size = pixel_size;
        self
    }

    /// Shared count of `rasterize` calls
    pub fn call_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.calls)
    }
}

impl GlyphRasterizer for FakeRasterizer {
    fn pixel_size(&self) -> f32 {
        self.pixel_size
    }

    fn metrics(&self) -> FontMetrics {
        FontMetrics {
            line_height: 18.0,
            max_advance: 12.0,
            ascent: 14.0,
            descent: -4.0,
        }
    }

    fn rasterize(&self, codepoint: u32) -> Option<RasterizedGlyph> {
        self.calls.set(self.calls.get() + 1);
        let glyph = self.glyphs.get(&codepoint)?;
        let fill = (codepoint & 0xFF) as u8;

        Some(RasterizedGlyph {
            width: glyph.width,
            height: glyph.height,
            coverage: vec![fill; (glyph.width * glyph.height) as usize],
            bearing_x: glyph.bearing_x,
            bearing_y: glyph.bearing_y,
            advance: glyph.advance,
        })
    }
}

pub fn small_config(atlas_width: u32, atlas_height: u32) -> TextConfig {
    TextConfig {
        atlas_width,
        atlas_height,
        ..TextConfig::default()
    }
}
