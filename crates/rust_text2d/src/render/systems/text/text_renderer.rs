//! Screen-space text rendering
//!
//! [`TextRenderer`] lays text out with a [`TextLayout`] and hands the
//! resulting quads to the backend as a single batched draw per call. The
//! vertex scratch buffer is reused across draws.

use super::{FontAtlas, HorizontalAlign, TextBaseline, TextLayout, TextVertex};
use crate::config::TextConfig;
use crate::foundation::color::Color;
use crate::foundation::math::{Point2, Rect};
use crate::render::api::{BackendResult, TextBackend, TextDrawCall};

/// Draws text through a [`TextBackend`]
#[derive(Debug)]
pub struct TextRenderer {
    layout: TextLayout,
    viewport: (u32, u32),
    scratch: Vec<TextVertex>,
}

impl TextRenderer {
    /// Create a renderer for a target of `width` x `height` pixels
    pub fn new(layout: TextLayout, width: u32, height: u32) -> Self {
        Self {
            layout,
            viewport: (width, height),
            scratch: Vec::new(),
        }
    }

    /// Create a renderer using the codepoint mode from `config`
    pub fn from_config(config: &TextConfig, width: u32, height: u32) -> Self {
        Self::new(TextLayout::from_config(config), width, height)
    }

    /// Update the target size, e.g. after a window resize
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        log::debug!("Text viewport resized to {}x{}", width, height);
        self.viewport = (width, height);
    }

    /// Current target size in pixels
    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    /// Layout engine used by this renderer
    pub fn layout(&self) -> &TextLayout {
        &self.layout
    }

    /// Draw a single line of text with its top-left corner at `(x, y)`
    ///
    /// Returns the number of glyph quads drawn. Empty text and text with no
    /// resolvable glyphs issue no draw call.
    pub fn draw_text<T: AsRef<[u8]> + ?Sized>(
        &mut self,
        backend: &mut dyn TextBackend,
        font: &mut FontAtlas,
        text: &T,
        x: f32,
        y: f32,
        color: Color,
    ) -> BackendResult<usize> {
        self.scratch.clear();
        self.layout
            .layout_into(font, backend, text, Point2::new(x, y), color, &mut self.scratch);
        self.flush(backend, font)
    }

    /// Draw a single line of text aligned inside `rect`
    pub fn draw_text_aligned<T: AsRef<[u8]> + ?Sized>(
        &mut self,
        backend: &mut dyn TextBackend,
        font: &mut FontAtlas,
        text: &T,
        rect: Rect,
        align: HorizontalAlign,
        baseline: TextBaseline,
        color: Color,
    ) -> BackendResult<usize> {
        let width = self.layout.measure(font, backend, text).width;
        let origin = TextLayout::aligned_origin(font, rect, width, align, baseline);
        self.draw_text(backend, font, text, origin.x, origin.y, color)
    }

    /// Draw text wrapped to the width of `rect`
    ///
    /// Lines start at the top-left of `rect` and are `line_height *
    /// line_spacing` apart. Lines that would start at or below the bottom of
    /// the rectangle are dropped; a line starting inside it is drawn even if
    /// it overhangs the bottom edge. All visible lines go out in one draw call.
    pub fn draw_text_wrapped<T: AsRef<[u8]> + ?Sized>(
        &mut self,
        backend: &mut dyn TextBackend,
        font: &mut FontAtlas,
        text: &T,
        rect: Rect,
        line_spacing: f32,
        color: Color,
    ) -> BackendResult<usize> {
        let bytes = text.as_ref();
        let step = font.line_height() * line_spacing;
        let lines = self.layout.wrap_lines(font, backend, bytes, rect.width);

        self.scratch.clear();
        let mut y = rect.y;
        for line in lines {
            if y >= rect.bottom() {
                log::trace!("Wrapped text clipped at y = {}", y);
                break;
            }
            self.layout
                .layout_into(font, backend, &bytes[line], Point2::new(rect.x, y), color, &mut self.scratch);
            y += step;
        }

        self.flush(backend, font)
    }

    fn flush(&mut self, backend: &mut dyn TextBackend, font: &FontAtlas) -> BackendResult<usize> {
        if self.scratch.is_empty() {
            return Ok(0);
        }

        backend.draw_quads(&TextDrawCall {
            pipeline: font.pipeline(),
            texture: font.texture(),
            vertices: &self.scratch,
            viewport: self.viewport,
        })?;

        Ok(self.scratch.len() / TextVertex::PER_GLYPH)
    }
}
