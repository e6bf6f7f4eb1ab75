//! Text layout engine
//!
//! Converts text into positioned glyph quads. Text is laid out on a single
//! line: the pen starts at the origin, moves right by each glyph's advance,
//! and glyphs that cannot be resolved are skipped without advancing it.
//!
//! # Coordinate system
//!
//! - Origin (0, 0) is the top-left corner of the target
//! - +X points right, +Y points down
//! - The `y` passed to [`TextLayout::layout`] is the top of the line box;
//!   the baseline sits `ascent` pixels below it

use std::ops::Range;

use bytemuck::{Pod, Zeroable};

use super::codepoints::{codepoints, CodepointMode};
use super::{FontAtlas, GlyphInfo};
use crate::config::TextConfig;
use crate::foundation::color::Color;
use crate::foundation::math::{Point2, Rect};
use crate::render::api::{TextBackend, VertexAttribute, VertexFormat};

/// Vertex data for text rendering
///
/// Interleaved position, atlas texture coordinate and color. Six vertices
/// (two triangles) form one glyph quad.
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct TextVertex {
    /// Position in pixels
    pub position: [f32; 2],
    /// Atlas texture coordinates (normalized)
    pub uv: [f32; 2],
    /// RGBA color
    pub color: [f32; 4],
}

impl TextVertex {
    /// Number of vertices emitted per glyph
    pub const PER_GLYPH: usize = 6;

    /// Size of one vertex in bytes
    pub const STRIDE: u32 = std::mem::size_of::<Self>() as u32;

    /// Attribute layout matching the text shaders
    pub const ATTRIBUTES: &'static [VertexAttribute] = &[
        VertexAttribute { location: 0, format: VertexFormat::Float32x2, offset: 0 },
        VertexAttribute { location: 1, format: VertexFormat::Float32x2, offset: 8 },
        VertexAttribute { location: 2, format: VertexFormat::Float32x4, offset: 16 },
    ];

    /// Raw bytes of a vertex slice, ready for a vertex buffer upload
    pub fn as_bytes(vertices: &[Self]) -> &[u8] {
        bytemuck::cast_slice(vertices)
    }

    /// Build the six vertices of a glyph quad
    ///
    /// Winding: top-left, top-right, bottom-left, then top-right,
    /// bottom-right, bottom-left.
    fn quad(min: [f32; 2], max: [f32; 2], uv_min: [f32; 2], uv_max: [f32; 2], color: [f32; 4]) -> [Self; 6] {
        let top_left = Self { position: min, uv: uv_min, color };
        let top_right = Self { position: [max[0], min[1]], uv: [uv_max[0], uv_min[1]], color };
        let bottom_left = Self { position: [min[0], max[1]], uv: [uv_min[0], uv_max[1]], color };
        let bottom_right = Self { position: max, uv: uv_max, color };

        [top_left, top_right, bottom_left, top_right, bottom_right, bottom_left]
    }
}

/// Measured size of a run of text
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtent {
    /// Sum of glyph advances
    pub width: f32,
    /// Line height of the font
    pub height: f32,
}

impl From<TextExtent> for (f32, f32) {
    fn from(extent: TextExtent) -> Self {
        (extent.width, extent.height)
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalAlign {
    /// Left-aligned text
    #[default]
    Left,
    /// Centered text
    Center,
    /// Right-aligned text
    Right,
}

/// Vertical placement of a line within a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    /// Top of the line box at the top of the rectangle
    #[default]
    Top,
    /// Line box centered vertically
    Middle,
    /// Bottom of the line box at the bottom of the rectangle
    Bottom,
    /// Baseline at the top edge of the rectangle
    Alphabetic,
}

/// Text layout engine that converts strings to glyph quads
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLayout {
    mode: CodepointMode,
}

impl TextLayout {
    /// Create a layout engine using the given codepoint mode
    pub fn new(mode: CodepointMode) -> Self {
        Self { mode }
    }

    /// Create a layout engine from configuration
    pub fn from_config(config: &TextConfig) -> Self {
        Self::new(config.codepoint_mode)
    }

    /// Codepoint mode used to iterate text
    pub fn mode(&self) -> CodepointMode {
        self.mode
    }

    /// Measure a single line of text
    ///
    /// The width is the sum of advances of every resolvable glyph. The height
    /// is always the font's line height.
    pub fn measure<T: AsRef<[u8]> + ?Sized>(
        &self,
        font: &mut FontAtlas,
        backend: &mut dyn TextBackend,
        text: &T,
    ) -> TextExtent {
        let width = codepoints(text.as_ref(), self.mode)
            .filter_map(|cp| font.glyph(backend, cp))
            .map(|glyph| glyph.advance)
            .sum();

        TextExtent {
            width,
            height: font.line_height(),
        }
    }

    /// Lay out a single line of text with its top-left corner at `origin`
    pub fn layout<T: AsRef<[u8]> + ?Sized>(
        &self,
        font: &mut FontAtlas,
        backend: &mut dyn TextBackend,
        text: &T,
        origin: Point2,
        color: Color,
    ) -> Vec<TextVertex> {
        let mut vertices = Vec::new();
        self.layout_into(font, backend, text, origin, color, &mut vertices);
        vertices
    }

    /// Append the quads for a single line of text to `out`
    ///
    /// Returns the total pen advance, which equals the measured width of the
    /// same text. Nothing is emitted for a non-finite origin.
    pub fn layout_into<T: AsRef<[u8]> + ?Sized>(
        &self,
        font: &mut FontAtlas,
        backend: &mut dyn TextBackend,
        text: &T,
        origin: Point2,
        color: Color,
        out: &mut Vec<TextVertex>,
    ) -> f32 {
        if !origin.x.is_finite() || !origin.y.is_finite() {
            return 0.0;
        }

        let baseline = origin.y + font.ascent();
        let color = color.to_array();
        let mut pen_x = origin.x;

        for cp in codepoints(text.as_ref(), self.mode) {
            let Some(glyph) = font.glyph(backend, cp) else {
                continue;
            };

            out.extend_from_slice(&Self::glyph_quad(&glyph, pen_x, baseline, color));
            pen_x += glyph.advance;
        }

        pen_x - origin.x
    }

    fn glyph_quad(glyph: &GlyphInfo, pen_x: f32, baseline: f32, color: [f32; 4]) -> [TextVertex; 6] {
        let x0 = pen_x + glyph.bearing.x;
        let y0 = baseline - glyph.bearing.y;
        let x1 = x0 + glyph.size.x;
        let y1 = y0 + glyph.size.y;

        let uv_min = glyph.uv_origin;
        let uv_max = glyph.uv_max();

        TextVertex::quad([x0, y0], [x1, y1], [uv_min.x, uv_min.y], [uv_max.x, uv_max.y], color)
    }

    /// Top-left origin that places a line of `width` inside `rect`
    pub fn aligned_origin(
        font: &FontAtlas,
        rect: Rect,
        width: f32,
        align: HorizontalAlign,
        baseline: TextBaseline,
    ) -> Point2 {
        let x = match align {
            HorizontalAlign::Left => rect.x,
            HorizontalAlign::Center => rect.x + (rect.width - width) * 0.5,
            HorizontalAlign::Right => rect.right() - width,
        };

        let line_height = font.line_height();
        let y = match baseline {
            TextBaseline::Top => rect.y,
            TextBaseline::Middle => rect.y + (rect.height - line_height) * 0.5,
            TextBaseline::Bottom => rect.bottom() - line_height,
            TextBaseline::Alphabetic => rect.y - font.ascent(),
        };

        Point2::new(x, y)
    }

    /// Split text into lines no wider than `max_width`
    ///
    /// Lines break at `\n` and, greedily, at spaces. A single word wider
    /// than `max_width` gets a line of its own and is not broken. Returned
    /// ranges index into `text` and exclude the break characters.
    pub fn wrap_lines<T: AsRef<[u8]> + ?Sized>(
        &self,
        font: &mut FontAtlas,
        backend: &mut dyn TextBackend,
        text: &T,
        max_width: f32,
    ) -> Vec<Range<usize>> {
        let bytes = text.as_ref();
        let mut lines = Vec::new();
        let mut paragraph_start = 0;

        for paragraph in bytes.split(|&b| b == b'\n') {
            let mut line: Option<Range<usize>> = None;
            let mut word_start = paragraph_start;

            for word in paragraph.split(|&b| b == b' ') {
                let word_range = word_start..word_start + word.len();
                word_start = word_range.end + 1;

                line = Some(match line {
                    None => word_range,
                    Some(current) => {
                        let candidate = current.start..word_range.end;
                        if self.measure(font, backend, &bytes[candidate.clone()]).width > max_width {
                            lines.push(current);
                            word_range
                        } else {
                            candidate
                        }
                    }
                });
            }

            lines.push(line.unwrap_or(paragraph_start..paragraph_start));
            paragraph_start += paragraph.len() + 1;
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backends::HeadlessBackend;
    use crate::render::systems::text::test_support::{small_config, FakeRasterizer};
    use approx::assert_relative_eq;

    fn setup() -> (HeadlessBackend, FontAtlas) {
        let mut backend = HeadlessBackend::new();
        let font = FontAtlas::with_rasterizer(&mut backend, Box::new(FakeRasterizer::latin()), &TextConfig::default())
            .unwrap();
        (backend, font)
    }

    #[test]
    fn test_text_vertex_layout() {
        assert_eq!(std::mem::size_of::<TextVertex>(), std::mem::size_of::<f32>() * 8);
        assert_eq!(TextVertex::STRIDE, 32);
        let vertices = [TextVertex::default(); 6];
        assert_eq!(TextVertex::as_bytes(&vertices).len(), 6 * 32);
    }

    #[test]
    fn test_measure_sums_advances() {
        let (mut backend, mut font) = setup();
        let extent = TextLayout::default().measure(&mut font, &mut backend, "AB");
        assert_eq!(<(f32, f32)>::from(extent), (22.0, 18.0));
    }

    #[test]
    fn test_measure_empty_text() {
        let (mut backend, mut font) = setup();
        let extent = TextLayout::default().measure(&mut font, &mut backend, "");
        assert_eq!(extent, TextExtent { width: 0.0, height: 18.0 });
    }

    #[test]
    fn test_layout_emits_six_vertices_per_glyph() {
        let (mut backend, mut font) = setup();
        let vertices = TextLayout::default().layout(&mut font, &mut backend, "Hi!", Point2::origin(), Color::WHITE);
        assert_eq!(vertices.len(), 3 * TextVertex::PER_GLYPH);
        assert!(vertices.iter().all(|v| v.color == [1.0, 1.0, 1.0, 1.0]));
    }

    #[test]
    fn test_quad_geometry_and_winding() {
        let (mut backend, mut font) = setup();
        let color = Color::rgba(0.5, 0.25, 1.0, 0.75);
        let v = TextLayout::default().layout(&mut font, &mut backend, "A", Point2::new(100.0, 50.0), color);

        // baseline = 50 + ascent 14 = 64; bearing (1, 12); size 8x12
        let (x0, y0, x1, y1) = (101.0, 52.0, 109.0, 64.0);
        let glyph = font.cached_glyph('A' as u32).unwrap();
        let (u0, v0) = (glyph.uv_origin.x, glyph.uv_origin.y);
        let (u1, v1) = (glyph.uv_max().x, glyph.uv_max().y);

        let expected = [
            ([x0, y0], [u0, v0]),
            ([x1, y0], [u1, v0]),
            ([x0, y1], [u0, v1]),
            ([x1, y0], [u1, v0]),
            ([x1, y1], [u1, v1]),
            ([x0, y1], [u0, v1]),
        ];
        for (vertex, (position, uv)) in v.iter().zip(expected) {
            assert_eq!(vertex.position, position);
            assert_eq!(vertex.uv, uv);
            assert_eq!(vertex.color, color.to_array());
        }
    }

    #[test]
    fn test_pen_advances_between_glyphs() {
        let (mut backend, mut font) = setup();
        let v = TextLayout::default().layout(&mut font, &mut backend, "BA", Point2::new(0.0, 0.0), Color::WHITE);
        // 'B' advances 12, so 'A' starts at 12 + bearing 1
        assert_eq!(v[0].position[0], 1.0);
        assert_eq!(v[6].position[0], 13.0);
    }

    #[test]
    fn test_measure_matches_layout_advance() {
        let (mut backend, mut font) = setup();
        let layout = TextLayout::default();
        for text in ["Hello, world", "AB", "  spaced  out  ", "~!@#"] {
            let measured = layout.measure(&mut font, &mut backend, text).width;
            let mut out = Vec::new();
            let advanced = layout.layout_into(&mut font, &mut backend, text, Point2::new(3.0, 7.0), Color::WHITE, &mut out);
            assert_relative_eq!(measured, advanced);
        }
    }

    #[test]
    fn test_unresolvable_glyph_is_skipped() {
        let (mut backend, mut font) = setup();
        let layout = TextLayout::default();

        let plain = layout.measure(&mut font, &mut backend, "AB").width;
        // 0x01 has no glyph in the fake face
        let with_gap = layout.measure(&mut font, &mut backend, b"A\x01B").width;
        assert_eq!(plain, with_gap);

        let v = layout.layout(&mut font, &mut backend, b"A\x01B", Point2::origin(), Color::WHITE);
        assert_eq!(v.len(), 2 * TextVertex::PER_GLYPH);
        assert_eq!(v[6].position[0], 11.0);
    }

    #[test]
    fn test_exhausted_atlas_does_not_abort_layout() {
        let mut backend = HeadlessBackend::new();
        let mut font = FontAtlas::with_rasterizer(&mut backend, Box::new(FakeRasterizer::latin()), &small_config(16, 16))
            .unwrap();
        let layout = TextLayout::default();

        // Only 'A' and 'B' fit; 'C' is skipped, the trailing 'A' still draws
        let v = layout.layout(&mut font, &mut backend, "ABCA", Point2::origin(), Color::WHITE);
        assert_eq!(v.len(), 3 * TextVertex::PER_GLYPH);
        assert_eq!(layout.measure(&mut font, &mut backend, "ABCA").width, 32.0);
    }

    #[test]
    fn test_bytes_mode_keys_each_byte() {
        let (mut backend, mut font) = setup();
        // 'é' is two bytes outside the fake face's ASCII range
        let extent = TextLayout::new(CodepointMode::Bytes).measure(&mut font, &mut backend, "AéB");
        assert_eq!(extent.width, 22.0);
        assert!(font.cached_glyph(0xC3).is_none());
    }

    #[test]
    fn test_non_finite_origin_emits_nothing() {
        let (mut backend, mut font) = setup();
        let v = TextLayout::default().layout(&mut font, &mut backend, "A", Point2::new(f32::NAN, 0.0), Color::WHITE);
        assert!(v.is_empty());
    }

    #[test]
    fn test_aligned_origin() {
        let (_, font) = setup();
        let rect = Rect::new(10.0, 20.0, 100.0, 40.0);

        let left_top = TextLayout::aligned_origin(&font, rect, 30.0, HorizontalAlign::Left, TextBaseline::Top);
        assert_eq!(left_top, Point2::new(10.0, 20.0));

        let center_middle = TextLayout::aligned_origin(&font, rect, 30.0, HorizontalAlign::Center, TextBaseline::Middle);
        assert_eq!(center_middle, Point2::new(45.0, 31.0));

        let right_bottom = TextLayout::aligned_origin(&font, rect, 30.0, HorizontalAlign::Right, TextBaseline::Bottom);
        assert_eq!(right_bottom, Point2::new(80.0, 42.0));

        let alphabetic = TextLayout::aligned_origin(&font, rect, 30.0, HorizontalAlign::Left, TextBaseline::Alphabetic);
        assert_eq!(alphabetic, Point2::new(10.0, 6.0));
    }

    #[test]
    fn test_wrap_lines_breaks_at_spaces() {
        let (mut backend, mut font) = setup();
        let text = "AA AA AA";
        // "AA" = 20, "AA AA" = 45
        let lines = TextLayout::default().wrap_lines(&mut font, &mut backend, text, 45.0);
        let words: Vec<&str> = lines.iter().map(|r| &text[r.clone()]).collect();
        assert_eq!(words, vec!["AA AA", "AA"]);
    }

    #[test]
    fn test_wrap_lines_honours_newlines_and_long_words() {
        let (mut backend, mut font) = setup();
        let text = "AAAAAAAA A\n\nAA";
        let lines = TextLayout::default().wrap_lines(&mut font, &mut backend, text, 30.0);
        let words: Vec<&str> = lines.iter().map(|r| &text[r.clone()]).collect();
        assert_eq!(words, vec!["AAAAAAAA", "A", "", "AA"]);
    }
}
