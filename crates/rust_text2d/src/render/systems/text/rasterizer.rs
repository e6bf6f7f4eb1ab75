//! Glyph rasterization
//!
//! [`GlyphRasterizer`] is the seam between the glyph cache and a font
//! engine. [`FontdueRasterizer`] implements it with `fontdue`.

use fontdue::{Font, FontSettings};

use super::font_atlas::{FontError, FontResult};

/// Vertical metrics of a face at one pixel size, in whole pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FontMetrics {
    /// Distance between consecutive baselines
    pub line_height: f32,
    /// Largest horizontal advance of any glyph in the face
    pub max_advance: f32,
    /// Distance from the baseline to the top of the line box (positive)
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the line box (negative)
    pub descent: f32,
}

/// One rasterized glyph: an 8-bit coverage bitmap plus placement metrics
#[derive(Debug, Clone, PartialEq)]
pub struct RasterizedGlyph {
    /// Bitmap width in pixels
    pub width: u32,
    /// Bitmap height in pixels
    pub height: u32,
    /// Row-major coverage values, `width * height` bytes
    pub coverage: Vec<u8>,
    /// Horizontal offset from the pen position to the bitmap's left edge
    pub bearing_x: f32,
    /// Vertical offset from the baseline up to the bitmap's top edge
    pub bearing_y: f32,
    /// Horizontal pen advance in pixels
    pub advance: f32,
}

/// Source of glyph bitmaps for one face at one pixel size
pub trait GlyphRasterizer {
    /// Pixel size the face is rasterized at
    fn pixel_size(&self) -> f32;

    /// Face metrics at [`Self::pixel_size`]
    fn metrics(&self) -> FontMetrics;

    /// Rasterize the glyph for `codepoint`
    ///
    /// Returns `None` when the face has no glyph for the codepoint.
    fn rasterize(&self, codepoint: u32) -> Option<RasterizedGlyph>;
}

/// [`GlyphRasterizer`] backed by a `fontdue` font
pub struct FontdueRasterizer {
    font: Font,
    pixel_size: f32,
    metrics: FontMetrics,
    round_advances: bool,
}

impl FontdueRasterizer {
    /// Parse TrueType/OpenType data and prepare it for rasterization at `pixel_size`
    pub fn from_bytes(font_data: &[u8], pixel_size: f32) -> FontResult<Self> {
        if !pixel_size.is_finite() || pixel_size <= 0.0 {
            return Err(FontError::InvalidSize(pixel_size));
        }

        let font = Font::from_bytes(font_data, FontSettings::default())
            .map_err(|e| FontError::Load(format!("fontdue error: {}", e)))?;

        let metrics = Self::face_metrics(&font, pixel_size)?;

        Ok(Self {
            font,
            pixel_size,
            metrics,
            round_advances: true,
        })
    }

    /// Keep fractional advances instead of snapping them to whole pixels
    pub fn with_rounded_advances(mut self, round: bool) -> Self {
        self.round_advances = round;
        self
    }

    fn face_metrics(font: &Font, pixel_size: f32) -> FontResult<FontMetrics> {
        let line = font.horizontal_line_metrics(pixel_size).ok_or_else(|| {
            FontError::Load("font has no horizontal line metrics".to_string())
        })?;

        let max_advance = font
            .chars()
            .values()
            .map(|index| font.metrics_indexed(index.get(), pixel_size).advance_width)
            .fold(0.0f32, f32::max);

        Ok(FontMetrics {
            line_height: line.new_line_size.round(),
            max_advance: max_advance.round(),
            ascent: line.ascent.round(),
            descent: line.descent.round(),
        })
    }
}

impl GlyphRasterizer for FontdueRasterizer {
    fn pixel_size(&self) -> f32 {
        self.pixel_size
    }

    fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    fn rasterize(&self, codepoint: u32) -> Option<RasterizedGlyph> {
        let ch = char::from_u32(codepoint)?;
        // Index 0 is .notdef
        let index = self.font.lookup_glyph_index(ch);
        if index == 0 {
            return None;
        }

        let (metrics, coverage) = self.font.rasterize_indexed(index, self.pixel_size);
        let advance = if self.round_advances {
            metrics.advance_width.round()
        } else {
            metrics.advance_width
        };

        Some(RasterizedGlyph {
            width: u32::try_from(metrics.width).ok()?,
            height: u32::try_from(metrics.height).ok()?,
            coverage,
            bearing_x: metrics.xmin as f32,
            bearing_y: (metrics.ymin + metrics.height as i32) as f32,
            advance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_size() {
        assert!(matches!(
            FontdueRasterizer::from_bytes(&[], 0.0),
            Err(FontError::InvalidSize(_))
        ));
        assert!(matches!(
            FontdueRasterizer::from_bytes(&[], f32::NAN),
            Err(FontError::InvalidSize(_))
        ));
    }

    #[test]
    fn test_rejects_garbage_font_data() {
        let result = FontdueRasterizer::from_bytes(b"definitely not a font", 16.0);
        assert!(matches!(result, Err(FontError::Load(_))));
    }

    const DEJAVU_MONO: &[u8] = include_bytes!("../../../../resources/fonts/DejaVuSansMono.ttf");

    fn dejavu(pixel_size: f32) -> FontdueRasterizer {
        FontdueRasterizer::from_bytes(DEJAVU_MONO, pixel_size).unwrap()
    }

    #[test]
    fn test_face_metrics_are_whole_pixels() {
        // hhea: ascent 1901, descent -483, line gap 0 at 2048 units/em
        let metrics = dejavu(24.0).metrics();
        assert_eq!(metrics.ascent, 22.0);
        assert_eq!(metrics.descent, -6.0);
        assert_eq!(metrics.line_height, 28.0);
        // Every glyph in a monospace face advances 1233 units
        assert_eq!(metrics.max_advance, 14.0);
    }

    #[test]
    fn test_printable_glyph_sits_on_baseline() {
        let rasterizer = dejavu(24.0);
        let a = rasterizer.rasterize(u32::from('A')).unwrap();

        assert!(a.width > 0 && a.height > 0);
        assert_eq!(a.coverage.len(), (a.width * a.height) as usize);
        assert!(a.coverage.iter().any(|&c| c > 0));
        // 'A' has no descender, so the bitmap top is its full height above the baseline
        assert_eq!(a.bearing_y, a.height as f32);
        assert_eq!(a.advance, 14.0);

        let g = rasterizer.rasterize(u32::from('g')).unwrap();
        assert!(g.bearing_y < g.height as f32);
    }

    #[test]
    fn test_unmapped_codepoints_have_no_glyph() {
        let rasterizer = dejavu(24.0);
        assert!(rasterizer.rasterize(u32::from('\n')).is_none());
        assert!(rasterizer.rasterize(0x01).is_none());
        // Surrogates are not scalar values
        assert!(rasterizer.rasterize(0xD800).is_none());
    }

    #[test]
    fn test_space_is_empty_but_advances() {
        let space = dejavu(24.0).rasterize(u32::from(' ')).unwrap();
        assert_eq!((space.width, space.height), (0, 0));
        assert!(space.coverage.is_empty());
        assert_eq!(space.advance, 14.0);
    }

    #[test]
    fn test_fractional_advances_when_rounding_disabled() {
        // 1233 units at 24px is about 14.45
        let advance = dejavu(24.0)
            .with_rounded_advances(false)
            .rasterize(u32::from('A'))
            .unwrap()
            .advance;
        assert_eq!(advance.round(), 14.0);
        assert!((advance - 14.0).abs() > 0.1);
    }
}
