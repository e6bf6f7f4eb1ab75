//! Text rendering system
//!
//! Glyph rasterization, the shelf-packed glyph atlas, text layout and
//! batched screen-space text drawing.

pub mod atlas_packer;
pub mod codepoints;
pub mod font_atlas;
pub mod glyph_cache;
pub mod rasterizer;
pub mod text_layout;
pub mod text_material;
pub mod text_renderer;

#[cfg(test)]
mod test_support;

pub use atlas_packer::{AtlasPacker, AtlasPlacement};
pub use codepoints::{codepoints, is_valid_utf8, utf8_char_count, CodepointMode, REPLACEMENT_CHARACTER};
pub use font_atlas::{FontAtlas, FontError, FontResult};
pub use glyph_cache::{GlyphCache, GlyphInfo};
pub use rasterizer::{FontMetrics, FontdueRasterizer, GlyphRasterizer, RasterizedGlyph};
pub use text_layout::{HorizontalAlign, TextBaseline, TextExtent, TextLayout, TextVertex};
pub use text_material::{text_pipeline_desc, TEXT_FRAGMENT_SHADER, TEXT_VERTEX_SHADER};
pub use text_renderer::TextRenderer;
