//! Text pipeline description
//!
//! Glyph quads are drawn with a dedicated pipeline: the vertex stage maps
//! pixel positions to clip space using the viewport resolution, and the
//! fragment stage samples the single-channel atlas as coverage and
//! multiplies it into the vertex color's alpha.

use crate::render::api::{BlendMode, TextPipelineDesc};

use super::TextVertex;

/// Vertex stage of the text pipeline
pub const TEXT_VERTEX_SHADER: &str = include_str!("../../../../shaders/text.vert");

/// Fragment stage of the text pipeline
pub const TEXT_FRAGMENT_SHADER: &str = include_str!("../../../../shaders/text.frag");

/// Build the pipeline description for glyph quads
pub fn text_pipeline_desc() -> TextPipelineDesc {
    TextPipelineDesc {
        label: "text",
        vertex_source: TEXT_VERTEX_SHADER,
        fragment_source: TEXT_FRAGMENT_SHADER,
        vertex_stride: TextVertex::STRIDE,
        attributes: TextVertex::ATTRIBUTES,
        blend: BlendMode::Alpha,
    }
}
