//! # Rendering
//!
//! Backend-agnostic 2D text rendering.
//!
//! ## Architecture
//!
//! - **api**: the [`TextBackend`] trait and the handle, pipeline and error
//!   types a backend works with
//! - **backends**: the in-memory [`HeadlessBackend`]
//! - **systems::text**: glyph rasterization, atlas packing, the glyph
//!   cache, layout and batched drawing
//!
//! The text system owns no GPU state of its own. Every texture, pipeline
//! and draw goes through the backend passed into each call.

pub mod api;
pub mod backends;
pub mod systems;

pub use api::{BackendResult, PipelineHandle, RenderError, TextBackend, TextureHandle};
pub use backends::HeadlessBackend;
pub use systems::text::{
    FontAtlas, FontError, FontResult, HorizontalAlign, TextBaseline, TextExtent, TextLayout, TextRenderer,
    TextVertex,
};
