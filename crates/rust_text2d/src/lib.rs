//! # Rust Text2D
//!
//! Screen-space 2D text rendering with a lazily filled glyph atlas.
//!
//! ## Features
//!
//! - **Glyph Atlas**: one single-channel texture per font, shelf-packed on demand
//! - **Glyph Cache**: each codepoint is rasterized and uploaded once
//! - **Layout**: measurement, single-line, aligned and wrapped text
//! - **Batched Drawing**: one draw call per text draw
//! - **Backend Agnostic**: GPU access goes through the [`render::api::TextBackend`] trait
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rust_text2d::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TextConfig::default();
//!     let mut backend = HeadlessBackend::new();
//!     let mut font = FontAtlas::load_system(&mut backend, "mono", 24.0, &config)?;
//!     let mut renderer = TextRenderer::from_config(&config, 800, 600);
//!
//!     renderer.draw_text(&mut backend, &mut font, "Hello, world", 20.0, 20.0, Color::WHITE)?;
//!
//!     font.destroy(&mut backend);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod render;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, TextConfig},
        foundation::{
            color::Color,
            math::{Point2, Rect, Vec2},
        },
        render::{
            api::{RenderError, TextBackend},
            backends::HeadlessBackend,
            systems::text::{
                CodepointMode, FontAtlas, FontError, HorizontalAlign, TextBaseline, TextExtent, TextLayout,
                TextRenderer,
            },
        },
    };
}
