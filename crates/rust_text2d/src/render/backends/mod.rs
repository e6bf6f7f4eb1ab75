//! Backend implementations for the text system
//!
//! Only the headless backend ships with the crate. GPU backends implement
//! [`crate::render::api::TextBackend`] in the application.

pub mod headless;

pub use headless::{HeadlessBackend, HeadlessPipeline, HeadlessTexture, RecordedDraw};
