//! Foundation module - Core utilities and types
//!
//! - Math types (vectors, points, rectangles)
//! - RGBA colors
//! - Logging utilities

pub mod math;
pub mod color;
pub mod logging;
