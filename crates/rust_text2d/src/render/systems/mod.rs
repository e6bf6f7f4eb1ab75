//! Active rendering systems
//!
//! Stateful runtime systems that sit between the application and a
//! [`crate::render::api::TextBackend`].

pub mod text;
