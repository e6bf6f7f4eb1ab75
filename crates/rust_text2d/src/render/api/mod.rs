//! Backend-facing API types

pub mod render_backend;

pub use render_backend::{
    BackendResult, BlendMode, PipelineHandle, RenderError, TextBackend, TextDrawCall,
    TextPipelineDesc, TextureHandle, VertexAttribute, VertexFormat,
};
