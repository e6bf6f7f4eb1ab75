//! Backend abstraction for text rendering
//!
//! The text system never talks to a graphics API directly. Everything it
//! needs from the GPU goes through [`TextBackend`]: a persistent
//! single-channel atlas texture with sub-region uploads, a shader pipeline
//! for glyph quads, and a draw call.

use crate::render::systems::text::TextVertex;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Handle to a texture owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Handle to a compiled shader pipeline owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineHandle(pub u64);

/// Errors reported by rendering backends
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    /// The backend could not allocate a texture
    #[error("Failed to create texture: {0}")]
    TextureCreation(String),

    /// A handle does not name a live texture
    #[error("Unknown texture handle {0:?}")]
    UnknownTexture(TextureHandle),

    /// An upload does not fit the destination texture or its data is short
    #[error("Upload of {width}x{height} at ({x}, {y}) is out of bounds for a {texture_width}x{texture_height} texture")]
    UploadOutOfBounds {
        /// Destination left edge
        x: u32,
        /// Destination top edge
        y: u32,
        /// Upload width
        width: u32,
        /// Upload height
        height: u32,
        /// Texture width
        texture_width: u32,
        /// Texture height
        texture_height: u32,
    },

    /// Coverage data length does not match the upload size
    #[error("Upload expects {expected} bytes, got {actual}")]
    UploadSizeMismatch {
        /// `width * height`
        expected: usize,
        /// Bytes supplied
        actual: usize,
    },

    /// The backend rejected a texture upload
    #[error("Texture upload failed: {0}")]
    Upload(String),

    /// A shader stage failed to compile or the program failed to link
    #[error("Shader compilation failed for '{label}': {message}")]
    ShaderCompilation {
        /// Pipeline label
        label: String,
        /// Compiler or linker output
        message: String,
    },

    /// A handle does not name a live pipeline
    #[error("Unknown pipeline handle {0:?}")]
    UnknownPipeline(PipelineHandle),

    /// Writing a texture to disk failed
    #[error("Failed to export texture: {0}")]
    Export(String),
}

/// Component type of a vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexFormat {
    /// Two 32-bit floats
    Float32x2,
    /// Four 32-bit floats
    Float32x4,
}

/// One interleaved vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader input location
    pub location: u32,
    /// Attribute format
    pub format: VertexFormat,
    /// Byte offset from the start of the vertex
    pub offset: u32,
}

/// Blending applied when the pipeline writes to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    /// No blending
    Opaque,
    /// Straight alpha: `src * a + dst * (1 - a)`
    Alpha,
}

/// Everything a backend needs to build the text pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct TextPipelineDesc {
    /// Debug label
    pub label: &'static str,
    /// Vertex stage source (GLSL)
    pub vertex_source: &'static str,
    /// Fragment stage source (GLSL)
    pub fragment_source: &'static str,
    /// Size of one vertex in bytes
    pub vertex_stride: u32,
    /// Interleaved vertex attributes
    pub attributes: &'static [VertexAttribute],
    /// Blend state
    pub blend: BlendMode,
}

/// A batch of glyph quads to draw with the text pipeline
#[derive(Debug, Clone, Copy)]
pub struct TextDrawCall<'a> {
    /// Pipeline created by [`TextBackend::create_text_pipeline`]
    pub pipeline: PipelineHandle,
    /// Atlas texture sampled by the pipeline
    pub texture: TextureHandle,
    /// Triangle list, six vertices per glyph
    pub vertices: &'a [TextVertex],
    /// Target size in pixels, used to map pixel positions to clip space
    pub viewport: (u32, u32),
}

/// Rendering backend used by the text system
///
/// All calls are synchronous with respect to the caller's GPU context.
pub trait TextBackend {
    /// Create a zero-filled single-channel 8-bit texture
    fn create_atlas_texture(&mut self, width: u32, height: u32) -> BackendResult<TextureHandle>;

    /// Write `coverage` into the `width` x `height` region at `(x, y)`
    ///
    /// Texels outside the region are left untouched.
    fn upload_subregion(
        &mut self,
        texture: TextureHandle,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        coverage: &[u8],
    ) -> BackendResult<()>;

    /// Release a texture
    fn destroy_texture(&mut self, texture: TextureHandle);

    /// Compile and link the text shader pipeline
    fn create_text_pipeline(&mut self, desc: &TextPipelineDesc) -> BackendResult<PipelineHandle>;

    /// Release a pipeline
    fn destroy_pipeline(&mut self, pipeline: PipelineHandle);

    /// Draw a batch of glyph quads
    fn draw_quads(&mut self, draw: &TextDrawCall<'_>) -> BackendResult<()>;
}
