//! CPU-side text backend
//!
//! [`HeadlessBackend`] keeps atlas textures in system memory and records
//! draw calls instead of submitting them. It backs the demo when no GPU
//! context is available and lets tests inspect exactly what the text system
//! uploaded and drew.

use std::path::Path;

use slotmap::{new_key_type, Key, KeyData, SlotMap};

use crate::render::api::{
    BackendResult, PipelineHandle, RenderError, TextBackend, TextDrawCall, TextPipelineDesc, TextureHandle,
};
use crate::render::systems::text::TextVertex;

new_key_type! {
    struct TextureKey;
    struct PipelineKey;
}

fn texture_key(handle: TextureHandle) -> TextureKey {
    KeyData::from_ffi(handle.0).into()
}

fn pipeline_key(handle: PipelineHandle) -> PipelineKey {
    KeyData::from_ffi(handle.0).into()
}

/// Single-channel texture stored in system memory
#[derive(Debug, Clone)]
pub struct HeadlessTexture {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl HeadlessTexture {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    /// Texture width in texels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Texture height in texels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major texel data
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Texel at `(x, y)`, or `None` outside the texture
    pub fn pixel(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    fn write(&mut self, x: u32, y: u32, width: u32, height: u32, coverage: &[u8]) {
        let stride = self.width as usize;
        for (row, src) in coverage.chunks_exact(width as usize).take(height as usize).enumerate() {
            let start = (y as usize + row) * stride + x as usize;
            self.pixels[start..start + width as usize].copy_from_slice(src);
        }
    }
}

/// A pipeline accepted by [`HeadlessBackend::create_text_pipeline`]
#[derive(Debug, Clone)]
pub struct HeadlessPipeline {
    /// Debug label from the pipeline description
    pub label: String,
    /// Vertex stride in bytes
    pub vertex_stride: u32,
}

/// A draw call captured by [`HeadlessBackend`]
#[derive(Debug, Clone)]
pub struct RecordedDraw {
    /// Pipeline the quads were drawn with
    pub pipeline: PipelineHandle,
    /// Atlas texture that was bound
    pub texture: TextureHandle,
    /// Copy of the submitted vertices
    pub vertices: Vec<TextVertex>,
    /// Target size at the time of the draw
    pub viewport: (u32, u32),
}

/// Text backend that renders nothing and remembers everything
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    textures: SlotMap<TextureKey, HeadlessTexture>,
    pipelines: SlotMap<PipelineKey, HeadlessPipeline>,
    draws: Vec<RecordedDraw>,
    uploads: usize,
    fail_texture_creation: bool,
    fail_pipeline_creation: bool,
    fail_uploads: bool,
}

impl HeadlessBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following texture allocation fail
    pub fn set_fail_texture_creation(&mut self, fail: bool) {
        self.fail_texture_creation = fail;
    }

    /// Make every following pipeline creation fail
    pub fn set_fail_pipeline_creation(&mut self, fail: bool) {
        self.fail_pipeline_creation = fail;
    }

    /// Make every following sub-region upload fail
    pub fn set_fail_uploads(&mut self, fail: bool) {
        self.fail_uploads = fail;
    }

    /// Live texture, if the handle is still valid
    pub fn texture(&self, handle: TextureHandle) -> Option<&HeadlessTexture> {
        self.textures.get(texture_key(handle))
    }

    /// Live pipeline, if the handle is still valid
    pub fn pipeline(&self, handle: PipelineHandle) -> Option<&HeadlessPipeline> {
        self.pipelines.get(pipeline_key(handle))
    }

    /// Number of live textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Number of live pipelines
    pub fn pipeline_count(&self) -> usize {
        self.pipelines.len()
    }

    /// Number of successful sub-region uploads so far
    pub fn upload_count(&self) -> usize {
        self.uploads
    }

    /// Draw calls recorded since creation or the last [`Self::clear_draw_calls`]
    pub fn draw_calls(&self) -> &[RecordedDraw] {
        &self.draws
    }

    /// Forget recorded draw calls, e.g. at the start of a frame
    pub fn clear_draw_calls(&mut self) {
        self.draws.clear();
    }

    /// Write a texture to disk as an 8-bit grayscale PNG
    pub fn save_texture_png(&self, handle: TextureHandle, path: impl AsRef<Path>) -> BackendResult<()> {
        let texture = self.texture(handle).ok_or(RenderError::UnknownTexture(handle))?;
        let image = image::GrayImage::from_raw(texture.width, texture.height, texture.pixels.clone())
            .ok_or_else(|| RenderError::Export("texture size does not match its data".to_string()))?;

        image
            .save(path.as_ref())
            .map_err(|e| RenderError::Export(format!("{}: {}", path.as_ref().display(), e)))?;

        log::info!("Saved {}x{} texture to {}", texture.width, texture.height, path.as_ref().display());
        Ok(())
    }
}

impl TextBackend for HeadlessBackend {
    fn create_atlas_texture(&mut self, width: u32, height: u32) -> BackendResult<TextureHandle> {
        if self.fail_texture_creation {
            return Err(RenderError::TextureCreation("allocation disabled".to_string()));
        }
        if width == 0 || height == 0 {
            return Err(RenderError::TextureCreation(format!("invalid size {}x{}", width, height)));
        }

        let key = self.textures.insert(HeadlessTexture::new(width, height));
        log::debug!("Created {}x{} headless texture", width, height);
        Ok(TextureHandle(key.data().as_ffi()))
    }

    fn upload_subregion(
        &mut self,
        texture: TextureHandle,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        coverage: &[u8],
    ) -> BackendResult<()> {
        if self.fail_uploads {
            return Err(RenderError::Upload("uploads disabled".to_string()));
        }

        let target = self
            .textures
            .get_mut(texture_key(texture))
            .ok_or(RenderError::UnknownTexture(texture))?;

        let fits_x = x.checked_add(width).is_some_and(|right| right <= target.width);
        let fits_y = y.checked_add(height).is_some_and(|bottom| bottom <= target.height);
        if !fits_x || !fits_y {
            return Err(RenderError::UploadOutOfBounds {
                x,
                y,
                width,
                height,
                texture_width: target.width,
                texture_height: target.height,
            });
        }

        let expected = width as usize * height as usize;
        if coverage.len() != expected {
            return Err(RenderError::UploadSizeMismatch {
                expected,
                actual: coverage.len(),
            });
        }

        if expected > 0 {
            target.write(x, y, width, height, coverage);
        }
        self.uploads += 1;
        Ok(())
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        if self.textures.remove(texture_key(texture)).is_none() {
            log::warn!("Destroying unknown texture {:?}", texture);
        }
    }

    fn create_text_pipeline(&mut self, desc: &TextPipelineDesc) -> BackendResult<PipelineHandle> {
        if self.fail_pipeline_creation {
            return Err(RenderError::ShaderCompilation {
                label: desc.label.to_string(),
                message: "pipeline creation disabled".to_string(),
            });
        }

        for (stage, source) in [("vertex", desc.vertex_source), ("fragment", desc.fragment_source)] {
            if !source.contains("void main") {
                return Err(RenderError::ShaderCompilation {
                    label: desc.label.to_string(),
                    message: format!("{} stage has no entry point", stage),
                });
            }
        }

        let key = self.pipelines.insert(HeadlessPipeline {
            label: desc.label.to_string(),
            vertex_stride: desc.vertex_stride,
        });
        Ok(PipelineHandle(key.data().as_ffi()))
    }

    fn destroy_pipeline(&mut self, pipeline: PipelineHandle) {
        if self.pipelines.remove(pipeline_key(pipeline)).is_none() {
            log::warn!("Destroying unknown pipeline {:?}", pipeline);
        }
    }

    fn draw_quads(&mut self, draw: &TextDrawCall<'_>) -> BackendResult<()> {
        if !self.textures.contains_key(texture_key(draw.texture)) {
            return Err(RenderError::UnknownTexture(draw.texture));
        }
        if !self.pipelines.contains_key(pipeline_key(draw.pipeline)) {
            return Err(RenderError::UnknownPipeline(draw.pipeline));
        }

        self.draws.push(RecordedDraw {
            pipeline: draw.pipeline,
            texture: draw.texture,
            vertices: draw.vertices.to_vec(),
            viewport: draw.viewport,
        });
        Ok(())
    }
}
