//! Font instances and their glyph atlas
//!
//! A [`FontAtlas`] owns one rasterizer face at one pixel size, one atlas
//! texture with its packer, the text pipeline, and the glyph cache. Glyphs
//! are rasterized and uploaded lazily the first time a codepoint is used.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::{ConfigError, TextConfig};
use crate::foundation::math::Vec2;
use crate::render::api::{PipelineHandle, RenderError, TextBackend, TextureHandle};

use super::atlas_packer::{AtlasPacker, AtlasPlacement};
use super::glyph_cache::{GlyphCache, GlyphInfo};
use super::rasterizer::{FontMetrics, FontdueRasterizer, GlyphRasterizer};
use super::text_material::text_pipeline_desc;

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur while loading a font
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    /// The font file could not be read
    #[error("Failed to read font file {path}: {source}")]
    Io {
        /// File that failed to open
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The font data could not be parsed
    #[error("Failed to load font: {0}")]
    Load(String),

    /// The requested pixel size is not a positive finite number
    #[error("Invalid font size: {0}")]
    InvalidSize(f32),

    /// None of the configured system font paths could be loaded
    #[error("No usable system font found for '{0}'")]
    NoSystemFont(String),

    /// The text configuration is unusable
    #[error("Invalid text configuration: {0}")]
    Config(#[from] ConfigError),

    /// The backend failed to create the atlas texture or text pipeline
    #[error("Backend error: {0}")]
    Backend(#[from] RenderError),
}

/// A loaded font at one pixel size together with its glyph atlas
pub struct FontAtlas {
    rasterizer: Box<dyn GlyphRasterizer>,
    pixel_size: f32,
    metrics: FontMetrics,

    texture: TextureHandle,
    pipeline: PipelineHandle,

    packer: AtlasPacker,
    cache: GlyphCache,
    // Reserved regions whose upload failed, reused when the glyph is retried
    failed_uploads: HashMap<u32, AtlasPlacement>,

    exhaustion_reported: bool,
}

impl FontAtlas {
    /// Load a TrueType/OpenType file at `pixel_size`
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rust_text2d::prelude::*;
    ///
    /// let mut backend = HeadlessBackend::new();
    /// let font = FontAtlas::load(&mut backend, "resources/fonts/default.ttf", 24.0, &TextConfig::default())?;
    /// # Ok::<(), FontError>(())
    /// ```
    pub fn load(
        backend: &mut dyn TextBackend,
        path: impl AsRef<Path>,
        pixel_size: f32,
        config: &TextConfig,
    ) -> FontResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let font = Self::load_from_bytes(backend, &data, pixel_size, config)?;
        log::info!("Loaded font {} at {}px", path.display(), pixel_size);
        Ok(font)
    }

    /// Load a font from in-memory TrueType/OpenType data
    pub fn load_from_bytes(
        backend: &mut dyn TextBackend,
        font_data: &[u8],
        pixel_size: f32,
        config: &TextConfig,
    ) -> FontResult<Self> {
        let rasterizer = FontdueRasterizer::from_bytes(font_data, pixel_size)?
            .with_rounded_advances(config.round_advances);
        Self::with_rasterizer(backend, Box::new(rasterizer), config)
    }

    /// Load the first usable font from [`TextConfig::system_font_paths`]
    ///
    /// Paths whose file name contains `name` (case-insensitive) are tried
    /// first, then the remaining paths in their configured order.
    pub fn load_system(
        backend: &mut dyn TextBackend,
        name: &str,
        pixel_size: f32,
        config: &TextConfig,
    ) -> FontResult<Self> {
        if !pixel_size.is_finite() || pixel_size <= 0.0 {
            return Err(FontError::InvalidSize(pixel_size));
        }

        let needle = name.to_ascii_lowercase();
        let (preferred, fallback): (Vec<&String>, Vec<&String>) =
            config.system_font_paths.iter().partition(|path| {
                !needle.is_empty()
                    && Path::new(path.as_str())
                        .file_name()
                        .and_then(|file| file.to_str())
                        .is_some_and(|file| file.to_ascii_lowercase().contains(&needle))
            });

        for path in preferred.into_iter().chain(fallback) {
            match Self::load(backend, path, pixel_size, config) {
                Ok(font) => return Ok(font),
                Err(e) => log::debug!("Skipping system font {}: {}", path, e),
            }
        }

        Err(FontError::NoSystemFont(name.to_string()))
    }

    /// Build a font instance around any rasterizer
    ///
    /// Creates the atlas texture and the text pipeline. If the pipeline fails
    /// to build, the texture is released before the error is returned.
    pub fn with_rasterizer(
        backend: &mut dyn TextBackend,
        rasterizer: Box<dyn GlyphRasterizer>,
        config: &TextConfig,
    ) -> FontResult<Self> {
        config.validate()?;

        let pixel_size = rasterizer.pixel_size();
        if !pixel_size.is_finite() || pixel_size <= 0.0 {
            return Err(FontError::InvalidSize(pixel_size));
        }

        let texture = backend.create_atlas_texture(config.atlas_width, config.atlas_height)?;
        let pipeline = match backend.create_text_pipeline(&text_pipeline_desc()) {
            Ok(pipeline) => pipeline,
            Err(e) => {
                backend.destroy_texture(texture);
                return Err(e.into());
            }
        };

        log::info!(
            "Created {}x{} glyph atlas for {}px font",
            config.atlas_width, config.atlas_height, pixel_size
        );

        Ok(Self {
            metrics: rasterizer.metrics(),
            rasterizer,
            pixel_size,
            texture,
            pipeline,
            packer: AtlasPacker::new(config.atlas_width, config.atlas_height),
            cache: GlyphCache::new(config.initial_cache_capacity),
            failed_uploads: HashMap::new(),
            exhaustion_reported: false,
        })
    }

    /// Release the pipeline, the atlas texture and every cached glyph
    pub fn destroy(mut self, backend: &mut dyn TextBackend) {
        backend.destroy_pipeline(self.pipeline);
        backend.destroy_texture(self.texture);
        log::debug!("Destroyed font atlas with {} cached glyphs", self.cache.len());
        self.cache.clear();
        self.failed_uploads.clear();
    }

    /// Resolve the glyph for `codepoint`, rasterizing and uploading it on first use
    ///
    /// Returns `None` if the face has no glyph for the codepoint, the atlas
    /// has no room left, or the upload fails. None of these outcomes is
    /// cached, so a later call tries again. A failed upload keeps its atlas
    /// region, and the retry writes into that same region.
    pub fn glyph(&mut self, backend: &mut dyn TextBackend, codepoint: u32) -> Option<GlyphInfo> {
        if let Some(info) = self.cache.get(codepoint) {
            return Some(info);
        }

        let Some(bitmap) = self.rasterizer.rasterize(codepoint) else {
            log::trace!("No glyph for codepoint U+{:04X}", codepoint);
            return None;
        };

        let retained = self
            .failed_uploads
            .remove(&codepoint)
            .filter(|p| p.width == bitmap.width && p.height == bitmap.height);

        let Some(placement) = retained.or_else(|| self.packer.reserve(bitmap.width, bitmap.height)) else {
            if self.packer.is_full() && !self.exhaustion_reported {
                log::warn!(
                    "Glyph atlas full after {} glyphs; further new glyphs will be skipped",
                    self.cache.len()
                );
                self.exhaustion_reported = true;
            }
            return None;
        };

        if !placement.is_empty() {
            if let Err(e) = backend.upload_subregion(
                self.texture,
                placement.x,
                placement.y,
                bitmap.width,
                bitmap.height,
                &bitmap.coverage,
            ) {
                log::warn!("Failed to upload glyph U+{:04X}: {}", codepoint, e);
                self.failed_uploads.insert(codepoint, placement);
                return None;
            }
        }

        let (atlas_width, atlas_height) = self.packer.dimensions();
        let (uv_origin, uv_size) = placement.uv_rect(atlas_width, atlas_height);

        log::debug!(
            "Cached glyph U+{:04X} ({}x{}) at ({}, {})",
            codepoint, bitmap.width, bitmap.height, placement.x, placement.y
        );

        Some(self.cache.insert(GlyphInfo {
            codepoint,
            uv_origin,
            uv_size,
            size: Vec2::new(bitmap.width as f32, bitmap.height as f32),
            bearing: Vec2::new(bitmap.bearing_x, bitmap.bearing_y),
            advance: bitmap.advance,
        }))
    }

    /// Resolve every codepoint in `codepoints`, returning how many are available
    pub fn preload(
        &mut self,
        backend: &mut dyn TextBackend,
        codepoints: impl IntoIterator<Item = u32>,
    ) -> usize {
        codepoints
            .into_iter()
            .filter(|&cp| self.glyph(backend, cp).is_some())
            .count()
    }

    /// Cached record for `codepoint`, without rasterizing
    pub fn cached_glyph(&self, codepoint: u32) -> Option<GlyphInfo> {
        self.cache.get(codepoint)
    }

    /// Pixel size the font was loaded at
    pub fn pixel_size(&self) -> f32 {
        self.pixel_size
    }

    /// Face metrics at this pixel size
    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    /// Distance between consecutive baselines
    pub fn line_height(&self) -> f32 {
        self.metrics.line_height
    }

    /// Largest advance of any glyph in the face
    pub fn max_advance(&self) -> f32 {
        self.metrics.max_advance
    }

    /// Distance from the top of the line box down to the baseline
    pub fn ascent(&self) -> f32 {
        self.metrics.ascent
    }

    /// Distance from the baseline to the bottom of the line box (negative)
    pub fn descent(&self) -> f32 {
        self.metrics.descent
    }

    /// Atlas texture handle
    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    /// Text pipeline handle
    pub fn pipeline(&self) -> PipelineHandle {
        self.pipeline
    }

    /// Atlas dimensions in texels
    pub fn atlas_dimensions(&self) -> (u32, u32) {
        self.packer.dimensions()
    }

    /// Atlas packing state
    pub fn packer(&self) -> &AtlasPacker {
        &self.packer
    }

    /// Glyph cache
    pub fn cache(&self) -> &GlyphCache {
        &self.cache
    }
}
