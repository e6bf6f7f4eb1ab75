//! Text system configuration

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::render::systems::text::CodepointMode;

/// Default atlas edge length in texels
///
/// Changing the atlas size changes when the atlas reports exhaustion.
pub const DEFAULT_ATLAS_SIZE: u32 = 2048;

/// Initial number of glyph records reserved by a glyph cache
pub const DEFAULT_CACHE_CAPACITY: usize = 128;

/// Configuration for font loading, the glyph atlas and text iteration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Atlas texture width in texels
    pub atlas_width: u32,
    /// Atlas texture height in texels
    pub atlas_height: u32,
    /// Number of glyph records reserved on the first cache insert
    pub initial_cache_capacity: usize,
    /// How text bytes are turned into glyph cache keys
    pub codepoint_mode: CodepointMode,
    /// Snap glyph advances to whole pixels
    pub round_advances: bool,
    /// Font files tried in order by `FontAtlas::load_system`
    pub system_font_paths: Vec<String>,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            atlas_width: DEFAULT_ATLAS_SIZE,
            atlas_height: DEFAULT_ATLAS_SIZE,
            initial_cache_capacity: DEFAULT_CACHE_CAPACITY,
            codepoint_mode: CodepointMode::Bytes,
            round_advances: true,
            system_font_paths: [
                "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
                "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
                "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
                "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
                "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
        }
    }
}

impl TextConfig {
    /// Check that the configuration describes a usable atlas and cache
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.atlas_width == 0 || self.atlas_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "atlas dimensions must be non-zero, got {}x{}",
                self.atlas_width, self.atlas_height
            )));
        }
        if self.initial_cache_capacity == 0 {
            return Err(ConfigError::Invalid(
                "initial_cache_capacity must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config for TextConfig {}
