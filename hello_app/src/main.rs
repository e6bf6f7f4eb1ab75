//! Hello text demo application
//!
//! Loads a system monospace font, measures and draws a couple of strings
//! through the headless backend and reports what the glyph atlas holds.

use std::path::{Path, PathBuf};

use clap::Parser;
use rust_text2d::foundation::logging;
use rust_text2d::prelude::*;

const GREETING: &str = "Hello, world!";
const PANGRAM: &str = "The quick brown fox jumps over the lazy dog 0123456789";

/// Draws sample text through the headless text backend
#[derive(Debug, Parser)]
#[command(name = "hello_text", version)]
struct Options {
    /// Text configuration file (.toml or .ron)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Write the glyph atlas to a PNG file after drawing
    #[arg(long, value_name = "PATH")]
    dump_atlas: Option<PathBuf>,
}

struct HelloApp {
    backend: HeadlessBackend,
    font: FontAtlas,
    renderer: TextRenderer,
}

impl HelloApp {
    fn new(config: &TextConfig) -> Result<Self, FontError> {
        let mut backend = HeadlessBackend::new();
        let font = FontAtlas::load_system(&mut backend, "mono", 24.0, config)?;
        log::info!(
            "Font ready: {}px, line height {}, max advance {}",
            font.pixel_size(),
            font.line_height(),
            font.max_advance()
        );

        Ok(Self {
            backend,
            font,
            renderer: TextRenderer::from_config(config, 800, 600),
        })
    }

    fn run(&mut self) -> Result<(), RenderError> {
        let greeting = self.renderer.layout().measure(&mut self.font, &mut self.backend, GREETING);
        log::info!("'{}' measures {}x{}", GREETING, greeting.width, greeting.height);

        let drawn = self
            .renderer
            .draw_text(&mut self.backend, &mut self.font, GREETING, 20.0, 20.0, Color::WHITE)?;
        log::info!("Drew {} glyphs", drawn);

        let panel = Rect::new(20.0, 80.0, 300.0, 200.0);
        let drawn = self.renderer.draw_text_wrapped(
            &mut self.backend,
            &mut self.font,
            PANGRAM,
            panel,
            1.2,
            Color::rgb(0.9, 0.8, 0.3),
        )?;
        log::info!("Drew {} wrapped glyphs", drawn);

        let packer = self.font.packer();
        let (atlas_width, atlas_height) = packer.dimensions();
        log::info!(
            "Atlas holds {} glyphs, {} of {} rows used ({}x{})",
            self.font.cache().len(),
            packer.used_height(),
            atlas_height,
            atlas_width,
            atlas_height
        );
        log::info!("Backend recorded {} draw calls", self.backend.draw_calls().len());
        Ok(())
    }

    fn dump_atlas(&self, path: &Path) -> Result<(), RenderError> {
        self.backend.save_texture_png(self.font.texture(), path)
    }

    fn shutdown(mut self) {
        self.font.destroy(&mut self.backend);
        log::info!("Shut down cleanly");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_level(log::LevelFilter::Info);

    let options = Options::parse();

    let config = match &options.config {
        Some(path) => {
            log::info!("Loading text config from {}", path.display());
            TextConfig::load_from_file(path)?
        }
        None => TextConfig::default(),
    };

    let mut app = match HelloApp::new(&config) {
        Ok(app) => app,
        Err(e) => {
            log::error!("Could not load a font: {}", e);
            return Err(e.into());
        }
    };

    app.run()?;
    if let Some(path) = &options.dump_atlas {
        app.dump_atlas(path)?;
    }
    app.shutdown();
    Ok(())
}
