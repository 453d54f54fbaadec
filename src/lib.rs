//! Stitch command interpreter and rasterizer for machine-embroidery patterns.
//!
//! Takes an already-parsed [`Pattern`] (stitch commands plus thread table)
//! and produces an RGBA canvas, optionally encoded as PNG. Each render is a
//! pure function of its pattern and config, so independent renders can run
//! on any number of threads at once.

pub mod bounds;
pub mod color;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod pattern;
pub mod raster;

pub use bounds::{Bounds, CanvasPoint, CanvasSize};
pub use color::{resolve, ColorResolver, ThreadColor};
pub use config::{Background, RenderConfig};
pub use error::{ErrorClass, RenderError};
pub use interpreter::{RenderStats, Segment};
pub use pattern::{CommandKind, Pattern, StitchCommand};

use image::RgbaImage;
use rayon::prelude::*;
use std::time::Instant;

/// A finished canvas and what it took to draw it.
#[derive(Debug, Clone)]
pub struct Rendering {
    pub canvas: RgbaImage,
    pub stats: RenderStats,
}

impl Rendering {
    pub fn size(&self) -> CanvasSize {
        CanvasSize {
            width: self.canvas.width(),
            height: self.canvas.height(),
        }
    }

    pub fn to_png(&self) -> Result<Vec<u8>, RenderError> {
        raster::encode_png(&self.canvas)
    }
}

/// Render one pattern. Either the whole canvas is produced or an error is
/// returned; there is no partial output.
pub fn render(pattern: &Pattern, config: &RenderConfig) -> Result<Rendering, RenderError> {
    let start_time = Instant::now();
    config.validate()?;

    let bounds = Bounds::compute(&pattern.stitches)?;
    let size = bounds.canvas_size(config.padding, config.max_canvas_pixels)?;
    log::debug!(
        "Pattern bounds ({}, {})..({}, {}), canvas {}x{}",
        bounds.min_x,
        bounds.min_y,
        bounds.max_x,
        bounds.max_y,
        size.width,
        size.height
    );

    let colors = ColorResolver::new(&pattern.threads, &config.fallback_palette);
    if colors.uses_fallback() {
        log::warn!(
            "Pattern has no thread colors, using {}-color fallback palette",
            config.fallback_palette.len()
        );
    }

    let walk = interpreter::interpret(pattern, &bounds, config.padding, &colors)?;
    let canvas = raster::render(size, &config.background, &walk.segments, config.stroke_width);

    let mut stats = walk.stats;
    stats.render_time_ms = start_time.elapsed().as_millis() as u64;

    log::info!(
        "Rendered {}x{}: {} stitches, {} segments, {} colors, {}ms",
        size.width,
        size.height,
        pattern.stitches.len(),
        stats.segments_drawn,
        stats.colors_used.len(),
        stats.render_time_ms
    );

    Ok(Rendering { canvas, stats })
}

pub fn render_png(pattern: &Pattern, config: &RenderConfig) -> Result<Vec<u8>, RenderError> {
    render(pattern, config)?.to_png()
}

/// Render a pattern delivered as JSON by the format parser and return PNG bytes.
pub fn render_pattern_json(
    pattern_json: &[u8],
    config: &RenderConfig,
) -> Result<Vec<u8>, RenderError> {
    log::info!(
        "Rendering embroidery pattern: {} bytes, padding={}, stroke={}",
        pattern_json.len(),
        config.padding,
        config.stroke_width
    );
    let pattern = Pattern::from_json(pattern_json)?;
    render_png(&pattern, config)
}

/// Render independent patterns in parallel. Results keep input order.
pub fn render_many(
    patterns: &[Pattern],
    config: &RenderConfig,
) -> Vec<Result<Rendering, RenderError>> {
    patterns
        .par_iter()
        .map(|pattern| render(pattern, config))
        .collect()
}
