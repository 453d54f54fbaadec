use crate::error::RenderError;
use crate::pattern::StitchCommand;

/// Pixel position on the canvas.
pub type CanvasPoint = (i32, i32);

/// Longest canvas side. Stroke endpoints go through `f32`, which is exact
/// up to 2^24.
pub const MAX_CANVAS_SIDE: u32 = 1 << 24;

/// Minimal axis-aligned rectangle enclosing every stitch coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl Bounds {
    /// Scan all coordinates once. Command kinds are ignored: jumps and color
    /// changes still occupy a needle position.
    pub fn compute(stitches: &[StitchCommand]) -> Result<Self, RenderError> {
        if stitches.is_empty() {
            return Err(RenderError::EmptyPattern);
        }

        let mut bounds = Bounds {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for (index, stitch) in stitches.iter().enumerate() {
            let (x, y) = stitch
                .point()
                .ok_or(RenderError::MissingCoordinate { index })?;
            bounds.min_x = bounds.min_x.min(x);
            bounds.min_y = bounds.min_y.min(y);
            bounds.max_x = bounds.max_x.max(x);
            bounds.max_y = bounds.max_y.max(y);
        }

        let (width, height) = (bounds.width(), bounds.height());
        if width <= 0.0 || height <= 0.0 {
            return Err(RenderError::DegenerateBounds { width, height });
        }
        Ok(bounds)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// `ceil(extent) + padding` on each axis, rejected above `max_pixels`.
    pub fn canvas_size(&self, padding: u32, max_pixels: u64) -> Result<CanvasSize, RenderError> {
        let width = self.width().ceil() + padding as f64;
        let height = self.height().ceil() + padding as f64;

        // Float-to-int casts saturate, so oversized extents stay comparable.
        let (w, h) = (width as u64, height as u64);
        let side = MAX_CANVAS_SIDE as u64;
        let too_large = RenderError::CanvasTooLarge {
            width: w,
            height: h,
            max_pixels,
        };
        if w > side || h > side {
            return Err(too_large);
        }

        let size = CanvasSize {
            width: w as u32,
            height: h as u32,
        };
        if size.pixel_count() > max_pixels {
            return Err(too_large);
        }
        Ok(size)
    }

    /// Map a pattern-space point so that `(min_x, min_y)` lands on
    /// `(padding / 2, padding / 2)`.
    pub fn project(&self, x: f64, y: f64, padding: u32) -> CanvasPoint {
        let offset = (padding / 2) as i32;
        (
            ((x - self.min_x).round() as i32).saturating_add(offset),
            ((y - self.min_y).round() as i32).saturating_add(offset),
        )
    }
}
