use thiserror::Error;

/// Whether a failure was caused by the caller's input or by a broken
/// invariant inside the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad pattern or configuration; maps to a 4xx-style response.
    Input,
    /// Upstream contract violation or encoder failure; maps to a 5xx-style response.
    Internal,
}

/// Errors that abort a render. A render never returns a partial canvas.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RenderError {
    #[error("pattern contains no stitches")]
    EmptyPattern,

    #[error("pattern has no valid dimensions ({width}x{height})")]
    DegenerateBounds { width: f64, height: f64 },

    #[error("canvas {width}x{height} exceeds the limit of {max_pixels} pixels")]
    CanvasTooLarge {
        width: u64,
        height: u64,
        max_pixels: u64,
    },

    #[error("stitch {index} carries unknown command code {code}")]
    UnknownCommand { index: usize, code: u32 },

    #[error("stitch {index} has a missing or non-finite coordinate")]
    MissingCoordinate { index: usize },

    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("invalid render config: {0}")]
    InvalidConfig(String),

    #[error("failed to parse pattern: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

impl RenderError {
    pub fn class(&self) -> ErrorClass {
        match self {
            RenderError::UnknownCommand { .. } | RenderError::Encode(_) => ErrorClass::Internal,
            _ => ErrorClass::Input,
        }
    }
}
