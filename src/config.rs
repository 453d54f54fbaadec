use crate::color::{default_fallback_palette, ThreadColor};
use crate::error::RenderError;
use image::Rgba;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STROKE_WIDTH: u32 = 2;
pub const DEFAULT_MAX_CANVAS_PIXELS: u64 = 64_000_000;
/// Margin used by the white-background preview preset.
pub const PREVIEW_PADDING: u32 = 20;

/// Canvas fill. `"transparent"` or `{"color": "#RRGGBB"}` in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    Transparent,
    Color(ThreadColor),
}

impl Background {
    pub fn white() -> Self {
        Background::Color(ThreadColor::rgb(255, 255, 255))
    }

    pub fn to_rgba(&self) -> Rgba<u8> {
        match self {
            Background::Transparent => Rgba([255, 255, 255, 0]),
            Background::Color(c) => Rgba([c.red, c.green, c.blue, 255]),
        }
    }

    /// Accepts `transparent`, `white` or a `#RRGGBB` color.
    pub fn parse(value: &str) -> Result<Self, RenderError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "transparent" | "none" => Ok(Background::Transparent),
            "white" => Ok(Background::white()),
            _ => ThreadColor::from_hex(value).map(Background::Color),
        }
    }
}

/// Render options. The background has no default and must always be chosen
/// by the caller; everything else falls back to overlay-style values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub padding: u32,
    pub background: Background,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: u32,
    #[serde(default = "default_fallback_palette")]
    pub fallback_palette: Vec<ThreadColor>,
    #[serde(default = "default_max_canvas_pixels")]
    pub max_canvas_pixels: u64,
}

fn default_stroke_width() -> u32 {
    DEFAULT_STROKE_WIDTH
}

fn default_max_canvas_pixels() -> u64 {
    DEFAULT_MAX_CANVAS_PIXELS
}

impl RenderConfig {
    pub fn new(background: Background) -> Self {
        Self {
            padding: 0,
            background,
            stroke_width: DEFAULT_STROKE_WIDTH,
            fallback_palette: default_fallback_palette(),
            max_canvas_pixels: DEFAULT_MAX_CANVAS_PIXELS,
        }
    }

    /// Transparent, unpadded canvas for compositing over a garment mockup.
    pub fn overlay() -> Self {
        Self::new(Background::Transparent)
    }

    /// Opaque white canvas with a visual margin and hairline strokes.
    pub fn preview() -> Self {
        Self {
            padding: PREVIEW_PADDING,
            stroke_width: 1,
            ..Self::new(Background::white())
        }
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, RenderError> {
        let config: RenderConfig = serde_json::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        if self.stroke_width == 0 {
            return Err(RenderError::InvalidConfig(
                "stroke_width must be at least 1".to_string(),
            ));
        }
        if self.max_canvas_pixels == 0 {
            return Err(RenderError::InvalidConfig(
                "max_canvas_pixels must be positive".to_string(),
            ));
        }
        if self.fallback_palette.is_empty() {
            return Err(RenderError::InvalidConfig(
                "fallback_palette must contain at least one color".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_is_required_in_json() {
        let err = RenderConfig::from_json(br#"{"padding": 10}"#).unwrap_err();
        assert!(matches!(err, RenderError::Parse(_)));
    }

    #[test]
    fn json_fills_in_defaults() {
        let config = RenderConfig::from_json(br#"{"background": "transparent"}"#)
            .expect("minimal config should parse");
        assert_eq!(config, RenderConfig::overlay());
    }

    #[test]
    fn json_accepts_colored_background_and_palette() {
        let config = RenderConfig::from_json(
            br##"{
                "padding": 12,
                "background": {"color": "#FFFFFF"},
                "stroke_width": 3,
                "fallback_palette": ["#112233"],
                "max_canvas_pixels": 1000
            }"##,
        )
        .expect("full config should parse");
        assert_eq!(config.background, Background::white());
        assert_eq!(config.background.to_rgba(), Rgba([255, 255, 255, 255]));
        assert_eq!(config.fallback_palette, vec![ThreadColor::rgb(0x11, 0x22, 0x33)]);
        assert_eq!(config.stroke_width, 3);
        assert_eq!(config.max_canvas_pixels, 1000);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = RenderConfig::preview();
        config.stroke_width = 0;
        assert!(matches!(config.validate(), Err(RenderError::InvalidConfig(_))));

        let mut config = RenderConfig::overlay();
        config.fallback_palette.clear();
        assert!(matches!(config.validate(), Err(RenderError::InvalidConfig(_))));

        let mut config = RenderConfig::overlay();
        config.max_canvas_pixels = 0;
        assert!(matches!(config.validate(), Err(RenderError::InvalidConfig(_))));
    }

    #[test]
    fn background_parses_cli_spellings() {
        assert_eq!(Background::parse("transparent").unwrap(), Background::Transparent);
        assert_eq!(Background::parse("White").unwrap(), Background::white());
        assert_eq!(
            Background::parse("#000000").unwrap(),
            Background::Color(ThreadColor::rgb(0, 0, 0))
        );
        assert!(Background::parse("mauve").is_err());
    }
}
