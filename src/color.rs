//! Thread colors and the thread-index to RGB resolution policy.

use crate::error::RenderError;
use image::Rgb;
use serde::{Deserialize, Serialize};

/// Colors used when a pattern carries no thread table (DST and other
/// stitch-only formats): black, red, blue, green.
pub const DEFAULT_FALLBACK_PALETTE: [[u8; 3]; 4] =
    [[0, 0, 0], [255, 0, 0], [0, 0, 255], [0, 255, 0]];

/// One thread slot of a pattern. Order in the thread list is selection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ThreadRepr")]
pub struct ThreadColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_number: Option<String>,
}

/// Threads arrive either as channel objects or as `#RRGGBB` strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum ThreadRepr {
    Hex(String),
    Channels {
        red: u8,
        green: u8,
        blue: u8,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        catalog_number: Option<String>,
    },
}

impl TryFrom<ThreadRepr> for ThreadColor {
    type Error = RenderError;

    fn try_from(repr: ThreadRepr) -> Result<Self, Self::Error> {
        match repr {
            ThreadRepr::Hex(hex) => ThreadColor::from_hex(&hex),
            ThreadRepr::Channels {
                red,
                green,
                blue,
                description,
                catalog_number,
            } => Ok(ThreadColor {
                red,
                green,
                blue,
                description,
                catalog_number,
            }),
        }
    }
}

impl ThreadColor {
    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            description: None,
            catalog_number: None,
        }
    }

    /// Parse `#RRGGBB` (the `#` is optional, digits are case-insensitive).
    pub fn from_hex(hex: &str) -> Result<Self, RenderError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(RenderError::InvalidColor(format!(
                "expected #RRGGBB, got {:?}",
                hex
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| RenderError::InvalidColor(format!("bad hex digits in {:?}", hex)))
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(&self) -> String {
        rgb_to_hex(self.to_rgb())
    }

    pub fn to_rgb(&self) -> Rgb<u8> {
        Rgb([self.red, self.green, self.blue])
    }
}

pub fn rgb_to_hex(rgb: Rgb<u8>) -> String {
    let [r, g, b] = rgb.0;
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

pub fn default_fallback_palette() -> Vec<ThreadColor> {
    DEFAULT_FALLBACK_PALETTE
        .iter()
        .map(|&[r, g, b]| ThreadColor::rgb(r, g, b))
        .collect()
}

/// Maps a running thread index to a concrete color.
///
/// The pattern's own thread list wins when it is non-empty; otherwise the
/// fallback palette is used. Both are indexed cyclically, so a pattern may
/// change color more often than it declares threads.
#[derive(Debug, Clone, Copy)]
pub struct ColorResolver<'a> {
    threads: &'a [ThreadColor],
    fallback: &'a [ThreadColor],
}

impl<'a> ColorResolver<'a> {
    pub fn new(threads: &'a [ThreadColor], fallback: &'a [ThreadColor]) -> Self {
        Self { threads, fallback }
    }

    pub fn uses_fallback(&self) -> bool {
        self.threads.is_empty()
    }

    pub fn resolve(&self, index: usize) -> Rgb<u8> {
        let table = if self.threads.is_empty() {
            self.fallback
        } else {
            self.threads
        };
        if table.is_empty() {
            // Only reachable with an unvalidated config.
            return Rgb([0, 0, 0]);
        }
        table[index % table.len()].to_rgb()
    }
}

/// Resolve against the default fallback palette.
pub fn resolve(threads: &[ThreadColor], index: usize) -> Rgb<u8> {
    ColorResolver::new(threads, &default_fallback_palette()).resolve(index)
}
