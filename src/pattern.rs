//! Parsed embroidery pattern as handed over by the format parser.

use crate::color::ThreadColor;
use crate::error::RenderError;
use serde::{Deserialize, Serialize};

/// The closed set of stitch commands the interpreter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Stitch,
    Jump,
    Trim,
    ColorChange,
    End,
}

impl CommandKind {
    // Numbering follows pyembroidery, which most upstream parsers emit.
    pub const STITCH: u32 = 0;
    pub const JUMP: u32 = 1;
    pub const TRIM: u32 = 2;
    pub const END: u32 = 4;
    pub const COLOR_CHANGE: u32 = 5;

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            Self::STITCH => Some(CommandKind::Stitch),
            Self::JUMP => Some(CommandKind::Jump),
            Self::TRIM => Some(CommandKind::Trim),
            Self::END => Some(CommandKind::End),
            Self::COLOR_CHANGE => Some(CommandKind::ColorChange),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        match self {
            CommandKind::Stitch => Self::STITCH,
            CommandKind::Jump => Self::JUMP,
            CommandKind::Trim => Self::TRIM,
            CommandKind::End => Self::END,
            CommandKind::ColorChange => Self::COLOR_CHANGE,
        }
    }
}

/// One stitch record in pattern space.
///
/// The command is kept as the parser's raw code so that a broken parser
/// contract surfaces as an error during the walk instead of at load time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "StitchRepr")]
pub struct StitchCommand {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub command: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StitchRepr {
    Triple(Option<f64>, Option<f64>, u32),
    Record {
        x: Option<f64>,
        y: Option<f64>,
        command: u32,
    },
}

impl From<StitchRepr> for StitchCommand {
    fn from(repr: StitchRepr) -> Self {
        match repr {
            StitchRepr::Triple(x, y, command) | StitchRepr::Record { x, y, command } => {
                StitchCommand { x, y, command }
            }
        }
    }
}

impl StitchCommand {
    pub fn new(x: f64, y: f64, kind: CommandKind) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            command: kind.code(),
        }
    }

    pub fn kind(&self) -> Option<CommandKind> {
        CommandKind::from_code(self.command)
    }

    /// Both coordinates, if present and finite.
    pub fn point(&self) -> Option<(f64, f64)> {
        match (self.x, self.y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((x, y)),
            _ => None,
        }
    }
}

/// Stitch list plus thread table. Read-only for the whole render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub stitches: Vec<StitchCommand>,
    #[serde(default, alias = "threadlist")]
    pub threads: Vec<ThreadColor>,
}

impl Pattern {
    pub fn new(stitches: Vec<StitchCommand>, threads: Vec<ThreadColor>) -> Self {
        Self { stitches, threads }
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, RenderError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
