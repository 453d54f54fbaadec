//! Stateful walk over the stitch sequence.
//!
//! The walk tracks where the needle last sewed and which thread is active,
//! and turns the command stream into an ordered list of line segments. It
//! never touches pixels; the rasterizer consumes its output.

use crate::bounds::{Bounds, CanvasPoint};
use crate::color::{rgb_to_hex, ColorResolver};
use crate::error::RenderError;
use crate::pattern::{CommandKind, Pattern};
use image::Rgb;
use serde::Serialize;

/// A straight run of thread between two canvas points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub from: CanvasPoint,
    pub to: CanvasPoint,
    pub color: Rgb<u8>,
}

/// What a single command asks of the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Draw(Segment),
    /// State changed, nothing to draw.
    Idle,
    Finish,
}

/// Pen state threaded through the walk. `position == None` means the pen is
/// lifted and the next stitch starts a fresh line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PenState {
    pub position: Option<CanvasPoint>,
    pub color_index: usize,
}

impl PenState {
    pub fn step(&mut self, kind: CommandKind, point: CanvasPoint, colors: &ColorResolver) -> Step {
        match kind {
            CommandKind::Stitch => {
                let step = match self.position {
                    Some(from) => Step::Draw(Segment {
                        from,
                        to: point,
                        color: colors.resolve(self.color_index),
                    }),
                    None => Step::Idle,
                };
                self.position = Some(point);
                step
            }
            CommandKind::Jump | CommandKind::Trim => {
                self.position = None;
                Step::Idle
            }
            // A thread swap happens where the needle already is; the pen stays put.
            CommandKind::ColorChange => {
                self.color_index += 1;
                Step::Idle
            }
            CommandKind::End => Step::Finish,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    pub commands_processed: usize,
    pub segments_drawn: usize,
    pub jumps: usize,
    pub trims: usize,
    pub color_changes: usize,
    pub used_fallback_palette: bool,
    /// Hex colors in first-use order.
    pub colors_used: Vec<String>,
    pub render_time_ms: u64,
}

impl RenderStats {
    fn record(&mut self, kind: CommandKind) {
        self.commands_processed += 1;
        match kind {
            CommandKind::Jump => self.jumps += 1,
            CommandKind::Trim => self.trims += 1,
            CommandKind::ColorChange => self.color_changes += 1,
            CommandKind::Stitch | CommandKind::End => {}
        }
    }

    fn record_segment(&mut self, segment: &Segment) {
        self.segments_drawn += 1;
        let hex = rgb_to_hex(segment.color);
        if !self.colors_used.contains(&hex) {
            self.colors_used.push(hex);
        }
    }
}

/// Segments in stitch order plus walk statistics.
#[derive(Debug, Clone, Default)]
pub struct Walk {
    pub segments: Vec<Segment>,
    pub stats: RenderStats,
}

/// Walk the whole pattern. Stops at the first `End`; an unknown command
/// code before that aborts with no segments returned.
pub fn interpret(
    pattern: &Pattern,
    bounds: &Bounds,
    padding: u32,
    colors: &ColorResolver,
) -> Result<Walk, RenderError> {
    let mut pen = PenState::default();
    let mut walk = Walk::default();
    walk.stats.used_fallback_palette = colors.uses_fallback();

    for (index, stitch) in pattern.stitches.iter().enumerate() {
        let kind = stitch.kind().ok_or(RenderError::UnknownCommand {
            index,
            code: stitch.command,
        })?;
        walk.stats.record(kind);

        let (x, y) = stitch
            .point()
            .ok_or(RenderError::MissingCoordinate { index })?;
        let point = bounds.project(x, y, padding);

        match pen.step(kind, point, colors) {
            Step::Draw(segment) => {
                walk.stats.record_segment(&segment);
                walk.segments.push(segment);
            }
            Step::Idle => {}
            Step::Finish => break,
        }
    }

    log::debug!(
        "Walked {} commands: {} segments, {} jumps, {} trims, {} color changes",
        walk.stats.commands_processed,
        walk.stats.segments_drawn,
        walk.stats.jumps,
        walk.stats.trims,
        walk.stats.color_changes
    );

    Ok(walk)
}
