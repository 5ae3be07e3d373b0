//! Delta encoding of glyph outlines.
//!
//! An outline arrives from a glyph source as a sequence of absolute
//! [events](OutlineEvent) in visit order. [`decompose`] folds that sequence
//! into the relative [command](PointCommand) form stored in glyph records:
//! each contour opens with an absolute `Move` and every following command
//! carries deltas from the pen position left by its predecessor. The
//! relative form compresses well and lets a renderer walk a glyph with
//! nothing but an accumulator.
//!
//! Only lines and quadratic curves have an encoded form. A cubic segment
//! anywhere in the event sequence fails the whole glyph; callers drop such
//! glyphs rather than approximating the curve.

use thiserror::Error;

/// Single element of a glyph outline, in absolute coordinates.
///
/// Coordinate values are whatever unit system the producing source uses;
/// the encoding below is unit agnostic. Contours are implicitly closed, so
/// there is no close event.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum OutlineEvent {
    /// Begin a new contour at (x, y).
    MoveTo { x: i32, y: i32 },
    /// Draw a line from the current point to (x, y).
    LineTo { x: i32, y: i32 },
    /// Draw a quadratic bezier from the current point with a control point
    /// at (cx0, cy0) and ending at (x, y).
    QuadTo { cx0: i32, cy0: i32, x: i32, y: i32 },
    /// Draw a cubic bezier from the current point with control points at
    /// (cx0, cy0) and (cx1, cy1) and ending at (x, y).
    ///
    /// Present so that sources can report everything they see; the encoder
    /// rejects it.
    CurveTo {
        cx0: i32,
        cy0: i32,
        cx1: i32,
        cy1: i32,
        x: i32,
        y: i32,
    },
}

/// Single command of a delta encoded outline.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PointCommand {
    /// Begin a new contour at an absolute position.
    Move { x: i32, y: i32 },
    /// Draw a line to the point one delta away from the pen.
    Line { dx: i32, dy: i32 },
    /// Draw a quadratic bezier: the control point is (cdx, cdy) away from
    /// the pen and the end point is (dx, dy) away from the control point.
    Quad {
        cdx: i32,
        cdy: i32,
        dx: i32,
        dy: i32,
    },
}

/// Type tag identifying a `Move` in the flattened form.
pub const MOVE_TAG: i32 = 1;
/// Type tag identifying a `Line` in the flattened form.
pub const LINE_TAG: i32 = 2;
/// Type tag identifying a `Quad` in the flattened form.
pub const QUAD_TAG: i32 = 3;

impl PointCommand {
    /// Appends the command to a flat numeric stream: the type tag followed
    /// by the command's values in order.
    pub fn push_flattened(&self, out: &mut Vec<i32>) {
        match *self {
            Self::Move { x, y } => out.extend_from_slice(&[MOVE_TAG, x, y]),
            Self::Line { dx, dy } => out.extend_from_slice(&[LINE_TAG, dx, dy]),
            Self::Quad { cdx, cdy, dx, dy } => {
                out.extend_from_slice(&[QUAD_TAG, cdx, cdy, dx, dy])
            }
        }
    }
}

/// Flattens a command sequence into the tagged numeric stream used by the
/// serialized glyph record.
pub fn flatten(commands: &[PointCommand]) -> Vec<i32> {
    let mut out = Vec::with_capacity(commands.len() * 3);
    for command in commands {
        command.push_flattened(&mut out);
    }
    out
}

/// Errors that may occur when delta encoding an outline.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Error)]
pub enum DecomposeError {
    /// The outline contains a cubic bezier segment.
    #[error("cubic curves have no delta encoded form")]
    CubicSegment,
}

/// Delta encodes one glyph outline.
///
/// Folds the event sequence in visit order, tracking the pen position:
/// `MoveTo` records an absolute point and every other event records deltas
/// as described on [`PointCommand`]. The pen starts at the origin.
///
/// Fails on the first [`OutlineEvent::CurveTo`]; a glyph with a cubic
/// segment has no encoded form at all.
pub fn decompose(events: &[OutlineEvent]) -> Result<Vec<PointCommand>, DecomposeError> {
    let mut commands = Vec::with_capacity(events.len());
    let mut pen = (0, 0);
    for event in events {
        match *event {
            OutlineEvent::MoveTo { x, y } => {
                commands.push(PointCommand::Move { x, y });
                pen = (x, y);
            }
            OutlineEvent::LineTo { x, y } => {
                commands.push(PointCommand::Line {
                    dx: x - pen.0,
                    dy: y - pen.1,
                });
                pen = (x, y);
            }
            OutlineEvent::QuadTo { cx0, cy0, x, y } => {
                commands.push(PointCommand::Quad {
                    cdx: cx0 - pen.0,
                    cdy: cy0 - pen.1,
                    dx: x - cx0,
                    dy: y - cy0,
                });
                pen = (x, y);
            }
            OutlineEvent::CurveTo { .. } => return Err(DecomposeError::CubicSegment),
        }
    }
    Ok(commands)
}

/// Replays a delta encoded outline back into absolute events.
///
/// Accumulates deltas from each `Move` onward, inverting [`decompose`]
/// exactly: coordinates are integers, so no precision is lost in either
/// direction.
pub fn replay(commands: &[PointCommand]) -> Vec<OutlineEvent> {
    let mut events = Vec::with_capacity(commands.len());
    let mut pen = (0, 0);
    for command in commands {
        match *command {
            PointCommand::Move { x, y } => {
                events.push(OutlineEvent::MoveTo { x, y });
                pen = (x, y);
            }
            PointCommand::Line { dx, dy } => {
                let (x, y) = (pen.0 + dx, pen.1 + dy);
                events.push(OutlineEvent::LineTo { x, y });
                pen = (x, y);
            }
            PointCommand::Quad { cdx, cdy, dx, dy } => {
                let (cx0, cy0) = (pen.0 + cdx, pen.1 + cdy);
                let (x, y) = (cx0 + dx, cy0 + dy);
                events.push(OutlineEvent::QuadTo { cx0, cy0, x, y });
                pen = (x, y);
            }
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_square() {
        let events = [
            OutlineEvent::MoveTo { x: 10, y: 10 },
            OutlineEvent::LineTo { x: 74, y: 10 },
            OutlineEvent::LineTo { x: 74, y: 74 },
            OutlineEvent::LineTo { x: 10, y: 74 },
        ];
        let commands = decompose(&events).unwrap();
        assert_eq!(
            commands,
            vec![
                PointCommand::Move { x: 10, y: 10 },
                PointCommand::Line { dx: 64, dy: 0 },
                PointCommand::Line { dx: 0, dy: 64 },
                PointCommand::Line { dx: -64, dy: 0 },
            ]
        );
    }

    #[test]
    fn quad_deltas_split_at_control() {
        // The end point delta is measured from the control point, not from
        // the previous pen position.
        let events = [
            OutlineEvent::MoveTo { x: 0, y: 0 },
            OutlineEvent::QuadTo {
                cx0: 32,
                cy0: 64,
                x: 64,
                y: 0,
            },
        ];
        let commands = decompose(&events).unwrap();
        assert_eq!(
            commands[1],
            PointCommand::Quad {
                cdx: 32,
                cdy: 64,
                dx: 32,
                dy: -64,
            }
        );
    }

    #[test]
    fn second_contour_restarts_absolute() {
        let events = [
            OutlineEvent::MoveTo { x: 100, y: 0 },
            OutlineEvent::LineTo { x: 200, y: 0 },
            OutlineEvent::MoveTo { x: -40, y: -40 },
            OutlineEvent::LineTo { x: -40, y: 60 },
        ];
        let commands = decompose(&events).unwrap();
        assert_eq!(commands[2], PointCommand::Move { x: -40, y: -40 });
        assert_eq!(commands[3], PointCommand::Line { dx: 0, dy: 100 });
    }

    #[test]
    fn cubic_anywhere_fails_the_glyph() {
        let cubic = OutlineEvent::CurveTo {
            cx0: 1,
            cy0: 2,
            cx1: 3,
            cy1: 4,
            x: 5,
            y: 6,
        };
        let events = [
            OutlineEvent::MoveTo { x: 0, y: 0 },
            OutlineEvent::LineTo { x: 10, y: 0 },
            cubic,
            OutlineEvent::LineTo { x: 0, y: 0 },
        ];
        assert_eq!(decompose(&events), Err(DecomposeError::CubicSegment));
        assert_eq!(decompose(&[cubic]), Err(DecomposeError::CubicSegment));
    }

    #[test]
    fn empty_outline_encodes_empty() {
        assert_eq!(decompose(&[]), Ok(vec![]));
    }

    #[test]
    fn replay_round_trips() {
        let events = vec![
            OutlineEvent::MoveTo { x: 10, y: -20 },
            OutlineEvent::QuadTo {
                cx0: 15,
                cy0: 44,
                x: 60,
                y: 44,
            },
            OutlineEvent::LineTo { x: 60, y: -20 },
            OutlineEvent::MoveTo { x: 0, y: 0 },
            OutlineEvent::QuadTo {
                cx0: -8,
                cy0: -8,
                x: -16,
                y: 0,
            },
        ];
        let commands = decompose(&events).unwrap();
        assert_eq!(replay(&commands), events);
    }

    #[test]
    fn flatten_tags_each_command() {
        let commands = [
            PointCommand::Move { x: 5, y: 6 },
            PointCommand::Line { dx: -1, dy: 2 },
            PointCommand::Quad {
                cdx: 3,
                cdy: 4,
                dx: 5,
                dy: -6,
            },
        ];
        assert_eq!(flatten(&commands), vec![1, 5, 6, 2, -1, 2, 3, 3, 4, 5, -6]);
    }
}
