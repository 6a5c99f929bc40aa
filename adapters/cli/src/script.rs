use std::collections::BTreeMap;

use glam::Vec2;
use grid_snake_core::{Direction, Viewport};
use grid_snake_system_steering::{FrameInput, TouchPhase, TouchSample};
use thiserror::Error;

/// Recorded player input keyed by the frame it is delivered on.
///
/// Scripts are line based. Each non-empty line names a frame index followed
/// by an action; `#` starts a comment:
///
/// ```text
/// 12 key left
/// 30 touch began 200 400
/// 31 touch moved 60 410
/// 90 view 6 1.5
/// ```
///
/// A `view` line resizes the camera to the given orthographic size and
/// aspect ratio, shrinking or growing the area the head may occupy.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct InputScript {
    frames: BTreeMap<u64, FrameInput>,
    views: BTreeMap<u64, Viewport>,
}

impl InputScript {
    /// Parses a script from its textual representation.
    pub(crate) fn parse(source: &str) -> Result<Self, ScriptError> {
        let mut frames: BTreeMap<u64, FrameInput> = BTreeMap::new();
        let mut views = BTreeMap::new();

        for (index, raw) in source.lines().enumerate() {
            let line = index + 1;
            let content = raw.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }

            let mut fields = content.split_whitespace();
            let frame_field = fields.next().ok_or(ScriptError::MissingFrame { line })?;
            let frame = frame_field
                .parse::<u64>()
                .map_err(|_| ScriptError::InvalidFrame {
                    line,
                    value: frame_field.to_owned(),
                })?;
            let action = fields
                .next()
                .ok_or(ScriptError::MissingArgument { line })?;

            match action {
                "key" => {
                    let direction = parse_direction(line, fields.next())?;
                    frames.entry(frame).or_default().keys.push(direction);
                }
                "touch" => {
                    let phase = parse_phase(line, fields.next())?;
                    let x = parse_coordinate(line, fields.next())?;
                    let y = parse_coordinate(line, fields.next())?;
                    frames.entry(frame).or_default().touch =
                        Some(TouchSample::new(phase, Vec2::new(x, y)));
                }
                "view" => {
                    let orthographic_size = parse_coordinate(line, fields.next())?;
                    let aspect = parse_coordinate(line, fields.next())?;
                    let _ = views.insert(frame, Viewport::new(orthographic_size, aspect));
                }
                other => {
                    return Err(ScriptError::UnknownAction {
                        line,
                        action: other.to_owned(),
                    })
                }
            }

            if fields.next().is_some() {
                return Err(ScriptError::TrailingArguments { line });
            }
        }

        Ok(Self { frames, views })
    }

    /// Input delivered on `frame`; frames without entries yield no input.
    pub(crate) fn input_for(&self, frame: u64) -> FrameInput {
        self.frames.get(&frame).cloned().unwrap_or_default()
    }

    /// Camera change scheduled for `frame`, if any.
    pub(crate) fn viewport_for(&self, frame: u64) -> Option<Viewport> {
        self.views.get(&frame).copied()
    }

    /// Last frame that carries input, if any.
    pub(crate) fn last_frame(&self) -> Option<u64> {
        let last_input = self.frames.keys().next_back().copied();
        let last_view = self.views.keys().next_back().copied();
        last_input.max(last_view)
    }
}

fn parse_direction(line: usize, value: Option<&str>) -> Result<Direction, ScriptError> {
    let value = value.ok_or(ScriptError::MissingArgument { line })?;
    match value.to_ascii_lowercase().as_str() {
        "left" | "a" => Ok(Direction::Left),
        "right" | "d" => Ok(Direction::Right),
        "up" | "w" => Ok(Direction::Up),
        "down" | "s" => Ok(Direction::Down),
        _ => Err(ScriptError::UnknownDirection {
            line,
            value: value.to_owned(),
        }),
    }
}

fn parse_phase(line: usize, value: Option<&str>) -> Result<TouchPhase, ScriptError> {
    let value = value.ok_or(ScriptError::MissingArgument { line })?;
    match value.to_ascii_lowercase().as_str() {
        "began" => Ok(TouchPhase::Began),
        "moved" => Ok(TouchPhase::Moved),
        "ended" => Ok(TouchPhase::Ended),
        _ => Err(ScriptError::UnknownPhase {
            line,
            value: value.to_owned(),
        }),
    }
}

fn parse_coordinate(line: usize, value: Option<&str>) -> Result<f32, ScriptError> {
    let value = value.ok_or(ScriptError::MissingArgument { line })?;
    value
        .parse::<f32>()
        .ok()
        .filter(|coordinate| coordinate.is_finite())
        .ok_or_else(|| ScriptError::InvalidCoordinate {
            line,
            value: value.to_owned(),
        })
}

/// Errors that can occur while parsing input scripts.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum ScriptError {
    /// The line did not start with a frame index.
    #[error("line {line}: missing frame index")]
    MissingFrame {
        /// One-based line number.
        line: usize,
    },
    /// The frame index could not be parsed.
    #[error("line {line}: frame index '{value}' is not a non-negative integer")]
    InvalidFrame {
        /// One-based line number.
        line: usize,
        /// Offending field.
        value: String,
    },
    /// The action or one of its arguments was missing.
    #[error("line {line}: missing argument")]
    MissingArgument {
        /// One-based line number.
        line: usize,
    },
    /// The action is not `key`, `touch` or `view`.
    #[error("line {line}: unknown action '{action}'")]
    UnknownAction {
        /// One-based line number.
        line: usize,
        /// Offending field.
        action: String,
    },
    /// The direction name is not recognised.
    #[error("line {line}: unknown direction '{value}'")]
    UnknownDirection {
        /// One-based line number.
        line: usize,
        /// Offending field.
        value: String,
    },
    /// The touch phase is not recognised.
    #[error("line {line}: unknown touch phase '{value}'")]
    UnknownPhase {
        /// One-based line number.
        line: usize,
        /// Offending field.
        value: String,
    },
    /// A numeric argument is not a finite number.
    #[error("line {line}: '{value}' is not a finite number")]
    InvalidCoordinate {
        /// One-based line number.
        line: usize,
        /// Offending field.
        value: String,
    },
    /// The line carried more fields than its action accepts.
    #[error("line {line}: unexpected trailing arguments")]
    TrailingArguments {
        /// One-based line number.
        line: usize,
    },
}
