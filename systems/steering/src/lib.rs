#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Steering system that turns raw player input into direction requests.
//!
//! Keyboard presses and swipe gestures are folded into at most one
//! [`Command::SetInputDirection`] per frame. Whether the request survives is
//! decided by the world when the next movement tick resolves it.

use glam::Vec2;
use grid_snake_core::{Command, Direction, Event};

/// Phase of a touch sample reported by the input collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// The finger touched the screen.
    Began,
    /// The finger moved while touching the screen.
    Moved,
    /// The finger left the screen.
    Ended,
}

/// Position of the first active touch during a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchSample {
    /// Lifecycle phase of the touch.
    pub phase: TouchPhase,
    /// Screen position of the touch in input units.
    pub position: Vec2,
}

impl TouchSample {
    /// Creates a new touch sample.
    #[must_use]
    pub const fn new(phase: TouchPhase, position: Vec2) -> Self {
        Self { phase, position }
    }
}

/// Input snapshot gathered by adapters before updating the simulation.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Direction keys pressed down during this frame.
    pub keys: Vec<Direction>,
    /// First active touch observed during this frame.
    pub touch: Option<TouchSample>,
}

/// Configuration parameters required to construct the steering system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    swipe_threshold: f32,
}

impl Config {
    /// Creates a new configuration using the provided swipe threshold.
    #[must_use]
    pub const fn new(swipe_threshold: f32) -> Self {
        Self { swipe_threshold }
    }
}

/// Pure system that maps keys and swipes onto direction requests.
#[derive(Debug)]
pub struct Steering {
    swipe_threshold: f32,
    touch_start: Vec2,
    touch_end: Vec2,
}

impl Steering {
    /// Creates a new steering system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            swipe_threshold: config.swipe_threshold,
            touch_start: Vec2::ZERO,
            touch_end: Vec2::ZERO,
        }
    }

    /// Consumes world events and frame input to emit direction requests.
    ///
    /// Every movement tick restarts the drag at its current end point, so a
    /// held finger can chain several swipes without lifting.
    pub fn handle(&mut self, events: &[Event], input: &FrameInput, out: &mut Vec<Command>) {
        if events
            .iter()
            .any(|event| matches!(event, Event::HeadAdvanced { .. }))
        {
            self.touch_start = self.touch_end;
        }

        if let Some(sample) = input.touch {
            self.record_touch(sample);
        }

        let candidate = swipe_direction(self.touch_start, self.touch_end, self.swipe_threshold)
            .or_else(|| keyboard_direction(&input.keys));

        if let Some(direction) = candidate {
            out.push(Command::SetInputDirection { direction });
        }
    }

    /// Current drag vector from the touch origin to the latest sample.
    #[must_use]
    pub fn drag(&self) -> Vec2 {
        self.touch_end - self.touch_start
    }

    fn record_touch(&mut self, sample: TouchSample) {
        match sample.phase {
            TouchPhase::Began => {
                self.touch_start = sample.position;
                self.touch_end = sample.position;
            }
            TouchPhase::Moved | TouchPhase::Ended => self.touch_end = sample.position,
        }
    }
}

/// Maps the keys pressed in a frame onto a single direction.
///
/// Horizontal keys are read first and vertical keys override them. Within an
/// axis Left beats Right and Down beats Up.
#[must_use]
pub fn keyboard_direction(keys: &[Direction]) -> Option<Direction> {
    let pressed = |direction| keys.contains(&direction);

    let vertical = if pressed(Direction::Down) {
        Some(Direction::Down)
    } else if pressed(Direction::Up) {
        Some(Direction::Up)
    } else {
        None
    };
    let horizontal = if pressed(Direction::Left) {
        Some(Direction::Left)
    } else if pressed(Direction::Right) {
        Some(Direction::Right)
    } else {
        None
    };

    vertical.or(horizontal)
}

/// Maps a drag onto a direction when it travels further than `threshold`.
///
/// Each axis is tested on its own; when both exceed the threshold the
/// vertical axis wins.
#[must_use]
pub fn swipe_direction(start: Vec2, end: Vec2, threshold: f32) -> Option<Direction> {
    let drag = end - start;

    let horizontal = if drag.x.abs() > threshold {
        axis_direction(drag.x, Direction::Left, Direction::Right)
    } else {
        None
    };
    let vertical = if drag.y.abs() > threshold {
        axis_direction(drag.y, Direction::Down, Direction::Up)
    } else {
        None
    };

    vertical.or(horizontal)
}

fn axis_direction(delta: f32, negative: Direction, positive: Direction) -> Option<Direction> {
    if delta < 0.0 {
        Some(negative)
    } else if delta > 0.0 {
        Some(positive)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_drag_yields_nothing() {
        let start = Vec2::new(10.0, 10.0);
        assert_eq!(swipe_direction(start, Vec2::new(110.0, 60.0), 100.0), None);
    }

    #[test]
    fn threshold_must_be_exceeded_strictly() {
        assert_eq!(
            swipe_direction(Vec2::ZERO, Vec2::new(-100.0, 0.0), 100.0),
            None
        );
        assert_eq!(
            swipe_direction(Vec2::ZERO, Vec2::new(-100.5, 0.0), 100.0),
            Some(Direction::Left)
        );
    }

    #[test]
    fn vertical_axis_overrides_horizontal() {
        assert_eq!(
            swipe_direction(Vec2::ZERO, Vec2::new(300.0, -150.0), 100.0),
            Some(Direction::Down)
        );
    }

    #[test]
    fn vertical_keys_override_horizontal_keys() {
        assert_eq!(
            keyboard_direction(&[Direction::Right, Direction::Up]),
            Some(Direction::Up)
        );
        assert_eq!(
            keyboard_direction(&[Direction::Right, Direction::Left]),
            Some(Direction::Left)
        );
        assert_eq!(
            keyboard_direction(&[Direction::Up, Direction::Down]),
            Some(Direction::Down)
        );
        assert_eq!(keyboard_direction(&[]), None);
    }

    #[test]
    fn began_resets_both_drag_endpoints() {
        let mut steering = Steering::new(Config::new(100.0));
        let mut commands = Vec::new();
        let input = FrameInput {
            keys: Vec::new(),
            touch: Some(TouchSample::new(TouchPhase::Began, Vec2::new(40.0, 40.0))),
        };
        steering.handle(&[], &input, &mut commands);

        assert_eq!(steering.drag(), Vec2::ZERO);
        assert!(commands.is_empty());
    }
}
