use grid_snake_core::Direction;

/// Resolves a buffered candidate against the current heading.
///
/// A candidate that would reverse the head onto its own neck is dropped and
/// the current heading is kept.
#[must_use]
pub fn resolve_direction(current: Direction, candidate: Option<Direction>) -> Direction {
    match candidate {
        Some(requested) if requested != current.opposite() => requested,
        _ => current,
    }
}

/// Holds the current heading and the most recent unresolved input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirectionBuffer {
    current: Direction,
    candidate: Option<Direction>,
}

impl DirectionBuffer {
    /// Creates a buffer heading in `initial` with no pending input.
    #[must_use]
    pub const fn new(initial: Direction) -> Self {
        Self {
            current: initial,
            candidate: None,
        }
    }

    /// Direction applied by the most recent resolution.
    #[must_use]
    pub const fn current(&self) -> Direction {
        self.current
    }

    /// Input recorded since the last resolution, if any.
    #[must_use]
    pub const fn candidate(&self) -> Option<Direction> {
        self.candidate
    }

    /// Records a requested direction, replacing any earlier unresolved request.
    pub fn set_input_direction(&mut self, direction: Direction) {
        self.candidate = Some(direction);
    }

    /// Consumes the pending request and returns the heading for this tick.
    pub fn resolve(&mut self) -> Direction {
        let resolved = resolve_direction(self.current, self.candidate.take());
        self.current = resolved;
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    #[test]
    fn reversal_is_never_resolved() {
        for current in ALL {
            for requested in ALL {
                let resolved = resolve_direction(current, Some(requested));
                assert_ne!(resolved, current.opposite());
            }
        }
    }

    #[test]
    fn reversal_within_the_buffering_window_keeps_heading() {
        let mut buffer = DirectionBuffer::new(Direction::Up);
        buffer.set_input_direction(Direction::Down);
        assert_eq!(buffer.resolve(), Direction::Up);
        assert_eq!(buffer.current(), Direction::Up);
    }

    #[test]
    fn latest_input_before_a_tick_wins() {
        let mut buffer = DirectionBuffer::new(Direction::Up);
        buffer.set_input_direction(Direction::Left);
        buffer.set_input_direction(Direction::Right);
        assert_eq!(buffer.resolve(), Direction::Right);
    }

    #[test]
    fn overwritten_turn_is_lost_when_replaced_by_a_reversal() {
        let mut buffer = DirectionBuffer::new(Direction::Up);
        buffer.set_input_direction(Direction::Left);
        buffer.set_input_direction(Direction::Down);
        assert_eq!(buffer.resolve(), Direction::Up);
    }

    #[test]
    fn resolution_without_input_keeps_heading_and_clears_candidate() {
        let mut buffer = DirectionBuffer::new(Direction::Left);
        buffer.set_input_direction(Direction::Up);
        assert_eq!(buffer.resolve(), Direction::Up);
        assert!(buffer.candidate().is_none());
        assert_eq!(buffer.resolve(), Direction::Up);
    }

    #[test]
    fn reversal_becomes_legal_after_an_intermediate_turn() {
        let mut buffer = DirectionBuffer::new(Direction::Up);
        buffer.set_input_direction(Direction::Left);
        assert_eq!(buffer.resolve(), Direction::Left);
        buffer.set_input_direction(Direction::Down);
        assert_eq!(buffer.resolve(), Direction::Down);
    }
}
