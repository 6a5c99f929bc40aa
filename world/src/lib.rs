#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative round state for the grid snake engine.

mod body;
mod steering;

use grid_snake_core::{
    Bounds, Cell, Command, Direction, EntityKind, Event, FoodPlacementError, GameOverReason,
    RoundState,
};
use log::{debug, info, warn};

pub use body::BodyChain;
pub use steering::{resolve_direction, DirectionBuffer};

const INITIAL_HEADING: Direction = Direction::Up;

/// Represents the state of a single round.
///
/// A round is never reset in place: once it reaches
/// [`RoundState::GameOver`] the owner discards it and constructs a new one.
#[derive(Debug)]
pub struct World {
    bounds: Bounds,
    body: BodyChain,
    food: Option<Cell>,
    steering: DirectionBuffer,
    state: RoundState,
    game_over_reason: Option<GameOverReason>,
    announced: bool,
    tick_index: u64,
    frame_index: u64,
}

impl World {
    /// Creates a round with the head at the origin heading up.
    ///
    /// The first tail segment waits just above the top edge and every further
    /// segment is stacked on it, so the tail unfolds behind the head as it
    /// moves. A head that leaves the board onto a still staged segment is
    /// reported as out of bounds rather than as a self collision.
    #[must_use]
    pub fn new(bounds: Bounds, starting_tail_length: u32) -> Self {
        let mut body = BodyChain::new(Cell::ORIGIN);
        if starting_tail_length > 0 {
            let staging = Cell::new(0, bounds.half_height().saturating_add(1));
            let mut cells = vec![Cell::ORIGIN];
            cells.extend(std::iter::repeat(staging).take(starting_tail_length as usize));
            if let Some(staged) = BodyChain::from_cells(cells) {
                body = staged;
            }
        }
        Self::with_body(bounds, body, INITIAL_HEADING)
    }

    /// Creates a round from an explicit chain and heading.
    #[must_use]
    pub fn with_body(bounds: Bounds, body: BodyChain, heading: Direction) -> Self {
        Self {
            bounds,
            body,
            food: None,
            steering: DirectionBuffer::new(heading),
            state: RoundState::Running,
            game_over_reason: None,
            announced: false,
            tick_index: 0,
            frame_index: 0,
        }
    }

    fn begin(&mut self, out_events: &mut Vec<Event>) {
        if self.announced {
            return;
        }
        self.announced = true;

        info!(
            "round started on a {}x{} board with {} cells",
            self.bounds.columns(),
            self.bounds.rows(),
            self.body.len()
        );
        out_events.push(Event::RoundStarted {
            bounds: self.bounds,
        });
        out_events.push(Event::EntitySpawned {
            kind: EntityKind::Head,
            cell: self.body.head(),
        });
        for &cell in self.body.segments() {
            out_events.push(Event::EntitySpawned {
                kind: EntityKind::Segment,
                cell,
            });
        }
        if let Some(cell) = self.food {
            out_events.push(Event::EntitySpawned {
                kind: EntityKind::Food,
                cell,
            });
        } else {
            out_events.push(Event::FoodRequested);
        }
    }

    fn step(&mut self, out_events: &mut Vec<Event>) {
        if self.state != RoundState::Running {
            return;
        }

        let requested = self.steering.candidate();
        let direction = self.steering.resolve();
        if let Some(requested) = requested {
            if requested != direction {
                out_events.push(Event::InputReversalIgnored {
                    requested,
                    heading: direction,
                });
            }
        }

        self.tick_index = self.tick_index.saturating_add(1);
        let from = self.body.head();
        let to = from.step(direction);
        self.body.advance(to);
        out_events.push(Event::HeadAdvanced {
            from,
            to,
            direction,
        });

        if self.bounds.contains(to) && self.body.contains_segment(to) {
            self.end_round(GameOverReason::SelfCollision, out_events);
            return;
        }

        if self.food == Some(to) {
            self.food = None;
            out_events.push(Event::EntityRemoved {
                kind: EntityKind::Food,
                cell: to,
            });
            let spawned = self.body.grow();
            debug!("food consumed at {to:?}; chain length {}", self.body.len());
            out_events.push(Event::FoodConsumed {
                cell: to,
                length: self.body.len(),
            });
            out_events.push(Event::EntitySpawned {
                kind: EntityKind::Segment,
                cell: spawned,
            });
            out_events.push(Event::FoodRequested);
        }
    }

    fn check_bounds(&mut self, bounds: Bounds, out_events: &mut Vec<Event>) {
        if self.state != RoundState::Running {
            return;
        }

        if !bounds.contains(self.body.head()) {
            self.end_round(GameOverReason::OutOfBounds, out_events);
        }
    }

    fn place_food(&mut self, cell: Cell, out_events: &mut Vec<Event>) {
        let rejection = if self.state != RoundState::Running {
            Some(FoodPlacementError::RoundOver)
        } else if self.food.is_some() {
            Some(FoodPlacementError::FoodPresent)
        } else if !self.bounds.inset_contains(cell) {
            Some(FoodPlacementError::OutsideInset)
        } else if self.body.cells().contains(&cell) {
            Some(FoodPlacementError::Occupied)
        } else {
            None
        };

        if let Some(reason) = rejection {
            warn!("rejected food placement at {cell:?}: {reason:?}");
            out_events.push(Event::FoodPlacementRejected { cell, reason });
            return;
        }

        debug!("food placed at {cell:?}");
        self.food = Some(cell);
        out_events.push(Event::EntitySpawned {
            kind: EntityKind::Food,
            cell,
        });
    }

    fn end_round(&mut self, reason: GameOverReason, out_events: &mut Vec<Event>) {
        self.state = RoundState::GameOver;
        self.game_over_reason = Some(reason);
        info!(
            "round over after {} ticks ({reason:?}); final length {}",
            self.tick_index,
            self.body.len()
        );
        out_events.push(Event::RoundOver { reason });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::BeginRound => world.begin(out_events),
        Command::SetInputDirection { direction } => {
            if world.state == RoundState::Running {
                world.steering.set_input_direction(direction);
            }
        }
        Command::Tick { dt } => {
            world.frame_index = world.frame_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::CheckBounds { bounds } => world.check_bounds(bounds, out_events),
        Command::Step => world.step(out_events),
        Command::PlaceFood { cell } => world.place_food(cell, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::collections::HashSet;

    use super::{BodyChain, World};
    use grid_snake_core::{Bounds, Cell, Direction, GameOverReason, RoundState};

    /// Bounds the round was constructed with.
    #[must_use]
    pub fn bounds(world: &World) -> Bounds {
        world.bounds
    }

    /// Provides read-only access to the body chain.
    #[must_use]
    pub fn body(world: &World) -> &BodyChain {
        &world.body
    }

    /// Cell currently occupied by the head.
    #[must_use]
    pub fn head(world: &World) -> Cell {
        world.body.head()
    }

    /// Cell holding the food item, if one is placed.
    #[must_use]
    pub fn food(world: &World) -> Option<Cell> {
        world.food
    }

    /// Direction applied by the most recent movement tick.
    #[must_use]
    pub fn heading(world: &World) -> Direction {
        world.steering.current()
    }

    /// Current lifecycle state of the round.
    #[must_use]
    pub fn round_state(world: &World) -> RoundState {
        world.state
    }

    /// Condition that ended the round, once it has ended.
    #[must_use]
    pub fn game_over_reason(world: &World) -> Option<GameOverReason> {
        world.game_over_reason
    }

    /// Number of movement ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Number of frames processed so far.
    #[must_use]
    pub fn frame_index(world: &World) -> u64 {
        world.frame_index
    }

    /// Collects every cell covered by the head or a segment.
    #[must_use]
    pub fn occupied_cells(world: &World) -> HashSet<Cell> {
        world.body.cells().iter().copied().collect()
    }
}
