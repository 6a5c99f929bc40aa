#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the grid snake engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

mod config;

use std::{ops::RangeInclusive, time::Duration};

use serde::{Deserialize, Serialize};

pub use config::{ConfigError, GameConfig, ViewportConfig};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Announces the starting layout of the round to collaborators.
    BeginRound,
    /// Records the most recent direction requested by the player.
    SetInputDirection {
        /// Direction the player asked the head to travel in.
        direction: Direction,
    },
    /// Advances the frame clock by the provided delta time.
    Tick {
        /// Duration of real time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Checks the head against the bounds derived from the current viewport.
    CheckBounds {
        /// Playable rectangle recomputed for the current frame.
        bounds: Bounds,
    },
    /// Moves the head one cell along the buffered direction.
    Step,
    /// Requests that food be placed at the provided cell.
    PlaceFood {
        /// Cell chosen by the food placement system.
        cell: Cell,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the round was announced with the provided bounds.
    RoundStarted {
        /// Playable rectangle the round was constructed with.
        bounds: Bounds,
    },
    /// Indicates that the frame clock advanced.
    TimeAdvanced {
        /// Duration of real time that elapsed in the frame.
        dt: Duration,
    },
    /// Reports that a new entity should appear at the provided cell.
    EntitySpawned {
        /// Kind of entity that was created.
        kind: EntityKind,
        /// Cell the entity occupies.
        cell: Cell,
    },
    /// Reports that an entity disappeared from the board.
    EntityRemoved {
        /// Kind of entity that was removed.
        kind: EntityKind,
        /// Cell the entity occupied before removal.
        cell: Cell,
    },
    /// Reports that a buffered reversal was dropped when the tick resolved it.
    InputReversalIgnored {
        /// Direction the player requested.
        requested: Direction,
        /// Direction the head kept travelling in.
        heading: Direction,
    },
    /// Confirms that the head moved one cell.
    HeadAdvanced {
        /// Cell the head occupied before the step.
        from: Cell,
        /// Cell the head occupies after the step.
        to: Cell,
        /// Direction resolved for the step.
        direction: Direction,
    },
    /// Confirms that the head consumed the food item.
    FoodConsumed {
        /// Cell the food occupied.
        cell: Cell,
        /// Number of cells in the body chain after growing, head included.
        length: usize,
    },
    /// Signals that the board has no food and a replacement should be placed.
    FoodRequested,
    /// Reports that a food placement request was rejected.
    FoodPlacementRejected {
        /// Cell provided in the placement request.
        cell: Cell,
        /// Specific reason the placement failed.
        reason: FoodPlacementError,
    },
    /// Announces that the round ended.
    RoundOver {
        /// Condition that ended the round.
        reason: GameOverReason,
    },
}

/// Location of a single grid cell on the integer board.
///
/// `x` grows to the right and `y` grows upward; the board is centred on the
/// origin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    x: i32,
    y: i32,
}

impl Cell {
    /// Cell at the centre of the board.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Creates a new grid cell.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the neighbouring cell one unit away in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// Cardinal movement directions available to the head.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing `x`.
    Left,
    /// Movement toward increasing `x`.
    Right,
    /// Movement toward increasing `y`.
    Up,
    /// Movement toward decreasing `y`.
    Down,
}

impl Direction {
    /// Returns the direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Unit step applied to a cell when moving in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Up => (0, 1),
            Self::Down => (0, -1),
        }
    }
}

/// Inclusive playable rectangle `[-half_width, half_width] × [-half_height, half_height]`.
///
/// Half extents always lie in `1..=Bounds::MAX_HALF_EXTENT`, including values
/// produced by deserialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "BoundsRepr")]
pub struct Bounds {
    half_width: i32,
    half_height: i32,
}

#[derive(Deserialize)]
struct BoundsRepr {
    half_width: i32,
    half_height: i32,
}

impl From<BoundsRepr> for Bounds {
    fn from(repr: BoundsRepr) -> Self {
        Self::new(repr.half_width, repr.half_height)
    }
}

impl Bounds {
    /// Largest half extent a board may have along either axis.
    pub const MAX_HALF_EXTENT: i32 = 1024;

    /// Creates bounds from half extents, clamping each to `1..=MAX_HALF_EXTENT`.
    #[must_use]
    pub const fn new(half_width: i32, half_height: i32) -> Self {
        Self {
            half_width: clamp_half_extent(half_width),
            half_height: clamp_half_extent(half_height),
        }
    }

    /// Largest absolute `x` still inside the bounds.
    #[must_use]
    pub const fn half_width(&self) -> i32 {
        self.half_width
    }

    /// Largest absolute `y` still inside the bounds.
    #[must_use]
    pub const fn half_height(&self) -> i32 {
        self.half_height
    }

    /// Number of cell columns inside the bounds.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.half_width as u32 * 2 + 1
    }

    /// Number of cell rows inside the bounds.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.half_height as u32 * 2 + 1
    }

    /// Reports whether the cell lies inside the bounds, edges included.
    #[must_use]
    pub const fn contains(&self, cell: Cell) -> bool {
        cell.x().unsigned_abs() <= self.half_width as u32
            && cell.y().unsigned_abs() <= self.half_height as u32
    }

    /// Columns of the inset region, one unit in from each side.
    #[must_use]
    pub fn inset_columns(&self) -> RangeInclusive<i32> {
        -(self.half_width - 1)..=self.half_width - 1
    }

    /// Rows of the inset region, one unit in from each side.
    #[must_use]
    pub fn inset_rows(&self) -> RangeInclusive<i32> {
        -(self.half_height - 1)..=self.half_height - 1
    }

    /// Reports whether the cell lies inside the inset region.
    #[must_use]
    pub fn inset_contains(&self, cell: Cell) -> bool {
        self.inset_columns().contains(&cell.x()) && self.inset_rows().contains(&cell.y())
    }

    /// Number of cells contained in the inset region.
    #[must_use]
    pub const fn inset_area(&self) -> u64 {
        let columns = (2 * (self.half_width as i64 - 1) + 1) as u64;
        let rows = (2 * (self.half_height as i64 - 1) + 1) as u64;
        columns * rows
    }
}

const fn clamp_half_extent(half_extent: i32) -> i32 {
    if half_extent < 1 {
        1
    } else if half_extent > Bounds::MAX_HALF_EXTENT {
        Bounds::MAX_HALF_EXTENT
    } else {
        half_extent
    }
}

/// Orthographic view onto the board supplied by the viewport collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    orthographic_size: f32,
    aspect: f32,
}

impl Viewport {
    /// Creates a viewport from its orthographic half-height and aspect ratio.
    #[must_use]
    pub const fn new(orthographic_size: f32, aspect: f32) -> Self {
        Self {
            orthographic_size,
            aspect,
        }
    }

    /// Half of the visible height measured in cells.
    #[must_use]
    pub const fn orthographic_size(&self) -> f32 {
        self.orthographic_size
    }

    /// Width divided by height of the visible area.
    #[must_use]
    pub const fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Returns the viewport after applying the zoom factor.
    ///
    /// Zooming in shrinks the orthographic size and therefore the board.
    /// Non-positive factors leave the viewport untouched.
    #[must_use]
    pub fn zoomed(self, zoom: f32) -> Self {
        if zoom <= 0.0 {
            return self;
        }

        Self {
            orthographic_size: self.orthographic_size / zoom,
            aspect: self.aspect,
        }
    }

    /// Derives the playable bounds visible through the viewport.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        let half_height = self.orthographic_size.floor() as i32;
        let half_width = (self.aspect * half_height as f32).floor() as i32;
        Bounds::new(half_width, half_height)
    }
}

/// Lifecycle state of a single round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundState {
    /// The head is moving and the round accepts input.
    Running,
    /// The round ended; only an external restart leaves this state.
    GameOver,
}

/// Condition that moved a round into [`RoundState::GameOver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOverReason {
    /// The head left the playable bounds.
    OutOfBounds,
    /// The head moved onto one of its own segments.
    SelfCollision,
}

/// Kinds of entities placed on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Leading cell of the body chain.
    Head,
    /// Any body cell following the head.
    Segment,
    /// Consumable item that grows the chain.
    Food,
}

/// Reasons a food placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodPlacementError {
    /// The round has ended, so the board no longer accepts food.
    RoundOver,
    /// Food is already present on the board.
    FoodPresent,
    /// The requested cell lies outside the inset region.
    OutsideInset,
    /// The requested cell is occupied by the head or a segment.
    Occupied,
}

#[cfg(test)]
mod tests {
    use super::{Bounds, Cell, Direction, Viewport};

    #[test]
    fn opposite_pairs_are_symmetric() {
        for direction in [
            Direction::Left,
            Direction::Right,
            Direction::Up,
            Direction::Down,
        ] {
            assert_ne!(direction.opposite(), direction);
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }

    #[test]
    fn step_moves_one_unit_along_the_axis() {
        let origin = Cell::ORIGIN;
        assert_eq!(origin.step(Direction::Up), Cell::new(0, 1));
        assert_eq!(origin.step(Direction::Down), Cell::new(0, -1));
        assert_eq!(origin.step(Direction::Left), Cell::new(-1, 0));
        assert_eq!(origin.step(Direction::Right), Cell::new(1, 0));
    }

    #[test]
    fn bounds_include_edges_and_reject_beyond() {
        let bounds = Bounds::new(10, 5);
        assert!(bounds.contains(Cell::new(10, -5)));
        assert!(bounds.contains(Cell::new(-10, 5)));
        assert!(!bounds.contains(Cell::new(11, 0)));
        assert!(!bounds.contains(Cell::new(0, -6)));
    }

    #[test]
    fn bounds_clamp_to_a_single_cell() {
        let bounds = Bounds::new(0, -3);
        assert_eq!(bounds.half_width(), 1);
        assert_eq!(bounds.half_height(), 1);
        assert_eq!(bounds.inset_area(), 1);
        assert!(bounds.inset_contains(Cell::ORIGIN));
    }

    #[test]
    fn bounds_clamp_to_the_largest_board() {
        let bounds = Bounds::new(i32::MAX, 3);
        assert_eq!(bounds.half_width(), Bounds::MAX_HALF_EXTENT);
        assert_eq!(bounds.columns(), 2049);
        assert_eq!(bounds.rows(), 7);

        let huge = Viewport::new(3.0e9, 1.6).bounds();
        assert_eq!(huge, Bounds::new(Bounds::MAX_HALF_EXTENT, Bounds::MAX_HALF_EXTENT));
    }

    #[test]
    fn deserialized_bounds_are_clamped() {
        let bytes = bincode::serialize(&(0_i32, i32::MAX)).expect("serialize");
        let bounds: Bounds = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(bounds, Bounds::new(1, Bounds::MAX_HALF_EXTENT));
        assert_eq!(bounds.inset_columns(), 0..=0);
    }

    #[test]
    fn inset_region_excludes_the_outer_ring() {
        let bounds = Bounds::new(3, 2);
        assert_eq!(bounds.inset_columns(), -2..=2);
        assert_eq!(bounds.inset_rows(), -1..=1);
        assert_eq!(bounds.inset_area(), 15);
        assert!(!bounds.inset_contains(Cell::new(3, 0)));
        assert!(!bounds.inset_contains(Cell::new(0, 2)));
    }

    #[test]
    fn viewport_bounds_follow_orthographic_size_and_aspect() {
        let viewport = Viewport::new(5.5, 16.0 / 9.0);
        let bounds = viewport.bounds();
        assert_eq!(bounds.half_height(), 5);
        assert_eq!(bounds.half_width(), 8);
    }

    #[test]
    fn zoom_shrinks_the_board() {
        let viewport = Viewport::new(10.0, 1.0).zoomed(2.0);
        assert_eq!(viewport.bounds(), Bounds::new(5, 5));
        assert_eq!(Viewport::new(10.0, 1.0).zoomed(0.0).bounds(), Bounds::new(10, 10));
    }

    #[test]
    fn board_types_round_trip_through_bincode() {
        let value = (Cell::new(-4, 7), Direction::Down, Bounds::new(12, 9));
        let bytes = bincode::serialize(&value).expect("serialize");
        let restored: (Cell, Direction, Bounds) = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, value);
    }
}
