#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for grid snake adapters.
//!
//! Backends never read the world directly. They receive entity lifetime
//! events as the simulation emits them and a [`Scene`] snapshot assembled by
//! the adapter once per frame.

use anyhow::Result as AnyResult;
use glam::Vec2;
use grid_snake_core::{Bounds, Cell, EntityKind, Event, RoundState};
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Colors assigned to each kind of entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Color used when clearing the board.
    pub background: Color,
    /// Color of the head.
    pub head: Color,
    /// Color of the segments trailing the head.
    pub segment: Color,
    /// Color of the food item.
    pub food: Color,
}

impl Palette {
    /// Color assigned to the provided entity kind.
    #[must_use]
    pub const fn color_for(&self, kind: EntityKind) -> Color {
        match kind {
            EntityKind::Head => self.head,
            EntityKind::Segment => self.segment,
            EntityKind::Food => self.food,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        let head = Color::from_rgb_u8(0x2f, 0x95, 0x32);
        Self {
            background: Color::from_rgb_u8(0x10, 0x10, 0x10),
            head,
            segment: head.lighten(0.35),
            food: Color::from_rgb_u8(0xc8, 0x2a, 0x36),
        }
    }
}

/// Maps board cells onto display coordinates.
///
/// The origin cell sits at the centre of the display, `y` points up and each
/// cell spans `cell_length` display units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardPresentation {
    /// Playable bounds of the round.
    pub bounds: Bounds,
    /// Side length of a single cell expressed in display units.
    pub cell_length: f32,
}

impl BoardPresentation {
    /// Creates a new board descriptor.
    ///
    /// Returns an error when `cell_length` is not a positive finite number.
    pub fn new(bounds: Bounds, cell_length: f32) -> Result<Self, RenderingError> {
        if !(cell_length.is_finite() && cell_length > 0.0) {
            return Err(RenderingError::InvalidCellLength { cell_length });
        }

        Ok(Self {
            bounds,
            cell_length,
        })
    }

    /// Display position of the centre of `cell`.
    #[must_use]
    pub fn cell_to_world(&self, cell: Cell) -> Vec2 {
        Vec2::new(cell.x() as f32, cell.y() as f32) * self.cell_length
    }

    /// Number of cell columns inside the bounds.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.bounds.columns()
    }

    /// Number of cell rows inside the bounds.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.bounds.rows()
    }
}

/// Scene description combining the board and its inhabitants.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Board the scene is drawn on.
    pub board: BoardPresentation,
    /// Cells of the chain, head first.
    pub chain: Vec<Cell>,
    /// Cell holding the food item, if one is placed.
    pub food: Option<Cell>,
    /// Lifecycle state of the round being shown.
    pub round_state: RoundState,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        board: BoardPresentation,
        chain: Vec<Cell>,
        food: Option<Cell>,
        round_state: RoundState,
    ) -> Self {
        Self {
            board,
            chain,
            food,
            round_state,
        }
    }

    /// Cell occupied by the head, if the chain is present.
    #[must_use]
    pub fn head(&self) -> Option<Cell> {
        self.chain.first().copied()
    }

    /// Entities in drawing order: food, then segments, then the head.
    ///
    /// Drawing in this order lets the head cover a segment sharing its cell.
    pub fn placements(&self) -> impl Iterator<Item = (EntityKind, Cell)> + '_ {
        let food = self.food.map(|cell| (EntityKind::Food, cell));
        let segments = self
            .chain
            .iter()
            .skip(1)
            .map(|&cell| (EntityKind::Segment, cell));
        let head = self.head().map(|cell| (EntityKind::Head, cell));
        food.into_iter().chain(segments).chain(head)
    }
}

/// Rendering backend capable of presenting grid snake scenes.
pub trait RenderingBackend {
    /// Receives entity lifetime events in the order the simulation emitted them.
    ///
    /// Backends that manage per-entity visuals create them on
    /// [`Event::EntitySpawned`] and release them on [`Event::EntityRemoved`].
    fn observe(&mut self, events: &[Event]) -> AnyResult<()> {
        let _ = events;
        Ok(())
    }

    /// Presents the scene for the current frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum RenderingError {
    /// Cells must have a positive size.
    #[error("cell_length must be positive (received {cell_length})")]
    InvalidCellLength {
        /// Provided cell length that failed validation.
        cell_length: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_creation_rejects_zero_cell_length_without_panicking() {
        let error = BoardPresentation::new(Bounds::new(4, 4), 0.0)
            .expect_err("zero cell_length must be rejected");

        assert!(matches!(
            error,
            RenderingError::InvalidCellLength { cell_length } if cell_length == 0.0
        ));
    }

    #[test]
    fn cells_map_to_centred_display_coordinates() {
        let board = BoardPresentation::new(Bounds::new(4, 3), 32.0).expect("valid board");

        assert_eq!(board.cell_to_world(Cell::ORIGIN), Vec2::ZERO);
        assert_eq!(board.cell_to_world(Cell::new(-2, 3)), Vec2::new(-64.0, 96.0));
        assert_eq!(board.columns(), 9);
        assert_eq!(board.rows(), 7);
    }

    #[test]
    fn largest_board_dimensions_do_not_overflow() {
        let board =
            BoardPresentation::new(Bounds::new(i32::MAX, i32::MAX), 1.0).expect("valid board");
        assert_eq!(board.columns(), 2049);
        assert_eq!(board.rows(), 2049);
    }

    #[test]
    fn head_is_placed_last() {
        let board = BoardPresentation::new(Bounds::new(4, 4), 1.0).expect("valid board");
        let scene = Scene::new(
            board,
            vec![Cell::new(0, -1), Cell::ORIGIN, Cell::new(0, -1)],
            Some(Cell::new(2, 2)),
            RoundState::GameOver,
        );

        assert_eq!(
            scene.placements().collect::<Vec<_>>(),
            vec![
                (EntityKind::Food, Cell::new(2, 2)),
                (EntityKind::Segment, Cell::ORIGIN),
                (EntityKind::Segment, Cell::new(0, -1)),
                (EntityKind::Head, Cell::new(0, -1)),
            ]
        );
    }

    #[test]
    fn default_palette_lightens_segments_from_the_head() {
        let palette = Palette::default();
        assert_eq!(palette.color_for(EntityKind::Segment), palette.head.lighten(0.35));
        assert!(palette.segment.green > palette.head.green);
    }
}
