use std::io::Write;

use anyhow::{Context, Result};
use grid_snake_core::{Cell, EntityKind, Event, RoundState};
use grid_snake_rendering::{BoardPresentation, Color, Palette, RenderingBackend, Scene};
use log::debug;

/// Rendering backend that draws scenes as ASCII frames.
#[derive(Debug)]
pub(crate) struct TextBackend<W> {
    out: W,
    palette: Palette,
    colored: bool,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend writing frames to `out`, optionally with ANSI colors.
    pub(crate) fn new(out: W, palette: Palette, colored: bool) -> Self {
        Self {
            out,
            palette,
            colored,
        }
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn observe(&mut self, events: &[Event]) -> Result<()> {
        for event in events {
            match event {
                Event::EntitySpawned { kind, cell } => debug!("spawn {kind:?} at {cell:?}"),
                Event::EntityRemoved { kind, cell } => debug!("remove {kind:?} at {cell:?}"),
                _ => {}
            }
        }
        Ok(())
    }

    fn present(&mut self, scene: &Scene) -> Result<()> {
        let frame = render_text(scene, self.colored.then_some(&self.palette));
        self.out
            .write_all(frame.as_bytes())
            .context("failed to write text frame")?;
        self.out.flush().context("failed to flush text frame")
    }
}

/// Draws the scene row by row from the top edge, framed by a border.
///
/// Entities are placed at the display position of their cell; anything that
/// falls outside the board is not drawn. With a palette, glyphs take their
/// entity color and every cell is filled with the background color.
pub(crate) fn render_text(scene: &Scene, palette: Option<&Palette>) -> String {
    let board = &scene.board;
    let columns = board.columns() as usize;
    let rows = board.rows() as usize;

    let mut slots: Vec<Option<EntityKind>> = vec![None; columns * rows];
    for (kind, cell) in scene.placements() {
        if let Some(index) = slot_index(board, cell) {
            slots[index] = Some(kind);
        }
    }

    let border = format!("+{}+\n", "-".repeat(columns));
    let mut frame = String::with_capacity((columns + 3) * (rows + 2));
    frame.push_str(&border);
    for row in slots.chunks(columns) {
        frame.push('|');
        for &kind in row {
            let glyph = match kind {
                Some(EntityKind::Head) if scene.round_state == RoundState::GameOver => 'X',
                Some(EntityKind::Head) => '@',
                Some(EntityKind::Segment) => 'o',
                Some(EntityKind::Food) => '*',
                None => ' ',
            };
            match palette {
                Some(palette) => frame.push_str(&paint(
                    glyph,
                    kind.map(|kind| palette.color_for(kind)),
                    palette.background,
                )),
                None => frame.push(glyph),
            }
        }
        frame.push_str("|\n");
    }
    frame.push_str(&border);
    frame
}

/// Index of the slot showing `cell`, counted from the top-left corner.
fn slot_index(board: &BoardPresentation, cell: Cell) -> Option<usize> {
    let position = board.cell_to_world(cell) / board.cell_length;
    let column = position.x.round() as i64 + i64::from(board.bounds.half_width());
    let row = i64::from(board.bounds.half_height()) - position.y.round() as i64;
    let columns = i64::from(board.columns());
    let rows = i64::from(board.rows());

    if (0..columns).contains(&column) && (0..rows).contains(&row) {
        usize::try_from(row * columns + column).ok()
    } else {
        None
    }
}

fn paint(glyph: char, foreground: Option<Color>, background: Color) -> String {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    let mut painted = format!(
        "\x1b[48;2;{};{};{}m",
        channel(background.red),
        channel(background.green),
        channel(background.blue)
    );
    if let Some(color) = foreground {
        painted.push_str(&format!(
            "\x1b[38;2;{};{};{}m",
            channel(color.red),
            channel(color.green),
            channel(color.blue)
        ));
    }
    painted.push(glyph);
    painted.push_str("\x1b[0m");
    painted
}
