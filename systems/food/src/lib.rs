#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic food placement system responsible for emitting food commands.

use std::collections::HashSet;

use grid_snake_core::{Bounds, Cell, Command, Event, FoodPlacementError};
use log::warn;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of inset-area multiples drawn before sampling is reported as slow.
const SLOW_SAMPLING_FACTOR: u64 = 8;

/// Configuration parameters required to construct the food placement system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that answers food requests with placement commands.
#[derive(Debug)]
pub struct FoodPlacement {
    rng: ChaCha8Rng,
}

impl FoodPlacement {
    /// Creates a new food placement system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes world events and the occupied cells to emit placement commands.
    ///
    /// At most one placement is emitted per batch since the board holds a
    /// single food item. Placements rejected for landing on a bad cell are
    /// retried; every other rejection is final.
    pub fn handle(
        &mut self,
        events: &[Event],
        bounds: Bounds,
        occupied: &HashSet<Cell>,
        out: &mut Vec<Command>,
    ) {
        let needs_food = events.iter().any(|event| match event {
            Event::FoodRequested => true,
            Event::FoodPlacementRejected { reason, .. } => matches!(
                reason,
                FoodPlacementError::Occupied | FoodPlacementError::OutsideInset
            ),
            _ => false,
        });

        if needs_food {
            let cell = spawn(&mut self.rng, bounds, occupied);
            out.push(Command::PlaceFood { cell });
        }
    }
}

/// Draws random cells from the inset region until one is not occupied.
///
/// The loop has no iteration cap. When `occupied` covers every cell of the
/// inset region it never returns; callers rely on the board always being
/// larger than the chain. A warning is logged once sampling has taken several
/// times the inset area in draws.
pub fn spawn<R>(rng: &mut R, bounds: Bounds, occupied: &HashSet<Cell>) -> Cell
where
    R: Rng + ?Sized,
{
    let columns = bounds.inset_columns();
    let rows = bounds.inset_rows();
    let slow_after = bounds.inset_area().saturating_mul(SLOW_SAMPLING_FACTOR);

    let mut attempts: u64 = 0;
    loop {
        let cell = Cell::new(
            rng.gen_range(columns.clone()),
            rng.gen_range(rows.clone()),
        );
        if !occupied.contains(&cell) {
            return cell;
        }

        attempts = attempts.saturating_add(1);
        if attempts == slow_after {
            warn!(
                "food placement still searching after {attempts} draws; {} of {} inset cells occupied",
                occupied.iter().filter(|cell| bounds.inset_contains(**cell)).count(),
                bounds.inset_area()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_free_cell_is_found() {
        let bounds = Bounds::new(2, 2);
        let free = Cell::new(1, -1);
        let occupied: HashSet<Cell> = bounds
            .inset_columns()
            .flat_map(|x| bounds.inset_rows().map(move |y| Cell::new(x, y)))
            .filter(|&cell| cell != free)
            .collect();

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(spawn(&mut rng, bounds, &occupied), free);
    }

    #[test]
    fn minimal_board_places_at_the_origin() {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        assert_eq!(
            spawn(&mut rng, Bounds::new(1, 1), &HashSet::new()),
            Cell::ORIGIN
        );
    }

    #[test]
    fn same_seed_reproduces_the_same_sequence() {
        let bounds = Bounds::new(12, 8);
        let occupied = HashSet::from([Cell::ORIGIN]);
        let mut first = ChaCha8Rng::seed_from_u64(0x1234);
        let mut second = ChaCha8Rng::seed_from_u64(0x1234);

        for _ in 0..32 {
            assert_eq!(
                spawn(&mut first, bounds, &occupied),
                spawn(&mut second, bounds, &occupied)
            );
        }
    }
}
