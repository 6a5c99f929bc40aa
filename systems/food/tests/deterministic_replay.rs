use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use grid_snake_core::{Bounds, Cell, Command, Direction, Event, RoundState};
use grid_snake_system_food::{Config, FoodPlacement};
use grid_snake_world::{self as world, query, World};

#[test]
fn deterministic_replay_is_reproducible() {
    let first = replay(0x5eed);
    let second = replay(0x5eed);

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(first.chain.len() >= 4);
}

#[test]
fn replayed_food_never_lands_on_the_chain() {
    for seed in [1_u64, 2, 3, 0xdead_beef] {
        let outcome = replay(seed);
        for (food, chain) in &outcome.snapshots {
            if let Some(food) = food {
                assert!(!chain.contains(food), "seed {seed}: food {food:?} on chain");
            }
        }
    }
}

fn replay(seed: u64) -> ReplayOutcome {
    let bounds = Bounds::new(6, 6);
    let mut world = World::new(bounds, 3);
    let mut food = FoodPlacement::new(Config::new(seed));
    let mut log = Vec::new();
    let mut snapshots = Vec::new();

    let mut events = Vec::new();
    world::apply(&mut world, Command::BeginRound, &mut events);
    place_food(&mut world, &mut food, &mut events);
    log.extend(events);

    for command in scripted_commands() {
        if query::round_state(&world) != RoundState::Running {
            break;
        }

        let mut events = Vec::new();
        world::apply(&mut world, command, &mut events);
        world::apply(&mut world, Command::CheckBounds { bounds }, &mut events);
        place_food(&mut world, &mut food, &mut events);
        log.extend(events);
        snapshots.push((query::food(&world), query::body(&world).cells().to_vec()));
    }

    ReplayOutcome {
        chain: query::body(&world).cells().to_vec(),
        events: log,
        snapshots,
    }
}

fn place_food(world: &mut World, food: &mut FoodPlacement, events: &mut Vec<Event>) {
    let mut commands = Vec::new();
    food.handle(
        events,
        query::bounds(world),
        &query::occupied_cells(world),
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, events);
    }
}

/// Circles a 4x4 loop around the origin until the script runs out.
fn scripted_commands() -> Vec<Command> {
    let legs = [
        (Direction::Up, 2),
        (Direction::Right, 3),
        (Direction::Down, 3),
        (Direction::Left, 3),
        (Direction::Up, 1),
    ];
    let mut commands = Vec::new();
    for _ in 0..12 {
        for (direction, steps) in legs {
            commands.push(Command::SetInputDirection { direction });
            commands.extend(std::iter::repeat(Command::Step).take(steps));
        }
    }
    commands
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    chain: Vec<Cell>,
    events: Vec<Event>,
    snapshots: Vec<(Option<Cell>, Vec<Cell>)>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.chain.hash(&mut hasher);
        for event in &self.events {
            format!("{event:?}").hash(&mut hasher);
        }
        hasher.finish()
    }
}
