use std::time::Duration;

use grid_snake_core::{Command, Event, GameConfig, GameOverReason, Viewport};
use grid_snake_rendering::{BoardPresentation, RenderingError, Scene};
use grid_snake_system_cadence::{MovementClock, RestartCountdown};
use grid_snake_system_food::{self as food, FoodPlacement};
use grid_snake_system_steering::{self as steering, FrameInput, Steering};
use grid_snake_world::{self as world, query, World};
use log::info;

/// Display size of a single cell handed to rendering backends.
const CELL_LENGTH: f32 = 1.0;

/// Everything that lives for exactly one round.
#[derive(Debug)]
struct Round {
    world: World,
    steering: Steering,
    food: FoodPlacement,
    clock: MovementClock,
}

impl Round {
    fn new(config: &GameConfig, viewport: Viewport, index: u32) -> Self {
        Self {
            world: World::new(viewport.bounds(), config.starting_tail_length),
            steering: Steering::new(steering::Config::new(config.swipe_threshold)),
            food: FoodPlacement::new(food::Config::new(
                config.food_seed.wrapping_add(u64::from(index)),
            )),
            clock: MovementClock::new(config.movement_interval()),
        }
    }

    fn apply_all(&mut self, commands: Vec<Command>, events: &mut Vec<Event>) {
        for command in commands {
            world::apply(&mut self.world, command, events);
        }
    }

    /// Answers any food requests contained in `events`, appending the outcome.
    fn place_food(&mut self, events: &mut Vec<Event>) {
        let mut commands = Vec::new();
        self.food.handle(
            events,
            query::bounds(&self.world),
            &query::occupied_cells(&self.world),
            &mut commands,
        );
        self.apply_all(commands, events);
    }
}

/// Final tally of a round that ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RoundSummary {
    /// One-based number of the round within the session.
    pub(crate) round: u32,
    /// Condition that ended the round.
    pub(crate) reason: GameOverReason,
    /// Cells in the chain, head included, when the round ended.
    pub(crate) length: usize,
    /// Movement ticks the round lasted.
    pub(crate) ticks: u64,
}

/// Outcome of a single frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct FrameReport {
    /// Events emitted while processing the frame, in order.
    pub(crate) events: Vec<Event>,
    /// Round that ended during this frame, if any.
    pub(crate) finished: Option<RoundSummary>,
    /// Whether the finished round was replaced during this frame.
    pub(crate) restarted: bool,
}

/// Controller that owns the active round and drives it frame by frame.
///
/// The session plays the part of the restart collaborator: once the restart
/// countdown elapses it throws the finished round away and builds a new one
/// from the configuration.
#[derive(Debug)]
pub(crate) struct Session {
    config: GameConfig,
    viewport: Viewport,
    round: Round,
    round_index: u32,
    countdown: RestartCountdown,
    carried: Vec<Event>,
}

impl Session {
    /// Creates a session and announces its first round.
    pub(crate) fn new(config: GameConfig) -> Self {
        let viewport = config.zoomed_viewport();
        let mut session = Self {
            round: Round::new(&config, viewport, 0),
            countdown: RestartCountdown::new(config.restart_delay()),
            round_index: 0,
            carried: Vec::new(),
            viewport,
            config,
        };
        session.carried = session.begin_round();
        session
    }

    /// Events emitted when the current round was announced.
    pub(crate) fn opening_events(&self) -> &[Event] {
        &self.carried
    }

    /// Zero-based index of the round being played.
    pub(crate) fn round_index(&self) -> u32 {
        self.round_index
    }

    /// Read-only access to the active round.
    #[cfg(test)]
    pub(crate) fn world(&self) -> &World {
        &self.round.world
    }

    /// Replaces the camera used by the per-frame bounds check.
    ///
    /// The configured screen zoom is applied on top of `viewport`. The board
    /// of the running round keeps the bounds it started with; the next round
    /// is built from the new viewport.
    pub(crate) fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport.zoomed(self.config.screen_zoom);
    }

    /// Advances the simulation by one frame.
    pub(crate) fn frame(&mut self, dt: Duration, input: &FrameInput) -> FrameReport {
        let mut commands = Vec::new();
        self.round.steering.handle(&self.carried, input, &mut commands);

        let mut events = Vec::new();
        commands.push(Command::Tick { dt });
        commands.push(Command::CheckBounds {
            bounds: self.viewport.bounds(),
        });
        self.round.apply_all(commands, &mut events);

        let mut steps = Vec::new();
        self.round.clock.handle(&events, &mut steps);
        let stepped_from = events.len();
        self.round.apply_all(steps, &mut events);
        let mut ignored = Vec::new();
        self.round.clock.handle(&events[stepped_from..], &mut ignored);

        self.round.place_food(&mut events);

        let finished = events.iter().find_map(|event| match event {
            Event::RoundOver { reason } => Some(RoundSummary {
                round: self.round_index.saturating_add(1),
                reason: *reason,
                length: query::body(&self.round.world).len(),
                ticks: query::tick_index(&self.round.world),
            }),
            _ => None,
        });

        let mut restarted = false;
        if self.countdown.handle(&events) {
            self.round_index = self.round_index.saturating_add(1);
            self.round = Round::new(&self.config, self.viewport, self.round_index);
            events.extend(self.begin_round());
            restarted = true;
        }

        self.carried.clone_from(&events);
        FrameReport {
            events,
            finished,
            restarted,
        }
    }

    /// Assembles the scene describing the active round.
    pub(crate) fn scene(&self) -> Result<Scene, RenderingError> {
        let board = BoardPresentation::new(query::bounds(&self.round.world), CELL_LENGTH)?;
        Ok(Scene::new(
            board,
            query::body(&self.round.world).cells().to_vec(),
            query::food(&self.round.world),
            query::round_state(&self.round.world),
        ))
    }

    fn begin_round(&mut self) -> Vec<Event> {
        info!("starting round {}", self.round_index + 1);
        let mut events = Vec::new();
        world::apply(&mut self.round.world, Command::BeginRound, &mut events);
        self.round.place_food(&mut events);
        events
    }
}
