#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-sequential battle loop that drives the world with the pure systems.
//!
//! Each tick integrates motion, detects contacts, resolves them, fires at most
//! one growth pulse, captures the frame and closes it. The loop ends once a
//! single agent (or none) is left standing or the frame budget is spent.

mod summary;

use std::convert::Infallible;

use brawl_core::{BattleConfig, Command, ConfigError, Event, FrameSnapshot, FrameTrace, Winner};
use brawl_system_collision::CollisionDetection;
use brawl_system_growth::GrowthController;
use brawl_world::{self as world, query, World};

pub use summary::RunSummary;

use crate::summary::Tally;

/// Frames between two progress log lines.
const PROGRESS_INTERVAL: u32 = 100;
/// Population at or below which the final battle countdown is logged.
const FINAL_BATTLE_POPULATION: u32 = 10;
/// Frames between two final battle log lines.
const FINAL_BATTLE_INTERVAL: u32 = 30;

/// Battle simulation owning the world and the systems that drive it.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    collision: CollisionDetection,
    growth: GrowthController,
    max_frames: u32,
    participants: u32,
    commands: Vec<Command>,
    tally: Tally,
}

impl Simulation {
    /// Stages a battle between `participants` agents.
    pub fn new(participants: usize, config: BattleConfig) -> Result<Self, ConfigError> {
        let world = World::new(config, participants)?;
        let config = query::config(&world);
        let participants = u32::try_from(participants).unwrap_or(u32::MAX);
        let collision = CollisionDetection::new(config);
        let growth = GrowthController::new(&config.growth_thresholds, participants);
        let max_frames = config.frame_budget();

        Ok(Self {
            world,
            collision,
            growth,
            max_frames,
            participants,
            commands: Vec::new(),
            tally: Tally::default(),
        })
    }

    /// Reports whether the battle has ended.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        query::alive_count(&self.world) <= 1 || query::frame(&self.world) >= self.max_frames
    }

    /// Applies an external command to the world before or between ticks.
    pub fn apply(&mut self, command: Command, out_events: &mut Vec<Event>) {
        let start = out_events.len();
        world::apply(&mut self.world, command, out_events);
        self.tally.record(&out_events[start..]);
    }

    /// Advances the battle by a single frame and returns the events it produced.
    ///
    /// Returns no events once the battle has ended.
    pub fn step(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if !self.is_terminated() {
            self.tick(&mut events, |_| {});
        }
        events
    }

    /// Runs the battle to completion and collects every frame.
    pub fn run(&mut self) -> FrameTrace {
        let mut trace = FrameTrace::new();
        self.run_with(|snapshot| trace.push(snapshot));
        trace
    }

    /// Runs the battle to completion, handing each frame to `on_frame`.
    pub fn run_with<F>(&mut self, mut on_frame: F)
    where
        F: FnMut(FrameSnapshot),
    {
        let outcome: Result<(), Infallible> = self.try_run_with(|snapshot| {
            on_frame(snapshot);
            Ok(())
        });
        match outcome {
            Ok(()) => {}
            Err(never) => match never {},
        }
    }

    /// Runs the battle to completion, handing each frame to `on_frame` and
    /// stopping at the first error it returns.
    pub fn try_run_with<F, E>(&mut self, mut on_frame: F) -> Result<(), E>
    where
        F: FnMut(FrameSnapshot) -> Result<(), E>,
    {
        tracing::info!(
            participants = self.participants,
            max_frames = self.max_frames,
            "battle started"
        );

        let mut events = Vec::new();
        let mut failure = None;
        while !self.is_terminated() {
            events.clear();
            self.tick(&mut events, |world| {
                if failure.is_none() {
                    failure = on_frame(query::snapshot(world)).err();
                }
            });
            if let Some(error) = failure.take() {
                tracing::warn!(
                    frame = query::frame(&self.world),
                    "frame consumer failed, battle aborted"
                );
                return Err(error);
            }
        }

        let summary = self.summary();
        tracing::info!(
            frames = summary.frames,
            survivors = summary.survivors,
            eliminations = summary.eliminations,
            credited_kills = summary.credited_kills,
            growth_pulses = summary.growth_pulses,
            winner = ?summary.winner.map(|winner| winner.agent.get()),
            "battle finished"
        );
        Ok(())
    }

    /// Current winner record. Returns `None` only for an empty roster.
    #[must_use]
    pub fn winner(&self) -> Option<Winner> {
        query::winner(&self.world)
    }

    /// Aggregate outcome of the battle so far.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            participants: self.participants,
            frames: query::frame(&self.world),
            survivors: query::alive_count(&self.world),
            eliminations: self.tally.eliminations,
            credited_kills: self.tally.credited_kills,
            growth_pulses: self.tally.growth_pulses,
            contacts: self.tally.contacts,
            winner: self.winner(),
        }
    }

    /// Most recent growth threshold that fired, or the roster size plus one.
    #[must_use]
    pub fn last_growth_threshold(&self) -> u32 {
        self.growth.last_triggered()
    }

    /// Frame budget after which the battle stops regardless of survivors.
    #[must_use]
    pub fn max_frames(&self) -> u32 {
        self.max_frames
    }

    /// Read-only access to the world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    fn tick<F>(&mut self, events: &mut Vec<Event>, on_frame: F)
    where
        F: FnOnce(&World),
    {
        let start = events.len();

        world::apply(&mut self.world, Command::Integrate, events);

        self.commands.clear();
        self.collision
            .handle(query::agent_view(&self.world), &mut self.commands);
        self.flush_commands(events);

        self.growth
            .handle(query::alive_count(&self.world), &mut self.commands);
        self.flush_commands(events);

        on_frame(&self.world);
        world::apply(&mut self.world, Command::CompleteFrame, events);

        self.tally.record(&events[start..]);
        self.log_progress();
    }

    fn flush_commands(&mut self, events: &mut Vec<Event>) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, events);
        }
    }

    fn log_progress(&self) {
        let frame = query::frame(&self.world);
        let alive = query::alive_count(&self.world);

        if frame % PROGRESS_INTERVAL == 0 {
            tracing::debug!(
                frame,
                alive,
                eliminated = self.participants.saturating_sub(alive),
                "battle progress"
            );
        }

        if alive <= FINAL_BATTLE_POPULATION && frame % FINAL_BATTLE_INTERVAL == 0 {
            tracing::info!(frame, alive, "final battle");
        }
    }
}
