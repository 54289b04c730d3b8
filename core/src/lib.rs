#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Follower Brawl engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The simulation loop submits
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what happened. Systems read immutable [`AgentView`] snapshots and
//! respond exclusively with new command batches.

mod config;

pub use config::{BattleConfig, ConfigError, Preset};
pub use glam::Vec2;

use serde::{Deserialize, Serialize};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Places an agent at an explicit position with an explicit velocity.
    ///
    /// Used to stage scenarios and replays; ignored for unknown agents.
    PlaceAgent {
        /// Agent being staged.
        agent: AgentId,
        /// World-space position assigned to the agent.
        position: Vec2,
        /// Velocity assigned to the agent, in world units per frame.
        velocity: Vec2,
    },
    /// Advances every living agent by one unit timestep and enforces the
    /// arena walls and speed limits.
    Integrate,
    /// Applies damage, separation, bounce, dominance transfer and kill
    /// bookkeeping for the provided colliding pairs, in order.
    ResolveContacts {
        /// Colliding pairs detected for the current frame.
        contacts: Vec<Contact>,
    },
    /// Scales every living agent's radius and speed for a crossed
    /// population threshold.
    TriggerGrowth {
        /// Population threshold that fired.
        threshold: u32,
    },
    /// Closes the current frame and advances the frame counter.
    CompleteFrame,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that an agent was staged at an explicit location.
    AgentPlaced {
        /// Agent that was staged.
        agent: AgentId,
    },
    /// Indicates that positions advanced for the frame.
    FrameIntegrated {
        /// Index of the frame being simulated.
        frame: u32,
    },
    /// Reports how many contacts the resolver processed.
    ContactsResolved {
        /// Index of the frame being simulated.
        frame: u32,
        /// Number of colliding pairs applied.
        contacts: usize,
    },
    /// Announces that an agent's hit points reached zero.
    AgentEliminated {
        /// Agent that was eliminated.
        agent: AgentId,
        /// Opponent in the contact that first drove hit points to zero.
        eliminated_by: AgentId,
    },
    /// Confirms that a kill was credited to a surviving opponent.
    KillCredited {
        /// Agent receiving the kill bonus.
        killer: AgentId,
        /// Agent that was eliminated.
        victim: AgentId,
    },
    /// Announces that every living agent grew after a population threshold.
    GrowthTriggered {
        /// Threshold that fired.
        threshold: u32,
        /// Living agents at the time the threshold fired.
        alive: u32,
    },
    /// Confirms that a frame finished.
    FrameCompleted {
        /// Index of the frame that finished.
        frame: u32,
        /// Living agents at the end of the frame.
        alive: u32,
    },
}

/// Identifier of a participant; equal to its index in the roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(u32);

impl AgentId {
    /// Creates a new agent identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Position of the agent inside per-agent arrays.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Pair of agents whose circles overlap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    /// Agent with the lower index.
    pub first: AgentId,
    /// Agent with the higher index.
    pub second: AgentId,
    /// Centre distance observed when the contact was detected.
    ///
    /// Informational only: resolution measures the pair again from the
    /// positions current at that point, since earlier contacts in the same
    /// frame may already have separated it.
    pub distance: f32,
}

/// Read-only view over the live geometry of the agent pool.
#[derive(Clone, Copy, Debug)]
pub struct AgentView<'a> {
    positions: &'a [Vec2],
    radii: &'a [f32],
    alive: &'a [bool],
}

impl<'a> AgentView<'a> {
    /// Captures a new view backed by aligned per-agent slices.
    ///
    /// All slices must have the same length.
    #[must_use]
    pub fn new(positions: &'a [Vec2], radii: &'a [f32], alive: &'a [bool]) -> Self {
        debug_assert_eq!(positions.len(), radii.len());
        debug_assert_eq!(positions.len(), alive.len());
        Self {
            positions,
            radii,
            alive,
        }
    }

    /// Number of agents in the pool, living or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Reports whether the pool holds no agents at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Positions of every agent.
    #[must_use]
    pub fn positions(&self) -> &'a [Vec2] {
        self.positions
    }

    /// Radii of every agent.
    #[must_use]
    pub fn radii(&self) -> &'a [f32] {
        self.radii
    }

    /// Alive flags of every agent.
    #[must_use]
    pub fn alive(&self) -> &'a [bool] {
        self.alive
    }

    /// Indices of living agents in ascending order.
    pub fn live_indices(&self) -> impl Iterator<Item = usize> + 'a {
        self.alive
            .iter()
            .enumerate()
            .filter_map(|(index, alive)| (*alive).then_some(index))
    }

    /// Number of living agents.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive.iter().filter(|alive| **alive).count()
    }
}

/// Immutable copy of the pool state captured at the end of a frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Index of the frame that produced the snapshot.
    pub frame: u32,
    /// Position of every agent, aligned to participant index.
    pub positions: Vec<Vec2>,
    /// Hit points of every agent.
    pub hp: Vec<f32>,
    /// Alive flag of every agent.
    pub alive: Vec<bool>,
    /// Number of living agents.
    pub alive_count: u32,
    /// Radius of every agent.
    pub radii: Vec<f32>,
    /// Kill count of every agent.
    pub kills: Vec<u32>,
}

/// Ordered sequence of snapshots recorded over a run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameTrace {
    frames: Vec<FrameSnapshot>,
}

impl FrameTrace {
    /// Creates an empty trace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the snapshot of the next frame.
    pub fn push(&mut self, snapshot: FrameSnapshot) {
        debug_assert_eq!(snapshot.frame as usize, self.frames.len());
        self.frames.push(snapshot);
    }

    /// Number of recorded frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Reports whether no frame was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Snapshot recorded for the provided frame index.
    #[must_use]
    pub fn get(&self, frame: usize) -> Option<&FrameSnapshot> {
        self.frames.get(frame)
    }

    /// Snapshot of the final recorded frame.
    #[must_use]
    pub fn last(&self) -> Option<&FrameSnapshot> {
        self.frames.last()
    }

    /// Iterator over the recorded snapshots in frame order.
    pub fn iter(&self) -> impl Iterator<Item = &FrameSnapshot> {
        self.frames.iter()
    }

    /// Consumes the trace, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<FrameSnapshot> {
        self.frames
    }
}

/// Final record describing the surviving participant.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Winner {
    /// Participant index of the winner.
    pub agent: AgentId,
    /// Kills credited to the winner over the run.
    pub kills: u32,
    /// Radius of the winner when the run ended.
    pub final_radius: f32,
    /// Final radius divided by the configured base radius.
    pub size_multiplier: f32,
}
