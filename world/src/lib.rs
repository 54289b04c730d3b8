#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative arena state for Follower Brawl.
//!
//! The world owns the agent pool. It mutates state only through [`apply`] and
//! exposes read access through the [`query`] module.

mod combat;
mod growth;
mod physics;
mod pool;

use brawl_core::{BattleConfig, Command, ConfigError, Event};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{combat::Resolver, pool::AgentPool};

/// Represents the authoritative arena state.
#[derive(Debug)]
pub struct World {
    config: BattleConfig,
    pool: AgentPool,
    resolver: Resolver,
    frame: u32,
}

impl World {
    /// Creates a world holding `participants` freshly staged agents.
    ///
    /// Agents are scattered with a PRNG seeded from the configuration, so the
    /// same configuration and roster size always stage the same arena.
    pub fn new(config: BattleConfig, participants: usize) -> Result<Self, ConfigError> {
        config.validate()?;
        if u32::try_from(participants).is_err() {
            return Err(ConfigError::RosterTooLarge(participants));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let pool = AgentPool::populate(participants, &config, &mut rng);
        tracing::debug!(
            participants,
            initial_radius = pool.radii.first().copied().unwrap_or(config.base_radius),
            base_radius = config.base_radius,
            "arena staged"
        );

        Ok(Self {
            config,
            pool,
            resolver: Resolver::default(),
            frame: 0,
        })
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceAgent {
            agent,
            position,
            velocity,
        } => {
            let index = agent.index();
            if index >= world.pool.len() {
                return;
            }
            world.pool.positions[index] = position;
            world.pool.velocities[index] = velocity;
            out_events.push(Event::AgentPlaced { agent });
        }
        Command::Integrate => {
            physics::integrate(&mut world.pool, &world.config);
            out_events.push(Event::FrameIntegrated { frame: world.frame });
        }
        Command::ResolveContacts { contacts } => {
            out_events.push(Event::ContactsResolved {
                frame: world.frame,
                contacts: contacts.len(),
            });
            world
                .resolver
                .resolve(&mut world.pool, &world.config, &contacts, out_events);
        }
        Command::TriggerGrowth { threshold } => {
            growth::grow(&mut world.pool, &world.config);
            let alive = query::alive_count(world);
            tracing::info!(
                threshold,
                alive,
                factor = world.config.growth_factor,
                "population threshold reached, survivors grow"
            );
            out_events.push(Event::GrowthTriggered { threshold, alive });
        }
        Command::CompleteFrame => {
            out_events.push(Event::FrameCompleted {
                frame: world.frame,
                alive: query::alive_count(world),
            });
            world.frame = world.frame.saturating_add(1);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use brawl_core::{AgentId, AgentView, BattleConfig, FrameSnapshot, Vec2, Winner};

    use super::World;

    /// Configuration the world was staged with.
    #[must_use]
    pub fn config(world: &World) -> &BattleConfig {
        &world.config
    }

    /// Index of the frame currently being simulated.
    #[must_use]
    pub fn frame(world: &World) -> u32 {
        world.frame
    }

    /// Number of agents in the pool, living or not.
    #[must_use]
    pub fn participant_count(world: &World) -> usize {
        world.pool.len()
    }

    /// Number of living agents.
    #[must_use]
    pub fn alive_count(world: &World) -> u32 {
        u32::try_from(world.pool.alive_count()).unwrap_or(u32::MAX)
    }

    /// Read-only view of agent geometry for systems.
    #[must_use]
    pub fn agent_view(world: &World) -> AgentView<'_> {
        world.pool.view()
    }

    /// Full state of a single agent.
    #[must_use]
    pub fn agent(world: &World, agent: AgentId) -> Option<AgentState> {
        let pool = &world.pool;
        let index = agent.index();
        if index >= pool.len() {
            return None;
        }
        Some(AgentState {
            id: agent,
            position: pool.positions[index],
            velocity: pool.velocities[index],
            hp: pool.hp[index],
            radius: pool.radii[index],
            strength: pool.strength[index],
            kills: pool.kills[index],
            alive: pool.alive[index],
        })
    }

    /// Captures an independent copy of the pool for the current frame.
    #[must_use]
    pub fn snapshot(world: &World) -> FrameSnapshot {
        let pool = &world.pool;
        FrameSnapshot {
            frame: world.frame,
            positions: pool.positions.clone(),
            hp: pool.hp.clone(),
            alive: pool.alive.clone(),
            alive_count: alive_count(world),
            radii: pool.radii.clone(),
            kills: pool.kills.clone(),
        }
    }

    /// First living agent in index order, or agent 0 when nobody survived.
    ///
    /// Returns `None` only for an empty roster.
    #[must_use]
    pub fn winner(world: &World) -> Option<Winner> {
        let pool = &world.pool;
        if pool.len() == 0 {
            return None;
        }

        let index = pool.alive.iter().position(|alive| *alive).unwrap_or(0);
        let radius = pool.radii[index];
        Some(Winner {
            agent: AgentId::new(u32::try_from(index).unwrap_or(u32::MAX)),
            kills: pool.kills[index],
            final_radius: radius,
            size_multiplier: radius / world.config.base_radius,
        })
    }

    /// Immutable representation of a single agent's state.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct AgentState {
        /// Participant index of the agent.
        pub id: AgentId,
        /// World-space position.
        pub position: Vec2,
        /// Velocity in world units per frame.
        pub velocity: Vec2,
        /// Remaining hit points.
        pub hp: f32,
        /// Current radius.
        pub radius: f32,
        /// Damage modifier applied to opponents.
        pub strength: f32,
        /// Kills credited so far.
        pub kills: u32,
        /// Whether the agent is still in the fight.
        pub alive: bool,
    }
}
