//! Structure-of-arrays storage for every agent in the arena.

use std::f32::consts::TAU;

use brawl_core::{AgentView, BattleConfig, Vec2};
use rand::Rng;

/// Fraction of the reference speed every agent is launched with.
const LAUNCH_SPEED_FRACTION: f32 = 0.8;

/// Population tiers and the radius multiplier applied to smaller battles so
/// that agents stay visible.
const RADIUS_TIERS: [(usize, f32); 5] = [(10, 4.0), (50, 3.0), (100, 2.5), (200, 2.0), (500, 1.5)];

/// Per-agent state, indexed by participant index.
#[derive(Clone, Debug, Default)]
pub(crate) struct AgentPool {
    pub(crate) positions: Vec<Vec2>,
    pub(crate) velocities: Vec<Vec2>,
    pub(crate) hp: Vec<f32>,
    pub(crate) radii: Vec<f32>,
    pub(crate) strength: Vec<f32>,
    pub(crate) kills: Vec<u32>,
    pub(crate) alive: Vec<bool>,
    alive_count: usize,
}

impl AgentPool {
    /// Creates `count` agents scattered uniformly across the arena.
    pub(crate) fn populate<R: Rng>(count: usize, config: &BattleConfig, rng: &mut R) -> Self {
        let radius = initial_radius(count, config.base_radius).min(config.max_radius());
        let launch_speed = config.max_speed * LAUNCH_SPEED_FRACTION;

        let mut pool = Self {
            positions: Vec::with_capacity(count),
            velocities: Vec::with_capacity(count),
            hp: vec![config.hp_default; count],
            radii: vec![radius; count],
            strength: Vec::with_capacity(count),
            kills: vec![0; count],
            alive: vec![true; count],
            alive_count: count,
        };

        for _ in 0..count {
            let x = rng.gen::<f32>() * config.arena_width;
            let y = rng.gen::<f32>() * config.arena_height;
            pool.positions.push(Vec2::new(x, y));

            let angle = rng.gen::<f32>() * TAU;
            pool.velocities
                .push(Vec2::new(angle.cos(), angle.sin()) * launch_speed);

            pool.strength
                .push(rng.gen_range(config.strength_min..=config.strength_max));
        }

        pool
    }

    pub(crate) fn len(&self) -> usize {
        self.positions.len()
    }

    pub(crate) fn alive_count(&self) -> usize {
        self.alive_count
    }

    pub(crate) fn view(&self) -> AgentView<'_> {
        AgentView::new(&self.positions, &self.radii, &self.alive)
    }

    /// Re-derives every alive flag from hit points in a single pass.
    ///
    /// Dead agents have their hit points pinned at zero.
    pub(crate) fn refresh_alive(&mut self) {
        let mut alive_count = 0;
        for (hp, alive) in self.hp.iter_mut().zip(self.alive.iter_mut()) {
            *alive = *hp > 0.0;
            if *alive {
                alive_count += 1;
            } else {
                *hp = 0.0;
            }
        }
        self.alive_count = alive_count;
    }
}

/// Starting radius for a battle of `count` agents.
pub(crate) fn initial_radius(count: usize, base_radius: f32) -> f32 {
    let multiplier = RADIUS_TIERS
        .iter()
        .find(|(limit, _)| count <= *limit)
        .map_or(1.0, |(_, multiplier)| *multiplier);
    base_radius * multiplier
}
