//! Contact resolution: damage, separation, bounce, dominance and kill credit.

use brawl_core::{AgentId, BattleConfig, Contact, Event, Vec2};

use crate::{physics::DEFAULT_DIRECTION, pool::AgentPool};

/// Extra distance added to each side when pushing overlapping agents apart.
const SEPARATION_MARGIN: f32 = 0.5;
/// Speed multiplier awarded to the dominant side of a contact.
const DOMINANT_BOOST: f32 = 1.08;
/// Speed multiplier applied to the submissive side of a contact.
const SUBMISSIVE_LOSS: f32 = 0.95;
/// Speed multiplier applied to both sides of an even contact.
const EVEN_BOOST: f32 = 1.02;
/// Hit points restored to an agent for each kill.
const KILL_HEAL: f32 = 10.0;
/// Strength multiplier applied to an agent for each kill.
const KILL_STRENGTH_BONUS: f32 = 1.01;

/// Applies contacts to the pool, reusing its scratch buffers across frames.
#[derive(Debug, Default)]
pub(crate) struct Resolver {
    pending_kills: Vec<PendingKill>,
    eliminated: Vec<bool>,
}

#[derive(Clone, Copy, Debug)]
struct PendingKill {
    victim: usize,
    killer: usize,
}

impl Resolver {
    /// Resolves every contact in order, then credits kills and re-derives the
    /// alive flags for the whole pool.
    pub(crate) fn resolve(
        &mut self,
        pool: &mut AgentPool,
        config: &BattleConfig,
        contacts: &[Contact],
        out_events: &mut Vec<Event>,
    ) {
        self.pending_kills.clear();
        self.eliminated.clear();
        self.eliminated.resize(pool.len(), false);

        for contact in contacts {
            let first = contact.first.index();
            let second = contact.second.index();
            if first == second || first >= pool.len() || second >= pool.len() {
                continue;
            }
            self.exchange(pool, config, first, second, out_events);
        }

        self.credit_kills(pool, config, out_events);
        pool.refresh_alive();
    }

    fn exchange(
        &mut self,
        pool: &mut AgentPool,
        config: &BattleConfig,
        first: usize,
        second: usize,
        out_events: &mut Vec<Event>,
    ) {
        let offset = pool.positions[first] - pool.positions[second];
        let distance = offset.length();
        let normal = if distance > 0.0 {
            offset / distance
        } else {
            DEFAULT_DIRECTION
        };

        let size_first = pool.radii[first] / config.base_radius;
        let size_second = pool.radii[second] / config.base_radius;

        let relative_speed = (pool.velocities[first] - pool.velocities[second]).length();
        let impact =
            config.damage_base * config.damage_multiplier * (1.0 + relative_speed / config.max_speed);
        pool.hp[first] -= impact * size_second * pool.strength[second];
        pool.hp[second] -= impact * size_first * pool.strength[first];

        self.observe_elimination(pool, first, second, out_events);
        self.observe_elimination(pool, second, first, out_events);

        let overlap = pool.radii[first] + pool.radii[second] - distance;
        if overlap > 0.0 {
            let separation = normal * (overlap / 2.0 + SEPARATION_MARGIN);
            pool.positions[first] += separation;
            pool.positions[second] -= separation;
        }

        let (velocity_first, velocity_second) =
            swap_normal_components(pool.velocities[first], pool.velocities[second], normal);

        let speed_first = velocity_first.length();
        let speed_second = velocity_second.length();
        let (scale_first, scale_second) =
            dominance_scales(size_first * speed_first, size_second * speed_second);

        pool.velocities[first] = if speed_first > 0.0 {
            velocity_first * scale_first
        } else {
            velocity_first
        };
        pool.velocities[second] = if speed_second > 0.0 {
            velocity_second * scale_second
        } else {
            velocity_second
        };
    }

    fn observe_elimination(
        &mut self,
        pool: &AgentPool,
        victim: usize,
        killer: usize,
        out_events: &mut Vec<Event>,
    ) {
        if pool.hp[victim] > 0.0 || !pool.alive[victim] || self.eliminated[victim] {
            return;
        }

        self.eliminated[victim] = true;
        self.pending_kills.push(PendingKill { victim, killer });
        tracing::trace!(victim, killer, "agent eliminated");
        out_events.push(Event::AgentEliminated {
            agent: agent_id(victim),
            eliminated_by: agent_id(killer),
        });
    }

    /// Credits each pending kill whose killer still has hit points left.
    fn credit_kills(
        &mut self,
        pool: &mut AgentPool,
        config: &BattleConfig,
        out_events: &mut Vec<Event>,
    ) {
        let max_hp = config.max_hp();
        for kill in self.pending_kills.drain(..) {
            let killer = kill.killer;
            if pool.hp[killer] <= 0.0 {
                continue;
            }

            pool.kills[killer] = pool.kills[killer].saturating_add(1);
            pool.hp[killer] = (pool.hp[killer] + KILL_HEAL).min(max_hp);
            pool.strength[killer] *= KILL_STRENGTH_BONUS;
            out_events.push(Event::KillCredited {
                killer: agent_id(killer),
                victim: agent_id(kill.victim),
            });
        }
    }
}

/// Exchanges the velocity components along `normal` between two agents.
fn swap_normal_components(first: Vec2, second: Vec2, normal: Vec2) -> (Vec2, Vec2) {
    let first_parallel = normal * first.dot(normal);
    let second_parallel = normal * second.dot(normal);
    (
        first - first_parallel + second_parallel,
        second - second_parallel + first_parallel,
    )
}

/// Speed multipliers for both sides given their dominance scores.
fn dominance_scales(first: f32, second: f32) -> (f32, f32) {
    if first > second {
        (DOMINANT_BOOST, SUBMISSIVE_LOSS)
    } else if second > first {
        (SUBMISSIVE_LOSS, DOMINANT_BOOST)
    } else {
        (EVEN_BOOST, EVEN_BOOST)
    }
}

fn agent_id(index: usize) -> AgentId {
    AgentId::new(u32::try_from(index).unwrap_or(u32::MAX))
}
