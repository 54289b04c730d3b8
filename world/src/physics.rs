//! Unit-timestep integration, wall bounces and speed limits.

use brawl_core::{BattleConfig, Vec2};

use crate::pool::AgentPool;

/// Slowest speed, as a fraction of the reference speed, a living agent keeps.
const SPEED_FLOOR_FRACTION: f32 = 0.3;
/// Fastest speed, as a multiple of the reference speed, for a base-sized agent.
const SPEED_CEILING_FACTOR: f32 = 1.5;

/// Heading substituted when a living agent has no velocity to normalise.
pub(crate) const DEFAULT_DIRECTION: Vec2 = Vec2::X;

/// Advances every living agent by one frame.
///
/// The wall test uses the base radius rather than the agent's grown radius,
/// so grown agents may overlap the arena edge.
pub(crate) fn integrate(pool: &mut AgentPool, config: &BattleConfig) {
    let bounds = Bounds::new(config);
    let floor = config.max_speed * SPEED_FLOOR_FRACTION;

    for index in 0..pool.len() {
        if !pool.alive[index] {
            pool.velocities[index] = Vec2::ZERO;
            continue;
        }

        let mut velocity = pool.velocities[index];
        let mut position = pool.positions[index] + velocity;

        bounce(
            &mut position.x,
            &mut velocity.x,
            bounds.min.x,
            bounds.max.x,
            config.bounce_damping,
        );
        bounce(
            &mut position.y,
            &mut velocity.y,
            bounds.min.y,
            bounds.max.y,
            config.bounce_damping,
        );

        let size_factor = pool.radii[index] / config.base_radius;
        let ceiling = config.max_speed * SPEED_CEILING_FACTOR * size_factor;

        pool.positions[index] = position;
        pool.velocities[index] = clamp_speed(velocity, floor, ceiling);
    }
}

#[derive(Clone, Copy, Debug)]
struct Bounds {
    min: Vec2,
    max: Vec2,
}

impl Bounds {
    fn new(config: &BattleConfig) -> Self {
        let margin = config.base_radius;
        Self {
            min: Vec2::splat(margin),
            max: Vec2::new(config.arena_width - margin, config.arena_height - margin),
        }
    }
}

fn bounce(position: &mut f32, velocity: &mut f32, min: f32, max: f32, damping: f32) {
    if *position < min {
        *position = min;
    } else if *position > max {
        *position = max;
    } else {
        return;
    }
    *velocity *= -damping;
}

/// Rescales `velocity` into `[floor, ceiling]` while keeping its heading.
fn clamp_speed(velocity: Vec2, floor: f32, ceiling: f32) -> Vec2 {
    let speed = velocity.length();
    if speed <= f32::EPSILON {
        return DEFAULT_DIRECTION * floor;
    }

    if speed > ceiling {
        velocity * (ceiling / speed)
    } else if speed < floor {
        velocity * (floor / speed)
    } else {
        velocity
    }
}
