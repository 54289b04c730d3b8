//! Population-wide growth pulses.

use brawl_core::BattleConfig;

use crate::pool::AgentPool;

/// Grows every living agent by the configured factor and speeds it up by
/// the same factor. Radii never exceed the configured cap and never shrink.
pub(crate) fn grow(pool: &mut AgentPool, config: &BattleConfig) {
    let cap = config.max_radius();
    let factor = config.growth_factor;

    for index in 0..pool.len() {
        if !pool.alive[index] {
            continue;
        }

        let radius = pool.radii[index];
        pool.radii[index] = (radius * factor).min(cap).max(radius);
        pool.velocities[index] *= factor;
    }
}
