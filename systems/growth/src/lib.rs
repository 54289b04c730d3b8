#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns population milestones into growth commands.

use brawl_core::Command;

/// Growth controller that fires each population threshold at most once.
#[derive(Debug)]
pub struct GrowthController {
    thresholds: Vec<u32>,
    last_triggered: u32,
}

impl GrowthController {
    /// Creates a controller for a roster of `participants` agents.
    ///
    /// `thresholds` are expected in descending order. Nothing has fired yet,
    /// so every threshold up to the roster size is armed.
    #[must_use]
    pub fn new(thresholds: &[u32], participants: u32) -> Self {
        Self {
            thresholds: thresholds.to_vec(),
            last_triggered: participants.saturating_add(1),
        }
    }

    /// Emits `Command::TriggerGrowth` for the first armed threshold that the
    /// living population has reached. At most one command is emitted per call.
    pub fn handle(&mut self, alive: u32, out: &mut Vec<Command>) {
        let Some(threshold) = self
            .thresholds
            .iter()
            .copied()
            .find(|&threshold| alive <= threshold && threshold < self.last_triggered)
        else {
            return;
        };

        self.last_triggered = threshold;
        out.push(Command::TriggerGrowth { threshold });
    }

    /// Most recent threshold that fired, or the roster size plus one.
    #[must_use]
    pub fn last_triggered(&self) -> u32 {
        self.last_triggered
    }
}
