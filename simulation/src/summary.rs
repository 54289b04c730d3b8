use brawl_core::{Event, Winner};
use serde::Serialize;

/// Aggregate outcome of a battle, available at any point of the run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Number of agents the battle started with.
    pub participants: u32,
    /// Frames simulated so far.
    pub frames: u32,
    /// Agents still alive.
    pub survivors: u32,
    /// Agents eliminated so far.
    pub eliminations: u32,
    /// Eliminations credited to a surviving killer.
    pub credited_kills: u32,
    /// Growth pulses triggered so far.
    pub growth_pulses: u32,
    /// Total contacts resolved across all frames.
    pub contacts: u64,
    /// Current winner record, absent only for an empty roster.
    pub winner: Option<Winner>,
}

/// Running event tallies that feed [`RunSummary`].
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Tally {
    pub(crate) eliminations: u32,
    pub(crate) credited_kills: u32,
    pub(crate) growth_pulses: u32,
    pub(crate) contacts: u64,
}

impl Tally {
    pub(crate) fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::AgentEliminated { .. } => self.eliminations += 1,
                Event::KillCredited { .. } => self.credited_kills += 1,
                Event::GrowthTriggered { .. } => self.growth_pulses += 1,
                Event::ContactsResolved { contacts, .. } => self.contacts += *contacts as u64,
                Event::AgentPlaced { .. }
                | Event::FrameIntegrated { .. }
                | Event::FrameCompleted { .. } => {}
            }
        }
    }
}
