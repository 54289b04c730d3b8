#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that finds overlapping agents with a uniform spatial grid.
//!
//! Each frame the grid is rebuilt from the living agents and every pair of
//! neighbouring cells is visited once, so a colliding pair is reported exactly
//! once with the lower participant index first. Large populations fan the cell
//! scan out over the rayon thread pool; the merged result keeps cell order and
//! is identical to the sequential scan.

mod grid;

use brawl_core::{AgentId, AgentView, BattleConfig, Command, Contact, Vec2};
use rayon::prelude::*;

use crate::grid::SpatialGrid;

/// Collision detection system that emits contact resolution commands.
#[derive(Debug)]
pub struct CollisionDetection {
    arena: Vec2,
    min_cell_edge: f32,
    parallel_threshold: usize,
    grid: SpatialGrid,
    contacts: Vec<Contact>,
}

impl CollisionDetection {
    /// Creates a detector for the arena described by `config`.
    #[must_use]
    pub fn new(config: &BattleConfig) -> Self {
        Self {
            arena: Vec2::new(config.arena_width, config.arena_height),
            min_cell_edge: config.grid_cell_size,
            parallel_threshold: config.parallel_threshold,
            grid: SpatialGrid::default(),
            contacts: Vec::new(),
        }
    }

    /// Emits a `Command::ResolveContacts` carrying every overlapping pair.
    ///
    /// Nothing is emitted when no living agents overlap. The contact list is
    /// handed over to the command, so [`detect`](Self::detect) must run again
    /// before the contacts can be read back.
    pub fn handle(&mut self, agents: AgentView<'_>, out: &mut Vec<Command>) {
        if self.detect(agents).is_empty() {
            return;
        }

        out.push(Command::ResolveContacts {
            contacts: std::mem::take(&mut self.contacts),
        });
    }

    /// Returns the overlapping pairs among the living agents of `agents`.
    ///
    /// Pairs are ordered by grid cell and carry the lower index first.
    pub fn detect(&mut self, agents: AgentView<'_>) -> &[Contact] {
        self.contacts.clear();
        let alive = agents.alive_count();
        if alive < 2 {
            return &self.contacts;
        }

        self.grid.rebuild(&agents, self.arena, self.min_cell_edge);
        let grid = &self.grid;

        if alive >= self.parallel_threshold {
            let per_cell: Vec<Vec<Contact>> = (0..grid.cell_count())
                .into_par_iter()
                .map(|cell| {
                    let mut found = Vec::new();
                    scan_cell(grid, &agents, cell, &mut found);
                    found
                })
                .collect();
            for found in per_cell {
                self.contacts.extend(found);
            }
        } else {
            for cell in 0..grid.cell_count() {
                scan_cell(grid, &agents, cell, &mut self.contacts);
            }
        }

        &self.contacts
    }

    /// Cell edge used by the most recent grid build.
    #[must_use]
    pub fn cell_edge(&self) -> f32 {
        self.grid.cell_edge()
    }
}

fn scan_cell(grid: &SpatialGrid, agents: &AgentView<'_>, cell: usize, out: &mut Vec<Contact>) {
    let members = grid.members(cell);
    if members.is_empty() {
        return;
    }

    for (offset, &first) in members.iter().enumerate() {
        for &second in &members[offset + 1..] {
            test_pair(agents, first, second, out);
        }
    }

    for neighbour in grid.forward_neighbours(cell) {
        let others = grid.members(neighbour);
        for &first in members {
            for &second in others {
                test_pair(agents, first, second, out);
            }
        }
    }
}

fn test_pair(agents: &AgentView<'_>, first: usize, second: usize, out: &mut Vec<Contact>) {
    let (low, high) = if first < second {
        (first, second)
    } else {
        (second, first)
    };
    let positions = agents.positions();
    let radii = agents.radii();
    let distance = positions[low].distance(positions[high]);
    if distance < radii[low] + radii[high] {
        out.push(Contact {
            first: agent_id(low),
            second: agent_id(high),
            distance,
        });
    }
}

fn agent_id(index: usize) -> AgentId {
    AgentId::new(u32::try_from(index).unwrap_or(u32::MAX))
}
