use brawl_core::{AgentView, Vec2};

/// Neighbouring cells visited from each cell. Together with the cell itself
/// they cover every adjacent cell pair exactly once.
const FORWARD_NEIGHBOURS: [(isize, isize); 4] = [(1, 0), (-1, 1), (0, 1), (1, 1)];

/// Cells allotted per living agent before the cell edge is widened.
const CELLS_PER_AGENT: usize = 4;
/// Cell budget granted regardless of population.
const MIN_CELL_BUDGET: usize = 1_024;

/// Uniform grid of live agents stored as a dense bucket array.
///
/// `starts[cell]..starts[cell + 1]` indexes the members of `cell` inside
/// `members`; members of a cell are kept in ascending agent order.
#[derive(Debug, Default)]
pub(crate) struct SpatialGrid {
    cell_edge: f32,
    columns: usize,
    rows: usize,
    starts: Vec<usize>,
    members: Vec<usize>,
    placements: Vec<(usize, usize)>,
}

impl SpatialGrid {
    /// Rebuilds the buckets from the living agents of `agents`.
    ///
    /// The cell edge is at least `min_cell_edge` and at least the widest
    /// possible contact distance, so colliding pairs always share a cell or
    /// touch neighbouring cells. It is widened further when the arena would
    /// otherwise need more cells than the population budget allows.
    pub(crate) fn rebuild(&mut self, agents: &AgentView<'_>, arena: Vec2, min_cell_edge: f32) {
        let radii = agents.radii();
        let widest = agents
            .live_indices()
            .map(|index| radii[index])
            .fold(0.0_f32, f32::max);
        let budget = agents
            .alive_count()
            .saturating_mul(CELLS_PER_AGENT)
            .max(MIN_CELL_BUDGET);
        self.cell_edge = budgeted_edge(min_cell_edge.max(2.0 * widest), arena, budget);
        self.columns = cells_along(arena.x, self.cell_edge, budget);
        self.rows = cells_along(arena.y, self.cell_edge, budget);

        let cell_count = self.columns * self.rows;
        self.starts.clear();
        self.starts.resize(cell_count + 1, 0);
        self.placements.clear();

        let positions = agents.positions();
        for index in agents.live_indices() {
            let cell = self.cell_of(positions[index]);
            self.placements.push((index, cell));
            self.starts[cell + 1] += 1;
        }

        for cell in 0..cell_count {
            self.starts[cell + 1] += self.starts[cell];
        }

        self.members.clear();
        self.members.resize(self.placements.len(), 0);
        let mut cursor = self.starts.clone();
        for &(index, cell) in &self.placements {
            self.members[cursor[cell]] = index;
            cursor[cell] += 1;
        }
    }

    /// Number of cells in the grid.
    #[must_use]
    pub(crate) fn cell_count(&self) -> usize {
        self.columns * self.rows
    }

    /// Edge length used for the current build.
    #[must_use]
    pub(crate) fn cell_edge(&self) -> f32 {
        self.cell_edge
    }

    /// Agents bucketed into `cell`, in ascending order.
    #[must_use]
    pub(crate) fn members(&self, cell: usize) -> &[usize] {
        &self.members[self.starts[cell]..self.starts[cell + 1]]
    }

    /// Cells whose pairs with `cell` must be checked, excluding `cell` itself.
    pub(crate) fn forward_neighbours(&self, cell: usize) -> impl Iterator<Item = usize> + '_ {
        let column = (cell % self.columns) as isize;
        let row = (cell / self.columns) as isize;
        FORWARD_NEIGHBOURS
            .iter()
            .filter_map(move |&(dc, dr)| self.cell_at(column + dc, row + dr))
    }

    fn cell_at(&self, column: isize, row: isize) -> Option<usize> {
        if column < 0 || row < 0 {
            return None;
        }
        let (column, row) = (column as usize, row as usize);
        (column < self.columns && row < self.rows).then_some(row * self.columns + column)
    }

    fn cell_of(&self, position: Vec2) -> usize {
        let column = axis_cell(position.x, self.cell_edge, self.columns);
        let row = axis_cell(position.y, self.cell_edge, self.rows);
        row * self.columns + column
    }
}

/// Smallest edge, no shorter than `edge`, that covers the arena with about
/// `budget` cells. Either axis alone is held to `budget` cells as well.
fn budgeted_edge(edge: f32, arena: Vec2, budget: usize) -> f32 {
    let (width, height) = (f64::from(arena.x), f64::from(arena.y));
    let budget = budget as f64;
    let floor = (width * height / budget)
        .sqrt()
        .max(width / budget)
        .max(height / budget);
    f64::from(edge).max(floor) as f32
}

fn cells_along(extent: f32, edge: f32, budget: usize) -> usize {
    let cells = (f64::from(extent) / f64::from(edge)).ceil();
    if cells.is_finite() && cells >= 1.0 {
        (cells.min(budget as f64) as usize).max(1)
    } else {
        1
    }
}

/// Cell index along one axis; out-of-arena coordinates fold into the edge
/// cells, which keeps adjacent agents in adjacent cells.
fn axis_cell(coordinate: f32, edge: f32, cells: usize) -> usize {
    let raw = (coordinate / edge).floor();
    if raw <= 0.0 || raw.is_nan() {
        0
    } else {
        (raw as usize).min(cells - 1)
    }
}
