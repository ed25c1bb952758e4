use rand::{Rng, rngs::StdRng};

use crate::{
    error::{MazeError, Result},
    generators::{GenerationState, Step, get_rng},
    maze::{Coord, Direction, Grid},
};

/// Incremental randomized depth-first search ("recursive backtracker").
///
/// Each call to [`step`](Self::step) either carves into one new cell or backtracks one
/// cell, so the maze can be rendered between steps. The visited cells always form a
/// single tree rooted at the start cell, whenever generation is interrupted.
pub struct RecursiveBacktracker<R = StdRng> {
    grid: Grid,
    /// Path from the start cell to the active cell, active cell on top
    frontier: Vec<Coord>,
    /// Number of visited cells, the authoritative completion signal
    visited: usize,
    state: GenerationState,
    start: Coord,
    steps: u64,
    rng: R,
}

impl RecursiveBacktracker<StdRng> {
    /// Creates a generator over a `width` x `height` grid.
    /// A `None` seed draws from the operating system's entropy source.
    pub fn new(width: u16, height: u16, seed: Option<u64>) -> Result<Self> {
        Self::with_rng(width, height, get_rng(seed))
    }
}

impl<R: Rng> RecursiveBacktracker<R> {
    /// Creates a generator that draws the start cell and every neighbor choice from `rng`.
    pub fn with_rng(width: u16, height: u16, mut rng: R) -> Result<Self> {
        let grid = Grid::new(width, height)?;
        let start = Self::random_start(&grid, &mut rng);
        Self::from_parts(grid, start, rng)
    }

    /// Creates a generator whose start cell is `start` instead of a random one.
    pub fn with_start(width: u16, height: u16, start: Coord, rng: R) -> Result<Self> {
        let grid = Grid::new(width, height)?;
        Self::from_parts(grid, start, rng)
    }

    fn from_parts(grid: Grid, start: Coord, rng: R) -> Result<Self> {
        let mut generator = RecursiveBacktracker {
            frontier: Vec::new(),
            grid,
            visited: 0,
            state: GenerationState::Running,
            start,
            steps: 0,
            rng,
        };
        generator.restart_at(start)?;
        Ok(generator)
    }

    fn random_start(grid: &Grid, rng: &mut R) -> Coord {
        (
            rng.random_range(0..grid.width()),
            rng.random_range(0..grid.height()),
        )
    }

    fn restart_at(&mut self, start: Coord) -> Result<()> {
        self.grid.clear();
        self.frontier.clear();
        self.grid.mark_visited(start)?;
        self.frontier.push(start);
        self.start = start;
        self.visited = 1;
        self.steps = 0;
        self.state = GenerationState::Running;
        self.update_state();
        tracing::debug!(
            "Generation started at {:?} on a {}x{} grid",
            start,
            self.grid.width(),
            self.grid.height()
        );
        Ok(())
    }

    /// Discards the current maze and starts over from a freshly drawn start cell.
    /// The random source carries on from where it was, so the new maze differs.
    pub fn reset(&mut self) -> Result<()> {
        let start = Self::random_start(&self.grid, &mut self.rng);
        self.restart_at(start)
    }

    fn update_state(&mut self) {
        if self.visited == self.grid.len() {
            self.state = GenerationState::Complete;
        }
    }

    /// Directions from `coord` leading to in-bounds cells that have not been visited.
    fn unvisited_neighbors(&self, coord: Coord) -> Vec<(Direction, Coord)> {
        Direction::ALL
            .into_iter()
            .filter_map(|direction| {
                self.grid
                    .neighbor(coord, direction)
                    .map(|neighbor| (direction, neighbor))
            })
            .filter(|&(_, neighbor)| !self.grid[neighbor].is_visited())
            .collect()
    }

    /// Advances generation by one cell visit or one backtrack.
    ///
    /// Once complete, further calls return [`Step::Idle`] and change nothing.
    /// An `InternalInvariantViolation` means the frontier ran dry before every cell was
    /// visited, which a correct build never does.
    pub fn step(&mut self) -> Result<Step> {
        if self.is_complete() {
            return Ok(Step::Idle);
        }

        let current = *self
            .frontier
            .last()
            .ok_or(MazeError::InternalInvariantViolation {
                reason: "frontier emptied before every cell was visited",
            })?;

        let neighbors = self.unvisited_neighbors(current);
        let step = if neighbors.is_empty() {
            // Dead end, go back one cell along the path
            self.frontier.pop();
            Step::Backtracked { from: current }
        } else {
            let (direction, neighbor) = neighbors[self.rng.random_range(0..neighbors.len())];
            let to = self.grid.carve_passage(current, direction)?;
            debug_assert_eq!(to, neighbor);
            self.grid.mark_visited(to)?;
            self.frontier.push(to);
            self.visited += 1;
            Step::Carved {
                from: current,
                to,
                direction,
            }
        };

        self.steps += 1;
        self.update_state();
        if self.is_complete() {
            tracing::info!(
                "Maze complete: {} cells visited in {} steps",
                self.visited,
                self.steps
            );
        }
        Ok(step)
    }

    /// Steps until complete and returns the number of steps this call took.
    pub fn run_to_completion(&mut self) -> Result<u64> {
        let before = self.steps;
        while !self.is_complete() {
            self.step()?;
        }
        Ok(self.steps - before)
    }

    pub fn is_complete(&self) -> bool {
        self.state == GenerationState::Complete
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    /// Number of visited cells.
    pub fn progress(&self) -> usize {
        self.visited
    }

    pub fn total_cells(&self) -> usize {
        self.grid.len()
    }

    /// The active cell, i.e. the top of the frontier.
    pub fn current(&self) -> Option<Coord> {
        self.frontier.last().copied()
    }

    pub fn frontier(&self) -> &[Coord] {
        &self.frontier
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    /// Steps taken since the current run started, not counting idle calls.
    pub fn steps_taken(&self) -> u64 {
        self.steps
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn width(&self) -> u16 {
        self.grid.width()
    }

    pub fn height(&self) -> u16 {
        self.grid.height()
    }
}
