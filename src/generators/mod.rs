use rand::{SeedableRng, rngs::StdRng};

mod recur_backtrack;

pub use recur_backtrack::RecursiveBacktracker;

use crate::maze::{Coord, Direction};

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Lifecycle of a single generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Running,
    Complete,
}

impl std::fmt::Display for GenerationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationState::Running => write!(f, "Generating"),
            GenerationState::Complete => write!(f, "Complete"),
        }
    }
}

/// What a single call to `step` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A passage was carved from `from` into the previously unvisited `to`
    Carved {
        from: Coord,
        to: Coord,
        direction: Direction,
    },
    /// `from` had no unvisited neighbors and was popped off the frontier
    Backtracked { from: Coord },
    /// Generation had already completed, nothing changed
    Idle,
}
