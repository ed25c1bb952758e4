pub mod app;
pub mod config;
pub mod error;
pub mod generators;
pub mod logging;
pub mod maze;

pub use error::{AppError, MazeError, Result};
pub use generators::{GenerationState, RecursiveBacktracker, Step};
pub use maze::{Cell, Coord, Direction, Grid};
