pub mod cell;
pub mod grid;

pub use cell::Cell;
pub use grid::Grid;

/// Grid coordinate `(x, y)`, with `x` growing east and `y` growing south.
pub type Coord = (u16, u16);

/// One of the four cardinal directions a passage can be carved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// All directions, in the order neighbors are scanned.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Unit step `(dx, dy)` taken when moving in this direction.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// The `Cell` flag recording a passage in this direction.
    pub const fn passage_bit(self) -> u8 {
        match self {
            Direction::North => Cell::PATH_N,
            Direction::East => Cell::PATH_E,
            Direction::South => Cell::PATH_S,
            Direction::West => Cell::PATH_W,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::North => write!(f, "north"),
            Direction::East => write!(f, "east"),
            Direction::South => write!(f, "south"),
            Direction::West => write!(f, "west"),
        }
    }
}
