use std::fmt;

use crate::maze::Direction;

/// State of a single maze cell, packed into one byte of independent flags.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell(u8);

impl Cell {
    pub const PATH_N: u8 = 0x01;
    pub const PATH_E: u8 = 0x02;
    pub const PATH_S: u8 = 0x04;
    pub const PATH_W: u8 = 0x08;
    pub const VISITED: u8 = 0x10;

    /// A cell with every flag clear.
    pub const EMPTY: Cell = Cell(0);

    /// Raw flag bits.
    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_visited(self) -> bool {
        self.0 & Cell::VISITED != 0
    }

    /// Whether a carved passage leaves this cell in `direction`.
    pub const fn has_passage(self, direction: Direction) -> bool {
        self.0 & direction.passage_bit() != 0
    }

    /// Directions in which passages leave this cell, in N, E, S, W order.
    pub fn passages(self) -> impl Iterator<Item = Direction> {
        Direction::ALL
            .into_iter()
            .filter(move |&direction| self.has_passage(direction))
    }

    pub(crate) fn mark_visited(&mut self) {
        self.0 |= Cell::VISITED;
    }

    pub(crate) fn open(&mut self, direction: Direction) {
        self.0 |= direction.passage_bit();
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = |direction, symbol| {
            if self.has_passage(direction) {
                symbol
            } else {
                '.'
            }
        };
        write!(
            f,
            "{}{}{}{}{}",
            if self.is_visited() { 'v' } else { '-' },
            arrow(Direction::North, 'N'),
            arrow(Direction::East, 'E'),
            arrow(Direction::South, 'S'),
            arrow(Direction::West, 'W'),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_are_independent() {
        let mut cell = Cell::EMPTY;
        assert!(!cell.is_visited());
        cell.open(Direction::East);
        assert!(!cell.is_visited());
        assert!(cell.has_passage(Direction::East));
        assert!(!cell.has_passage(Direction::West));

        cell.mark_visited();
        cell.mark_visited();
        assert_eq!(cell.bits(), Cell::VISITED | Cell::PATH_E);
    }

    #[test]
    fn test_passages_iterates_open_sides() {
        let mut cell = Cell::EMPTY;
        cell.open(Direction::West);
        cell.open(Direction::North);
        assert_eq!(
            cell.passages().collect::<Vec<_>>(),
            vec![Direction::North, Direction::West]
        );
    }

    #[test]
    fn test_display() {
        let mut cell = Cell::EMPTY;
        assert_eq!(cell.to_string(), "-....");
        cell.mark_visited();
        cell.open(Direction::South);
        assert_eq!(cell.to_string(), "v..S.");
    }
}
