use std::fmt;

use crate::{
    error::{MazeError, Result},
    maze::{Cell, Coord, Direction},
};

/// Fixed-size rectangular array of cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    data: Box<[Cell]>,
    width: u16,
    height: u16,
}

impl Grid {
    /// Creates a `width` x `height` grid with every flag clear.
    pub fn new(width: u16, height: u16) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MazeError::InvalidDimension { width, height });
        }
        let data = vec![Cell::EMPTY; width as usize * height as usize].into_boxed_slice();
        Ok(Grid {
            data,
            width,
            height,
        })
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false, a grid has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.width && coord.1 < self.height
    }

    fn ravel_index(&self, x: u16, y: u16) -> usize {
        // Overflow-safe since width and height are u16 (assuming usize is at least 32 bits)
        y as usize * self.width as usize + x as usize
    }

    fn checked_index(&self, coord: Coord) -> Result<usize> {
        if self.is_in_bounds(coord) {
            Ok(self.ravel_index(coord.0, coord.1))
        } else {
            Err(self.out_of_bounds(coord.0 as i32, coord.1 as i32))
        }
    }

    fn out_of_bounds(&self, x: i32, y: i32) -> MazeError {
        MazeError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    /// The adjacent coordinate in `direction`, or `None` if it falls outside the grid.
    pub fn neighbor(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        let (dx, dy) = direction.offset();
        let x = u16::try_from(coord.0 as i32 + dx).ok()?;
        let y = u16::try_from(coord.1 as i32 + dy).ok()?;
        self.is_in_bounds((x, y)).then_some((x, y))
    }

    pub fn cell(&self, coord: Coord) -> Result<Cell> {
        self.checked_index(coord).map(|idx| self.data[idx])
    }

    pub fn is_visited(&self, coord: Coord) -> Result<bool> {
        self.cell(coord).map(Cell::is_visited)
    }

    pub fn has_passage(&self, coord: Coord, direction: Direction) -> Result<bool> {
        self.cell(coord).map(|cell| cell.has_passage(direction))
    }

    /// Sets the visited flag. Marking an already visited cell is a no-op.
    pub fn mark_visited(&mut self, coord: Coord) -> Result<()> {
        let idx = self.checked_index(coord)?;
        self.data[idx].mark_visited();
        Ok(())
    }

    /// Opens a passage from `from` towards `direction`, setting the mirrored flag on the
    /// neighbor in the same call. Returns the neighbor's coordinate.
    ///
    /// Fails with `OutOfBounds` if `from` or the implied neighbor lies outside the grid;
    /// nothing is modified in that case.
    pub fn carve_passage(&mut self, from: Coord, direction: Direction) -> Result<Coord> {
        let from_idx = self.checked_index(from)?;
        let to = self.neighbor(from, direction).ok_or_else(|| {
            let (dx, dy) = direction.offset();
            self.out_of_bounds(from.0 as i32 + dx, from.1 as i32 + dy)
        })?;
        let to_idx = self.ravel_index(to.0, to.1);
        self.data[from_idx].open(direction);
        self.data[to_idx].open(direction.opposite());
        Ok(to)
    }

    /// Clears every flag on every cell.
    pub fn clear(&mut self) {
        self.data.fill(Cell::EMPTY);
    }

    /// Number of cells with the visited flag set.
    pub fn visited_count(&self) -> usize {
        self.data.iter().filter(|cell| cell.is_visited()).count()
    }

    /// Number of carved passages. Each passage is counted once, from its north/west end.
    pub fn passage_count(&self) -> usize {
        self.data
            .iter()
            .map(|cell| {
                cell.has_passage(Direction::East) as usize
                    + cell.has_passage(Direction::South) as usize
            })
            .sum()
    }

    /// Iterates over all coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| (x, y)))
    }
}

impl std::ops::Index<Coord> for Grid {
    type Output = Cell;

    fn index(&self, index: Coord) -> &Self::Output {
        assert!(
            self.is_in_bounds(index),
            "The given coordinate is out of bounds"
        );
        &self.data[self.ravel_index(index.0, index.1)]
    }
}

/// ASCII drawing of the maze: walls are `+--+` and `|`, unvisited cells are shaded.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let open = self[(x, y)].has_passage(Direction::North);
                write!(f, "+{}", if open { "  " } else { "--" })?;
            }
            writeln!(f, "+")?;
            for x in 0..self.width {
                let cell = self[(x, y)];
                let wall = if cell.has_passage(Direction::West) { ' ' } else { '|' };
                let body = if cell.is_visited() { "  " } else { "##" };
                write!(f, "{wall}{body}")?;
            }
            writeln!(f, "|")?;
        }
        for _ in 0..self.width {
            write!(f, "+--")?;
        }
        writeln!(f, "+")
    }
}
