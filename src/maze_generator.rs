//! Spanning-tree maze generation

use crate::error::{MazeError, Result};
use crate::random::RandomStream;

/// Side of a cell. `Front` faces increasing row, `Back` decreasing row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Back,
    Front,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Back,
        Direction::Front,
    ];

    /// The matching side of the neighbouring cell
    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Back => Direction::Front,
            Direction::Front => Direction::Back,
        }
    }

    /// (row, column) delta towards the neighbour on this side
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Back => (-1, 0),
            Direction::Front => (1, 0),
        }
    }
}

/// Four independent wall flags; `true` means the wall is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub wall_left: bool,
    pub wall_right: bool,
    pub wall_back: bool,
    pub wall_front: bool,
}

impl Cell {
    fn walled() -> Self {
        Self {
            wall_left: true,
            wall_right: true,
            wall_back: true,
            wall_front: true,
        }
    }

    pub fn wall(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.wall_left,
            Direction::Right => self.wall_right,
            Direction::Back => self.wall_back,
            Direction::Front => self.wall_front,
        }
    }

    fn set_wall(&mut self, direction: Direction, present: bool) {
        match direction {
            Direction::Left => self.wall_left = present,
            Direction::Right => self.wall_right = present,
            Direction::Back => self.wall_back = present,
            Direction::Front => self.wall_front = present,
        }
    }
}

/// Rectangular grid of cells, stored row by row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MazeGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl MazeGrid {
    fn walled(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::walled(); rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at `(row, column)`. Panics when out of range.
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        &self.cells[row * self.cols + column]
    }

    /// Whether this side of the cell is part of the outer boundary
    pub fn is_border(&self, row: usize, column: usize, direction: Direction) -> bool {
        self.neighbour(row, column, direction).is_none()
    }

    /// Coordinates of the adjacent cell on `direction`, if inside the grid
    pub fn neighbour(
        &self,
        row: usize,
        column: usize,
        direction: Direction,
    ) -> Option<(usize, usize)> {
        let (dr, dc) = direction.delta();
        let r = row.checked_add_signed(dr)?;
        let c = column.checked_add_signed(dc)?;
        (r < self.rows && c < self.cols).then_some((r, c))
    }

    /// Place or clear the wall shared with the neighbour on `direction`.
    ///
    /// Both cells are updated together. A border side has no neighbour and
    /// is left untouched.
    pub fn set_edge(&mut self, row: usize, column: usize, direction: Direction, present: bool) {
        if let Some((r, c)) = self.neighbour(row, column, direction) {
            let cols = self.cols;
            self.cells[row * cols + column].set_wall(direction, present);
            self.cells[r * cols + c].set_wall(direction.opposite(), present);
        }
    }
}

/// Generate a perfect maze by randomized depth-first carving.
///
/// Starts from `(0, 0)` with every wall present. At each step an unvisited
/// neighbour of the cell on top of the stack is chosen at random and the
/// wall between them is removed; the stack is popped when a cell has no
/// unvisited neighbours left. The result is a spanning tree of the grid
/// that depends only on `random`.
pub fn generate(rows: usize, cols: usize, random: &mut RandomStream) -> Result<MazeGrid> {
    if rows == 0 || cols == 0 {
        return Err(MazeError::InvalidArgument(format!(
            "maze dimensions must be positive, got {rows}x{cols}"
        )));
    }

    let mut grid = MazeGrid::walled(rows, cols);
    let mut visited = vec![false; rows * cols];
    let mut stack = vec![(0usize, 0usize)];
    visited[0] = true;

    while let Some(&(row, column)) = stack.last() {
        let candidates: Vec<(Direction, usize, usize)> = Direction::ALL
            .iter()
            .filter_map(|&d| {
                grid.neighbour(row, column, d)
                    .filter(|&(r, c)| !visited[r * cols + c])
                    .map(|(r, c)| (d, r, c))
            })
            .collect();

        if candidates.is_empty() {
            stack.pop();
            continue;
        }

        let (direction, r, c) = candidates[random.index(candidates.len())];
        grid.set_edge(row, column, direction, false);
        visited[r * cols + c] = true;
        stack.push((r, c));
    }

    Ok(grid)
}
