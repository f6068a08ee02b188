//! Randomized restriction of interior walls
//!
//! After generation every interior edge gets one random decision, drawn the
//! first time either of its two sides is consulted and reused for the other
//! side. Decisions live in a table indexed by canonical edge key: the
//! lower-indexed cell's vertex id (`row + column * rows`) and whether the
//! edge faces `Front` or `Right` from that cell.

use crate::config::RestrictionEffect;
use crate::maze_generator::{Direction, MazeGrid};
use crate::random::RandomStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeState {
    Undecided,
    Kept,
    Restricted,
}

/// Memoized per-edge restriction decisions
pub struct WallRestrictor {
    rows: usize,
    cols: usize,
    odds: u32,
    edges: Vec<EdgeState>,
}

impl WallRestrictor {
    /// Order in which the sides of a cell are consulted
    pub const CONSULT_ORDER: [Direction; 4] = [
        Direction::Right,
        Direction::Front,
        Direction::Left,
        Direction::Back,
    ];

    pub fn new(rows: usize, cols: usize, odds: u32) -> Self {
        Self {
            rows,
            cols,
            odds,
            edges: vec![EdgeState::Undecided; rows * cols * 2],
        }
    }

    fn is_border(&self, column: usize, row: usize, wall: Direction) -> bool {
        match wall {
            Direction::Back => row == 0,
            Direction::Front => row + 1 == self.rows,
            Direction::Left => column == 0,
            Direction::Right => column + 1 == self.cols,
        }
    }

    /// Table slot shared by both sides of an interior edge
    fn edge_key(&self, column: usize, row: usize, wall: Direction) -> usize {
        let (row, column, kind) = match wall {
            Direction::Front => (row, column, 0),
            Direction::Back => (row - 1, column, 0),
            Direction::Right => (row, column, 1),
            Direction::Left => (row, column - 1, 1),
        };
        (row + column * self.rows) * 2 + kind
    }

    /// Decide whether the edge on `wall` of cell `(row, column)` is restricted.
    ///
    /// Border sides are never restricted and consume no randomness. An
    /// interior edge draws `1 / odds` on first contact from either side.
    pub fn should_restrict(
        &mut self,
        column: usize,
        row: usize,
        wall: Direction,
        random: &mut RandomStream,
    ) -> bool {
        if self.is_border(column, row, wall) {
            return false;
        }
        let key = self.edge_key(column, row, wall);
        match self.edges[key] {
            EdgeState::Kept => false,
            EdgeState::Restricted => true,
            EdgeState::Undecided => {
                let restrict = random.one_in(self.odds);
                self.edges[key] = if restrict {
                    EdgeState::Restricted
                } else {
                    EdgeState::Kept
                };
                restrict
            }
        }
    }

    /// Consult every side of every cell, row by row, and apply the decisions.
    pub fn apply(
        &mut self,
        grid: &mut MazeGrid,
        effect: RestrictionEffect,
        random: &mut RandomStream,
    ) -> usize {
        let mut changed = 0;
        for row in 0..grid.rows() {
            for column in 0..grid.cols() {
                for wall in Self::CONSULT_ORDER {
                    let restrict = self.should_restrict(column, row, wall, random);
                    let present = grid.cell(row, column).wall(wall);
                    let updated = match effect {
                        RestrictionEffect::ClosePassage => present || restrict,
                        RestrictionEffect::RemoveWall => present && !restrict,
                    };
                    if updated != present {
                        grid.set_edge(row, column, wall, updated);
                        changed += 1;
                    }
                }
            }
        }
        log::debug!("wall restriction changed {changed} edges ({effect:?})");
        changed
    }
}
