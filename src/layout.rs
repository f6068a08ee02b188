//! Finalized maze description: navigability per cell and coin cells

use itertools::Itertools;
use log::info;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::coin_placer::place_coins;
use crate::config::MazeConfig;
use crate::error::Result;
use crate::maze_generator::{self, Direction};
use crate::physics::Position;
use crate::random::RandomStream;
use crate::restrictor::WallRestrictor;

/// Navigability of one grid cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutCell {
    pub row: usize,
    pub column: usize,
    pub can_move_left: bool,
    pub can_move_right: bool,
    /// Towards decreasing row
    pub can_move_backward: bool,
    /// Towards increasing row
    pub can_move_forward: bool,
    pub has_coin: bool,
}

impl LayoutCell {
    pub fn can_move(&self, direction: Direction) -> bool {
        match direction {
            Direction::Left => self.can_move_left,
            Direction::Right => self.can_move_right,
            Direction::Back => self.can_move_backward,
            Direction::Front => self.can_move_forward,
        }
    }
}

/// Immutable maze produced once per run
#[derive(Debug, Clone, PartialEq)]
pub struct MazeLayout {
    rows: usize,
    cols: usize,
    cell_width: f32,
    cell_height: f32,
    /// Row-major cells
    cells: Vec<LayoutCell>,
    /// Indices of coin cells, in assignment order
    coins: Vec<usize>,
    requested_coins: usize,
}

impl MazeLayout {
    const S_WALL: char = '🟫';
    const S_VALID: char = '🟩';
    const S_COIN: char = '🪙';
    const S_BALL: char = '⚽';

    /// Generate, restrict and place coins, drawing from one seeded stream.
    pub fn build(config: &MazeConfig) -> Result<Self> {
        config.validate()?;
        let mut random = RandomStream::new(config.seed);

        let mut grid = maze_generator::generate(config.rows, config.cols, &mut random)?;
        WallRestrictor::new(config.rows, config.cols, config.restriction_odds).apply(
            &mut grid,
            config.restriction_effect,
            &mut random,
        );

        let mut cells: Vec<LayoutCell> = (0..config.rows)
            .cartesian_product(0..config.cols)
            .map(|(row, column)| {
                let cell = grid.cell(row, column);
                LayoutCell {
                    row,
                    column,
                    can_move_left: !cell.wall_left,
                    can_move_right: !cell.wall_right,
                    can_move_backward: !cell.wall_back,
                    can_move_forward: !cell.wall_front,
                    has_coin: false,
                }
            })
            .collect();

        let placement = place_coins(&cells, config.rows, config.cols, config.coins, &mut random);
        for &index in &placement.cells {
            cells[index].has_coin = true;
        }
        info!(
            "built {}x{} maze with {} coins (seed {:?})",
            config.rows,
            config.cols,
            placement.cells.len(),
            config.seed
        );

        Ok(Self {
            rows: config.rows,
            cols: config.cols,
            cell_width: config.cell_width,
            cell_height: config.cell_height,
            cells,
            coins: placement.cells,
            requested_coins: placement.requested,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cells(&self) -> &[LayoutCell] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&LayoutCell> {
        self.cells.get(index)
    }

    pub fn index_of(&self, row: usize, column: usize) -> Option<usize> {
        (row < self.rows && column < self.cols).then(|| row * self.cols + column)
    }

    pub fn cell_at(&self, row: usize, column: usize) -> Option<&LayoutCell> {
        self.index_of(row, column).and_then(|i| self.cells.get(i))
    }

    /// Coin cell indices
    pub fn coin_cells(&self) -> &[usize] {
        &self.coins
    }

    /// Number of coins actually placed
    pub fn coin_count(&self) -> usize {
        self.coins.len()
    }

    pub fn requested_coins(&self) -> usize {
        self.requested_coins
    }

    /// Index of the open neighbour on `direction`, if the move is allowed
    pub fn step(&self, index: usize, direction: Direction) -> Option<usize> {
        let cell = self.cells.get(index)?;
        if !cell.can_move(direction) {
            return None;
        }
        let (dr, dc) = direction.delta();
        let row = cell.row.checked_add_signed(dr)?;
        let column = cell.column.checked_add_signed(dc)?;
        self.index_of(row, column)
    }

    /// World position of the centre of a cell
    pub fn cell_centre(&self, index: usize) -> Position {
        let row = index / self.cols;
        let column = index % self.cols;
        Position {
            x: column as f32 * self.cell_width,
            z: row as f32 * self.cell_height,
        }
    }

    /// Index of the cell whose square contains `position`
    pub fn cell_containing(&self, position: Position) -> Option<usize> {
        let column = (position.x / self.cell_width).round();
        let row = (position.z / self.cell_height).round();
        if !(column >= 0.0 && row >= 0.0) {
            return None;
        }
        self.index_of(row as usize, column as usize)
    }

    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> f32 {
        self.cell_height
    }

    /// Undirected graph of open passages. Node `i` is cell `i`.
    pub fn passage_graph(&self) -> UnGraph<usize, ()> {
        let mut graph = UnGraph::with_capacity(self.cells.len(), self.cells.len() * 2);
        for index in 0..self.cells.len() {
            graph.add_node(index);
        }
        for index in 0..self.cells.len() {
            for direction in [Direction::Right, Direction::Front] {
                if let Some(next) = self.step(index, direction) {
                    graph.add_edge(NodeIndex::new(index), NodeIndex::new(next), ());
                }
            }
        }
        graph
    }

    /// Text picture of the maze, row 0 on top, optionally with the agent
    pub fn render(&self, agent: Option<Position>) -> String {
        let height = self.rows * 2 + 1;
        let width = self.cols * 2 + 1;
        let mut squares = vec![vec![Self::S_WALL; width]; height];

        for (index, cell) in self.cells.iter().enumerate() {
            let y = cell.row * 2 + 1;
            let x = cell.column * 2 + 1;
            squares[y][x] = if cell.has_coin {
                Self::S_COIN
            } else {
                Self::S_VALID
            };
            if cell.can_move_right && self.step(index, Direction::Right).is_some() {
                squares[y][x + 1] = Self::S_VALID;
            }
            if cell.can_move_forward && self.step(index, Direction::Front).is_some() {
                squares[y + 1][x] = Self::S_VALID;
            }
        }

        if let Some(index) = agent.and_then(|p| self.cell_containing(p)) {
            let cell = &self.cells[index];
            squares[cell.row * 2 + 1][cell.column * 2 + 1] = Self::S_BALL;
        }

        squares.iter().map(|row| row.iter().join("")).join("\n")
    }
}

#[cfg(test)]
mod tests {
    use petgraph::algo::connected_components;

    use super::MazeLayout;
    use crate::config::{MazeConfig, RestrictionEffect};
    use crate::maze_generator::Direction;
    use crate::physics::Position;

    #[test]
    fn three_by_three_single_coin_is_in_the_corner() {
        let layout = MazeLayout::build(&MazeConfig::new(3, 3, 1, 70)).unwrap();
        let coins: Vec<(usize, usize)> = layout
            .cells()
            .iter()
            .filter(|c| c.has_coin)
            .map(|c| (c.row, c.column))
            .collect();
        assert_eq!(coins, vec![(2, 2)]);
        assert_eq!(layout.coin_count(), 1);
    }

    #[test]
    fn coin_count_matches_flags() {
        let layout = MazeLayout::build(&MazeConfig::new(7, 6, 9, 3)).unwrap();
        assert_eq!(layout.coin_count(), 9);
        assert_eq!(layout.cells().iter().filter(|c| c.has_coin).count(), 9);
        assert!(layout.cell_at(6, 5).unwrap().has_coin);
    }

    #[test]
    fn under_filled_layout_reports_placed_count() {
        let layout = MazeLayout::build(&MazeConfig::new(2, 2, 5, 3)).unwrap();
        assert_eq!(layout.coin_count(), 1);
        assert_eq!(layout.requested_coins(), 5);
    }

    #[test]
    fn same_seed_same_layout() {
        let config = MazeConfig::new(12, 9, 4, 1234);
        assert_eq!(
            MazeLayout::build(&config).unwrap(),
            MazeLayout::build(&config).unwrap()
        );
    }

    #[test]
    fn different_seeds_usually_differ() {
        let a = MazeLayout::build(&MazeConfig::new(12, 12, 4, 1)).unwrap();
        let b = MazeLayout::build(&MazeConfig::new(12, 12, 4, 2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn removing_walls_keeps_the_maze_connected() {
        let config = MazeConfig {
            restriction_effect: RestrictionEffect::RemoveWall,
            restriction_odds: 4,
            ..MazeConfig::new(9, 9, 3, 8)
        };
        let layout = MazeLayout::build(&config).unwrap();
        assert_eq!(connected_components(&layout.passage_graph()), 1);
    }

    #[test]
    fn navigability_is_symmetric() {
        let layout = MazeLayout::build(&MazeConfig::new(8, 8, 2, 5)).unwrap();
        for (index, cell) in layout.cells().iter().enumerate() {
            if let Some(next) = layout.step(index, Direction::Right) {
                assert!(layout.cell(next).unwrap().can_move_left);
            }
            if let Some(next) = layout.step(index, Direction::Front) {
                assert!(layout.cell(next).unwrap().can_move_backward);
            }
            if cell.row == 0 {
                assert!(!cell.can_move_backward);
            }
            if cell.column == 7 {
                assert!(!cell.can_move_right);
            }
        }
    }

    #[test]
    fn world_coordinates_round_trip_cell_index() {
        let layout = MazeLayout::build(&MazeConfig::new(4, 5, 1, 0)).unwrap();
        let centre = layout.cell_centre(13);
        assert_eq!(centre, Position { x: 12.0, z: 8.0 });
        assert_eq!(layout.cell_containing(centre), Some(13));
        assert_eq!(layout.cell_containing(Position { x: 13.9, z: 6.1 }), Some(13));
        assert_eq!(layout.cell_containing(Position { x: -3.0, z: 0.0 }), None);
        assert_eq!(layout.cell_containing(Position { x: 0.0, z: 100.0 }), None);
    }

    #[test]
    fn render_has_expected_shape() {
        let layout = MazeLayout::build(&MazeConfig::new(3, 4, 1, 0)).unwrap();
        let picture = layout.render(Some(Position { x: 0.0, z: 0.0 }));
        let lines: Vec<&str> = picture.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines.iter().all(|l| l.chars().count() == 9));
        assert_eq!(lines[1].chars().nth(1), Some(MazeLayout::S_BALL));
        assert_eq!(lines[5].chars().nth(7), Some(MazeLayout::S_COIN));
        assert!(lines[0].chars().all(|c| c == MazeLayout::S_WALL));
    }
}
