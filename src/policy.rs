//! Control policies: turn the agent position into a move command

use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use log::debug;
use petgraph::algo::astar;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::error::{MazeError, Result};
use crate::layout::MazeLayout;
use crate::physics::{Force, Position};

/// Bitmask of requested directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MoveCommand(u8);

impl MoveCommand {
    pub const NONE: MoveCommand = MoveCommand(0);
    /// Towards +x
    pub const RIGHT: MoveCommand = MoveCommand(1);
    /// Towards -x
    pub const LEFT: MoveCommand = MoveCommand(2);
    /// Towards +z (increasing row)
    pub const FRONT: MoveCommand = MoveCommand(4);
    /// Towards -z (decreasing row)
    pub const BACK: MoveCommand = MoveCommand(8);

    pub fn from_bits(bits: u8) -> Self {
        MoveCommand(bits & 0b1111)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: MoveCommand) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Normalised direction scaled to `speed`, or `None` when the
    /// requested directions cancel out.
    pub fn force(self, speed: f32) -> Option<Force> {
        let mut x = 0.0f32;
        let mut z = 0.0f32;
        if self.contains(Self::RIGHT) {
            x += 1.0;
        }
        if self.contains(Self::BACK) {
            z -= 1.0;
        }
        if self.contains(Self::LEFT) {
            x -= 1.0;
        }
        if self.contains(Self::FRONT) {
            z += 1.0;
        }
        let length = x.hypot(z);
        (length > 0.0).then(|| Force {
            x: x / length * speed,
            z: z / length * speed,
        })
    }
}

impl BitOr for MoveCommand {
    type Output = MoveCommand;

    fn bitor(self, rhs: Self) -> Self {
        MoveCommand(self.0 | rhs.0)
    }
}

impl FromStr for MoveCommand {
    type Err = MazeError;

    /// Letters `R`, `L`, `F`, `B` in any combination, or `-` for no move
    fn from_str(s: &str) -> Result<Self> {
        if s == "-" {
            return Ok(Self::NONE);
        }
        s.chars().try_fold(Self::NONE, |acc, c| {
            let part = match c.to_ascii_uppercase() {
                'R' => Self::RIGHT,
                'L' => Self::LEFT,
                'F' => Self::FRONT,
                'B' => Self::BACK,
                other => {
                    return Err(MazeError::InvalidArgument(format!(
                        "unknown move `{other}` in `{s}`"
                    )))
                }
            };
            Ok(acc | part)
        })
    }
}

impl fmt::Display for MoveCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return f.write_str("-");
        }
        for (flag, letter) in [
            (Self::RIGHT, 'R'),
            (Self::LEFT, 'L'),
            (Self::FRONT, 'F'),
            (Self::BACK, 'B'),
        ] {
            if self.contains(flag) {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}

/// Decision-making capability queried once per tick
pub trait ControlPolicy {
    /// Provide the maze. Must precede any [`Self::get_move`]; calling it
    /// again resets the policy to the same initial state.
    fn set_maze(&mut self, layout: &MazeLayout) -> Result<()>;

    /// Move command for an agent at `(x, z)`
    fn get_move(&mut self, x: f32, z: f32) -> Result<MoveCommand>;
}

impl<P: ControlPolicy + ?Sized> ControlPolicy for Box<P> {
    fn set_maze(&mut self, layout: &MazeLayout) -> Result<()> {
        (**self).set_maze(layout)
    }

    fn get_move(&mut self, x: f32, z: f32) -> Result<MoveCommand> {
        (**self).get_move(x, z)
    }
}

/// Policy that never moves
#[derive(Debug, Default)]
pub struct IdlePolicy {
    ready: bool,
}

impl ControlPolicy for IdlePolicy {
    fn set_maze(&mut self, _layout: &MazeLayout) -> Result<()> {
        self.ready = true;
        Ok(())
    }

    fn get_move(&mut self, _x: f32, _z: f32) -> Result<MoveCommand> {
        if !self.ready {
            return Err(MazeError::NotInitialized);
        }
        Ok(MoveCommand::NONE)
    }
}

/// External supplier of manual commands (keyboard, UI, script)
pub trait MoveSource {
    fn next_move(&mut self) -> Result<MoveCommand>;
}

/// Pre-recorded commands, one per tick; no move once exhausted
#[derive(Debug, Clone, Default)]
pub struct ScriptedMoves {
    moves: VecDeque<MoveCommand>,
}

impl ScriptedMoves {
    pub fn new(moves: impl IntoIterator<Item = MoveCommand>) -> Self {
        Self {
            moves: moves.into_iter().collect(),
        }
    }

    /// Parse whitespace separated commands, e.g. `"R R F - RB"`
    pub fn parse(text: &str) -> Result<Self> {
        let moves = text
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<VecDeque<MoveCommand>>>()?;
        Ok(Self { moves })
    }

    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

impl MoveSource for ScriptedMoves {
    fn next_move(&mut self) -> Result<MoveCommand> {
        Ok(self.moves.pop_front().unwrap_or(MoveCommand::NONE))
    }
}

/// Forwards commands from a [`MoveSource`] without interpreting them
pub struct ManualPolicy<S> {
    source: S,
    ready: bool,
}

impl<S: MoveSource> ManualPolicy<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            ready: false,
        }
    }
}

impl<S: MoveSource> ControlPolicy for ManualPolicy<S> {
    fn set_maze(&mut self, _layout: &MazeLayout) -> Result<()> {
        self.ready = true;
        Ok(())
    }

    fn get_move(&mut self, _x: f32, _z: f32) -> Result<MoveCommand> {
        if !self.ready {
            return Err(MazeError::NotInitialized);
        }
        self.source.next_move()
    }
}

struct Planner {
    layout: MazeLayout,
    graph: UnGraph<usize, ()>,
    /// Coin cells whose centre the agent has been at
    reached: BTreeSet<usize>,
    tolerance: f32,
}

/// Follows shortest passages to the nearest coin not yet reached.
///
/// The agent is steered towards the centre of the next cell on the path,
/// one axis bit per coordinate that is off by more than the tolerance.
/// Unless given explicitly, the tolerance is [`Self::TOLERANCE_FRACTION`] of
/// the smaller cell side of the maze passed to `set_maze`.
#[derive(Default)]
pub struct AutoPolicy {
    tolerance: Option<f32>,
    planner: Option<Planner>,
}

impl AutoPolicy {
    pub const TOLERANCE_FRACTION: f32 = 0.125;

    pub fn new(tolerance: f32) -> Self {
        Self {
            tolerance: Some(tolerance),
            planner: None,
        }
    }

    /// Tolerance used for a maze with these cell sizes
    pub fn tolerance_for(&self, layout: &MazeLayout) -> f32 {
        self.tolerance.unwrap_or_else(|| {
            layout.cell_width().min(layout.cell_height()) * Self::TOLERANCE_FRACTION
        })
    }

    fn steer(tolerance: f32, from: Position, to: Position) -> MoveCommand {
        let mut command = MoveCommand::NONE;
        let dx = to.x - from.x;
        let dz = to.z - from.z;
        if dx > tolerance {
            command = command | MoveCommand::RIGHT;
        } else if dx < -tolerance {
            command = command | MoveCommand::LEFT;
        }
        if dz > tolerance {
            command = command | MoveCommand::FRONT;
        } else if dz < -tolerance {
            command = command | MoveCommand::BACK;
        }
        command
    }
}

impl ControlPolicy for AutoPolicy {
    fn set_maze(&mut self, layout: &MazeLayout) -> Result<()> {
        self.planner = Some(Planner {
            graph: layout.passage_graph(),
            layout: layout.clone(),
            reached: BTreeSet::new(),
            tolerance: self.tolerance_for(layout),
        });
        Ok(())
    }

    fn get_move(&mut self, x: f32, z: f32) -> Result<MoveCommand> {
        let planner = self.planner.as_mut().ok_or(MazeError::NotInitialized)?;
        let tolerance = planner.tolerance;
        let position = Position { x, z };
        let cell = planner.layout.cell_containing(position).ok_or_else(|| {
            MazeError::Policy(format!("position ({x}, {z}) is outside the maze"))
        })?;

        let centre = planner.layout.cell_centre(cell);
        let layout = &planner.layout;
        if layout.coin_cells().contains(&cell)
            && (centre.x - x).abs() <= tolerance
            && (centre.z - z).abs() <= tolerance
        {
            planner.reached.insert(cell);
        }

        let reached = &planner.reached;
        let remaining: BTreeSet<usize> = layout
            .coin_cells()
            .iter()
            .copied()
            .filter(|c| !reached.contains(c))
            .collect();
        if remaining.is_empty() {
            return Ok(MoveCommand::NONE);
        }

        let Some((_, path)) = astar(
            &planner.graph,
            NodeIndex::new(cell),
            |n| remaining.contains(&n.index()),
            |_| 1,
            |_| 0,
        ) else {
            debug!("no passage from cell {cell} to any remaining coin");
            return Ok(MoveCommand::NONE);
        };

        let next = path.get(1).unwrap_or(&path[0]).index();
        let target = layout.cell_centre(next);
        Ok(Self::steer(tolerance, position, target))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AutoPolicy, ControlPolicy, IdlePolicy, ManualPolicy, MoveCommand, ScriptedMoves,
    };
    use crate::config::MazeConfig;
    use crate::error::MazeError;
    use crate::layout::MazeLayout;
    use crate::maze_generator::Direction;

    fn layout() -> MazeLayout {
        MazeLayout::build(&MazeConfig::new(6, 6, 3, 17)).unwrap()
    }

    #[test]
    fn force_directions() {
        let f = MoveCommand::RIGHT.force(32.0).unwrap();
        assert_eq!((f.x, f.z), (32.0, 0.0));
        let f = MoveCommand::BACK.force(1.0).unwrap();
        assert_eq!((f.x, f.z), (0.0, -1.0));
        let f = (MoveCommand::LEFT | MoveCommand::FRONT).force(2.0).unwrap();
        assert!((f.x + 2.0f32.sqrt()).abs() < 1e-5);
        assert!((f.z - 2.0f32.sqrt()).abs() < 1e-5);
        assert!(MoveCommand::NONE.force(32.0).is_none());
        assert!((MoveCommand::LEFT | MoveCommand::RIGHT).force(32.0).is_none());
    }

    #[test]
    fn parse_and_display_commands() {
        let c: MoveCommand = "rf".parse().unwrap();
        assert_eq!(c, MoveCommand::RIGHT | MoveCommand::FRONT);
        assert_eq!(c.to_string(), "RF");
        assert_eq!("-".parse::<MoveCommand>().unwrap(), MoveCommand::NONE);
        assert!(matches!(
            "X".parse::<MoveCommand>(),
            Err(MazeError::InvalidArgument(_))
        ));
        assert_eq!(MoveCommand::from_bits(0xff).bits(), 0b1111);
    }

    #[test]
    fn policies_require_a_maze() {
        let mut auto = AutoPolicy::default();
        assert_eq!(auto.get_move(0.0, 0.0), Err(MazeError::NotInitialized));
        let mut idle = IdlePolicy::default();
        assert_eq!(idle.get_move(0.0, 0.0), Err(MazeError::NotInitialized));
        let mut manual = ManualPolicy::new(ScriptedMoves::default());
        assert_eq!(manual.get_move(0.0, 0.0), Err(MazeError::NotInitialized));
    }

    #[test]
    fn manual_policy_replays_script() {
        let script = ScriptedMoves::parse("R F -").unwrap();
        assert_eq!(script.remaining(), 3);
        let mut policy = ManualPolicy::new(script);
        policy.set_maze(&layout()).unwrap();
        assert_eq!(policy.get_move(0.0, 0.0).unwrap(), MoveCommand::RIGHT);
        assert_eq!(policy.get_move(9.0, 9.0).unwrap(), MoveCommand::FRONT);
        assert_eq!(policy.get_move(0.0, 0.0).unwrap(), MoveCommand::NONE);
        assert_eq!(policy.get_move(0.0, 0.0).unwrap(), MoveCommand::NONE);
    }

    #[test]
    fn auto_policy_heads_through_an_open_passage() {
        let layout = layout();
        let mut policy = AutoPolicy::default();
        policy.set_maze(&layout).unwrap();
        let command = policy.get_move(0.0, 0.0).unwrap();
        let open: Vec<MoveCommand> = [
            (Direction::Right, MoveCommand::RIGHT),
            (Direction::Front, MoveCommand::FRONT),
        ]
        .into_iter()
        .filter(|(d, _)| layout.step(0, *d).is_some())
        .map(|(_, c)| c)
        .collect();
        if command != MoveCommand::NONE {
            assert!(open.contains(&command), "{command} not in {open:?}");
        }
    }

    #[test]
    fn auto_policy_rejects_positions_outside_the_maze() {
        let mut policy = AutoPolicy::default();
        policy.set_maze(&layout()).unwrap();
        assert!(matches!(
            policy.get_move(-50.0, 0.0),
            Err(MazeError::Policy(_))
        ));
    }

    #[test]
    fn set_maze_twice_gives_identical_moves() {
        let layout = layout();
        let probes = [(0.0, 0.0), (4.0, 0.0), (8.3, 12.1), (20.0, 20.0), (1.0, 3.9)];

        let mut once = AutoPolicy::default();
        once.set_maze(&layout).unwrap();
        let mut twice = AutoPolicy::default();
        twice.set_maze(&layout).unwrap();
        twice.set_maze(&layout).unwrap();

        for (x, z) in probes {
            assert_eq!(once.get_move(x, z), twice.get_move(x, z));
        }
    }

    #[test]
    fn set_maze_resets_reached_coins() {
        let layout = layout();
        let corner = layout.cell_centre(layout.index_of(5, 5).unwrap());
        let mut policy = AutoPolicy::default();
        policy.set_maze(&layout).unwrap();
        let first = policy.get_move(0.0, 0.0).unwrap();
        // Visiting the corner coin marks it reached.
        policy.get_move(corner.x, corner.z).unwrap();
        policy.set_maze(&layout).unwrap();
        assert_eq!(policy.get_move(0.0, 0.0).unwrap(), first);
    }

    #[test]
    fn tolerance_scales_with_cell_size() {
        let small = MazeLayout::build(&MazeConfig {
            cell_width: 1.0,
            cell_height: 2.0,
            ..MazeConfig::new(4, 4, 1, 3)
        })
        .unwrap();
        assert_eq!(AutoPolicy::default().tolerance_for(&small), 0.125);
        assert_eq!(AutoPolicy::default().tolerance_for(&layout()), 0.5);
        assert_eq!(AutoPolicy::new(0.3).tolerance_for(&small), 0.3);

        // 0.2 off the centre is outside the tolerance of a one-unit cell.
        let mut policy = AutoPolicy::default();
        policy.set_maze(&small).unwrap();
        let corner = small.cell_centre(small.index_of(3, 3).unwrap());
        let command = policy.get_move(corner.x - 0.2, corner.z).unwrap();
        assert_eq!(command, MoveCommand::RIGHT);
    }

    #[test]
    fn boxed_policy_delegates() {
        let mut policy: Box<dyn ControlPolicy> = Box::new(IdlePolicy::default());
        policy.set_maze(&layout()).unwrap();
        assert_eq!(policy.get_move(1.0, 1.0).unwrap(), MoveCommand::NONE);
    }
}
