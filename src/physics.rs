//! Contract with the physics collaborator, plus two simple bodies
//!
//! The harness never integrates motion itself. It forwards a force to a
//! [`PhysicsBody`], reads the position back and learns about coin contacts
//! from it. [`KinematicBody`] and [`GridStepBody`] are small stand-ins that
//! respect the maze walls; a real engine plugs in through the same trait.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{MazeError, Result};
use crate::layout::MazeLayout;
use crate::maze_generator::Direction;

/// Continuous position on the floor plane
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub z: f32,
}

impl Position {
    pub fn distance(self, other: Position) -> f32 {
        (self.x - other.x).hypot(self.z - other.z)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.z)
    }
}

/// Directional intent forwarded to the physics body
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Force {
    pub x: f32,
    pub z: f32,
}

impl Force {
    pub fn magnitude(self) -> f32 {
        self.x.hypot(self.z)
    }
}

/// Identity of a coin: the index of the layout cell holding it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoinId(pub usize);

/// Physics collaborator driven by the simulation harness
pub trait PhysicsBody {
    /// Push the agent with `force` for the current tick.
    fn apply_move(&mut self, force: Force);
    fn current_position(&self) -> Position;
    /// Coins touched since the last call
    fn take_coin_contacts(&mut self) -> Vec<CoinId>;
    /// Remove a collected coin so it cannot be touched again.
    fn remove_coin(&mut self, coin: CoinId);
}

/// Walls and coins a body collides with, copied from a layout
struct Arena {
    layout: MazeLayout,
    coins: BTreeSet<CoinId>,
}

impl Arena {
    fn new(layout: &MazeLayout) -> Self {
        Self {
            coins: layout.coin_cells().iter().copied().map(CoinId).collect(),
            layout: layout.clone(),
        }
    }
}

/// Step length, contact radius and arrival tolerance that fit together.
///
/// An agent steered to within `arrive_tolerance` of a coin centre on each
/// axis is inside `contact_radius`, and a `step_length` move never carries
/// it from outside the tolerance band to beyond the other side of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionTuning {
    pub step_length: f32,
    pub contact_radius: f32,
    pub arrive_tolerance: f32,
}

impl MotionTuning {
    pub fn for_layout(layout: &MazeLayout, step_length: f32) -> Result<Self> {
        let side = layout.cell_width().min(layout.cell_height());
        if !(step_length > 0.0 && step_length < side / 2.0) {
            return Err(MazeError::InvalidArgument(format!(
                "step length must be in (0, {}), got {step_length}",
                side / 2.0
            )));
        }
        let arrive_tolerance = (side / 8.0).max(step_length / 2.0);
        Ok(Self {
            step_length,
            contact_radius: (side / 4.0).max(arrive_tolerance * 1.5),
            arrive_tolerance,
        })
    }
}

/// Point agent moving a fixed distance per tick along the applied force.
///
/// Each axis is integrated separately and a crossing into the neighbouring
/// cell is refused when the edge is walled; the agent then stops just short
/// of the edge.
pub struct KinematicBody {
    arena: Arena,
    position: Position,
    step_length: f32,
    contact_radius: f32,
    contacts: Vec<CoinId>,
}

impl KinematicBody {
    /// Fraction of the cell size kept between the agent and a wall
    const WALL_MARGIN: f32 = 0.05;

    /// `step_length` must be positive and below half the smaller cell side
    /// so that one tick never jumps over a whole cell; `contact_radius` must
    /// be positive.
    pub fn new(layout: &MazeLayout, step_length: f32, contact_radius: f32) -> Result<Self> {
        let half = layout.cell_width().min(layout.cell_height()) / 2.0;
        if !(step_length > 0.0 && step_length < half) {
            return Err(MazeError::InvalidArgument(format!(
                "step length must be in (0, {half}), got {step_length}"
            )));
        }
        if !(contact_radius > 0.0 && contact_radius.is_finite()) {
            return Err(MazeError::InvalidArgument(format!(
                "contact radius must be positive, got {contact_radius}"
            )));
        }
        let mut body = Self {
            arena: Arena::new(layout),
            position: Position::default(),
            step_length,
            contact_radius,
            contacts: Vec::new(),
        };
        body.detect_contacts();
        Ok(body)
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self.contacts.clear();
        self.detect_contacts();
        self
    }

    fn move_axis(&mut self, delta: f32, positive: Direction, negative: Direction) {
        let layout = &self.arena.layout;
        let Some(from) = layout.cell_containing(self.position) else {
            return;
        };
        let (half, along_x) = match positive {
            Direction::Right => (layout.cell_width() / 2.0, true),
            _ => (layout.cell_height() / 2.0, false),
        };
        let centre = layout.cell_centre(from);
        let (origin, current) = if along_x {
            (centre.x, self.position.x)
        } else {
            (centre.z, self.position.z)
        };

        let direction = if delta > 0.0 { positive } else { negative };
        let edge = origin + half * delta.signum();
        let mut target = current + delta;
        let crosses = (target - origin).abs() >= half;
        if crosses && layout.step(from, direction).is_none() {
            target = edge - delta.signum() * half * 2.0 * Self::WALL_MARGIN;
        }

        if along_x {
            self.position.x = target;
        } else {
            self.position.z = target;
        }
    }

    fn detect_contacts(&mut self) {
        for &coin in &self.arena.coins {
            let centre = self.arena.layout.cell_centre(coin.0);
            if centre.distance(self.position) <= self.contact_radius
                && !self.contacts.contains(&coin)
            {
                self.contacts.push(coin);
            }
        }
    }
}

impl PhysicsBody for KinematicBody {
    fn apply_move(&mut self, force: Force) {
        let magnitude = force.magnitude();
        if magnitude > 0.0 {
            let dx = force.x / magnitude * self.step_length;
            let dz = force.z / magnitude * self.step_length;
            if dx != 0.0 {
                self.move_axis(dx, Direction::Right, Direction::Left);
            }
            if dz != 0.0 {
                self.move_axis(dz, Direction::Front, Direction::Back);
            }
        }
        self.detect_contacts();
    }

    fn current_position(&self) -> Position {
        self.position
    }

    fn take_coin_contacts(&mut self) -> Vec<CoinId> {
        std::mem::take(&mut self.contacts)
    }

    fn remove_coin(&mut self, coin: CoinId) {
        self.arena.coins.remove(&coin);
    }
}

/// Agent hopping exactly one cell per tick.
///
/// The horizontal component of the force is tried first, then the vertical
/// one; the first open direction is taken. Contact is reported on entering
/// a cell that still holds a coin.
pub struct GridStepBody {
    arena: Arena,
    cell: usize,
    contacts: Vec<CoinId>,
}

impl GridStepBody {
    pub fn new(layout: &MazeLayout) -> Self {
        let arena = Arena::new(layout);
        let contacts = if arena.coins.contains(&CoinId(0)) {
            vec![CoinId(0)]
        } else {
            Vec::new()
        };
        Self {
            arena,
            cell: 0,
            contacts,
        }
    }

    pub fn cell(&self) -> usize {
        self.cell
    }
}

impl PhysicsBody for GridStepBody {
    fn apply_move(&mut self, force: Force) {
        let horizontal = match force.x {
            x if x > 0.0 => Some(Direction::Right),
            x if x < 0.0 => Some(Direction::Left),
            _ => None,
        };
        let vertical = match force.z {
            z if z > 0.0 => Some(Direction::Front),
            z if z < 0.0 => Some(Direction::Back),
            _ => None,
        };
        let next = [horizontal, vertical]
            .into_iter()
            .flatten()
            .find_map(|d| self.arena.layout.step(self.cell, d));
        if let Some(next) = next {
            self.cell = next;
            if self.arena.coins.contains(&CoinId(next)) {
                self.contacts.push(CoinId(next));
            }
        }
    }

    fn current_position(&self) -> Position {
        self.arena.layout.cell_centre(self.cell)
    }

    fn take_coin_contacts(&mut self) -> Vec<CoinId> {
        std::mem::take(&mut self.contacts)
    }

    fn remove_coin(&mut self, coin: CoinId) {
        self.arena.coins.remove(&coin);
    }
}
