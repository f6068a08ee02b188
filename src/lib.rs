//! Roll a ball through a procedurally generated maze and collect its coins
//!
//! A seeded [`random::RandomStream`] drives three stages in a fixed order:
//! spanning-tree carving ([`maze_generator`]), randomized restriction of
//! interior walls ([`restrictor`]) and coin selection ([`coin_placer`]). The
//! result is an immutable [`MazeLayout`]. A [`SimulationHarness`] then steps
//! an agent through it, asking a [`ControlPolicy`] for a move every tick and
//! leaving the motion itself to a [`PhysicsBody`].
//!
//! # Examples
//! ## Idle agent in a 3x3 maze
//! ```
//! use maze_roller::{Driver, IdlePolicy, KinematicBody, MazeConfig, MazeLayout, SimulationHarness};
//!
//! let layout = MazeLayout::build(&MazeConfig::new(3, 3, 1, 70)).unwrap();
//! assert!(layout.cell_at(2, 2).unwrap().has_coin);
//!
//! let mut body = KinematicBody::new(&layout, 0.5, 1.0).unwrap();
//! let mut harness = SimulationHarness::new(&layout, IdlePolicy::default()).unwrap();
//! let report = Driver::new(Some(20)).run(&mut harness, &mut body, |_, _| ()).unwrap();
//! assert!(!report.success);
//! assert_eq!(report.positions.len(), 20);
//! ```
//!
//! ## Automatic policy
//! ```
//! use maze_roller::{
//!     AutoPolicy, Driver, KinematicBody, MazeConfig, MazeLayout, RestrictionEffect,
//!     SimulationHarness,
//! };
//!
//! let config = MazeConfig {
//!     restriction_effect: RestrictionEffect::RemoveWall,
//!     ..MazeConfig::new(5, 5, 3, 7)
//! };
//! let layout = MazeLayout::build(&config).unwrap();
//! println!("{}", layout.render(None));
//!
//! let mut body = KinematicBody::new(&layout, 0.5, 1.0).unwrap();
//! let mut harness = SimulationHarness::new(&layout, AutoPolicy::default()).unwrap();
//! let report = Driver::new(Some(5000)).run(&mut harness, &mut body, |_, _| ()).unwrap();
//! report.print_report();
//! ```

pub mod coin_placer;
pub mod config;
pub mod driver;
pub mod error;
pub mod harness;
pub mod layout;
pub mod logging;
pub mod maze_generator;
pub mod output;
pub mod physics;
pub mod policy;
pub mod random;
pub mod restrictor;

pub use config::{MazeConfig, RestrictionEffect};
pub use driver::Driver;
pub use error::MazeError;
pub use harness::{RunState, SimulationHarness};
pub use layout::{LayoutCell, MazeLayout};
pub use output::{OutputFile, RunReport};
pub use physics::{
    CoinId, Force, GridStepBody, KinematicBody, MotionTuning, PhysicsBody, Position,
};
pub use policy::{
    AutoPolicy, ControlPolicy, IdlePolicy, ManualPolicy, MoveCommand, MoveSource, ScriptedMoves,
};
