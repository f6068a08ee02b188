//! Fixed-timestep simulation of one run

use std::collections::BTreeSet;

use log::{debug, error, info, warn};

use crate::error::Result;
use crate::layout::MazeLayout;
use crate::output::RunReport;
use crate::physics::{CoinId, PhysicsBody, Position};
use crate::policy::ControlPolicy;

/// Run state; everything but `Running` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// Every coin was collected.
    Success,
    /// Stopped by the driver before success.
    Exhausted,
    /// The control policy failed; the trajectory was discarded.
    Aborted,
}

/// Owns the agent state of a run and advances it one tick at a time.
///
/// Within a tick the success check comes first, then the current position
/// is recorded, and only then is the policy's move forwarded to the body,
/// so every recorded position precedes that tick's move.
pub struct SimulationHarness<P> {
    policy: P,
    coins: BTreeSet<CoinId>,
    visited: BTreeSet<CoinId>,
    state: RunState,
    ticks: u64,
    success_tick: Option<u64>,
    trajectory: Vec<Position>,
}

impl<P: ControlPolicy> SimulationHarness<P> {
    /// Force magnitude forwarded for any non-zero move
    pub const SPEED: f32 = 32.0;

    /// Hand the maze to `policy` and start a run.
    pub fn new(layout: &MazeLayout, mut policy: P) -> Result<Self> {
        policy.set_maze(layout)?;
        Ok(Self {
            policy,
            coins: layout.coin_cells().iter().copied().map(CoinId).collect(),
            visited: BTreeSet::new(),
            state: RunState::Running,
            ticks: 0,
            success_tick: None,
            trajectory: Vec::new(),
        })
    }

    /// Advance one tick. Terminal harnesses do nothing.
    ///
    /// A policy error aborts the run: the trajectory is discarded and the
    /// error returned.
    pub fn tick<B: PhysicsBody + ?Sized>(&mut self, body: &mut B) -> Result<RunState> {
        if self.state != RunState::Running {
            return Ok(self.state);
        }

        if self.visited.len() == self.coins.len() {
            self.state = RunState::Success;
            self.success_tick = Some(self.ticks);
            // Final resting position closes the log.
            self.trajectory.push(body.current_position());
            info!("success after {} ticks", self.ticks);
            return Ok(self.state);
        }

        let position = body.current_position();
        self.trajectory.push(position);

        let command = match self.policy.get_move(position.x, position.z) {
            Ok(command) => command,
            Err(err) => {
                error!("run aborted at tick {}: {err}", self.ticks);
                self.state = RunState::Aborted;
                self.trajectory.clear();
                return Err(err);
            }
        };
        if let Some(force) = command.force(Self::SPEED) {
            body.apply_move(force);
        }

        self.ticks += 1;
        debug!(
            "tick {} at {position}: move {command}, {} coins",
            self.ticks,
            self.visited.len()
        );
        Ok(self.state)
    }

    /// Contact notification from the physics body.
    ///
    /// Counts each coin once and asks the body to remove it. Returns whether
    /// the coin was newly collected.
    pub fn on_coin_contact<B: PhysicsBody + ?Sized>(&mut self, coin: CoinId, body: &mut B) -> bool {
        if self.state != RunState::Running {
            return false;
        }
        if !self.coins.contains(&coin) {
            warn!("contact with unknown coin {coin:?} ignored");
            return false;
        }
        if !self.visited.insert(coin) {
            return false;
        }
        body.remove_coin(coin);
        info!(
            "coin {} collected ({}/{})",
            coin.0,
            self.visited.len(),
            self.coins.len()
        );
        true
    }

    /// Stop a running harness without success.
    pub fn exhaust(&mut self) {
        if self.state == RunState::Running {
            info!(
                "exhausted after {} ticks, {} coins missed",
                self.ticks,
                self.coins_missed()
            );
            self.state = RunState::Exhausted;
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Tick count at which success was detected
    pub fn success_tick(&self) -> Option<u64> {
        self.success_tick
    }

    pub fn visited_coins(&self) -> usize {
        self.visited.len()
    }

    pub fn total_coins(&self) -> usize {
        self.coins.len()
    }

    pub fn coins_missed(&self) -> usize {
        self.coins.len() - self.visited.len()
    }

    pub fn trajectory(&self) -> &[Position] {
        &self.trajectory
    }

    /// Report of a finished run; `None` while running or after an abort
    pub fn report(&self) -> Option<RunReport> {
        match self.state {
            RunState::Success | RunState::Exhausted => Some(RunReport {
                success: self.state == RunState::Success,
                coins_missed: self.coins_missed(),
                positions: self.trajectory.clone(),
                ticks: self.ticks,
            }),
            RunState::Running | RunState::Aborted => None,
        }
    }
}
