//! External fixed-timestep host for a harness

use std::thread;
use std::time::Duration;

use crate::error::{MazeError, Result};
use crate::harness::{RunState, SimulationHarness};
use crate::output::{OutputFile, RunReport};
use crate::physics::PhysicsBody;
use crate::policy::ControlPolicy;

/// Ticks a harness until success or until its tick budget runs out
#[derive(Debug, Clone, Default)]
pub struct Driver {
    /// Ticks after which the run is forced to `Exhausted`
    max_ticks: Option<u64>,
    /// Wall-clock pause after every tick; `None` runs as fast as possible
    frame_delay: Option<Duration>,
}

impl Driver {
    pub fn new(max_ticks: Option<u64>) -> Self {
        Self {
            max_ticks,
            frame_delay: None,
        }
    }

    pub fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = Some(delay);
        self
    }

    /// Run to completion, delivering coin contacts after every tick.
    ///
    /// `observe` sees the harness and body after each tick. Once every coin
    /// is collected the success tick still runs even past the budget.
    /// Without a tick budget a run that never succeeds does not return.
    pub fn run<P, B, F>(
        &self,
        harness: &mut SimulationHarness<P>,
        body: &mut B,
        mut observe: F,
    ) -> Result<RunReport>
    where
        P: ControlPolicy,
        B: PhysicsBody,
        F: FnMut(&SimulationHarness<P>, &B),
    {
        while harness.state() == RunState::Running {
            let over_budget = self.max_ticks.is_some_and(|max| harness.ticks() >= max);
            if over_budget && harness.visited_coins() < harness.total_coins() {
                harness.exhaust();
                break;
            }
            harness.tick(body)?;
            for coin in body.take_coin_contacts() {
                harness.on_coin_contact(coin, body);
            }
            observe(&*harness, &*body);
            if let Some(delay) = self.frame_delay {
                thread::sleep(delay);
            }
        }
        harness
            .report()
            .ok_or_else(|| MazeError::Policy("run ended without an outcome".to_string()))
    }

    /// Unattended run: no observer, then the report is written to `output`.
    ///
    /// A failed run writes nothing, so no partial trajectory reaches the file.
    pub fn run_batch<P, B>(
        &self,
        harness: &mut SimulationHarness<P>,
        body: &mut B,
        output: &mut OutputFile,
    ) -> Result<RunReport>
    where
        P: ControlPolicy,
        B: PhysicsBody,
    {
        let report = self.run(harness, body, |_, _| ())?;
        output
            .write_once(&report)
            .map_err(|err| MazeError::Output(format!("{}: {err}", output.path().display())))?;
        Ok(report)
    }
}
