//! Error type shared by maze construction and simulation

use thiserror::Error;

/// Failures of maze construction and of a simulated run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MazeError {
    /// Malformed generation parameters; no maze is produced.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Control policy was queried before [`crate::policy::ControlPolicy::set_maze`].
    #[error("control policy queried before the maze was set")]
    NotInitialized,
    /// Internal failure of a control policy while choosing a move.
    #[error("control policy failed: {0}")]
    Policy(String),
    /// The run finished but its output file could not be written.
    #[error("cannot write run output: {0}")]
    Output(String),
}

impl MazeError {
    /// Process exit code for a run that ended with this error
    pub fn exit_code(&self) -> u8 {
        match self {
            MazeError::Output(_) => 2,
            MazeError::InvalidArgument(_) | MazeError::NotInitialized | MazeError::Policy(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, MazeError>;
