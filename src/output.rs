//! Run output file
//!
//! Line 1 is `Success` or the number of coins still missed, line 2 the
//! number of recorded positions, then one `x z` pair per position.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::error::{MazeError, Result};
use crate::physics::Position;

/// Outcome of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub success: bool,
    pub coins_missed: usize,
    /// Recorded trajectory, in tick order
    pub positions: Vec<Position>,
    /// Ticks executed
    pub ticks: u64,
}

impl RunReport {
    const SUCCESS: &'static str = "Success";

    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        if self.success {
            writeln!(out, "{}", Self::SUCCESS)?;
        } else {
            writeln!(out, "{}", self.coins_missed)?;
        }
        writeln!(out, "{}", self.positions.len())?;
        for position in &self.positions {
            writeln!(out, "{position}")?;
        }
        out.flush()
    }

    pub fn to_text(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Read back an output file for offline scoring.
    ///
    /// The tick count is not stored in the file and is taken to be the
    /// number of positions.
    pub fn parse(text: &str) -> Result<Self> {
        let bad = |what: &str| MazeError::InvalidArgument(format!("malformed output: {what}"));
        let mut lines = text.lines();

        let status = lines.next().ok_or_else(|| bad("missing status line"))?.trim();
        let (success, coins_missed) = if status == Self::SUCCESS {
            (true, 0)
        } else {
            let missed = status
                .parse()
                .map_err(|_| bad(&format!("status `{status}`")))?;
            (false, missed)
        };

        let count: usize = lines
            .next()
            .ok_or_else(|| bad("missing position count"))?
            .trim()
            .parse()
            .map_err(|_| bad("position count"))?;

        let positions = lines
            .take(count)
            .map(|line| {
                let mut parts = line.split_whitespace().map(str::parse::<f32>);
                match (parts.next(), parts.next(), parts.next()) {
                    (Some(Ok(x)), Some(Ok(z)), None) => Ok(Position { x, z }),
                    _ => Err(bad(&format!("position `{line}`"))),
                }
            })
            .collect::<Result<Vec<_>>>()?;
        if positions.len() != count {
            return Err(bad("fewer positions than announced"));
        }

        Ok(Self {
            success,
            coins_missed,
            ticks: positions.len() as u64,
            positions,
        })
    }

    /// Print a one-line summary to the console
    pub fn print_report(&self) {
        if self.success {
            println!(
                "All coins collected after {} ticks ({} positions recorded).",
                self.ticks,
                self.positions.len()
            );
        } else {
            println!(
                "Run exhausted after {} ticks with {} coins missed.",
                self.ticks, self.coins_missed
            );
        }
    }
}

/// Output file that is written at most once
pub struct OutputFile {
    path: PathBuf,
    written: bool,
}

impl OutputFile {
    pub const DEFAULT_PATH: &'static str = "output.txt";

    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            written: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `report` unless a report was already written.
    ///
    /// Returns whether the file was written by this call.
    pub fn write_once(&mut self, report: &RunReport) -> io::Result<bool> {
        if self.written {
            return Ok(false);
        }
        self.written = true;
        let file = File::create(&self.path)?;
        report.write_to(BufWriter::new(file))?;
        info!("wrote run output to {}", self.path.display());
        Ok(true)
    }
}
