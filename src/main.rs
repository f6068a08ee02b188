//! CLI for running the rolling agent through a generated maze

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    process::ExitCode,
    time::Duration,
};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use log::error;
use maze_roller::{
    logging, AutoPolicy, ControlPolicy, Driver, IdlePolicy, KinematicBody, ManualPolicy,
    MazeConfig, MazeError, MazeLayout, MotionTuning, OutputFile, PhysicsBody, RestrictionEffect,
    ScriptedMoves, SimulationHarness,
};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PolicyKind {
    /// Shortest passages to the nearest coin
    Auto,
    /// Replay the moves of `--moves`
    Manual,
    /// Never move
    Idle,
}

/// Roll a ball through a generated maze and collect the coins
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Number of rows
    #[arg(long, default_value_t = 10)]
    rows: usize,

    /// Number of columns
    #[arg(long, default_value_t = 10)]
    cols: usize,

    /// Number of coins
    #[arg(long, default_value_t = 1)]
    coins: usize,

    /// Random seed
    #[arg(long, default_value_t = MazeConfig::DEFAULT_SEED)]
    seed: u64,

    /// World size of one square cell
    #[arg(long, default_value_t = 4.0)]
    cell_size: f32,

    /// An interior wall is restricted with probability 1/N
    #[arg(long, default_value_t = MazeConfig::DEFAULT_RESTRICTION_ODDS)]
    restriction_odds: u32,

    /// Restriction opens walls instead of closing passages
    #[arg(long)]
    remove_walls: bool,

    /// Control policy
    #[arg(long, value_enum, default_value_t = PolicyKind::Auto)]
    policy: PolicyKind,

    /// Move script for the manual policy. Use `-` for stdin.
    #[arg(long)]
    moves: Option<PathBuf>,

    /// Tick budget after which the run is exhausted
    #[arg(long, default_value_t = 5000)]
    energy: u64,

    /// Distance the ball rolls per tick
    #[arg(long, default_value_t = 0.5)]
    step_length: f32,

    /// Unattended run: no delays, write the output file and exit
    #[arg(short, long)]
    batch: bool,

    /// Output file written in batch mode
    #[arg(short, long, default_value = OutputFile::DEFAULT_PATH)]
    output: PathBuf,

    /// Display the run on the terminal
    #[arg(short, long)]
    playback: bool,

    /// Playback frame length in milliseconds
    #[arg(short, long, default_value_t = 15)]
    frame_length: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn read_moves(path: &Path) -> anyhow::Result<String> {
    if path.to_str() == Some("-") {
        let mut buf = String::new();
        io::stdin().lock().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path).with_context(|| format!("reading moves from {}", path.display()))
    }
}

fn make_policy(args: &Args, tuning: &MotionTuning) -> anyhow::Result<Box<dyn ControlPolicy>> {
    Ok(match args.policy {
        PolicyKind::Auto => Box::new(AutoPolicy::new(tuning.arrive_tolerance)),
        PolicyKind::Idle => Box::new(IdlePolicy::default()),
        PolicyKind::Manual => {
            let script = match &args.moves {
                Some(path) => ScriptedMoves::parse(&read_moves(path)?)?,
                None => ScriptedMoves::default(),
            };
            Box::new(ManualPolicy::new(script))
        }
    })
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = MazeConfig {
        rows: args.rows,
        cols: args.cols,
        coins: args.coins,
        seed: Some(args.seed),
        cell_width: args.cell_size,
        cell_height: args.cell_size,
        restriction_odds: args.restriction_odds,
        restriction_effect: if args.remove_walls {
            RestrictionEffect::RemoveWall
        } else {
            RestrictionEffect::ClosePassage
        },
    };
    let layout = MazeLayout::build(&config)?;

    let tuning = MotionTuning::for_layout(&layout, args.step_length)?;
    let mut body = KinematicBody::new(&layout, tuning.step_length, tuning.contact_radius)?;
    let mut harness = SimulationHarness::new(&layout, make_policy(args, &tuning)?)?;
    let driver = Driver::new(Some(args.energy));

    if args.batch {
        let mut output = OutputFile::new(&args.output);
        driver.run_batch(&mut harness, &mut body, &mut output)?;
        return Ok(());
    }

    let driver = if args.playback {
        driver.with_frame_delay(Duration::from_millis(args.frame_length))
    } else {
        driver
    };
    let report = driver.run(&mut harness, &mut body, |_, body| {
        if args.playback {
            print!("\x1B[2J\x1B[1;1H");
            println!("{}", layout.render(Some(body.current_position())));
        }
    })?;
    report.print_report();
    Ok(())
}

/// Run the simulation; exit code 1 on maze or policy errors, 2 on I/O errors
fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            match err.downcast_ref::<MazeError>() {
                Some(maze_err) => ExitCode::from(maze_err.exit_code()),
                None => ExitCode::from(2),
            }
        }
    }
}
