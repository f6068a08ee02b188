//! CLI for maze generation

use clap::Parser;
use maze_roller::{logging, MazeConfig, MazeLayout, RestrictionEffect};

/// Print a generated coin maze
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

    /// Random seed; omit for a fresh maze every time
    #[arg(long)]
    seed: Option<u64>,

    /// Open extra walls instead of closing passages
    #[arg(long)]
    remove_walls: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Generate maze, print it
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = MazeConfig {
        rows: args.rows,
        cols: args.cols,
        coins: args.coins,
        seed: args.seed,
        restriction_effect: if args.remove_walls {
            RestrictionEffect::RemoveWall
        } else {
            RestrictionEffect::ClosePassage
        },
        ..MazeConfig::default()
    };
    let layout = MazeLayout::build(&config)?;
    println!("{}", layout.render(None));
    Ok(())
}
