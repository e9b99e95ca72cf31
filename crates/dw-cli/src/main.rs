//! CLI frontend for the Darwinian tile-world simulator.

mod commands;

use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::GridArgs;

#[derive(Parser)]
#[command(
    name = "darwinian",
    about = "Darwinian: procedural tile worlds, A* navigation and kinematics",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log debug detail from the engine to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a grid and print it as ASCII
    Generate {
        #[command(flatten)]
        grid: GridArgs,

        /// Also print a table of terrain counts
        #[arg(long)]
        stats: bool,
    },

    /// Find a path across a generated grid
    Path {
        #[command(flatten)]
        grid: GridArgs,

        /// Start cell as `x,y` (default: a random open cell)
        #[arg(long, value_parser = commands::parse_point)]
        from: Option<dw_core::Point>,

        /// Target cell as `x,y` (default: a random open cell)
        #[arg(long, value_parser = commands::parse_point)]
        to: Option<dw_core::Point>,

        /// Step cost: euclidean, manhattan or chebyshev
        #[arg(long, default_value = "euclidean")]
        distance: String,
    },

    /// Run movers through the scheduler for a number of ticks
    Simulate {
        #[command(flatten)]
        grid: GridArgs,

        /// Number of ticks to run
        #[arg(short, long, default_value = "30")]
        ticks: u64,

        /// Number of movers to place
        #[arg(long, default_value = "5")]
        movers: usize,

        /// Milliseconds between ticks
        #[arg(long, default_value = "33")]
        frame_ms: u64,

        /// Use the wall clock instead of virtual time
        #[arg(long)]
        realtime: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,dw_core=debug,dw_simulation=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate { grid, stats } => commands::generate::run(&grid, stats),
        Commands::Path {
            grid,
            from,
            to,
            distance,
        } => commands::path::run(&grid, from, to, &distance),
        Commands::Simulate {
            grid,
            ticks,
            movers,
            frame_ms,
            realtime,
        } => commands::simulate::run(&grid, ticks, movers, frame_ms, realtime),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
