//! partix CLI — simulation, benchmarking, and debugging.

use clap::{Parser, Subcommand};

mod commands;
mod scene;

#[derive(Parser)]
#[command(name = "partix")]
#[command(version, about = "partix — shape-matching soft-body physics engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation from a scene file.
    Simulate {
        /// Path to the scene (TOML).
        #[arg(short, long, default_value = "scene.toml")]
        config: String,

        /// Number of steps to run.
        #[arg(short = 'n', long, default_value_t = 100)]
        steps: u32,

        /// Write a snapshot of the final state to this path.
        #[arg(long)]
        snapshot: Option<String>,
    },

    /// Run benchmark suite.
    Benchmark {
        /// Which scenario to run (drop_tetrahedron, drop_block, room_pile, all).
        #[arg(short, long, default_value = "all")]
        scenario: String,

        /// Output CSV file path.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Inspect a world snapshot file.
    Inspect {
        /// Path to snapshot file.
        path: String,
    },

    /// Validate a scene (.toml) or mesh (.json).
    Validate {
        /// Path to scene or mesh file.
        path: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate {
            config,
            steps,
            snapshot,
        } => commands::simulate(&config, steps, snapshot.as_deref()),
        Commands::Benchmark { scenario, output } => {
            commands::benchmark(&scenario, output.as_deref())
        }
        Commands::Inspect { path } => commands::inspect(&path),
        Commands::Validate { path } => commands::validate(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
