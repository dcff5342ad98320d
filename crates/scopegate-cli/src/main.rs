//! CLI for scopegate — the calibration gate your terminal has to earn.

mod commands;
mod tui;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "scopegate")]
#[command(about = "scopegate — hold both dials to 100% before the content reveals")]
#[command(version = scopegate_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the calibration gate, then show the content view
    Run {
        /// Skip the gate entirely, as if arriving already unlocked
        #[arg(long)]
        skip: bool,

        /// Ignore any persisted unlock flag for this run
        #[arg(long)]
        fresh: bool,

        /// Headline text decoded on the gate
        #[arg(long, default_value = "SCOPEGATE")]
        title: String,

        /// Target trace frame rate
        #[arg(long, default_value = "30")]
        fps: u32,

        /// Directory for the persisted unlock flag (default: system temp dir)
        #[arg(long)]
        store: Option<String>,
    },

    /// Clear the persisted unlock flag
    Reset {
        /// Directory for the persisted unlock flag (default: system temp dir)
        #[arg(long)]
        store: Option<String>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            skip,
            fresh,
            title,
            fps,
            store,
        } => commands::gate::run(commands::gate::GateConfig {
            skip,
            fresh,
            title,
            fps,
            store_dir: store,
        }),
        Commands::Reset { store } => commands::reset::run(store.as_deref()),
    }
}
