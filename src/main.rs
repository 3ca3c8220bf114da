mod audio;
mod canvas;
mod colors;
mod config;
mod help;
mod logging;
mod page;
mod print;
mod reveal;
mod settings;
mod terminal;
mod tree;

use clap::{Parser, Subcommand};
use config::{PageConfig, PrintConfig};
use std::io;

#[derive(Parser)]
#[command(name = "hearttree")]
#[command(version)]
#[command(about = "Terminal greeting card: a growing tree of hearts over a drifting particle field", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the animated greeting page
    Page {
        /// Frame delay in seconds
        #[arg(short, long, default_value = "0.016")]
        time: f32,

        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// Message shown above the tree
        #[arg(short, long)]
        message: Option<String>,

        /// Do not play the background melody (only built with `--features audio`)
        #[arg(long)]
        mute: bool,
    },

    /// Grow one tree and print it to stdout
    Tree {
        /// Random seed for reproducibility
        #[arg(short, long)]
        seed: Option<u64>,

        /// Print branches and hearts as JSON instead of drawing them
        #[arg(short, long)]
        json: bool,

        /// Output width in columns (defaults to the terminal width)
        #[arg(long)]
        width: Option<u16>,

        /// Output height in rows (defaults to the terminal height)
        #[arg(long)]
        height: Option<u16>,
    },
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let _log = logging::init();

    match cli.command {
        Commands::Page {
            time,
            seed,
            message,
            mute,
        } => {
            let config = PageConfig {
                time_step: time.clamp(0.001, 1.0),
                seed,
                message,
                mute,
            };
            page::run(config)?;
        }
        Commands::Tree {
            seed,
            json,
            width,
            height,
        } => {
            let config = PrintConfig {
                seed,
                json,
                width,
                height,
            };
            print::run(config)?;
        }
    }

    Ok(())
}
