mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "parallax", about = "Synchronized frame comparison tool")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show source metadata (frames, sampling, dimensions)
    Info(commands::info::InfoArgs),
    /// Compute per-frame difference statistics
    Diff(commands::diff::DiffArgs),
    /// Render the comparison panes for one frame to PNG files
    Export(commands::export::ExportArgs),
    /// Report pixel values of both sources at one coordinate
    Pixel(commands::pixel::PixelArgs),
    /// Print or save a default view preset
    Preset(commands::preset::PresetArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Diff(args) => commands::diff::run(args),
        Commands::Export(args) => commands::export::run(args),
        Commands::Pixel(args) => commands::pixel::run(args),
        Commands::Preset(args) => commands::preset::run(args),
    }
}
