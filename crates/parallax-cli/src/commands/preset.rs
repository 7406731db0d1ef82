use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use parallax_core::view::ViewState;

#[derive(Args)]
pub struct PresetArgs {
    /// Write the preset to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save a default view preset as TOML, ready to edit and feed
/// back through `export --preset`.
pub fn run(args: &PresetArgs) -> Result<()> {
    let preset = ViewState::default();
    let toml_str = toml::to_string_pretty(&preset)?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write preset to {}", path.display()))?;
        println!("Default preset saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}
