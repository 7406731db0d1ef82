use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use parallax_core::frame::Rotation;
use parallax_core::io::save_png;
use parallax_core::session::{ComparisonSession, Pane};
use parallax_core::view::{ViewState, Viewport};

#[derive(Args)]
pub struct ExportArgs {
    /// Reference video file or image folder
    pub reference: PathBuf,

    /// Comparison video file or image folder
    pub comparison: PathBuf,

    /// Frame index to render
    #[arg(long, default_value = "0")]
    pub index: usize,

    /// Viewport width in pixels
    #[arg(long, default_value = "1280")]
    pub width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value = "720")]
    pub height: u32,

    /// Zoom factor (0.1 to 8.0)
    #[arg(long)]
    pub zoom: Option<f32>,

    /// Horizontal pan in source pixels
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub pan_x: f32,

    /// Vertical pan in source pixels
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub pan_y: f32,

    /// Rotation in degrees, a multiple of 90
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub rotate: i32,

    /// Fit the whole image inside the viewport (overrides zoom and pan)
    #[arg(long)]
    pub fit: bool,

    /// Skip the diff pane
    #[arg(long)]
    pub no_diff: bool,

    /// TOML view preset applied to all panes, instead of the
    /// zoom/pan/rotation flags
    #[arg(long)]
    pub preset: Option<PathBuf>,

    /// Output directory for the rendered PNGs
    #[arg(long, default_value = "export")]
    pub out_dir: PathBuf,
}

pub fn run(args: &ExportArgs) -> Result<()> {
    let mut session = ComparisonSession::new();
    session.load_reference(&args.reference)?;
    session.load_comparison(&args.comparison)?;
    session.set_diff_enabled(!args.no_diff);
    session.set_index(args.index)?;

    let viewport = Viewport::new(args.width, args.height);
    let state = resolve_view_state(args)?;
    for pane in [Pane::Reference, Pane::Comparison, Pane::Diff] {
        *session.view_mut(pane) = state;
    }
    if args.fit {
        session.fit_all(viewport)?;
    }

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;

    let output = session.render(viewport)?;
    save_png(
        &output.reference,
        &args.out_dir.join(format!("reference_{:04}.png", output.index)),
    )?;
    save_png(
        &output.comparison,
        &args.out_dir.join(format!("comparison_{:04}.png", output.index)),
    )?;
    if let Some(ref diff) = output.diff {
        save_png(
            diff,
            &args.out_dir.join(format!("diff_{:04}.png", output.index)),
        )?;
    }

    crate::summary::print_export_summary(
        &session,
        *session.view(Pane::Reference),
        viewport,
        &args.out_dir,
    );

    Ok(())
}

fn resolve_view_state(args: &ExportArgs) -> Result<ViewState> {
    if let Some(ref path) = args.preset {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read preset {}", path.display()))?;
        return toml::from_str::<ViewState>(&text)
            .with_context(|| format!("Invalid preset {}", path.display()));
    }

    let Some(rotation) = Rotation::from_degrees(args.rotate) else {
        bail!("rotation must be a multiple of 90 degrees");
    };
    let mut state = ViewState::default();
    state.set_rotation(rotation);
    if let Some(zoom) = args.zoom {
        state.set_zoom(zoom);
    }
    state.pan_by(args.pan_x, args.pan_y);
    Ok(state)
}
