use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use parallax_core::session::{ComparisonSession, Pane};
use parallax_core::view::Viewport;

#[derive(Args)]
pub struct PixelArgs {
    /// Reference video file or image folder
    pub reference: PathBuf,

    /// Comparison video file or image folder
    pub comparison: PathBuf,

    /// Frame index to inspect
    #[arg(long, default_value = "0")]
    pub index: usize,

    /// X coordinate in reference pixels
    #[arg(long)]
    pub x: u32,

    /// Y coordinate in reference pixels
    #[arg(long)]
    pub y: u32,
}

pub fn run(args: &PixelArgs) -> Result<()> {
    let mut session = ComparisonSession::new();
    session.load_reference(&args.reference)?;
    session.load_comparison(&args.comparison)?;
    session.set_index(args.index)?;

    // Identity view: the viewport is the reference frame itself.
    let info = session
        .reference_info()
        .expect("reference loaded above")
        .clone();
    let viewport = Viewport::new(info.width, info.height);

    let Some(pixel) = session.inspect(Pane::Reference, viewport, args.x, args.y)? else {
        println!(
            "No data at ({}, {}): frame is {}x{}",
            args.x, args.y, info.width, info.height
        );
        return Ok(());
    };

    let [rr, rg, rb] = pixel.reference;
    let [cr, cg, cb] = pixel.comparison;
    let spread = rr.abs_diff(cr).max(rg.abs_diff(cg)).max(rb.abs_diff(cb));

    println!("Pixel:       ({}, {})", pixel.x, pixel.y);
    println!("Reference:   #{rr:02x}{rg:02x}{rb:02x}  rgb({rr}, {rg}, {rb})");
    println!("Comparison:  #{cr:02x}{cg:02x}{cb:02x}  rgb({cr}, {cg}, {cb})");
    println!(
        "Difference:  {} (magnitude {:.3})",
        spread,
        spread as f32 / 255.0
    );

    Ok(())
}
