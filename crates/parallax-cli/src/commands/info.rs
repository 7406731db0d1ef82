use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use parallax_core::store::load_source;

#[derive(Args)]
pub struct InfoArgs {
    /// Video file or image folder
    pub source: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let sequence = load_source(&args.source, |item, e| {
        tracing::warn!(item, error = %e, "Skipped undecodable frame");
    })?;
    let info = sequence.info();

    println!("Source:      {}", info.path.display());
    println!("Kind:        {}", info.kind);
    println!("Frames:      {}", info.stored_frames);
    if info.stride > 1 {
        println!(
            "Sampled:     every {} of {} native frames",
            info.stride, info.native_frames
        );
    } else {
        println!("Native:      {}", info.native_frames);
    }
    println!("Dimensions:  {}x{}", info.width, info.height);
    if info.skipped > 0 {
        println!("Skipped:     {}", info.skipped);
    }

    let frame_bytes = info.width as usize * info.height as usize * 3;
    let total_mb = (frame_bytes * info.stored_frames) as f64 / (1024.0 * 1024.0);
    println!("Data size:   {:.1} MB", total_mb);

    Ok(())
}
