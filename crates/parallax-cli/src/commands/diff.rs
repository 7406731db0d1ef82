use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use parallax_core::io::save_png;
use parallax_core::session::ComparisonSession;

#[derive(Args)]
pub struct DiffArgs {
    /// Reference video file or image folder
    pub reference: PathBuf,

    /// Comparison video file or image folder
    pub comparison: PathBuf,

    /// Frame index to compare
    #[arg(long, default_value = "0", conflicts_with = "all")]
    pub index: usize,

    /// Compare every synchronized frame
    #[arg(long)]
    pub all: bool,

    /// Magnitude above which a pixel counts as changed
    #[arg(long, default_value = "0.1")]
    pub threshold: f32,

    /// Save diff visualization PNGs into this directory
    #[arg(long)]
    pub save_dir: Option<PathBuf>,
}

/// Per-frame record kept while scanning the whole sequence.
struct FrameStats {
    index: usize,
    mean: f32,
    max: f32,
    changed: f32,
}

pub fn run(args: &DiffArgs) -> Result<()> {
    let mut session = ComparisonSession::new();
    session.load_reference(&args.reference)?;
    session.load_comparison(&args.comparison)?;
    let total = session.effective_len();

    if let Some(ref dir) = args.save_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    if args.all {
        run_all(&session, args, total)
    } else {
        run_single(&session, args, total)
    }
}

fn run_single(session: &ComparisonSession, args: &DiffArgs, total: usize) -> Result<()> {
    let map = session.diff_at(args.index)?;

    println!("Frame:            {} of {}", args.index, total);
    println!("Mean magnitude:   {:.4}", map.mean_magnitude());
    println!("Max magnitude:    {:.4}", map.max_magnitude());
    println!(
        "Changed (> {:.2}): {:.1}%",
        args.threshold,
        map.changed_fraction(args.threshold) * 100.0
    );

    if let Some(ref dir) = args.save_dir {
        let path = dir.join(format!("diff_{:04}.png", args.index));
        save_png(&map.visualization, &path)?;
        println!("Saved:            {}", path.display());
    }

    Ok(())
}

fn run_all(session: &ComparisonSession, args: &DiffArgs, total: usize) -> Result<()> {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Comparing frames");

    let mut stats = Vec::with_capacity(total);
    for index in 0..total {
        let map = session.diff_at(index)?;
        stats.push(FrameStats {
            index,
            mean: map.mean_magnitude(),
            max: map.max_magnitude(),
            changed: map.changed_fraction(args.threshold),
        });

        if let Some(ref dir) = args.save_dir {
            let path = dir.join(format!("diff_{index:04}.png"));
            save_png(&map.visualization, &path)?;
        }
        pb.set_position(index as u64 + 1);
    }
    pb.finish_with_message("Compared");

    let mean_overall = stats.iter().map(|s| s.mean).sum::<f32>() / total as f32;
    let peak = stats
        .iter()
        .max_by(|a, b| a.max.total_cmp(&b.max))
        .expect("at least one frame compared");

    println!("\nFrames compared:  {}", total);
    println!("Mean magnitude:   {:.4}", mean_overall);
    println!(
        "Peak magnitude:   {:.4} (frame {})",
        peak.max, peak.index
    );

    stats.sort_by(|a, b| b.changed.total_cmp(&a.changed));
    println!("\nMost changed frames (> {:.2}):", args.threshold);
    println!("{:>5}  {:>8}  {:>9}  {:>8}", "Rank", "Frame #", "Changed", "Mean");
    println!("{}", "-".repeat(36));
    for (rank, s) in stats.iter().take(10).enumerate() {
        println!(
            "{:>5}  {:>8}  {:>8.1}%  {:>8.4}",
            rank + 1,
            s.index,
            s.changed * 100.0,
            s.mean
        );
    }

    Ok(())
}
