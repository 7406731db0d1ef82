use ndarray::{Array2, Array3};
use rayon::prelude::*;

use crate::error::{ParallaxError, Result};
use crate::frame::Frame;

/// Minimum pixel count (h*w) to justify row-level parallelism.
const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Per-pixel difference between two same-sized frames.
#[derive(Clone, Debug)]
pub struct DiffMap {
    /// Largest absolute channel difference per pixel, scaled to [0, 1].
    pub magnitude: Array2<f32>,
    /// Color rendering of the magnitudes: magnitude m maps to
    /// (round(255m), 0, round(255(1-m))), blue where the frames agree
    /// through to red where they fully differ.
    pub visualization: Frame,
}

impl DiffMap {
    /// Mean difference magnitude over the whole frame.
    pub fn mean_magnitude(&self) -> f32 {
        self.magnitude.mean().unwrap_or(0.0)
    }

    /// Largest difference magnitude over the whole frame.
    pub fn max_magnitude(&self) -> f32 {
        self.magnitude.fold(0.0f32, |acc, &m| acc.max(m))
    }

    /// Fraction of pixels whose magnitude exceeds `threshold`.
    pub fn changed_fraction(&self, threshold: f32) -> f32 {
        let total = self.magnitude.len();
        if total == 0 {
            return 0.0;
        }
        let changed = self.magnitude.iter().filter(|&&m| m > threshold).count();
        changed as f32 / total as f32
    }
}

/// Compare two frames of identical dimensions.
///
/// The magnitude is the Chebyshev distance across channels:
/// `max(|dR|, |dG|, |dB|) / 255`. Differences are taken with
/// `u8::abs_diff`, so the arithmetic never leaves the unsigned domain.
/// The caller resizes the comparison frame beforehand; mismatched
/// dimensions are an error here, not a resize trigger.
pub fn compute_diff(reference: &Frame, comparison: &Frame) -> Result<DiffMap> {
    if reference.width() != comparison.width() || reference.height() != comparison.height() {
        return Err(ParallaxError::DimensionMismatch {
            expected_width: reference.width() as u32,
            expected_height: reference.height() as u32,
            actual_width: comparison.width() as u32,
            actual_height: comparison.height() as u32,
        });
    }

    let h = reference.height();
    let w = reference.width();

    let diff_row = |y: usize| -> (Vec<f32>, Vec<u8>) {
        let mut mag_row = Vec::with_capacity(w);
        let mut vis_row = Vec::with_capacity(w * 3);
        for x in 0..w {
            let mut spread = 0u8;
            for c in 0..3 {
                let d = reference.data[[y, x, c]].abs_diff(comparison.data[[y, x, c]]);
                spread = spread.max(d);
            }
            mag_row.push(spread as f32 / 255.0);
            // round(255m) == spread and round(255(1-m)) == 255 - spread,
            // so the ramp stays in integer arithmetic.
            vis_row.extend_from_slice(&[spread, 0, 255 - spread]);
        }
        (mag_row, vis_row)
    };

    let rows: Vec<(Vec<f32>, Vec<u8>)> = if h * w >= PARALLEL_PIXEL_THRESHOLD {
        (0..h).into_par_iter().map(diff_row).collect()
    } else {
        (0..h).map(diff_row).collect()
    };

    let mut magnitude = Array2::<f32>::zeros((h, w));
    let mut vis = Vec::with_capacity(h * w * 3);
    for (y, (mag_row, vis_row)) in rows.into_iter().enumerate() {
        for (x, m) in mag_row.into_iter().enumerate() {
            magnitude[[y, x]] = m;
        }
        vis.extend_from_slice(&vis_row);
    }

    let data = Array3::from_shape_vec((h, w, 3), vis)
        .expect("visualization byte count matches frame dimensions");
    Ok(DiffMap {
        magnitude,
        visualization: Frame::new(data),
    })
}
