use std::path::PathBuf;

use ndarray::{s, Array3};
use rayon::prelude::*;

/// A single RGB image frame.
/// Pixel data is 8-bit per channel, row-major, shape = (height, width, 3).
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Interleaved pixel data in standard (C) layout.
    pub data: Array3<u8>,
}

/// Minimum output pixel count (h*w) to use row-level parallelism when
/// resampling.
const PARALLEL_RESAMPLE_THRESHOLD: usize = 65_536;

impl Frame {
    pub fn new(data: Array3<u8>) -> Self {
        Self { data }
    }

    /// A frame of uniform color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let mut data = Array3::<u8>::zeros((height as usize, width as usize, 3));
        for c in 0..3 {
            data.slice_mut(s![.., .., c]).fill(rgb[c]);
        }
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.shape()[1]
    }

    pub fn height(&self) -> usize {
        self.data.shape()[0]
    }

    /// RGB value at (x, y). Panics if out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        [
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
        ]
    }

    /// Contiguous interleaved RGB bytes, ready for bitmap construction.
    pub fn as_bytes(&self) -> &[u8] {
        self.data
            .as_slice()
            .expect("frame data is standard layout")
    }

    /// Resize the whole frame to the given dimensions with bilinear
    /// interpolation. Exact copy when dimensions already match.
    pub fn resize_to(&self, width: u32, height: u32) -> Frame {
        resample_region(
            self,
            0,
            0,
            self.width() as u32,
            self.height() as u32,
            width,
            height,
        )
    }

    /// Rotate by a multiple of 90 degrees clockwise. Pixels are relocated,
    /// never interpolated, so four 90-degree turns reproduce the input
    /// exactly.
    pub fn rotate(&self, rotation: Rotation) -> Frame {
        let (h, w) = (self.height(), self.width());
        match rotation {
            Rotation::Deg0 => self.clone(),
            Rotation::Deg90 => {
                let mut out = Array3::<u8>::zeros((w, h, 3));
                for y in 0..w {
                    for x in 0..h {
                        for c in 0..3 {
                            out[[y, x, c]] = self.data[[h - 1 - x, y, c]];
                        }
                    }
                }
                Frame::new(out)
            }
            Rotation::Deg180 => {
                let mut out = Array3::<u8>::zeros((h, w, 3));
                for y in 0..h {
                    for x in 0..w {
                        for c in 0..3 {
                            out[[y, x, c]] = self.data[[h - 1 - y, w - 1 - x, c]];
                        }
                    }
                }
                Frame::new(out)
            }
            Rotation::Deg270 => {
                let mut out = Array3::<u8>::zeros((w, h, 3));
                for y in 0..w {
                    for x in 0..h {
                        for c in 0..3 {
                            out[[y, x, c]] = self.data[[x, w - 1 - y, c]];
                        }
                    }
                }
                Frame::new(out)
            }
        }
    }
}

/// Bilinear-resample a rectangular region of `source` into an
/// `out_w` x `out_h` frame.
///
/// Sampling uses the pixel-center convention: output pixel `ox` maps to
/// source column `left + (ox + 0.5) * region_w / out_w - 0.5`, clamped to
/// the region, so equal region and output dimensions reproduce the region
/// bit for bit. Samples never read outside the region.
pub(crate) fn resample_region(
    source: &Frame,
    left: u32,
    top: u32,
    region_w: u32,
    region_h: u32,
    out_w: u32,
    out_h: u32,
) -> Frame {
    let scale_x = region_w as f32 / out_w as f32;
    let scale_y = region_h as f32 / out_h as f32;

    let row_pixels = |oy: usize| -> Vec<u8> {
        let sy = (top as f32 + (oy as f32 + 0.5) * scale_y - 0.5)
            .clamp(top as f32, (top + region_h - 1) as f32);
        let y0 = sy.floor() as usize;
        let y1 = (y0 + 1).min((top + region_h - 1) as usize);
        let fy = sy - y0 as f32;

        let mut row = Vec::with_capacity(out_w as usize * 3);
        for ox in 0..out_w as usize {
            let sx = (left as f32 + (ox as f32 + 0.5) * scale_x - 0.5)
                .clamp(left as f32, (left + region_w - 1) as f32);
            let x0 = sx.floor() as usize;
            let x1 = (x0 + 1).min((left + region_w - 1) as usize);
            let fx = sx - x0 as f32;

            for c in 0..3 {
                let p00 = source.data[[y0, x0, c]] as f32;
                let p01 = source.data[[y0, x1, c]] as f32;
                let p10 = source.data[[y1, x0, c]] as f32;
                let p11 = source.data[[y1, x1, c]] as f32;
                let value = (1.0 - fy) * ((1.0 - fx) * p00 + fx * p01)
                    + fy * ((1.0 - fx) * p10 + fx * p11);
                row.push(value.round() as u8);
            }
        }
        row
    };

    let flat: Vec<u8> = if (out_w as usize) * (out_h as usize) >= PARALLEL_RESAMPLE_THRESHOLD {
        (0..out_h as usize)
            .into_par_iter()
            .flat_map_iter(row_pixels)
            .collect()
    } else {
        (0..out_h as usize).flat_map(row_pixels).collect()
    };

    let data = Array3::from_shape_vec((out_h as usize, out_w as usize, 3), flat)
        .expect("row count matches output dimensions");
    Frame::new(data)
}

/// Clockwise rotation applied to a pane's view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Parse a rotation from whole degrees; any multiple of 90 is accepted.
    pub fn from_degrees(degrees: i32) -> Option<Rotation> {
        match degrees.rem_euclid(360) {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// The next step clockwise.
    pub fn rotated_cw(self) -> Rotation {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    /// The next step counter-clockwise.
    pub fn rotated_ccw(self) -> Rotation {
        match self {
            Rotation::Deg0 => Rotation::Deg270,
            Rotation::Deg90 => Rotation::Deg0,
            Rotation::Deg180 => Rotation::Deg90,
            Rotation::Deg270 => Rotation::Deg180,
        }
    }

    /// True when the rotation swaps width and height.
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

/// Kind of source a sequence was loaded from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Video,
    ImageFolder,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Video => write!(f, "video"),
            SourceKind::ImageFolder => write!(f, "image folder"),
        }
    }
}

/// Metadata about a loaded source.
#[derive(Clone, Debug)]
pub struct SourceInfo {
    pub path: PathBuf,
    pub kind: SourceKind,
    /// Frames present in the source before sampling.
    pub native_frames: usize,
    /// Frames actually stored after sampling.
    pub stored_frames: usize,
    /// Sampling stride (1 = every frame kept).
    pub stride: usize,
    /// Dimensions of the first stored frame.
    pub width: u32,
    pub height: u32,
    /// Files or frames skipped because they failed to decode.
    pub skipped: usize,
}
