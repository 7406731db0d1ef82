use std::path::Path;

use image::{ImageFormat, RgbImage};

use crate::error::Result;
use crate::frame::Frame;

/// Save a frame as 8-bit RGB PNG.
pub fn save_png(frame: &Frame, path: &Path) -> Result<()> {
    let w = frame.width() as u32;
    let h = frame.height() as u32;

    let img = RgbImage::from_raw(w, h, frame.as_bytes().to_vec())
        .expect("buffer size matches dimensions");
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}
