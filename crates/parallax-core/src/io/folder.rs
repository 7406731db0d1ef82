use std::path::{Path, PathBuf};

use ndarray::Array3;

use crate::consts::IMAGE_EXTENSIONS;
use crate::error::{ParallaxError, Result};
use crate::frame::Frame;

/// List the decodable images in a directory, sorted lexicographically by
/// file name. Non-image entries and subdirectories are ignored.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && has_image_extension(path))
        .collect();
    paths.sort();
    Ok(paths)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.iter().any(|known| *known == ext)
        })
        .unwrap_or(false)
}

/// Decode one image file into an RGB8 frame.
pub fn decode_image(path: &Path) -> Result<Frame> {
    let img = image::open(path).map_err(|e| ParallaxError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let rgb = img.to_rgb8();
    let (w, h) = rgb.dimensions();
    let data = Array3::from_shape_vec((h as usize, w as usize, 3), rgb.into_raw())
        .expect("decoded byte count matches image dimensions");
    Ok(Frame::new(data))
}
