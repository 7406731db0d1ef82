use std::path::Path;

use crate::error::{ParallaxError, Result};
use crate::frame::Frame;

pub mod folder;
pub mod image_io;
pub mod ser;

pub use image_io::save_png;
pub use ser::{SerHeader, SerReader};

/// Frame-addressable video container. Implementations decode to RGB8 and
/// perform any channel reordering at decode time.
pub trait VideoSource {
    fn frame_count(&self) -> usize;

    fn read_frame(&self, index: usize) -> Result<Frame>;
}

/// Open a video file, choosing a reader by extension.
pub fn open_video(path: &Path) -> Result<Box<dyn VideoSource>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("ser") => Ok(Box::new(SerReader::open(path)?)),
        _ => Err(ParallaxError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}
