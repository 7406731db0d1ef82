use std::path::Path;

use rayon::prelude::*;
use tracing::info;

use crate::consts::{FRAME_SAMPLE_CAP, PARALLEL_DECODE_THRESHOLD};
use crate::error::{ParallaxError, Result};
use crate::frame::{Frame, SourceInfo, SourceKind};
use crate::io::{self, folder};

/// An ordered, immutable sequence of frames with its source metadata.
///
/// Frames keep their native dimensions; nothing here resizes across frames.
#[derive(Clone, Debug)]
pub struct FrameSequence {
    frames: Vec<Frame>,
    info: SourceInfo,
}

impl FrameSequence {
    /// Load a video file, sampling at a fixed stride when the native frame
    /// count exceeds [`FRAME_SAMPLE_CAP`]. Frames that fail to decode are
    /// reported through `on_skip` with their native index and left out.
    pub fn from_video(
        path: &Path,
        mut on_skip: impl FnMut(usize, &ParallaxError),
    ) -> Result<FrameSequence> {
        let source = io::open_video(path)?;
        let native = source.frame_count();
        if native == 0 {
            return Err(ParallaxError::EmptySource {
                path: path.to_path_buf(),
            });
        }

        let stride = if native > FRAME_SAMPLE_CAP {
            native.div_ceil(FRAME_SAMPLE_CAP)
        } else {
            1
        };
        info!(
            path = %path.display(),
            native_frames = native,
            stride,
            "Loading video source"
        );

        let mut frames = Vec::with_capacity(native.div_ceil(stride));
        let mut skipped = 0usize;
        let mut index = 0usize;
        while index < native {
            match source.read_frame(index) {
                Ok(frame) => frames.push(frame),
                Err(e) => {
                    skipped += 1;
                    on_skip(index, &e);
                }
            }
            index += stride;
        }

        Self::assemble(frames, path, SourceKind::Video, native, stride, skipped)
    }

    /// Load every decodable image in a directory, in lexicographic file
    /// name order. Undecodable files are reported through `on_skip` with
    /// their position in the sorted listing and left out.
    pub fn from_folder(
        dir: &Path,
        mut on_skip: impl FnMut(usize, &ParallaxError),
    ) -> Result<FrameSequence> {
        let paths = folder::list_images(dir)?;
        if paths.is_empty() {
            return Err(ParallaxError::EmptySource {
                path: dir.to_path_buf(),
            });
        }
        info!(
            path = %dir.display(),
            images = paths.len(),
            "Loading image folder"
        );

        let results: Vec<Result<Frame>> = if paths.len() >= PARALLEL_DECODE_THRESHOLD {
            paths.par_iter().map(|p| folder::decode_image(p)).collect()
        } else {
            paths.iter().map(|p| folder::decode_image(p)).collect()
        };

        let native = results.len();
        let mut frames = Vec::with_capacity(native);
        let mut skipped = 0usize;
        for (position, result) in results.into_iter().enumerate() {
            match result {
                Ok(frame) => frames.push(frame),
                Err(e) => {
                    skipped += 1;
                    on_skip(position, &e);
                }
            }
        }

        Self::assemble(frames, dir, SourceKind::ImageFolder, native, 1, skipped)
    }

    fn assemble(
        frames: Vec<Frame>,
        path: &Path,
        kind: SourceKind,
        native_frames: usize,
        stride: usize,
        skipped: usize,
    ) -> Result<FrameSequence> {
        let first = frames.first().ok_or_else(|| ParallaxError::EmptySource {
            path: path.to_path_buf(),
        })?;
        let info = SourceInfo {
            path: path.to_path_buf(),
            kind,
            native_frames,
            stored_frames: frames.len(),
            stride,
            width: first.width() as u32,
            height: first.height() as u32,
            skipped,
        };
        Ok(FrameSequence { frames, info })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame_at(&self, index: usize) -> Result<&Frame> {
        self.frames
            .get(index)
            .ok_or(ParallaxError::FrameIndexOutOfRange {
                index,
                total: self.frames.len(),
            })
    }

    pub fn info(&self) -> &SourceInfo {
        &self.info
    }
}

/// Load a source path: directories load as image folders, files as video.
pub fn load_source(
    path: &Path,
    on_skip: impl FnMut(usize, &ParallaxError),
) -> Result<FrameSequence> {
    if path.is_dir() {
        FrameSequence::from_folder(path, on_skip)
    } else {
        FrameSequence::from_video(path, on_skip)
    }
}

/// Owns the reference and comparison sequences.
///
/// Slots are installed whole: a sequence is fully loaded before it lands
/// here, so a failed load never leaves a slot half-updated.
#[derive(Debug, Default)]
pub struct FrameStore {
    reference: Option<FrameSequence>,
    comparison: Option<FrameSequence>,
}

impl FrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_reference(&mut self, sequence: FrameSequence) {
        self.reference = Some(sequence);
    }

    pub fn set_comparison(&mut self, sequence: FrameSequence) {
        self.comparison = Some(sequence);
    }

    pub fn reference(&self) -> Option<&FrameSequence> {
        self.reference.as_ref()
    }

    pub fn comparison(&self) -> Option<&FrameSequence> {
        self.comparison.as_ref()
    }

    /// Exchange the reference and comparison slots without touching pixel
    /// data.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.reference, &mut self.comparison);
    }

    /// Frames usable for synchronized stepping: the shorter loaded length,
    /// or zero until both slots are filled.
    pub fn effective_len(&self) -> usize {
        match (&self.reference, &self.comparison) {
            (Some(r), Some(c)) => r.len().min(c.len()),
            _ => 0,
        }
    }
}
