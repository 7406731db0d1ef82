use std::fs::File;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use ndarray::Array3;

use crate::error::{ParallaxError, Result};
use crate::frame::Frame;
use crate::io::VideoSource;

/// Fixed SER header size in bytes.
pub const SER_HEADER_SIZE: usize = 178;

const SER_MAGIC: &[u8; 14] = b"LUCAM-RECORDER";

/// Channel layout of SER pixel data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Mono,
    Rgb,
    Bgr,
}

impl ColorMode {
    fn from_color_id(color_id: i32) -> Result<ColorMode> {
        match color_id {
            0 => Ok(ColorMode::Mono),
            100 => Ok(ColorMode::Rgb),
            101 => Ok(ColorMode::Bgr),
            8..=11 => Err(ParallaxError::UnsupportedColorMode(format!(
                "Bayer mosaic (color id {color_id})"
            ))),
            other => Err(ParallaxError::UnsupportedColorMode(format!(
                "color id {other}"
            ))),
        }
    }
}

/// SER file header (178 bytes), reduced to the fields the decoder needs.
#[derive(Clone, Debug)]
pub struct SerHeader {
    pub color_mode: ColorMode,
    pub little_endian: bool,
    pub width: u32,
    pub height: u32,
    pub pixel_depth: u32,
    pub frame_count: u32,
}

impl SerHeader {
    /// Bytes per sample (1 for 8-bit, 2 for 9-16 bit).
    pub fn bytes_per_sample(&self) -> usize {
        if self.pixel_depth <= 8 { 1 } else { 2 }
    }

    /// Samples per pixel (1 for mono, 3 for RGB/BGR).
    pub fn samples_per_pixel(&self) -> usize {
        match self.color_mode {
            ColorMode::Mono => 1,
            ColorMode::Rgb | ColorMode::Bgr => 3,
        }
    }

    /// Total bytes per frame. Overflow is ruled out at open time.
    pub fn frame_byte_size(&self) -> usize {
        self.width as usize
            * self.height as usize
            * self.bytes_per_sample()
            * self.samples_per_pixel()
    }
}

/// Memory-mapped SER file reader decoding frames to interleaved RGB8.
#[derive(Debug)]
pub struct SerReader {
    mmap: Mmap,
    pub header: SerHeader,
}

impl SerReader {
    /// Open a SER file and parse its header.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < SER_HEADER_SIZE {
            return Err(ParallaxError::InvalidSer(
                "File too small for SER header".into(),
            ));
        }

        if &mmap[0..14] != SER_MAGIC {
            return Err(ParallaxError::InvalidSer(
                "Missing LUCAM-RECORDER magic".into(),
            ));
        }

        let header = parse_header(&mmap[..SER_HEADER_SIZE])?;

        let frame_bytes = (header.width as usize)
            .checked_mul(header.height as usize)
            .and_then(|p| p.checked_mul(header.bytes_per_sample() * header.samples_per_pixel()))
            .ok_or_else(|| ParallaxError::InvalidSer("Frame size overflows".into()))?;
        let expected_data_size = SER_HEADER_SIZE + frame_bytes * header.frame_count as usize;
        if mmap.len() < expected_data_size {
            return Err(ParallaxError::InvalidSer(format!(
                "File truncated: expected at least {} bytes, got {}",
                expected_data_size,
                mmap.len()
            )));
        }

        Ok(Self { mmap, header })
    }

    /// Raw bytes for a single frame (zero-copy from mmap).
    fn frame_raw(&self, index: usize) -> Result<&[u8]> {
        let count = self.header.frame_count as usize;
        if index >= count {
            return Err(ParallaxError::FrameIndexOutOfRange {
                index,
                total: count,
            });
        }
        let offset = SER_HEADER_SIZE + index * self.header.frame_byte_size();
        let end = offset + self.header.frame_byte_size();
        Ok(&self.mmap[offset..end])
    }

    /// Decode a single frame to RGB8. Mono samples are replicated across
    /// channels; BGR sources are swapped to RGB here, once, so nothing
    /// downstream touches channel order again.
    pub fn decode_frame(&self, index: usize) -> Result<Frame> {
        let raw = self.frame_raw(index)?;
        let h = self.header.height as usize;
        let w = self.header.width as usize;
        let bps = self.header.bytes_per_sample();
        let spp = self.header.samples_per_pixel();
        let max_val = (1u32 << self.header.pixel_depth) - 1;
        let little_endian = self.header.little_endian;

        let sample = |sample_index: usize| -> u8 {
            let idx = sample_index * bps;
            let val = if bps == 1 {
                raw[idx] as u32
            } else {
                let pair = [raw[idx], raw[idx + 1]];
                if little_endian {
                    u16::from_le_bytes(pair) as u32
                } else {
                    u16::from_be_bytes(pair) as u32
                }
            };
            ((val * 255 + max_val / 2) / max_val) as u8
        };

        let mut flat = Vec::with_capacity(h * w * 3);
        for pixel in 0..h * w {
            let base = pixel * spp;
            match self.header.color_mode {
                ColorMode::Mono => {
                    let v = sample(base);
                    flat.extend_from_slice(&[v, v, v]);
                }
                ColorMode::Rgb => {
                    flat.extend_from_slice(&[sample(base), sample(base + 1), sample(base + 2)]);
                }
                ColorMode::Bgr => {
                    flat.extend_from_slice(&[sample(base + 2), sample(base + 1), sample(base)]);
                }
            }
        }

        let data = Array3::from_shape_vec((h, w, 3), flat)
            .expect("decoded byte count matches header dimensions");
        Ok(Frame::new(data))
    }
}

impl VideoSource for SerReader {
    fn frame_count(&self) -> usize {
        self.header.frame_count as usize
    }

    fn read_frame(&self, index: usize) -> Result<Frame> {
        self.decode_frame(index)
    }
}

fn parse_header(buf: &[u8]) -> Result<SerHeader> {
    let mut cursor = std::io::Cursor::new(&buf[14..]); // skip magic

    let _lu_id = cursor.read_i32::<LittleEndian>()?;
    let color_id = cursor.read_i32::<LittleEndian>()?;
    let le_flag = cursor.read_i32::<LittleEndian>()?;
    let width = cursor.read_i32::<LittleEndian>()? as u32;
    let height = cursor.read_i32::<LittleEndian>()? as u32;
    let pixel_depth = cursor.read_i32::<LittleEndian>()? as u32;
    let frame_count = cursor.read_i32::<LittleEndian>()? as u32;

    if width == 0 || height == 0 {
        return Err(ParallaxError::InvalidSer(format!(
            "Invalid dimensions {width}x{height}"
        )));
    }
    if !(1..=16).contains(&pixel_depth) {
        return Err(ParallaxError::InvalidSer(format!(
            "Invalid pixel depth {pixel_depth}"
        )));
    }

    let color_mode = ColorMode::from_color_id(color_id)?;

    // The endian flag is widely miswritten (FireCapture stores 0 for
    // little-endian data); follow Siril and treat anything but 1 as little.
    let little_endian = le_flag != 1;

    Ok(SerHeader {
        color_mode,
        little_endian,
        width,
        height,
        pixel_depth,
        frame_count,
    })
}
