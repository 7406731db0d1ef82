use std::io::Write;
use tempfile::NamedTempFile;

use parallax_core::error::ParallaxError;
use parallax_core::io::ser::{ColorMode, SerReader};
use parallax_core::io::VideoSource;

const SER_HEADER_SIZE: usize = 178;

/// Build a minimal synthetic SER file in memory.
fn build_synthetic_ser(
    width: u32,
    height: u32,
    bit_depth: u32,
    color_id: i32,
    endian_flag: i32,
    frames: &[Vec<u8>],
) -> Vec<u8> {
    let mut buf = Vec::new();

    // Magic (14 bytes)
    buf.extend_from_slice(b"LUCAM-RECORDER");
    // LuID (4 bytes)
    buf.extend_from_slice(&0i32.to_le_bytes());
    // ColorID
    buf.extend_from_slice(&color_id.to_le_bytes());
    // LittleEndian flag
    buf.extend_from_slice(&endian_flag.to_le_bytes());
    // Width
    buf.extend_from_slice(&(width as i32).to_le_bytes());
    // Height
    buf.extend_from_slice(&(height as i32).to_le_bytes());
    // PixelDepth
    buf.extend_from_slice(&(bit_depth as i32).to_le_bytes());
    // FrameCount
    buf.extend_from_slice(&(frames.len() as i32).to_le_bytes());
    // Observer (40 bytes)
    let mut observer = [0u8; 40];
    observer[..4].copy_from_slice(b"Test");
    buf.extend_from_slice(&observer);
    // Instrument (40 bytes)
    buf.extend_from_slice(&[0u8; 40]);
    // Telescope (40 bytes)
    buf.extend_from_slice(&[0u8; 40]);
    // DateTime (8 bytes)
    buf.extend_from_slice(&0u64.to_le_bytes());
    // DateTimeUTC (8 bytes)
    buf.extend_from_slice(&0u64.to_le_bytes());

    assert_eq!(buf.len(), SER_HEADER_SIZE);

    // Frame data
    for frame in frames {
        buf.extend_from_slice(frame);
    }

    buf
}

fn write_temp(data: &[u8]) -> NamedTempFile {
    let mut tmpfile = NamedTempFile::new().unwrap();
    tmpfile.write_all(data).unwrap();
    tmpfile.flush().unwrap();
    tmpfile
}

#[test]
fn test_parse_8bit_mono() {
    let w = 4u32;
    let h = 3u32;
    let frame_data: Vec<u8> = (0u8..12).collect();
    let ser_data = build_synthetic_ser(w, h, 8, 0, 0, &[frame_data]);
    let tmpfile = write_temp(&ser_data);

    let reader = SerReader::open(tmpfile.path()).unwrap();
    assert_eq!(reader.frame_count(), 1);
    assert_eq!(reader.header.width, 4);
    assert_eq!(reader.header.height, 3);
    assert_eq!(reader.header.pixel_depth, 8);
    assert_eq!(reader.header.color_mode, ColorMode::Mono);
    assert!(reader.header.little_endian);

    let frame = reader.read_frame(0).unwrap();
    assert_eq!(frame.width(), 4);
    assert_eq!(frame.height(), 3);
    // 8-bit samples pass through unscaled, replicated across channels.
    assert_eq!(frame.pixel(0, 0), [0, 0, 0]);
    assert_eq!(frame.pixel(1, 0), [1, 1, 1]);
    assert_eq!(frame.pixel(3, 2), [11, 11, 11]);
}

#[test]
fn test_parse_16bit_mono_scales_to_8bit() {
    let w = 2u32;
    let h = 2u32;
    let values: [u16; 4] = [0, 1000, 32767, 65535];
    let mut frame_data = Vec::new();
    for v in &values {
        frame_data.extend_from_slice(&v.to_le_bytes());
    }
    let ser_data = build_synthetic_ser(w, h, 16, 0, 0, &[frame_data]);
    let tmpfile = write_temp(&ser_data);

    let reader = SerReader::open(tmpfile.path()).unwrap();
    let frame = reader.read_frame(0).unwrap();

    // Rounded division: (v * 255 + 32767) / 65535
    assert_eq!(frame.pixel(0, 0)[0], 0);
    assert_eq!(frame.pixel(1, 0)[0], 4);
    assert_eq!(frame.pixel(0, 1)[0], 127);
    assert_eq!(frame.pixel(1, 1)[0], 255);
}

#[test]
fn test_parse_12bit_full_scale() {
    // 12-bit max (4095) must map to 255, not get truncated mid-range.
    let mut frame_data = Vec::new();
    frame_data.extend_from_slice(&4095u16.to_le_bytes());
    frame_data.extend_from_slice(&0u16.to_le_bytes());
    let ser_data = build_synthetic_ser(2, 1, 12, 0, 0, &[frame_data]);
    let tmpfile = write_temp(&ser_data);

    let reader = SerReader::open(tmpfile.path()).unwrap();
    let frame = reader.read_frame(0).unwrap();
    assert_eq!(frame.pixel(0, 0)[0], 255);
    assert_eq!(frame.pixel(1, 0)[0], 0);
}

#[test]
fn test_parse_rgb_color() {
    let pixels: Vec<u8> = vec![
        10, 20, 30, // (0, 0)
        40, 50, 60, // (1, 0)
    ];
    let ser_data = build_synthetic_ser(2, 1, 8, 100, 0, &[pixels]);
    let tmpfile = write_temp(&ser_data);

    let reader = SerReader::open(tmpfile.path()).unwrap();
    assert_eq!(reader.header.color_mode, ColorMode::Rgb);

    let frame = reader.read_frame(0).unwrap();
    assert_eq!(frame.pixel(0, 0), [10, 20, 30]);
    assert_eq!(frame.pixel(1, 0), [40, 50, 60]);
}

#[test]
fn test_bgr_swapped_to_rgb_at_decode() {
    let pixels: Vec<u8> = vec![
        30, 20, 10, // B, G, R at (0, 0)
        60, 50, 40, // B, G, R at (1, 0)
    ];
    let ser_data = build_synthetic_ser(2, 1, 8, 101, 0, &[pixels]);
    let tmpfile = write_temp(&ser_data);

    let reader = SerReader::open(tmpfile.path()).unwrap();
    assert_eq!(reader.header.color_mode, ColorMode::Bgr);

    let frame = reader.read_frame(0).unwrap();
    assert_eq!(frame.pixel(0, 0), [10, 20, 30]);
    assert_eq!(frame.pixel(1, 0), [40, 50, 60]);
}

#[test]
fn test_16bit_big_endian_flag() {
    // Endian flag 1 marks big-endian sample data.
    let mut frame_data = Vec::new();
    frame_data.extend_from_slice(&512u16.to_be_bytes());
    let ser_data = build_synthetic_ser(1, 1, 16, 0, 1, &[frame_data]);
    let tmpfile = write_temp(&ser_data);

    let reader = SerReader::open(tmpfile.path()).unwrap();
    assert!(!reader.header.little_endian);

    let frame = reader.read_frame(0).unwrap();
    assert_eq!(frame.pixel(0, 0)[0], 2); // (512 * 255 + 32767) / 65535
}

#[test]
fn test_multiple_frames() {
    let frame1: Vec<u8> = vec![0, 50, 100, 200];
    let frame2: Vec<u8> = vec![255, 200, 100, 50];
    let ser_data = build_synthetic_ser(2, 2, 8, 0, 0, &[frame1, frame2]);
    let tmpfile = write_temp(&ser_data);

    let reader = SerReader::open(tmpfile.path()).unwrap();
    assert_eq!(reader.frame_count(), 2);

    let f0 = reader.read_frame(0).unwrap();
    let f1 = reader.read_frame(1).unwrap();
    assert_eq!(f0.pixel(0, 0)[0], 0);
    assert_eq!(f1.pixel(0, 0)[0], 255);
}

#[test]
fn test_read_out_of_range() {
    let frame_data: Vec<u8> = vec![0, 0, 0, 0];
    let ser_data = build_synthetic_ser(2, 2, 8, 0, 0, &[frame_data]);
    let tmpfile = write_temp(&ser_data);

    let reader = SerReader::open(tmpfile.path()).unwrap();
    assert!(matches!(
        reader.read_frame(1),
        Err(ParallaxError::FrameIndexOutOfRange { index: 1, total: 1 })
    ));
}

#[test]
fn test_rejects_bayer_color_mode() {
    let frame_data: Vec<u8> = vec![0, 0, 0, 0];
    let ser_data = build_synthetic_ser(2, 2, 8, 8, 0, &[frame_data]);
    let tmpfile = write_temp(&ser_data);

    let err = SerReader::open(tmpfile.path()).unwrap_err();
    assert!(matches!(err, ParallaxError::UnsupportedColorMode(_)));
    assert!(err.to_string().contains("Bayer"));
}

#[test]
fn test_rejects_bad_magic() {
    let mut ser_data = build_synthetic_ser(2, 2, 8, 0, 0, &[vec![0, 0, 0, 0]]);
    ser_data[0..5].copy_from_slice(b"WRONG");
    let tmpfile = write_temp(&ser_data);

    assert!(matches!(
        SerReader::open(tmpfile.path()),
        Err(ParallaxError::InvalidSer(_))
    ));
}

#[test]
fn test_rejects_truncated_file() {
    // Header promises two frames, file carries one.
    let mut ser_data = build_synthetic_ser(2, 2, 8, 0, 0, &[vec![0, 0, 0, 0]]);
    let count_offset = 14 + 4 * 6;
    ser_data[count_offset..count_offset + 4].copy_from_slice(&2i32.to_le_bytes());
    let tmpfile = write_temp(&ser_data);

    let err = SerReader::open(tmpfile.path()).unwrap_err();
    assert!(matches!(err, ParallaxError::InvalidSer(_)));
    assert!(err.to_string().contains("truncated"));
}

#[test]
fn test_rejects_short_header() {
    let tmpfile = write_temp(b"LUCAM-RECORDER but nothing else");
    assert!(matches!(
        SerReader::open(tmpfile.path()),
        Err(ParallaxError::InvalidSer(_))
    ));
}

#[test]
fn test_rejects_invalid_pixel_depth() {
    let ser_data = build_synthetic_ser(2, 2, 24, 0, 0, &[vec![0u8; 12]]);
    let tmpfile = write_temp(&ser_data);

    assert!(matches!(
        SerReader::open(tmpfile.path()),
        Err(ParallaxError::InvalidSer(_))
    ));
}

#[test]
fn test_zero_frame_file_opens() {
    // A SER file with zero frames parses; rejecting it is the loader's
    // call, not the reader's.
    let ser_data = build_synthetic_ser(2, 2, 8, 0, 0, &[]);
    let tmpfile = write_temp(&ser_data);

    let reader = SerReader::open(tmpfile.path()).unwrap();
    assert_eq!(reader.frame_count(), 0);
}
