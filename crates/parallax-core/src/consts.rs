/// Maximum number of frames kept from a video source. Longer videos are
/// sampled at a fixed stride so the stored count never exceeds this cap.
pub const FRAME_SAMPLE_CAP: usize = 300;

/// Minimum zoom factor (crop up to 10x larger than the viewport shows).
pub const ZOOM_MIN: f32 = 0.1;

/// Maximum zoom factor.
pub const ZOOM_MAX: f32 = 8.0;

/// Divisor for the adaptive zoom step: one wheel notch moves zoom by
/// zoom / ZOOM_STEP_DIVISOR, clamped to [ZOOM_STEP_MIN, ZOOM_STEP_MAX].
pub const ZOOM_STEP_DIVISOR: f32 = 10.0;

/// Smallest single zoom step.
pub const ZOOM_STEP_MIN: f32 = 0.1;

/// Largest single zoom step.
pub const ZOOM_STEP_MAX: f32 = 0.4;

/// Minimum playback speed multiplier.
pub const SPEED_MIN: f32 = 0.1;

/// Maximum playback speed multiplier.
pub const SPEED_MAX: f32 = 5.0;

/// Base playback tick in milliseconds (~30 fps at speed 1.0). The driving
/// timer divides this by the speed multiplier, floored at MIN_TICK_MS.
pub const PLAYBACK_TICK_MS: u64 = 33;

/// Shortest allowed tick interval in milliseconds.
pub const MIN_TICK_MS: u64 = 2;

/// Minimum image count to use Rayon parallelism when decoding a folder.
pub const PARALLEL_DECODE_THRESHOLD: usize = 8;

/// File extensions accepted when loading an image folder (case-insensitive).
pub const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];
