/// Output dimensions requested from the view transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// The sub-region of a (rotated) source selected by zoom and pan, after
/// clamping. Always lies fully inside the image it was computed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropWindow {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl CropWindow {
    pub fn right(&self) -> u32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.top + self.height
    }
}

/// Compute the crop window for an image of `width` x `height` under the
/// given zoom and pan.
///
/// The window spans `dim / zoom` pixels per axis (floored, at least 1),
/// centered on the image center shifted by the pan in source-pixel units.
/// The window is then clamped inside the image, so panning can never
/// expose space beyond an edge. When zoom < 1 asks for a window larger
/// than the image, the window covers the full axis and pan is inert there.
pub fn compute_crop(width: u32, height: u32, zoom: f32, pan_x: f32, pan_y: f32) -> CropWindow {
    let (left, crop_w) = axis_window(width, zoom, pan_x);
    let (top, crop_h) = axis_window(height, zoom, pan_y);
    CropWindow {
        left,
        top,
        width: crop_w,
        height: crop_h,
    }
}

fn axis_window(extent: u32, zoom: f32, pan: f32) -> (u32, u32) {
    let size = ((extent as f32 / zoom).floor() as u32).clamp(1, extent);
    if size >= extent {
        return (0, extent);
    }
    let center = extent as f32 / 2.0 + pan;
    let offset = (center - size as f32 / 2.0)
        .round()
        .clamp(0.0, (extent - size) as f32);
    (offset as u32, size)
}
