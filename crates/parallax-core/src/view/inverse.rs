use crate::frame::Rotation;
use crate::view::crop::{compute_crop, Viewport};
use crate::view::ViewState;

/// Map a viewport coordinate back to the source pixel it displays.
///
/// Exactly inverts the crop/scale of [`render`](crate::view::render) and
/// then the rotation, using the same pixel-center convention, so a hover
/// position reports the true originating pixel. Returns `None` for
/// coordinates outside the viewport; that is absence of data, not an
/// error.
pub fn inverse_map(
    source_w: u32,
    source_h: u32,
    state: &ViewState,
    viewport: Viewport,
    vx: u32,
    vy: u32,
) -> Option<(u32, u32)> {
    if vx >= viewport.width || vy >= viewport.height {
        return None;
    }

    let (rot_w, rot_h) = if state.rotation.swaps_dimensions() {
        (source_h, source_w)
    } else {
        (source_w, source_h)
    };

    let crop = compute_crop(rot_w, rot_h, state.zoom, state.pan_x, state.pan_y);

    let rx = unscale(vx, viewport.width, crop.left, crop.width);
    let ry = unscale(vy, viewport.height, crop.top, crop.height);

    // Undo the rotation: (rx, ry) indexes the rotated image.
    let (sx, sy) = match state.rotation {
        Rotation::Deg0 => (rx, ry),
        Rotation::Deg90 => (ry, source_h - 1 - rx),
        Rotation::Deg180 => (source_w - 1 - rx, source_h - 1 - ry),
        Rotation::Deg270 => (source_w - 1 - ry, rx),
    };

    Some((sx, sy))
}

/// Invert the pixel-center scaling of one axis: viewport pixel `v` out of
/// `out_extent` lands on the nearest region pixel.
fn unscale(v: u32, out_extent: u32, region_offset: u32, region_extent: u32) -> u32 {
    let scale = region_extent as f32 / out_extent as f32;
    let s = region_offset as f32 + (v as f32 + 0.5) * scale - 0.5;
    let clamped = s
        .round()
        .clamp(region_offset as f32, (region_offset + region_extent - 1) as f32);
    clamped as u32
}
