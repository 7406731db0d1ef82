use std::borrow::Cow;

use crate::error::{ParallaxError, Result};
use crate::frame::{resample_region, Frame, Rotation};
use crate::view::crop::{compute_crop, Viewport};
use crate::view::ViewState;

/// Render a source frame through a view state into a viewport-sized frame.
///
/// Fixed pipeline: rotate, crop to the zoom/pan window, bilinear-resample
/// to the viewport. The output always fills the whole viewport; aspect
/// distortion is kept rather than letterboxed. With zoom 1, no pan, no
/// rotation and a viewport matching the source, the output is the source,
/// bit for bit.
pub fn render(source: &Frame, state: &ViewState, viewport: Viewport) -> Result<Frame> {
    if viewport.width == 0 || viewport.height == 0 {
        return Err(ParallaxError::InvalidViewport {
            width: viewport.width,
            height: viewport.height,
        });
    }

    let rotated: Cow<'_, Frame> = match state.rotation {
        Rotation::Deg0 => Cow::Borrowed(source),
        r => Cow::Owned(source.rotate(r)),
    };

    let crop = compute_crop(
        rotated.width() as u32,
        rotated.height() as u32,
        state.zoom,
        state.pan_x,
        state.pan_y,
    );

    Ok(resample_region(
        &rotated,
        crop.left,
        crop.top,
        crop.width,
        crop.height,
        viewport.width,
        viewport.height,
    ))
}
