use serde::{Deserialize, Serialize};

use crate::consts::{ZOOM_MAX, ZOOM_MIN, ZOOM_STEP_DIVISOR, ZOOM_STEP_MAX, ZOOM_STEP_MIN};
use crate::frame::Rotation;

pub mod crop;
mod inverse;
mod transform;

pub use crop::{compute_crop, CropWindow, Viewport};
pub use inverse::inverse_map;
pub use transform::render;

/// Zoom, pan and rotation for one pane.
///
/// Pan is in source-pixel units and deliberately unclamped here; the crop
/// window clamps against the image edges when the view is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub zoom: f32,
    pub pan_x: f32,
    pub pan_y: f32,
    pub rotation: Rotation,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            rotation: Rotation::Deg0,
        }
    }
}

impl ViewState {
    /// Back to zoom 1, no pan, no rotation.
    pub fn reset(&mut self) {
        *self = ViewState::default();
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
    }

    /// Adjust zoom by a delta, clamped to the valid range.
    pub fn zoom_by(&mut self, delta: f32) {
        self.set_zoom(self.zoom + delta);
    }

    /// Step size for one zoom increment: a tenth of the current zoom,
    /// bounded so steps stay usable at both extremes.
    pub fn zoom_step(&self) -> f32 {
        (self.zoom / ZOOM_STEP_DIVISOR).clamp(ZOOM_STEP_MIN, ZOOM_STEP_MAX)
    }

    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Set the rotation. Pan resets to the center; zoom is kept.
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    pub fn rotate_cw(&mut self) {
        self.set_rotation(self.rotation.rotated_cw());
    }

    pub fn rotate_ccw(&mut self) {
        self.set_rotation(self.rotation.rotated_ccw());
    }

    /// Zoom out (or in) so the whole rotated image fits the viewport, and
    /// recenter. The smaller axis ratio wins, clamped to the zoom range.
    pub fn fit_to_viewport(&mut self, source_w: u32, source_h: u32, viewport: Viewport) {
        let (w, h) = if self.rotation.swaps_dimensions() {
            (source_h, source_w)
        } else {
            (source_w, source_h)
        };
        let fit = (viewport.width as f32 / w as f32).min(viewport.height as f32 / h as f32);
        self.zoom = fit.clamp(ZOOM_MIN, ZOOM_MAX);
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }
}
