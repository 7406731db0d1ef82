use std::borrow::Cow;
use std::path::Path;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::consts::{MIN_TICK_MS, PLAYBACK_TICK_MS, SPEED_MAX, SPEED_MIN};
use crate::diff::{compute_diff, DiffMap};
use crate::error::{ParallaxError, Result};
use crate::frame::{Frame, SourceInfo};
use crate::store::{load_source, FrameSequence, FrameStore};
use crate::view::{inverse_map, render, ViewState, Viewport};

/// The three display panes of a comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pane {
    Reference,
    Comparison,
    Diff,
}

/// Outcome of one playback step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The index moved, or held while fractional speed accumulates.
    Playing,
    /// Loop is off and the sequence end was already reached; the caller
    /// should stop its timer.
    Ended,
}

/// One rendered pane triplet.
///
/// `version` identifies the load generation the frames came from; a caller
/// holding results across a reload compares it against
/// [`ComparisonSession::version`] and discards stale output.
#[derive(Clone, Debug)]
pub struct RenderOutput {
    pub version: u64,
    pub index: usize,
    pub reference: Frame,
    pub comparison: Frame,
    /// Present only while the diff is enabled.
    pub diff: Option<Frame>,
}

/// Pixel values under one viewport coordinate of a pane.
///
/// `x`/`y` are in the coordinate space of the image the pane displays;
/// both frames are read at the equivalent position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelInfo {
    pub x: u32,
    pub y: u32,
    pub reference: [u8; 3],
    pub comparison: [u8; 3],
}

/// Orchestrates two frame sequences into synchronized, per-index display:
/// which frames to show, whether to diff them, and how each pane's view
/// transform maps them to the screen.
pub struct ComparisonSession {
    store: FrameStore,
    index: usize,
    accumulator: f32,
    speed: f32,
    loop_enabled: bool,
    diff_enabled: bool,
    version: u64,
    reference_view: ViewState,
    comparison_view: ViewState,
    diff_view: ViewState,
}

impl Default for ComparisonSession {
    fn default() -> Self {
        Self {
            store: FrameStore::new(),
            index: 0,
            accumulator: 0.0,
            speed: 1.0,
            loop_enabled: true,
            diff_enabled: true,
            version: 0,
            reference_view: ViewState::default(),
            comparison_view: ViewState::default(),
            diff_view: ViewState::default(),
        }
    }
}

impl ComparisonSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the reference sequence from a file or folder. On failure the
    /// previously loaded sequence stays installed and untouched.
    pub fn load_reference(&mut self, path: &Path) -> Result<SourceInfo> {
        let sequence = self.load(path)?;
        let info = sequence.info().clone();
        self.store.set_reference(sequence);
        self.after_load();
        Ok(info)
    }

    /// Load the comparison sequence from a file or folder. On failure the
    /// previously loaded sequence stays installed and untouched.
    pub fn load_comparison(&mut self, path: &Path) -> Result<SourceInfo> {
        let sequence = self.load(path)?;
        let info = sequence.info().clone();
        self.store.set_comparison(sequence);
        self.after_load();
        Ok(info)
    }

    fn load(&self, path: &Path) -> Result<FrameSequence> {
        load_source(path, |item, e| {
            warn!(item, error = %e, "Skipping undecodable frame");
        })
        .map_err(|e| {
            error!(path = %path.display(), error = %e, "Source load failed");
            e
        })
    }

    /// A successful load restarts the session: index and view states
    /// reset, and the version moves so in-flight render output for the
    /// old sequences can be recognized as stale.
    fn after_load(&mut self) {
        self.index = 0;
        self.accumulator = 0.0;
        self.reference_view.reset();
        self.comparison_view.reset();
        self.diff_view.reset();
        self.version += 1;
    }

    /// Exchange reference and comparison roles, including their pane view
    /// states. Pixel data is not copied.
    pub fn swap(&mut self) {
        self.store.swap();
        std::mem::swap(&mut self.reference_view, &mut self.comparison_view);
        self.version += 1;
        info!("Swapped reference and comparison sources");
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Frames usable for synchronized stepping; zero until both sequences
    /// are loaded.
    pub fn effective_len(&self) -> usize {
        self.store.effective_len()
    }

    pub fn reference_info(&self) -> Option<&SourceInfo> {
        self.store.reference().map(|s| s.info())
    }

    pub fn comparison_info(&self) -> Option<&SourceInfo> {
        self.store.comparison().map(|s| s.info())
    }

    pub fn set_index(&mut self, index: usize) -> Result<()> {
        let total = self.effective_len();
        if index >= total {
            return Err(ParallaxError::FrameIndexOutOfRange { index, total });
        }
        self.index = index;
        Ok(())
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.clamp(SPEED_MIN, SPEED_MAX);
    }

    pub fn loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    pub fn set_loop_enabled(&mut self, enabled: bool) {
        self.loop_enabled = enabled;
    }

    pub fn diff_enabled(&self) -> bool {
        self.diff_enabled
    }

    pub fn set_diff_enabled(&mut self, enabled: bool) {
        self.diff_enabled = enabled;
    }

    /// Interval the driving timer should use between `advance` calls at
    /// the current speed.
    pub fn tick_interval(&self) -> Duration {
        let ms = (PLAYBACK_TICK_MS as f32 / self.speed) as u64;
        Duration::from_millis(ms.max(MIN_TICK_MS))
    }

    /// Step playback by one tick.
    ///
    /// Speed accumulates fractionally: each call adds the speed multiplier
    /// and the index advances by the whole part, so speed 0.5 moves every
    /// other tick and speed 2.0 skips every other frame. With loop on the
    /// index wraps; with loop off it clamps at the last frame and the call
    /// after reaching it reports [`StepOutcome::Ended`].
    pub fn advance(&mut self) -> StepOutcome {
        let len = self.effective_len();
        if len == 0 {
            return StepOutcome::Ended;
        }

        self.accumulator += self.speed;
        let step = self.accumulator.floor() as usize;
        self.accumulator -= step as f32;
        if step == 0 {
            return StepOutcome::Playing;
        }

        let last = len - 1;
        let next = self.index + step;
        if self.loop_enabled {
            self.index = next % len;
            StepOutcome::Playing
        } else if next <= last {
            self.index = next;
            StepOutcome::Playing
        } else if self.index < last {
            self.index = last;
            StepOutcome::Playing
        } else {
            StepOutcome::Ended
        }
    }

    pub fn view(&self, pane: Pane) -> &ViewState {
        match pane {
            Pane::Reference => &self.reference_view,
            Pane::Comparison => &self.comparison_view,
            Pane::Diff => &self.diff_view,
        }
    }

    pub fn view_mut(&mut self, pane: Pane) -> &mut ViewState {
        match pane {
            Pane::Reference => &mut self.reference_view,
            Pane::Comparison => &mut self.comparison_view,
            Pane::Diff => &mut self.diff_view,
        }
    }

    /// Apply a zoom delta to every pane at once.
    pub fn zoom_all_by(&mut self, delta: f32) {
        self.for_each_view(|v| v.zoom_by(delta));
    }

    /// Apply a pan delta to every pane at once.
    pub fn pan_all_by(&mut self, dx: f32, dy: f32) {
        self.for_each_view(|v| v.pan_by(dx, dy));
    }

    /// Rotate every pane one step clockwise.
    pub fn rotate_all_cw(&mut self) {
        self.for_each_view(|v| v.rotate_cw());
    }

    /// Rotate every pane one step counter-clockwise.
    pub fn rotate_all_ccw(&mut self) {
        self.for_each_view(|v| v.rotate_ccw());
    }

    /// Reset every pane to the default view.
    pub fn reset_views(&mut self) {
        self.for_each_view(|v| v.reset());
    }

    /// Fit every pane's displayed image inside the viewport.
    pub fn fit_all(&mut self, viewport: Viewport) -> Result<()> {
        for pane in [Pane::Reference, Pane::Comparison, Pane::Diff] {
            let (w, h) = self.pane_source_dims(pane)?;
            self.view_mut(pane).fit_to_viewport(w, h, viewport);
        }
        Ok(())
    }

    fn for_each_view(&mut self, mut apply: impl FnMut(&mut ViewState)) {
        apply(&mut self.reference_view);
        apply(&mut self.comparison_view);
        apply(&mut self.diff_view);
    }

    /// Dimensions of the image a pane displays at the current index. The
    /// comparison pane shows its frame resized to reference dimensions
    /// while the diff is enabled, native otherwise.
    fn pane_source_dims(&self, pane: Pane) -> Result<(u32, u32)> {
        let (reference, comparison) = self.current_frames()?;
        let dims = |f: &Frame| (f.width() as u32, f.height() as u32);
        Ok(match pane {
            Pane::Reference | Pane::Diff => dims(reference),
            Pane::Comparison => {
                if self.diff_enabled {
                    dims(reference)
                } else {
                    dims(comparison)
                }
            }
        })
    }

    fn current_frames(&self) -> Result<(&Frame, &Frame)> {
        let reference = self
            .store
            .reference()
            .ok_or(ParallaxError::NoSequence)?
            .frame_at(self.index)?;
        let comparison = self
            .store
            .comparison()
            .ok_or(ParallaxError::NoSequence)?
            .frame_at(self.index)?;
        Ok((reference, comparison))
    }

    /// Compute the diff map for an arbitrary frame index, regardless of
    /// the playback position and the diff display flag. The comparison
    /// frame is resized to reference dimensions first when they differ.
    pub fn diff_at(&self, index: usize) -> Result<DiffMap> {
        let reference = self
            .store
            .reference()
            .ok_or(ParallaxError::NoSequence)?
            .frame_at(index)?;
        let comparison = self
            .store
            .comparison()
            .ok_or(ParallaxError::NoSequence)?
            .frame_at(index)?;

        let resized: Cow<'_, Frame> =
            if comparison.width() != reference.width() || comparison.height() != reference.height()
            {
                Cow::Owned(
                    comparison.resize_to(reference.width() as u32, reference.height() as u32),
                )
            } else {
                Cow::Borrowed(comparison)
            };
        compute_diff(reference, &resized)
    }

    /// Produce the pane triplet for the current index.
    ///
    /// The comparison frame is resized to reference dimensions only when
    /// the diff is enabled; the diff pane is rendered from the magnitude
    /// visualization. All panes derive from the same index, and the three
    /// transforms run in parallel over immutable inputs.
    pub fn render(&self, viewport: Viewport) -> Result<RenderOutput> {
        let (reference, comparison) = self.current_frames()?;

        let comparison_source: Cow<'_, Frame> = if self.diff_enabled
            && (comparison.width() != reference.width()
                || comparison.height() != reference.height())
        {
            Cow::Owned(comparison.resize_to(reference.width() as u32, reference.height() as u32))
        } else {
            Cow::Borrowed(comparison)
        };

        let diff_vis = if self.diff_enabled {
            Some(compute_diff(reference, &comparison_source)?.visualization)
        } else {
            None
        };

        let (reference_pane, (comparison_pane, diff_pane)) = rayon::join(
            || render(reference, &self.reference_view, viewport),
            || {
                rayon::join(
                    || render(&comparison_source, &self.comparison_view, viewport),
                    || {
                        diff_vis
                            .as_ref()
                            .map(|d| render(d, &self.diff_view, viewport))
                            .transpose()
                    },
                )
            },
        );

        Ok(RenderOutput {
            version: self.version,
            index: self.index,
            reference: reference_pane?,
            comparison: comparison_pane?,
            diff: diff_pane?,
        })
    }

    /// Report the pixel under a viewport coordinate of one pane.
    ///
    /// The coordinate is inverse-mapped through that pane's view state to
    /// the displayed image, then both frames are read at the equivalent
    /// position (clamped to their bounds). A coordinate outside the
    /// viewport yields `Ok(None)`.
    pub fn inspect(
        &self,
        pane: Pane,
        viewport: Viewport,
        vx: u32,
        vy: u32,
    ) -> Result<Option<PixelInfo>> {
        let (reference, comparison) = self.current_frames()?;
        let (pane_w, pane_h) = self.pane_source_dims(pane)?;

        let Some((x, y)) = inverse_map(pane_w, pane_h, self.view(pane), viewport, vx, vy) else {
            return Ok(None);
        };

        let read = |frame: &Frame| -> [u8; 3] {
            let fx = map_axis(x, pane_w, frame.width() as u32);
            let fy = map_axis(y, pane_h, frame.height() as u32);
            frame.pixel(fx as usize, fy as usize)
        };

        Ok(Some(PixelInfo {
            x,
            y,
            reference: read(reference),
            comparison: read(comparison),
        }))
    }
}

/// Carry a coordinate from one axis extent to another, landing on the
/// nearest pixel center. Identity when the extents match.
fn map_axis(v: u32, from: u32, to: u32) -> u32 {
    if from == to {
        return v;
    }
    let scale = to as f32 / from as f32;
    let mapped = ((v as f32 + 0.5) * scale - 0.5).round();
    (mapped.clamp(0.0, (to - 1) as f32)) as u32
}
