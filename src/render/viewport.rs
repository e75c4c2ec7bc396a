//! Pan/zoom state for the frontier chart.
//!
//! Coordinates are normalised: the unzoomed chart maps sequence length
//! `[0, 4096]` and batch size `[0, 128]` onto `[0, 1]` on each axis, y
//! pointing up. A transform `screen = k * world + t` is applied on top, with
//! `k` clamped to `[0.5, 10]` and the visible window kept inside one chart
//! size of slack on every side.

use crate::core::frontier::{MAX_BATCH_SIZE, MAX_SEQ_LENGTH};
use crate::utils::error::Result;
use crate::utils::validation::validate_range;

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 10.0;

const EXTENT_MIN: f64 = -1.0;
const EXTENT_MAX: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    k: f64,
    tx: f64,
    ty: f64,
    x_max: f64,
    y_max: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::identity()
    }
}

impl Viewport {
    pub fn identity() -> Self {
        Self {
            k: 1.0,
            tx: 0.0,
            ty: 0.0,
            x_max: MAX_SEQ_LENGTH as f64,
            y_max: MAX_BATCH_SIZE,
        }
    }

    /// Zoom about the chart centre, then pan by fractions of the chart size.
    pub fn from_controls(zoom: f64, pan_x: f64, pan_y: f64) -> Result<Self> {
        validate_range("zoom", zoom, MIN_ZOOM, MAX_ZOOM)?;
        validate_range("pan_x", pan_x, -2.0, 2.0)?;
        validate_range("pan_y", pan_y, -2.0, 2.0)?;

        let mut viewport = Self::identity();
        viewport.zoom_by(zoom, (0.5, 0.5));
        viewport.pan_by(pan_x, pan_y);
        Ok(viewport)
    }

    pub fn scale(&self) -> f64 {
        self.k
    }

    /// Scales by `factor` keeping the screen point `focus` fixed.
    pub fn zoom_by(&mut self, factor: f64, focus: (f64, f64)) {
        let k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        let world = self.screen_to_world(focus);
        self.k = k;
        self.tx = focus.0 - k * world.0;
        self.ty = focus.1 - k * world.1;
        self.constrain();
    }

    /// Moves the content by `(dx, dy)` screen units.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.tx += dx;
        self.ty += dy;
        self.constrain();
    }

    /// Visible sequence-length range.
    pub fn x_domain(&self) -> (f64, f64) {
        let (lo, hi) = self.visible_world(self.tx);
        (lo * self.x_max, hi * self.x_max)
    }

    /// Visible batch-size range.
    pub fn y_domain(&self) -> (f64, f64) {
        let (lo, hi) = self.visible_world(self.ty);
        (lo * self.y_max, hi * self.y_max)
    }

    /// Data point to normalised screen position.
    pub fn apply(&self, seq_length: f64, batch_size: f64) -> (f64, f64) {
        (
            self.k * (seq_length / self.x_max) + self.tx,
            self.k * (batch_size / self.y_max) + self.ty,
        )
    }

    /// Normalised screen position back to `(sequence length, batch size)`.
    pub fn invert(&self, screen: (f64, f64)) -> (f64, f64) {
        let world = self.screen_to_world(screen);
        (world.0 * self.x_max, world.1 * self.y_max)
    }

    fn screen_to_world(&self, screen: (f64, f64)) -> (f64, f64) {
        ((screen.0 - self.tx) / self.k, (screen.1 - self.ty) / self.k)
    }

    fn visible_world(&self, t: f64) -> (f64, f64) {
        (-t / self.k, (1.0 - t) / self.k)
    }

    fn constrain(&mut self) {
        self.tx = constrain_axis(self.k, self.tx);
        self.ty = constrain_axis(self.k, self.ty);
    }
}

fn constrain_axis(k: f64, t: f64) -> f64 {
    let lo = -t / k;
    let hi = (1.0 - t) / k;
    if lo < EXTENT_MIN {
        -EXTENT_MIN * k
    } else if hi > EXTENT_MAX {
        1.0 - EXTENT_MAX * k
    } else {
        t
    }
}
