//! Escape-time evaluation of the Mandelbrot set.
//!
//! A sample point `c` is classified by how many iterations of
//! `z <- z^2 + c` (starting from `z = 0`) it survives before `|z|`
//! exceeds 2. Points that never escape within the iteration bound are
//! reported as [`Escape::Bounded`].

use glam::{DVec2, Vec2};
use serde::{Deserialize, Serialize};

/// Squared escape radius (`|z| > 2`).
const ESCAPE_RADIUS_SQ: f64 = 4.0;

/// Outcome of [`escape_time`] for one sample point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Escape {
    /// `|z|` exceeded 2 when checked before update number `n`.
    ///
    /// `n` is always strictly below the iteration bound.
    Escaped(u32),
    /// The iteration bound was reached without escaping.
    Bounded,
}

impl Escape {
    /// Iteration count, with bounded points reported as `max_iter`.
    pub fn iterations(self, max_iter: u32) -> u32 {
        match self {
            Escape::Escaped(n) => n,
            Escape::Bounded => max_iter,
        }
    }

    pub fn is_bounded(self) -> bool {
        matches!(self, Escape::Bounded)
    }

    /// Escape ratio `n / max_iter` for escaped points, `None` for points
    /// inside the set.
    pub fn shade(self, max_iter: u32) -> Option<f32> {
        match self {
            Escape::Escaped(n) if max_iter > 0 => Some(n as f32 / max_iter as f32),
            Escape::Escaped(_) => Some(0.0),
            Escape::Bounded => None,
        }
    }
}

/// Iterates `z <- z^2 + c` from `z = 0` for at most `max_iter` updates.
///
/// The magnitude test runs before every update, so a point with
/// `|c| > 2` escapes at iteration 1 and `c = 0` stays bounded. A bound
/// of 1 therefore reports every point as bounded; configs require at
/// least 2.
///
/// ### Parameters
/// - `c` - Sample point, `x` is the real part and `y` the imaginary part.
/// - `max_iter` - Maximum number of updates.
///
/// ### Returns
/// [`Escape::Escaped`] with the iteration at which `|z| > 2` was first
/// observed, or [`Escape::Bounded`].
pub fn escape_time(c: DVec2, max_iter: u32) -> Escape {
    let mut z = DVec2::ZERO;
    for n in 0..max_iter {
        if z.length_squared() > ESCAPE_RADIUS_SQ {
            return Escape::Escaped(n);
        }
        // (a + bi)^2 = a^2 - b^2 + 2abi
        z = DVec2::new(z.x * z.x - z.y * z.y + c.x, 2.0 * z.x * z.y + c.y);
    }
    Escape::Bounded
}

/// Rectangular window of the complex plane sampled on a square grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneWindow {
    pub x_range: [f64; 2],
    pub y_range: [f64; 2],
    pub resolution: u32,
}

impl Default for PlaneWindow {
    fn default() -> Self {
        Self {
            x_range: [-2.5, 1.0],
            y_range: [-1.25, 1.25],
            resolution: 60,
        }
    }
}

impl PlaneWindow {
    /// Plane coordinate of grid index `(i, j)`.
    ///
    /// Index `resolution` itself would land on the upper bound, so the
    /// grid covers `[x0, x1)` and `[y0, y1)`.
    pub fn point(&self, i: u32, j: u32) -> DVec2 {
        let res = self.resolution as f64;
        let [x0, x1] = self.x_range;
        let [y0, y1] = self.y_range;
        DVec2::new(
            x0 + (x1 - x0) * i as f64 / res,
            y0 + (y1 - y0) * j as f64 / res,
        )
    }
}

/// Evaluated grid point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub c: DVec2,
    pub escape: Escape,
}

/// Evaluates every point of `window` with [`escape_time`].
///
/// Samples are ordered with `i` (the real axis) as the outer loop.
pub fn sample_grid(window: &PlaneWindow, max_iter: u32) -> Vec<Sample> {
    let n = window.resolution as usize;
    let mut out = Vec::with_capacity(n * n);
    for i in 0..window.resolution {
        for j in 0..window.resolution {
            let c = window.point(i, j);
            out.push(Sample {
                c,
                escape: escape_time(c, max_iter),
            });
        }
    }
    out
}

/// Affine map from plane coordinates to screen space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenMap {
    pub offset: [f64; 2],
    pub scale: [f64; 2],
}

impl Default for ScreenMap {
    fn default() -> Self {
        Self {
            offset: [0.75, 0.0],
            scale: [3.2, 4.5],
        }
    }
}

impl ScreenMap {
    pub fn apply(&self, c: DVec2) -> Vec2 {
        Vec2::new(
            ((c.x + self.offset[0]) * self.scale[0]) as f32,
            ((c.y + self.offset[1]) * self.scale[1]) as f32,
        )
    }
}
