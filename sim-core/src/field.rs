//! Circular vortex vector field and particle advection.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Arrows shorter than this are not worth drawing.
const MIN_ARROW: f32 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vortex {
    pub strength: f32,
}

impl Default for Vortex {
    fn default() -> Self {
        Self { strength: 0.25 }
    }
}

/// Sampled field vector.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arrow {
    pub at: Vec2,
    pub dir: Vec2,
}

impl Vortex {
    /// `(-y, x) * strength`: counter-clockwise rotation about the origin.
    #[inline]
    pub fn velocity(&self, p: Vec2) -> Vec2 {
        p.perp() * self.strength
    }

    /// Samples the field on a grid over the inclusive ranges.
    ///
    /// Points where the field is (nearly) zero are skipped.
    pub fn arrow_grid(&self, x_range: [f32; 2], y_range: [f32; 2], spacing: f32) -> Vec<Arrow> {
        let mut out = Vec::new();
        if spacing <= 0.0 {
            return out;
        }
        let nx = ((x_range[1] - x_range[0]) / spacing).floor() as usize;
        let ny = ((y_range[1] - y_range[0]) / spacing).floor() as usize;
        for i in 0..=nx {
            for j in 0..=ny {
                let at = Vec2::new(
                    x_range[0] + i as f32 * spacing,
                    y_range[0] + j as f32 * spacing,
                );
                let dir = self.velocity(at);
                if dir.length() > MIN_ARROW {
                    out.push(Arrow { at, dir });
                }
            }
        }
        out
    }

    /// Explicit Euler move of a particle: `p + v(p) * dt * speed`.
    pub fn advect(&self, p: Vec2, dt: f32, speed: f32) -> Vec2 {
        p + self.velocity(p) * dt * speed
    }
}

/// `count` points evenly spaced on a circle around the origin.
pub fn ring(count: usize, radius: f32) -> Vec<Vec2> {
    (0..count)
        .map(|i| Vec2::from_angle(i as f32 * TAU / count as f32) * radius)
        .collect()
}
