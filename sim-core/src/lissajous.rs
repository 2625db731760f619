//! Lissajous figures.

use glam::Vec2;
use std::f32::consts::TAU;

/// `samples` points of `(sin(a t), sin(b t))` for `t` in `[0, τ]`.
pub fn lissajous(a: f32, b: f32, samples: usize) -> Vec<Vec2> {
    if samples < 2 {
        return vec![Vec2::ZERO; samples];
    }
    let dt = TAU / (samples - 1) as f32;
    (0..samples)
        .map(|i| {
            let t = i as f32 * dt;
            Vec2::new((a * t).sin(), (b * t).sin())
        })
        .collect()
}
