//! Chains of rotating circles (epicycles).
//!
//! Each circle is centred on the endpoint of the previous one and turns
//! at its own frequency; the endpoint of the last circle traces the
//! drawn curve.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Epicycle {
    pub radius: f32,
    /// Angular speed multiplier; negative values turn clockwise.
    pub frequency: f32,
    pub phase: f32,
}

impl Epicycle {
    pub fn new(radius: f32, frequency: f32, phase: f32) -> Self {
        Self {
            radius,
            frequency,
            phase,
        }
    }

    /// Offset of this circle's endpoint from its centre at time `t`.
    #[inline]
    pub fn offset(&self, t: f32) -> Vec2 {
        let angle = t * self.frequency + self.phase;
        Vec2::new(self.radius * angle.cos(), self.radius * angle.sin())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpicycleChain {
    pub origin: Vec2,
    pub circles: Vec<Epicycle>,
}

impl EpicycleChain {
    /// Seven circles with mixed phases, drawn from `(-3, 0)`.
    pub fn fourier_series() -> Self {
        let radii = [1.5, 0.8, 0.5, 0.3, 0.2, 0.15, 0.1];
        let freqs = [1.0, 2.0, 3.0, 4.0, 5.0, 7.0, 9.0];
        let phases = [0.0, FRAC_PI_4, FRAC_PI_2, 0.0, FRAC_PI_3, FRAC_PI_6, 0.0];
        let circles = radii
            .iter()
            .zip(freqs)
            .zip(phases)
            .map(|((&r, f), p)| Epicycle::new(r, f, p))
            .collect();
        Self {
            origin: Vec2::new(-3.0, 0.0),
            circles,
        }
    }

    /// Six circles at odd harmonics, drawn from `(-3.5, 0)`.
    pub fn odd_harmonics() -> Self {
        let radii = [1.2, 0.7, 0.4, 0.25, 0.15, 0.1];
        let circles = radii
            .iter()
            .enumerate()
            .map(|(k, &r)| Epicycle::new(r, (2 * k + 1) as f32, 0.0))
            .collect();
        Self {
            origin: Vec2::new(-3.5, 0.0),
            circles,
        }
    }

    /// Circle centres followed by the tip.
    ///
    /// The returned vector has `circles.len() + 1` entries: `joints[k]`
    /// is the centre of circle `k` and the last entry is the tip.
    pub fn joints(&self, t: f32) -> Vec<Vec2> {
        let mut out = Vec::with_capacity(self.circles.len() + 1);
        let mut p = self.origin;
        out.push(p);
        for c in &self.circles {
            p += c.offset(t);
            out.push(p);
        }
        out
    }

    pub fn tip(&self, t: f32) -> Vec2 {
        self.circles
            .iter()
            .fold(self.origin, |p, c| p + c.offset(t))
    }

    /// `samples` tip positions evenly spaced over `[0, t_end]`.
    pub fn trace(&self, t_end: f32, samples: usize) -> Vec<Vec2> {
        match samples {
            0 => Vec::new(),
            1 => vec![self.tip(0.0)],
            _ => {
                let dt = t_end / (samples - 1) as f32;
                (0..samples).map(|i| self.tip(i as f32 * dt)).collect()
            }
        }
    }
}
