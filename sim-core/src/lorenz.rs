//! Explicit Euler integration of the Lorenz system.

use glam::{DVec3, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LorenzParams {
    pub sigma: f64,
    pub rho: f64,
    pub beta: f64,
    pub dt: f64,
}

impl Default for LorenzParams {
    fn default() -> Self {
        Self {
            sigma: 10.0,
            rho: 28.0,
            beta: 8.0 / 3.0,
            dt: 0.008,
        }
    }
}

impl LorenzParams {
    /// Time derivative at `p`.
    pub fn derivative(&self, p: DVec3) -> DVec3 {
        DVec3::new(
            self.sigma * (p.y - p.x),
            p.x * (self.rho - p.z) - p.y,
            p.x * p.y - self.beta * p.z,
        )
    }
}

/// One Euler step; all three derivatives are taken from the old state.
pub fn step(p: DVec3, params: &LorenzParams) -> DVec3 {
    p + params.derivative(p) * params.dt
}

/// The `steps` points visited after `start` (the start itself excluded).
pub fn trajectory(start: DVec3, steps: usize, params: &LorenzParams) -> Vec<DVec3> {
    let mut out = Vec::with_capacity(steps);
    let mut p = start;
    for _ in 0..steps {
        p = step(p, params);
        out.push(p);
    }
    out
}

/// Projects onto the x/z plane: `(x * scale, z * scale + y_offset)`.
pub fn project_xz(p: DVec3, scale: f64, y_offset: f64) -> Vec2 {
    Vec2::new((p.x * scale) as f32, (p.z * scale + y_offset) as f32)
}
