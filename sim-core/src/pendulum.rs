//! Pendulum pair integrator.
//!
//! Two arms hang from a common pivot: the inner arm from the pivot, the
//! outer arm from the inner bob. With [`Coupling::Independent`] each arm
//! swings as its own simple pendulum, which is what the chaos scenes
//! draw. [`Coupling::Coupled`] integrates the equal-mass double pendulum
//! instead.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Angles (radians, measured from straight down) and angular velocities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PendulumState {
    pub theta1: f64,
    pub omega1: f64,
    pub theta2: f64,
    pub omega2: f64,
}

impl PendulumState {
    /// Both arms released at rest.
    pub fn at_rest(theta1: f64, theta2: f64) -> Self {
        Self {
            theta1,
            omega1: 0.0,
            theta2,
            omega2: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Coupling {
    /// Each arm feels only its own gravity torque.
    #[default]
    Independent,
    /// Full equal-mass double pendulum equations of motion.
    Coupled,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendulumParams {
    pub g: f64,
    pub l1: f64,
    pub l2: f64,
    /// Extra factor on the outer arm's torque (independent mode only).
    pub outer_gain: f64,
    pub dt: f64,
    pub coupling: Coupling,
}

impl Default for PendulumParams {
    fn default() -> Self {
        Self {
            g: 9.8,
            l1: 2.0,
            l2: 1.6,
            outer_gain: 1.3,
            dt: 0.025,
            coupling: Coupling::Independent,
        }
    }
}

/// Advances the pendulum pair by one step of `params.dt`.
///
/// Angles advance first using the current velocities; the velocities
/// are then updated from the accelerations at the new angles.
pub fn step(state: PendulumState, params: &PendulumParams) -> PendulumState {
    let dt = params.dt;
    let theta1 = state.theta1 + state.omega1 * dt;
    let theta2 = state.theta2 + state.omega2 * dt;

    let moved = PendulumState {
        theta1,
        theta2,
        ..state
    };
    let (alpha1, alpha2) = match params.coupling {
        Coupling::Independent => independent_accel(&moved, params),
        Coupling::Coupled => coupled_accel(&moved, params),
    };

    PendulumState {
        theta1,
        omega1: state.omega1 + alpha1 * dt,
        theta2,
        omega2: state.omega2 + alpha2 * dt,
    }
}

fn independent_accel(s: &PendulumState, p: &PendulumParams) -> (f64, f64) {
    let a1 = -p.g / p.l1 * s.theta1.sin();
    let a2 = -p.g / p.l2 * s.theta2.sin() * p.outer_gain;
    (a1, a2)
}

// Unit masses.
fn coupled_accel(s: &PendulumState, p: &PendulumParams) -> (f64, f64) {
    let (m1, m2) = (1.0, 1.0);
    let g = p.g;
    let delta = s.theta1 - s.theta2;
    let den = 2.0 * m1 + m2 - m2 * (2.0 * delta).cos();

    let a1 = (-g * (2.0 * m1 + m2) * s.theta1.sin()
        - m2 * g * (s.theta1 - 2.0 * s.theta2).sin()
        - 2.0
            * delta.sin()
            * m2
            * (s.omega2 * s.omega2 * p.l2 + s.omega1 * s.omega1 * p.l1 * delta.cos()))
        / (p.l1 * den);

    let a2 = (2.0
        * delta.sin()
        * (s.omega1 * s.omega1 * p.l1 * (m1 + m2)
            + g * (m1 + m2) * s.theta1.cos()
            + s.omega2 * s.omega2 * p.l2 * m2 * delta.cos()))
        / (p.l2 * den);

    (a1, a2)
}

/// Screen positions of the inner and outer bob.
pub fn bob_positions(
    state: &PendulumState,
    params: &PendulumParams,
    origin: Vec2,
) -> (Vec2, Vec2) {
    let (l1, l2) = (params.l1 as f32, params.l2 as f32);
    let (t1, t2) = (state.theta1 as f32, state.theta2 as f32);
    let p1 = origin + Vec2::new(l1 * t1.sin(), -l1 * t1.cos());
    let p2 = p1 + Vec2::new(l2 * t2.sin(), -l2 * t2.cos());
    (p1, p2)
}

/// Several pendulum pairs released from slightly different inner angles.
#[derive(Clone, Debug)]
pub struct Ensemble {
    pub states: Vec<PendulumState>,
    pub params: PendulumParams,
}

impl Ensemble {
    /// `count` pendulums with `theta1 = base + k * spread` and a shared
    /// `theta2`, all at rest.
    pub fn spread(
        count: usize,
        base: f64,
        spread: f64,
        theta2: f64,
        params: PendulumParams,
    ) -> Self {
        let states = (0..count)
            .map(|k| PendulumState::at_rest(base + k as f64 * spread, theta2))
            .collect();
        Self { states, params }
    }

    pub fn step(&mut self) {
        for s in &mut self.states {
            *s = step(*s, &self.params);
        }
    }
}
