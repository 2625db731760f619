//! One-dimensional gradient descent on a quadratic loss.

use serde::{Deserialize, Serialize};

/// `loss(x) = a * x^2 + b`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quadratic {
    pub a: f64,
    pub b: f64,
}

impl Default for Quadratic {
    fn default() -> Self {
        Self { a: 0.3, b: 0.5 }
    }
}

impl Quadratic {
    pub fn loss(&self, x: f64) -> f64 {
        self.a * x * x + self.b
    }

    pub fn gradient(&self, x: f64) -> f64 {
        2.0 * self.a * x
    }
}

/// Gradients smaller than this shrink the learning rate.
const SLOWDOWN_GRADIENT: f64 = 0.1;
const SLOWDOWN_FACTOR: f64 = 0.8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Descent {
    pub loss: Quadratic,
    pub x: f64,
    pub learning_rate: f64,
}

/// Record of one update, for drawing the gradient arrow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DescentStep {
    pub from: f64,
    pub to: f64,
    pub gradient: f64,
}

impl Descent {
    pub fn new(loss: Quadratic, x: f64, learning_rate: f64) -> Self {
        Self {
            loss,
            x,
            learning_rate,
        }
    }

    /// `x <- x - lr * grad(x)`; the rate decays once the gradient is small.
    pub fn step(&mut self) -> DescentStep {
        let from = self.x;
        let gradient = self.loss.gradient(from);
        self.x = from - self.learning_rate * gradient;
        if gradient.abs() < SLOWDOWN_GRADIENT {
            self.learning_rate *= SLOWDOWN_FACTOR;
        }
        DescentStep {
            from,
            to: self.x,
            gradient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_matches_hand_computation() {
        let mut d = Descent::new(Quadratic::default(), 3.5, 0.4);
        let s = d.step();
        // grad = 0.6 * 3.5 = 2.1, x = 3.5 - 0.84
        assert!((s.gradient - 2.1).abs() < 1e-12);
        assert!((d.x - 2.66).abs() < 1e-12);
        assert_eq!(d.learning_rate, 0.4);
    }

    #[test]
    fn loss_decreases_monotonically_to_the_minimum() {
        let q = Quadratic::default();
        let mut d = Descent::new(q, 3.5, 0.4);
        let mut last = q.loss(d.x);
        for _ in 0..15 {
            d.step();
            let now = q.loss(d.x);
            assert!(now <= last);
            last = now;
        }
        assert!(d.x.abs() < 0.1);
        assert!(last - q.b < 0.01);
    }

    #[test]
    fn learning_rate_decays_near_the_minimum() {
        let mut d = Descent::new(Quadratic::default(), 0.1, 0.4);
        d.step();
        assert!((d.learning_rate - 0.32).abs() < 1e-12);
    }
}
