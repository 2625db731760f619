//! Core library for small, steppable numeric scenes.
//!
//! Main components:
//! - [`mandelbrot`], [`pendulum`], [`lorenz`], [`life`], [`sort`],
//!   [`epicycle`], [`tree`] - the simulators themselves.
//! - [`gradient`], [`field`], [`lissajous`], [`attention`] - smaller
//!   explanatory scenes.
//! - [`scene`] - the [`scene::Scene`] trait and drawable primitives.
//! - [`scenes`] - one `Scene` per simulator.
//! - [`config`] - serde-backed configuration for every scene.
//! - [`error`] - error type for fallible constructors.
//! - [`types`] - shared type aliases.

pub mod attention;
pub mod config;
pub mod epicycle;
pub mod error;
pub mod field;
pub mod gradient;
pub mod life;
pub mod lissajous;
pub mod lorenz;
pub mod mandelbrot;
pub mod pendulum;
pub mod scene;
pub mod scenes;
pub mod sort;
pub mod tree;
pub mod types;

pub use error::{Error, Result};
pub use scene::{Primitive, Scene, SceneKind};
