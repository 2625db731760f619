//! Steppable scenes and the primitives they hand to a renderer.
//!
//! A scene owns its simulation state by value and advances it by one
//! discrete tick per [`Scene::tick`]. After each tick the consumer asks
//! for [`Scene::primitives`] and draws them however it likes; nothing
//! flows back into the scene.

use crate::{config::SceneConfig, error::Result, scenes, types::Shade};
use glam::Vec2;

/// Geometry a scene asks to have drawn, in scene units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    Dot {
        pos: Vec2,
        radius: f32,
        shade: Shade,
    },
    Segment { a: Vec2, b: Vec2, shade: Shade },
    Ring {
        center: Vec2,
        radius: f32,
        shade: Shade,
    },
    /// Axis-aligned square centred on `center`.
    Cell {
        center: Vec2,
        size: f32,
        shade: Shade,
    },
    /// Rectangle standing on `base` (bottom centre).
    Bar {
        base: Vec2,
        width: f32,
        height: f32,
        shade: Shade,
    },
}

pub trait Scene {
    fn name(&self) -> &'static str;

    /// Advances the simulation by one discrete step. Ticking a finished
    /// scene is a no-op.
    fn tick(&mut self);

    /// Number of ticks applied so far.
    fn ticks(&self) -> u64;

    fn finished(&self) -> bool;

    fn primitives(&self) -> Vec<Primitive>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneKind {
    Mandelbrot,
    Pendulum,
    Lorenz,
    Life,
    Sort,
    Epicycle,
    FractalTree,
    GradientDescent,
    VectorField,
    Lissajous,
    Attention,
    Temperature,
}

impl SceneKind {
    pub const ALL: [SceneKind; 12] = [
        SceneKind::Mandelbrot,
        SceneKind::Pendulum,
        SceneKind::Lorenz,
        SceneKind::Life,
        SceneKind::Sort,
        SceneKind::Epicycle,
        SceneKind::FractalTree,
        SceneKind::GradientDescent,
        SceneKind::VectorField,
        SceneKind::Lissajous,
        SceneKind::Attention,
        SceneKind::Temperature,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SceneKind::Mandelbrot => "Mandelbrot set",
            SceneKind::Pendulum => "Pendulum chaos",
            SceneKind::Lorenz => "Lorenz attractor",
            SceneKind::Life => "Game of Life",
            SceneKind::Sort => "Bubble sort",
            SceneKind::Epicycle => "Fourier epicycles",
            SceneKind::FractalTree => "Fractal tree",
            SceneKind::GradientDescent => "Gradient descent",
            SceneKind::VectorField => "Vortex field",
            SceneKind::Lissajous => "Lissajous curves",
            SceneKind::Attention => "Attention weights",
            SceneKind::Temperature => "Sampling temperature",
        }
    }

    /// Validates `cfg` and builds a fresh scene. `seed` drives every
    /// random choice, so equal seeds give identical runs.
    pub fn build(self, cfg: &SceneConfig, seed: u64) -> Result<Box<dyn Scene>> {
        cfg.validate()?;
        log::debug!("building {:?} scene (seed {seed})", self);
        let scene: Box<dyn Scene> = match self {
            SceneKind::Mandelbrot => Box::new(scenes::MandelbrotScene::new(&cfg.mandelbrot)),
            SceneKind::Pendulum => Box::new(scenes::PendulumScene::new(&cfg.pendulum)),
            SceneKind::Lorenz => Box::new(scenes::LorenzScene::new(&cfg.lorenz)),
            SceneKind::Life => Box::new(scenes::LifeScene::new(&cfg.life, seed)?),
            SceneKind::Sort => Box::new(scenes::SortScene::new(&cfg.sort, seed)),
            SceneKind::Epicycle => Box::new(scenes::EpicycleScene::new(&cfg.epicycle)),
            SceneKind::FractalTree => Box::new(scenes::TreeScene::new(&cfg.tree)),
            SceneKind::GradientDescent => Box::new(scenes::GradientScene::new(&cfg.gradient)),
            SceneKind::VectorField => Box::new(scenes::FieldScene::new(&cfg.field)),
            SceneKind::Lissajous => Box::new(scenes::LissajousScene::new(&cfg.lissajous)),
            SceneKind::Attention => Box::new(scenes::AttentionScene::new(&cfg.attention)?),
            SceneKind::Temperature => Box::new(scenes::TemperatureScene::new(&cfg.temperature)),
        };
        Ok(scene)
    }
}

/// Segments joining consecutive points.
pub fn polyline(points: &[Vec2], shade: Shade) -> impl Iterator<Item = Primitive> + '_ {
    points
        .windows(2)
        .map(move |w| Primitive::Segment {
            a: w[0],
            b: w[1],
            shade,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn polyline_joins_neighbours() {
        let pts = [Vec2::ZERO, Vec2::X, Vec2::ONE];
        let segs: Vec<Primitive> = polyline(&pts, 0.5).collect();
        assert_eq!(segs.len(), 2);
        assert_eq!(
            segs[1],
            Primitive::Segment {
                a: Vec2::X,
                b: Vec2::ONE,
                shade: 0.5
            }
        );
        assert_eq!(polyline(&pts[..1], 0.0).count(), 0);
    }

    #[test_log::test]
    fn every_scene_builds_ticks_and_draws() {
        let cfg = SceneConfig::default();
        for kind in SceneKind::ALL {
            let mut scene = kind.build(&cfg, 7).unwrap();
            assert_eq!(scene.ticks(), 0);
            scene.tick();
            assert_eq!(scene.ticks(), 1, "{}", scene.name());
            let name = scene.name();
            assert!(!scene.primitives().is_empty(), "{name} drew nothing");
        }
    }

    #[test_log::test]
    fn every_scene_finishes_and_then_stops_ticking() {
        let cfg = SceneConfig::default();
        for kind in SceneKind::ALL {
            let mut scene = kind.build(&cfg, 7).unwrap();
            let mut guard = 0;
            while !scene.finished() {
                scene.tick();
                guard += 1;
                assert!(guard < 10_000, "{} never finishes", scene.name());
            }
            let ticks = scene.ticks();
            scene.tick();
            assert_eq!(scene.ticks(), ticks);
        }
    }

    #[test]
    fn invalid_life_config_fails_to_build() {
        let mut cfg = SceneConfig::default();
        cfg.life.rows = 0;
        assert!(SceneKind::Life.build(&cfg, 0).is_err());
    }

    fn build_err(kind: SceneKind, cfg: &SceneConfig) -> Error {
        match kind.build(cfg, 0) {
            Ok(scene) => panic!("{} built from an invalid config", scene.name()),
            Err(e) => e,
        }
    }

    #[test]
    fn empty_sort_range_fails_to_build() {
        let mut cfg = SceneConfig::default();
        cfg.sort.high = cfg.sort.low;
        assert!(matches!(
            build_err(SceneKind::Sort, &cfg),
            Error::InvalidConfig {
                field: "sort.high",
                ..
            }
        ));
    }

    #[test]
    fn zero_epicycle_ticks_fail_to_build() {
        let mut cfg = SceneConfig::default();
        cfg.epicycle.ticks = 0;
        assert!(matches!(
            build_err(SceneKind::Epicycle, &cfg),
            Error::InvalidConfig {
                field: "epicycle.ticks",
                ..
            }
        ));
    }

    #[test]
    fn zero_mandelbrot_columns_fail_to_build() {
        let mut cfg = SceneConfig::default();
        cfg.mandelbrot.columns_per_tick = 0;
        assert!(matches!(
            build_err(SceneKind::Mandelbrot, &cfg),
            Error::InvalidConfig {
                field: "mandelbrot.columns_per_tick",
                ..
            }
        ));
    }
}
