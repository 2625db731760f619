//! Scene configuration.
//!
//! Every scene has its own section with defaults that reproduce the
//! classic look of that scene. A [`SceneConfig`] can be deserialized
//! from JSON; missing sections and fields fall back to their defaults.

use crate::{
    attention::AttentionMatrix,
    epicycle::EpicycleChain,
    error::{Error, Result},
    field::Vortex,
    gradient::Quadratic,
    lorenz::LorenzParams,
    mandelbrot::{PlaneWindow, ScreenMap},
    pendulum::PendulumParams,
    tree::BranchConfig,
};
use glam::{DVec3, Vec2};
use serde::{Deserialize, Serialize};
use std::{
    f64::consts::FRAC_PI_2,
    f32::consts::TAU,
    path::Path,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub mandelbrot: MandelbrotConfig,
    pub pendulum: PendulumConfig,
    pub lorenz: LorenzConfig,
    pub life: LifeConfig,
    pub sort: SortConfig,
    pub epicycle: EpicycleConfig,
    pub tree: BranchConfig,
    pub gradient: GradientConfig,
    pub field: FieldConfig,
    pub lissajous: LissajousConfig,
    pub attention: AttentionConfig,
    pub temperature: TemperatureConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MandelbrotConfig {
    pub window: PlaneWindow,
    pub max_iter: u32,
    pub screen: ScreenMap,
    pub dot_radius: f32,
    /// Grid columns revealed per tick.
    pub columns_per_tick: u32,
}

impl Default for MandelbrotConfig {
    fn default() -> Self {
        Self {
            window: PlaneWindow::default(),
            max_iter: 50,
            screen: ScreenMap::default(),
            dot_radius: 0.055,
            columns_per_tick: 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PendulumConfig {
    pub params: PendulumParams,
    pub count: usize,
    pub base_theta1: f64,
    /// Difference in the inner release angle between neighbours.
    pub spread: f64,
    pub theta2: f64,
    pub origin: Vec2,
    pub frames: u64,
    pub trail_len: usize,
}

impl Default for PendulumConfig {
    fn default() -> Self {
        Self {
            params: PendulumParams::default(),
            count: 3,
            base_theta1: FRAC_PI_2,
            spread: 0.05,
            theta2: FRAC_PI_2,
            origin: Vec2::new(0.0, 2.8),
            frames: 200,
            trail_len: 200,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LorenzConfig {
    pub params: LorenzParams,
    /// One path per starting point.
    pub starts: Vec<DVec3>,
    pub steps: usize,
    pub steps_per_tick: usize,
    pub scale: f64,
    pub y_offset: f64,
}

impl Default for LorenzConfig {
    fn default() -> Self {
        Self {
            params: LorenzParams::default(),
            starts: [1.0, -1.0, 2.0, -2.0, 0.5]
                .into_iter()
                .map(|x| DVec3::new(x, 1.0, 1.0))
                .collect(),
            steps: 3000,
            steps_per_tick: 25,
            scale: 0.08,
            y_offset: -2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeConfig {
    pub rows: usize,
    pub cols: usize,
    pub density: f64,
    pub cell_size: f32,
    pub generations: u64,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            rows: 30,
            cols: 30,
            density: 0.3,
            cell_size: 0.2,
            generations: 30,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortConfig {
    pub count: usize,
    /// Values are drawn from `low..high`.
    pub low: u32,
    pub high: u32,
    pub bar_width: f32,
    pub spacing: f32,
    pub max_height: f32,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            count: 15,
            low: 1,
            high: 20,
            bar_width: 0.4,
            spacing: 0.5,
            max_height: 3.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpicyclePreset {
    #[default]
    FourierSeries,
    OddHarmonics,
}

impl EpicyclePreset {
    pub fn chain(self) -> EpicycleChain {
        match self {
            EpicyclePreset::FourierSeries => EpicycleChain::fourier_series(),
            EpicyclePreset::OddHarmonics => EpicycleChain::odd_harmonics(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpicycleConfig {
    pub preset: EpicyclePreset,
    pub t_end: f32,
    pub ticks: u64,
}

impl Default for EpicycleConfig {
    fn default() -> Self {
        Self {
            preset: EpicyclePreset::default(),
            t_end: TAU * 2.0,
            ticks: 360,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientConfig {
    pub loss: Quadratic,
    pub start: f64,
    pub learning_rate: f64,
    pub steps: u64,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            loss: Quadratic::default(),
            start: 3.5,
            learning_rate: 0.4,
            steps: 15,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub vortex: Vortex,
    pub x_range: [f32; 2],
    pub y_range: [f32; 2],
    pub spacing: f32,
    pub particles: usize,
    pub ring_radius: f32,
    pub dt: f32,
    pub speed: f32,
    pub ticks: u64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            vortex: Vortex::default(),
            x_range: [-4.5, 4.5],
            y_range: [-3.5, 3.5],
            spacing: 0.6,
            particles: 12,
            ring_radius: 2.5,
            dt: 1.0 / 60.0,
            speed: 10.0,
            ticks: 180,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LissajousConfig {
    /// `(a, b)` frequency pairs, drawn one after another.
    pub ratios: Vec<[f32; 2]>,
    pub samples: usize,
    /// Screen units per curve unit.
    pub scale: f32,
    pub samples_per_tick: usize,
}

impl Default for LissajousConfig {
    fn default() -> Self {
        Self {
            ratios: vec![[3.0, 2.0], [5.0, 4.0], [4.0, 3.0]],
            samples: 240,
            scale: 8.0 / 3.0,
            samples_per_tick: 4,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttentionConfig {
    /// Row-stochastic weights. Takes precedence over `scores`.
    pub weights: Option<Vec<Vec<f64>>>,
    /// Raw query/key scores, turned into weights by a row-wise softmax.
    pub scores: Option<Vec<Vec<f64>>>,
    pub temperature: f64,
    /// Token whose outgoing connections are drawn.
    pub focus: usize,
    pub threshold: f64,
}

impl Default for AttentionConfig {
    fn default() -> Self {
        Self {
            weights: None,
            scores: None,
            temperature: 1.0,
            focus: 1,
            threshold: 0.05,
        }
    }
}

impl AttentionConfig {
    /// `weights`, else softmaxed `scores`, else [`AttentionMatrix::example`].
    pub fn matrix(&self) -> Result<AttentionMatrix> {
        match (&self.weights, &self.scores) {
            (Some(rows), _) => AttentionMatrix::new(rows),
            (None, Some(scores)) => AttentionMatrix::from_scores(scores, self.temperature),
            (None, None) => Ok(AttentionMatrix::example()),
        }
    }
}

/// Next-token distributions under a sequence of sampling temperatures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemperatureConfig {
    /// Raw scores (logits) for each candidate token.
    pub scores: Vec<f64>,
    pub temperatures: Vec<f64>,
    /// Ticks each temperature stays on screen.
    pub hold_ticks: u64,
    pub bar_width: f32,
    pub bar_spacing: f32,
    /// Height of a bar with probability 1.
    pub max_height: f32,
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self {
            scores: vec![2.0, 1.2, 0.8, 0.5, 0.1],
            temperatures: vec![0.1, 0.7, 1.5],
            hold_ticks: 60,
            bar_width: 0.6,
            bar_spacing: 1.6,
            max_height: 3.5,
        }
    }
}

const MAX_TREE_DEPTH: u32 = 12;
/// Bound on [`BranchConfig::max_branches`].
const MAX_TREE_BRANCHES: u64 = 1_000_000;

fn positive(field: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid(field, format!("{value} must be positive")))
    }
}

fn nonzero(field: &'static str, value: u64) -> Result<()> {
    if value == 0 {
        Err(Error::invalid(field, "must be at least 1"))
    } else {
        Ok(())
    }
}

impl SceneConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: SceneConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let cfg = Self::from_json_str(&text)?;
        log::info!("loaded scene config from {}", path.as_ref().display());
        Ok(cfg)
    }

    /// Rejects values the scenes cannot run with.
    pub fn validate(&self) -> Result<()> {
        let m = &self.mandelbrot;
        // With a single update a point outside radius 2 is never seen to escape.
        if m.max_iter < 2 {
            return Err(Error::invalid("mandelbrot.max_iter", "must be at least 2"));
        }
        nonzero("mandelbrot.window.resolution", m.window.resolution.into())?;
        nonzero("mandelbrot.columns_per_tick", m.columns_per_tick.into())?;
        let [x0, x1] = m.window.x_range;
        let [y0, y1] = m.window.y_range;
        if x0 >= x1 || y0 >= y1 {
            return Err(Error::invalid(
                "mandelbrot.window",
                "ranges must be increasing",
            ));
        }

        let p = &self.pendulum;
        positive("pendulum.params.dt", p.params.dt)?;
        positive("pendulum.params.l1", p.params.l1)?;
        positive("pendulum.params.l2", p.params.l2)?;
        nonzero("pendulum.count", p.count as u64)?;

        let l = &self.lorenz;
        positive("lorenz.params.dt", l.params.dt)?;
        nonzero("lorenz.steps_per_tick", l.steps_per_tick as u64)?;

        let life = &self.life;
        nonzero("life.rows", life.rows as u64)?;
        nonzero("life.cols", life.cols as u64)?;
        if !(0.0..=1.0).contains(&life.density) {
            return Err(Error::invalid(
                "life.density",
                format!("{} is outside [0, 1]", life.density),
            ));
        }

        let s = &self.sort;
        if s.low >= s.high {
            return Err(Error::invalid("sort.high", "must be greater than sort.low"));
        }

        nonzero("epicycle.ticks", self.epicycle.ticks)?;

        positive("tree.min_length", self.tree.min_length.into())?;
        if self.tree.max_depth > MAX_TREE_DEPTH {
            return Err(Error::invalid(
                "tree.max_depth",
                format!("{} exceeds {MAX_TREE_DEPTH}", self.tree.max_depth),
            ));
        }
        let branches = self.tree.max_branches();
        if branches > MAX_TREE_BRANCHES {
            return Err(Error::invalid(
                "tree.rules",
                format!(
                    "{} rules to depth {} allow {branches} branches, more than {MAX_TREE_BRANCHES}",
                    self.tree.rules.len(),
                    self.tree.max_depth
                ),
            ));
        }

        positive("gradient.learning_rate", self.gradient.learning_rate)?;

        positive("field.spacing", self.field.spacing.into())?;
        positive("field.dt", self.field.dt.into())?;

        nonzero(
            "lissajous.samples_per_tick",
            self.lissajous.samples_per_tick as u64,
        )?;

        let matrix = self.attention.matrix()?;
        if self.attention.focus >= matrix.len() {
            return Err(Error::invalid(
                "attention.focus",
                format!(
                    "token {} does not exist in a {}-token matrix",
                    self.attention.focus,
                    matrix.len()
                ),
            ));
        }

        let t = &self.temperature;
        if t.scores.is_empty() {
            return Err(Error::invalid(
                "temperature.scores",
                "needs at least one token",
            ));
        }
        if t.temperatures.is_empty() {
            return Err(Error::invalid(
                "temperature.temperatures",
                "needs at least one value",
            ));
        }
        nonzero("temperature.hold_ticks", t.hold_ticks)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        SceneConfig::default().validate().unwrap();
    }

    #[test]
    fn empty_json_yields_defaults() {
        let cfg = SceneConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, SceneConfig::default());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let cfg = SceneConfig::from_json_str(
            r#"{ "lorenz": { "params": { "rho": 14.0 } }, "life": { "rows": 12 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.lorenz.params.rho, 14.0);
        assert_eq!(cfg.lorenz.params.sigma, 10.0);
        assert_eq!(cfg.life.rows, 12);
        assert_eq!(cfg.life.cols, 30);
    }

    #[test]
    fn rejects_zero_iteration_bound() {
        let json = r#"{ "mandelbrot": { "max_iter": 0 } }"#;
        let err = SceneConfig::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig {
                field: "mandelbrot.max_iter",
                ..
            }
        ));
    }

    #[test]
    fn rejects_single_iteration_bound() {
        let mut cfg = SceneConfig::default();
        cfg.mandelbrot.max_iter = 1;
        assert!(matches!(
            cfg.validate(),
            Err(Error::InvalidConfig {
                field: "mandelbrot.max_iter",
                ..
            })
        ));
        cfg.mandelbrot.max_iter = 2;
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn rejects_branch_explosion() {
        let mut cfg = SceneConfig::default();
        cfg.tree.max_depth = 12;
        cfg.tree.min_length = 1e-6;
        cfg.tree.rules = vec![cfg.tree.rules[0]; 6];
        assert!(matches!(
            cfg.validate(),
            Err(Error::InvalidConfig {
                field: "tree.rules",
                ..
            })
        ));

        cfg.tree = BranchConfig {
            max_depth: 12,
            ..BranchConfig::ternary()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn attention_scores_are_softmaxed() {
        let mut cfg = SceneConfig::default();
        cfg.attention.scores = Some(vec![vec![0.0, 0.0], vec![2.0, 0.0]]);
        cfg.attention.focus = 0;
        let m = cfg.attention.matrix().unwrap();
        assert_eq!(m.len(), 2);
        assert!((m.weight(0, 1) - 0.5).abs() < 1e-12);
        assert!(m.weight(1, 0) > m.weight(1, 1));
        assert!(cfg.validate().is_ok());

        cfg.attention.weights = Some(vec![vec![1.0]]);
        assert_eq!(cfg.attention.matrix().unwrap().len(), 1);
    }

    #[test]
    fn rejects_empty_temperature_scores() {
        let cfg = SceneConfig::from_json_str(r#"{ "temperature": { "scores": [] } }"#);
        assert!(matches!(
            cfg,
            Err(Error::InvalidConfig {
                field: "temperature.scores",
                ..
            })
        ));
    }

    #[test]
    fn rejects_negative_time_step() {
        let mut cfg = SceneConfig::default();
        cfg.pendulum.params.dt = -0.1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_focus_token() {
        let mut cfg = SceneConfig::default();
        cfg.attention.focus = 9;
        assert!(matches!(
            cfg.validate(),
            Err(Error::InvalidConfig {
                field: "attention.focus",
                ..
            })
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            SceneConfig::from_json_str("{ nope"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            SceneConfig::load("/nonexistent/scenesim.json"),
            Err(Error::Io(_))
        ));
    }
}
