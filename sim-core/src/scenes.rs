//! Concrete [`Scene`] implementations, one per simulator.
//!
//! Each scene keeps its own state and a tick counter. The layout
//! constants (bar origin, heatmap pitch, token row) place the geometry
//! in a roughly 14 x 8 unit frame centred on the origin.

use crate::{
    attention::{AttentionMatrix, softmax},
    config::{
        AttentionConfig, EpicycleConfig, FieldConfig, GradientConfig, LifeConfig, LissajousConfig,
        LorenzConfig, MandelbrotConfig, PendulumConfig, SortConfig, TemperatureConfig,
    },
    epicycle::EpicycleChain,
    error::{Error, Result},
    field::{Arrow, ring},
    gradient::{Descent, DescentStep},
    life::Grid,
    lissajous::lissajous,
    lorenz,
    mandelbrot::{Sample, sample_grid},
    pendulum::{Ensemble, bob_positions},
    scene::{Primitive, Scene, polyline},
    sort::{BubbleSort, SortEvent, random_values},
    tree::{BranchConfig, Segment, Tree},
    types::Shade,
};
use glam::{DVec3, Vec2};
use log::{debug, trace};
use rand::{SeedableRng, rngs::StdRng};
use std::collections::VecDeque;

/// `k / (n - 1)`, or 0 for a single item.
fn spread_shade(k: usize, n: usize) -> Shade {
    if n > 1 {
        k as f32 / (n - 1) as f32
    } else {
        0.0
    }
}

pub struct MandelbrotScene {
    cfg: MandelbrotConfig,
    samples: Vec<Sample>,
    columns: u32,
    ticks: u64,
}

impl MandelbrotScene {
    pub fn new(cfg: &MandelbrotConfig) -> Self {
        let samples = sample_grid(&cfg.window, cfg.max_iter);
        debug!(
            "mandelbrot: {} of {} samples bounded",
            samples.iter().filter(|s| s.escape.is_bounded()).count(),
            samples.len()
        );
        Self {
            cfg: *cfg,
            samples,
            columns: 0,
            ticks: 0,
        }
    }
}

impl Scene for MandelbrotScene {
    fn name(&self) -> &'static str {
        "mandelbrot"
    }

    fn tick(&mut self) {
        if self.finished() {
            return;
        }
        self.columns = (self.columns + self.cfg.columns_per_tick).min(self.cfg.window.resolution);
        self.ticks += 1;
    }

    fn ticks(&self) -> u64 {
        self.ticks
    }

    fn finished(&self) -> bool {
        self.columns >= self.cfg.window.resolution
    }

    /// Escaped points only; the set itself stays empty, as in the
    /// classic dot rendering.
    fn primitives(&self) -> Vec<Primitive> {
        let shown = self.columns as usize * self.cfg.window.resolution as usize;
        self.samples[..shown]
            .iter()
            .filter_map(|s| {
                s.escape.shade(self.cfg.max_iter).map(|shade| Primitive::Dot {
                    pos: self.cfg.screen.apply(s.c),
                    radius: self.cfg.dot_radius,
                    shade,
                })
            })
            .collect()
    }
}

pub struct PendulumScene {
    cfg: PendulumConfig,
    ensemble: Ensemble,
    trails: Vec<VecDeque<Vec2>>,
    ticks: u64,
}

impl PendulumScene {
    pub fn new(cfg: &PendulumConfig) -> Self {
        let ensemble = Ensemble::spread(
            cfg.count,
            cfg.base_theta1,
            cfg.spread,
            cfg.theta2,
            cfg.params,
        );
        let trails: Vec<VecDeque<Vec2>> = ensemble
            .states
            .iter()
            .map(|s| bob_positions(s, &cfg.params, cfg.origin).1)
            .map(|tip| VecDeque::from([tip]))
            .collect();
        Self {
            cfg: *cfg,
            ensemble,
            trails,
            ticks: 0,
        }
    }
}

impl Scene for PendulumScene {
    fn name(&self) -> &'static str {
        "pendulum"
    }

    fn tick(&mut self) {
        if self.finished() {
            return;
        }
        self.ensemble.step();
        for (s, trail) in self.ensemble.states.iter().zip(&mut self.trails) {
            trail.push_back(bob_positions(s, &self.cfg.params, self.cfg.origin).1);
            while trail.len() > self.cfg.trail_len {
                trail.pop_front();
            }
        }
        self.ticks += 1;
    }

    fn ticks(&self) -> u64 {
        self.ticks
    }

    fn finished(&self) -> bool {
        self.ticks >= self.cfg.frames
    }

    fn primitives(&self) -> Vec<Primitive> {
        let origin = self.cfg.origin;
        let n = self.ensemble.states.len();
        let mut out = Vec::new();
        for (k, (s, trail)) in self.ensemble.states.iter().zip(&self.trails).enumerate() {
            let shade = spread_shade(k, n);
            for (a, b) in trail.iter().zip(trail.iter().skip(1)) {
                out.push(Primitive::Segment {
                    a: *a,
                    b: *b,
                    shade,
                });
            }
            let (p1, p2) = bob_positions(s, &self.cfg.params, origin);
            out.push(Primitive::Segment {
                a: origin,
                b: p1,
                shade: 0.0,
            });
            out.push(Primitive::Segment {
                a: p1,
                b: p2,
                shade: 0.0,
            });
            out.push(Primitive::Dot {
                pos: p2,
                radius: 0.1,
                shade,
            });
        }
        out.push(Primitive::Dot {
            pos: origin,
            radius: 0.1,
            shade: 0.0,
        });
        out
    }
}

pub struct LorenzScene {
    cfg: LorenzConfig,
    heads: Vec<DVec3>,
    paths: Vec<Vec<Vec2>>,
    steps_done: usize,
    ticks: u64,
}

impl LorenzScene {
    pub fn new(cfg: &LorenzConfig) -> Self {
        Self {
            heads: cfg.starts.clone(),
            paths: cfg
                .starts
                .iter()
                .map(|_| Vec::with_capacity(cfg.steps))
                .collect(),
            cfg: cfg.clone(),
            steps_done: 0,
            ticks: 0,
        }
    }
}

impl Scene for LorenzScene {
    fn name(&self) -> &'static str {
        "lorenz"
    }

    fn tick(&mut self) {
        if self.finished() {
            return;
        }
        let left = self.cfg.steps - self.steps_done;
        let n = self.cfg.steps_per_tick.min(left);
        for (head, path) in self.heads.iter_mut().zip(&mut self.paths) {
            for _ in 0..n {
                *head = lorenz::step(*head, &self.cfg.params);
                let p = lorenz::project_xz(*head, self.cfg.scale, self.cfg.y_offset);
                path.push(p);
            }
        }
        self.steps_done += n;
        self.ticks += 1;
        trace!("lorenz: {} / {} steps", self.steps_done, self.cfg.steps);
    }

    fn ticks(&self) -> u64 {
        self.ticks
    }

    fn finished(&self) -> bool {
        self.steps_done >= self.cfg.steps
    }

    fn primitives(&self) -> Vec<Primitive> {
        let n = self.paths.len();
        self.paths
            .iter()
            .enumerate()
            .flat_map(|(k, path)| polyline(path, spread_shade(k, n)))
            .collect()
    }
}

pub struct LifeScene {
    cfg: LifeConfig,
    grid: Grid,
    generation: u64,
}

impl LifeScene {
    pub fn new(cfg: &LifeConfig, seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = Grid::random(cfg.rows, cfg.cols, cfg.density, &mut rng)?;
        debug!("life: initial population {}", grid.population());
        Ok(Self {
            cfg: *cfg,
            grid,
            generation: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    fn cell_center(&self, row: usize, col: usize) -> Vec2 {
        let size = self.cfg.cell_size;
        Vec2::new(
            (col as f32 - self.grid.cols() as f32 / 2.0) * size,
            (row as f32 - self.grid.rows() as f32 / 2.0) * size,
        )
    }
}

impl Scene for LifeScene {
    fn name(&self) -> &'static str {
        "life"
    }

    fn tick(&mut self) {
        if self.finished() {
            return;
        }
        let next = self.grid.step();
        trace!(
            "life: generation {} changed {} cells, population {}",
            self.generation + 1,
            self.grid.changes(&next).len(),
            next.population()
        );
        self.grid = next;
        self.generation += 1;
    }

    fn ticks(&self) -> u64 {
        self.generation
    }

    fn finished(&self) -> bool {
        self.generation >= self.cfg.generations
    }

    fn primitives(&self) -> Vec<Primitive> {
        let mut out = Vec::with_capacity(self.grid.population());
        for r in 0..self.grid.rows() {
            for c in 0..self.grid.cols() {
                if self.grid.get(r, c) {
                    out.push(Primitive::Cell {
                        center: self.cell_center(r, c),
                        size: self.cfg.cell_size,
                        shade: 1.0,
                    });
                }
            }
        }
        out
    }
}

/// Left end and floor of the bar chart.
const BAR_ORIGIN: Vec2 = Vec2::new(-3.5, -1.5);

pub struct SortScene {
    cfg: SortConfig,
    sorter: BubbleSort<u32>,
    last: Vec<SortEvent>,
    ticks: u64,
}

impl SortScene {
    pub fn new(cfg: &SortConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let values = random_values(cfg.count, cfg.low, cfg.high, &mut rng);
        debug!("sort: input {values:?}");
        Self {
            cfg: *cfg,
            sorter: BubbleSort::new(values),
            last: Vec::new(),
            ticks: 0,
        }
    }

    pub fn values(&self) -> &[u32] {
        self.sorter.values()
    }

    fn compared(&self, i: usize) -> bool {
        self.last.iter().any(|e| match *e {
            SortEvent::Compare { left, right } => i == left || i == right,
            _ => false,
        })
    }
}

impl Scene for SortScene {
    fn name(&self) -> &'static str {
        "sort"
    }

    fn tick(&mut self) {
        if self.finished() {
            return;
        }
        self.last.clear();
        self.sorter.advance(&mut self.last);
        self.ticks += 1;
    }

    fn ticks(&self) -> u64 {
        self.ticks
    }

    fn finished(&self) -> bool {
        self.sorter.is_done()
    }

    /// Settled bars get shade 1, the compared pair 0.5, the rest 0.
    fn primitives(&self) -> Vec<Primitive> {
        let values = self.sorter.values();
        let settled_from = values.len() - self.sorter.passes();
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                let shade = if i >= settled_from {
                    1.0
                } else if self.compared(i) {
                    0.5
                } else {
                    0.0
                };
                Primitive::Bar {
                    base: BAR_ORIGIN + Vec2::X * (i as f32 * self.cfg.spacing),
                    width: self.cfg.bar_width,
                    height: v as f32 / self.cfg.high as f32 * self.cfg.max_height,
                    shade,
                }
            })
            .collect()
    }
}

pub struct EpicycleScene {
    chain: EpicycleChain,
    dt: f32,
    total: u64,
    path: Vec<Vec2>,
    ticks: u64,
}

impl EpicycleScene {
    pub fn new(cfg: &EpicycleConfig) -> Self {
        let chain = cfg.preset.chain();
        let path = vec![chain.tip(0.0)];
        Self {
            dt: cfg.t_end / cfg.ticks as f32,
            total: cfg.ticks,
            chain,
            path,
            ticks: 0,
        }
    }

    fn time(&self) -> f32 {
        self.ticks as f32 * self.dt
    }
}

impl Scene for EpicycleScene {
    fn name(&self) -> &'static str {
        "epicycle"
    }

    fn tick(&mut self) {
        if self.finished() {
            return;
        }
        self.ticks += 1;
        self.path.push(self.chain.tip(self.time()));
    }

    fn ticks(&self) -> u64 {
        self.ticks
    }

    fn finished(&self) -> bool {
        self.ticks >= self.total
    }

    fn primitives(&self) -> Vec<Primitive> {
        let joints = self.chain.joints(self.time());
        let n = self.chain.circles.len();
        let mut out: Vec<Primitive> = polyline(&self.path, 1.0).collect();
        for (k, c) in self.chain.circles.iter().enumerate() {
            let shade = spread_shade(k, n);
            out.push(Primitive::Ring {
                center: joints[k],
                radius: c.radius,
                shade,
            });
            out.push(Primitive::Segment {
                a: joints[k],
                b: joints[k + 1],
                shade: 0.0,
            });
            out.push(Primitive::Dot {
                pos: joints[k + 1],
                radius: 0.06,
                shade,
            });
        }
        out
    }
}

/// Ticks over which a grown tree is revealed.
const TREE_REVEAL_TICKS: usize = 120;

pub struct TreeScene {
    segments: Vec<Segment>,
    max_depth: u32,
    per_tick: usize,
    revealed: usize,
    ticks: u64,
}

impl TreeScene {
    pub fn new(cfg: &BranchConfig) -> Self {
        let tree = Tree::grow(cfg);
        let segments = tree.segments();
        debug!("tree: {} branches, depth {}", segments.len(), tree.depth());
        Self {
            per_tick: segments.len().div_ceil(TREE_REVEAL_TICKS).max(1),
            segments,
            max_depth: cfg.max_depth,
            revealed: 0,
            ticks: 0,
        }
    }
}

impl Scene for TreeScene {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn tick(&mut self) {
        if self.finished() {
            return;
        }
        self.revealed = (self.revealed + self.per_tick).min(self.segments.len());
        self.ticks += 1;
    }

    fn ticks(&self) -> u64 {
        self.ticks
    }

    fn finished(&self) -> bool {
        self.revealed >= self.segments.len()
    }

    /// Shade runs from 0 at the trunk to 1 at the deepest twigs.
    fn primitives(&self) -> Vec<Primitive> {
        self.segments[..self.revealed]
            .iter()
            .map(|s| Primitive::Segment {
                a: s.start,
                b: s.end,
                shade: spread_shade(s.depth as usize, self.max_depth as usize + 1),
            })
            .collect()
    }
}

/// Half-width of the plotted loss curve.
const LOSS_PLOT_HALF_WIDTH: f64 = 4.0;

pub struct GradientScene {
    cfg: GradientConfig,
    descent: Descent,
    curve: Vec<Vec2>,
    last: Option<DescentStep>,
    ticks: u64,
}

impl GradientScene {
    pub fn new(cfg: &GradientConfig) -> Self {
        let samples = 81;
        let curve: Vec<Vec2> = (0..samples)
            .map(|i| {
                let t = i as f64 / (samples - 1) as f64;
                let x = LOSS_PLOT_HALF_WIDTH * (2.0 * t - 1.0);
                Vec2::new(x as f32, cfg.loss.loss(x) as f32)
            })
            .collect();
        Self {
            cfg: *cfg,
            descent: Descent::new(cfg.loss, cfg.start, cfg.learning_rate),
            curve,
            last: None,
            ticks: 0,
        }
    }

    pub fn descent(&self) -> &Descent {
        &self.descent
    }

    fn on_curve(&self, x: f64) -> Vec2 {
        Vec2::new(x as f32, self.cfg.loss.loss(x) as f32)
    }
}

impl Scene for GradientScene {
    fn name(&self) -> &'static str {
        "gradient"
    }

    fn tick(&mut self) {
        if self.finished() {
            return;
        }
        let step = self.descent.step();
        trace!(
            "gradient: x {:.4} -> {:.4} (grad {:.4}, lr {:.3})",
            step.from,
            step.to,
            step.gradient,
            self.descent.learning_rate
        );
        self.last = Some(step);
        self.ticks += 1;
    }

    fn ticks(&self) -> u64 {
        self.ticks
    }

    fn finished(&self) -> bool {
        self.ticks >= self.cfg.steps
    }

    fn primitives(&self) -> Vec<Primitive> {
        let mut out: Vec<Primitive> = polyline(&self.curve, 0.0).collect();
        if let Some(step) = self.last {
            // Horizontal arrow at the old loss level, as drawn before the ball drops.
            let a = self.on_curve(step.from);
            out.push(Primitive::Segment {
                a,
                b: Vec2::new(step.to as f32, a.y),
                shade: 0.5,
            });
        }
        out.push(Primitive::Dot {
            pos: self.on_curve(self.descent.x),
            radius: 0.15,
            shade: 1.0,
        });
        out
    }
}

pub struct FieldScene {
    cfg: FieldConfig,
    arrows: Vec<Arrow>,
    particles: Vec<Vec2>,
    trails: Vec<Vec<Vec2>>,
    ticks: u64,
}

impl FieldScene {
    pub fn new(cfg: &FieldConfig) -> Self {
        let arrows = cfg.vortex.arrow_grid(cfg.x_range, cfg.y_range, cfg.spacing);
        let particles = ring(cfg.particles, cfg.ring_radius);
        let trails: Vec<Vec<Vec2>> = particles.iter().map(|&p| vec![p]).collect();
        Self {
            cfg: *cfg,
            arrows,
            particles,
            trails,
            ticks: 0,
        }
    }
}

impl Scene for FieldScene {
    fn name(&self) -> &'static str {
        "field"
    }

    fn tick(&mut self) {
        if self.finished() {
            return;
        }
        for (p, trail) in self.particles.iter_mut().zip(&mut self.trails) {
            *p = self.cfg.vortex.advect(*p, self.cfg.dt, self.cfg.speed);
            trail.push(*p);
        }
        self.ticks += 1;
    }

    fn ticks(&self) -> u64 {
        self.ticks
    }

    fn finished(&self) -> bool {
        self.ticks >= self.cfg.ticks
    }

    fn primitives(&self) -> Vec<Primitive> {
        let mut out: Vec<Primitive> = self
            .arrows
            .iter()
            .map(|a| Primitive::Segment {
                a: a.at,
                b: a.at + a.dir,
                shade: (a.dir.length() * 2.0).min(1.0),
            })
            .collect();
        for trail in &self.trails {
            out.extend(polyline(trail, 1.0));
        }
        out.extend(self.particles.iter().map(|&pos| Primitive::Dot {
            pos,
            radius: 0.08,
            shade: 1.0,
        }));
        out
    }
}

pub struct LissajousScene {
    curves: Vec<Vec<Vec2>>,
    per_tick: usize,
    current: usize,
    drawn: usize,
    ticks: u64,
}

impl LissajousScene {
    pub fn new(cfg: &LissajousConfig) -> Self {
        let curves: Vec<Vec<Vec2>> = cfg
            .ratios
            .iter()
            .map(|&[a, b]| {
                lissajous(a, b, cfg.samples)
                    .into_iter()
                    .map(|p| p * cfg.scale)
                    .collect()
            })
            .collect();
        Self {
            curves,
            per_tick: cfg.samples_per_tick,
            current: 0,
            drawn: 0,
            ticks: 0,
        }
    }
}

impl Scene for LissajousScene {
    fn name(&self) -> &'static str {
        "lissajous"
    }

    fn tick(&mut self) {
        if self.finished() {
            return;
        }
        let len = self.curves[self.current].len();
        self.drawn = (self.drawn + self.per_tick).min(len);
        if self.drawn == len {
            self.current += 1;
            self.drawn = 0;
        }
        self.ticks += 1;
    }

    fn ticks(&self) -> u64 {
        self.ticks
    }

    fn finished(&self) -> bool {
        self.current >= self.curves.len()
    }

    fn primitives(&self) -> Vec<Primitive> {
        let n = self.curves.len();
        let mut out = Vec::new();
        for (k, curve) in self.curves.iter().enumerate().take(self.current) {
            out.extend(polyline(curve, spread_shade(k, n)));
        }
        if let Some(curve) = self.curves.get(self.current) {
            let shade = spread_shade(self.current, n);
            let drawn = &curve[..self.drawn];
            out.extend(polyline(drawn, shade));
            if let Some(&pos) = drawn.last() {
                out.push(Primitive::Dot {
                    pos,
                    radius: 0.1,
                    shade,
                });
            }
        }
        out
    }
}

/// Spacing between heatmap cells and their size.
const HEATMAP_PITCH: f32 = 0.55;
const HEATMAP_CELL: f32 = 0.5;
const HEATMAP_TOP_Y: f32 = 0.5;
const TOKEN_ROW_Y: f32 = 2.5;
const TOKEN_PITCH: f32 = 1.2;

pub struct AttentionScene {
    matrix: AttentionMatrix,
    focus: usize,
    threshold: f64,
    rows: usize,
    ticks: u64,
}

impl AttentionScene {
    pub fn new(cfg: &AttentionConfig) -> Result<Self> {
        let matrix = cfg.matrix()?;
        if cfg.focus >= matrix.len() {
            return Err(Error::invalid(
                "attention.focus",
                format!("token {} does not exist", cfg.focus),
            ));
        }
        Ok(Self {
            matrix,
            focus: cfg.focus,
            threshold: cfg.threshold,
            rows: 0,
            ticks: 0,
        })
    }

    fn mid(&self) -> f32 {
        (self.matrix.len() as f32 - 1.0) / 2.0
    }

    fn token(&self, k: usize) -> Vec2 {
        Vec2::new((k as f32 - self.mid()) * TOKEN_PITCH, TOKEN_ROW_Y)
    }

    /// Centre of heatmap cell `(row, col)`; columns are centred on x = 0.
    fn heatmap_cell(&self, row: usize, col: usize) -> Vec2 {
        Vec2::new(
            (col as f32 - self.mid()) * HEATMAP_PITCH,
            HEATMAP_TOP_Y - row as f32 * HEATMAP_PITCH,
        )
    }
}

impl Scene for AttentionScene {
    fn name(&self) -> &'static str {
        "attention"
    }

    /// Reveals one heatmap row per tick, then the focus connections.
    fn tick(&mut self) {
        if self.finished() {
            return;
        }
        self.rows += 1;
        self.ticks += 1;
    }

    fn ticks(&self) -> u64 {
        self.ticks
    }

    fn finished(&self) -> bool {
        self.rows > self.matrix.len()
    }

    fn primitives(&self) -> Vec<Primitive> {
        let n = self.matrix.len();
        let mut out = Vec::new();
        for k in 0..n {
            out.push(Primitive::Dot {
                pos: self.token(k),
                radius: 0.12,
                shade: if k == self.focus { 1.0 } else { 0.0 },
            });
        }
        for i in 0..self.rows.min(n) {
            for j in 0..n {
                out.push(Primitive::Cell {
                    center: self.heatmap_cell(i, j),
                    size: HEATMAP_CELL,
                    shade: self.matrix.weight(i, j) as f32,
                });
            }
        }
        if self.rows > n {
            let from = self.token(self.focus) + Vec2::Y * 0.7;
            for c in self.matrix.connections(self.focus, self.threshold) {
                out.push(Primitive::Segment {
                    a: from,
                    b: self.token(c.target),
                    shade: (c.weight as f32 * 2.0).min(1.0),
                });
            }
        }
        out
    }
}

/// Floor of the temperature bar chart; bars are centred on x = 0.
const TEMPERATURE_FLOOR_Y: f32 = -2.5;

pub struct TemperatureScene {
    cfg: TemperatureConfig,
    /// One softmax distribution per configured temperature.
    distributions: Vec<Vec<f64>>,
    ticks: u64,
}

impl TemperatureScene {
    pub fn new(cfg: &TemperatureConfig) -> Self {
        let distributions: Vec<Vec<f64>> = cfg
            .temperatures
            .iter()
            .map(|&t| softmax(&cfg.scores, t))
            .collect();
        for (t, p) in cfg.temperatures.iter().zip(&distributions) {
            debug!("temperature {t}: {p:.3?}");
        }
        Self {
            cfg: cfg.clone(),
            distributions,
            ticks: 0,
        }
    }

    /// Index of the temperature on screen.
    pub fn current(&self) -> usize {
        let hold = self.cfg.hold_ticks.max(1);
        let last = self.distributions.len().saturating_sub(1);
        (self.ticks.saturating_sub(1) / hold).min(last as u64) as usize
    }
}

impl Scene for TemperatureScene {
    fn name(&self) -> &'static str {
        "temperature"
    }

    fn tick(&mut self) {
        if self.finished() {
            return;
        }
        self.ticks += 1;
    }

    fn ticks(&self) -> u64 {
        self.ticks
    }

    fn finished(&self) -> bool {
        self.ticks >= self.cfg.hold_ticks * self.distributions.len() as u64
    }

    /// Bars for the current temperature, shaded by its position in the
    /// sequence.
    fn primitives(&self) -> Vec<Primitive> {
        let k = self.current();
        let Some(probs) = self.distributions.get(k) else {
            return Vec::new();
        };
        let shade = spread_shade(k, self.distributions.len());
        let mid = (probs.len() as f32 - 1.0) / 2.0;
        probs
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let x = (i as f32 - mid) * self.cfg.bar_spacing;
                Primitive::Bar {
                    base: Vec2::new(x, TEMPERATURE_FLOOR_Y),
                    width: self.cfg.bar_width,
                    height: p as f32 * self.cfg.max_height,
                    shade,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;

    fn run_to_end(scene: &mut dyn Scene) {
        while !scene.finished() {
            scene.tick();
        }
    }

    #[test]
    fn mandelbrot_reveals_columns_and_skips_the_set() {
        let cfg = MandelbrotConfig {
            window: crate::mandelbrot::PlaneWindow {
                resolution: 10,
                ..Default::default()
            },
            columns_per_tick: 3,
            ..Default::default()
        };
        let mut scene = MandelbrotScene::new(&cfg);
        assert!(scene.primitives().is_empty());
        run_to_end(&mut scene);
        assert_eq!(scene.ticks(), 4);

        let samples = &scene.samples;
        let escaped = samples.iter().filter(|s| !s.escape.is_bounded()).count();
        assert_eq!(scene.primitives().len(), escaped);
        assert!(escaped < 100);
    }

    #[test]
    fn pendulum_trail_is_capped() {
        let cfg = PendulumConfig {
            trail_len: 10,
            ..Default::default()
        };
        let mut scene = PendulumScene::new(&cfg);
        for _ in 0..50 {
            scene.tick();
        }
        assert!(scene.trails.iter().all(|t| t.len() == 10));
    }

    #[test]
    fn lorenz_paths_grow_by_steps_per_tick() {
        let cfg = LorenzConfig {
            steps: 60,
            steps_per_tick: 25,
            ..Default::default()
        };
        let mut scene = LorenzScene::new(&cfg);
        scene.tick();
        assert!(scene.paths.iter().all(|p| p.len() == 25));
        run_to_end(&mut scene);
        assert_eq!(scene.ticks(), 3);
        assert!(scene.paths.iter().all(|p| p.len() == 60));
        // 5 paths of 60 points.
        assert_eq!(scene.primitives().len(), 5 * 59);
    }

    #[test]
    fn life_draws_one_cell_per_live_cell() {
        let mut scene = LifeScene::new(&LifeConfig::default(), 123).unwrap();
        assert_eq!(scene.primitives().len(), scene.grid().population());
        scene.tick();
        assert_eq!(scene.primitives().len(), scene.grid().population());
    }

    #[test]
    fn life_is_reproducible_from_seed() {
        let mut a = LifeScene::new(&LifeConfig::default(), 5).unwrap();
        let mut b = LifeScene::new(&LifeConfig::default(), 5).unwrap();
        a.tick();
        b.tick();
        assert_eq!(a.grid(), b.grid());
    }

    #[test]
    fn sort_scene_ends_sorted_and_fully_settled() {
        let mut scene = SortScene::new(&SortConfig::default(), 42);
        run_to_end(&mut scene);
        assert!(scene.values().windows(2).all(|w| w[0] <= w[1]));
        // 15 * 14 / 2 comparisons plus the final single-element pass.
        assert_eq!(scene.ticks(), 106);
        assert!(scene.primitives().iter().all(|p| matches!(
            p,
            Primitive::Bar { shade, .. } if *shade == 1.0
        )));
    }

    #[test]
    fn sort_scene_highlights_the_compared_pair() {
        let mut scene = SortScene::new(&SortConfig::default(), 42);
        scene.tick();
        let shades: Vec<f32> = scene
            .primitives()
            .iter()
            .map(|p| match p {
                Primitive::Bar { shade, .. } => *shade,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(&shades[..3], &[0.5, 0.5, 0.0]);
    }

    #[test]
    fn epicycle_path_gains_one_point_per_tick() {
        let mut scene = EpicycleScene::new(&EpicycleConfig::default());
        for _ in 0..10 {
            scene.tick();
        }
        assert_eq!(scene.path.len(), 11);
        let rings = scene
            .primitives()
            .iter()
            .filter(|p| matches!(p, Primitive::Ring { .. }))
            .count();
        assert_eq!(rings, 7);
    }

    #[test]
    fn tree_scene_reveals_every_branch() {
        let mut scene = TreeScene::new(&BranchConfig::binary());
        run_to_end(&mut scene);
        assert_eq!(scene.primitives().len(), 127);
        assert!(scene.ticks() as usize <= TREE_REVEAL_TICKS);
    }

    #[test]
    fn gradient_scene_walks_downhill() {
        let mut scene = GradientScene::new(&GradientConfig::default());
        run_to_end(&mut scene);
        assert_eq!(scene.ticks(), 15);
        assert!(scene.descent().x.abs() < 0.1);
    }

    #[test]
    fn field_particles_leave_trails() {
        let mut scene = FieldScene::new(&FieldConfig::default());
        scene.tick();
        scene.tick();
        assert!(scene.trails.iter().all(|t| t.len() == 3));
    }

    #[test]
    fn lissajous_draws_curves_in_sequence() {
        let cfg = LissajousConfig {
            samples: 8,
            samples_per_tick: 4,
            ..Default::default()
        };
        let mut scene = LissajousScene::new(&cfg);
        scene.tick();
        assert_eq!(scene.current, 0);
        scene.tick();
        assert_eq!(scene.current, 1);
        run_to_end(&mut scene);
        assert_eq!(scene.ticks(), 6);
        assert_eq!(scene.primitives().len(), 3 * 7);
    }

    #[test]
    fn attention_connections_appear_after_the_heatmap() {
        let mut scene = AttentionScene::new(&AttentionConfig::default()).unwrap();
        for _ in 0..5 {
            scene.tick();
        }
        let segments = |s: &AttentionScene| {
            s.primitives()
                .iter()
                .filter(|p| matches!(p, Primitive::Segment { .. }))
                .count()
        };
        assert_eq!(segments(&scene), 0);
        scene.tick();
        assert!(scene.finished());
        assert_eq!(segments(&scene), 2);
    }

    #[test]
    fn attention_rejects_missing_focus_token() {
        let cfg = AttentionConfig {
            focus: 5,
            ..Default::default()
        };
        assert!(AttentionScene::new(&cfg).is_err());
    }

    #[test]
    fn heatmap_is_centred_for_any_token_count() {
        let cfg = AttentionConfig {
            weights: Some(vec![vec![0.5, 0.5], vec![0.25, 0.75]]),
            focus: 0,
            ..Default::default()
        };
        let mut scene = AttentionScene::new(&cfg).unwrap();
        scene.tick();
        let xs: Vec<f32> = scene
            .primitives()
            .iter()
            .filter_map(|p| match p {
                Primitive::Cell { center, .. } => Some(center.x),
                _ => None,
            })
            .collect();
        assert_eq!(xs.len(), 2);
        assert!((xs[0] + xs[1]).abs() < 1e-6);
        assert!((xs[1] - xs[0] - HEATMAP_PITCH).abs() < 1e-6);
    }

    fn bar_heights(scene: &TemperatureScene) -> Vec<f32> {
        scene
            .primitives()
            .iter()
            .map(|p| match p {
                Primitive::Bar { height, .. } => *height,
                _ => unreachable!(),
            })
            .collect()
    }

    #[test]
    fn temperature_bars_follow_softmax() {
        let cfg = TemperatureConfig::default();
        let mut scene = TemperatureScene::new(&cfg);
        scene.tick();
        assert_eq!(scene.current(), 0);

        let expected = softmax(&cfg.scores, cfg.temperatures[0]);
        for (h, p) in bar_heights(&scene).iter().zip(&expected) {
            assert!((h - *p as f32 * cfg.max_height).abs() < 1e-5);
        }
    }

    #[test]
    fn higher_temperature_flattens_the_bars() {
        let cfg = TemperatureConfig {
            hold_ticks: 2,
            ..Default::default()
        };
        let mut scene = TemperatureScene::new(&cfg);
        scene.tick();
        let cold = bar_heights(&scene);
        run_to_end(&mut scene);
        assert_eq!(scene.ticks(), 6);
        assert_eq!(scene.current(), 2);
        let hot = bar_heights(&scene);

        let spread = |h: &[f32]| {
            let max = h.iter().copied().fold(f32::MIN, f32::max);
            let min = h.iter().copied().fold(f32::MAX, f32::min);
            max - min
        };
        assert!(spread(&hot) < spread(&cold));
        assert!(cold[0] > 0.99 * cfg.max_height);
    }

    #[test]
    fn built_scenes_report_their_names() {
        let cfg = SceneConfig::default();
        let scene = crate::scene::SceneKind::Sort.build(&cfg, 1).unwrap();
        assert_eq!(scene.name(), "sort");
    }
}
