//! Interactive scene previewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the active [`Scene`], the
//! [`SceneConfig`] it was built from and the camera, and implements
//! [`eframe::App`] to step the scene and paint its primitives.

use eframe::App;
use glam::Vec2;
use rand::{Rng, rngs::ThreadRng};
use sim_core::{
    config::{EpicyclePreset, SceneConfig},
    pendulum::Coupling,
    scene::{Primitive, Scene, SceneKind},
    types::Shade,
};

/// Colours for shade bands `[0, 0.2)`, `[0.2, 0.4)`, ... up to 1.
const PALETTE: [egui::Color32; 5] = [
    egui::Color32::from_rgb(70, 110, 200),
    egui::Color32::from_rgb(80, 170, 220),
    egui::Color32::from_rgb(110, 200, 140),
    egui::Color32::from_rgb(235, 200, 90),
    egui::Color32::from_rgb(235, 110, 80),
];

/// Maps a shade in `[0, 1]` to its palette band. Out-of-range shades clamp.
fn shade_color(shade: Shade) -> egui::Color32 {
    let last = PALETTE.len() - 1;
    let band = (shade.clamp(0.0, 1.0) * PALETTE.len() as f32) as usize;
    PALETTE[band.min(last)]
}

/// Main application state for the previewer.
///
/// The per-frame update is:
/// 1. Handle UI interactions (scene choice, run controls, config edits).
/// 2. If `running` is `true` and enough time has passed, call [`Viewer::step_once`].
/// 3. Paint the scene's current primitives.
///
/// ### Fields
/// - `kind` - Scene currently selected.
/// - `cfg` - Configuration every scene is built from.
/// - `scene` - The built scene, `None` when the last build failed.
/// - `error` - Message from the last failed build.
///
/// - `rng` - Source of fresh seeds on reset.
/// - `seed` - Seed the current scene was built with.
///
/// - `running` - Whether the scene is auto-advancing.
/// - `zoom` - Pixels per scene unit.
/// - `pan` - Screen-space pan offset in pixels.
///
/// - `step_interval` - Target time between automatic steps (seconds).
/// - `last_step_time` - Time stamp of the last step (egui time).
/// - `last_step_dt` - Actual time between the last two steps (display only).
/// - `drawn` - Number of primitives painted in the last frame.
pub struct Viewer {
    kind: SceneKind,
    cfg: SceneConfig,
    scene: Option<Box<dyn Scene>>,
    error: Option<String>,

    rng: ThreadRng,
    seed: u64,

    running: bool,
    zoom: f32,
    pan: egui::Vec2,

    step_interval: f64,
    last_step_time: f64,
    last_step_dt: f64,
    drawn: usize,
}

impl Viewer {
    /// Creates a viewer showing the first scene built from `cfg` with a
    /// random seed.
    pub fn new(cfg: SceneConfig) -> Self {
        let mut rng = rand::rng();
        let seed = rng.random();
        let mut viewer = Self {
            kind: SceneKind::ALL[0],
            cfg,
            scene: None,
            error: None,
            rng,
            seed,
            running: false,
            zoom: 50.0,
            pan: egui::vec2(0.0, 0.0),
            step_interval: 1.0 / 30.0,
            last_step_time: 0.0,
            last_step_dt: 0.0,
            drawn: 0,
        };
        viewer.rebuild();
        viewer
    }

    /// Rebuilds the current scene from `cfg` with the current seed.
    ///
    /// On failure the scene is dropped and the error is kept for the
    /// status bar.
    fn rebuild(&mut self) {
        self.running = false;
        self.last_step_time = 0.0;
        match self.kind.build(&self.cfg, self.seed) {
            Ok(scene) => {
                log::info!("{} ready (seed {})", self.kind.label(), self.seed);
                self.scene = Some(scene);
                self.error = None;
            }
            Err(e) => {
                log::warn!("cannot build {}: {e}", self.kind.label());
                self.scene = None;
                self.error = Some(e.to_string());
            }
        }
    }

    /// Rebuilds the current scene with a fresh seed.
    fn reset(&mut self) {
        self.seed = self.rng.random();
        self.rebuild();
    }

    fn select(&mut self, kind: SceneKind) {
        if kind != self.kind {
            self.kind = kind;
            self.rebuild();
        }
    }

    /// Advances the scene by one tick and stops auto-running once it
    /// has finished.
    fn step_once(&mut self) {
        let Some(scene) = self.scene.as_mut() else {
            self.running = false;
            return;
        };
        scene.tick();
        if scene.finished() {
            log::debug!("{} finished after {} ticks", scene.name(), scene.ticks());
            self.running = false;
        }
    }

    /// Converts a scene-space position to screen-space.
    ///
    /// Scene coordinates are scaled by `zoom`, offset by `pan`, and then
    /// centered inside the given `rect`. The y-axis is flipped so that
    /// positive y goes up in scene space.
    fn world_to_screen(&self, p: Vec2, rect: egui::Rect) -> egui::Pos2 {
        let center = rect.center();
        egui::pos2(
            center.x + p.x * self.zoom + self.pan.x,
            center.y - p.y * self.zoom + self.pan.y,
        )
    }

    /// Inverse of [`Viewer::world_to_screen`] (up to floating point
    /// rounding).
    fn screen_to_world(&self, p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        let center = rect.center();
        let x = (p.x - center.x - self.pan.x) / self.zoom;
        let y = (center.y - p.y + self.pan.y) / self.zoom;
        Vec2::new(x, y)
    }

    /// Helper to draw a labeled [`egui::DragValue`].
    fn labeled_drag<N: egui::emath::Numeric>(
        ui: &mut egui::Ui,
        label: &str,
        value: &mut N,
        range: std::ops::RangeInclusive<N>,
        speed: f64,
    ) {
        ui.horizontal(|ui| {
            ui.label(label);
            ui.add(egui::DragValue::new(value).range(range).speed(speed));
        });
    }

    /// Builds the top panel UI (scene choice, run controls, zoom).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let mut kind = self.kind;
                egui::ComboBox::from_id_salt("scene_kind")
                    .selected_text(kind.label())
                    .show_ui(ui, |ui| {
                        for k in SceneKind::ALL {
                            ui.selectable_value(&mut kind, k, k.label());
                        }
                    });
                self.select(kind);

                ui.separator();
                if ui
                    .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                    .clicked()
                {
                    self.running = !self.running;
                }

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.005..=1.0)
                        .speed(0.005),
                );

                if ui.button("Step").clicked() {
                    let now = ctx.input(|i| i.time);
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = now - self.last_step_time;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                if ui.button("Reset").clicked() {
                    self.reset();
                }

                ui.separator();
                ui.add(egui::Slider::new(&mut self.zoom, 5.0..=200.0).text("Zoom"));
            });
        });
    }

    /// Builds the bottom status bar (ticks, primitive count, seed, errors).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("dt target = {:.3} s", self.step_interval));
                ui.label(format!("dt last = {:.3} s", self.last_step_dt));
                ui.separator();
                ui.label(format!("seed = {}", self.seed));
                match &self.scene {
                    Some(scene) => {
                        ui.label(format!("primitives = {}", self.drawn));
                        ui.label(format!("ticks = {}", scene.ticks()));
                        if scene.finished() {
                            ui.label("finished");
                        }
                    }
                    None => {
                        if let Some(err) = &self.error {
                            ui.colored_label(egui::Color32::LIGHT_RED, err);
                        }
                    }
                }
            });
        });
    }

    /// Builds the right-hand panel with the selected scene's settings.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Config");
                ui.label(self.kind.label());
                ui.separator();

                let cfg = &mut self.cfg;
                match self.kind {
                    SceneKind::Mandelbrot => {
                        let m = &mut cfg.mandelbrot;
                        Self::labeled_drag(ui, "max_iter:", &mut m.max_iter, 2..=500, 1.0);
                        Self::labeled_drag(
                            ui,
                            "resolution:",
                            &mut m.window.resolution,
                            1..=300,
                            1.0,
                        );
                        Self::labeled_drag(
                            ui,
                            "columns_per_tick:",
                            &mut m.columns_per_tick,
                            1..=50,
                            1.0,
                        );
                        Self::labeled_drag(
                            ui,
                            "dot_radius:",
                            &mut m.dot_radius,
                            0.005..=0.5,
                            0.005,
                        );
                    }
                    SceneKind::Pendulum => {
                        let p = &mut cfg.pendulum;
                        Self::labeled_drag(ui, "count:", &mut p.count, 1..=20, 1.0);
                        Self::labeled_drag(ui, "spread:", &mut p.spread, 0.0..=1.0, 0.005);
                        Self::labeled_drag(ui, "frames:", &mut p.frames, 1..=5000, 10.0);
                        Self::labeled_drag(ui, "trail_len:", &mut p.trail_len, 0..=2000, 10.0);
                        ui.horizontal(|ui| {
                            ui.radio_value(
                                &mut p.params.coupling,
                                Coupling::Independent,
                                "Independent",
                            );
                            ui.radio_value(&mut p.params.coupling, Coupling::Coupled, "Coupled");
                        });
                    }
                    SceneKind::Lorenz => {
                        let l = &mut cfg.lorenz;
                        Self::labeled_drag(ui, "rho:", &mut l.params.rho, 0.0..=100.0, 0.1);
                        Self::labeled_drag(ui, "steps:", &mut l.steps, 1..=20000, 10.0);
                        Self::labeled_drag(
                            ui,
                            "steps_per_tick:",
                            &mut l.steps_per_tick,
                            1..=500,
                            1.0,
                        );
                        Self::labeled_drag(ui, "scale:", &mut l.scale, 0.01..=1.0, 0.005);
                    }
                    SceneKind::Life => {
                        let l = &mut cfg.life;
                        Self::labeled_drag(ui, "rows:", &mut l.rows, 1..=200, 1.0);
                        Self::labeled_drag(ui, "cols:", &mut l.cols, 1..=200, 1.0);
                        Self::labeled_drag(ui, "density:", &mut l.density, 0.0..=1.0, 0.01);
                        Self::labeled_drag(ui, "generations:", &mut l.generations, 1..=5000, 1.0);
                    }
                    SceneKind::Sort => {
                        let s = &mut cfg.sort;
                        Self::labeled_drag(ui, "count:", &mut s.count, 0..=40, 1.0);
                        Self::labeled_drag(ui, "low:", &mut s.low, 0..=100, 1.0);
                        Self::labeled_drag(ui, "high:", &mut s.high, 1..=101, 1.0);
                    }
                    SceneKind::Epicycle => {
                        let e = &mut cfg.epicycle;
                        ui.horizontal(|ui| {
                            ui.radio_value(&mut e.preset, EpicyclePreset::FourierSeries, "Fourier");
                            ui.radio_value(&mut e.preset, EpicyclePreset::OddHarmonics, "Odd");
                        });
                        Self::labeled_drag(ui, "ticks:", &mut e.ticks, 1..=5000, 1.0);
                    }
                    SceneKind::FractalTree => {
                        let t = &mut cfg.tree;
                        Self::labeled_drag(ui, "max_depth:", &mut t.max_depth, 0..=12, 1.0);
                        Self::labeled_drag(ui, "length:", &mut t.length, 0.1..=5.0, 0.05);
                        Self::labeled_drag(ui, "min_length:", &mut t.min_length, 0.01..=2.0, 0.01);
                    }
                    SceneKind::GradientDescent => {
                        let g = &mut cfg.gradient;
                        Self::labeled_drag(ui, "start:", &mut g.start, -4.0..=4.0, 0.05);
                        Self::labeled_drag(
                            ui,
                            "learning_rate:",
                            &mut g.learning_rate,
                            0.01..=2.0,
                            0.01,
                        );
                        Self::labeled_drag(ui, "steps:", &mut g.steps, 1..=200, 1.0);
                    }
                    SceneKind::VectorField => {
                        let f = &mut cfg.field;
                        Self::labeled_drag(
                            ui,
                            "strength:",
                            &mut f.vortex.strength,
                            -1.0..=1.0,
                            0.01,
                        );
                        Self::labeled_drag(ui, "particles:", &mut f.particles, 0..=64, 1.0);
                        Self::labeled_drag(ui, "speed:", &mut f.speed, 0.0..=50.0, 0.5);
                        Self::labeled_drag(ui, "ticks:", &mut f.ticks, 1..=2000, 1.0);
                    }
                    SceneKind::Lissajous => {
                        let l = &mut cfg.lissajous;
                        Self::labeled_drag(ui, "samples:", &mut l.samples, 2..=2000, 1.0);
                        Self::labeled_drag(
                            ui,
                            "samples_per_tick:",
                            &mut l.samples_per_tick,
                            1..=100,
                            1.0,
                        );
                    }
                    SceneKind::Attention => {
                        let a = &mut cfg.attention;
                        Self::labeled_drag(ui, "focus:", &mut a.focus, 0..=15, 1.0);
                        Self::labeled_drag(ui, "threshold:", &mut a.threshold, 0.0..=1.0, 0.005);
                        Self::labeled_drag(
                            ui,
                            "temperature:",
                            &mut a.temperature,
                            0.01..=5.0,
                            0.01,
                        );
                    }
                    SceneKind::Temperature => {
                        let t = &mut cfg.temperature;
                        for (i, temp) in t.temperatures.iter_mut().enumerate() {
                            Self::labeled_drag(ui, &format!("T{i}:"), temp, 0.01..=5.0, 0.01);
                        }
                        Self::labeled_drag(ui, "hold_ticks:", &mut t.hold_ticks, 1..=600, 1.0);
                    }
                }

                ui.separator();
                if ui.button("Rebuild").clicked() {
                    self.rebuild();
                }
                if ui.button("Reset cfg to default").clicked() {
                    self.cfg = SceneConfig::default();
                    self.rebuild();
                }
            });
    }

    fn paint(&self, painter: &egui::Painter, rect: egui::Rect, prim: &Primitive) {
        match *prim {
            Primitive::Dot { pos, radius, shade } => {
                let r = (radius * self.zoom).max(1.0);
                painter.circle_filled(self.world_to_screen(pos, rect), r, shade_color(shade));
            }
            Primitive::Segment { a, b, shade } => {
                painter.line_segment(
                    [self.world_to_screen(a, rect), self.world_to_screen(b, rect)],
                    egui::Stroke::new(1.5, shade_color(shade)),
                );
            }
            Primitive::Ring {
                center,
                radius,
                shade,
            } => {
                painter.circle_stroke(
                    self.world_to_screen(center, rect),
                    radius * self.zoom,
                    egui::Stroke::new(1.0, shade_color(shade)),
                );
            }
            Primitive::Cell {
                center,
                size,
                shade,
            } => {
                let side = (size * self.zoom).max(1.0);
                painter.rect_filled(
                    egui::Rect::from_center_size(
                        self.world_to_screen(center, rect),
                        egui::vec2(side, side),
                    ),
                    0.0,
                    shade_color(shade),
                );
            }
            Primitive::Bar {
                base,
                width,
                height,
                shade,
            } => {
                let half = width / 2.0;
                let a = self.world_to_screen(base - Vec2::new(half, 0.0), rect);
                let b = self.world_to_screen(base + Vec2::new(half, height), rect);
                painter.rect_filled(egui::Rect::from_two_pos(a, b), 0.0, shade_color(shade));
            }
        }
    }

    /// Builds the central panel where the scene is painted.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
            let rect = response.rect;
            let painter = ui.painter_at(rect);

            // Pan with drag.
            if response.dragged() {
                self.pan += response.drag_delta();
            }

            // Zoom around the mouse cursor.
            let scroll = ui.ctx().input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let pointer_screen = response.hover_pos().unwrap_or(rect.center());
                let world_before = self.screen_to_world(pointer_screen, rect);

                let factor = (1.0 + scroll * 0.001).clamp(0.5, 2.0);
                self.zoom = (self.zoom * factor).clamp(5.0, 200.0);

                let screen_after = self.world_to_screen(world_before, rect);
                self.pan += pointer_screen - screen_after;
            }

            let prims = self
                .scene
                .as_ref()
                .map(|s| s.primitives())
                .unwrap_or_default();
            for prim in &prims {
                self.paint(&painter, rect, prim);
            }
            self.drawn = prims.len();

            // Auto-run the scene if requested.
            if self.running {
                let now = ctx.input(|i| i.time);
                let elapsed = now - self.last_step_time;
                if elapsed >= self.step_interval {
                    if self.last_step_time > 0.0 {
                        self.last_step_dt = elapsed;
                    }
                    self.step_once();
                    self.last_step_time = now;
                }

                ctx.request_repaint();
            }
        });
    }
}

impl App for Viewer {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_rect() -> egui::Rect {
        egui::Rect::from_min_size(egui::Pos2::new(0.0, 0.0), egui::vec2(800.0, 600.0))
    }

    #[test]
    fn world_to_screen_and_back_is_roundtrip() {
        let mut viewer = Viewer::new(SceneConfig::default());
        viewer.zoom = 40.0;
        viewer.pan = egui::vec2(15.0, -7.0);
        let rect = test_rect();

        let eps = 1e-4;
        for p in [Vec2::ZERO, Vec2::new(3.0, -2.5), Vec2::new(-3.5, 1.25)] {
            let screen = viewer.world_to_screen(p, rect);
            let back = viewer.screen_to_world(screen, rect);
            assert!(
                (back.x - p.x).abs() < eps && (back.y - p.y).abs() < eps,
                "roundtrip mismatch: p={:?}, back={:?}",
                p,
                back
            );
        }
    }

    #[test]
    fn positive_y_is_up_on_screen() {
        let viewer = Viewer::new(SceneConfig::default());
        let rect = test_rect();
        let up = viewer.world_to_screen(Vec2::new(0.0, 1.0), rect);
        assert!(up.y < rect.center().y);
    }

    #[test]
    fn step_once_advances_the_scene() {
        let mut viewer = Viewer::new(SceneConfig::default());
        viewer.step_once();
        viewer.step_once();
        assert_eq!(viewer.scene.as_ref().unwrap().ticks(), 2);
    }

    #[test]
    fn reset_rebuilds_and_stops() {
        let mut viewer = Viewer::new(SceneConfig::default());
        viewer.step_once();
        viewer.running = true;

        viewer.reset();

        assert_eq!(viewer.scene.as_ref().unwrap().ticks(), 0);
        assert!(!viewer.running);
        assert!(viewer.error.is_none());
    }

    #[test]
    fn running_stops_when_the_scene_finishes() {
        let mut viewer = Viewer::new(SceneConfig::default());
        viewer.select(SceneKind::Attention);
        viewer.running = true;
        for _ in 0..100 {
            viewer.step_once();
        }
        assert!(viewer.scene.as_ref().unwrap().finished());
        assert!(!viewer.running);
    }

    #[test]
    fn invalid_config_reports_an_error() {
        let mut viewer = Viewer::new(SceneConfig::default());
        viewer.cfg.sort.high = viewer.cfg.sort.low;
        viewer.select(SceneKind::Sort);
        assert!(viewer.scene.is_none());
        assert!(viewer.error.as_deref().unwrap().contains("sort.high"));

        viewer.cfg = SceneConfig::default();
        viewer.rebuild();
        assert!(viewer.scene.is_some());
    }

    #[test]
    fn shades_map_to_palette_bands() {
        assert_eq!(shade_color(0.0), PALETTE[0]);
        assert_eq!(shade_color(0.5), PALETTE[2]);
        assert_eq!(shade_color(1.0), PALETTE[4]);
        assert_eq!(shade_color(7.0), PALETTE[4]);
        assert_eq!(shade_color(-1.0), PALETTE[0]);
    }
}
