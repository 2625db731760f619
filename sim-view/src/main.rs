//! Application entry point for the scene previewer.
//!
//! Takes an optional JSON config path as its only argument, then hands
//! everything to [`Viewer`] from the `viewer` module.

mod viewer;

use anyhow::Context;
use sim_core::config::SceneConfig;
use viewer::Viewer;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => SceneConfig::load(&path)
            .with_context(|| format!("loading config from {path}"))?,
        None => SceneConfig::default(),
    };

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Scene Simulators",
        options,
        Box::new(|_cc| Ok(Box::new(Viewer::new(cfg)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe failed: {e}"))
}
