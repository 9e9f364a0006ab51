//! Headless driver: loads a catalog, replays an input script one event per
//! frame and logs what the renderer would be told.
//!
//! Usage: `skydome <catalog.json> [script.yaml|json] [config.yaml|json]`

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use common::log_setup::setup_logging;
use skydome::prelude::*;

const FRAME_DT: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    let _log_guard = setup_logging("info")?;

    let mut args = std::env::args().skip(1).map(PathBuf::from);
    let Some(catalog_path) = args.next() else {
        bail!("usage: skydome <catalog.json> [script] [config]");
    };
    let script_path = args.next();
    let config = args
        .next()
        .map(|path| SkyConfig::load_or_default(&path))
        .unwrap_or_default();
    config.validate()?;

    let viewport = Viewport::default();
    let camera = PerspectiveCamera::new(&config.camera, &viewport);
    let raycaster = Raycaster::new(&camera);
    let mut scene = SkyScene::new(config, viewport);

    let raw = load_raw_catalog(&catalog_path)?;
    let report = scene.load_catalog(&raw, &mut rand::rng());
    tracing::info!(
        "{} rows, {} stars, {} skipped",
        report.rows,
        report.loaded,
        report.malformed
    );

    let events: Vec<InputEvent> = match &script_path {
        Some(path) => common::serde::read_file(path)
            .with_context(|| format!("Failed to read input script {}", path.display()))?,
        None => Vec::new(),
    };

    // one extra frame so the last event's hover and spin are applied
    for event in events.into_iter().map(Some).chain(std::iter::once(None)) {
        if let Some(event) = event {
            scene.push_event(event);
        }
        let output = scene.tick(FRAME_DT, &raycaster, &camera);
        for outcome in &output.outcomes {
            tracing::info!("{:?}", outcome);
        }
        for id in &output.released {
            tracing::debug!("Released {:?}", id);
        }
    }

    if let Some(info) = scene.hovered() {
        tracing::info!("Hovering {} (mag {:.2})", info.id, info.magnitude);
    }
    tracing::info!(
        "Done: {} links, {} labels, {} selected, latitude {:.2}, mode {}",
        scene.annotations().links().len(),
        scene.annotations().labels().len(),
        scene.selection().len(),
        scene.frame().latitude_deg(),
        scene.interaction().mode()
    );

    Ok(())
}

fn load_raw_catalog(path: &Path) -> Result<RawCatalog> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    let raw = RawCatalog::from_json(&text)
        .with_context(|| format!("Failed to parse catalog {}", path.display()))?;
    Ok(raw)
}
