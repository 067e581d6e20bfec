//! viewerd - demo detection viewer daemon
//!
//! This daemon:
//! 1. Loads configuration (file + env)
//! 2. Starts camera capture and arms the repaint timer
//! 3. Repaints the overlay surface from the static mock detections
//! 4. Logs capture health and paint stats periodically
//! 5. Stops cleanly on Ctrl-C, releasing every stream track

use anyhow::{anyhow, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use detection_viewer::{demo_detections, PixelSurface, Viewer, ViewerConfig};

fn main() -> Result<()> {
    // Initialize logging (simple stderr)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = ViewerConfig::load()?;

    let mut surface = PixelSurface::new(cfg.overlay.width, cfg.overlay.height);
    if let Some(font_path) = &cfg.overlay.font_path {
        surface = surface.with_font(PixelSurface::load_font(font_path)?);
    } else {
        log::info!("no font configured; label bars render without text");
    }

    let mut viewer = Viewer::new(&cfg, demo_detections())?;
    viewer.attach_surface(Box::new(surface));

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || {
            running.store(false, Ordering::SeqCst);
        })?;
    }

    if !viewer.start() {
        return Err(anyhow!(
            "camera acquisition failed for {}; viewer stays idle, retry via the start control",
            cfg.camera.device
        ));
    }

    log::info!(
        "viewerd running. camera={} overlay={}x{} interval={}ms objects={}",
        cfg.camera.device,
        cfg.overlay.width,
        cfg.overlay.height,
        cfg.overlay.interval.as_millis(),
        viewer.detections().len()
    );

    let mut last_health_log = Instant::now();

    while running.load(Ordering::SeqCst) && viewer.is_detecting() {
        viewer.pump(Instant::now());

        if last_health_log.elapsed() >= Duration::from_secs(5) {
            let stats = viewer.stats();
            if let Some(capture) = viewer.capture_stats() {
                log::info!(
                    "camera health={} frames={} device={} | painted={} last_paint={:?}",
                    viewer.capture_healthy(),
                    capture.frames_delivered,
                    capture.device,
                    stats.frames_painted,
                    stats.last_paint
                );
            }
            last_health_log = Instant::now();
        }

        // Stay responsive to Ctrl-C between ticks.
        std::thread::sleep(cfg.overlay.interval.min(Duration::from_millis(50)));
    }

    viewer.stop();
    let stats = viewer.stats();
    log::info!(
        "viewerd stopped. frames painted={} detecting={}",
        stats.frames_painted,
        stats.detecting
    );
    Ok(())
}
