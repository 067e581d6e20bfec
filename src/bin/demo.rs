//! demo - end-to-end synthetic run of the detection viewer
//!
//! Runs the full capture + repaint lifecycle against the synthetic camera,
//! verifies the painted op sequence, and writes a composed snapshot
//! (camera frame under overlay) plus the detection list as artifacts.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use detection_viewer::{
    demo_detections, CameraConfig, DetectionRecord, OverlayRenderer, PaintOp, PixelSurface,
    RecordingSurface, Viewer,
};

const OVERLAY_WIDTH: u32 = 640;
const OVERLAY_HEIGHT: u32 = 360;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Duration in seconds to run the repaint loop.
    #[arg(long, default_value_t = 2)]
    seconds: u64,
    /// Repaint interval in milliseconds.
    #[arg(long, default_value_t = 100)]
    interval_ms: u64,
    /// Camera device (stub:// names need no hardware).
    #[arg(long, default_value = "stub://demo")]
    device: String,
    /// Optional TTF/OTF font for label text in the snapshot.
    #[arg(long)]
    font: Option<PathBuf>,
    /// Output directory for artifacts.
    #[arg(long, default_value = "demo_out")]
    out: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.seconds == 0 {
        return Err(anyhow!("seconds must be >= 1"));
    }
    if args.interval_ms == 0 {
        return Err(anyhow!("interval-ms must be >= 1"));
    }

    let out_dir = PathBuf::from(&args.out);
    fs::create_dir_all(&out_dir)?;

    stage("configure viewer");
    let detections = demo_detections();
    let camera = CameraConfig {
        device: args.device.clone(),
        ..CameraConfig::default()
    };
    let interval = Duration::from_millis(args.interval_ms);
    let mut viewer = Viewer::with_camera(camera, interval, detections.clone())?;
    let recording = RecordingSurface::new(OVERLAY_WIDTH, OVERLAY_HEIGHT);
    viewer.attach_surface(Box::new(recording.clone()));

    stage("start capture");
    if !viewer.start() {
        return Err(anyhow!(
            "camera acquisition failed for {}; nothing to demo",
            args.device
        ));
    }

    stage("paint overlay frames");
    viewer.run_for(Duration::from_secs(args.seconds));
    let frames_painted = viewer.stats().frames_painted;
    if frames_painted == 0 {
        return Err(anyhow!("repaint loop produced no frames"));
    }

    stage("verify paint ops");
    let verify_result = verify_paint_ops(&recording.ops(), frames_painted, &detections);

    stage("compose snapshot");
    let snapshot_path = out_dir.join("overlay.png");
    let frame = viewer
        .grab_frame()
        .ok_or_else(|| anyhow!("no video frame available for the snapshot"))?;
    compose_snapshot(&frame, &detections, args.font.as_deref(), &snapshot_path)?;

    viewer.stop();

    stage("write detections artifact");
    let detections_path = out_dir.join("detections.json");
    let json = serde_json::to_vec_pretty(&detections)?;
    fs::write(&detections_path, json)
        .with_context(|| format!("writing detections to {}", detections_path.display()))?;

    println!("demo summary:");
    println!("  frames painted: {}", frames_painted);
    println!("  objects overlaid: {}", detections.len());
    for record in &detections {
        println!(
            "    #{} {} at ({}, {}) {}x{}",
            record.id,
            record.display_label(),
            record.x,
            record.y,
            record.width,
            record.height
        );
    }
    println!("  snapshot: {}", snapshot_path.display());
    println!("  detections: {}", detections_path.display());
    println!(
        "  verify: {}",
        if verify_result.is_ok() { "OK" } else { "FAIL" }
    );

    verify_result
}

fn stage(msg: &str) {
    eprintln!("demo: {}", msg);
}

/// Every painted frame must be one clear followed by a box + label bar +
/// label text triple per record, in list order.
fn verify_paint_ops(
    ops: &[PaintOp],
    frames_painted: u64,
    detections: &[DetectionRecord],
) -> Result<()> {
    let frame_len = 1 + detections.len() * 3;
    if ops.len() != frame_len * frames_painted as usize {
        return Err(anyhow!(
            "expected {} ops for {} frames, recorded {}",
            frame_len * frames_painted as usize,
            frames_painted,
            ops.len()
        ));
    }

    for (frame_idx, frame_ops) in ops.chunks(frame_len).enumerate() {
        if !matches!(frame_ops[0], PaintOp::Clear { .. }) {
            return Err(anyhow!("frame {}: does not begin with a clear", frame_idx));
        }
        for (i, record) in detections.iter().enumerate() {
            let triple = &frame_ops[1 + i * 3..1 + i * 3 + 3];
            let box_ok = matches!(
                triple[0],
                PaintOp::StrokeRect { x, y, width, height, .. }
                    if x == record.x && y == record.y
                        && width == record.width && height == record.height
            );
            let bar_ok = matches!(triple[1], PaintOp::FillRect { .. });
            let text_ok = matches!(
                &triple[2],
                PaintOp::FillText { text, .. } if *text == record.display_label()
            );
            if !(box_ok && bar_ok && text_ok) {
                return Err(anyhow!(
                    "frame {}: detection {} painted out of contract",
                    frame_idx,
                    record.id
                ));
            }
        }
    }
    Ok(())
}

/// Render the overlay onto a pixel surface and composite it over the
/// captured camera frame.
fn compose_snapshot(
    frame: &detection_viewer::VideoFrame,
    detections: &[DetectionRecord],
    font: Option<&std::path::Path>,
    path: &std::path::Path,
) -> Result<()> {
    let mut surface = PixelSurface::new(OVERLAY_WIDTH, OVERLAY_HEIGHT);
    if let Some(font_path) = font {
        surface = surface.with_font(PixelSurface::load_font(font_path)?);
    }
    OverlayRenderer::new().render(&mut surface, detections);

    let rgb = image::RgbImage::from_raw(frame.width, frame.height, frame.data.clone())
        .ok_or_else(|| anyhow!("video frame buffer does not match its dimensions"))?;
    let mut composed = image::DynamicImage::ImageRgb8(rgb).into_rgba8();
    image::imageops::overlay(&mut composed, surface.image(), 0, 0);

    composed
        .save(path)
        .with_context(|| format!("writing snapshot to {}", path.display()))?;
    Ok(())
}
