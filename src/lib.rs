//! Demo object-detection viewer.
//!
//! This crate implements the capture lifecycle and overlay render loop of a
//! demonstration "object detection" view. The detections are static mock
//! data; there is no detection engine, no model loading, no inference
//! pipeline, and no persistence.
//!
//! # Architecture
//!
//! Two cooperating responsibilities:
//!
//! 1. **Capture Controller** (`capture`): acquires/releases the camera
//!    stream and owns the boolean detecting-state.
//! 2. **Overlay Renderer** (`overlay`): on a fixed cadence, repaints the
//!    drawing surface with one rectangle + label per detection record.
//!
//! The `Viewer` ties them together: the repaint timer is created exactly
//! when detecting-state flips true and destroyed exactly when it flips
//! false, so leaked or overlapping timers cannot exist.
//!
//! # Module Structure
//!
//! - `capture`: camera sources (synthetic `stub://`, V4L2), session, controller
//! - `detections`: `DetectionRecord` and the static mock set
//! - `overlay`: `DrawSurface` seam, pixel/recording surfaces, render step
//! - `timer`: the repaint schedule
//! - `viewer`: top-level state container and cooperative event loop
//! - `config`: file + env configuration layering

pub mod capture;
pub mod config;
pub mod detections;
pub mod overlay;
pub mod timer;
pub mod viewer;

pub use capture::{
    AcquisitionError, CameraConfig, CameraSource, CaptureController, CaptureSession, CaptureStats,
    VideoFrame,
};
pub use config::{OverlaySettings, ViewerConfig};
pub use detections::{demo_detections, validate_detections, validate_label, DetectionRecord};
pub use overlay::{DrawSurface, OverlayRenderer, PaintOp, PixelSurface, RecordingSurface};
pub use timer::RepaintTimer;
pub use viewer::{Viewer, ViewerStats};
