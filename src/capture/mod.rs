//! Camera capture lifecycle.
//!
//! This module owns the camera stream and the detecting-state:
//! - `CameraSource`: a video-only stream from a local device, with a
//!   synthetic backend for `stub://` device strings (tests, demo) and a
//!   V4L2 backend behind the `capture-v4l2` feature.
//! - `CaptureSession`: the live stream plus its active flag. Exclusively
//!   owned by the controller while active.
//! - `CaptureController`: `start()` / `stop()` transitions. Acquisition
//!   failure is terminal for the attempt: it is logged and the controller
//!   stays idle; no error escapes the boundary.
//!
//! The overlay renderer never touches anything in this module beyond the
//! detecting-state the controller reports.

mod controller;
mod source;
#[cfg(feature = "capture-v4l2")]
mod v4l2;

pub use controller::{AcquisitionError, CaptureController, CaptureSession};
pub use source::{CameraConfig, CameraSource, CaptureStats, VideoFrame};
