//! Top-level viewer state.
//!
//! The `Viewer` owns every piece of shared state the page held: the
//! detecting-state (via the capture controller), the immutable detection
//! list, the repaint timer, and the drawing surface. All transitions are
//! ordered here so that the timer exists exactly while detecting-state is
//! true, and nothing else can create or cancel it.

use anyhow::Result;
use std::time::{Duration, Instant};

use crate::capture::{CameraConfig, CaptureController, CaptureStats, VideoFrame};
use crate::config::ViewerConfig;
use crate::detections::{validate_detections, DetectionRecord};
use crate::overlay::{DrawSurface, OverlayRenderer};
use crate::timer::RepaintTimer;

/// Read-only snapshot for the status panel / health log.
#[derive(Clone, Debug)]
pub struct ViewerStats {
    pub detecting: bool,
    pub frames_painted: u64,
    pub last_paint: Option<Duration>,
    pub objects: usize,
    pub repaint_interval: Duration,
}

pub struct Viewer {
    controller: CaptureController,
    renderer: OverlayRenderer,
    detections: Vec<DetectionRecord>,
    timer: Option<RepaintTimer>,
    surface: Option<Box<dyn DrawSurface>>,
    repaint_interval: Duration,
    frames_painted: u64,
    last_paint: Option<Duration>,
}

impl Viewer {
    /// Build a viewer over an immutable detection list.
    ///
    /// The list is validated once here and never mutated afterwards; a
    /// real system would instead receive it from an inference service.
    pub fn new(config: &ViewerConfig, detections: Vec<DetectionRecord>) -> Result<Self> {
        validate_detections(&detections)?;
        Ok(Self {
            controller: CaptureController::new(config.camera.clone()),
            renderer: OverlayRenderer::new(),
            detections,
            timer: None,
            surface: None,
            repaint_interval: config.overlay.interval,
            frames_painted: 0,
            last_paint: None,
        })
    }

    /// Viewer with an explicit camera config, for callers that do not go
    /// through the config layer.
    pub fn with_camera(
        camera: CameraConfig,
        repaint_interval: Duration,
        detections: Vec<DetectionRecord>,
    ) -> Result<Self> {
        validate_detections(&detections)?;
        Ok(Self {
            controller: CaptureController::new(camera),
            renderer: OverlayRenderer::new(),
            detections,
            timer: None,
            surface: None,
            repaint_interval,
            frames_painted: 0,
            last_paint: None,
        })
    }

    pub fn attach_surface(&mut self, surface: Box<dyn DrawSurface>) {
        self.surface = Some(surface);
    }

    pub fn take_surface(&mut self) -> Option<Box<dyn DrawSurface>> {
        self.surface.take()
    }

    pub fn detections(&self) -> &[DetectionRecord] {
        &self.detections
    }

    pub fn is_detecting(&self) -> bool {
        self.controller.is_detecting()
    }

    /// True while the repaint timer exists; it exists iff detecting.
    pub fn timer_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// Start capture; on success arm the repaint timer.
    ///
    /// Returns the resulting detecting-state. Idempotent: starting while
    /// already detecting leaves the existing timer untouched, so two
    /// timers can never overlap.
    pub fn start(&mut self) -> bool {
        if self.is_detecting() {
            return true;
        }
        // Order matters: detecting-state flips true before the timer is
        // created, and the timer is only created on that transition.
        if !self.controller.start() {
            return false;
        }
        self.timer = Some(RepaintTimer::new(self.repaint_interval));
        true
    }

    /// Stop capture, cancel the timer. The surface keeps whatever was
    /// painted last. Idempotent.
    pub fn stop(&mut self) {
        self.controller.stop();
        self.timer = None;
    }

    /// Cooperative tick: repaint if the timer is due at `now`.
    ///
    /// Returns true when a repaint happened. Total: never fails, and a
    /// missing surface makes the repaint a silent no-op.
    pub fn pump(&mut self, now: Instant) -> bool {
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };
        if !timer.poll(now) {
            return false;
        }
        self.repaint()
    }

    fn repaint(&mut self) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        let started = Instant::now();
        self.renderer.render(surface.as_mut(), &self.detections);
        self.last_paint = Some(started.elapsed());
        self.frames_painted += 1;
        true
    }

    /// Drive the repaint cadence for a wall-clock duration, sleeping
    /// between ticks the way the daemon loop does.
    pub fn run_for(&mut self, duration: Duration) {
        let deadline = Instant::now() + duration;
        while self.is_detecting() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            self.pump(now);
            let until_due = self
                .timer
                .as_ref()
                .map(|t| t.until_due(Instant::now()))
                .unwrap_or(self.repaint_interval);
            let remaining = deadline.saturating_duration_since(Instant::now());
            std::thread::sleep(until_due.min(remaining).min(self.repaint_interval));
        }
    }

    /// Latest video frame, for whatever displays the feed under the
    /// overlay. None while not detecting.
    pub fn grab_frame(&mut self) -> Option<VideoFrame> {
        self.controller.grab_frame()
    }

    pub fn capture_stats(&self) -> Option<CaptureStats> {
        self.controller.stats()
    }

    pub fn capture_healthy(&self) -> bool {
        self.controller.is_healthy()
    }

    pub fn stats(&self) -> ViewerStats {
        ViewerStats {
            detecting: self.is_detecting(),
            frames_painted: self.frames_painted,
            last_paint: self.last_paint,
            objects: self.detections.len(),
            repaint_interval: self.repaint_interval,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detections::demo_detections;
    use crate::overlay::RecordingSurface;

    const TICK: Duration = Duration::from_millis(100);

    fn stub_viewer(device: &str) -> Viewer {
        let camera = CameraConfig {
            device: device.to_string(),
            ..CameraConfig::default()
        };
        Viewer::with_camera(camera, TICK, demo_detections()).expect("valid demo set")
    }

    #[test]
    fn invalid_detection_lists_are_rejected_at_construction() {
        let mut detections = demo_detections();
        detections[0].confidence = 7.0;
        let camera = CameraConfig::default();
        assert!(Viewer::with_camera(camera, TICK, detections).is_err());
    }

    #[test]
    fn pump_does_not_paint_while_idle() {
        let mut viewer = stub_viewer("stub://front_camera");
        let surface = RecordingSurface::new(640, 360);
        viewer.attach_surface(Box::new(surface.clone()));

        assert!(!viewer.pump(Instant::now() + TICK * 10));
        assert_eq!(surface.op_count(), 0);
    }

    #[test]
    fn pump_paints_once_per_due_tick() {
        let mut viewer = stub_viewer("stub://front_camera");
        let surface = RecordingSurface::new(640, 360);
        viewer.attach_surface(Box::new(surface.clone()));

        assert!(viewer.start());
        let armed_at = Instant::now();

        assert!(!viewer.pump(armed_at));
        assert!(viewer.pump(armed_at + TICK * 2));
        assert_eq!(surface.op_count(), 1 + 3 * 3);
        assert_eq!(viewer.stats().frames_painted, 1);
    }

    #[test]
    fn repaint_without_a_surface_is_a_silent_noop() {
        let mut viewer = stub_viewer("stub://front_camera");
        assert!(viewer.start());
        assert!(!viewer.pump(Instant::now() + TICK * 2));
        assert!(viewer.is_detecting());
        assert_eq!(viewer.stats().frames_painted, 0);
    }

    #[test]
    fn stop_cancels_the_timer_and_keeps_the_last_paint() {
        let mut viewer = stub_viewer("stub://front_camera");
        let surface = RecordingSurface::new(640, 360);
        viewer.attach_surface(Box::new(surface.clone()));

        viewer.start();
        viewer.pump(Instant::now() + TICK * 2);
        let painted_ops = surface.op_count();

        viewer.stop();
        assert!(!viewer.is_detecting());
        assert!(!viewer.timer_armed());

        // No further paints, surface untouched.
        assert!(!viewer.pump(Instant::now() + TICK * 20));
        assert_eq!(surface.op_count(), painted_ops);
    }
}
