//! Capture controller: the start/stop boundary around the camera stream.

use anyhow::Result;

use super::source::{CameraConfig, CameraSource, CaptureStats, VideoFrame};

/// The host denied or could not provide a camera stream.
///
/// Raised only inside `CaptureController::start` and caught there; callers
/// observe it as "detecting-state stayed false" plus a log line.
#[derive(Clone, Debug)]
pub struct AcquisitionError {
    pub device: String,
    pub message: String,
}

impl std::fmt::Display for AcquisitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "camera acquisition failed for {}: {}",
            self.device, self.message
        )
    }
}
impl std::error::Error for AcquisitionError {}

/// The live camera stream and its active flag.
///
/// Exclusively owned by the controller while active; destroyed (all tracks
/// stopped) on `stop()` or on acquisition failure.
pub struct CaptureSession {
    source: CameraSource,
    active: bool,
}

impl CaptureSession {
    pub fn active(&self) -> bool {
        self.active
    }

    fn release(&mut self) {
        self.active = false;
        let stopped = self.source.disconnect();
        log::debug!("capture session released ({} tracks stopped)", stopped);
    }
}

/// Owns the camera resource and the detecting-state.
pub struct CaptureController {
    config: CameraConfig,
    session: Option<CaptureSession>,
}

impl CaptureController {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// Request camera access and bind the stream.
    ///
    /// Returns the resulting detecting-state. On failure the error is
    /// logged and the controller stays idle; the user retries via the
    /// start control, no retry happens here.
    pub fn start(&mut self) -> bool {
        if self.is_detecting() {
            return true;
        }
        match self.try_acquire() {
            Ok(session) => {
                log::info!("capture started on {}", self.config.device);
                self.session = Some(session);
                true
            }
            Err(err) => {
                log::warn!("{}", err);
                self.session = None;
                false
            }
        }
    }

    fn try_acquire(&self) -> Result<CaptureSession, AcquisitionError> {
        let acquire = || -> Result<CameraSource> {
            let mut source = CameraSource::new(self.config.clone())?;
            source.connect()?;
            Ok(source)
        };
        let source = acquire().map_err(|err| AcquisitionError {
            device: self.config.device.clone(),
            message: format!("{err:#}"),
        })?;
        Ok(CaptureSession {
            source,
            active: true,
        })
    }

    /// Stop every track of a bound stream and flip detecting-state false.
    /// Idempotent; calling with no active session is a no-op.
    pub fn stop(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.release();
            log::info!("capture stopped on {}", self.config.device);
        }
    }

    pub fn is_detecting(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.active())
    }

    /// Pull the next frame from the bound stream, for whatever displays
    /// the feed. `None` while not detecting or when the source hiccups.
    pub fn grab_frame(&mut self) -> Option<VideoFrame> {
        let session = self.session.as_mut()?;
        match session.source.next_frame() {
            Ok(frame) => Some(frame),
            Err(err) => {
                log::debug!("frame grab failed: {err:#}");
                None
            }
        }
    }

    pub fn stats(&self) -> Option<CaptureStats> {
        self.session.as_ref().map(|s| s.source.stats())
    }

    pub fn is_healthy(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.source.is_healthy())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
