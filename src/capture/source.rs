//! Camera sources.
//!
//! A `CameraSource` produces video frames from a local device. Device
//! strings starting with `stub://` select the synthetic backend, which is
//! always available and needs no hardware; anything else is a V4L2 device
//! node and requires the `capture-v4l2` feature.
//!
//! The synthetic backend recognizes one special name: `stub://denied`
//! fails to connect, standing in for a host that refuses camera access.

use anyhow::{anyhow, Result};

#[cfg(feature = "capture-v4l2")]
use super::v4l2::DeviceCameraSource;

/// Configuration for a camera source.
#[derive(Clone, Debug)]
pub struct CameraConfig {
    /// Device string ("stub://front_camera", "/dev/video0").
    pub device: String,
    /// Target frame rate (frames per second).
    pub target_fps: u32,
    /// Preferred frame width.
    pub width: u32,
    /// Preferred frame height.
    pub height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: "stub://front_camera".to_string(),
            target_fps: 30,
            width: 640,
            height: 360,
        }
    }
}

/// One decoded video frame, RGB8, row-major.
#[derive(Clone, Debug)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// Statistics for a camera source.
#[derive(Clone, Debug)]
pub struct CaptureStats {
    pub device: String,
    pub frames_delivered: u64,
    pub tracks: usize,
}

/// Video-only camera stream.
pub struct CameraSource {
    backend: CameraBackend,
}

enum CameraBackend {
    Synthetic(SyntheticCameraSource),
    #[cfg(feature = "capture-v4l2")]
    Device(DeviceCameraSource),
}

impl CameraSource {
    pub fn new(config: CameraConfig) -> Result<Self> {
        if config.device.starts_with("stub://") {
            return Ok(Self {
                backend: CameraBackend::Synthetic(SyntheticCameraSource::new(config)),
            });
        }
        #[cfg(feature = "capture-v4l2")]
        {
            return Ok(Self {
                backend: CameraBackend::Device(DeviceCameraSource::new(config)?),
            });
        }
        #[cfg(not(feature = "capture-v4l2"))]
        {
            Err(anyhow!(
                "device {} needs V4L2 support (enable the capture-v4l2 feature)",
                config.device
            ))
        }
    }

    /// Open the stream. Video only; no audio track is ever requested.
    pub fn connect(&mut self) -> Result<()> {
        match &mut self.backend {
            CameraBackend::Synthetic(source) => source.connect(),
            #[cfg(feature = "capture-v4l2")]
            CameraBackend::Device(source) => source.connect(),
        }
    }

    /// Stop every track and release the stream. Returns the number of
    /// tracks stopped; calling on a closed stream stops nothing.
    pub fn disconnect(&mut self) -> usize {
        match &mut self.backend {
            CameraBackend::Synthetic(source) => source.disconnect(),
            #[cfg(feature = "capture-v4l2")]
            CameraBackend::Device(source) => source.disconnect(),
        }
    }

    /// Capture the next frame from the open stream.
    pub fn next_frame(&mut self) -> Result<VideoFrame> {
        match &mut self.backend {
            CameraBackend::Synthetic(source) => source.next_frame(),
            #[cfg(feature = "capture-v4l2")]
            CameraBackend::Device(source) => source.next_frame(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        match &self.backend {
            CameraBackend::Synthetic(source) => source.is_healthy(),
            #[cfg(feature = "capture-v4l2")]
            CameraBackend::Device(source) => source.is_healthy(),
        }
    }

    pub fn stats(&self) -> CaptureStats {
        match &self.backend {
            CameraBackend::Synthetic(source) => source.stats(),
            #[cfg(feature = "capture-v4l2")]
            CameraBackend::Device(source) => source.stats(),
        }
    }
}

// ----------------------------------------------------------------------------
// Synthetic source (stub://) for tests and the demo
// ----------------------------------------------------------------------------

struct SyntheticCameraSource {
    config: CameraConfig,
    connected: bool,
    frame_count: u64,
}

impl SyntheticCameraSource {
    fn new(config: CameraConfig) -> Self {
        Self {
            config,
            connected: false,
            frame_count: 0,
        }
    }

    fn connect(&mut self) -> Result<()> {
        if self.config.device.strip_prefix("stub://") == Some("denied") {
            return Err(anyhow!("camera access denied by host"));
        }
        self.connected = true;
        log::info!(
            "CameraSource: connected to {} (synthetic, {}x{})",
            self.config.device,
            self.config.width,
            self.config.height
        );
        Ok(())
    }

    fn disconnect(&mut self) -> usize {
        if !self.connected {
            return 0;
        }
        self.connected = false;
        log::info!("CameraSource: stopped 1 track on {}", self.config.device);
        1
    }

    fn next_frame(&mut self) -> Result<VideoFrame> {
        if !self.connected {
            return Err(anyhow!("camera not connected"));
        }
        self.frame_count += 1;
        Ok(VideoFrame {
            width: self.config.width,
            height: self.config.height,
            data: self.generate_synthetic_pixels(),
        })
    }

    /// Deterministic gradient pattern; the frame counter shifts it so
    /// consecutive frames differ, like a live feed would.
    fn generate_synthetic_pixels(&self) -> Vec<u8> {
        let pixel_count = (self.config.width * self.config.height * 3) as usize; // RGB
        let mut pixels = vec![0u8; pixel_count];
        for (i, pixel) in pixels.iter_mut().enumerate() {
            *pixel = ((i as u64 / 3 + self.frame_count) % 256) as u8;
        }
        pixels
    }

    fn is_healthy(&self) -> bool {
        self.connected
    }

    fn stats(&self) -> CaptureStats {
        CaptureStats {
            device: self.config.device.clone(),
            frames_delivered: self.frame_count,
            tracks: usize::from(self.connected),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn stub_config() -> CameraConfig {
        CameraConfig {
            device: "stub://test".to_string(),
            ..CameraConfig::default()
        }
    }

    #[test]
    fn synthetic_source_produces_frames() -> Result<()> {
        let mut source = CameraSource::new(stub_config())?;
        source.connect()?;

        let frame = source.next_frame()?;
        assert_eq!(frame.width, 640);
        assert_eq!(frame.height, 360);
        assert_eq!(frame.data.len(), 640 * 360 * 3);

        Ok(())
    }

    #[test]
    fn denied_stub_fails_to_connect() -> Result<()> {
        let config = CameraConfig {
            device: "stub://denied".to_string(),
            ..CameraConfig::default()
        };
        let mut source = CameraSource::new(config)?;
        assert!(source.connect().is_err());
        assert!(!source.is_healthy());
        Ok(())
    }

    #[test]
    fn disconnect_stops_the_video_track_once() -> Result<()> {
        let mut source = CameraSource::new(stub_config())?;
        source.connect()?;
        assert_eq!(source.stats().tracks, 1);

        assert_eq!(source.disconnect(), 1);
        assert_eq!(source.stats().tracks, 0);
        assert_eq!(source.disconnect(), 0);
        Ok(())
    }

    #[test]
    fn frames_are_not_delivered_before_connect() -> Result<()> {
        let mut source = CameraSource::new(stub_config())?;
        assert!(source.next_frame().is_err());
        Ok(())
    }

    #[test]
    fn consecutive_frames_differ() -> Result<()> {
        let mut source = CameraSource::new(stub_config())?;
        source.connect()?;
        let first = source.next_frame()?;
        let second = source.next_frame()?;
        assert_ne!(first.data, second.data);
        Ok(())
    }
}
