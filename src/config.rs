use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::capture::CameraConfig;

const DEFAULT_CAMERA_DEVICE: &str = "stub://front_camera";
const DEFAULT_CAMERA_FPS: u32 = 30;
const DEFAULT_CAMERA_WIDTH: u32 = 640;
const DEFAULT_CAMERA_HEIGHT: u32 = 360;
const DEFAULT_OVERLAY_WIDTH: u32 = 640;
const DEFAULT_OVERLAY_HEIGHT: u32 = 360;
const DEFAULT_REPAINT_INTERVAL_MS: u64 = 100;

#[derive(Debug, Deserialize, Default)]
struct ViewerConfigFile {
    camera: Option<CameraConfigFile>,
    overlay: Option<OverlayConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct CameraConfigFile {
    device: Option<String>,
    target_fps: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct OverlayConfigFile {
    width: Option<u32>,
    height: Option<u32>,
    interval_ms: Option<u64>,
    font_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub camera: CameraConfig,
    pub overlay: OverlaySettings,
}

#[derive(Debug, Clone)]
pub struct OverlaySettings {
    pub width: u32,
    pub height: u32,
    pub interval: Duration,
    pub font_path: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self::from_file(ViewerConfigFile::default())
    }
}

impl ViewerConfig {
    /// Load from the file named by `VIEWER_CONFIG` (JSON, all fields
    /// optional), then apply env overrides, then validate. With neither
    /// file nor env the defaults stand.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("VIEWER_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: ViewerConfigFile) -> Self {
        let camera = CameraConfig {
            device: file
                .camera
                .as_ref()
                .and_then(|camera| camera.device.clone())
                .unwrap_or_else(|| DEFAULT_CAMERA_DEVICE.to_string()),
            target_fps: file
                .camera
                .as_ref()
                .and_then(|camera| camera.target_fps)
                .unwrap_or(DEFAULT_CAMERA_FPS),
            width: file
                .camera
                .as_ref()
                .and_then(|camera| camera.width)
                .unwrap_or(DEFAULT_CAMERA_WIDTH),
            height: file
                .camera
                .and_then(|camera| camera.height)
                .unwrap_or(DEFAULT_CAMERA_HEIGHT),
        };
        let overlay = OverlaySettings {
            width: file
                .overlay
                .as_ref()
                .and_then(|overlay| overlay.width)
                .unwrap_or(DEFAULT_OVERLAY_WIDTH),
            height: file
                .overlay
                .as_ref()
                .and_then(|overlay| overlay.height)
                .unwrap_or(DEFAULT_OVERLAY_HEIGHT),
            interval: Duration::from_millis(
                file.overlay
                    .as_ref()
                    .and_then(|overlay| overlay.interval_ms)
                    .unwrap_or(DEFAULT_REPAINT_INTERVAL_MS),
            ),
            font_path: file.overlay.and_then(|overlay| overlay.font_path),
        };
        Self { camera, overlay }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(device) = std::env::var("VIEWER_CAMERA_DEVICE") {
            if !device.trim().is_empty() {
                self.camera.device = device;
            }
        }
        if let Ok(fps) = std::env::var("VIEWER_CAMERA_FPS") {
            let fps: u32 = fps
                .parse()
                .map_err(|_| anyhow!("VIEWER_CAMERA_FPS must be an integer"))?;
            self.camera.target_fps = fps;
        }
        if let Ok(interval) = std::env::var("VIEWER_OVERLAY_INTERVAL_MS") {
            let ms: u64 = interval.parse().map_err(|_| {
                anyhow!("VIEWER_OVERLAY_INTERVAL_MS must be an integer number of milliseconds")
            })?;
            self.overlay.interval = Duration::from_millis(ms);
        }
        if let Ok(path) = std::env::var("VIEWER_FONT_PATH") {
            if !path.trim().is_empty() {
                self.overlay.font_path = Some(PathBuf::from(path));
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.camera.target_fps == 0 {
            return Err(anyhow!("camera target_fps must be >= 1"));
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(anyhow!("camera dimensions must be non-zero"));
        }
        if self.overlay.width == 0 || self.overlay.height == 0 {
            return Err(anyhow!("overlay dimensions must be non-zero"));
        }
        if self.overlay.interval.is_zero() {
            return Err(anyhow!("overlay interval must be greater than zero"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<ViewerConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
