//! Detection records and the mock detection set.
//!
//! A `DetectionRecord` is one reported object for the current frame: a
//! bounding box in surface pixel coordinates, a category label, and a
//! confidence score. The viewer treats the list as immutable: it is built
//! once at startup and never touched by any detection process, because no
//! detection process exists in this demo.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// One reported object in the current frame.
///
/// Coordinates are pixel units in the drawing surface's coordinate space,
/// with (x, y) the top-left corner of the bounding box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    /// Unique within the current list, stable while the list is unchanged.
    pub id: u32,
    /// Human-readable category name ("Person", "Car", ...).
    pub label: String,
    /// Confidence in 0..=1.
    pub confidence: f32,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl DetectionRecord {
    pub fn new(
        id: u32,
        label: &str,
        confidence: f32,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let record = Self {
            id,
            label: label.to_string(),
            confidence,
            x,
            y,
            width,
            height,
        };
        record.validate()?;
        Ok(record)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(anyhow!(
                "detection {}: confidence out of bounds: {}",
                self.id,
                self.confidence
            ));
        }
        validate_label(&self.label)?;
        if self.width == 0 || self.height == 0 {
            return Err(anyhow!(
                "detection {}: bounding box must have non-zero size",
                self.id
            ));
        }
        Ok(())
    }

    /// Confidence as an integer percentage, rounded to nearest.
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }

    /// Text painted into the label bar, e.g. "Person 95%".
    pub fn display_label(&self) -> String {
        format!("{} {}%", self.label, self.confidence_percent())
    }
}

/// A conforming label is a short human-readable category name.
///
/// Allowed: "Person", "Traffic light", "fire_hydrant"
/// Disallowed: empty strings, control characters, punctuation outside [ _-].
pub fn validate_label(label: &str) -> Result<()> {
    // Compile once for hot paths.
    static LABEL_RE: OnceLock<regex::Regex> = OnceLock::new();
    let re = LABEL_RE
        .get_or_init(|| regex::Regex::new(r"^[A-Za-z][A-Za-z0-9 _-]{0,63}$").unwrap());

    if !re.is_match(label) {
        return Err(anyhow!(
            "label must match ^[A-Za-z][A-Za-z0-9 _-]{{0,63}}$, got {:?}",
            label
        ));
    }
    Ok(())
}

/// Validate a whole list: per-record bounds plus id uniqueness.
pub fn validate_detections(records: &[DetectionRecord]) -> Result<()> {
    let mut seen = HashSet::new();
    for record in records {
        record.validate()?;
        if !seen.insert(record.id) {
            return Err(anyhow!("duplicate detection id {}", record.id));
        }
    }
    Ok(())
}

/// The static mock set shown by the demo page.
///
/// Built once at startup and never mutated afterwards.
pub fn demo_detections() -> Vec<DetectionRecord> {
    vec![
        DetectionRecord {
            id: 1,
            label: "Person".to_string(),
            confidence: 0.95,
            x: 120,
            y: 80,
            width: 60,
            height: 120,
        },
        DetectionRecord {
            id: 2,
            label: "Car".to_string(),
            confidence: 0.87,
            x: 300,
            y: 200,
            width: 100,
            height: 60,
        },
        DetectionRecord {
            id: 3,
            label: "Bicycle".to_string(),
            confidence: 0.73,
            x: 50,
            y: 180,
            width: 40,
            height: 80,
        },
    ]
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
