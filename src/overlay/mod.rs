//! Overlay rendering.
//!
//! The renderer repaints a transparent drawing surface from the current
//! detection list: clear, then one rectangle + label-background + label-text
//! triple per record, in list order. Rendering is deterministic: the same
//! list and surface size always produce the same paint ops and pixels.
//!
//! `DrawSurface` is the seam between the render step and the output:
//! - `PixelSurface`: RGBA8 buffer, the real output path
//! - `RecordingSurface`: logs paint ops, used by tests and the demo's
//!   verify stage

mod renderer;
mod surface;

pub use renderer::{
    OverlayRenderer, LABEL_BAR_HEIGHT, LABEL_BG_COLOR, LABEL_FONT_SIZE, LABEL_TEXT_COLOR,
    STROKE_COLOR, STROKE_WIDTH,
};
pub use surface::{DrawSurface, PaintOp, PixelSurface, RecordingSurface};
