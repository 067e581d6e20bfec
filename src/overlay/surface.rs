//! Drawing surfaces.
//!
//! A `DrawSurface` is a 2D immediate-mode target for the overlay renderer.
//! Colors are RGBA; coordinates are pixels with the origin at the top-left.
//! Shapes that fall partly outside the surface are clipped, never an error.

use ab_glyph::{FontArc, PxScale};
use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

/// Immediate-mode drawing target.
pub trait DrawSurface {
    fn dimensions(&self) -> (u32, u32);

    /// Clear the entire surface back to transparent.
    fn clear(&mut self);

    /// Unfilled rectangle with the given stroke width (drawn inward).
    fn stroke_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: [u8; 4],
        stroke_width: u32,
    );

    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: [u8; 4]);

    /// Text anchored at a baseline point, like canvas `fillText`.
    fn fill_text(&mut self, text: &str, x: i32, y: i32, color: [u8; 4], size: f32);
}

/// One recorded paint operation.
#[derive(Clone, Debug, PartialEq)]
pub enum PaintOp {
    Clear {
        width: u32,
        height: u32,
    },
    StrokeRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: [u8; 4],
        stroke_width: u32,
    },
    FillRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: [u8; 4],
    },
    FillText {
        text: String,
        x: i32,
        y: i32,
        color: [u8; 4],
        size: f32,
    },
}

// ----------------------------------------------------------------------------
// RecordingSurface: paint-op log for tests and verification
// ----------------------------------------------------------------------------

/// Surface that records paint ops instead of producing pixels.
///
/// Clones share the same op log, so a test can keep a handle while the
/// viewer owns the surface as a `Box<dyn DrawSurface>`.
#[derive(Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    ops: Rc<RefCell<Vec<PaintOp>>>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Snapshot of all ops recorded so far.
    pub fn ops(&self) -> Vec<PaintOp> {
        self.ops.borrow().clone()
    }

    pub fn op_count(&self) -> usize {
        self.ops.borrow().len()
    }

    pub fn reset(&self) {
        self.ops.borrow_mut().clear();
    }
}

impl DrawSurface for RecordingSurface {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.ops.borrow_mut().push(PaintOp::Clear {
            width: self.width,
            height: self.height,
        });
    }

    fn stroke_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: [u8; 4],
        stroke_width: u32,
    ) {
        self.ops.borrow_mut().push(PaintOp::StrokeRect {
            x,
            y,
            width,
            height,
            color,
            stroke_width,
        });
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: [u8; 4]) {
        self.ops.borrow_mut().push(PaintOp::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, x: i32, y: i32, color: [u8; 4], size: f32) {
        self.ops.borrow_mut().push(PaintOp::FillText {
            text: text.to_string(),
            x,
            y,
            color,
            size,
        });
    }
}

// ----------------------------------------------------------------------------
// PixelSurface: RGBA8 buffer
// ----------------------------------------------------------------------------

/// RGBA8 pixel surface backed by an `image::RgbaImage`.
///
/// Starts fully transparent, so the overlay composites over a video frame.
/// Label text needs a font; without one, text paints are a silent no-op and
/// the boxes and label bars still render.
pub struct PixelSurface {
    image: RgbaImage,
    font: Option<FontArc>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            font: None,
        }
    }

    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    /// Load a TrueType/OpenType font for label text.
    pub fn load_font(path: &Path) -> Result<FontArc> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read font file {}", path.display()))?;
        FontArc::try_from_vec(bytes)
            .with_context(|| format!("parse font file {}", path.display()))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl DrawSurface for PixelSurface {
    fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
    }

    fn stroke_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: [u8; 4],
        stroke_width: u32,
    ) {
        for t in 0..stroke_width.min(i32::MAX as u32) as i32 {
            let inner_w = width as i64 - 2 * t as i64;
            let inner_h = height as i64 - 2 * t as i64;
            if inner_w < 1 || inner_h < 1 {
                break;
            }
            let rect = Rect::at(x + t, y + t).of_size(inner_w as u32, inner_h as u32);
            draw_hollow_rect_mut(&mut self.image, rect, Rgba(color));
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: [u8; 4]) {
        if width == 0 || height == 0 {
            return;
        }
        let rect = Rect::at(x, y).of_size(width, height);
        draw_filled_rect_mut(&mut self.image, rect, Rgba(color));
    }

    fn fill_text(&mut self, text: &str, x: i32, y: i32, color: [u8; 4], size: f32) {
        let Some(font) = &self.font else {
            return;
        };
        // Baseline anchor to top-left; the glyph ascent is close to the
        // nominal size at these scales.
        let top = y - size as i32;
        draw_text_mut(
            &mut self.image,
            Rgba(color),
            x,
            top,
            PxScale::from(size),
            font,
            text,
        );
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
