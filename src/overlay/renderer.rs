//! The overlay render step.

use crate::detections::DetectionRecord;

use super::surface::DrawSurface;

/// Bounding box stroke, amber.
pub const STROKE_COLOR: [u8; 4] = [0xf5, 0x9e, 0x0b, 0xff];
pub const STROKE_WIDTH: u32 = 2;

/// Label bar fill, dark cyan.
pub const LABEL_BG_COLOR: [u8; 4] = [0x16, 0x4e, 0x63, 0xff];
pub const LABEL_TEXT_COLOR: [u8; 4] = [0xff, 0xff, 0xff, 0xff];
pub const LABEL_FONT_SIZE: f32 = 14.0;

/// Label bar sits immediately above the box, this tall.
pub const LABEL_BAR_HEIGHT: u32 = 25;

/// Bar width is proportional to the category name length plus padding.
const LABEL_CHAR_WIDTH: u32 = 8;
const LABEL_BAR_PAD: u32 = 20;

/// Text inset from the bar's left edge, and baseline rise above the box top.
const LABEL_TEXT_INSET_X: i32 = 5;
const LABEL_BASELINE_RISE: i32 = 8;

/// Paints the detection list onto a surface.
///
/// One repaint is: clear the whole surface, then for each record in list
/// order an unfilled box, a filled label bar above it, and the label text.
/// Pure over its inputs; repainting the same list is pixel-identical.
#[derive(Debug, Default)]
pub struct OverlayRenderer;

impl OverlayRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, surface: &mut dyn DrawSurface, detections: &[DetectionRecord]) {
        surface.clear();

        for record in detections {
            surface.stroke_rect(
                record.x,
                record.y,
                record.width,
                record.height,
                STROKE_COLOR,
                STROKE_WIDTH,
            );
            surface.fill_rect(
                record.x,
                record.y - LABEL_BAR_HEIGHT as i32,
                label_bar_width(&record.label),
                LABEL_BAR_HEIGHT,
                LABEL_BG_COLOR,
            );
            surface.fill_text(
                &record.display_label(),
                record.x + LABEL_TEXT_INSET_X,
                record.y - LABEL_BASELINE_RISE,
                LABEL_TEXT_COLOR,
                LABEL_FONT_SIZE,
            );
        }
    }
}

/// Bar width for a category name; sized from the name alone, the painted
/// text appends the confidence after the fact.
pub fn label_bar_width(label: &str) -> u32 {
    label.len() as u32 * LABEL_CHAR_WIDTH + LABEL_BAR_PAD
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detections::demo_detections;
    use crate::overlay::surface::{PaintOp, PixelSurface, RecordingSurface};
    use anyhow::Result;

    fn render_recorded(detections: &[DetectionRecord]) -> Vec<PaintOp> {
        let recording = RecordingSurface::new(640, 360);
        let mut surface: Box<dyn DrawSurface> = Box::new(recording.clone());
        OverlayRenderer::new().render(surface.as_mut(), detections);
        recording.ops()
    }

    #[test]
    fn repaint_is_one_clear_then_one_triple_per_record() {
        let detections = demo_detections();
        let ops = render_recorded(&detections);

        assert_eq!(ops.len(), 1 + detections.len() * 3);
        assert_eq!(
            ops[0],
            PaintOp::Clear {
                width: 640,
                height: 360
            }
        );
        for (i, record) in detections.iter().enumerate() {
            let triple = &ops[1 + i * 3..1 + i * 3 + 3];
            assert!(
                matches!(triple[0], PaintOp::StrokeRect { x, y, .. } if x == record.x && y == record.y)
            );
            assert!(matches!(triple[1], PaintOp::FillRect { .. }));
            assert!(
                matches!(&triple[2], PaintOp::FillText { text, .. } if *text == record.display_label())
            );
        }
    }

    #[test]
    fn empty_list_clears_and_draws_nothing() {
        let ops = render_recorded(&[]);
        assert_eq!(
            ops,
            vec![PaintOp::Clear {
                width: 640,
                height: 360
            }]
        );
    }

    #[test]
    fn scenario_person_record_paints_expected_ops() -> Result<()> {
        let record = DetectionRecord::new(1, "Person", 0.95, 120, 80, 60, 120)?;
        let ops = render_recorded(std::slice::from_ref(&record));

        assert_eq!(
            ops[1],
            PaintOp::StrokeRect {
                x: 120,
                y: 80,
                width: 60,
                height: 120,
                color: STROKE_COLOR,
                stroke_width: STROKE_WIDTH,
            }
        );
        assert_eq!(
            ops[2],
            PaintOp::FillRect {
                x: 120,
                y: 80 - LABEL_BAR_HEIGHT as i32,
                width: label_bar_width("Person"),
                height: LABEL_BAR_HEIGHT,
                color: LABEL_BG_COLOR,
            }
        );
        assert_eq!(
            ops[3],
            PaintOp::FillText {
                text: "Person 95%".to_string(),
                x: 125,
                y: 72,
                color: LABEL_TEXT_COLOR,
                size: LABEL_FONT_SIZE,
            }
        );
        Ok(())
    }

    #[test]
    fn label_bar_is_sized_from_the_category_name() {
        assert_eq!(label_bar_width("Person"), 6 * 8 + 20);
        assert_eq!(label_bar_width("Car"), 3 * 8 + 20);
    }

    #[test]
    fn repaints_are_pixel_identical() {
        let detections = demo_detections();
        let renderer = OverlayRenderer::new();

        let mut first = PixelSurface::new(640, 360);
        let mut second = PixelSurface::new(640, 360);
        renderer.render(&mut first, &detections);
        renderer.render(&mut second, &detections);
        assert_eq!(first.image().as_raw(), second.image().as_raw());

        // A repaint over an already-painted surface is also identical.
        renderer.render(&mut second, &detections);
        assert_eq!(first.image().as_raw(), second.image().as_raw());
    }

    #[test]
    fn boxes_land_on_the_pixel_surface() {
        let detections = demo_detections();
        let mut surface = PixelSurface::new(640, 360);
        OverlayRenderer::new().render(&mut surface, &detections);

        // Top-left corner of the Person box.
        assert_eq!(surface.image().get_pixel(120, 80).0, STROKE_COLOR);
        // Inside the Person label bar.
        assert_eq!(surface.image().get_pixel(130, 70).0, LABEL_BG_COLOR);
    }
}
