use egui::{Pos2, Rect, Vec2, pos2, vec2};

use crate::pixel_buffer::PixelBuffer;
use crate::raster::{Mask, resample_path};
use crate::settings::{
    BrushSettings, PencilSettings, PlumeSettings, RectangleSettings, RectangleStyle, SpraySettings,
};

/// Distance between two brush stamps
const BRUSH_STAMP_SPACING: f32 = 5.0;
/// Distance between two nib positions of the plume
const PLUME_STEP: f32 = 1.0;
const DASH_LENGTH: f32 = 5.0;
const DASH_GAP: f32 = 15.0;

pub(super) fn pencil(buffer: &mut PixelBuffer, settings: &PencilSettings, points: &[Pos2]) {
    let mut mask = Mask::for_buffer(buffer);
    mask.polyline(points, settings.line_width / 2.0);
    mask.paint(buffer, settings.color);
}

pub(super) fn brush(buffer: &mut PixelBuffer, settings: &BrushSettings, points: &[Pos2]) {
    let side = settings.line_width.max(1.0);
    let half = Vec2::splat(side / 2.0);

    let mut mask = Mask::for_buffer(buffer);
    for center in resample_path(points, BRUSH_STAMP_SPACING) {
        mask.rect(Rect::from_min_size(center - half, Vec2::splat(side)));
    }
    let texture = settings.texture;
    mask.retain(|x, y| texture.covers(x, y));
    mask.paint(buffer, settings.color);
}

pub(super) fn plume(buffer: &mut PixelBuffer, settings: &PlumeSettings, points: &[Pos2]) {
    let angle = settings.angle_degrees.to_radians();
    let nib = vec2(angle.cos(), angle.sin()) * (settings.line_length / 2.0);

    let mut mask = Mask::for_buffer(buffer);
    for center in resample_path(points, PLUME_STEP) {
        mask.segment(center - nib, center + nib, settings.line_width / 2.0);
    }
    mask.paint(buffer, settings.color);
}

/// One mask per burst: droplets of a burst blend once, overlapping bursts stack
pub(super) fn spray(buffer: &mut PixelBuffer, settings: &SpraySettings, bursts: &[Vec<Pos2>]) {
    for burst in bursts {
        let mut mask = Mask::for_buffer(buffer);
        for droplet in burst {
            mask.disc(*droplet, settings.droplet_radius);
        }
        mask.paint(buffer, settings.color);
    }
}

/// Width and height of the dragged rectangle, squared on the shorter side if asked
pub(crate) fn rectangle_extent(start: Pos2, end: Pos2, square: bool) -> Vec2 {
    let mut width = end.x - start.x;
    let mut height = end.y - start.y;
    if square {
        let side = width.abs().min(height.abs());
        width = side * width.signum();
        height = side * height.signum();
    }
    vec2(width, height)
}

pub(super) fn rectangle(
    buffer: &mut PixelBuffer,
    settings: &RectangleSettings,
    start: Pos2,
    end: Pos2,
    square: bool,
) {
    let extent = rectangle_extent(start, end, square);
    let fill_rect = Rect::from_two_pos(start, start + extent);

    // Contours are pulled inward by half a line so the stroke stays inside the drag
    let inset = vec2(
        settings.line_width / 2.0 * extent.x.signum(),
        settings.line_width / 2.0 * extent.y.signum(),
    );
    let contour_rect = Rect::from_two_pos(start, pos2(start.x + extent.x - inset.x, start.y + extent.y - inset.y));

    if matches!(settings.style, RectangleStyle::Filled | RectangleStyle::FilledContour) {
        let mut fill = Mask::for_buffer(buffer);
        fill.rect(fill_rect);
        fill.paint(buffer, settings.primary);
    }

    if matches!(settings.style, RectangleStyle::Empty | RectangleStyle::FilledContour) {
        let mut contour = Mask::for_buffer(buffer);
        if settings.line_dash {
            contour.dashed_rect_outline(contour_rect, settings.line_width, DASH_LENGTH, DASH_GAP);
        } else {
            contour.rect_outline(contour_rect, settings.line_width);
        }
        contour.paint(buffer, settings.secondary);
    }
}
