//! Coverage-mask rasterizer used by stroke and shape commands.
//!
//! Shapes are first accumulated into a [`Mask`] and then composited with a
//! single color, so overlapping parts of one stroke are painted once.
//! Integer coordinates address pixel centers.

use egui::{Pos2, Rect, Vec2};

use crate::color::Color;
use crate::pixel_buffer::PixelBuffer;

/// Smallest radius that still lights the pixel under a point
const MIN_RADIUS: f32 = 0.5;

/// Set of covered pixels, clipped to a buffer's bounds
#[derive(Debug, Clone)]
pub struct Mask {
    width: usize,
    height: usize,
    covered: Vec<bool>,
}

impl Mask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            covered: vec![false; width * height],
        }
    }

    pub fn for_buffer(buffer: &PixelBuffer) -> Self {
        Self::new(buffer.width(), buffer.height())
    }

    pub fn is_covered(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.covered[y * self.width + x]
    }

    pub fn covered_count(&self) -> usize {
        self.covered.iter().filter(|c| **c).count()
    }

    pub fn mark(&mut self, x: i64, y: i64) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.covered[y as usize * self.width + x as usize] = true;
        }
    }

    /// Visit every in-bounds pixel whose center lies in `[min, max]`
    fn for_each_in(&mut self, min: Pos2, max: Pos2, mut covers: impl FnMut(Pos2) -> bool) {
        let x0 = min.x.floor().max(0.0) as i64;
        let y0 = min.y.floor().max(0.0) as i64;
        let x1 = max.x.ceil().min(self.width as f32 - 1.0) as i64;
        let y1 = max.y.ceil().min(self.height as f32 - 1.0) as i64;
        for y in y0..=y1 {
            for x in x0..=x1 {
                if covers(Pos2::new(x as f32, y as f32)) {
                    self.mark(x, y);
                }
            }
        }
    }

    pub fn disc(&mut self, center: Pos2, radius: f32) {
        let r = radius.max(MIN_RADIUS);
        let extent = Vec2::splat(r);
        self.for_each_in(center - extent, center + extent, |p| p.distance(center) <= r);
    }

    /// Thick segment with round caps
    pub fn segment(&mut self, from: Pos2, to: Pos2, radius: f32) {
        let r = radius.max(MIN_RADIUS);
        let extent = Vec2::splat(r);
        let min = from.min(to) - extent;
        let max = from.max(to) + extent;
        self.for_each_in(min, max, |p| distance_to_segment(p, from, to) <= r);
    }

    /// Connected segments; a single point becomes a dot
    pub fn polyline(&mut self, points: &[Pos2], radius: f32) {
        match points {
            [] => {}
            [only] => self.disc(*only, radius),
            _ => {
                for pair in points.windows(2) {
                    self.segment(pair[0], pair[1], radius);
                }
            }
        }
    }

    /// Pixels with `min <= center < max`, like a canvas `fillRect`
    pub fn rect(&mut self, rect: Rect) {
        let x0 = rect.min.x.round() as i64;
        let y0 = rect.min.y.round() as i64;
        let x1 = rect.max.x.round() as i64;
        let y1 = rect.max.y.round() as i64;
        for y in y0.max(0)..y1.min(self.height as i64) {
            for x in x0.max(0)..x1.min(self.width as i64) {
                self.mark(x, y);
            }
        }
    }

    /// Square-cornered outline of `line_width` centered on the edges of `rect`
    pub fn rect_outline(&mut self, rect: Rect, line_width: f32) {
        let half = (line_width.max(1.0)) / 2.0;
        let outer = rect.expand(half);
        let inner = rect.shrink(half);
        let mut ring = Mask::new(self.width, self.height);
        ring.rect(outer);
        if inner.is_positive() {
            let mut hole = Mask::new(self.width, self.height);
            hole.rect(inner);
            for (r, h) in ring.covered.iter_mut().zip(hole.covered) {
                *r &= !h;
            }
        }
        self.union(&ring);
    }

    /// Dashed outline: `dash` drawn, `gap` skipped, continuing around corners
    pub fn dashed_rect_outline(&mut self, rect: Rect, line_width: f32, dash: f32, gap: f32) {
        let corners = [
            rect.left_top(),
            rect.right_top(),
            rect.right_bottom(),
            rect.left_bottom(),
            rect.left_top(),
        ];
        let radius = line_width.max(1.0) / 2.0;
        let period = dash + gap;
        let mut travelled = 0.0f32;
        for edge in corners.windows(2) {
            let (a, b) = (edge[0], edge[1]);
            let length = a.distance(b);
            if length == 0.0 {
                continue;
            }
            let dir = (b - a) / length;
            let mut t = 0.0f32;
            while t < length {
                let phase = (travelled + t) % period;
                let step = if phase < dash { dash - phase } else { period - phase };
                let end = (t + step).min(length);
                if phase < dash {
                    self.segment(a + dir * t, a + dir * end, radius);
                }
                t = end;
            }
            travelled += length;
        }
    }

    pub fn union(&mut self, other: &Mask) {
        for (mine, theirs) in self.covered.iter_mut().zip(&other.covered) {
            *mine |= *theirs;
        }
    }

    /// Keep only covered pixels for which `keep(x, y)` holds
    pub fn retain(&mut self, mut keep: impl FnMut(usize, usize) -> bool) {
        let width = self.width;
        for (i, c) in self.covered.iter_mut().enumerate() {
            if *c && !keep(i % width, i / width) {
                *c = false;
            }
        }
    }

    /// Composite `color` once onto every covered pixel
    pub fn paint(&self, buffer: &mut PixelBuffer, color: Color) {
        for (i, covered) in self.covered.iter().enumerate() {
            if *covered {
                buffer.blend((i % self.width) as i64, (i / self.width) as i64, color);
            }
        }
    }
}

pub fn distance_to_segment(point: Pos2, start: Pos2, end: Pos2) -> f32 {
    let line = end - start;
    let length_sq = line.length_sq();
    if length_sq == 0.0 {
        return point.distance(start);
    }
    let t = ((point - start).dot(line) / length_sq).clamp(0.0, 1.0);
    point.distance(start + line * t)
}

/// Points every `spacing` pixels along the polyline, endpoints included
pub fn resample_path(points: &[Pos2], spacing: f32) -> Vec<Pos2> {
    let spacing = spacing.max(0.1);
    let mut out = Vec::new();
    if let Some(first) = points.first() {
        out.push(*first);
    }
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let length = a.distance(b);
        let steps = (length / spacing).floor() as usize;
        for i in 1..=steps {
            out.push(a + (b - a) * (i as f32 * spacing / length));
        }
        if out.last() != Some(&b) {
            out.push(b);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn horizontal_hairline_is_one_pixel_tall() {
        let mut mask = Mask::new(10, 10);
        mask.segment(pos2(1.0, 5.0), pos2(8.0, 5.0), 0.5);
        assert!(mask.is_covered(1, 5));
        assert!(mask.is_covered(8, 5));
        assert!(!mask.is_covered(4, 4));
        assert!(!mask.is_covered(4, 6));
        assert_eq!(mask.covered_count(), 8);
    }

    #[test]
    fn rect_is_half_open() {
        let mut mask = Mask::new(10, 10);
        mask.rect(Rect::from_min_max(pos2(0.0, 0.0), pos2(5.0, 5.0)));
        assert!(mask.is_covered(0, 0));
        assert!(mask.is_covered(4, 4));
        assert!(!mask.is_covered(5, 5));
        assert_eq!(mask.covered_count(), 25);
    }

    #[test]
    fn outline_leaves_interior_empty() {
        let mut mask = Mask::new(20, 20);
        mask.rect_outline(Rect::from_min_max(pos2(2.0, 2.0), pos2(12.0, 12.0)), 2.0);
        assert!(mask.is_covered(2, 6));
        assert!(!mask.is_covered(7, 7));
    }

    #[test]
    fn dashed_outline_has_gaps() {
        let mut mask = Mask::new(60, 10);
        mask.dashed_rect_outline(Rect::from_min_max(pos2(0.0, 2.0), pos2(50.0, 8.0)), 1.0, 5.0, 15.0);
        assert!(mask.is_covered(2, 2));
        assert!(!mask.is_covered(12, 2));
        assert!(mask.is_covered(22, 2));
    }

    #[test]
    fn painting_twice_is_stable_for_opaque_colors() {
        let mut mask = Mask::new(8, 8);
        mask.polyline(&[pos2(1.0, 1.0), pos2(6.0, 6.0), pos2(1.0, 6.0)], 1.0);
        let mut once = PixelBuffer::filled(8, 8, Color::WHITE).unwrap();
        mask.paint(&mut once, Color::BLACK);
        let mut twice = once.clone();
        mask.paint(&mut twice, Color::BLACK);
        assert_eq!(once, twice);
    }

    #[test]
    fn resample_keeps_endpoints() {
        let path = resample_path(&[pos2(0.0, 0.0), pos2(10.0, 0.0)], 5.0);
        assert_eq!(path, vec![pos2(0.0, 0.0), pos2(5.0, 0.0), pos2(10.0, 0.0)]);
    }
}
