use egui::Pos2;
use log::{debug, info};

use super::matcher::{ColorMatcher, Tolerance};
use crate::color::Color;
use crate::error::FillError;
use crate::pixel_buffer::PixelBuffer;

/// Which pixels a paint bucket click replaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FillMode {
    /// Only pixels 4-connected to the seed
    Contiguous,
    /// Every matching pixel in the buffer
    NonContiguous,
}

/// Stateless flood fill over a [`PixelBuffer`].
///
/// Both modes work on a copy of the input and return it; the caller blits
/// the result in one step, so a failed fill never touches the live buffer.
#[derive(Debug, Clone, Copy)]
pub struct FloodFillEngine {
    matcher: ColorMatcher,
    fill_color: Color,
}

impl FloodFillEngine {
    pub fn new(fill_color: Color, tolerance: Tolerance) -> Self {
        Self {
            matcher: ColorMatcher::new(tolerance),
            fill_color,
        }
    }

    pub fn fill(&self, buffer: &PixelBuffer, seed: Pos2, mode: FillMode) -> Result<PixelBuffer, FillError> {
        match mode {
            FillMode::Contiguous => self.fill_contiguous(buffer, seed),
            FillMode::NonContiguous => self.fill_non_contiguous(buffer, seed),
        }
    }

    /// Replace every pixel matching the seed's color, connected or not
    pub fn fill_non_contiguous(&self, buffer: &PixelBuffer, seed: Pos2) -> Result<PixelBuffer, FillError> {
        let (sx, sy) = seed_pixel(buffer, seed)?;
        let reference = buffer.get(sx, sy)?;

        let mut work = buffer.clone();
        let mut filled = 0usize;
        for pixel in 0..work.pixel_count() {
            if self.matcher.matches(reference, work.pixel_at(pixel)) {
                work.set_pixel_at(pixel, self.fill_color);
                filled += 1;
            }
        }

        info!("🪣 Non-contiguous fill at ({sx}, {sy}) replaced {filled} pixels");
        Ok(work)
    }

    /// Stack-based scanline fill of the region 4-connected to `seed`
    pub fn fill_contiguous(&self, buffer: &PixelBuffer, seed: Pos2) -> Result<PixelBuffer, FillError> {
        let (sx, sy) = seed_pixel(buffer, seed)?;
        let reference = buffer.get(sx, sy)?;
        let mut work = buffer.clone();

        // Also guarantees termination: filled pixels can never match the reference again
        if self.matcher.matches(reference, self.fill_color) {
            debug!("Seed ({sx}, {sy}) already matches the fill color, nothing to do");
            return Ok(work);
        }

        let (width, height) = work.dimensions();
        let matches_at = |work: &PixelBuffer, x: usize, y: usize| {
            self.matcher.matches(reference, work.pixel_at(y * width + x))
        };

        let mut stack = vec![(sx, sy)];
        let mut filled = 0usize;
        while let Some((x, mut y)) = stack.pop() {
            if !matches_at(&work, x, y) {
                continue;
            }

            // Topmost matching pixel of this column run
            while y > 0 && matches_at(&work, x, y - 1) {
                y -= 1;
            }

            let mut left_open = false;
            let mut right_open = false;
            while y < height && matches_at(&work, x, y) {
                work.set_pixel_at(y * width + x, self.fill_color);
                filled += 1;

                if x > 0 {
                    if matches_at(&work, x - 1, y) {
                        if !left_open {
                            stack.push((x - 1, y));
                            left_open = true;
                        }
                    } else {
                        left_open = false;
                    }
                }

                if x + 1 < width {
                    if matches_at(&work, x + 1, y) {
                        if !right_open {
                            stack.push((x + 1, y));
                            right_open = true;
                        }
                    } else {
                        right_open = false;
                    }
                }

                y += 1;
            }
        }

        info!("🪣 Contiguous fill at ({sx}, {sy}) replaced {filled} pixels");
        Ok(work)
    }
}

/// Convert a seed position into pixel coordinates, rejecting anything off-canvas
fn seed_pixel(buffer: &PixelBuffer, seed: Pos2) -> Result<(usize, usize), FillError> {
    let (width, height) = buffer.dimensions();
    let invalid = || FillError::InvalidSeed {
        x: seed.x,
        y: seed.y,
        width,
        height,
    };

    if !seed.x.is_finite() || !seed.y.is_finite() || seed.x < 0.0 || seed.y < 0.0 {
        return Err(invalid());
    }
    let (x, y) = (seed.x.floor() as usize, seed.y.floor() as usize);
    if x >= width || y >= height {
        return Err(invalid());
    }
    Ok((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn engine(color: Color, tolerance: f32) -> FloodFillEngine {
        FloodFillEngine::new(color, Tolerance::new(tolerance))
    }

    #[test]
    fn seed_outside_is_rejected() {
        let buffer = PixelBuffer::filled(4, 4, Color::WHITE).unwrap();
        let bucket = engine(Color::RED, 0.0);

        for seed in [pos2(-1.0, 0.0), pos2(4.0, 0.0), pos2(0.0, 4.5), pos2(f32::NAN, 1.0)] {
            for mode in [FillMode::Contiguous, FillMode::NonContiguous] {
                assert!(matches!(
                    bucket.fill(&buffer, seed, mode),
                    Err(FillError::InvalidSeed { .. })
                ));
            }
        }
    }

    #[test]
    fn contiguous_fill_reaches_edges() {
        let buffer = PixelBuffer::filled(3, 5, Color::WHITE).unwrap();
        let result = engine(Color::RED, 0.0)
            .fill_contiguous(&buffer, pos2(1.0, 1.0))
            .unwrap();
        for y in 0..5 {
            for x in 0..3 {
                assert_eq!(result.get(x, y).unwrap(), Color::RED, "({x}, {y})");
            }
        }
    }

    #[test]
    fn contiguous_fill_stops_at_walls() {
        // Vertical black wall at x == 2 splits a 5x3 buffer
        let mut buffer = PixelBuffer::filled(5, 3, Color::WHITE).unwrap();
        for y in 0..3 {
            buffer.set(2, y, Color::BLACK).unwrap();
        }
        let result = engine(Color::RED, 0.0)
            .fill_contiguous(&buffer, pos2(0.0, 0.0))
            .unwrap();

        assert_eq!(result.get(1, 2).unwrap(), Color::RED);
        assert_eq!(result.get(2, 1).unwrap(), Color::BLACK);
        assert_eq!(result.get(3, 0).unwrap(), Color::WHITE);
    }

    #[test]
    fn contiguous_fill_follows_winding_paths() {
        // A U-shaped corridor: the fill must travel down, across and back up
        let rows = ["#.#.#", "#.#.#", "#...#", "#####"];
        let mut buffer = PixelBuffer::filled(5, 4, Color::WHITE).unwrap();
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    buffer.set(x, y, Color::BLACK).unwrap();
                }
            }
        }

        let result = engine(Color::RED, 0.0)
            .fill_contiguous(&buffer, pos2(1.0, 0.0))
            .unwrap();
        assert_eq!(result.get(3, 0).unwrap(), Color::RED);
        assert_eq!(result.get(2, 2).unwrap(), Color::RED);
        assert_eq!(result.get(0, 0).unwrap(), Color::BLACK);
    }

    #[test]
    fn tolerance_widens_the_region() {
        let mut buffer = PixelBuffer::filled(3, 1, Color::WHITE).unwrap();
        buffer.set(1, 0, Color::rgb(240, 240, 240)).unwrap();
        buffer.set(2, 0, Color::WHITE).unwrap();

        let strict = engine(Color::RED, 0.0)
            .fill_contiguous(&buffer, pos2(0.0, 0.0))
            .unwrap();
        assert_eq!(strict.get(2, 0).unwrap(), Color::WHITE);

        let loose = engine(Color::RED, 10.0)
            .fill_contiguous(&buffer, pos2(0.0, 0.0))
            .unwrap();
        assert_eq!(loose.get(2, 0).unwrap(), Color::RED);
    }

    #[test]
    fn already_filled_region_is_unchanged() {
        let buffer = PixelBuffer::filled(6, 6, Color::RED).unwrap();
        let result = engine(Color::RED, 0.0)
            .fill_contiguous(&buffer, pos2(2.0, 2.0))
            .unwrap();
        assert_eq!(result, buffer);
    }

    #[test]
    fn input_buffer_is_never_modified() {
        let buffer = PixelBuffer::filled(4, 4, Color::WHITE).unwrap();
        let snapshot = buffer.clone();
        let filled = engine(Color::RED, 0.0).fill_non_contiguous(&buffer, pos2(1.0, 1.0));
        assert!(filled.is_ok());
        assert_eq!(buffer, snapshot);
    }
}
