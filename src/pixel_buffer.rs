//! RGBA raster owned by a drawing surface.
//!
//! Pixels are stored row-major with 4 bytes per pixel, origin top-left.
//! The byte length is always `width * height * 4`.

use egui::ColorImage;
use image::RgbaImage;
use image::imageops::{self, FilterType};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::BufferError;

pub const BYTES_PER_PIXEL: usize = 4;

/// How a buffer is re-sampled when it changes size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Resample {
    /// Keep the old pixels anchored top-left, pad new area with a color
    Crop { fill: Color },
    /// Stretch the old pixels to the new size
    Scale { smooth: bool },
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPixelBuffer")]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

/// Unvalidated mirror used to check the length invariant on deserialize
#[derive(Deserialize)]
struct RawPixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl TryFrom<RawPixelBuffer> for PixelBuffer {
    type Error = BufferError;

    fn try_from(raw: RawPixelBuffer) -> Result<Self, Self::Error> {
        PixelBuffer::from_raw(raw.width, raw.height, raw.data)
    }
}

// Dumping megabytes of pixel data is never useful in logs
impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl PixelBuffer {
    /// Create a buffer of transparent black pixels
    pub fn new(width: usize, height: usize) -> Result<Self, BufferError> {
        Self::filled(width, height, Color::TRANSPARENT)
    }

    /// Create a buffer where every pixel is `color`
    pub fn filled(width: usize, height: usize, color: Color) -> Result<Self, BufferError> {
        if width == 0 || height == 0 {
            return Err(BufferError::InvalidDimensions { width, height });
        }
        let data = color.to_array().repeat(width * height);
        Ok(Self { width, height, data })
    }

    /// Wrap existing RGBA bytes
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, BufferError> {
        if width == 0 || height == 0 {
            return Err(BufferError::InvalidDimensions { width, height });
        }
        let expected = width * height * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(BufferError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// True when `(x, y)` addresses a pixel of this buffer
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn index(&self, x: usize, y: usize) -> Result<usize, BufferError> {
        if x < self.width && y < self.height {
            Ok((y * self.width + x) * BYTES_PER_PIXEL)
        } else {
            Err(self.out_of_bounds(x as i64, y as i64))
        }
    }

    fn out_of_bounds(&self, x: i64, y: i64) -> BufferError {
        BufferError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Result<Color, BufferError> {
        let i = self.index(x, y)?;
        Ok(Color::rgba(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ))
    }

    pub fn set(&mut self, x: usize, y: usize, color: Color) -> Result<(), BufferError> {
        let i = self.index(x, y)?;
        self.data[i..i + BYTES_PER_PIXEL].copy_from_slice(&color.to_array());
        Ok(())
    }

    /// Color of the pixel at a flat pixel index (row-major, not byte offset).
    /// Callers in this crate only pass indices below `width * height`.
    pub(crate) fn pixel_at(&self, pixel: usize) -> Color {
        let i = pixel * BYTES_PER_PIXEL;
        Color::rgba(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        )
    }

    pub(crate) fn set_pixel_at(&mut self, pixel: usize, color: Color) {
        let i = pixel * BYTES_PER_PIXEL;
        self.data[i..i + BYTES_PER_PIXEL].copy_from_slice(&color.to_array());
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Overwrite every pixel with `color`
    pub fn fill(&mut self, color: Color) {
        let rgba = color.to_array();
        for px in self.data.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Composite `color` over the pixel at `(x, y)` using its opacity.
    /// Coordinates outside the buffer are ignored; rasterized shapes clip here.
    pub fn blend(&mut self, x: i64, y: i64, color: Color) {
        if !self.contains(x, y) {
            return;
        }
        let i = (y as usize * self.width + x as usize) * BYTES_PER_PIXEL;
        match color.opacity {
            0 => {}
            u8::MAX => self.data[i..i + BYTES_PER_PIXEL].copy_from_slice(&color.to_array()),
            alpha => {
                let src_a = alpha as f32 / 255.0;
                let dst_a = self.data[i + 3] as f32 / 255.0;
                let out_a = src_a + dst_a * (1.0 - src_a);
                let src = [color.red, color.green, color.blue];
                for (c, s) in src.iter().enumerate() {
                    let d = self.data[i + c] as f32;
                    let v = (*s as f32 * src_a + d * dst_a * (1.0 - src_a)) / out_a;
                    self.data[i + c] = v.round().clamp(0.0, 255.0) as u8;
                }
                self.data[i + 3] = (out_a * 255.0).round() as u8;
            }
        }
    }

    /// Copy a `w x h` block starting at `(x0, y0)` into a new buffer
    pub fn region(&self, x0: usize, y0: usize, w: usize, h: usize) -> Result<PixelBuffer, BufferError> {
        if w == 0 || h == 0 {
            return Err(BufferError::InvalidDimensions { width: w, height: h });
        }
        // Both corners must be inside; callers pre-clip selections
        self.index(x0, y0)?;
        self.index(x0 + w - 1, y0 + h - 1)?;

        let mut data = Vec::with_capacity(w * h * BYTES_PER_PIXEL);
        for row in y0..y0 + h {
            let start = (row * self.width + x0) * BYTES_PER_PIXEL;
            data.extend_from_slice(&self.data[start..start + w * BYTES_PER_PIXEL]);
        }
        Ok(PixelBuffer {
            width: w,
            height: h,
            data,
        })
    }

    /// Copy `src` into this buffer with its top-left at `(x, y)`.
    /// Parts of `src` that land outside this buffer are clipped.
    pub fn blit(&mut self, src: &PixelBuffer, x: i64, y: i64) {
        let x_start = x.max(0);
        let y_start = y.max(0);
        let x_end = (x + src.width as i64).min(self.width as i64);
        let y_end = (y + src.height as i64).min(self.height as i64);
        if x_start >= x_end || y_start >= y_end {
            return;
        }

        let span = (x_end - x_start) as usize * BYTES_PER_PIXEL;
        for dst_row in y_start..y_end {
            let src_row = (dst_row - y) as usize;
            let src_col = (x_start - x) as usize;
            let s = (src_row * src.width + src_col) * BYTES_PER_PIXEL;
            let d = (dst_row as usize * self.width + x_start as usize) * BYTES_PER_PIXEL;
            self.data[d..d + span].copy_from_slice(&src.data[s..s + span]);
        }
    }

    /// Produce a `width x height` copy of this buffer re-sampled per `mode`
    pub fn resized(&self, width: usize, height: usize, mode: Resample) -> Result<PixelBuffer, BufferError> {
        match mode {
            Resample::Crop { fill } => {
                let mut out = PixelBuffer::filled(width, height, fill)?;
                out.blit(self, 0, 0);
                Ok(out)
            }
            Resample::Scale { smooth } => {
                if width == 0 || height == 0 {
                    return Err(BufferError::InvalidDimensions { width, height });
                }
                let filter = if smooth {
                    FilterType::Triangle
                } else {
                    FilterType::Nearest
                };
                let scaled = imageops::resize(&self.to_rgba_image(), width as u32, height as u32, filter);
                PixelBuffer::from_raw(width, height, scaled.into_raw())
            }
        }
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        // Length invariant guarantees from_raw succeeds; fall back to a blank image otherwise
        RgbaImage::from_raw(self.width as u32, self.height as u32, self.data.clone())
            .unwrap_or_else(|| RgbaImage::new(self.width as u32, self.height as u32))
    }

    pub fn from_rgba_image(image: &RgbaImage) -> Result<Self, BufferError> {
        let (w, h) = image.dimensions();
        PixelBuffer::from_raw(w as usize, h as usize, image.as_raw().clone())
    }

    /// Texture data for hosts that display the canvas through egui
    pub fn to_color_image(&self) -> ColorImage {
        ColorImage::from_rgba_unmultiplied([self.width, self.height], &self.data)
    }
}
