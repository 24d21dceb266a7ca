use log::info;

use crate::color::Color;
use crate::error::BufferError;
use crate::pixel_buffer::{PixelBuffer, Resample};

/// Which of the surface's two buffers an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceTarget {
    /// The committed drawing; the only buffer commands write to
    Base,
    /// Scratch layer for in-progress gestures
    Preview,
}

/// Contract between the history/tools and whatever owns the pixels.
///
/// Both buffers always share the same dimensions.
pub trait DrawingSurface {
    fn buffer(&self, target: SurfaceTarget) -> &PixelBuffer;

    fn buffer_mut(&mut self, target: SurfaceTarget) -> &mut PixelBuffer;

    /// Reset `target` to its blank state
    fn clear(&mut self, target: SurfaceTarget);

    fn current_dimensions(&self) -> (usize, usize);

    /// Change both buffers' size, keeping base content anchored top-left
    fn resize(&mut self, width: usize, height: usize) -> Result<(), BufferError>;

    fn base(&self) -> &PixelBuffer {
        self.buffer(SurfaceTarget::Base)
    }

    fn base_mut(&mut self) -> &mut PixelBuffer {
        self.buffer_mut(SurfaceTarget::Base)
    }
}

/// In-memory surface: an opaque base over a transparent preview
#[derive(Debug, Clone)]
pub struct Canvas {
    base: PixelBuffer,
    preview: PixelBuffer,
    background: Color,
}

impl Canvas {
    pub fn new(width: usize, height: usize, background: Color) -> Result<Self, BufferError> {
        Ok(Self {
            base: PixelBuffer::filled(width, height, background)?,
            preview: PixelBuffer::new(width, height)?,
            background,
        })
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Base with the preview composited on top, for display
    pub fn composite(&self) -> PixelBuffer {
        let mut out = self.base.clone();
        for y in 0..self.preview.height() {
            for x in 0..self.preview.width() {
                if let Ok(px) = self.preview.get(x, y) {
                    out.blend(x as i64, y as i64, px);
                }
            }
        }
        out
    }
}

impl DrawingSurface for Canvas {
    fn buffer(&self, target: SurfaceTarget) -> &PixelBuffer {
        match target {
            SurfaceTarget::Base => &self.base,
            SurfaceTarget::Preview => &self.preview,
        }
    }

    fn buffer_mut(&mut self, target: SurfaceTarget) -> &mut PixelBuffer {
        match target {
            SurfaceTarget::Base => &mut self.base,
            SurfaceTarget::Preview => &mut self.preview,
        }
    }

    fn clear(&mut self, target: SurfaceTarget) {
        match target {
            SurfaceTarget::Base => self.base.fill(self.background),
            SurfaceTarget::Preview => self.preview.fill(Color::TRANSPARENT),
        }
    }

    fn current_dimensions(&self) -> (usize, usize) {
        self.base.dimensions()
    }

    fn resize(&mut self, width: usize, height: usize) -> Result<(), BufferError> {
        if self.current_dimensions() == (width, height) {
            return Ok(());
        }
        // Build both before swapping so a failure leaves the canvas untouched
        let base = self.base.resized(
            width,
            height,
            Resample::Crop {
                fill: self.background,
            },
        )?;
        let preview = PixelBuffer::new(width, height)?;
        info!(
            "📐 Canvas resized from {:?} to {}x{}",
            self.current_dimensions(),
            width,
            height
        );
        self.base = base;
        self.preview = preview;
        Ok(())
    }
}
