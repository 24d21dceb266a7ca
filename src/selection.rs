use egui::{Pos2, pos2};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::BufferError;
use crate::pixel_buffer::PixelBuffer;

/// Axis-aligned pixel rectangle, always with positive size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl PixelRect {
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }
}

/// Rectangle dragged by the user; the end point may sit on any side of the start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionRect {
    pub start: Pos2,
    pub end: Pos2,
}

impl SelectionRect {
    pub fn new(start: Pos2, end: Pos2) -> Self {
        Self { start, end }
    }

    /// Swap corners so `start` is top-left and `end` bottom-right
    pub fn normalized(&self) -> Self {
        Self {
            start: pos2(self.start.x.min(self.end.x), self.start.y.min(self.end.y)),
            end: pos2(self.start.x.max(self.end.x), self.start.y.max(self.end.y)),
        }
    }

    /// Pixels covered once clipped to a `width x height` canvas; `None` if empty
    pub fn clip_to(&self, width: usize, height: usize) -> Option<PixelRect> {
        let n = self.normalized();
        let x0 = n.start.x.round().clamp(0.0, width as f32) as usize;
        let y0 = n.start.y.round().clamp(0.0, height as f32) as usize;
        let x1 = n.end.x.round().clamp(0.0, width as f32) as usize;
        let y1 = n.end.y.round().clamp(0.0, height as f32) as usize;
        (x1 > x0 && y1 > y0).then(|| PixelRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}

/// Pixels to drop at a position, clipped when executed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub pixels: PixelBuffer,
    pub x: i64,
    pub y: i64,
}

/// Replayable selection edit: optionally erase a rectangle, then optionally paste pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionEdit {
    pub erase: Option<PixelRect>,
    pub erase_color: Color,
    pub paste: Option<Placement>,
}

impl SelectionEdit {
    pub fn apply(&self, buffer: &mut PixelBuffer) {
        if let Some(rect) = self.erase {
            // Rectangles recorded on a larger canvas clip to the current one
            let (width, height) = buffer.dimensions();
            let x_end = (rect.x + rect.width).min(width);
            let y_end = (rect.y + rect.height).min(height);
            for y in rect.y.min(y_end)..y_end {
                for x in rect.x.min(x_end)..x_end {
                    buffer.set_pixel_at(y * width + x, self.erase_color);
                }
            }
        }
        if let Some(placement) = &self.paste {
            buffer.blit(&placement.pixels, placement.x, placement.y);
        }
    }
}

/// Holds the last copied block of pixels
#[derive(Debug, Default, Clone)]
pub struct Clipboard {
    contents: Option<PixelBuffer>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&PixelBuffer> {
        self.contents.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_none()
    }

    /// Copy the selected pixels; returns false when the selection is empty
    pub fn copy(&mut self, buffer: &PixelBuffer, selection: SelectionRect) -> Result<bool, BufferError> {
        let Some(rect) = selection.clip_to(buffer.width(), buffer.height()) else {
            return Ok(false);
        };
        let block = buffer.region(rect.x, rect.y, rect.width, rect.height)?;
        debug!("Copied {}x{} block at ({}, {})", rect.width, rect.height, rect.x, rect.y);
        self.contents = Some(block);
        Ok(true)
    }

    /// Copy then produce the edit that erases the source
    pub fn cut(
        &mut self,
        buffer: &PixelBuffer,
        selection: SelectionRect,
        background: Color,
    ) -> Result<Option<SelectionEdit>, BufferError> {
        if !self.copy(buffer, selection)? {
            return Ok(None);
        }
        Ok(delete(buffer, selection, background))
    }

    /// Edit that places the clipboard contents with their top-left at `at`
    pub fn paste(&self, at: Pos2) -> Option<SelectionEdit> {
        let pixels = self.contents.clone()?;
        Some(SelectionEdit {
            erase: None,
            erase_color: Color::TRANSPARENT,
            paste: Some(Placement {
                pixels,
                x: at.x.round() as i64,
                y: at.y.round() as i64,
            }),
        })
    }
}

/// Edit that fills the selection with the background color
pub fn delete(buffer: &PixelBuffer, selection: SelectionRect, background: Color) -> Option<SelectionEdit> {
    let rect = selection.clip_to(buffer.width(), buffer.height())?;
    Some(SelectionEdit {
        erase: Some(rect),
        erase_color: background,
        paste: None,
    })
}

/// Edit that lifts the selected pixels and drops them with their top-left at `to`
pub fn move_selection(
    buffer: &PixelBuffer,
    selection: SelectionRect,
    to: Pos2,
    background: Color,
) -> Result<Option<SelectionEdit>, BufferError> {
    let Some(rect) = selection.clip_to(buffer.width(), buffer.height()) else {
        return Ok(None);
    };
    let pixels = buffer.region(rect.x, rect.y, rect.width, rect.height)?;
    Ok(Some(SelectionEdit {
        erase: Some(rect),
        erase_color: background,
        paste: Some(Placement {
            pixels,
            x: to.x.round() as i64,
            y: to.y.round() as i64,
        }),
    }))
}
