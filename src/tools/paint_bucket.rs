use egui::Pos2;
use log::{info, warn};

use super::{PointerButton, Tool, ToolResponse};
use crate::color::Color;
use crate::command::{Command, CommandResult};
use crate::fill::{FillMode, FloodFillEngine, Tolerance};
use crate::pixel_buffer::PixelBuffer;
use crate::settings::{BucketSettings, ToolParameters};

/// Flood fill on click: primary button fills the connected region,
/// secondary fills every matching pixel on the canvas
#[derive(Debug, Clone, Default)]
pub struct PaintBucketTool {
    settings: BucketSettings,
}

impl PaintBucketTool {
    pub fn new(settings: BucketSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &BucketSettings {
        &self.settings
    }

    /// Out-of-range values leave the current tolerance unchanged
    pub fn set_tolerance(&mut self, percent: f32) -> bool {
        match Tolerance::checked(percent) {
            Some(tolerance) => {
                self.settings.tolerance = tolerance;
                true
            }
            None => {
                warn!("Ignoring out-of-range tolerance {percent}");
                false
            }
        }
    }

    fn mode_for(button: PointerButton) -> Option<FillMode> {
        match button {
            PointerButton::Primary => Some(FillMode::Contiguous),
            PointerButton::Secondary => Some(FillMode::NonContiguous),
            PointerButton::Middle => None,
        }
    }
}

impl Tool for PaintBucketTool {
    fn name(&self) -> &'static str {
        "Paint Bucket"
    }

    fn snapshot_parameters(&self) -> ToolParameters {
        ToolParameters::PaintBucket(self.settings)
    }

    fn set_primary_color(&mut self, color: Color) {
        self.settings.color = color;
    }

    fn is_active(&self) -> bool {
        false
    }

    fn on_pointer_down(&mut self, pos: Pos2, button: PointerButton, base: &PixelBuffer) -> CommandResult<ToolResponse> {
        let Some(mode) = Self::mode_for(button) else {
            return Ok(ToolResponse::None);
        };
        let engine = FloodFillEngine::new(self.settings.color, self.settings.tolerance);
        let image = engine.fill(base, pos, mode)?;
        info!("🪣 Bucket produced {mode:?} fill at ({:.0}, {:.0})", pos.x, pos.y);
        Ok(ToolResponse::Finished {
            command: Command::Fill { image },
            applied: false,
        })
    }

    fn on_pointer_move(&mut self, _pos: Pos2) -> ToolResponse {
        ToolResponse::None
    }

    fn on_pointer_up(&mut self, _pos: Pos2) -> ToolResponse {
        ToolResponse::None
    }

    fn preview(&self) -> Option<Command> {
        None
    }

    fn cancel(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandError;
    use egui::pos2;

    #[test]
    fn tolerance_outside_range_is_ignored() {
        let mut bucket = PaintBucketTool::default();
        assert!(bucket.set_tolerance(40.0));
        assert!(!bucket.set_tolerance(140.0));
        assert!(!bucket.set_tolerance(-1.0));
        assert_eq!(bucket.settings().tolerance.percent(), 40.0);
    }

    #[test]
    fn click_outside_canvas_fails() {
        let mut bucket = PaintBucketTool::default();
        let base = PixelBuffer::filled(10, 10, Color::WHITE).unwrap();
        let result = bucket.on_pointer_down(pos2(10.0, 3.0), PointerButton::Primary, &base);
        assert!(matches!(result, Err(CommandError::Fill(_))));
    }

    #[test]
    fn fill_leaves_base_untouched() {
        let mut bucket = PaintBucketTool::new(BucketSettings {
            color: Color::RED,
            tolerance: Tolerance::EXACT,
        });
        let base = PixelBuffer::filled(10, 10, Color::WHITE).unwrap();
        let ToolResponse::Finished { command: Command::Fill { image }, .. } = bucket
            .on_pointer_down(pos2(5.0, 5.0), PointerButton::Primary, &base)
            .unwrap()
        else {
            panic!("expected a fill");
        };
        assert_eq!(image.get(0, 9).unwrap(), Color::RED);
        assert_eq!(base.get(0, 9).unwrap(), Color::WHITE);
    }
}
