use egui::Pos2;

use super::{PointerButton, Tool, ToolResponse};
use crate::color::Color;
use crate::command::{Command, CommandResult};
use crate::pixel_buffer::PixelBuffer;
use crate::settings::{BrushSettings, BrushTexture, ToolParameters};

/// Textured stamp brush
#[derive(Debug, Clone, Default)]
pub struct BrushTool {
    settings: BrushSettings,
    path: Option<Vec<Pos2>>,
}

impl BrushTool {
    pub fn new(settings: BrushSettings) -> Self {
        Self { settings, path: None }
    }

    pub fn settings(&self) -> &BrushSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut BrushSettings {
        &mut self.settings
    }

    pub fn set_texture(&mut self, texture: BrushTexture) {
        self.settings.texture = texture;
    }

    fn finish(&mut self) -> ToolResponse {
        match self.path.take() {
            Some(points) => ToolResponse::Finished {
                command: Command::Brush {
                    settings: self.settings,
                    points,
                },
                applied: false,
            },
            None => ToolResponse::None,
        }
    }
}

impl Tool for BrushTool {
    fn name(&self) -> &'static str {
        "Brush"
    }

    fn snapshot_parameters(&self) -> ToolParameters {
        ToolParameters::Brush(self.settings)
    }

    fn set_primary_color(&mut self, color: Color) {
        self.settings.color = color;
    }

    fn is_active(&self) -> bool {
        self.path.is_some()
    }

    fn on_pointer_down(&mut self, pos: Pos2, button: PointerButton, _base: &PixelBuffer) -> CommandResult<ToolResponse> {
        if button != PointerButton::Primary {
            return Ok(ToolResponse::None);
        }
        self.path = Some(vec![pos]);
        Ok(ToolResponse::Began)
    }

    fn on_pointer_move(&mut self, pos: Pos2) -> ToolResponse {
        match &mut self.path {
            Some(points) => {
                points.push(pos);
                ToolResponse::Updated
            }
            None => ToolResponse::None,
        }
    }

    fn on_pointer_up(&mut self, pos: Pos2) -> ToolResponse {
        if let Some(points) = &mut self.path {
            if points.last() != Some(&pos) {
                points.push(pos);
            }
        }
        self.finish()
    }

    fn on_pointer_leave(&mut self, pos: Pos2, _canvas_size: (usize, usize)) -> ToolResponse {
        if let Some(points) = &mut self.path {
            points.push(pos);
        }
        self.finish()
    }

    fn preview(&self) -> Option<Command> {
        self.path.as_ref().map(|points| Command::Brush {
            settings: self.settings,
            points: points.clone(),
        })
    }

    fn cancel(&mut self) {
        self.path = None;
    }
}
