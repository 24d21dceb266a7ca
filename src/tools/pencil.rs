use egui::Pos2;

use super::{PointerButton, Tool, ToolResponse};
use crate::color::Color;
use crate::command::{Command, CommandResult};
use crate::pixel_buffer::PixelBuffer;
use crate::settings::{PencilSettings, ToolParameters};

/// Freehand hairline tool
#[derive(Debug, Clone, Default)]
pub struct PencilTool {
    settings: PencilSettings,
    // Transient state: the path being drawn (if any)
    path: Option<Vec<Pos2>>,
}

impl PencilTool {
    pub fn new(settings: PencilSettings) -> Self {
        Self { settings, path: None }
    }

    pub fn settings(&self) -> &PencilSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut PencilSettings {
        &mut self.settings
    }

    fn finish(&mut self) -> ToolResponse {
        match self.path.take() {
            Some(points) if !points.is_empty() => ToolResponse::Finished {
                command: Command::Pencil {
                    settings: self.settings,
                    points,
                },
                applied: false,
            },
            _ => ToolResponse::None,
        }
    }
}

impl Tool for PencilTool {
    fn name(&self) -> &'static str {
        "Pencil"
    }

    fn snapshot_parameters(&self) -> ToolParameters {
        ToolParameters::Pencil(self.settings)
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
        self.path.as_ref().map(|points| Command::Pencil {
            settings: self.settings,
            points: points.clone(),
        })
    }

    fn cancel(&mut self) {
        self.path = None;
    }
}
