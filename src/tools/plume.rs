use egui::Pos2;

use super::{PointerButton, Tool, ToolResponse};
use crate::color::Color;
use crate::command::{Command, CommandResult};
use crate::pixel_buffer::PixelBuffer;
use crate::settings::{PlumeSettings, ToolParameters};

const FULL_TURN: f32 = 360.0;

/// Calligraphy pen with a rotatable nib
#[derive(Debug, Clone, Default)]
pub struct PlumeTool {
    settings: PlumeSettings,
    path: Option<Vec<Pos2>>,
}

impl PlumeTool {
    pub fn new(settings: PlumeSettings) -> Self {
        Self { settings, path: None }
    }

    pub fn settings(&self) -> &PlumeSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut PlumeSettings {
        &mut self.settings
    }

    /// Set the nib angle, wrapped into `[0, 360)`
    pub fn set_angle(&mut self, degrees: f32) {
        self.settings.angle_degrees = degrees.rem_euclid(FULL_TURN);
    }

    /// Turn the nib, e.g. from a scroll wheel
    pub fn rotate(&mut self, delta_degrees: f32) {
        self.set_angle(self.settings.angle_degrees + delta_degrees);
    }

    fn finish(&mut self) -> ToolResponse {
        match self.path.take() {
            Some(points) => ToolResponse::Finished {
                command: Command::Plume {
                    settings: self.settings,
                    points,
                },
                applied: false,
            },
            None => ToolResponse::None,
        }
    }
}

impl Tool for PlumeTool {
    fn name(&self) -> &'static str {
        "Plume"
    }

    fn snapshot_parameters(&self) -> ToolParameters {
        ToolParameters::Plume(self.settings)
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
        self.path.as_ref().map(|points| Command::Plume {
            settings: self.settings,
            points: points.clone(),
        })
    }

    fn cancel(&mut self) {
        self.path = None;
    }
}
