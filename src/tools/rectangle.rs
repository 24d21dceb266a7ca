use egui::{Pos2, pos2};

use super::{PointerButton, Tool, ToolResponse};
use crate::color::Color;
use crate::command::{Command, CommandResult};
use crate::pixel_buffer::PixelBuffer;
use crate::settings::{RectangleSettings, RectangleStyle, ToolParameters};

/// Drag state of the rectangle tool
#[derive(Debug, Clone, Copy, PartialEq)]
struct Drag {
    start: Pos2,
    current: Pos2,
    /// Last in-canvas position once the pointer has left the canvas
    out: Option<Pos2>,
}

impl Drag {
    fn end(&self) -> Pos2 {
        self.out.unwrap_or(self.current)
    }
}

/// Drag-to-draw rectangles; shift constrains to a square
#[derive(Debug, Clone, Default)]
pub struct RectangleTool {
    settings: RectangleSettings,
    drag: Option<Drag>,
    square: bool,
}

impl RectangleTool {
    pub fn new(settings: RectangleSettings) -> Self {
        Self {
            settings,
            drag: None,
            square: false,
        }
    }

    pub fn settings(&self) -> &RectangleSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut RectangleSettings {
        &mut self.settings
    }

    pub fn set_style(&mut self, style: RectangleStyle) {
        self.settings.style = style;
    }

    pub fn set_secondary_color(&mut self, color: Color) {
        self.settings.secondary = color;
    }

    pub fn is_square(&self) -> bool {
        self.square
    }

    fn command(&self, drag: &Drag) -> Command {
        Command::Rectangle {
            settings: self.settings,
            start: drag.start,
            end: drag.end(),
            square: self.square,
        }
    }
}

impl Tool for RectangleTool {
    fn name(&self) -> &'static str {
        "Rectangle"
    }

    fn snapshot_parameters(&self) -> ToolParameters {
        ToolParameters::Rectangle(self.settings)
    }

    fn set_primary_color(&mut self, color: Color) {
        self.settings.primary = color;
    }

    fn is_active(&self) -> bool {
        self.drag.is_some()
    }

    fn on_pointer_down(&mut self, pos: Pos2, button: PointerButton, _base: &PixelBuffer) -> CommandResult<ToolResponse> {
        if button != PointerButton::Primary {
            return Ok(ToolResponse::None);
        }
        self.drag = Some(Drag {
            start: pos,
            current: pos,
            out: None,
        });
        Ok(ToolResponse::Began)
    }

    fn on_pointer_move(&mut self, pos: Pos2) -> ToolResponse {
        match &mut self.drag {
            Some(drag) => {
                drag.current = pos;
                ToolResponse::Updated
            }
            None => ToolResponse::None,
        }
    }

    fn on_pointer_up(&mut self, pos: Pos2) -> ToolResponse {
        let Some(mut drag) = self.drag.take() else {
            return ToolResponse::None;
        };
        drag.current = pos;
        ToolResponse::Finished {
            command: self.command(&drag),
            applied: false,
        }
    }

    /// The drag stays alive; its far corner sticks to the canvas edge
    fn on_pointer_leave(&mut self, pos: Pos2, canvas_size: (usize, usize)) -> ToolResponse {
        let Some(drag) = &mut self.drag else {
            return ToolResponse::None;
        };
        let clamped = pos2(
            pos.x.clamp(0.0, canvas_size.0 as f32),
            pos.y.clamp(0.0, canvas_size.1 as f32),
        );
        drag.current = clamped;
        drag.out = Some(clamped);
        ToolResponse::Updated
    }

    fn on_pointer_enter(&mut self, pos: Pos2) -> ToolResponse {
        match &mut self.drag {
            Some(drag) => {
                drag.out = None;
                drag.current = pos;
                ToolResponse::Updated
            }
            None => ToolResponse::None,
        }
    }

    fn on_modifier(&mut self, shift: bool) -> ToolResponse {
        if self.square == shift {
            return ToolResponse::None;
        }
        self.square = shift;
        if self.drag.is_some() {
            ToolResponse::Updated
        } else {
            ToolResponse::None
        }
    }

    fn preview(&self) -> Option<Command> {
        self.drag.as_ref().map(|drag| self.command(drag))
    }

    fn cancel(&mut self) {
        self.drag = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> PixelBuffer {
        PixelBuffer::new(100, 100).unwrap()
    }

    #[test]
    fn drag_produces_rectangle() {
        let mut tool = RectangleTool::default();
        tool.on_pointer_down(pos2(10.0, 10.0), PointerButton::Primary, &base())
            .unwrap();
        tool.on_pointer_move(pos2(30.0, 20.0));
        assert!(tool.preview().is_some());

        let ToolResponse::Finished { command, applied } = tool.on_pointer_up(pos2(40.0, 25.0)) else {
            panic!("expected a rectangle");
        };
        assert!(!applied);
        assert!(matches!(
            command,
            Command::Rectangle { start, end, square: false, .. }
                if start == pos2(10.0, 10.0) && end == pos2(40.0, 25.0)
        ));
        assert!(!tool.is_active());
    }

    #[test]
    fn leaving_clamps_and_release_uses_edge() {
        let mut tool = RectangleTool::default();
        tool.on_pointer_down(pos2(50.0, 50.0), PointerButton::Primary, &base())
            .unwrap();
        tool.on_pointer_leave(pos2(130.0, -20.0), (100, 100));

        let ToolResponse::Finished { command: Command::Rectangle { end, .. }, .. } =
            tool.on_pointer_up(pos2(140.0, -30.0))
        else {
            panic!("expected a rectangle");
        };
        assert_eq!(end, pos2(100.0, 0.0));
    }

    #[test]
    fn shift_toggles_square() {
        let mut tool = RectangleTool::default();
        tool.on_pointer_down(pos2(0.0, 0.0), PointerButton::Primary, &base())
            .unwrap();
        assert!(matches!(tool.on_modifier(true), ToolResponse::Updated));
        assert!(tool.is_square());
        assert!(matches!(
            tool.preview(),
            Some(Command::Rectangle { square: true, .. })
        ));
        tool.on_modifier(false);
        assert!(!tool.is_square());
    }

    #[test]
    fn secondary_button_is_ignored() {
        let mut tool = RectangleTool::default();
        let response = tool
            .on_pointer_down(pos2(1.0, 1.0), PointerButton::Secondary, &base())
            .unwrap();
        assert!(matches!(response, ToolResponse::None));
        assert!(!tool.is_active());
    }
}
