use std::str::FromStr;
use std::time::Duration;

use egui::Pos2;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::command::{Command, CommandResult};
use crate::config::ToolDefaults;
use crate::pixel_buffer::PixelBuffer;
use crate::settings::ToolParameters;

/// Mouse button that started a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// What the editor should do after forwarding an event to a tool
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResponse {
    /// Nothing changed
    None,
    /// A gesture started; history must be locked until it ends
    Began,
    /// The in-progress gesture changed; redraw the preview
    Updated,
    /// Paint this straight onto the base; it is not a history entry
    Live(Command),
    /// The gesture produced a command. `applied` means its pixels are
    /// already on the base and it only needs recording.
    Finished { command: Command, applied: bool },
    /// The gesture ended without an edit
    Cancelled,
}

/// Tool trait defines the interface for all drawing tools.
///
/// Tools never touch the canvas or history themselves; they turn pointer
/// events into commands and the editor applies them.
pub trait Tool {
    /// Return the name of the tool
    fn name(&self) -> &'static str;

    /// Every tool here creates history entries
    fn produces_command(&self) -> bool {
        true
    }

    /// Copy of the current parameters, as a command would capture them
    fn snapshot_parameters(&self) -> ToolParameters;

    fn set_primary_color(&mut self, color: Color);

    /// True while a gesture is in progress
    fn is_active(&self) -> bool;

    /// Handle pointer press on the canvas. The base is read-only here;
    /// tools that need current pixels (the bucket) read them from it.
    fn on_pointer_down(&mut self, pos: Pos2, button: PointerButton, base: &PixelBuffer) -> CommandResult<ToolResponse>;

    /// Handle pointer drag while the pointer is held down
    fn on_pointer_move(&mut self, pos: Pos2) -> ToolResponse;

    /// Handle pointer release
    fn on_pointer_up(&mut self, pos: Pos2) -> ToolResponse;

    fn on_pointer_leave(&mut self, _pos: Pos2, _canvas_size: (usize, usize)) -> ToolResponse {
        ToolResponse::None
    }

    fn on_pointer_enter(&mut self, _pos: Pos2) -> ToolResponse {
        ToolResponse::None
    }

    /// Shift key changed
    fn on_modifier(&mut self, _shift: bool) -> ToolResponse {
        ToolResponse::None
    }

    /// Time passed; only timed tools react
    fn tick(&mut self, _delta: Duration) -> ToolResponse {
        ToolResponse::None
    }

    /// Command to draw on the preview layer for the gesture in progress
    fn preview(&self) -> Option<Command>;

    /// Abandon the gesture in progress
    fn cancel(&mut self);
}

mod brush;
mod paint_bucket;
mod pencil;
mod plume;
mod rectangle;
mod spray;

pub use brush::BrushTool;
pub use paint_bucket::PaintBucketTool;
pub use pencil::PencilTool;
pub use plume::PlumeTool;
pub use rectangle::RectangleTool;
pub use spray::SprayTool;

/// Tool identifiers, as they appear in configuration and toolbars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    Pencil,
    Brush,
    Plume,
    Spray,
    Rectangle,
    PaintBucket,
}

impl ToolKind {
    pub const ALL: [ToolKind; 6] = [
        ToolKind::Pencil,
        ToolKind::Brush,
        ToolKind::Plume,
        ToolKind::Spray,
        ToolKind::Rectangle,
        ToolKind::PaintBucket,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Pencil => "Pencil",
            ToolKind::Brush => "Brush",
            ToolKind::Plume => "Plume",
            ToolKind::Spray => "Spray",
            ToolKind::Rectangle => "Rectangle",
            ToolKind::PaintBucket => "Paint Bucket",
        }
    }
}

impl FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace([' ', '_', '-'], "");
        ToolKind::ALL
            .into_iter()
            .find(|kind| kind.name().to_ascii_lowercase().replace(' ', "") == wanted)
            .ok_or_else(|| format!("unknown tool '{s}'"))
    }
}

/// Enum representing all available tool types.
/// This allows us to avoid using Box<dyn Tool> and keeps tools cloneable.
#[derive(Debug, Clone)]
pub enum ToolType {
    Pencil(PencilTool),
    Brush(BrushTool),
    Plume(PlumeTool),
    Spray(SprayTool),
    Rectangle(RectangleTool),
    PaintBucket(PaintBucketTool),
}

impl ToolType {
    /// Fresh tool of the given kind, configured from the defaults
    pub fn new(kind: ToolKind, defaults: &ToolDefaults) -> Self {
        match kind {
            ToolKind::Pencil => Self::Pencil(PencilTool::new(defaults.pencil)),
            ToolKind::Brush => Self::Brush(BrushTool::new(defaults.brush)),
            ToolKind::Plume => Self::Plume(PlumeTool::new(defaults.plume)),
            ToolKind::Spray => Self::Spray(SprayTool::new(defaults.spray)),
            ToolKind::Rectangle => Self::Rectangle(RectangleTool::new(defaults.rectangle)),
            ToolKind::PaintBucket => Self::PaintBucket(PaintBucketTool::new(defaults.bucket)),
        }
    }

    pub fn from_name(name: &str, defaults: &ToolDefaults) -> Option<Self> {
        name.parse().ok().map(|kind| Self::new(kind, defaults))
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Self::Pencil(_) => ToolKind::Pencil,
            Self::Brush(_) => ToolKind::Brush,
            Self::Plume(_) => ToolKind::Plume,
            Self::Spray(_) => ToolKind::Spray,
            Self::Rectangle(_) => ToolKind::Rectangle,
            Self::PaintBucket(_) => ToolKind::PaintBucket,
        }
    }

    fn inner(&self) -> &dyn Tool {
        match self {
            Self::Pencil(tool) => tool,
            Self::Brush(tool) => tool,
            Self::Plume(tool) => tool,
            Self::Spray(tool) => tool,
            Self::Rectangle(tool) => tool,
            Self::PaintBucket(tool) => tool,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Tool {
        match self {
            Self::Pencil(tool) => tool,
            Self::Brush(tool) => tool,
            Self::Plume(tool) => tool,
            Self::Spray(tool) => tool,
            Self::Rectangle(tool) => tool,
            Self::PaintBucket(tool) => tool,
        }
    }
}

impl Tool for ToolType {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn produces_command(&self) -> bool {
        self.inner().produces_command()
    }

    fn snapshot_parameters(&self) -> ToolParameters {
        self.inner().snapshot_parameters()
    }

    fn set_primary_color(&mut self, color: Color) {
        self.inner_mut().set_primary_color(color);
    }

    fn is_active(&self) -> bool {
        self.inner().is_active()
    }

    fn on_pointer_down(&mut self, pos: Pos2, button: PointerButton, base: &PixelBuffer) -> CommandResult<ToolResponse> {
        self.inner_mut().on_pointer_down(pos, button, base)
    }

    fn on_pointer_move(&mut self, pos: Pos2) -> ToolResponse {
        self.inner_mut().on_pointer_move(pos)
    }

    fn on_pointer_up(&mut self, pos: Pos2) -> ToolResponse {
        self.inner_mut().on_pointer_up(pos)
    }

    fn on_pointer_leave(&mut self, pos: Pos2, canvas_size: (usize, usize)) -> ToolResponse {
        self.inner_mut().on_pointer_leave(pos, canvas_size)
    }

    fn on_pointer_enter(&mut self, pos: Pos2) -> ToolResponse {
        self.inner_mut().on_pointer_enter(pos)
    }

    fn on_modifier(&mut self, shift: bool) -> ToolResponse {
        self.inner_mut().on_modifier(shift)
    }

    fn tick(&mut self, delta: Duration) -> ToolResponse {
        self.inner_mut().tick(delta)
    }

    fn preview(&self) -> Option<Command> {
        self.inner().preview()
    }

    fn cancel(&mut self) {
        self.inner_mut().cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn tool_names_parse() {
        assert_eq!("pencil".parse::<ToolKind>().unwrap(), ToolKind::Pencil);
        assert_eq!("Paint Bucket".parse::<ToolKind>().unwrap(), ToolKind::PaintBucket);
        assert_eq!("paint_bucket".parse::<ToolKind>().unwrap(), ToolKind::PaintBucket);
        assert!("eraser".parse::<ToolKind>().is_err());
    }

    #[test]
    fn every_tool_produces_commands() {
        let defaults = ToolDefaults::default();
        for kind in ToolKind::ALL {
            let tool = ToolType::new(kind, &defaults);
            assert!(tool.produces_command());
            assert_eq!(tool.kind(), kind);
            assert_eq!(tool.name(), kind.name());
        }
    }

    #[test]
    fn command_keeps_parameters_from_construction() {
        let mut tool = ToolType::new(ToolKind::Pencil, &ToolDefaults::default());
        let base = PixelBuffer::new(10, 10).unwrap();
        tool.on_pointer_down(pos2(1.0, 1.0), PointerButton::Primary, &base)
            .unwrap();
        let ToolResponse::Finished { command, .. } = tool.on_pointer_up(pos2(5.0, 5.0)) else {
            panic!("expected a pencil command");
        };

        tool.set_primary_color(Color::RED);
        let Command::Pencil { settings, .. } = command else {
            panic!("expected a pencil command");
        };
        assert_eq!(settings.color, Color::BLACK);
        assert_eq!(tool.snapshot_parameters(), ToolParameters::Pencil(crate::settings::PencilSettings {
            color: Color::RED,
            ..settings
        }));
    }
}
