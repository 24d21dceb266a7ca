use egui::Pos2;
use log::debug;
use serde::{Deserialize, Serialize};

use super::render;
use super::{CommandError, CommandResult};
use crate::pixel_buffer::PixelBuffer;
use crate::selection::SelectionEdit;
use crate::settings::{
    BrushSettings, PencilSettings, PlumeSettings, RectangleSettings, SpraySettings,
};
use crate::surface::DrawingSurface;

/// Replayable canvas edits.
///
/// Every variant owns the parameters it was built with, so executing it
/// later produces the same pixels no matter how the tools are configured.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Freehand line
    Pencil {
        settings: PencilSettings,
        points: Vec<Pos2>,
    },

    /// Textured stamps along a path
    Brush {
        settings: BrushSettings,
        points: Vec<Pos2>,
    },

    /// Angled nib dragged along a path
    Plume {
        settings: PlumeSettings,
        points: Vec<Pos2>,
    },

    /// Droplets emitted while the spray was held, one group per timer burst.
    /// Each burst composites on its own, the same way it was painted live.
    Spray {
        settings: SpraySettings,
        bursts: Vec<Vec<Pos2>>,
    },

    /// Rectangle between two drag points
    Rectangle {
        settings: RectangleSettings,
        start: Pos2,
        end: Pos2,
        square: bool,
    },

    /// Whole canvas as it looked after a paint bucket fill
    Fill { image: PixelBuffer },

    /// Canvas dimension change
    Resize {
        from: (usize, usize),
        to: (usize, usize),
    },

    /// Cut, delete, paste or move of a selection
    Selection(SelectionEdit),
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Pencil { settings, points } => f
                .debug_struct("Pencil")
                .field("settings", settings)
                .field("points", &points.len())
                .finish(),
            Command::Brush { settings, points } => f
                .debug_struct("Brush")
                .field("settings", settings)
                .field("points", &points.len())
                .finish(),
            Command::Plume { settings, points } => f
                .debug_struct("Plume")
                .field("settings", settings)
                .field("points", &points.len())
                .finish(),
            Command::Spray { settings, bursts } => f
                .debug_struct("Spray")
                .field("settings", settings)
                .field("bursts", &bursts.len())
                .field("droplets", &bursts.iter().map(Vec::len).sum::<usize>())
                .finish(),
            Command::Rectangle {
                settings,
                start,
                end,
                square,
            } => f
                .debug_struct("Rectangle")
                .field("settings", settings)
                .field("start", start)
                .field("end", end)
                .field("square", square)
                .finish(),
            Command::Fill { image } => f.debug_struct("Fill").field("image", image).finish(),
            Command::Resize { from, to } => f
                .debug_struct("Resize")
                .field("from", from)
                .field("to", to)
                .finish(),
            Command::Selection(edit) => f
                .debug_struct("Selection")
                .field("erase", &edit.erase)
                .field("paste", &edit.paste.as_ref().map(|p| (p.x, p.y)))
                .finish(),
        }
    }
}

impl Command {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Pencil { .. } => "pencil",
            Command::Brush { .. } => "brush",
            Command::Plume { .. } => "plume",
            Command::Spray { .. } => "spray",
            Command::Rectangle { .. } => "rectangle",
            Command::Fill { .. } => "fill",
            Command::Resize { .. } => "resize",
            Command::Selection(_) => "selection",
        }
    }

    /// Resizes cannot be undone by replay alone: the buffer size itself changed
    pub fn is_resize(&self) -> bool {
        matches!(self, Command::Resize { .. })
    }

    /// Apply this command to the surface's base buffer
    pub fn execute(&self, surface: &mut dyn DrawingSurface) -> CommandResult {
        match self {
            Command::Resize { to, .. } => {
                surface.resize(to.0, to.1)?;
                Ok(())
            }
            _ => self.draw(surface.base_mut()),
        }
    }

    /// Undo a resize before the history replays; other commands have no inverse
    pub fn unexecute(&self, surface: &mut dyn DrawingSurface) -> CommandResult {
        match self {
            Command::Resize { from, .. } => {
                debug!("Reverting resize to {}x{}", from.0, from.1);
                surface.resize(from.0, from.1)?;
                Ok(())
            }
            _ => Err(CommandError::InvalidState(format!(
                "{} commands are undone by replay, not unexecute",
                self.name()
            ))),
        }
    }

    /// Render onto an arbitrary buffer; used for the base and for previews
    pub fn draw(&self, buffer: &mut PixelBuffer) -> CommandResult {
        match self {
            Command::Pencil { settings, points } => render::pencil(buffer, settings, points),
            Command::Brush { settings, points } => render::brush(buffer, settings, points),
            Command::Plume { settings, points } => render::plume(buffer, settings, points),
            Command::Spray { settings, bursts } => render::spray(buffer, settings, bursts),
            Command::Rectangle {
                settings,
                start,
                end,
                square,
            } => render::rectangle(buffer, settings, *start, *end, *square),
            Command::Fill { image } => buffer.blit(image, 0, 0),
            Command::Selection(edit) => edit.apply(buffer),
            Command::Resize { .. } => {
                return Err(CommandError::InvalidParameters(
                    "a resize has no pixels to draw".to_string(),
                ));
            }
        }
        Ok(())
    }
}
