#![warn(clippy::all, rust_2018_idioms)]

pub mod color;
pub mod command;
pub mod config;
pub mod editor;
pub mod error;
pub mod fill;
pub mod pixel_buffer;
pub mod raster;
pub mod selection;
pub mod settings;
pub mod surface;
pub mod tools;

pub use color::Color;
pub use command::{Command, CommandError, CommandResult, EngineState, HistoryOutcome, UndoRedoEngine};
pub use config::{ConfigError, EditorConfig};
pub use editor::Editor;
pub use error::{BufferError, FillError};
pub use fill::{ColorMatcher, FillMode, FloodFillEngine, Tolerance};
pub use pixel_buffer::PixelBuffer;
pub use selection::{Clipboard, SelectionRect};
pub use surface::{Canvas, DrawingSurface, SurfaceTarget};
pub use tools::{PointerButton, Tool, ToolKind, ToolResponse, ToolType};
