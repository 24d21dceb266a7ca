//! Glue between the canvas, the history and the active tool.
//!
//! A gesture locks the history for its whole duration. When it finishes,
//! its command is executed on the base, the lock is released and only then
//! is the command pushed.

use std::collections::HashMap;
use std::time::Duration;

use egui::Pos2;
use log::{debug, info, warn};

use crate::color::Color;
use crate::command::{Command, CommandError, CommandResult, HistoryOutcome, UndoRedoEngine};
use crate::config::{EditorConfig, ToolDefaults};
use crate::selection::{self, Clipboard, SelectionRect};
use crate::surface::{Canvas, DrawingSurface, SurfaceTarget};
use crate::tools::{PointerButton, Tool, ToolKind, ToolResponse, ToolType};

pub struct Editor {
    config: EditorConfig,
    canvas: Canvas,
    history: UndoRedoEngine,
    active_tool: ToolType,
    /// Tools not currently selected, keeping their settings
    parked_tools: HashMap<ToolKind, ToolType>,
    clipboard: Clipboard,
}

impl Editor {
    pub fn new(config: EditorConfig) -> CommandResult<Self> {
        config.validate()?;
        let canvas = Canvas::new(config.canvas.width, config.canvas.height, config.canvas.background)?;
        let active_tool = ToolType::new(ToolKind::Pencil, &Self::tool_defaults(&config));
        info!(
            "New editor with a {}x{} canvas",
            config.canvas.width, config.canvas.height
        );
        Ok(Self {
            config,
            canvas,
            history: UndoRedoEngine::new(),
            active_tool,
            parked_tools: HashMap::new(),
            clipboard: Clipboard::new(),
        })
    }

    fn tool_defaults(config: &EditorConfig) -> ToolDefaults {
        config.tools.with_colors_applied()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn history(&self) -> &UndoRedoEngine {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn tool(&self) -> &ToolType {
        &self.active_tool
    }

    /// Direct access for tool-specific settings (brush texture, nib angle...)
    pub fn tool_mut(&mut self) -> &mut ToolType {
        &mut self.active_tool
    }

    pub fn primary_color(&self) -> Color {
        self.config.tools.primary
    }

    pub fn secondary_color(&self) -> Color {
        self.config.tools.secondary
    }

    pub fn set_primary_color(&mut self, color: Color) {
        self.config.tools.primary = color;
        self.active_tool.set_primary_color(color);
    }

    pub fn set_secondary_color(&mut self, color: Color) {
        self.config.tools.secondary = color;
        if let ToolType::Rectangle(tool) = &mut self.active_tool {
            tool.set_secondary_color(color);
        }
    }

    /// Switch tools, abandoning any gesture in progress
    pub fn select_tool(&mut self, kind: ToolKind) -> CommandResult {
        if self.active_tool.kind() == kind {
            return Ok(());
        }
        self.cancel_gesture()?;

        let mut next = self
            .parked_tools
            .remove(&kind)
            .unwrap_or_else(|| ToolType::new(kind, &Self::tool_defaults(&self.config)));
        next.set_primary_color(self.config.tools.primary);
        if let ToolType::Rectangle(tool) = &mut next {
            tool.set_secondary_color(self.config.tools.secondary);
        }

        let previous = std::mem::replace(&mut self.active_tool, next);
        debug!("Switched tool from {} to {}", previous.name(), self.active_tool.name());
        self.parked_tools.insert(previous.kind(), previous);
        Ok(())
    }

    pub fn pointer_down(&mut self, pos: Pos2, button: PointerButton) -> CommandResult {
        if self.active_tool.is_active() {
            return Ok(());
        }
        let response = self
            .active_tool
            .on_pointer_down(pos, button, self.canvas.base())?;
        self.handle(response)
    }

    pub fn pointer_move(&mut self, pos: Pos2) -> CommandResult {
        let response = self.active_tool.on_pointer_move(pos);
        self.handle(response)
    }

    pub fn pointer_up(&mut self, pos: Pos2) -> CommandResult {
        let response = self.active_tool.on_pointer_up(pos);
        self.handle(response)
    }

    pub fn pointer_leave(&mut self, pos: Pos2) -> CommandResult {
        let size = self.canvas.current_dimensions();
        let response = self.active_tool.on_pointer_leave(pos, size);
        self.handle(response)
    }

    pub fn pointer_enter(&mut self, pos: Pos2) -> CommandResult {
        let response = self.active_tool.on_pointer_enter(pos);
        self.handle(response)
    }

    pub fn set_shift(&mut self, pressed: bool) -> CommandResult {
        let response = self.active_tool.on_modifier(pressed);
        self.handle(response)
    }

    /// Advance timed tools; the host calls this from its frame loop
    pub fn tick(&mut self, delta: Duration) -> CommandResult {
        let response = self.active_tool.tick(delta);
        self.handle(response)
    }

    /// Drop the gesture in progress and anything it painted
    pub fn cancel_gesture(&mut self) -> CommandResult {
        if !self.active_tool.is_active() {
            return Ok(());
        }
        debug!("Cancelled {} gesture", self.active_tool.name());
        self.active_tool.cancel();
        self.canvas.clear(SurfaceTarget::Preview);
        self.history.set_is_allowed(true);
        // Live strokes (spray) may already be on the base
        self.history.replay(&mut self.canvas)
    }

    fn handle(&mut self, response: ToolResponse) -> CommandResult {
        match response {
            ToolResponse::None => Ok(()),
            ToolResponse::Began => {
                debug!("{} gesture started", self.active_tool.name());
                self.history.clear_redo();
                self.history.set_is_allowed(false);
                self.refresh_preview()
            }
            ToolResponse::Updated => self.refresh_preview(),
            ToolResponse::Live(command) => command.execute(&mut self.canvas),
            ToolResponse::Finished { command, applied } => self.commit(command, applied).map(|_| ()),
            ToolResponse::Cancelled => {
                self.canvas.clear(SurfaceTarget::Preview);
                self.history.set_is_allowed(true);
                Ok(())
            }
        }
    }

    fn refresh_preview(&mut self) -> CommandResult {
        self.canvas.clear(SurfaceTarget::Preview);
        match self.active_tool.preview() {
            Some(command) => command.draw(self.canvas.buffer_mut(SurfaceTarget::Preview)),
            None => Ok(()),
        }
    }

    /// Execute (unless already painted), release the lock, then record
    fn commit(&mut self, command: Command, applied: bool) -> CommandResult<HistoryOutcome> {
        // Single-click tools never sent `Began`
        self.history.clear_redo();

        let executed = if applied {
            Ok(())
        } else {
            command.execute(&mut self.canvas)
        };
        self.canvas.clear(SurfaceTarget::Preview);
        self.history.set_is_allowed(true);
        executed?;

        Ok(self.history.push(command))
    }

    /// Apply a one-shot edit outside of any gesture
    fn record(&mut self, command: Command) -> CommandResult<HistoryOutcome> {
        if !self.history.is_allowed() {
            warn!("Ignored {}: a gesture is in progress", command.name());
            return Ok(HistoryOutcome::Dropped);
        }
        self.history.clear_redo();
        command.execute(&mut self.canvas)?;
        Ok(self.history.push(command))
    }

    pub fn undo(&mut self) -> CommandResult<HistoryOutcome> {
        self.history.undo(&mut self.canvas)
    }

    pub fn redo(&mut self) -> CommandResult<HistoryOutcome> {
        self.history.redo(&mut self.canvas)
    }

    /// Resize the canvas as an undoable edit
    pub fn resize(&mut self, width: usize, height: usize) -> CommandResult<HistoryOutcome> {
        let min = self.config.canvas.min_size;
        if width < min || height < min {
            return Err(CommandError::InvalidParameters(format!(
                "canvas sides must be at least {min}, got {width}x{height}"
            )));
        }
        let from = self.canvas.current_dimensions();
        if from == (width, height) {
            return Ok(HistoryOutcome::EmptyStackNoOp);
        }
        self.record(Command::Resize {
            from,
            to: (width, height),
        })
    }

    /// Start over with a blank canvas of the configured size and no history
    pub fn new_drawing(&mut self) -> CommandResult {
        self.active_tool.cancel();
        self.history.clear();
        self.history.set_is_allowed(true);
        let canvas = &self.config.canvas;
        self.canvas = Canvas::new(canvas.width, canvas.height, canvas.background)?;
        info!("Started a new drawing");
        Ok(())
    }

    /// Copy the selection; returns false when it lies outside the canvas
    pub fn copy(&mut self, selection: SelectionRect) -> CommandResult<bool> {
        Ok(self.clipboard.copy(self.canvas.base(), selection)?)
    }

    pub fn cut(&mut self, selection: SelectionRect) -> CommandResult<HistoryOutcome> {
        if !self.history.is_allowed() {
            return Ok(HistoryOutcome::Dropped);
        }
        match self
            .clipboard
            .cut(self.canvas.base(), selection, self.canvas.background())?
        {
            Some(edit) => self.record(Command::Selection(edit)),
            None => Ok(HistoryOutcome::EmptyStackNoOp),
        }
    }

    /// Paste the clipboard with its top-left corner at `at`
    pub fn paste(&mut self, at: Pos2) -> CommandResult<HistoryOutcome> {
        match self.clipboard.paste(at) {
            Some(edit) => self.record(Command::Selection(edit)),
            None => Ok(HistoryOutcome::EmptyStackNoOp),
        }
    }

    pub fn delete_selection(&mut self, selection: SelectionRect) -> CommandResult<HistoryOutcome> {
        match selection::delete(self.canvas.base(), selection, self.canvas.background()) {
            Some(edit) => self.record(Command::Selection(edit)),
            None => Ok(HistoryOutcome::EmptyStackNoOp),
        }
    }

    pub fn move_selection(&mut self, selection: SelectionRect, to: Pos2) -> CommandResult<HistoryOutcome> {
        match selection::move_selection(self.canvas.base(), selection, to, self.canvas.background())? {
            Some(edit) => self.record(Command::Selection(edit)),
            None => Ok(HistoryOutcome::EmptyStackNoOp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::EngineState;
    use egui::pos2;

    fn small_config() -> EditorConfig {
        let mut config = EditorConfig::default();
        config.canvas.width = 300;
        config.canvas.height = 260;
        config
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = small_config();
        config.tools.spray.frequency_hz = 0.0;
        assert!(matches!(Editor::new(config), Err(CommandError::Config(_))));

        let mut config = small_config();
        config.canvas.width = 100;
        assert!(matches!(Editor::new(config), Err(CommandError::Config(_))));
    }

    #[test]
    fn gesture_locks_history_until_release() {
        let mut editor = Editor::new(small_config()).unwrap();
        editor.pointer_down(pos2(10.0, 10.0), PointerButton::Primary).unwrap();
        assert_eq!(editor.history().state(), EngineState::ReplayLocked);
        assert_eq!(editor.undo().unwrap(), HistoryOutcome::Dropped);

        editor.pointer_move(pos2(40.0, 10.0)).unwrap();
        assert_eq!(editor.canvas().buffer(SurfaceTarget::Preview).get(25, 10).unwrap(), Color::BLACK);
        assert_eq!(editor.canvas().base().get(25, 10).unwrap(), Color::WHITE);

        editor.pointer_up(pos2(40.0, 10.0)).unwrap();
        assert_eq!(editor.history().state(), EngineState::Idle);
        assert_eq!(editor.history().undo_stack().len(), 1);
        assert_eq!(editor.canvas().base().get(25, 10).unwrap(), Color::BLACK);
        assert_eq!(editor.canvas().buffer(SurfaceTarget::Preview).get(25, 10).unwrap(), Color::TRANSPARENT);
    }

    #[test]
    fn tools_keep_settings_when_switching() {
        let mut editor = Editor::new(small_config()).unwrap();
        editor.select_tool(ToolKind::Plume).unwrap();
        if let ToolType::Plume(plume) = editor.tool_mut() {
            plume.set_angle(45.0);
        }
        editor.select_tool(ToolKind::Brush).unwrap();
        editor.select_tool(ToolKind::Plume).unwrap();
        let ToolType::Plume(plume) = editor.tool() else {
            panic!("expected the plume");
        };
        assert_eq!(plume.settings().angle_degrees, 45.0);
    }

    #[test]
    fn resize_below_minimum_is_rejected() {
        let mut editor = Editor::new(small_config()).unwrap();
        assert!(matches!(editor.resize(100, 300), Err(CommandError::InvalidParameters(_))));
        assert_eq!(editor.resize(300, 260).unwrap(), HistoryOutcome::EmptyStackNoOp);
        assert!(editor.history().undo_stack().is_empty());
    }

    #[test]
    fn new_drawing_forgets_history() {
        let mut editor = Editor::new(small_config()).unwrap();
        editor.resize(400, 400).unwrap();
        editor.new_drawing().unwrap();
        assert!(!editor.history().can_undo());
        assert_eq!(editor.canvas().current_dimensions(), (300, 260));
    }

    #[test]
    fn selected_tool_gets_current_colors() {
        let mut editor = Editor::new(small_config()).unwrap();
        editor.set_primary_color(Color::RED);
        editor.select_tool(ToolKind::PaintBucket).unwrap();
        let ToolType::PaintBucket(bucket) = editor.tool() else {
            panic!("expected the bucket");
        };
        assert_eq!(bucket.settings().color, Color::RED);
    }
}
