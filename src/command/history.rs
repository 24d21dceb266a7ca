use log::{debug, info, warn};

use super::{Command, CommandResult};
use crate::surface::{DrawingSurface, SurfaceTarget};

/// Whether the history currently accepts requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    /// Accepts push, undo and redo
    #[default]
    Idle,
    /// A gesture or a replay owns the canvas; requests are dropped
    ReplayLocked,
}

/// What a history request did, when it did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOutcome {
    Applied,
    /// Nothing to undo or redo
    EmptyStackNoOp,
    /// The engine was locked; the request was discarded, not queued
    Dropped,
}

/// Undo/redo by full replay.
///
/// The visible canvas always equals "every command on the undo stack,
/// executed in order on a blank base". Undo and redo move one command
/// between the stacks, clear the base and replay, so commands never need
/// an inverse (resizes excepted). Replay cost grows with history depth.
#[derive(Debug, Default)]
pub struct UndoRedoEngine {
    /// Stack of commands currently applied, oldest first
    undo_stack: Vec<Command>,
    /// Stack of undone commands, most recently undone last
    redo_stack: Vec<Command>,
    state: EngineState,
}

impl UndoRedoEngine {
    /// Creates a new empty history in the `Idle` state
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_allowed(&self) -> bool {
        self.state == EngineState::Idle
    }

    /// Tools close the gate for the duration of a gesture and reopen it after
    pub fn set_is_allowed(&mut self, allowed: bool) {
        self.state = if allowed {
            EngineState::Idle
        } else {
            EngineState::ReplayLocked
        };
    }

    /// Record a command that has already been applied to the canvas
    pub fn push(&mut self, command: Command) -> HistoryOutcome {
        if !self.is_allowed() {
            warn!("Dropped {} command: history is locked", command.name());
            return HistoryOutcome::Dropped;
        }
        debug!("Recorded {} command ({} on undo stack)", command.name(), self.undo_stack.len() + 1);
        self.undo_stack.push(command);
        HistoryOutcome::Applied
    }

    /// A new edit invalidates everything that was undone
    pub fn clear_redo(&mut self) {
        self.redo_stack.clear();
    }

    pub fn clear_undo(&mut self) {
        self.undo_stack.clear();
    }

    /// Forget all history, e.g. when a new drawing is started
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Undo the most recent command
    pub fn undo(&mut self, surface: &mut dyn DrawingSurface) -> CommandResult<HistoryOutcome> {
        if !self.is_allowed() {
            warn!("Undo ignored: history is locked");
            return Ok(HistoryOutcome::Dropped);
        }
        let Some(command) = self.undo_stack.pop() else {
            return Ok(HistoryOutcome::EmptyStackNoOp);
        };

        info!("↩️ Undo {}", command.name());
        let reverted = if command.is_resize() {
            command.unexecute(surface)
        } else {
            Ok(())
        };
        self.redo_stack.push(command);
        reverted?;

        self.replay(surface)?;
        Ok(HistoryOutcome::Applied)
    }

    /// Redo the most recently undone command
    pub fn redo(&mut self, surface: &mut dyn DrawingSurface) -> CommandResult<HistoryOutcome> {
        if !self.is_allowed() {
            warn!("Redo ignored: history is locked");
            return Ok(HistoryOutcome::Dropped);
        }
        let Some(command) = self.redo_stack.pop() else {
            return Ok(HistoryOutcome::EmptyStackNoOp);
        };

        info!("↪️ Redo {}", command.name());
        self.undo_stack.push(command);
        self.replay(surface)?;
        Ok(HistoryOutcome::Applied)
    }

    /// Canvas size the oldest active command was recorded at: the `from` of
    /// the first resize on the stack, or the current size when there is none
    fn replay_origin(&self, surface: &dyn DrawingSurface) -> (usize, usize) {
        self.undo_stack
            .iter()
            .find_map(|command| match command {
                Command::Resize { from, .. } => Some(*from),
                _ => None,
            })
            .unwrap_or_else(|| surface.current_dimensions())
    }

    /// Clear the base and execute every active command in order.
    ///
    /// The surface is first brought back to the size the history started
    /// at, so each command draws on a canvas as large as when it was recorded.
    /// A failing command aborts the replay; the base then shows only the
    /// commands before it. There is no rollback.
    pub fn replay(&mut self, surface: &mut dyn DrawingSurface) -> CommandResult {
        let previous = self.state;
        self.state = EngineState::ReplayLocked;

        let (width, height) = self.replay_origin(surface);
        if let Err(err) = surface.resize(width, height) {
            self.state = previous;
            return Err(err.into());
        }
        surface.clear(SurfaceTarget::Base);

        let mut result = Ok(());
        for (index, command) in self.undo_stack.iter().enumerate() {
            if let Err(err) = command.execute(surface) {
                warn!("Replay stopped at command {index} ({}): {err}", command.name());
                result = Err(err);
                break;
            }
        }

        self.state = previous;
        debug!("Replayed {} commands", self.undo_stack.len());
        result
    }

    /// Returns true if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        self.is_allowed() && !self.undo_stack.is_empty()
    }

    /// Returns true if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        self.is_allowed() && !self.redo_stack.is_empty()
    }

    pub fn undo_stack(&self) -> &[Command] {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &[Command] {
        &self.redo_stack
    }
}
