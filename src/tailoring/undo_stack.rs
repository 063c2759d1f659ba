//! Linear undo history with a current index.
//!
//! Commands below `index` are applied, the rest form the redo tail. Pushing
//! applies the command, drops the redo tail and then tries to fold the new
//! command into the previous one.

use super::commands::UndoCommand;
use super::session::EditorState;
use crate::error::Result;
use crate::log_history;

#[derive(Debug, Default)]
pub struct UndoStack {
    commands: Vec<UndoCommand>,
    index: usize,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `command` and record it.
    ///
    /// Nothing is recorded when `redo` fails.
    pub fn push(&mut self, command: UndoCommand, state: &mut EditorState) -> Result<()> {
        command.redo(state)?;
        self.commands.truncate(self.index);

        if let Some(top) = self.commands.last_mut() {
            if top.id() == command.id() && top.merge_with(&command) {
                log_history!("merged: {}", top.text());
                return Ok(());
            }
        }

        log_history!("push: {}", command.text());
        self.commands.push(command);
        self.index = self.commands.len();
        Ok(())
    }

    /// Revert the command before the index. `false` when there is none.
    pub fn undo(&mut self, state: &mut EditorState) -> Result<bool> {
        if self.index == 0 {
            return Ok(false);
        }
        let command = &self.commands[self.index - 1];
        command.undo(state)?;
        log_history!("undo: {}", command.text());
        self.index -= 1;
        Ok(true)
    }

    /// Re-apply the command at the index. `false` when there is none.
    pub fn redo(&mut self, state: &mut EditorState) -> Result<bool> {
        let Some(command) = self.commands.get(self.index) else {
            return Ok(false);
        };
        command.redo(state)?;
        log_history!("redo: {}", command.text());
        self.index += 1;
        Ok(true)
    }

    /// Walk the history to `target` (clamped), one command at a time.
    pub fn set_index(&mut self, target: usize, state: &mut EditorState) -> Result<()> {
        let target = target.min(self.commands.len());
        while self.index > target {
            self.undo(state)?;
        }
        while self.index < target {
            self.redo(state)?;
        }
        Ok(())
    }

    /// Undo everything; the commands stay available for redo.
    pub fn reset_to_initial(&mut self, state: &mut EditorState) -> Result<()> {
        self.set_index(0, state)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index < self.commands.len()
    }

    pub fn undo_text(&self) -> Option<String> {
        self.index
            .checked_sub(1)
            .and_then(|i| self.commands.get(i))
            .map(UndoCommand::text)
    }

    pub fn redo_text(&self) -> Option<String> {
        self.commands.get(self.index).map(UndoCommand::text)
    }

    pub fn commands(&self) -> &[UndoCommand] {
        &self.commands
    }

    /// History labels, oldest first
    pub fn labels(&self) -> Vec<String> {
        self.commands.iter().map(UndoCommand::text).collect()
    }
}
