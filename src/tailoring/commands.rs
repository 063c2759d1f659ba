//! Reversible edits recorded in the undo history.
//!
//! Every mutation of the profile goes through one of these. A command stores
//! only item ids; the display node it refreshes is looked up through the
//! tree's item index when it runs.

use super::session::EditorState;
use crate::error::Result;

pub const SELECT_TOGGLE_ID: u32 = 1;
pub const PROFILE_TITLE_ID: u32 = 2;
pub const PROFILE_DESCRIPTION_ID: u32 = 3;
pub const VALUE_CHANGE_ID: u32 = 4;

/// Characters of a new description kept in the history label
const DESCRIPTION_LABEL_CHARS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoCommand {
    /// Flip the selection of a Group or Rule
    SelectToggle { item: String, new_select: bool },
    ProfileTitleChange { old: String, new: String },
    ProfileDescriptionChange { old: String, new: String },
    ValueChange {
        item: String,
        old: String,
        new: String,
    },
}

impl UndoCommand {
    /// Merge-compatibility id
    pub fn id(&self) -> u32 {
        match self {
            UndoCommand::SelectToggle { .. } => SELECT_TOGGLE_ID,
            UndoCommand::ProfileTitleChange { .. } => PROFILE_TITLE_ID,
            UndoCommand::ProfileDescriptionChange { .. } => PROFILE_DESCRIPTION_ID,
            UndoCommand::ValueChange { .. } => VALUE_CHANGE_ID,
        }
    }

    /// Label shown in the history view
    pub fn text(&self) -> String {
        match self {
            UndoCommand::SelectToggle { item, new_select } => {
                let verb = if *new_select { "select" } else { "unselect" };
                format!("{} '{}'", verb, item)
            }
            UndoCommand::ProfileTitleChange { new, .. } => {
                format!("profile title to \"{}\"", new)
            }
            UndoCommand::ProfileDescriptionChange { new, .. } => {
                let short: String = new.chars().take(DESCRIPTION_LABEL_CHARS).collect();
                format!("profile description to \"{}...\"", short)
            }
            UndoCommand::ValueChange { item, new, .. } => {
                format!("set value '{}' to '{}'", item, new)
            }
        }
    }

    pub fn redo(&self, state: &mut EditorState) -> Result<()> {
        match self {
            UndoCommand::SelectToggle { item, new_select } => {
                state.set_item_selected(item, *new_select)?;
                state.resync_item(item)
            }
            UndoCommand::ProfileTitleChange { new, .. } => {
                state.set_profile_title(new)?;
                state.refresh_profile_panel()
            }
            UndoCommand::ProfileDescriptionChange { new, .. } => {
                state.set_profile_description(new)?;
                state.refresh_profile_panel()
            }
            UndoCommand::ValueChange { item, new, .. } => {
                state.set_value(item, new)?;
                state.refresh_item_panel()
            }
        }
    }

    pub fn undo(&self, state: &mut EditorState) -> Result<()> {
        match self {
            UndoCommand::SelectToggle { item, new_select } => {
                state.set_item_selected(item, !*new_select)?;
                state.resync_item(item)
            }
            UndoCommand::ProfileTitleChange { old, .. } => {
                state.set_profile_title(old)?;
                state.refresh_profile_panel()
            }
            UndoCommand::ProfileDescriptionChange { old, .. } => {
                state.set_profile_description(old)?;
                state.refresh_profile_panel()
            }
            UndoCommand::ValueChange { item, old, .. } => {
                state.set_value(item, old)?;
                state.refresh_item_panel()
            }
        }
    }

    /// Absorb a newer command of the same kind, keeping this one's `old`.
    ///
    /// Selection toggles never merge; value changes merge only for the same
    /// Value item.
    pub fn merge_with(&mut self, newer: &UndoCommand) -> bool {
        match (self, newer) {
            (
                UndoCommand::ProfileTitleChange { new, .. },
                UndoCommand::ProfileTitleChange { new: latest, .. },
            )
            | (
                UndoCommand::ProfileDescriptionChange { new, .. },
                UndoCommand::ProfileDescriptionChange { new: latest, .. },
            ) => {
                *new = latest.clone();
                true
            }
            (
                UndoCommand::ValueChange { item, new, .. },
                UndoCommand::ValueChange {
                    item: other,
                    new: latest,
                    ..
                },
            ) if *item == *other => {
                *new = latest.clone();
                true
            }
            _ => false,
        }
    }
}
