//! Undo-aware tailoring core.
//!
//! # Module Structure
//!
//! - `selection`, `values`, `metadata`: the only writers of profile state
//! - `tree`: display nodes, item index and the synchronizer lock
//! - `synchronizer`: benchmark → display tree mirroring and enablement
//! - `commands`, `undo_stack`: reversible edits and their history
//! - `panels`, `validation`: property panels and value input constraints
//! - `session`: ties it all together for one tailoring window

pub mod commands;
pub mod metadata;
pub mod panels;
pub mod selection;
pub mod session;
pub mod synchronizer;
pub mod tree;
pub mod undo_stack;
pub mod validation;
pub mod values;

pub use commands::UndoCommand;
pub use panels::{ItemPropertiesPanel, PanelEdit, PanelState, ProfilePropertiesPanel};
pub use session::{
    EditorState, HistoryView, Lifecycle, TailoringHost, TailoringOutcome, TailoringSession,
};
pub use tree::{ChangeOrigin, DisplayNode, DisplayTree, NodeId};
pub use undo_stack::UndoStack;
pub use validation::{InputConstraint, InputState};
