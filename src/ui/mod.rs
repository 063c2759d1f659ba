//! UI Module - egui presentation of a tailoring session
//!
//! Views never touch the model. Each frame they read the session and collect
//! `UiAction`s; the app applies those after rendering, through the session
//! API only.

pub mod app;
pub mod panels;
pub mod tree_view;

use crate::tailoring::NodeId;

pub use app::{TailoringApp, UIState};

/// User interaction captured while rendering a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    SetChecked(NodeId, bool),
    SetExpanded(NodeId, bool),
    Select(Option<NodeId>),
    EditTitle(String),
    EditDescription(String),
    EditValue(String),
    Undo,
    Redo,
    SetHistoryIndex(usize),
    ToggleHistory,
    Confirm,
    Cancel,
    DeleteProfile,
}
