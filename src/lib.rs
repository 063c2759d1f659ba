//! XCCDF Tailor
//!
//! Interactive editor for XCCDF tailoring profiles: toggle the selection of
//! rules and groups, override tunable values and edit the profile's title and
//! description, with every change undoable.
//!
//! The system is organized into functional modules:
//! - **error**: Unified error type hierarchy
//! - **models**: Core data structures and types
//! - **xccdf**: In-memory benchmark, profile and policy
//! - **tailoring**: Undo-aware editing core (tree sync, commands, panels, session)
//! - **config**: Editor settings
//! - **log_collector**: `log` backend with on-disk and in-memory sinks
//! - **ui**: egui frontend

// Core foundational modules
pub mod error;
pub mod models;

// Document model the editor works on
pub mod xccdf;

// Undo-aware editing core
pub mod tailoring;

// Editor settings
pub mod config;

// Logging backend
pub mod log_collector;

// egui frontend
pub mod ui;

// Re-export the log crate for macro usage
pub use log;

pub use log_collector::{LogCollector, LogLine};

// ============================================================================
// PUBLIC RE-EXPORTS FOR CONVENIENCE
// ============================================================================

pub use error::{ConfigError, Result, TailoringError};

pub use models::{ItemType, LocalizedText, Select, SetValue, TextSet, ValueType, DEFAULT_LANGUAGE};

pub use xccdf::{Benchmark, Item, Policy, Profile};

pub use config::{EditorSettings, SettingsManager};

pub use tailoring::{
    DisplayTree, NodeId, TailoringHost, TailoringOutcome, TailoringSession, UndoCommand,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
