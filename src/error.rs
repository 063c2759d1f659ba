//! Unified error type hierarchy for the XCCDF tailoring editor
//!
//! Provides structured error handling with TailoringError (session and
//! document-model failures) and ConfigError (settings and document loading).

use std::io;
use thiserror::Error;

/// Configuration file and document loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid JSON in config: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("IO error during config operations: {0}")]
    IoError(#[from] io::Error),
}

/// Errors raised by a tailoring session and the document model behind it.
///
/// Everything except [`TailoringError::InputRejected`] is fatal: the
/// operation that produced it is aborted and the session must not keep
/// editing, because the three synchronized representations can no longer be
/// trusted to agree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TailoringError {
    /// Session constructed without a policy
    #[error("Tailoring needs a proper policy being given, none was given instead")]
    MissingPolicy,

    /// Policy was given but it carries no profile
    #[error("Tailoring was given a policy but the profile associated with it is missing")]
    MissingProfile,

    /// Session constructed without a benchmark
    #[error("Tailoring was given no benchmark, can't proceed")]
    MissingBenchmark,

    /// A Select override was written but the policy does not report it
    #[error("Select override for '{item}' was added to both profile and policy to make it selected={expected}, it remains selected={actual}")]
    SelectionMismatch {
        item: String,
        expected: bool,
        actual: bool,
    },

    /// A SetValue override was written but the policy evaluates something else
    #[error("Value '{item}' was set to '{expected}' but the policy evaluates it as '{actual}'")]
    ValueMismatch {
        item: String,
        expected: String,
        actual: String,
    },

    /// Profile text was written but reads back differently
    #[error("Profile {field} was set to '{expected}' but reads back as '{actual}'")]
    TextMismatch {
        field: &'static str,
        expected: String,
        actual: String,
    },

    /// The profile has no localized text entry that could be edited
    #[error("No suitable text entry found that could be edited to change profile {field}")]
    NoEditableText { field: &'static str },

    /// Policy was built on a different benchmark than the one given
    #[error("Policy does not belong to benchmark '{0}'")]
    BenchmarkMismatch(String),

    /// Item id not present in the benchmark
    #[error("Unknown benchmark item: {0}")]
    UnknownItem(String),

    /// Item id already used elsewhere in the benchmark
    #[error("Duplicate benchmark item id: {0}")]
    DuplicateItem(String),

    /// Display node id not present in the tree
    #[error("Unknown display node: {0}")]
    UnknownNode(usize),

    /// Operation requires a different item kind
    #[error("Item '{item}' is a {actual}, expected {expected}")]
    WrongItemType {
        item: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Session was already closed or failed and refuses further edits
    #[error("Tailoring session is no longer open")]
    SessionClosed,

    /// Candidate input refused by the value-type constraint (recoverable)
    #[error("Input '{value}' rejected: expected {constraint}")]
    InputRejected {
        value: String,
        constraint: &'static str,
    },
}

impl TailoringError {
    /// Whether the error must abort the session rather than just the edit
    pub fn is_fatal(&self) -> bool {
        !matches!(self, TailoringError::InputRejected { .. })
    }

    /// Get a user-facing error message suitable for UI display
    pub fn user_message(&self) -> String {
        match self {
            TailoringError::MissingPolicy
            | TailoringError::MissingProfile
            | TailoringError::MissingBenchmark
            | TailoringError::BenchmarkMismatch(_) => {
                format!("Cannot open tailoring window: {}", self)
            }
            TailoringError::NoEditableText { field } => format!(
                "The profile has no {} text that can be edited. Adding new localized text is not supported.",
                field
            ),
            TailoringError::InputRejected { constraint, .. } => {
                format!("Please enter {}", constraint)
            }
            TailoringError::SessionClosed => "The tailoring window was already closed".to_string(),
            _ => format!("Internal consistency error, tailoring aborted: {}", self),
        }
    }
}

/// Top-level result type for tailoring operations.
pub type Result<T> = std::result::Result<T, TailoringError>;
