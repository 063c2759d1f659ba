//! Input constraints for editing Value items, driven by the declared type.
//!
//! A tool may reject number input that is not made of digits, which rules out
//! decimals; an optional sign is allowed. Booleans accept a fixed token set in
//! lower, Capitalized or UPPER case.
//!
//! Input is classified the way a line-edit validator does it: text that can
//! still grow into an accepted value while typing is `Intermediate`.

use crate::error::{Result, TailoringError};
use crate::models::ValueType;
use once_cell::sync::Lazy;
use regex::Regex;

const BOOLEAN_TOKENS: &[&str] = &[
    "true", "false", "True", "False", "TRUE", "FALSE", "1", "0", "yes", "no", "Yes", "No", "YES",
    "NO",
];

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?[0-9]+$").expect("valid regex"));

static NUMBER_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?$").expect("valid regex"));

static BOOLEAN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^({})$", BOOLEAN_TOKENS.join("|"))).expect("valid regex")
});

/// How far a candidate input is from an accepted value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Acceptable,
    /// Not a value yet, but typing more can make it one
    Intermediate,
    Invalid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputConstraint {
    Digits,
    Unconstrained,
    BooleanToken,
}

impl InputConstraint {
    pub fn for_value_type(value_type: ValueType) -> Self {
        match value_type {
            ValueType::Number => InputConstraint::Digits,
            ValueType::String => InputConstraint::Unconstrained,
            ValueType::Boolean => InputConstraint::BooleanToken,
        }
    }

    pub fn classify(&self, candidate: &str) -> InputState {
        match self {
            InputConstraint::Unconstrained => InputState::Acceptable,
            InputConstraint::Digits => {
                if NUMBER_RE.is_match(candidate) {
                    InputState::Acceptable
                } else if NUMBER_PREFIX_RE.is_match(candidate) {
                    InputState::Intermediate
                } else {
                    InputState::Invalid
                }
            }
            InputConstraint::BooleanToken => {
                if BOOLEAN_RE.is_match(candidate) {
                    InputState::Acceptable
                } else if BOOLEAN_TOKENS.iter().any(|t| t.starts_with(candidate)) {
                    InputState::Intermediate
                } else {
                    InputState::Invalid
                }
            }
        }
    }

    pub fn accepts(&self, candidate: &str) -> bool {
        self.classify(candidate) == InputState::Acceptable
    }

    pub fn describe(&self) -> &'static str {
        match self {
            InputConstraint::Digits => "an integer",
            InputConstraint::Unconstrained => "any text",
            InputConstraint::BooleanToken => "true/false, yes/no or 1/0",
        }
    }

    /// `Ok` unless the input can never become a value, in which case the
    /// recoverable `InputRejected` error.
    pub fn check(&self, candidate: &str) -> Result<InputState> {
        match self.classify(candidate) {
            InputState::Invalid => Err(TailoringError::InputRejected {
                value: candidate.to_string(),
                constraint: self.describe(),
            }),
            state => Ok(state),
        }
    }
}
