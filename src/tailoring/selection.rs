//! Selection state accessor.
//!
//! `set_item_selected` is the only place selection is mutated. It is called
//! from undo command redo/undo, never straight from a UI handler.

use crate::error::{Result, TailoringError};
use crate::models::Select;
use crate::xccdf::Policy;

/// Effective selection: profile override if present, else document default.
pub fn is_item_selected(policy: &Policy, item: &str) -> Result<bool> {
    policy.is_selected(item)
}

/// Record a Select override in both the profile and the policy, then verify
/// the policy reports it.
pub fn set_item_selected(policy: &mut Policy, item: &str, selected: bool) -> Result<()> {
    // Unknown ids must not leave a dangling override behind
    policy.benchmark().item(item)?;

    let select = Select::new(item, selected);
    policy
        .profile_mut()
        .ok_or(TailoringError::MissingProfile)?
        .add_select(select.clone());
    policy.add_select(select);

    let actual = is_item_selected(policy, item)?;
    if actual != selected {
        return Err(TailoringError::SelectionMismatch {
            item: item.to_string(),
            expected: selected,
            actual,
        });
    }
    Ok(())
}
