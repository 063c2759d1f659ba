//! Value override store: effective value of tunables and SetValue writes.

use crate::error::{Result, TailoringError};
use crate::models::SetValue;
use crate::xccdf::Policy;

/// Effective value of a Value item as evaluated by the policy.
pub fn current_value(policy: &Policy, item: &str) -> Result<String> {
    policy.value_of(item)
}

/// Append a SetValue override to the profile and verify the policy sees it.
pub fn set_value(policy: &mut Policy, item: &str, new_value: &str) -> Result<()> {
    // Validates existence and kind before anything is appended
    current_value(policy, item)?;

    policy
        .profile_mut()
        .ok_or(TailoringError::MissingProfile)?
        .add_setvalue(SetValue::new(item, new_value));

    let actual = current_value(policy, item)?;
    if actual != new_value {
        return Err(TailoringError::ValueMismatch {
            item: item.to_string(),
            expected: new_value.to_string(),
            actual,
        });
    }
    Ok(())
}
