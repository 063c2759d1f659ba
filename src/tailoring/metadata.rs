//! Profile title/description accessors.
//!
//! Edits target the entry in the configured default language, falling back to
//! the first entry. There is no way to add a new localized entry, so editing a
//! profile whose text set is empty fails with `NoEditableText`.

use crate::error::{Result, TailoringError};
use crate::models::TextSet;
use crate::xccdf::{Policy, Profile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Title,
    Description,
}

impl ProfileField {
    pub fn name(&self) -> &'static str {
        match self {
            ProfileField::Title => "title",
            ProfileField::Description => "description",
        }
    }

    fn text<'a>(&self, profile: &'a Profile) -> &'a TextSet {
        match self {
            ProfileField::Title => &profile.title,
            ProfileField::Description => &profile.description,
        }
    }

    fn text_mut<'a>(&self, profile: &'a mut Profile) -> &'a mut TextSet {
        match self {
            ProfileField::Title => &mut profile.title,
            ProfileField::Description => &mut profile.description,
        }
    }
}

pub fn profile_id(policy: &Policy) -> Result<String> {
    Ok(profile(policy)?.id.clone())
}

/// Preferred-language text of a profile field.
pub fn profile_text(policy: &Policy, field: ProfileField, lang: &str) -> Result<String> {
    Ok(field.text(profile(policy)?).preferred(lang).to_string())
}

/// Overwrite the editable entry of a profile field and re-tag it with `lang`.
pub fn set_profile_text(
    policy: &mut Policy,
    field: ProfileField,
    lang: &str,
    text: &str,
) -> Result<()> {
    let profile = policy.profile_mut().ok_or(TailoringError::MissingProfile)?;
    let set = field.text_mut(profile);
    let index = set
        .editable_index(lang)
        .ok_or(TailoringError::NoEditableText {
            field: field.name(),
        })?;
    if let Some(entry) = set.entry_mut(index) {
        entry.text = text.to_string();
        entry.lang = lang.to_string();
    }

    let actual = profile_text(policy, field, lang)?;
    if actual != text {
        return Err(TailoringError::TextMismatch {
            field: field.name(),
            expected: text.to_string(),
            actual,
        });
    }
    Ok(())
}

fn profile(policy: &Policy) -> Result<&Profile> {
    policy.profile().ok_or(TailoringError::MissingProfile)
}
