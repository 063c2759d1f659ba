//! Core data types for the XCCDF tailoring editor.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Language used when no other preference is configured.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Kind of a benchmark item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Benchmark,
    Group,
    Rule,
    Value,
}

impl ItemType {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Benchmark => "benchmark",
            ItemType::Group => "group",
            ItemType::Rule => "rule",
            ItemType::Value => "value",
        }
    }

    /// Qualified element name shown in the item properties panel
    pub fn qualified_name(&self) -> &'static str {
        match self {
            ItemType::Benchmark => "xccdf:Benchmark",
            ItemType::Group => "xccdf:Group",
            ItemType::Rule => "xccdf:Rule",
            ItemType::Value => "xccdf:Value",
        }
    }

    /// Groups and rules carry a user-toggleable selection.
    pub fn is_selectable(&self) -> bool {
        matches!(self, ItemType::Group | ItemType::Rule)
    }

    /// Benchmarks and groups own child items.
    pub fn is_container(&self) -> bool {
        matches!(self, ItemType::Benchmark | ItemType::Group)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of a tunable Value item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Number,
    #[default]
    String,
    Boolean,
}

impl<'de> Deserialize<'de> for ValueType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueTypeVisitor;

        impl<'de> Visitor<'de> for ValueTypeVisitor {
            type Value = ValueType;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("one of number, string, boolean")
            }

            fn visit_str<E>(self, value: &str) -> Result<ValueType, E>
            where
                E: de::Error,
            {
                match value.to_lowercase().as_str() {
                    "number" => Ok(ValueType::Number),
                    "string" => Ok(ValueType::String),
                    // Documents in the wild use both spellings
                    "boolean" | "bool" => Ok(ValueType::Boolean),
                    _ => Err(de::Error::unknown_variant(
                        value,
                        &["number", "string", "boolean"],
                    )),
                }
            }
        }

        deserializer.deserialize_str(ValueTypeVisitor)
    }
}

impl ValueType {
    /// Short label displayed next to the value input
    pub fn label(&self) -> &'static str {
        match self {
            ValueType::Number => "(number)",
            ValueType::String => "(string)",
            ValueType::Boolean => "(bool)",
        }
    }
}

/// One localized text entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub lang: String,
    pub text: String,
}

impl LocalizedText {
    pub fn new(lang: impl Into<String>, text: impl Into<String>) -> Self {
        LocalizedText {
            lang: lang.into(),
            text: text.into(),
        }
    }
}

/// Set of localized variants of one text (title or description).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextSet {
    entries: Vec<LocalizedText>,
}

impl TextSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text set with one entry in the given language
    pub fn single(lang: impl Into<String>, text: impl Into<String>) -> Self {
        TextSet {
            entries: vec![LocalizedText::new(lang, text)],
        }
    }

    pub fn push(&mut self, entry: LocalizedText) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LocalizedText] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry in `lang` if present, otherwise the first one, otherwise "".
    pub fn preferred(&self, lang: &str) -> &str {
        self.entries
            .iter()
            .find(|e| e.lang == lang)
            .or_else(|| self.entries.first())
            .map(|e| e.text.as_str())
            .unwrap_or("")
    }

    /// Index of the entry an edit should target: the `lang` entry, else the first.
    pub fn editable_index(&self, lang: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.lang == lang)
            .or(if self.entries.is_empty() { None } else { Some(0) })
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut LocalizedText> {
        self.entries.get_mut(index)
    }
}

/// Profile override of an item's selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Select {
    pub item: String,
    pub selected: bool,
}

impl Select {
    pub fn new(item: impl Into<String>, selected: bool) -> Self {
        Select {
            item: item.into(),
            selected,
        }
    }
}

/// Profile override of a Value item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetValue {
    pub item: String,
    pub value: String,
}

impl SetValue {
    pub fn new(item: impl Into<String>, value: impl Into<String>) -> Self {
        SetValue {
            item: item.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_text_prefers_language() {
        let mut set = TextSet::single("de-DE", "Standardprofil");
        set.push(LocalizedText::new("en-US", "Default Profile"));
        assert_eq!(set.preferred("en-US"), "Default Profile");
        assert_eq!(set.preferred("fr-FR"), "Standardprofil");
        assert_eq!(set.editable_index("en-US"), Some(1));
        assert_eq!(set.editable_index("fr-FR"), Some(0));
    }

    #[test]
    fn test_empty_text_set() {
        let set = TextSet::new();
        assert_eq!(set.preferred(DEFAULT_LANGUAGE), "");
        assert_eq!(set.editable_index(DEFAULT_LANGUAGE), None);
    }

    #[test]
    fn test_value_type_accepts_bool_alias() {
        let parsed: ValueType = serde_json::from_str("\"BOOL\"").unwrap();
        assert_eq!(parsed, ValueType::Boolean);
        let parsed: ValueType = serde_json::from_str("\"number\"").unwrap();
        assert_eq!(parsed, ValueType::Number);
        assert!(serde_json::from_str::<ValueType>("\"float\"").is_err());
    }

    #[test]
    fn test_item_type_names() {
        assert_eq!(ItemType::Rule.qualified_name(), "xccdf:Rule");
        assert!(ItemType::Group.is_selectable());
        assert!(!ItemType::Value.is_selectable());
        assert!(ItemType::Benchmark.is_container());
    }
}
