//! Tailoring profile: metadata text plus ordered selection and value overrides.

use crate::models::{Select, SetValue, TextSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub title: TextSet,
    #[serde(default)]
    pub description: TextSet,
    #[serde(default)]
    selects: Vec<Select>,
    #[serde(default)]
    setvalues: Vec<SetValue>,
}

impl Profile {
    pub fn new(id: impl Into<String>, title: TextSet, description: TextSet) -> Self {
        Profile {
            id: id.into(),
            title,
            description,
            selects: Vec::new(),
            setvalues: Vec::new(),
        }
    }

    pub fn add_select(&mut self, select: Select) {
        self.selects.push(select);
    }

    pub fn add_setvalue(&mut self, setvalue: SetValue) {
        self.setvalues.push(setvalue);
    }

    pub fn selects(&self) -> &[Select] {
        &self.selects
    }

    pub fn setvalues(&self) -> &[SetValue] {
        &self.setvalues
    }

    /// Latest SetValue for an item; later overrides win.
    pub fn setvalue_for(&self, item: &str) -> Option<&SetValue> {
        self.setvalues.iter().rev().find(|s| s.item == item)
    }
}
