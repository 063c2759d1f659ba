//! In-memory XCCDF document model.
//!
//! This is the collaborator the tailoring core talks to: a benchmark tree of
//! groups, rules and values, a profile holding Select/SetValue overrides, and
//! a policy that layers those overrides over the benchmark defaults.
//!
//! # Module Structure
//!
//! - `profile`: the tailoring target (`Profile`)
//! - `policy`: effective selection/value evaluation (`Policy`)
//! - `loader`: JSON document loading
//! - `sample`: built-in demo benchmark

pub mod loader;
pub mod policy;
pub mod profile;
pub mod sample;

pub use policy::Policy;
pub use profile::Profile;

use crate::error::{Result, TailoringError};
use crate::models::{ItemType, TextSet, ValueType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One known value of a Value item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueInstance {
    #[serde(default)]
    pub selector: Option<String>,
    pub value: String,
}

/// Entry of the benchmark hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    pub kind: ItemType,
    pub title: TextSet,
    pub description: TextSet,
    /// Document default selection, overridden by profile selects
    pub selected: bool,
    pub parent: Option<String>,
    /// Child Value ids in document order
    pub values: Vec<String>,
    /// Child Rule/Group ids in document order
    pub content: Vec<String>,
    pub value_type: Option<ValueType>,
    pub instances: Vec<ValueInstance>,
}

impl Item {
    fn new(id: &str, kind: ItemType, title: TextSet, parent: Option<String>) -> Self {
        Item {
            id: id.to_string(),
            kind,
            title,
            description: TextSet::new(),
            selected: true,
            parent,
            values: Vec::new(),
            content: Vec::new(),
            value_type: None,
            instances: Vec::new(),
        }
    }

    /// Default value of a Value item: the unselected instance, else the first.
    pub fn default_value(&self) -> &str {
        self.instances
            .iter()
            .find(|i| i.selector.is_none())
            .or_else(|| self.instances.first())
            .map(|i| i.value.as_str())
            .unwrap_or("")
    }

    /// Known instance strings, document order.
    pub fn instance_values(&self) -> impl Iterator<Item = &str> {
        self.instances.iter().map(|i| i.value.as_str())
    }
}

/// Benchmark document: a root item plus an id index over all items.
#[derive(Debug, Clone)]
pub struct Benchmark {
    root: String,
    items: HashMap<String, Item>,
}

impl Benchmark {
    pub fn new(id: &str, title: TextSet) -> Self {
        let mut items = HashMap::new();
        items.insert(id.to_string(), Item::new(id, ItemType::Benchmark, title, None));
        Benchmark {
            root: id.to_string(),
            items,
        }
    }

    pub fn id(&self) -> &str {
        &self.root
    }

    pub fn root(&self) -> &Item {
        // The root entry is inserted on construction and never removed
        &self.items[&self.root]
    }

    pub fn item(&self, id: &str) -> Result<&Item> {
        self.items
            .get(id)
            .ok_or_else(|| TailoringError::UnknownItem(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Children of an item: all Values first, then Rules and Groups.
    pub fn children(&self, id: &str) -> Result<Vec<&Item>> {
        let item = self.item(id)?;
        if !item.kind.is_container() {
            return Ok(Vec::new());
        }
        item.values
            .iter()
            .chain(item.content.iter())
            .map(|child| self.item(child))
            .collect()
    }

    pub fn add_group(&mut self, parent: &str, id: &str, title: TextSet) -> Result<()> {
        self.insert_child(parent, Item::new(id, ItemType::Group, title, Some(parent.to_string())))
    }

    pub fn add_rule(&mut self, parent: &str, id: &str, title: TextSet) -> Result<()> {
        self.insert_child(parent, Item::new(id, ItemType::Rule, title, Some(parent.to_string())))
    }

    pub fn add_value(
        &mut self,
        parent: &str,
        id: &str,
        title: TextSet,
        value_type: ValueType,
    ) -> Result<()> {
        let mut item = Item::new(id, ItemType::Value, title, Some(parent.to_string()));
        item.value_type = Some(value_type);
        self.insert_child(parent, item)
    }

    pub fn add_instance(&mut self, value: &str, selector: Option<&str>, text: &str) -> Result<()> {
        let item = self.value_item_mut(value)?;
        item.instances.push(ValueInstance {
            selector: selector.map(str::to_string),
            value: text.to_string(),
        });
        Ok(())
    }

    pub fn set_description(&mut self, id: &str, description: TextSet) -> Result<()> {
        self.item_mut(id)?.description = description;
        Ok(())
    }

    pub fn set_default_selected(&mut self, id: &str, selected: bool) -> Result<()> {
        self.item_mut(id)?.selected = selected;
        Ok(())
    }

    /// Detach an item and its whole subtree from the document.
    pub fn remove_item(&mut self, id: &str) -> Result<()> {
        let parent = self
            .item(id)?
            .parent
            .clone()
            .ok_or_else(|| TailoringError::WrongItemType {
                item: id.to_string(),
                expected: "a non-root item",
                actual: ItemType::Benchmark.as_str(),
            })?;
        if let Some(parent_item) = self.items.get_mut(&parent) {
            parent_item.values.retain(|c| c != id);
            parent_item.content.retain(|c| c != id);
        }
        let mut pending = vec![id.to_string()];
        while let Some(next) = pending.pop() {
            if let Some(removed) = self.items.remove(&next) {
                pending.extend(removed.values);
                pending.extend(removed.content);
            }
        }
        Ok(())
    }

    fn item_mut(&mut self, id: &str) -> Result<&mut Item> {
        self.items
            .get_mut(id)
            .ok_or_else(|| TailoringError::UnknownItem(id.to_string()))
    }

    fn value_item_mut(&mut self, id: &str) -> Result<&mut Item> {
        let item = self.item_mut(id)?;
        if item.kind != ItemType::Value {
            return Err(TailoringError::WrongItemType {
                item: id.to_string(),
                expected: ItemType::Value.as_str(),
                actual: item.kind.as_str(),
            });
        }
        Ok(item)
    }

    fn insert_child(&mut self, parent: &str, item: Item) -> Result<()> {
        if self.items.contains_key(&item.id) {
            return Err(TailoringError::DuplicateItem(item.id));
        }
        let parent_item = self.item_mut(parent)?;
        if !parent_item.kind.is_container() {
            return Err(TailoringError::WrongItemType {
                item: parent.to_string(),
                expected: "benchmark or group",
                actual: parent_item.kind.as_str(),
            });
        }
        if item.kind == ItemType::Value {
            parent_item.values.push(item.id.clone());
        } else {
            parent_item.content.push(item.id.clone());
        }
        self.items.insert(item.id.clone(), item);
        Ok(())
    }
}
