//! Property panels: profile metadata and the current item.
//!
//! Each panel is a two-state machine. `refresh()` moves Idle → Refreshing,
//! writes the model's state into the fields through the same change handlers
//! a user edit goes through, then moves back to Idle. Handlers only queue a
//! [`PanelEdit`] while Idle, so displaying the model never turns into an
//! undo entry.

use super::validation::{InputConstraint, InputState};
use crate::error::Result;
use crate::models::{ItemType, ValueType};

/// Placeholder title shown when no item is current
pub const NO_ITEM_TITLE: &str = "<no item selected>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelState {
    #[default]
    Idle,
    Refreshing,
}

/// User edit emitted by a panel, turned into an undo command by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEdit {
    ProfileTitle(String),
    ProfileDescription(String),
    Value { item: String, value: String },
}

/// Model state the profile panel displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSnapshot {
    pub id: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Default)]
pub struct ProfilePropertiesPanel {
    state: PanelState,
    id: String,
    title: String,
    description: String,
    pending: Vec<PanelEdit>,
}

impl ProfilePropertiesPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Show the model's profile metadata; only differing fields are rewritten.
    pub fn refresh(&mut self, snapshot: &ProfileSnapshot) {
        if self.id != snapshot.id {
            self.id = snapshot.id.clone();
        }

        self.state = PanelState::Refreshing;
        if self.title != snapshot.title {
            self.title_changed(&snapshot.title);
        }
        if self.description != snapshot.description {
            self.description_changed(&snapshot.description);
        }
        self.state = PanelState::Idle;
    }

    /// Title field text changed.
    pub fn title_changed(&mut self, text: &str) {
        if self.title == text {
            return;
        }
        self.title = text.to_string();
        self.emit(PanelEdit::ProfileTitle(text.to_string()));
    }

    /// Description field text changed.
    pub fn description_changed(&mut self, text: &str) {
        if self.description == text {
            return;
        }
        self.description = text.to_string();
        self.emit(PanelEdit::ProfileDescription(text.to_string()));
    }

    pub fn take_edits(&mut self) -> Vec<PanelEdit> {
        std::mem::take(&mut self.pending)
    }

    fn emit(&mut self, edit: PanelEdit) {
        if self.state == PanelState::Idle {
            self.pending.push(edit);
        }
    }
}

/// Model state of a Value item, shown in the value group of the item panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSnapshot {
    pub value_type: ValueType,
    pub instances: Vec<String>,
    pub current: String,
}

/// Model state the item panel displays for the current item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSnapshot {
    pub id: String,
    pub kind: ItemType,
    pub title: String,
    pub description: String,
    pub value: Option<ValueSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueField {
    pub type_label: &'static str,
    pub instances: Vec<String>,
    pub constraint: InputConstraint,
    text: String,
}

impl ValueField {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text is still being typed and has not reached the model
    pub fn is_intermediate(&self) -> bool {
        self.constraint.classify(&self.text) == InputState::Intermediate
    }
}

#[derive(Debug)]
pub struct ItemPropertiesPanel {
    state: PanelState,
    item: Option<String>,
    title: String,
    id: String,
    type_name: String,
    description: String,
    value: Option<ValueField>,
    pending: Vec<PanelEdit>,
}

impl Default for ItemPropertiesPanel {
    fn default() -> Self {
        ItemPropertiesPanel {
            state: PanelState::Idle,
            item: None,
            title: NO_ITEM_TITLE.to_string(),
            id: String::new(),
            type_name: String::new(),
            description: String::new(),
            value: None,
            pending: Vec::new(),
        }
    }
}

impl ItemPropertiesPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Item currently shown
    pub fn item(&self) -> Option<&str> {
        self.item.as_deref()
    }

    pub fn set_item(&mut self, item: Option<String>) {
        self.item = item;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Value group; `None` means hidden.
    pub fn value(&self) -> Option<&ValueField> {
        self.value.as_ref()
    }

    /// Reset all fields and fill them from `snapshot`.
    pub fn refresh(&mut self, snapshot: Option<&ItemSnapshot>) {
        if self.state == PanelState::Refreshing {
            return;
        }
        self.state = PanelState::Refreshing;

        self.title = NO_ITEM_TITLE.to_string();
        self.id.clear();
        self.type_name.clear();
        self.description.clear();
        self.value = None;

        if let Some(snap) = snapshot {
            self.title = snap.title.clone();
            self.id = snap.id.clone();
            self.type_name = snap.kind.qualified_name().to_string();
            self.description = snap.description.clone();

            if let Some(value) = &snap.value {
                self.value = Some(ValueField {
                    type_label: value.value_type.label(),
                    instances: value.instances.clone(),
                    constraint: InputConstraint::for_value_type(value.value_type),
                    text: String::new(),
                });
                self.value_text_changed(&value.current);
            }
        }

        self.state = PanelState::Idle;
    }

    /// User typed into the value field.
    ///
    /// Refused input leaves the field as is. Intermediate input is shown but
    /// emits no edit until it becomes an accepted value.
    pub fn edit_value(&mut self, text: &str) -> Result<()> {
        let Some(field) = self.value.as_mut() else {
            return Ok(());
        };
        if field.constraint.check(text)? == InputState::Intermediate {
            field.text = text.to_string();
            return Ok(());
        }
        self.value_text_changed(text);
        Ok(())
    }

    pub fn take_edits(&mut self) -> Vec<PanelEdit> {
        std::mem::take(&mut self.pending)
    }

    fn value_text_changed(&mut self, text: &str) {
        let Some(field) = self.value.as_mut() else {
            return;
        };
        if field.text == text {
            return;
        }
        field.text = text.to_string();

        if self.state == PanelState::Idle {
            if let Some(item) = &self.item {
                self.pending.push(PanelEdit::Value {
                    item: item.clone(),
                    value: text.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TailoringError;

    fn profile_snapshot(title: &str, description: &str) -> ProfileSnapshot {
        ProfileSnapshot {
            id: "p".to_string(),
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    fn value_snapshot(value_type: ValueType, current: &str) -> ItemSnapshot {
        ItemSnapshot {
            id: "var".to_string(),
            kind: ItemType::Value,
            title: "Var".to_string(),
            description: String::new(),
            value: Some(ValueSnapshot {
                value_type,
                instances: vec!["yes".to_string(), "no".to_string()],
                current: current.to_string(),
            }),
        }
    }

    #[test]
    fn test_profile_refresh_emits_nothing() {
        let mut panel = ProfilePropertiesPanel::new();
        panel.refresh(&profile_snapshot("Default Profile", "Desc"));
        panel.refresh(&profile_snapshot("Other", "Other desc"));
        assert_eq!(panel.title(), "Other");
        assert_eq!(panel.state(), PanelState::Idle);
        assert!(panel.take_edits().is_empty());
    }

    #[test]
    fn test_profile_user_edit_emits_once() {
        let mut panel = ProfilePropertiesPanel::new();
        panel.refresh(&profile_snapshot("Default Profile", ""));
        panel.title_changed("My Profile");
        panel.title_changed("My Profile");
        assert_eq!(
            panel.take_edits(),
            vec![PanelEdit::ProfileTitle("My Profile".to_string())]
        );
    }

    #[test]
    fn test_item_panel_without_item() {
        let mut panel = ItemPropertiesPanel::new();
        panel.refresh(None);
        assert_eq!(panel.title(), NO_ITEM_TITLE);
        assert!(panel.value().is_none());
        assert!(panel.edit_value("x").is_ok());
        assert!(panel.take_edits().is_empty());
    }

    #[test]
    fn test_item_panel_value_validation() {
        let mut panel = ItemPropertiesPanel::new();
        panel.set_item(Some("var".to_string()));
        panel.refresh(Some(&value_snapshot(ValueType::Boolean, "no")));
        assert_eq!(panel.type_name(), "xccdf:Value");
        assert_eq!(panel.value().unwrap().type_label, "(bool)");
        assert_eq!(panel.value().unwrap().text(), "no");
        assert!(panel.take_edits().is_empty());

        assert!(matches!(
            panel.edit_value("maybe"),
            Err(TailoringError::InputRejected { .. })
        ));
        assert_eq!(panel.value().unwrap().text(), "no");

        panel.edit_value("YES").unwrap();
        assert_eq!(
            panel.take_edits(),
            vec![PanelEdit::Value {
                item: "var".to_string(),
                value: "YES".to_string()
            }]
        );
    }

    #[test]
    fn test_item_panel_holds_partial_input() {
        let mut panel = ItemPropertiesPanel::new();
        panel.set_item(Some("var".to_string()));
        panel.refresh(Some(&value_snapshot(ValueType::Boolean, "no")));

        for partial in ["n", "", "y", "ye"] {
            panel.edit_value(partial).unwrap();
            assert_eq!(panel.value().unwrap().text(), partial);
            assert!(panel.value().unwrap().is_intermediate());
        }
        assert!(panel.take_edits().is_empty());

        panel.edit_value("yes").unwrap();
        assert!(!panel.value().unwrap().is_intermediate());
        assert_eq!(
            panel.take_edits(),
            vec![PanelEdit::Value {
                item: "var".to_string(),
                value: "yes".to_string()
            }]
        );

        // a refresh drops whatever was left half typed
        panel.edit_value("n").unwrap();
        panel.refresh(Some(&value_snapshot(ValueType::Boolean, "yes")));
        assert_eq!(panel.value().unwrap().text(), "yes");
        assert!(panel.take_edits().is_empty());
    }
}
