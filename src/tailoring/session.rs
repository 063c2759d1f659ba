//! Tailoring session: the editor behind one tailoring window.
//!
//! The session owns the display tree, both property panels and the undo
//! history. The profile and policy belong to the caller and are shared
//! through `Rc<RefCell<Policy>>`; the session mutates them only from undo
//! command redo/undo.
//!
//! # Event Flow
//!
//! 1. A user interaction arrives through one of the public methods
//! 2. The tree or a panel records the raw change
//! 3. User-originated changes become [`UndoCommand`]s and are pushed
//! 4. The command's redo updates the model and refreshes the affected view
//!
//! Changes made while the synchronizer holds the tree lock, or while a panel
//! is refreshing, never reach step 3.

use super::commands::UndoCommand;
use super::metadata::{self, ProfileField};
use super::panels::{
    ItemPropertiesPanel, ItemSnapshot, PanelEdit, ProfilePropertiesPanel, ProfileSnapshot,
    ValueSnapshot,
};
use super::selection;
use super::synchronizer::{refresh_disabled_state, sync_children_disabled_state, synchronize};
use super::tree::{ChangeOrigin, DisplayTree, NodeId};
use super::undo_stack::UndoStack;
use super::values;
use crate::config::EditorSettings;
use crate::error::{Result, TailoringError};
use crate::models::ItemType;
use crate::xccdf::{Benchmark, Policy};
use std::cell::RefCell;
use std::rc::Rc;

/// What the host learns when a session closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailoringOutcome {
    /// The profile should be treated as freshly created (and dropped if not confirmed)
    pub new_profile: bool,
    pub changes_confirmed: bool,
}

/// Application hosting a tailoring session.
pub trait TailoringHost {
    /// Blocking prompt: may unconfirmed changes be discarded?
    fn confirm_discard(&mut self) -> bool;

    fn tailoring_finished(&mut self, outcome: TailoringOutcome);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lifecycle {
    Open,
    /// A fatal error stopped editing; carries the diagnostic
    Failed(String),
    Closed(TailoringOutcome),
}

/// History labels with the current position, for the history view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryView {
    pub labels: Vec<String>,
    pub index: usize,
}

/// Everything undo commands act upon.
#[derive(Debug)]
pub struct EditorState {
    policy: Rc<RefCell<Policy>>,
    benchmark: Rc<Benchmark>,
    language: String,
    tree: DisplayTree,
    profile_panel: ProfilePropertiesPanel,
    item_panel: ItemPropertiesPanel,
}

impl EditorState {
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn policy(&self) -> &Rc<RefCell<Policy>> {
        &self.policy
    }

    pub fn benchmark(&self) -> &Rc<Benchmark> {
        &self.benchmark
    }

    pub fn tree(&self) -> &DisplayTree {
        &self.tree
    }

    pub fn profile_panel(&self) -> &ProfilePropertiesPanel {
        &self.profile_panel
    }

    pub fn item_panel(&self) -> &ItemPropertiesPanel {
        &self.item_panel
    }

    pub fn is_item_selected(&self, item: &str) -> Result<bool> {
        selection::is_item_selected(&self.policy.borrow(), item)
    }

    pub fn set_item_selected(&mut self, item: &str, selected: bool) -> Result<()> {
        selection::set_item_selected(&mut self.policy.borrow_mut(), item, selected)
    }

    pub fn current_value(&self, item: &str) -> Result<String> {
        values::current_value(&self.policy.borrow(), item)
    }

    pub fn set_value(&mut self, item: &str, value: &str) -> Result<()> {
        values::set_value(&mut self.policy.borrow_mut(), item, value)
    }

    pub fn profile_title(&self) -> Result<String> {
        metadata::profile_text(&self.policy.borrow(), ProfileField::Title, &self.language)
    }

    pub fn set_profile_title(&mut self, text: &str) -> Result<()> {
        metadata::set_profile_text(
            &mut self.policy.borrow_mut(),
            ProfileField::Title,
            &self.language,
            text,
        )
    }

    pub fn profile_description(&self) -> Result<String> {
        metadata::profile_text(
            &self.policy.borrow(),
            ProfileField::Description,
            &self.language,
        )
    }

    pub fn set_profile_description(&mut self, text: &str) -> Result<()> {
        metadata::set_profile_text(
            &mut self.policy.borrow_mut(),
            ProfileField::Description,
            &self.language,
            text,
        )
    }

    /// Re-synchronize the node mirroring `item`, without descending.
    pub fn resync_item(&mut self, item: &str) -> Result<()> {
        let node = self
            .tree
            .node_for_item(item)
            .ok_or_else(|| TailoringError::UnknownItem(item.to_string()))?;
        let policy = self.policy.borrow();
        synchronize(&mut self.tree, &policy, &self.language, node, item, false)
    }

    /// Full recursive sync from the benchmark root, then enablement.
    pub fn rebuild_tree(&mut self) -> Result<()> {
        let root = self.tree.root();
        {
            let policy = self.policy.borrow();
            synchronize(
                &mut self.tree,
                &policy,
                &self.language,
                root,
                self.benchmark.id(),
                true,
            )?;
        }
        refresh_disabled_state(&mut self.tree, root, true)
    }

    pub fn refresh_profile_panel(&mut self) -> Result<()> {
        let snapshot = ProfileSnapshot {
            id: metadata::profile_id(&self.policy.borrow())?,
            title: self.profile_title()?,
            description: self.profile_description()?,
        };
        self.profile_panel.refresh(&snapshot);
        Ok(())
    }

    pub fn refresh_item_panel(&mut self) -> Result<()> {
        let snapshot = match self.item_panel.item() {
            Some(id) => Some(self.item_snapshot(id)?),
            None => None,
        };
        self.item_panel.refresh(snapshot.as_ref());
        Ok(())
    }

    /// Model state of `id` as the item panel shows it.
    pub fn item_snapshot(&self, id: &str) -> Result<ItemSnapshot> {
        let policy = self.policy.borrow();
        let item = policy.benchmark().item(id)?;

        let value = if item.kind == ItemType::Value {
            Some(ValueSnapshot {
                value_type: item.value_type.unwrap_or_default(),
                instances: item.instance_values().map(str::to_string).collect(),
                current: values::current_value(&policy, id)?,
            })
        } else {
            None
        };

        Ok(ItemSnapshot {
            id: item.id.clone(),
            kind: item.kind,
            title: item.title.preferred(&self.language).to_string(),
            description: item.description.preferred(&self.language).to_string(),
            value,
        })
    }
}

pub struct TailoringSession {
    state: EditorState,
    history: UndoStack,
    current: Option<NodeId>,
    new_profile: bool,
    changes_confirmed: bool,
    lifecycle: Lifecycle,
}

impl TailoringSession {
    /// Open a session over `policy`'s profile.
    ///
    /// Fails without a policy, a profile or a benchmark, and when the policy
    /// was built on another benchmark.
    pub fn new(
        policy: Option<Rc<RefCell<Policy>>>,
        benchmark: Option<Rc<Benchmark>>,
        new_profile: bool,
        settings: &EditorSettings,
    ) -> Result<Self> {
        let policy = policy.ok_or(TailoringError::MissingPolicy)?;
        if policy.borrow().profile().is_none() {
            return Err(TailoringError::MissingProfile);
        }
        let benchmark = benchmark.ok_or(TailoringError::MissingBenchmark)?;
        if !Rc::ptr_eq(policy.borrow().benchmark(), &benchmark) {
            return Err(TailoringError::BenchmarkMismatch(benchmark.id().to_string()));
        }

        let mut state = EditorState {
            policy,
            benchmark,
            language: settings.default_language.clone(),
            tree: DisplayTree::new(),
            profile_panel: ProfilePropertiesPanel::new(),
            item_panel: ItemPropertiesPanel::new(),
        };

        state.rebuild_tree()?;
        if settings.expand_all_on_open {
            state.tree.expand_all();
        }
        // building the tree is not an edit
        state.tree.take_notifications();
        state.refresh_profile_panel()?;
        state.refresh_item_panel()?;

        log::info!(
            "[Tailoring] Opened profile '{}' over benchmark '{}' ({} nodes, new_profile={})",
            state.profile_panel.id(),
            state.benchmark.id(),
            state.tree.len(),
            new_profile
        );

        Ok(TailoringSession {
            state,
            history: UndoStack::new(),
            current: None,
            new_profile,
            changes_confirmed: false,
            lifecycle: Lifecycle::Open,
        })
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn tree(&self) -> &DisplayTree {
        &self.state.tree
    }

    pub fn profile_panel(&self) -> &ProfilePropertiesPanel {
        &self.state.profile_panel
    }

    pub fn item_panel(&self) -> &ItemPropertiesPanel {
        &self.state.item_panel
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn is_open(&self) -> bool {
        self.lifecycle == Lifecycle::Open
    }

    pub fn new_profile(&self) -> bool {
        self.new_profile
    }

    pub fn changes_confirmed(&self) -> bool {
        self.changes_confirmed
    }

    /// Node whose item is shown in the item panel
    pub fn current_node(&self) -> Option<NodeId> {
        self.current
    }

    pub fn window_title(&self) -> String {
        let title = self
            .state
            .profile_title()
            .unwrap_or_else(|_| self.state.profile_panel.title().to_string());
        format!("Tailoring '{}'", title)
    }

    /// The user toggled a node's checkbox.
    ///
    /// Non-checkable and disabled nodes ignore the request.
    pub fn set_node_checked(&mut self, node: NodeId, checked: bool) -> Result<()> {
        self.ensure_open()?;
        let result = self.set_node_checked_inner(node, checked);
        self.track(result)
    }

    fn set_node_checked_inner(&mut self, node: NodeId, checked: bool) -> Result<()> {
        let n = self.state.tree.node(node)?;
        if !n.is_checkable() || !n.is_enabled() {
            log::debug!("[Tailoring] Ignoring check on inert node {}", node.index());
            return Ok(());
        }
        self.state.tree.set_check_state(node, checked)?;
        self.dispatch_tree_notifications()
    }

    pub fn set_node_expanded(&mut self, node: NodeId, expanded: bool) -> Result<()> {
        self.ensure_open()?;
        let result = self.state.tree.set_expanded(node, expanded);
        self.track(result)
    }

    /// Make `node` the current item. Never creates history entries.
    pub fn select_item(&mut self, node: Option<NodeId>) -> Result<()> {
        self.ensure_open()?;
        let result = self.select_item_inner(node);
        self.track(result)
    }

    fn select_item_inner(&mut self, node: Option<NodeId>) -> Result<()> {
        let item = match node {
            Some(n) => self.state.tree.node(n)?.item().map(str::to_string),
            None => None,
        };
        self.current = node;
        self.state.item_panel.set_item(item);
        self.state.refresh_item_panel()
    }

    pub fn edit_profile_title(&mut self, text: &str) -> Result<()> {
        self.ensure_open()?;
        self.state.profile_panel.title_changed(text);
        let result = self.dispatch_panel_edits();
        self.track(result)
    }

    pub fn edit_profile_description(&mut self, text: &str) -> Result<()> {
        self.ensure_open()?;
        self.state.profile_panel.description_changed(text);
        let result = self.dispatch_panel_edits();
        self.track(result)
    }

    /// Edit the current Value item.
    ///
    /// Input refused by the value type's constraint returns `InputRejected`
    /// and leaves the session open. Partial input such as `"ye"` for a boolean
    /// is kept in the panel without touching the model.
    pub fn edit_value(&mut self, text: &str) -> Result<()> {
        self.ensure_open()?;
        let result = match self.state.item_panel.edit_value(text) {
            Ok(()) => self.dispatch_panel_edits(),
            Err(e) => Err(e),
        };
        self.track(result)
    }

    pub fn undo(&mut self) -> Result<bool> {
        self.ensure_open()?;
        let result = self
            .history
            .undo(&mut self.state)
            .and_then(|undone| self.dispatch_tree_notifications().map(|()| undone));
        self.track(result)
    }

    pub fn redo(&mut self) -> Result<bool> {
        self.ensure_open()?;
        let result = self
            .history
            .redo(&mut self.state)
            .and_then(|redone| self.dispatch_tree_notifications().map(|()| redone));
        self.track(result)
    }

    /// Jump to a history position, as a click in the history view does.
    pub fn set_history_index(&mut self, index: usize) -> Result<()> {
        self.ensure_open()?;
        let result = self
            .history
            .set_index(index, &mut self.state)
            .and_then(|()| self.dispatch_tree_notifications());
        self.track(result)
    }

    /// Undo every applied command.
    pub fn reset_to_initial(&mut self) -> Result<()> {
        self.set_history_index(0)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_text(&self) -> Option<String> {
        self.history.undo_text()
    }

    pub fn redo_text(&self) -> Option<String> {
        self.history.redo_text()
    }

    pub fn history(&self) -> HistoryView {
        HistoryView {
            labels: self.history.labels(),
            index: self.history.index(),
        }
    }

    pub fn undo_stack(&self) -> &UndoStack {
        &self.history
    }

    /// Close keeping the edits.
    pub fn confirm_and_close(&mut self, host: &mut dyn TailoringHost) -> Result<bool> {
        self.ensure_open()?;
        self.changes_confirmed = true;
        self.close(host)
    }

    /// Close request from Cancel or the window's close button.
    ///
    /// Returns `false` when the user declined to discard their changes.
    pub fn cancel(&mut self, host: &mut dyn TailoringHost) -> Result<bool> {
        self.ensure_open()?;
        self.close(host)
    }

    /// Close discarding edits and ask the host to drop the profile.
    pub fn delete_profile_and_discard(&mut self, host: &mut dyn TailoringHost) -> Result<bool> {
        self.ensure_open()?;
        let was_new = self.new_profile;
        self.new_profile = true;
        self.changes_confirmed = false;

        let closed = self.close(host)?;
        if !closed {
            self.new_profile = was_new;
        }
        Ok(closed)
    }

    /// Tear down a failed session without prompting.
    ///
    /// History is rolled back as far as possible and the host is told the
    /// changes were not confirmed.
    pub fn abort(&mut self, host: &mut dyn TailoringHost) {
        if matches!(self.lifecycle, Lifecycle::Closed(_)) {
            return;
        }
        if let Err(e) = self.history.reset_to_initial(&mut self.state) {
            log::error!("[Tailoring] Rollback incomplete while aborting: {}", e);
        }
        self.state.tree.take_notifications();

        let outcome = TailoringOutcome {
            new_profile: self.new_profile,
            changes_confirmed: false,
        };
        log::warn!("[Tailoring] Session aborted ({:?})", self.lifecycle);
        self.lifecycle = Lifecycle::Closed(outcome);
        host.tailoring_finished(outcome);
    }

    fn close(&mut self, host: &mut dyn TailoringHost) -> Result<bool> {
        if !self.changes_confirmed {
            if !host.confirm_discard() {
                log::info!("[Tailoring] Close cancelled, keeping unconfirmed changes");
                return Ok(false);
            }
            let result = self
                .history
                .reset_to_initial(&mut self.state)
                .and_then(|()| self.dispatch_tree_notifications());
            self.track(result)?;
        }

        let outcome = TailoringOutcome {
            new_profile: self.new_profile,
            changes_confirmed: self.changes_confirmed,
        };
        self.lifecycle = Lifecycle::Closed(outcome);
        log::info!(
            "[Tailoring] Closed: new_profile={}, changes_confirmed={}",
            outcome.new_profile,
            outcome.changes_confirmed
        );
        host.tailoring_finished(outcome);
        Ok(true)
    }

    /// Turn pending user check changes into selection commands.
    fn dispatch_tree_notifications(&mut self) -> Result<()> {
        loop {
            let batch = self.state.tree.take_notifications();
            if batch.is_empty() {
                return Ok(());
            }
            for change in batch {
                if change.origin == ChangeOrigin::Synchronizer {
                    continue;
                }
                self.item_check_changed(change.node, change.checked)?;
            }
        }
    }

    fn item_check_changed(&mut self, node: NodeId, checked: bool) -> Result<()> {
        if !self.state.tree.contains(node) {
            return Ok(());
        }
        let Some(item) = self.state.tree.node(node)?.item().map(str::to_string) else {
            return Ok(());
        };
        if !self.state.benchmark.item(&item)?.kind.is_selectable() {
            return Ok(());
        }

        if self.state.is_item_selected(&item)? != checked {
            self.history.push(
                UndoCommand::SelectToggle {
                    item,
                    new_select: checked,
                },
                &mut self.state,
            )?;
        }

        let enabled = self.state.tree.node(node)?.is_enabled();
        sync_children_disabled_state(&mut self.state.tree, node, enabled && checked)
    }

    /// Turn pending panel edits into undo commands.
    fn dispatch_panel_edits(&mut self) -> Result<()> {
        let mut edits = self.state.profile_panel.take_edits();
        edits.extend(self.state.item_panel.take_edits());

        for edit in edits {
            let command = match edit {
                PanelEdit::ProfileTitle(new) => UndoCommand::ProfileTitleChange {
                    old: self.state.profile_title()?,
                    new,
                },
                PanelEdit::ProfileDescription(new) => UndoCommand::ProfileDescriptionChange {
                    old: self.state.profile_description()?,
                    new,
                },
                PanelEdit::Value { item, value } => {
                    let old = self.state.current_value(&item)?;
                    // retyping the stored value after partial input
                    if old == value {
                        continue;
                    }
                    UndoCommand::ValueChange {
                        old,
                        item,
                        new: value,
                    }
                }
            };
            self.history.push(command, &mut self.state)?;
        }
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Open => Ok(()),
            _ => Err(TailoringError::SessionClosed),
        }
    }

    /// Move to `Failed` on fatal errors.
    fn track<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            if !e.is_fatal() {
                log::debug!("[Tailoring] {}", e);
            } else if self.lifecycle == Lifecycle::Open {
                log::error!("[Tailoring] Fatal error, session stopped: {}", e);
                self.lifecycle = Lifecycle::Failed(e.to_string());
            }
        }
        result
    }
}
