//! Display tree mirrored from the benchmark hierarchy.
//!
//! Nodes live in an arena keyed by [`NodeId`]; each node stores the id of the
//! benchmark item it mirrors and the tree keeps the reverse item → node index.
//! Check-state changes are recorded as [`TreeNotification`]s tagged with
//! their origin: while a [`SyncGuard`] is alive every change is attributed to
//! the synchronizer, otherwise to the user.

use crate::error::{Result, TailoringError};
use crate::models::ItemType;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Reentrancy counter shared by the tree and its synchronizer.
#[derive(Debug, Clone, Default)]
pub struct SyncLock {
    depth: Rc<Cell<u32>>,
}

impl SyncLock {
    /// Increment the counter for the lifetime of the returned guard.
    pub fn acquire(&self) -> SyncGuard {
        self.depth.set(self.depth.get() + 1);
        SyncGuard {
            depth: Rc::clone(&self.depth),
        }
    }

    pub fn is_held(&self) -> bool {
        self.depth.get() > 0
    }

    pub fn depth(&self) -> u32 {
        self.depth.get()
    }
}

/// Scoped hold on a [`SyncLock`]; released on every exit path.
#[derive(Debug)]
pub struct SyncGuard {
    depth: Rc<Cell<u32>>,
}

impl Drop for SyncGuard {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    User,
    Synchronizer,
}

/// A node's check state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeNotification {
    pub node: NodeId,
    pub checked: bool,
    pub origin: ChangeOrigin,
}

#[derive(Debug, Clone)]
pub struct DisplayNode {
    label: String,
    icon: Option<ItemType>,
    id_text: String,
    item: Option<String>,
    checkable: bool,
    checked: bool,
    enabled: bool,
    expanded: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl DisplayNode {
    fn new(parent: Option<NodeId>) -> Self {
        DisplayNode {
            label: String::new(),
            icon: None,
            id_text: String::new(),
            item: None,
            checkable: false,
            checked: false,
            enabled: true,
            expanded: false,
            parent,
            children: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn icon(&self) -> Option<ItemType> {
        self.icon
    }

    pub fn id_text(&self) -> &str {
        &self.id_text
    }

    /// Benchmark item this node mirrors, once synchronized
    pub fn item(&self) -> Option<&str> {
        self.item.as_deref()
    }

    pub fn is_checkable(&self) -> bool {
        self.checkable
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Non-checkable nodes count as selected for enablement purposes.
    pub fn counts_as_selected(&self) -> bool {
        !self.checkable || self.checked
    }
}

#[derive(Debug)]
pub struct DisplayTree {
    nodes: HashMap<NodeId, DisplayNode>,
    next_id: usize,
    root: NodeId,
    index: HashMap<String, NodeId>,
    lock: SyncLock,
    notifications: Vec<TreeNotification>,
}

impl Default for DisplayTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayTree {
    /// Tree holding a single, non-checkable root node.
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(root, DisplayNode::new(None));
        DisplayTree {
            nodes,
            next_id: 1,
            root,
            index: HashMap::new(),
            lock: SyncLock::default(),
            notifications: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn sync_lock(&self) -> &SyncLock {
        &self.lock
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn node(&self, node: NodeId) -> Result<&DisplayNode> {
        self.nodes
            .get(&node)
            .ok_or(TailoringError::UnknownNode(node.0))
    }

    fn node_mut(&mut self, node: NodeId) -> Result<&mut DisplayNode> {
        self.nodes
            .get_mut(&node)
            .ok_or(TailoringError::UnknownNode(node.0))
    }

    pub fn node_for_item(&self, item: &str) -> Option<NodeId> {
        self.index.get(item).copied()
    }

    pub fn children(&self, node: NodeId) -> Result<&[NodeId]> {
        Ok(self.node(node)?.children())
    }

    /// Pre-order walk of the subtree rooted at `node`, `node` included.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(next) = stack.pop() {
            if let Some(n) = self.nodes.get(&next) {
                out.push(next);
                stack.extend(n.children.iter().rev().copied());
            }
        }
        out
    }

    pub fn set_display(
        &mut self,
        node: NodeId,
        label: &str,
        icon: Option<ItemType>,
        id_text: &str,
    ) -> Result<()> {
        let n = self.node_mut(node)?;
        n.label = label.to_string();
        n.icon = icon;
        n.id_text = id_text.to_string();
        Ok(())
    }

    /// Point a node at a benchmark item and update the reverse index.
    pub fn bind_item(&mut self, node: NodeId, item: &str) -> Result<()> {
        let previous = self.node_mut(node)?.item.replace(item.to_string());
        if let Some(old) = previous {
            if old != item && self.index.get(&old) == Some(&node) {
                self.index.remove(&old);
            }
        }
        self.index.insert(item.to_string(), node);
        Ok(())
    }

    pub fn set_checkable(&mut self, node: NodeId, checkable: bool) -> Result<()> {
        self.node_mut(node)?.checkable = checkable;
        Ok(())
    }

    /// Change the check state, recording a notification when it differs.
    pub fn set_check_state(&mut self, node: NodeId, checked: bool) -> Result<()> {
        let origin = if self.lock.is_held() {
            ChangeOrigin::Synchronizer
        } else {
            ChangeOrigin::User
        };
        let n = self.node_mut(node)?;
        if n.checked == checked {
            return Ok(());
        }
        n.checked = checked;
        self.notifications.push(TreeNotification {
            node,
            checked,
            origin,
        });
        Ok(())
    }

    pub fn set_enabled(&mut self, node: NodeId, enabled: bool) -> Result<()> {
        self.node_mut(node)?.enabled = enabled;
        Ok(())
    }

    pub fn set_expanded(&mut self, node: NodeId, expanded: bool) -> Result<()> {
        self.node_mut(node)?.expanded = expanded;
        Ok(())
    }

    pub fn expand_all(&mut self) {
        for n in self.nodes.values_mut() {
            n.expanded = true;
        }
    }

    /// Create an empty child at `position` (clamped to the child count).
    pub fn insert_child(&mut self, parent: NodeId, position: usize) -> Result<NodeId> {
        let id = NodeId(self.next_id);
        let p = self.node_mut(parent)?;
        let at = position.min(p.children.len());
        p.children.insert(at, id);
        self.next_id += 1;
        self.nodes.insert(id, DisplayNode::new(Some(parent)));
        Ok(id)
    }

    /// Replace a node's child order with a permutation of its current children.
    pub fn reorder_children(&mut self, parent: NodeId, order: Vec<NodeId>) -> Result<()> {
        let p = self.node_mut(parent)?;
        let mut current = p.children.clone();
        let mut proposed = order.clone();
        current.sort();
        proposed.sort();
        if current != proposed {
            return Err(TailoringError::UnknownNode(
                order
                    .iter()
                    .find(|n| !p.children.contains(n))
                    .map(|n| n.0)
                    .unwrap_or(parent.0),
            ));
        }
        p.children = order;
        Ok(())
    }

    /// Delete a node with all its descendants and detach it from its parent.
    pub fn remove_subtree(&mut self, node: NodeId) -> Result<()> {
        if node == self.root {
            return Err(TailoringError::UnknownNode(node.0));
        }
        let parent = self.node(node)?.parent;
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.retain(|c| *c != node);
        }
        for gone in self.descendants(node) {
            if let Some(removed) = self.nodes.remove(&gone) {
                if let Some(item) = removed.item {
                    if self.index.get(&item) == Some(&gone) {
                        self.index.remove(&item);
                    }
                }
            }
        }
        self.notifications.retain(|n| self.nodes.contains_key(&n.node));
        Ok(())
    }

    /// Drain pending check-state notifications.
    pub fn take_notifications(&mut self) -> Vec<TreeNotification> {
        std::mem::take(&mut self.notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_releases_on_drop() {
        let lock = SyncLock::default();
        {
            let _outer = lock.acquire();
            let _inner = lock.acquire();
            assert_eq!(lock.depth(), 2);
        }
        assert!(!lock.is_held());
    }

    #[test]
    fn test_guard_released_on_early_error_return() {
        fn failing(lock: &SyncLock) -> Result<()> {
            let _guard = lock.acquire();
            Err(TailoringError::UnknownNode(7))
        }
        let lock = SyncLock::default();
        assert!(failing(&lock).is_err());
        assert_eq!(lock.depth(), 0);
    }

    #[test]
    fn test_notifications_tagged_with_origin() {
        let mut tree = DisplayTree::new();
        let child = tree.insert_child(tree.root(), 0).unwrap();
        tree.set_check_state(child, true).unwrap();
        {
            let lock = tree.sync_lock().clone();
            let _guard = lock.acquire();
            tree.set_check_state(child, false).unwrap();
            // unchanged state records nothing
            tree.set_check_state(child, false).unwrap();
        }
        let seen = tree.take_notifications();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].origin, ChangeOrigin::User);
        assert_eq!(seen[1].origin, ChangeOrigin::Synchronizer);
        assert!(tree.take_notifications().is_empty());
    }

    #[test]
    fn test_remove_subtree_cleans_index() {
        let mut tree = DisplayTree::new();
        let group = tree.insert_child(tree.root(), 0).unwrap();
        let rule = tree.insert_child(group, 0).unwrap();
        tree.bind_item(group, "g").unwrap();
        tree.bind_item(rule, "r").unwrap();

        tree.remove_subtree(group).unwrap();
        assert!(tree.children(tree.root()).unwrap().is_empty());
        assert_eq!(tree.node_for_item("r"), None);
        assert!(!tree.contains(rule));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_insert_position_is_clamped() {
        let mut tree = DisplayTree::new();
        let a = tree.insert_child(tree.root(), 5).unwrap();
        let b = tree.insert_child(tree.root(), 0).unwrap();
        assert_eq!(tree.children(tree.root()).unwrap(), &[b, a]);
        assert!(tree.reorder_children(tree.root(), vec![a, b]).is_ok());
        assert!(tree.reorder_children(tree.root(), vec![a]).is_err());
    }
}
