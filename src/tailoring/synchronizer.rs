//! Mirrors the benchmark hierarchy into the display tree.
//!
//! Children are matched to existing display nodes by backing item id, so a
//! node keeps its UI state (expansion, current selection) across re-syncs.
//! Within one parent, Values always come before Rules and Groups.

use super::selection::is_item_selected;
use super::tree::{DisplayTree, NodeId};
use crate::error::Result;
use crate::models::ItemType;
use crate::xccdf::Policy;
use std::collections::HashMap;

/// Bring `node` in line with benchmark item `item`, optionally recursing.
pub fn synchronize(
    tree: &mut DisplayTree,
    policy: &Policy,
    lang: &str,
    node: NodeId,
    item: &str,
    recursive: bool,
) -> Result<()> {
    let lock = tree.sync_lock().clone();
    let _guard = lock.acquire();

    let doc_item = policy.benchmark().item(item)?;
    tree.set_display(
        node,
        doc_item.title.preferred(lang),
        Some(doc_item.kind),
        &doc_item.id,
    )?;
    tree.bind_item(node, &doc_item.id)?;

    match doc_item.kind {
        ItemType::Group | ItemType::Rule => {
            tree.set_checkable(node, true)?;
            let checked = is_item_selected(policy, &doc_item.id)?;
            tree.set_check_state(node, checked)?;
            let enabled = tree.node(node)?.is_enabled();
            sync_children_disabled_state(tree, node, enabled && checked)?;
        }
        ItemType::Value => tree.set_checkable(node, false)?,
        ItemType::Benchmark => {}
    }

    if !recursive {
        return Ok(());
    }

    let wanted = policy.benchmark().children(item)?;

    let mut reusable: HashMap<String, NodeId> = HashMap::new();
    for child in tree.children(node)?.to_vec() {
        let backing = tree.node(child)?.item().map(str::to_string);
        match backing {
            Some(id) if !reusable.contains_key(&id) && wanted.iter().any(|w| w.id == id) => {
                reusable.insert(id, child);
            }
            _ => tree.remove_subtree(child)?,
        }
    }

    let mut order = Vec::with_capacity(wanted.len());
    for (position, child_item) in wanted.iter().enumerate() {
        let child = match reusable.remove(&child_item.id) {
            Some(existing) => existing,
            None => tree.insert_child(node, position)?,
        };
        order.push(child);
    }
    tree.reorder_children(node, order.clone())?;

    for (child, child_item) in order.into_iter().zip(wanted) {
        synchronize(tree, policy, lang, child, &child_item.id, true)?;
    }
    Ok(())
}

/// Recompute enablement of the whole subtree below `node`.
///
/// A node is enabled iff every ancestor is enabled and non-checkable or checked.
pub fn refresh_disabled_state(
    tree: &mut DisplayTree,
    node: NodeId,
    all_ancestors_selected: bool,
) -> Result<()> {
    let n = tree.node(node)?;
    let all_selected = all_ancestors_selected && n.counts_as_selected();
    let children = n.children().to_vec();

    for child in children {
        tree.set_enabled(child, all_selected)?;
        refresh_disabled_state(tree, child, all_selected)?;
    }
    Ok(())
}

/// Propagate a single toggle below `node`, descending only where the
/// enablement of a child actually flips.
pub fn sync_children_disabled_state(
    tree: &mut DisplayTree,
    node: NodeId,
    enabled: bool,
) -> Result<()> {
    for child in tree.children(node)?.to_vec() {
        let c = tree.node(child)?;
        if c.is_enabled() == enabled {
            continue;
        }
        let below = enabled && c.counts_as_selected();
        tree.set_enabled(child, enabled)?;
        sync_children_disabled_state(tree, child, below)?;
    }
    Ok(())
}
