//! Item tree view
//!
//! Renders the display tree with an expander, a checkbox for checkable
//! nodes and a selectable label. Disabled nodes are greyed out and cannot be
//! toggled or selected.

use super::UiAction;
use crate::models::ItemType;
use crate::tailoring::{DisplayTree, NodeId};
use eframe::egui;

fn icon(kind: Option<ItemType>) -> &'static str {
    match kind {
        Some(ItemType::Benchmark) => "📘",
        Some(ItemType::Group) => "📁",
        Some(ItemType::Rule) => "📜",
        Some(ItemType::Value) => "🔧",
        None => "",
    }
}

/// Render the whole tree starting at the root
pub fn render_tree(
    ui: &mut egui::Ui,
    tree: &DisplayTree,
    current: Option<NodeId>,
    actions: &mut Vec<UiAction>,
) {
    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            render_node(ui, tree, tree.root(), current, actions);
        });
}

fn render_node(
    ui: &mut egui::Ui,
    tree: &DisplayTree,
    node: NodeId,
    current: Option<NodeId>,
    actions: &mut Vec<UiAction>,
) {
    let Ok(n) = tree.node(node) else {
        return;
    };
    let has_children = !n.children().is_empty();

    ui.horizontal(|ui| {
        if has_children {
            let arrow = if n.is_expanded() { "⏷" } else { "⏵" };
            if ui.small_button(arrow).clicked() {
                actions.push(UiAction::SetExpanded(node, !n.is_expanded()));
            }
        } else {
            ui.add_space(ui.spacing().interact_size.y);
        }

        if n.is_checkable() {
            let mut checked = n.is_checked();
            let response = ui.add_enabled(n.is_enabled(), egui::Checkbox::without_text(&mut checked));
            if response.changed() {
                actions.push(UiAction::SetChecked(node, checked));
            }
        }

        let text = format!("{} {}  ({})", icon(n.icon()), n.label(), n.id_text());
        let label = egui::SelectableLabel::new(current == Some(node), text);
        if ui.add_enabled(n.is_enabled(), label).clicked() {
            actions.push(UiAction::Select(Some(node)));
        }
    });

    if has_children && n.is_expanded() {
        ui.indent(("tree_node", node.index()), |ui| {
            for child in n.children() {
                render_node(ui, tree, *child, current, actions);
            }
        });
    }
}
