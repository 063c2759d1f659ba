//! Property panel views
//!
//! Text fields are edited on a per-frame copy of the panel's text; a change
//! becomes a `UiAction` and the next frame shows whatever the session kept,
//! so refused input simply does not stick. Partially typed values are kept
//! by the panel and only reach the model once complete.

use super::UiAction;
use crate::tailoring::{ItemPropertiesPanel, ProfilePropertiesPanel};
use eframe::egui;

/// Render the profile properties (id, title, description)
pub fn render_profile_panel(
    ui: &mut egui::Ui,
    panel: &ProfilePropertiesPanel,
    actions: &mut Vec<UiAction>,
) {
    ui.heading("Profile");
    ui.separator();

    egui::Grid::new("profile_properties")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            ui.label("ID:");
            ui.label(egui::RichText::new(panel.id()).monospace());
            ui.end_row();

            ui.label("Title:");
            let mut title = panel.title().to_string();
            if ui.text_edit_singleline(&mut title).changed() {
                actions.push(UiAction::EditTitle(title));
            }
            ui.end_row();
        });

    ui.label("Description:");
    let mut description = panel.description().to_string();
    let response = ui.add(
        egui::TextEdit::multiline(&mut description)
            .desired_rows(4)
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        actions.push(UiAction::EditDescription(description));
    }
}

/// Render the current item's properties, with the value editor for Values
pub fn render_item_panel(
    ui: &mut egui::Ui,
    panel: &ItemPropertiesPanel,
    rejection: Option<&str>,
    actions: &mut Vec<UiAction>,
) {
    ui.heading(panel.title());
    ui.separator();

    egui::Grid::new("item_properties")
        .num_columns(2)
        .spacing([12.0, 6.0])
        .show(ui, |ui| {
            ui.label("ID:");
            ui.label(egui::RichText::new(panel.id()).monospace());
            ui.end_row();

            ui.label("Type:");
            ui.label(panel.type_name());
            ui.end_row();
        });

    if !panel.description().is_empty() {
        ui.add_space(4.0);
        ui.label(panel.description());
    }

    let Some(value) = panel.value() else {
        return;
    };

    ui.add_space(8.0);
    ui.group(|ui| {
        ui.horizontal(|ui| {
            ui.strong("Value");
            ui.label(egui::RichText::new(value.type_label).italics());
        });

        let mut text = value.text().to_string();
        let response = ui.text_edit_singleline(&mut text);
        if response.changed() {
            actions.push(UiAction::EditValue(text));
        }
        response.on_hover_text(format!("Accepts {}", value.constraint.describe()));
        if value.is_intermediate() {
            ui.weak(format!("Incomplete, expecting {}", value.constraint.describe()));
        }

        if !value.instances.is_empty() {
            egui::ComboBox::from_id_source("value_instances")
                .selected_text("Known values")
                .show_ui(ui, |ui| {
                    for instance in &value.instances {
                        let selected = instance == value.text();
                        if ui.selectable_label(selected, instance.as_str()).clicked() && !selected {
                            actions.push(UiAction::EditValue(instance.clone()));
                        }
                    }
                });
        }

        if let Some(message) = rejection {
            ui.colored_label(egui::Color32::from_rgb(255, 160, 80), message);
        }
    });
}

/// Render the undo history list; clicking an entry jumps there
pub fn render_history(
    ui: &mut egui::Ui,
    labels: &[String],
    index: usize,
    actions: &mut Vec<UiAction>,
) {
    ui.heading("History");
    ui.separator();
    egui::ScrollArea::vertical().show(ui, |ui| {
        if ui.selectable_label(index == 0, "<empty>").clicked() {
            actions.push(UiAction::SetHistoryIndex(0));
        }
        for (i, label) in labels.iter().enumerate() {
            let position = i + 1;
            if ui.selectable_label(index == position, label.as_str()).clicked() {
                actions.push(UiAction::SetHistoryIndex(position));
            }
        }
    });
}
