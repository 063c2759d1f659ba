//! Main tailoring window
//!
//! `TailoringApp` hosts one `TailoringSession`. Each frame renders the
//! toolbar, the item tree, both property panels and (optionally) the undo
//! history, then applies the collected `UiAction`s. Closing with unconfirmed
//! changes asks for confirmation first, whether triggered from the Cancel
//! button or from the window's own close button.

use super::{panels, tree_view, UiAction};
use crate::config::EditorSettings;
use crate::error::TailoringError;
use crate::log_collector::LogCollector;
use crate::tailoring::{Lifecycle, TailoringHost, TailoringOutcome, TailoringSession};
use eframe::egui;

/// Close path waiting for the discard prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseRequest {
    Cancel,
    DeleteProfile,
}

/// Transient view state
#[derive(Debug, Default)]
pub struct UIState {
    pub show_history: bool,
    pub show_log: bool,
    pub pending_close: Option<CloseRequest>,
    /// Last refused value input, shown under the value editor
    pub rejection: Option<String>,
    pub error_message: Option<String>,
    pub outcome: Option<TailoringOutcome>,
    pub last_title: String,
}

/// Host side of the session, answering the prompt with the choice the user
/// already made in the discard dialog.
struct PromptAnswer {
    discard: bool,
    outcome: Option<TailoringOutcome>,
}

impl PromptAnswer {
    fn new(discard: bool) -> Self {
        PromptAnswer {
            discard,
            outcome: None,
        }
    }
}

impl TailoringHost for PromptAnswer {
    fn confirm_discard(&mut self) -> bool {
        self.discard
    }

    fn tailoring_finished(&mut self, outcome: TailoringOutcome) {
        self.outcome = Some(outcome);
    }
}

pub struct TailoringApp {
    session: TailoringSession,
    pub ui_state: UIState,
    log_collector: Option<LogCollector>,
}

impl TailoringApp {
    pub fn new(
        session: TailoringSession,
        settings: &EditorSettings,
        log_collector: Option<LogCollector>,
    ) -> Self {
        TailoringApp {
            session,
            ui_state: UIState {
                show_history: settings.show_undo_history,
                ..UIState::default()
            },
            log_collector,
        }
    }

    pub fn session(&self) -> &TailoringSession {
        &self.session
    }

    /// How the session ended, once it has
    pub fn outcome(&self) -> Option<TailoringOutcome> {
        self.ui_state.outcome
    }

    /// Apply the actions collected during rendering, in order.
    pub fn apply_actions(&mut self, actions: Vec<UiAction>) {
        for action in actions {
            if !self.session.is_open() {
                break;
            }
            let result = match action {
                UiAction::SetChecked(node, checked) => self.session.set_node_checked(node, checked),
                UiAction::SetExpanded(node, expanded) => {
                    self.session.set_node_expanded(node, expanded)
                }
                UiAction::Select(node) => {
                    self.ui_state.rejection = None;
                    self.session.select_item(node)
                }
                UiAction::EditTitle(text) => self.session.edit_profile_title(&text),
                UiAction::EditDescription(text) => self.session.edit_profile_description(&text),
                UiAction::EditValue(text) => {
                    let result = self.session.edit_value(&text);
                    if result.is_ok() {
                        self.ui_state.rejection = None;
                    }
                    result
                }
                UiAction::Undo => self.session.undo().map(|_| ()),
                UiAction::Redo => self.session.redo().map(|_| ()),
                UiAction::SetHistoryIndex(index) => self.session.set_history_index(index),
                UiAction::ToggleHistory => {
                    self.ui_state.show_history = !self.ui_state.show_history;
                    Ok(())
                }
                UiAction::Confirm => {
                    let mut host = PromptAnswer::new(false);
                    let result = self.session.confirm_and_close(&mut host).map(|_| ());
                    self.ui_state.outcome = host.outcome;
                    result
                }
                UiAction::Cancel => self.request_close(CloseRequest::Cancel),
                UiAction::DeleteProfile => self.request_close(CloseRequest::DeleteProfile),
            };
            self.report(result);
        }
    }

    /// Close immediately when nothing needs confirming, else show the prompt.
    fn request_close(&mut self, request: CloseRequest) -> Result<(), TailoringError> {
        if self.session.changes_confirmed() {
            self.finish_close(request, true)
        } else {
            self.ui_state.pending_close = Some(request);
            Ok(())
        }
    }

    fn finish_close(&mut self, request: CloseRequest, discard: bool) -> Result<(), TailoringError> {
        let mut host = PromptAnswer::new(discard);
        let result = match request {
            CloseRequest::Cancel => self.session.cancel(&mut host),
            CloseRequest::DeleteProfile => self.session.delete_profile_and_discard(&mut host),
        };
        self.ui_state.outcome = host.outcome;
        result.map(|_| ())
    }

    fn report(&mut self, result: Result<(), TailoringError>) {
        match result {
            Ok(()) => {}
            Err(e) if !e.is_fatal() => self.ui_state.rejection = Some(e.user_message()),
            Err(e) => {
                log::error!("[UI] {}", e);
                self.ui_state.error_message = Some(e.user_message());
            }
        }
    }

    fn render_toolbar(&mut self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let undo_hover = self
                    .session
                    .undo_text()
                    .map(|t| format!("Undo {}", t))
                    .unwrap_or_else(|| "Nothing to undo".to_string());
                if ui
                    .add_enabled(self.session.can_undo(), egui::Button::new("⟲ Undo"))
                    .on_hover_text(undo_hover)
                    .clicked()
                {
                    actions.push(UiAction::Undo);
                }

                let redo_hover = self
                    .session
                    .redo_text()
                    .map(|t| format!("Redo {}", t))
                    .unwrap_or_else(|| "Nothing to redo".to_string());
                if ui
                    .add_enabled(self.session.can_redo(), egui::Button::new("⟳ Redo"))
                    .on_hover_text(redo_hover)
                    .clicked()
                {
                    actions.push(UiAction::Redo);
                }

                ui.separator();
                if ui
                    .selectable_label(self.ui_state.show_history, "History")
                    .clicked()
                {
                    actions.push(UiAction::ToggleHistory);
                }
                if self.log_collector.is_some()
                    && ui.selectable_label(self.ui_state.show_log, "Log").clicked()
                {
                    self.ui_state.show_log = !self.ui_state.show_log;
                }
            });
        });
    }

    fn render_buttons(&mut self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        egui::TopBottomPanel::bottom("close_buttons").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui.button("🗑 Delete profile").clicked() {
                    actions.push(UiAction::DeleteProfile);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("✔ Finish tailoring").clicked() {
                        actions.push(UiAction::Confirm);
                    }
                    if ui.button("Cancel").clicked() {
                        actions.push(UiAction::Cancel);
                    }
                });
            });
            ui.add_space(4.0);
        });
    }

    fn render_log(&self, ctx: &egui::Context) {
        let Some(collector) = &self.log_collector else {
            return;
        };
        if !self.ui_state.show_log {
            return;
        }
        egui::TopBottomPanel::bottom("log_panel")
            .resizable(true)
            .default_height(120.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in collector.recent_lines() {
                            ui.monospace(line.render());
                        }
                    });
            });
    }

    fn render_discard_prompt(&mut self, ctx: &egui::Context) {
        let Some(request) = self.ui_state.pending_close else {
            return;
        };
        let mut answer = None;

        egui::Window::new("Discard changes?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Closing the window will undo all changes made to the profile.");
                if request == CloseRequest::DeleteProfile {
                    ui.label("The profile will be deleted.");
                }
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Discard").clicked() {
                        answer = Some(true);
                    }
                    if ui.button("Keep editing").clicked() {
                        answer = Some(false);
                    }
                });
            });

        if let Some(discard) = answer {
            self.ui_state.pending_close = None;
            if discard {
                let result = self.finish_close(request, true);
                self.report(result);
            } else {
                log::info!("[UI] Close declined, continuing to edit");
            }
        }
    }

    fn render_failure(&mut self, ctx: &egui::Context) {
        let Lifecycle::Failed(diagnostic) = self.session.lifecycle().clone() else {
            return;
        };
        let mut acknowledged = false;

        egui::Window::new("Tailoring aborted")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.colored_label(egui::Color32::from_rgb(255, 100, 100), diagnostic.as_str());
                ui.label("Changes cannot be kept. The window will close.");
                if ui.button("Close").clicked() {
                    acknowledged = true;
                }
            });

        if acknowledged {
            let mut host = PromptAnswer::new(true);
            self.session.abort(&mut host);
            self.ui_state.outcome = host.outcome;
        }
    }
}

impl eframe::App for TailoringApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Window close button goes through the same confirmation as Cancel
        if ctx.input(|i| i.viewport().close_requested()) && self.session.is_open() {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            let result = self.request_close(CloseRequest::Cancel);
            self.report(result);
        }

        let title = self.session.window_title();
        if title != self.ui_state.last_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.ui_state.last_title = title;
        }

        let mut actions = Vec::new();
        let modal = self.ui_state.pending_close.is_some() || !self.session.is_open();

        self.render_toolbar(ctx, &mut actions);
        self.render_buttons(ctx, &mut actions);
        self.render_log(ctx);

        if let Some(msg) = self.ui_state.error_message.clone() {
            egui::TopBottomPanel::top("error_panel").show(ctx, |ui| {
                ui.colored_label(egui::Color32::from_rgb(255, 100, 100), format!("Error: {}", msg));
            });
        }

        egui::SidePanel::right("properties")
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| {
                panels::render_profile_panel(ui, self.session.profile_panel(), &mut actions);
                ui.add_space(12.0);
                panels::render_item_panel(
                    ui,
                    self.session.item_panel(),
                    self.ui_state.rejection.as_deref(),
                    &mut actions,
                );
            });

        if self.ui_state.show_history {
            let history = self.session.history();
            egui::SidePanel::left("history")
                .resizable(true)
                .default_width(220.0)
                .show(ctx, |ui| {
                    panels::render_history(ui, &history.labels, history.index, &mut actions);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            tree_view::render_tree(
                ui,
                self.session.tree(),
                self.session.current_node(),
                &mut actions,
            );
        });

        self.render_discard_prompt(ctx);
        self.render_failure(ctx);

        // While a prompt is up, the rest of the window is inert
        if !modal {
            self.apply_actions(actions);
        }

        if self.ui_state.outcome.is_some() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }
}
