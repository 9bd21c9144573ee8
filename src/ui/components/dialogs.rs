use eframe::egui;

use crate::ui::state::AppState;

/// Outcomes of the modal dialogs, applied by the app after rendering.
#[derive(Default)]
pub struct DialogActions {
    pub delete_confirmed: Option<String>,
    pub clear_confirmed: bool,
    /// (message id, replacement text)
    pub edit_submitted: Option<(String, String)>,
    /// (api key, user text waiting for a reply)
    pub key_submitted: Option<(String, String)>,
    pub key_cancelled: bool,
}

pub fn render(ctx: &egui::Context, state: &mut AppState) -> DialogActions {
    let mut actions = DialogActions::default();

    if let Some(message_id) = state.pending_delete.clone() {
        egui::Window::new("Delete message")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Delete this message?");
                ui.horizontal(|ui| {
                    if ui.button("Delete").clicked() {
                        actions.delete_confirmed = Some(message_id.clone());
                        state.pending_delete = None;
                    }
                    if ui.button("Cancel").clicked() {
                        state.pending_delete = None;
                    }
                });
            });
    }

    if state.confirm_clear {
        egui::Window::new("Clear chat")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Are you sure you want to clear all messages?");
                ui.horizontal(|ui| {
                    if ui.button("Clear").clicked() {
                        actions.clear_confirmed = true;
                        state.confirm_clear = false;
                    }
                    if ui.button("Cancel").clicked() {
                        state.confirm_clear = false;
                    }
                });
            });
    }

    if let Some(prompt) = state.edit_prompt.as_mut() {
        let mut close = false;
        egui::Window::new("Edit message")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Edit your message:");
                ui.text_edit_singleline(&mut prompt.text);
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        let text = prompt.text.trim().to_string();
                        if !text.is_empty() {
                            actions.edit_submitted = Some((prompt.message_id.clone(), text));
                        }
                        close = true;
                    }
                    if ui.button("Cancel").clicked() {
                        close = true;
                    }
                });
            });
        if close {
            state.edit_prompt = None;
        }
    }

    if let Some(prompt) = state.key_prompt.as_mut() {
        let mut close = false;
        egui::Window::new("Groq API key")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Enter Groq key:");
                ui.add(egui::TextEdit::singleline(&mut prompt.key_input).password(true));
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        let key = prompt.key_input.trim().to_string();
                        if !key.is_empty() {
                            actions.key_submitted = Some((key, prompt.pending_text.clone()));
                            close = true;
                        }
                    }
                    if ui.button("Cancel").clicked() {
                        actions.key_cancelled = true;
                        close = true;
                    }
                });
            });
        if close {
            state.key_prompt = None;
        }
    }

    actions
}
