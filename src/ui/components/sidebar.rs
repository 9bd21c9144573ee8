use eframe::egui;

use crate::common::Provider;
use crate::ui::state::AppState;

#[derive(Default)]
pub struct SidebarActions {
    pub provider_changed: Option<Provider>,
    pub clear_requested: bool,
    pub export_requested: bool,
    pub import_requested: Option<String>,
}

pub fn render(ui: &mut egui::Ui, state: &mut AppState, provider: Provider) -> SidebarActions {
    let mut actions = SidebarActions::default();

    ui.heading("Chat");
    ui.separator();

    ui.label("Reply provider:");
    let mut selected = provider;
    egui::ComboBox::from_id_salt("provider_select")
        .selected_text(selected.label())
        .show_ui(ui, |ui| {
            ui.selectable_value(&mut selected, Provider::Eliza, Provider::Eliza.label());
            ui.selectable_value(&mut selected, Provider::Groq, Provider::Groq.label());
        });
    if selected != provider {
        actions.provider_changed = Some(selected);
    }

    ui.separator();

    if ui.button("Export chat").clicked() {
        actions.export_requested = true;
    }

    ui.label("Import from file:");
    ui.horizontal(|ui| {
        ui.text_edit_singleline(&mut state.import_path);
        if ui.button("Import").clicked() && !state.import_path.trim().is_empty() {
            actions.import_requested = Some(state.import_path.trim().to_string());
        }
    });

    ui.separator();

    if ui.button("Clear all").clicked() {
        actions.clear_requested = true;
    }

    if let Some(notice) = &state.notice {
        ui.separator();
        ui.colored_label(egui::Color32::YELLOW, notice);
    }

    actions
}
