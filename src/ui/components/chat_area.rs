use chrono::DateTime;
use eframe::egui;

use crate::common::ChatMessage;

/// Edit/delete requests raised by the per-message buttons, carrying the
/// message id they belong to.
#[derive(Default)]
pub struct ChatAreaActions {
    pub edit_requested: Option<String>,
    pub delete_requested: Option<String>,
}

pub fn render(ui: &mut egui::Ui, messages: &[ChatMessage]) -> ChatAreaActions {
    let mut actions = ChatAreaActions::default();

    ui.label(count_label(messages.len()));
    ui.separator();

    if messages.is_empty() {
        ui.label(egui::RichText::new("Start chatting!").weak());
        return actions;
    }

    egui::ScrollArea::vertical()
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in messages {
                ui.push_id(&message.id, |ui| {
                    render_message(ui, message, &mut actions);
                });
            }
        });

    actions
}

fn render_message(ui: &mut egui::Ui, message: &ChatMessage, actions: &mut ChatAreaActions) {
    let (tag, color) = if message.is_user {
        ("You", egui::Color32::LIGHT_BLUE)
    } else {
        ("Bot", egui::Color32::LIGHT_GREEN)
    };

    ui.horizontal(|ui| {
        ui.colored_label(color, tag);
        ui.label(&message.text);
        if message.edited {
            ui.label(egui::RichText::new("(edited)").weak());
        }
        if let Some(time) = format_time(&message.timestamp) {
            ui.label(egui::RichText::new(time).weak());
        }
        if message.is_user {
            if ui.small_button("Edit").clicked() {
                actions.edit_requested = Some(message.id.clone());
            }
            if ui.small_button("Delete").clicked() {
                actions.delete_requested = Some(message.id.clone());
            }
        }
    });
}

/// "0 messages" / "1 message" / "2 messages".
pub fn count_label(count: usize) -> String {
    format!("{count} message{}", if count == 1 { "" } else { "s" })
}

/// Epoch-millis string as a wall-clock time, or None if it does not parse.
fn format_time(timestamp: &str) -> Option<String> {
    let millis = timestamp.parse::<i64>().ok()?;
    let time = DateTime::from_timestamp_millis(millis)?;
    Some(time.format("%H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_label_handles_singular_and_plural() {
        assert_eq!(count_label(0), "0 messages");
        assert_eq!(count_label(1), "1 message");
        assert_eq!(count_label(2), "2 messages");
    }

    #[test]
    fn format_time_parses_epoch_millis() {
        assert_eq!(format_time("0"), Some("00:00:00".to_string()));
        assert!(format_time("1700000000000").is_some());
    }

    #[test]
    fn format_time_rejects_garbage() {
        assert_eq!(format_time(""), None);
        assert_eq!(format_time("yesterday"), None);
    }
}
