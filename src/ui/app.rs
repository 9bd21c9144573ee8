use std::fs;

use eframe::egui;
use tokio::sync::mpsc;

use crate::common::{Provider, ProviderCommand, ProviderEvent};
use crate::store::ChatStore;

use super::components::dialogs::{self, DialogActions};
use super::components::{chat_area, input_bar, sidebar};
use super::state::{AppState, EditPrompt, KeyPrompt};

/// File written by the export button.
pub const EXPORT_FILE: &str = "chat_export.json";

/// Top-level application: owns the message store and the transient UI
/// state, and wires UI events to store mutations and reply requests.
pub struct ChatApp {
    state: AppState,
    store: ChatStore,
    provider: Provider,
    command_sender: mpsc::Sender<ProviderCommand>,
    event_receiver: mpsc::Receiver<ProviderEvent>,
}

impl ChatApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        store: ChatStore,
        command_sender: mpsc::Sender<ProviderCommand>,
        event_receiver: mpsc::Receiver<ProviderEvent>,
    ) -> Self {
        let mut app = Self::from_parts(store, command_sender, event_receiver);

        // The store drives repaints: any mutation wakes the UI even when no
        // input event is pending.
        let repaint_ctx = cc.egui_ctx.clone();
        app.store
            .add_observer(Box::new(move || repaint_ctx.request_repaint()));

        app
    }

    fn from_parts(
        store: ChatStore,
        command_sender: mpsc::Sender<ProviderCommand>,
        event_receiver: mpsc::Receiver<ProviderEvent>,
    ) -> Self {
        let provider = store.provider();
        Self {
            state: AppState::new(),
            store,
            provider,
            command_sender,
            event_receiver,
        }
    }

    fn handle_provider_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            match event {
                ProviderEvent::ReplyReady(reply) => self.store.add_message(&reply, false),
                ProviderEvent::ReplyFailed(description) => {
                    self.store.add_message(&error_reply(&description), false)
                }
            }
        }
    }

    /// Append the user's message and ask the current provider for a reply.
    fn handle_send(&mut self, text: String) {
        self.store.add_message(&text, true);
        self.request_reply(text);
    }

    /// Dispatch a reply request, detouring through the key prompt when the
    /// Groq provider has no cached key yet.
    fn request_reply(&mut self, text: String) {
        let api_key = match self.provider {
            Provider::Eliza => None,
            Provider::Groq => match self.store.api_key() {
                Some(key) => Some(key),
                None => {
                    self.state.key_prompt = Some(KeyPrompt::new(text));
                    return;
                }
            },
        };

        self.send_command(ProviderCommand::RequestReply {
            provider: self.provider,
            text,
            api_key,
        });
    }

    fn send_command(&mut self, command: ProviderCommand) {
        if let Err(err) = self.command_sender.try_send(command) {
            log::warn!("Failed to send command to provider worker: {err}");
        }
    }

    fn set_provider(&mut self, provider: Provider) {
        self.provider = provider;
        self.store.set_provider(provider);
    }

    fn start_edit(&mut self, message_id: String) {
        let text = self
            .store
            .get_messages()
            .iter()
            .find(|message| message.id == message_id)
            .map(|message| message.text.clone())
            .unwrap_or_default();
        self.state.edit_prompt = Some(EditPrompt { message_id, text });
    }

    fn export_chat(&mut self) {
        let data = self.store.export_chat();
        match fs::write(EXPORT_FILE, data) {
            Ok(()) => {
                self.state.notice = Some(format!("Exported chat to {EXPORT_FILE}"));
            }
            Err(err) => {
                log::error!("Failed to write {EXPORT_FILE}: {err}");
                self.state.notice = Some(format!("Export failed: {err}"));
            }
        }
    }

    fn import_chat(&mut self, path: &str) {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                self.state.notice = Some(format!("Could not read {path}: {err}"));
                return;
            }
        };

        match self.store.import_chat(&contents) {
            Ok(()) => {
                self.state.notice = Some("Chat imported".to_string());
            }
            Err(err) => {
                log::warn!("Rejected chat import from {path}: {err}");
                self.state.notice = Some("Invalid file format!".to_string());
            }
        }
    }

    fn apply_dialog_actions(&mut self, actions: DialogActions) {
        if let Some(id) = actions.delete_confirmed {
            self.store.delete_message(&id);
        }
        if actions.clear_confirmed {
            self.store.clear_messages();
        }
        if let Some((id, text)) = actions.edit_submitted {
            // The bot reply to the original text stays in place; a fresh
            // reply for the edited text is simply appended.
            self.store.update_message(&id, &text);
            self.request_reply(text);
        }
        if let Some((key, pending_text)) = actions.key_submitted {
            self.store.set_api_key(&key);
            self.request_reply(pending_text);
        }
        if actions.key_cancelled {
            self.store
                .add_message(&error_reply("Groq API key required"), false);
        }
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_provider_events();

        egui::SidePanel::left("chat_sidebar")
            .resizable(true)
            .default_width(200.0)
            .show(ctx, |ui| {
                let actions = sidebar::render(ui, &mut self.state, self.provider);
                if let Some(provider) = actions.provider_changed {
                    self.set_provider(provider);
                }
                if actions.export_requested {
                    self.export_chat();
                }
                if let Some(path) = actions.import_requested {
                    self.import_chat(&path);
                }
                if actions.clear_requested {
                    self.state.confirm_clear = true;
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Rust AI Chat");
            ui.separator();

            let messages = self.store.get_messages();
            let actions = chat_area::render(ui, &messages);
            if let Some(id) = actions.edit_requested {
                self.start_edit(id);
            }
            if let Some(id) = actions.delete_requested {
                self.state.pending_delete = Some(id);
            }

            ui.separator();
            if let Some(content) = input_bar::render(ui, &mut self.state.input_text) {
                self.handle_send(content);
            }
        });

        let dialog_actions = dialogs::render(ctx, &mut self.state);
        self.apply_dialog_actions(dialog_actions);

        ctx.request_repaint();
    }
}

fn error_reply(description: &str) -> String {
    format!("(AI error) {description}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::groq::spawn_mock_endpoint;
    use crate::provider::{GroqClient, ProviderClient};
    use crate::storage::KvStore;
    use std::time::Duration;

    fn test_store() -> ChatStore {
        ChatStore::new(KvStore::in_memory().expect("open in-memory store"))
    }

    fn standalone_app(
        store: ChatStore,
    ) -> (
        ChatApp,
        mpsc::Receiver<ProviderCommand>,
        mpsc::Sender<ProviderEvent>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (event_tx, event_rx) = mpsc::channel(16);
        (ChatApp::from_parts(store, cmd_tx, event_rx), cmd_rx, event_tx)
    }

    /// App wired to a live provider worker backed by the given Groq client.
    fn app_with_worker(store: ChatStore, groq: GroqClient) -> ChatApp {
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (event_tx, event_rx) = mpsc::channel(16);
        tokio::spawn(ProviderClient::with_groq_client(event_tx, cmd_rx, groq).run());
        ChatApp::from_parts(store, cmd_tx, event_rx)
    }

    async fn drain_until(app: &mut ChatApp, expected: usize) {
        for _ in 0..200 {
            app.handle_provider_events();
            if app.store.get_messages().len() >= expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "expected {expected} messages, got {}",
            app.store.get_messages().len()
        );
    }

    #[test]
    fn error_reply_carries_the_expected_prefix() {
        assert_eq!(
            error_reply("boom"),
            "(AI error) boom".to_string()
        );
    }

    #[tokio::test]
    async fn send_appends_user_message_and_dispatches_command() {
        let (mut app, mut cmd_rx, _event_tx) = standalone_app(test_store());

        app.handle_send("hello".to_string());

        let messages = app.store.get_messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].is_user);
        assert_eq!(messages[0].text, "hello");

        match cmd_rx.try_recv().expect("command dispatched") {
            ProviderCommand::RequestReply {
                provider,
                text,
                api_key,
            } => {
                assert_eq!(provider, Provider::Eliza);
                assert_eq!(text, "hello");
                assert_eq!(api_key, None);
            }
        }
    }

    #[tokio::test]
    async fn eliza_send_ends_with_two_messages() {
        let mut app = app_with_worker(test_store(), GroqClient::new());

        app.handle_send("hello".to_string());
        drain_until(&mut app, 2).await;

        let messages = app.store.get_messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].is_user);
        assert!(!messages[1].is_user);
        assert!(!messages[1].text.is_empty());
    }

    #[tokio::test]
    async fn groq_send_renders_the_mocked_reply() {
        let endpoint = spawn_mock_endpoint(
            r#"{"choices":[{"message":{"content":"(mock) Hi from Groq!"}}]}"#.to_string(),
        )
        .await;
        let store = test_store();
        store.set_provider(Provider::Groq);
        store.set_api_key("TEST_KEY");
        let mut app = app_with_worker(store, GroqClient::with_endpoint(endpoint));

        app.handle_send("ping".to_string());
        drain_until(&mut app, 2).await;

        let last = app.store.get_messages().pop().expect("bot reply");
        assert_eq!(last.text, "(mock) Hi from Groq!");
        assert!(!last.is_user);
    }

    #[tokio::test]
    async fn failed_groq_call_appends_an_ai_error_message() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let store = test_store();
        store.set_provider(Provider::Groq);
        store.set_api_key("TEST_KEY");
        let mut app = app_with_worker(store, GroqClient::with_endpoint(format!("http://{addr}")));

        app.handle_send("ping".to_string());
        drain_until(&mut app, 2).await;

        let last = app.store.get_messages().pop().expect("bot reply");
        assert!(last.text.starts_with("(AI error) "), "got: {}", last.text);
        assert!(!last.is_user);
    }

    #[tokio::test]
    async fn groq_without_cached_key_opens_the_key_prompt() {
        let store = test_store();
        store.set_provider(Provider::Groq);
        let (mut app, mut cmd_rx, _event_tx) = standalone_app(store);

        app.handle_send("ping".to_string());

        assert!(cmd_rx.try_recv().is_err(), "nothing should be dispatched");
        let prompt = app.state.key_prompt.as_ref().expect("key prompt open");
        assert_eq!(prompt.pending_text, "ping");
        assert_eq!(app.store.get_messages().len(), 1);
    }

    #[tokio::test]
    async fn submitting_a_key_caches_it_and_dispatches_the_pending_text() {
        let store = test_store();
        store.set_provider(Provider::Groq);
        let (mut app, mut cmd_rx, _event_tx) = standalone_app(store);
        app.handle_send("ping".to_string());

        app.apply_dialog_actions(DialogActions {
            key_submitted: Some(("gsk_test".to_string(), "ping".to_string())),
            ..Default::default()
        });

        assert_eq!(app.store.api_key(), Some("gsk_test".to_string()));
        match cmd_rx.try_recv().expect("command dispatched") {
            ProviderCommand::RequestReply { text, api_key, .. } => {
                assert_eq!(text, "ping");
                assert_eq!(api_key, Some("gsk_test".to_string()));
            }
        }
    }

    #[tokio::test]
    async fn cancelling_the_key_prompt_surfaces_a_credential_error() {
        let store = test_store();
        store.set_provider(Provider::Groq);
        let (mut app, _cmd_rx, _event_tx) = standalone_app(store);
        app.handle_send("ping".to_string());

        app.apply_dialog_actions(DialogActions {
            key_cancelled: true,
            ..Default::default()
        });

        let last = app.store.get_messages().pop().expect("error message");
        assert_eq!(last.text, "(AI error) Groq API key required");
        assert!(!last.is_user);
    }

    #[tokio::test]
    async fn edit_updates_the_message_and_requests_a_fresh_reply() {
        let mut app = app_with_worker(test_store(), GroqClient::new());
        app.handle_send("helo".to_string());
        drain_until(&mut app, 2).await;
        let id = app.store.get_messages()[0].id.clone();

        app.apply_dialog_actions(DialogActions {
            edit_submitted: Some((id.clone(), "hello".to_string())),
            ..Default::default()
        });
        drain_until(&mut app, 3).await;

        let messages = app.store.get_messages();
        assert_eq!(messages[0].text, "hello");
        assert!(messages[0].edited);
        // The reply to the original text is kept; the fresh reply lands last.
        assert_eq!(messages.len(), 3);
        assert!(!messages[2].is_user);
    }

    #[tokio::test]
    async fn delete_confirmation_removes_the_message() {
        let (mut app, _cmd_rx, _event_tx) = standalone_app(test_store());
        app.handle_send("delete me".to_string());
        let id = app.store.get_messages()[0].id.clone();

        app.apply_dialog_actions(DialogActions {
            delete_confirmed: Some(id),
            ..Default::default()
        });

        assert!(app.store.get_messages().is_empty());
    }

    #[tokio::test]
    async fn clear_confirmation_empties_the_store() {
        let (mut app, _cmd_rx, _event_tx) = standalone_app(test_store());
        app.handle_send("one".to_string());
        app.handle_send("two".to_string());

        app.apply_dialog_actions(DialogActions {
            clear_confirmed: true,
            ..Default::default()
        });

        assert!(app.store.get_messages().is_empty());
    }

    #[tokio::test]
    async fn import_failure_sets_a_notice_and_keeps_messages() {
        let (mut app, _cmd_rx, _event_tx) = standalone_app(test_store());
        app.handle_send("keep me".to_string());

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{\"not\": \"a list\"}").expect("write file");

        app.import_chat(path.to_str().expect("utf-8 path"));

        assert_eq!(app.state.notice.as_deref(), Some("Invalid file format!"));
        assert_eq!(app.store.get_messages().len(), 1);
    }

    #[tokio::test]
    async fn import_reads_a_file_written_by_export() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("history.json");

        let (mut app, _cmd_rx, _event_tx) = standalone_app(test_store());
        app.handle_send("exported".to_string());
        std::fs::write(&path, app.store.export_chat()).expect("write export");

        let (mut other, _cmd_rx2, _event_tx2) = standalone_app(test_store());
        other.import_chat(path.to_str().expect("utf-8 path"));

        assert_eq!(other.state.notice.as_deref(), Some("Chat imported"));
        let messages = other.store.get_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].text, "exported");
    }

    #[tokio::test]
    async fn provider_switch_is_persisted_in_the_store() {
        let (mut app, _cmd_rx, _event_tx) = standalone_app(test_store());
        assert_eq!(app.provider, Provider::Eliza);

        app.set_provider(Provider::Groq);

        assert_eq!(app.provider, Provider::Groq);
        assert_eq!(app.store.provider(), Provider::Groq);
    }
}
