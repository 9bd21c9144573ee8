use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::common::{ChatMessage, Provider};
use crate::storage::KvStore;
use crate::storage::kv_store::{API_KEY_KEY, MESSAGES_KEY, PROVIDER_KEY};

/// Callback invoked after every successful mutation.
pub type Observer = Box<dyn Fn()>;

/// Import rejected because the payload does not describe a message list.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("chat data must be an array of messages")]
    NotAnArray,
    #[error("message at index {index} has an invalid shape")]
    InvalidEntry { index: usize },
}

/// Owns the ordered message list and its persistence.
///
/// Every mutation saves the full list to the key-value store and then
/// notifies the registered observers. Persistence is best-effort: a failed
/// write only logs, the in-memory list stays authoritative for the session.
pub struct ChatStore {
    messages: Vec<ChatMessage>,
    observers: Vec<Observer>,
    kv: KvStore,
}

impl ChatStore {
    /// Load previously stored messages, or start empty if nothing is stored
    /// or the stored data is corrupt.
    pub fn new(kv: KvStore) -> Self {
        let messages = load_messages(&kv);
        Self {
            messages,
            observers: Vec::new(),
            kv,
        }
    }

    /// Register an observer called synchronously after every mutation.
    pub fn add_observer(&mut self, observer: Observer) {
        self.observers.push(observer);
    }

    fn notify_observers(&self) {
        for observer in &self.observers {
            observer();
        }
    }

    /// Append a new message authored by the user or the bot.
    pub fn add_message(&mut self, text: &str, is_user: bool) {
        let message = ChatMessage {
            id: Uuid::now_v7().to_string(),
            text: text.to_string(),
            is_user,
            timestamp: Utc::now().timestamp_millis().to_string(),
            edited: false,
        };
        self.messages.push(message);
        self.save_messages();
        self.notify_observers();
    }

    /// Defensive copy of the message list in insertion order.
    pub fn get_messages(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }

    /// Replace the text of a user-authored message and mark it edited.
    /// Unknown ids and bot messages are left untouched.
    pub fn update_message(&mut self, id: &str, new_text: &str) {
        let Some(message) = self.messages.iter_mut().find(|message| message.id == id) else {
            return;
        };
        if !message.is_user {
            return;
        }
        message.text = new_text.to_string();
        message.edited = true;
        self.save_messages();
        self.notify_observers();
    }

    /// Remove the message with the given id, if present.
    pub fn delete_message(&mut self, id: &str) {
        self.messages.retain(|message| message.id != id);
        self.save_messages();
        self.notify_observers();
    }

    /// Drop the whole conversation.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
        self.save_messages();
        self.notify_observers();
    }

    /// Pretty-printed JSON of the full message list.
    pub fn export_chat(&self) -> String {
        serde_json::to_string_pretty(&self.messages).unwrap_or_else(|err| {
            log::error!("Failed to serialize chat history: {err}");
            "[]".to_string()
        })
    }

    /// Replace the message list wholesale from a JSON payload.
    ///
    /// The payload must be an array whose entries each carry a non-empty
    /// `id`, non-empty `text`, and boolean `isUser`. On any failure the
    /// current list is left untouched.
    pub fn import_chat(&mut self, json_text: &str) -> Result<(), ImportError> {
        let value: serde_json::Value = serde_json::from_str(json_text)?;
        let entries = value.as_array().ok_or(ImportError::NotAnArray)?;

        let mut messages = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let message: ChatMessage = serde_json::from_value(entry.clone())
                .map_err(|_| ImportError::InvalidEntry { index })?;
            if message.id.is_empty() || message.text.is_empty() {
                return Err(ImportError::InvalidEntry { index });
            }
            messages.push(message);
        }

        self.messages = messages;
        self.save_messages();
        self.notify_observers();
        Ok(())
    }

    // ========== Settings ==========
    //
    // The provider flag and the Groq key live in the same durable store as
    // the messages, so the store fronts them too. Reads and writes here do
    // not notify observers.

    pub fn provider(&self) -> Provider {
        match self.kv.get(PROVIDER_KEY) {
            Ok(Some(value)) => Provider::parse(&value),
            Ok(None) => Provider::default(),
            Err(err) => {
                log::warn!("Failed to read provider setting: {err}");
                Provider::default()
            }
        }
    }

    pub fn set_provider(&self, provider: Provider) {
        if let Err(err) = self.kv.set(PROVIDER_KEY, provider.as_str()) {
            log::warn!("Failed to persist provider setting: {err}");
        }
    }

    pub fn api_key(&self) -> Option<String> {
        match self.kv.get(API_KEY_KEY) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("Failed to read API key: {err}");
                None
            }
        }
    }

    pub fn set_api_key(&self, key: &str) {
        if let Err(err) = self.kv.set(API_KEY_KEY, key) {
            log::warn!("Failed to persist API key: {err}");
        }
    }

    fn save_messages(&self) {
        match serde_json::to_string(&self.messages) {
            Ok(json) => {
                if let Err(err) = self.kv.set(MESSAGES_KEY, &json) {
                    log::warn!("Failed to persist messages: {err}");
                }
            }
            Err(err) => log::warn!("Failed to serialize messages: {err}"),
        }
    }
}

fn load_messages(kv: &KvStore) -> Vec<ChatMessage> {
    match kv.get(MESSAGES_KEY) {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|err| {
            log::warn!("Stored chat history is corrupt ({err}); starting empty");
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(err) => {
            log::warn!("Failed to load chat history: {err}");
            Vec::new()
        }
    }
}
