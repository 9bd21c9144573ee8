/// Pending edit dialog for a user message.
pub struct EditPrompt {
    pub message_id: String,
    pub text: String,
}

/// Pending Groq key dialog. Holds the user text whose reply request is
/// waiting for the key.
pub struct KeyPrompt {
    pub key_input: String,
    pub pending_text: String,
}

impl KeyPrompt {
    pub fn new(pending_text: String) -> Self {
        Self {
            key_input: String::new(),
            pending_text,
        }
    }
}

/// Transient UI state owned by the app, separate from the message store.
pub struct AppState {
    pub input_text: String,
    pub import_path: String,
    /// Status line for import/export feedback.
    pub notice: Option<String>,
    pub confirm_clear: bool,
    /// Message id awaiting delete confirmation.
    pub pending_delete: Option<String>,
    pub edit_prompt: Option<EditPrompt>,
    pub key_prompt: Option<KeyPrompt>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            input_text: String::new(),
            import_path: String::new(),
            notice: None,
            confirm_clear: false,
            pending_delete: None,
            edit_prompt: None,
            key_prompt: None,
        }
    }
}
