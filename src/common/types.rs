use serde::{Deserialize, Serialize};

/// Domain model for a single chat message.
///
/// Serialized with camelCase field names so exported files stay compatible
/// with history files produced by the browser version of the widget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub is_user: bool,
    /// Milliseconds since the Unix epoch, stored as a string.
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub edited: bool,
}

/// The reply-generation strategy selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provider {
    #[default]
    Eliza,
    Groq,
}

impl Provider {
    /// Stable identifier used for persistence.
    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Eliza => "eliza",
            Provider::Groq => "groq",
        }
    }

    /// Unknown identifiers fall back to the local responder.
    pub fn parse(value: &str) -> Self {
        match value {
            "groq" => Provider::Groq,
            _ => Provider::Eliza,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Provider::Eliza => "Eliza (Local)",
            Provider::Groq => "Groq Cloud",
        }
    }
}
