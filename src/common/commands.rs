use crate::common::Provider;

/// Commands the UI sends down to the provider worker.
#[derive(Debug, Clone)]
pub enum ProviderCommand {
    /// Ask the selected provider for a reply to the given user text.
    /// `api_key` is only meaningful for the Groq provider; the UI resolves
    /// it from storage (or the key prompt) before dispatching.
    RequestReply {
        provider: Provider,
        text: String,
        api_key: Option<String>,
    },
}
