/// Events the provider worker sends back up to the UI.
#[derive(Debug, Clone)]
pub enum ProviderEvent {
    /// A provider produced a reply.
    ReplyReady(String),
    /// A provider failed; the payload is a human-readable description.
    ReplyFailed(String),
}
