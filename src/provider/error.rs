use thiserror::Error;

/// Failure to obtain a reply from a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The user has not supplied a Groq key.
    #[error("Groq API key required")]
    MissingApiKey,
    /// Transport failure or an unparseable response body.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}
