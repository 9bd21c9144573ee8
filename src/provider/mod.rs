pub mod client;
pub mod eliza;
pub mod error;
pub mod groq;

pub use client::ProviderClient;
pub use eliza::Eliza;
pub use error::ProviderError;
pub use groq::GroqClient;
