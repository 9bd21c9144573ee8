pub mod commands;
pub mod events;
pub mod types;

pub use commands::ProviderCommand;
pub use events::ProviderEvent;
pub use types::{ChatMessage, Provider};
