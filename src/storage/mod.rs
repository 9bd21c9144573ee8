pub mod kv_store;

pub use kv_store::KvStore;

use std::fs;
use std::path::Path;

/// Default location of the chat database.
pub const DEFAULT_DB_PATH: &str = "data/chat.db";

/// Ensure the parent directory of a database path exists.
pub fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
