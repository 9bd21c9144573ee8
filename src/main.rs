mod common;
mod provider;
mod storage;
mod store;
mod ui;

use std::path::Path;

use clap::Parser;
use dotenvy::dotenv;
use tokio::sync::mpsc;

use provider::ProviderClient;
use storage::KvStore;
use store::ChatStore;
use ui::ChatApp;

#[derive(Parser)]
#[command(
    name = "rust_ai_chat",
    version,
    about = "Chat widget with local and cloud reply providers"
)]
struct Cli {
    /// Path to the chat database
    #[arg(long, default_value = storage::DEFAULT_DB_PATH, value_name = "FILE")]
    db: String,
}

#[tokio::main]
async fn main() -> Result<(), eframe::Error> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    // UI -> provider worker
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    // Provider worker -> UI
    let (event_tx, event_rx) = mpsc::channel(100);

    tokio::spawn(async move {
        ProviderClient::new(event_tx, cmd_rx).run().await;
    });

    let store = ChatStore::new(open_kv_store(&cli.db));

    let options = eframe::NativeOptions::default();
    let mut store = Some(store);
    let mut event_rx = Some(event_rx);

    eframe::run_native(
        "Rust AI Chat",
        options,
        Box::new(move |cc| {
            let store = store
                .take()
                .expect("ChatApp should only be initialized once");
            let event_receiver = event_rx
                .take()
                .expect("ChatApp should only be initialized once");

            log::info!(
                "Client started with {} stored messages",
                store.get_messages().len()
            );

            Ok(Box::new(ChatApp::new(
                cc,
                store,
                cmd_tx.clone(),
                event_receiver,
            )))
        }),
    )
}

/// Open the durable store, degrading to in-memory storage when the database
/// file cannot be opened.
fn open_kv_store(path: &str) -> KvStore {
    if let Err(err) = storage::ensure_parent_dir(Path::new(path)) {
        log::warn!("Unable to create data directory for {path}: {err}");
    }

    match KvStore::with_path(path) {
        Ok(kv) => kv,
        Err(err) => {
            log::warn!("Failed to open {path} ({err}); falling back to in-memory storage");
            KvStore::in_memory().expect("in-memory database should always open")
        }
    }
}
