use tokio::sync::mpsc;

use crate::common::{Provider, ProviderCommand, ProviderEvent};

use super::eliza::Eliza;
use super::error::ProviderError;
use super::groq::GroqClient;

/// Background worker that turns reply requests into provider calls.
///
/// Eliza requests are answered inline; Groq requests are spawned as
/// separate tasks, so several in-flight calls resolve in whatever order the
/// network delivers them.
pub struct ProviderClient {
    event_sender: mpsc::Sender<ProviderEvent>,
    command_receiver: mpsc::Receiver<ProviderCommand>,
    eliza: Eliza,
    groq: GroqClient,
}

impl ProviderClient {
    pub fn new(
        event_sender: mpsc::Sender<ProviderEvent>,
        command_receiver: mpsc::Receiver<ProviderCommand>,
    ) -> Self {
        Self::with_groq_client(event_sender, command_receiver, GroqClient::new())
    }

    pub fn with_groq_client(
        event_sender: mpsc::Sender<ProviderEvent>,
        command_receiver: mpsc::Receiver<ProviderCommand>,
        groq: GroqClient,
    ) -> Self {
        Self {
            event_sender,
            command_receiver,
            eliza: Eliza::new(),
            groq,
        }
    }

    pub async fn run(mut self) {
        log::info!("Provider worker started");

        while let Some(command) = self.command_receiver.recv().await {
            self.handle_command(command).await;
        }

        log::info!("Provider worker stopped");
    }

    async fn handle_command(&mut self, command: ProviderCommand) {
        match command {
            ProviderCommand::RequestReply {
                provider,
                text,
                api_key,
            } => match provider {
                Provider::Eliza => {
                    let reply = self.eliza.respond(&text);
                    send_event(&self.event_sender, ProviderEvent::ReplyReady(reply)).await;
                }
                Provider::Groq => {
                    let groq = self.groq.clone();
                    let sender = self.event_sender.clone();
                    tokio::spawn(async move {
                        let event = match api_key {
                            None => ProviderEvent::ReplyFailed(
                                ProviderError::MissingApiKey.to_string(),
                            ),
                            Some(key) => match groq.complete(&key, &text).await {
                                Ok(reply) => ProviderEvent::ReplyReady(reply),
                                Err(err) => {
                                    log::warn!("Groq request failed: {err}");
                                    ProviderEvent::ReplyFailed(err.to_string())
                                }
                            },
                        };
                        send_event(&sender, event).await;
                    });
                }
            },
        }
    }
}

async fn send_event(sender: &mpsc::Sender<ProviderEvent>, event: ProviderEvent) {
    if let Err(err) = sender.send(event).await {
        log::warn!("Failed to notify UI: {err}");
    }
}
