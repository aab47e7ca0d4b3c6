//! Discord delivery through serenity.

use crate::scanner::errors::DeliveryError;
use crate::scanner::notifier::AlertSink;
use crate::scanner::render::AlertMessage;
use async_trait::async_trait;
use serenity::all::{
    ChannelId, Colour, Context, CreateEmbed, CreateEmbedFooter, CreateMessage, EventHandler,
    Http, Ready,
};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing::{info, instrument};

/// Posts alerts as embeds to a single channel over the REST API.
pub struct DiscordSink {
    http: Arc<Http>,
    channel_id: ChannelId,
}

impl DiscordSink {
    /// `channel_id` must be non-zero.
    pub fn new(http: Arc<Http>, channel_id: u64) -> Self {
        Self {
            http,
            channel_id: ChannelId::new(channel_id),
        }
    }
}

#[async_trait]
impl AlertSink for DiscordSink {
    async fn resolve_channel(&self) -> Result<(), DeliveryError> {
        match self.channel_id.to_channel(&*self.http).await {
            Ok(_) => Ok(()),
            Err(serenity::Error::Http(e)) if e.status_code().map(|s| s.as_u16()) == Some(404) => {
                Err(DeliveryError::ChannelNotFound(self.channel_id.get()))
            }
            Err(e) => Err(DeliveryError::Gateway(e)),
        }
    }

    #[instrument(skip_all, fields(channel = %self.channel_id))]
    async fn deliver(&self, message: &AlertMessage) -> Result<(), DeliveryError> {
        self.channel_id
            .send_message(&*self.http, CreateMessage::new().embed(to_embed(message)))
            .await?;
        Ok(())
    }
}

/// Convert a rendered alert into a serenity embed.
pub fn to_embed(message: &AlertMessage) -> CreateEmbed {
    message.fields.iter().fold(
        CreateEmbed::new()
            .title(&message.title)
            .description(&message.description)
            .url(&message.url)
            .colour(Colour::new(message.colour))
            .footer(CreateEmbedFooter::new(&message.footer)),
        |embed, field| embed.field(&field.name, &field.value, field.inline),
    )
}

/// Gateway handler that reports the first `ready` event.
pub struct ReadyHandler {
    ready_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl ReadyHandler {
    pub fn new(ready_tx: oneshot::Sender<()>) -> Self {
        Self {
            ready_tx: Mutex::new(Some(ready_tx)),
        }
    }
}

#[async_trait]
impl EventHandler for ReadyHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Connected to Discord as {}", ready.user.name);

        // Reconnects fire `ready` again; only the first one starts the scanner.
        let sender = self.ready_tx.lock().ok().and_then(|mut tx| tx.take());
        if let Some(tx) = sender {
            let _ = tx.send(());
        }
    }
}
