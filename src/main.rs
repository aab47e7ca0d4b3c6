//! Main entry point for the Stratos alert scanner.

use anyhow::{bail, Context, Result};
use serenity::all::{Client, GatewayIntents};
use std::sync::Arc;
use stratos_alert::discord::{DiscordSink, ReadyHandler};
use stratos_alert::{ScannerBuilder, Settings};
use tokio::sync::oneshot;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Stratos alert scanner");

    let settings = Settings::from_env()?;
    info!(
        channel_id = settings.channel_id,
        interval_secs = settings.alert.scan_interval_seconds,
        "Loaded settings"
    );

    let (ready_tx, ready_rx) = oneshot::channel();
    let mut client = Client::builder(&settings.discord_token, GatewayIntents::GUILDS)
        .event_handler(ReadyHandler::new(ready_tx))
        .await
        .context("Failed to create Discord client")?;

    let sink = Arc::new(DiscordSink::new(client.http.clone(), settings.channel_id));
    let scanner = ScannerBuilder::with_config(settings.alert)
        .with_sink(sink)
        .build()?;

    let shard_manager = client.shard_manager.clone();
    let mut gateway = tokio::spawn(async move { client.start().await });

    // The first tick waits for the gateway to report ready.
    tokio::select! {
        ready = ready_rx => ready.context("Discord gateway closed before becoming ready")?,
        result = &mut gateway => match result {
            Ok(Ok(())) => bail!("Discord gateway stopped before becoming ready"),
            Ok(Err(e)) => return Err(e).context("Discord gateway failed"),
            Err(e) => return Err(e).context("Discord gateway task panicked"),
        },
    }

    let seen = scanner.run(shutdown_signal()).await;
    info!("Session finished with {} tokens alerted", seen.len());

    shard_manager.shutdown_all().await;
    let _ = gateway.await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
