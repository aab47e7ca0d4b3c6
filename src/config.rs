//! Process settings loaded once from the environment.
//!
//! A `.env` file in the working directory is read first when present.
//! `DISCORD_BOT_TOKEN` and `ALERT_CHANNEL_ID` are required; the other
//! variables override [`AlertConfig`] defaults.

use crate::scanner::AlertConfig;
use anyhow::{bail, Context, Result};
use std::fmt;
use std::str::FromStr;

pub struct Settings {
    pub discord_token: String,
    pub channel_id: u64,
    pub alert: AlertConfig,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("discord_token", &"<redacted>")
            .field("channel_id", &self.channel_id)
            .field("alert", &self.alert)
            .finish()
    }
}

impl Settings {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_BOT_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .context("DISCORD_BOT_TOKEN is not set")?;

        let channel_id: u64 = parse_var(&lookup, "ALERT_CHANNEL_ID")?
            .context("ALERT_CHANNEL_ID is not set")?;
        if channel_id == 0 {
            bail!("ALERT_CHANNEL_ID must be a non-zero channel id");
        }

        let mut alert = AlertConfig::default();
        if let Some(seconds) = parse_var(&lookup, "SCAN_INTERVAL_SECS")? {
            alert.scan_interval_seconds = seconds;
        }
        if let Some(max) = parse_var(&lookup, "MAX_CANDIDATES")? {
            alert.max_candidates = max;
        }
        if let Some(threshold) = parse_var(&lookup, "MOMENTUM_THRESHOLD")? {
            alert.momentum_threshold = threshold;
        }
        if let Some(seconds) = parse_var(&lookup, "HTTP_TIMEOUT_SECS")? {
            alert.http_timeout_seconds = seconds;
        }
        if let Some(rps) = parse_var(&lookup, "REQUESTS_PER_SECOND")? {
            alert.requests_per_second = rps;
        }
        if let Some(query) = lookup("DISCOVERY_QUERY").filter(|q| !q.trim().is_empty()) {
            alert.discovery_query = query;
        }

        if alert.scan_interval_seconds == 0 {
            bail!("SCAN_INTERVAL_SECS must be at least 1");
        }

        Ok(Self {
            discord_token,
            channel_id,
            alert,
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid value for {key}: {raw:?}")),
        _ => Ok(None),
    }
}
