//! Delivery seam for rendered alerts.

use crate::scanner::errors::DeliveryError;
use crate::scanner::render::AlertMessage;
use async_trait::async_trait;

/// Destination channel for alerts.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Confirm the configured channel exists. Called once per tick.
    async fn resolve_channel(&self) -> Result<(), DeliveryError>;

    /// Post one alert. No retry and no delivery acknowledgement.
    async fn deliver(&self, message: &AlertMessage) -> Result<(), DeliveryError>;
}
