//! Scanner module - periodic new-pair alert cycle.
//!
//! Discovery, risk and transfer-history lookups sit behind traits in
//! [`data_sources`]; delivery sits behind [`AlertSink`]. [`ScannerBuilder`]
//! wires them together, defaulting to the HTTP clients.

pub mod types;
pub mod errors;
pub mod data_sources;
pub mod rate_limit;
pub mod safety;
pub mod alpha;
pub mod render;
pub mod notifier;
pub mod alert_cycle;

// Re-export main types
pub use alert_cycle::{AlertCycle, AlertScanner};
pub use data_sources::{
    ApiClient, DexScreenerClient, LiquidityReport, LiquidityRiskSource, PairDiscovery,
    RugCheckClient, SolscanClient, TransferHistorySource, TransferRecord,
};
pub use errors::{CycleError, DeliveryError, SourceError};
pub use notifier::AlertSink;
pub use render::{AlertMessage, EmbedField};
pub use types::{AlertConfig, AlphaSignal, CycleReport, SafetyVerdict, SeenSet};

use anyhow::{bail, Result};
use std::sync::Arc;

/// Scanner builder with defaults taken from [`AlertConfig::default`].
pub struct ScannerBuilder {
    config: AlertConfig,
    discovery: Option<Arc<dyn PairDiscovery>>,
    risk: Option<Arc<dyn LiquidityRiskSource>>,
    transfers: Option<Arc<dyn TransferHistorySource>>,
    sink: Option<Arc<dyn AlertSink>>,
}

impl ScannerBuilder {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self::with_config(AlertConfig::default())
    }

    /// Start from an existing configuration.
    pub fn with_config(config: AlertConfig) -> Self {
        Self {
            config,
            discovery: None,
            risk: None,
            transfers: None,
            sink: None,
        }
    }

    /// Set the period between ticks.
    pub fn with_scan_interval(mut self, seconds: u64) -> Self {
        self.config.scan_interval_seconds = seconds;
        self
    }

    /// Set how many discovered pairs are considered per tick.
    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.config.max_candidates = max_candidates;
        self
    }

    /// Set the minimum buy size for the momentum line.
    pub fn with_momentum_threshold(mut self, threshold: f64) -> Self {
        self.config.momentum_threshold = threshold;
        self
    }

    /// Set the per-call HTTP timeout.
    pub fn with_http_timeout(mut self, seconds: u64) -> Self {
        self.config.http_timeout_seconds = seconds;
        self
    }

    /// Set outbound rate limiting.
    pub fn with_rate_limit(mut self, requests_per_second: u32) -> Self {
        self.config.requests_per_second = requests_per_second;
        self
    }

    /// Set the discovery search query.
    pub fn with_discovery_query(mut self, query: impl Into<String>) -> Self {
        self.config.discovery_query = query.into();
        self
    }

    pub fn with_discovery(mut self, discovery: Arc<dyn PairDiscovery>) -> Self {
        self.discovery = Some(discovery);
        self
    }

    pub fn with_risk_source(mut self, risk: Arc<dyn LiquidityRiskSource>) -> Self {
        self.risk = Some(risk);
        self
    }

    pub fn with_transfer_source(mut self, transfers: Arc<dyn TransferHistorySource>) -> Self {
        self.transfers = Some(transfers);
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build the scanner configuration.
    pub fn build_config(self) -> AlertConfig {
        self.config
    }

    /// Build the scanner. Sources left unset use the HTTP clients; a sink is required.
    pub fn build(self) -> Result<AlertScanner> {
        if self.config.scan_interval_seconds == 0 {
            bail!("scan interval must be at least one second");
        }
        let Some(sink) = self.sink else {
            bail!("an alert sink is required");
        };

        let api = ApiClient::from_config(&self.config);
        let discovery: Arc<dyn PairDiscovery> = match self.discovery {
            Some(discovery) => discovery,
            None => Arc::new(DexScreenerClient::new(api.clone(), &self.config)),
        };
        let risk: Arc<dyn LiquidityRiskSource> = match self.risk {
            Some(risk) => risk,
            None => Arc::new(RugCheckClient::new(api.clone(), &self.config)),
        };
        let transfers: Arc<dyn TransferHistorySource> = match self.transfers {
            Some(transfers) => transfers,
            None => Arc::new(SolscanClient::new(api, &self.config)),
        };

        let interval = self.config.scan_interval();
        let cycle = AlertCycle::new(discovery, risk, transfers, sink, self.config);
        Ok(AlertScanner::new(cycle, interval))
    }
}

impl Default for ScannerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
