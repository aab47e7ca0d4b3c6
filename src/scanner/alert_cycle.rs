//! The alert cycle and the periodic scheduler that drives it.
//!
//! One tick: resolve the channel, discover pairs, skip already-alerted
//! addresses, run the liquidity-lock check, enrich passing candidates with
//! momentum data, deliver the alert and record the address as seen.
//!
//! Ticks never overlap and candidates are processed one at a time, in
//! discovery order. A delivery failure ends the tick: later candidates are
//! left for the next tick and the failed one is not marked seen.

use crate::scanner::alpha::enrich;
use crate::scanner::data_sources::{LiquidityRiskSource, PairDiscovery, TransferHistorySource};
use crate::scanner::errors::{CycleError, DeliveryError};
use crate::scanner::notifier::AlertSink;
use crate::scanner::render::render_alert;
use crate::scanner::safety::check_safety;
use crate::scanner::types::{AlertConfig, CycleReport, SeenSet, PLACEHOLDER_AGE};
use chrono::Local;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument};

/// One discovery → check → enrich → deliver pass over its collaborators.
pub struct AlertCycle {
    discovery: Arc<dyn PairDiscovery>,
    risk: Arc<dyn LiquidityRiskSource>,
    transfers: Arc<dyn TransferHistorySource>,
    sink: Arc<dyn AlertSink>,
    config: AlertConfig,
}

impl AlertCycle {
    pub fn new(
        discovery: Arc<dyn PairDiscovery>,
        risk: Arc<dyn LiquidityRiskSource>,
        transfers: Arc<dyn TransferHistorySource>,
        sink: Arc<dyn AlertSink>,
        config: AlertConfig,
    ) -> Self {
        Self {
            discovery,
            risk,
            transfers,
            sink,
            config,
        }
    }

    /// Run a single tick against `seen`.
    ///
    /// Returns early with an error when the channel is missing, discovery
    /// fails, or a delivery fails. Addresses delivered before a delivery
    /// failure stay recorded in `seen`.
    #[instrument(skip_all, fields(seen = seen.len()))]
    pub async fn run_cycle(&self, seen: &mut SeenSet) -> Result<CycleReport, CycleError> {
        self.bounded(self.sink.resolve_channel())
            .await
            .map_err(CycleError::Channel)?;

        let candidates = self
            .discovery
            .discover_pairs()
            .await
            .map_err(CycleError::Discovery)?;

        let mut report = CycleReport {
            discovered: candidates.len(),
            ..CycleReport::default()
        };

        for candidate in candidates {
            if seen.contains(&candidate.address) {
                report.skipped_seen += 1;
                continue;
            }

            let verdict = check_safety(self.risk.as_ref(), &candidate.address).await;
            if !verdict.passed {
                debug!("Skipping {}: {}", candidate.symbol, verdict.reason);
                report.rejected += 1;
                continue;
            }

            let alpha = enrich(
                self.transfers.as_ref(),
                &candidate.address,
                self.config.momentum_threshold,
            )
            .await;

            let message = render_alert(
                &candidate,
                &alpha,
                &verdict,
                PLACEHOLDER_AGE,
                &self.config.pair_page_url,
            );

            self.bounded(self.sink.deliver(&message))
                .await
                .map_err(|source| CycleError::Delivery {
                    symbol: candidate.symbol.clone(),
                    source,
                })?;

            info!(
                "✅ Alert sent for {} (price {})",
                candidate.symbol,
                candidate.price_display()
            );
            seen.insert(candidate.address);
            report.delivered += 1;
        }

        Ok(report)
    }

    /// Sink calls get the same time limit as the HTTP data sources.
    async fn bounded<F>(&self, call: F) -> Result<(), DeliveryError>
    where
        F: Future<Output = Result<(), DeliveryError>>,
    {
        let limit = self.config.http_timeout();
        tokio::time::timeout(limit, call)
            .await
            .unwrap_or(Err(DeliveryError::Timeout(limit)))
    }
}

/// Owns the seen-set and runs the cycle on a fixed period.
pub struct AlertScanner {
    cycle: AlertCycle,
    interval: Duration,
    seen: SeenSet,
}

impl AlertScanner {
    pub fn new(cycle: AlertCycle, interval: Duration) -> Self {
        Self {
            cycle,
            interval,
            seen: SeenSet::new(),
        }
    }

    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    /// Run one tick now, logging its outcome.
    pub async fn tick(&mut self) -> Result<CycleReport, CycleError> {
        info!(
            "{} - Scanning for new halal tokens...",
            Local::now().format("%H:%M:%S")
        );

        let result = self.cycle.run_cycle(&mut self.seen).await;
        match &result {
            Ok(report) => info!(
                discovered = report.discovered,
                skipped_seen = report.skipped_seen,
                rejected = report.rejected,
                delivered = report.delivered,
                seen_total = self.seen.len(),
                "Scan complete"
            ),
            Err(e) => error!("Error in alert loop: {}", e),
        }
        result
    }

    /// Tick immediately, then every interval, until `shutdown` resolves.
    /// Returns the seen-set accumulated over the run.
    pub async fn run<F>(mut self, shutdown: F) -> SeenSet
    where
        F: Future<Output = ()>,
    {
        info!(
            "Alert scanner running. Scanning every {} seconds.",
            self.interval.as_secs()
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested. Stopping alert scanner.");
                    break;
                }
                _ = interval.tick() => {
                    // Faults are logged inside tick(); the next tick is the only recovery.
                    let _ = self.tick().await;
                }
            }
        }

        self.seen
    }
}
