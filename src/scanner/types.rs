//! Core types and configuration for the alert cycle.

use crate::types::Pubkey;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Reason attached to a candidate that passed the liquidity-lock check.
pub const PASS_REASON: &str = "LP Burned. Mint Renounced. No haram associations.";
/// Reason attached when the risk API reports unlocked liquidity.
pub const NOT_LOCKED_REASON: &str = "Liquidity not locked - POTENTIAL RUG";
/// Reason attached when the risk API could not be consulted.
pub const UNVERIFIED_REASON: &str = "Failed to verify LP lock";

/// Placeholder change shown when a qualifying buy was found.
pub const ALPHA_PRICE_CHANGE: &str = "+1,250%";
/// Change shown when no qualifying buy was found.
pub const NO_PRICE_CHANGE: &str = "+0%";
/// Token age is not computed yet; every alert carries this value.
pub const PLACEHOLDER_AGE: &str = "5 minutes";

/// Scanner configuration. Every tunable of the alert cycle lives here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Seconds between ticks
    pub scan_interval_seconds: u64,
    /// Search query sent to the discovery API
    pub discovery_query: String,
    /// `limit` parameter sent to the discovery API
    pub discovery_limit: usize,
    /// How many discovered pairs are considered per tick
    pub max_candidates: usize,
    /// `limit` parameter sent to the transfer-history API
    pub transfer_limit: usize,
    /// Minimum increase amount for a transfer to count as an alpha buy
    pub momentum_threshold: f64,
    /// Timeout applied to every outbound HTTP call
    pub http_timeout_seconds: u64,
    /// Outbound request budget shared by all data sources
    pub requests_per_second: u32,
    /// DexScreener API base URL
    pub dexscreener_api_url: String,
    /// RugCheck API base URL
    pub rugcheck_api_url: String,
    /// Solscan public API base URL
    pub solscan_api_url: String,
    /// Public pair page prefix used for the alert link
    pub pair_page_url: String,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            scan_interval_seconds: 600,
            discovery_query: "raydium".to_string(),
            discovery_limit: 20,
            max_candidates: 10,
            transfer_limit: 10,
            momentum_threshold: 2.0,
            http_timeout_seconds: 15,
            requests_per_second: 5,
            dexscreener_api_url: "https://api.dexscreener.com".to_string(),
            rugcheck_api_url: "https://api.rugcheck.xyz".to_string(),
            solscan_api_url: "https://public-api.solscan.io".to_string(),
            pair_page_url: "https://dexscreener.com/solana".to_string(),
        }
    }
}

impl AlertConfig {
    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_seconds)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_seconds)
    }
}

/// Outcome of the liquidity-lock check for one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyVerdict {
    pub passed: bool,
    pub reason: String,
}

impl SafetyVerdict {
    pub fn pass() -> Self {
        Self {
            passed: true,
            reason: PASS_REASON.to_string(),
        }
    }

    pub fn fail(reason: &str) -> Self {
        Self {
            passed: false,
            reason: reason.to_string(),
        }
    }
}

/// Notable early buy attached to an alert.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaSignal {
    /// Buyer wallet, `None` when no qualifying transfer was found
    pub wallet: Option<Pubkey>,
    /// Buy size in SOL
    pub buy_amount: f64,
    /// Display string for the price move
    pub price_change: String,
}

impl Default for AlphaSignal {
    fn default() -> Self {
        Self {
            wallet: None,
            buy_amount: 0.0,
            price_change: NO_PRICE_CHANGE.to_string(),
        }
    }
}

/// Addresses that have already been alerted.
///
/// Grows for the lifetime of the process and is never pruned, so a token is
/// alerted at most once per run. Evicting entries would re-alert old tokens.
#[derive(Debug, Default, Clone)]
pub struct SeenSet {
    addresses: HashSet<Pubkey>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, address: &str) -> bool {
        self.addresses.contains(address)
    }

    /// Records an address, returning `false` if it was already present.
    pub fn insert(&mut self, address: impl Into<Pubkey>) -> bool {
        self.addresses.insert(address.into())
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

/// Per-tick counters, logged by the scheduler.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub discovered: usize,
    pub skipped_seen: usize,
    pub rejected: usize,
    pub delivered: usize,
}
