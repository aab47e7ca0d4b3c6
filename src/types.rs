//! Core types shared across the Stratos alert scanner.

use serde::{Deserialize, Serialize};

/// Chain-specific token address, kept as its base58/hex text form.
pub type Pubkey = String;

/// A newly listed trading pair returned by the discovery API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairCandidate {
    /// Base token symbol
    pub symbol: String,
    /// Base token address, the unique key for deduplication
    pub address: Pubkey,
    /// Quote price in USD, if the pair reported one
    pub price_usd: Option<f64>,
    /// Pool liquidity in USD (zero when unreported)
    pub liquidity_usd: f64,
    /// Price times total supply, zero when either is unknown
    pub market_cap_usd: f64,
}

impl PairCandidate {
    /// Price formatted to six decimals, `$0.00` when absent.
    pub fn price_display(&self) -> String {
        match self.price_usd {
            Some(price) if price.is_finite() => format!("${:.6}", price),
            _ => "$0.00".to_string(),
        }
    }
}
