//! Best-effort momentum enrichment from recent transfers.

use crate::scanner::data_sources::{TransferHistorySource, TransferRecord};
use crate::scanner::types::{AlphaSignal, ALPHA_PRICE_CHANGE};
use tracing::{debug, instrument};

/// First increase larger than `threshold`, in the order the API returned them.
pub fn find_alpha(transfers: &[TransferRecord], threshold: f64) -> AlphaSignal {
    transfers
        .iter()
        .find(|tx| tx.is_increase() && tx.change_amount.unwrap_or(0.0) > threshold)
        .map(|tx| AlphaSignal {
            wallet: Some(tx.address.clone()),
            buy_amount: tx.change_amount.unwrap_or(0.0),
            price_change: ALPHA_PRICE_CHANGE.to_string(),
        })
        .unwrap_or_default()
}

/// Look up recent transfers for `address`. Any fault yields the sentinel signal.
#[instrument(skip(transfers))]
pub async fn enrich(
    transfers: &dyn TransferHistorySource,
    address: &str,
    threshold: f64,
) -> AlphaSignal {
    match transfers.recent_transfers(address).await {
        Ok(records) => find_alpha(&records, threshold),
        Err(e) => {
            debug!("Transfer history unavailable, alerting without momentum: {}", e);
            AlphaSignal::default()
        }
    }
}
