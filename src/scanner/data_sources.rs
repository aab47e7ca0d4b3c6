//! Data sources for pair discovery, liquidity-risk data and transfer history.
//!
//! Each upstream API sits behind a small trait so the alert cycle can be
//! driven by in-memory fakes. The reqwest implementations share one
//! [`ApiClient`], which applies the request pacer and a per-call timeout.

use crate::scanner::errors::SourceError;
use crate::scanner::rate_limit::RequestPacer;
use crate::scanner::types::AlertConfig;
use crate::types::{PairCandidate, Pubkey};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Discovers newly listed pairs.
#[async_trait]
pub trait PairDiscovery: Send + Sync {
    /// Returns the first candidates of the listing, in listing order.
    async fn discover_pairs(&self) -> Result<Vec<PairCandidate>, SourceError>;
}

/// Reports whether a token's liquidity is locked.
#[async_trait]
pub trait LiquidityRiskSource: Send + Sync {
    async fn liquidity_report(&self, address: &str) -> Result<LiquidityReport, SourceError>;
}

/// Lists recent token transfers for a token.
#[async_trait]
pub trait TransferHistorySource: Send + Sync {
    async fn recent_transfers(&self, address: &str) -> Result<Vec<TransferRecord>, SourceError>;
}

/// Liquidity-risk data for a single token.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityReport {
    #[serde(default, deserialize_with = "null_as_false")]
    pub liquidity_locked: bool,
}

/// One balance change from the transfer-history API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    /// Wallet whose balance changed
    pub address: Pubkey,
    /// `inc` for a balance increase, `dec` for a decrease
    #[serde(default)]
    pub change_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub change_amount: Option<f64>,
}

impl TransferRecord {
    pub fn is_increase(&self) -> bool {
        self.change_type.as_deref() == Some("inc")
    }
}

// --- Wire formats ---

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    pairs: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPair {
    base_token: RawBaseToken,
    #[serde(default, deserialize_with = "lenient_f64")]
    price_usd: Option<f64>,
    #[serde(default)]
    liquidity: Option<RawLiquidity>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBaseToken {
    symbol: String,
    address: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    total_supply: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawLiquidity {
    #[serde(default, deserialize_with = "lenient_f64")]
    usd: Option<f64>,
}

impl From<RawPair> for PairCandidate {
    fn from(pair: RawPair) -> Self {
        let market_cap_usd = match (pair.price_usd, pair.base_token.total_supply) {
            (Some(price), Some(supply)) => price * supply,
            _ => 0.0,
        };

        PairCandidate {
            symbol: pair.base_token.symbol,
            address: pair.base_token.address,
            price_usd: pair.price_usd,
            liquidity_usd: pair.liquidity.and_then(|l| l.usd).unwrap_or(0.0),
            market_cap_usd,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TransfersBody {
    List(Vec<Value>),
    Wrapped { data: Vec<Value> },
}

/// Accepts a JSON number, a numeric string, an empty string or null.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid number: {s:?}"))),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected number, found {other}"
        ))),
    }
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Decode a DexScreener search body, mapping only the first `max_candidates` pairs.
pub fn decode_pairs(body: &str, max_candidates: usize) -> Result<Vec<PairCandidate>, SourceError> {
    let response: SearchResponse = serde_json::from_str(body)?;

    response
        .pairs
        .unwrap_or_default()
        .into_iter()
        .take(max_candidates)
        .map(|pair| -> Result<PairCandidate, SourceError> {
            Ok(serde_json::from_value::<RawPair>(pair)?.into())
        })
        .collect()
}

pub fn decode_liquidity_report(body: &str) -> Result<LiquidityReport, SourceError> {
    Ok(serde_json::from_str(body)?)
}

/// Decode a transfer-history body, either a bare list or `{"data": [...]}`.
///
/// Records are decoded one by one and malformed ones are skipped, so a bad
/// record never hides the well-formed records around it.
pub fn decode_transfers(body: &str) -> Result<Vec<TransferRecord>, SourceError> {
    let raw = match serde_json::from_str::<TransfersBody>(body)? {
        TransfersBody::List(list) => list,
        TransfersBody::Wrapped { data } => data,
    };

    let transfers = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value::<TransferRecord>(record) {
            Ok(transfer) => Some(transfer),
            Err(e) => {
                debug!(index, "Skipping malformed transfer: {}", e);
                None
            }
        })
        .collect();
    Ok(transfers)
}

// --- HTTP implementations ---

/// Paced, time-bounded GET requests shared by the HTTP data sources.
#[derive(Clone)]
pub struct ApiClient {
    http_client: Client,
    pacer: Arc<RequestPacer>,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(http_client: Client, pacer: Arc<RequestPacer>, timeout: Duration) -> Self {
        Self {
            http_client,
            pacer,
            timeout,
        }
    }

    pub fn from_config(config: &AlertConfig) -> Self {
        Self::new(
            Client::new(),
            Arc::new(RequestPacer::new(config.requests_per_second)),
            config.http_timeout(),
        )
    }

    /// GET `url` and return the body of a successful response.
    async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String, SourceError> {
        self.pacer.acquire().await;

        let response = self
            .http_client
            .get(url)
            .query(query)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// DexScreener search endpoint.
pub struct DexScreenerClient {
    api: ApiClient,
    base_url: String,
    query: String,
    limit: usize,
    max_candidates: usize,
}

impl DexScreenerClient {
    pub fn new(api: ApiClient, config: &AlertConfig) -> Self {
        Self {
            api,
            base_url: config.dexscreener_api_url.clone(),
            query: config.discovery_query.clone(),
            limit: config.discovery_limit,
            max_candidates: config.max_candidates,
        }
    }
}

#[async_trait]
impl PairDiscovery for DexScreenerClient {
    #[instrument(skip(self), fields(query = %self.query))]
    async fn discover_pairs(&self) -> Result<Vec<PairCandidate>, SourceError> {
        let url = join_url(&self.base_url, "latest/dex/search/");
        let body = self
            .api
            .get_text(
                &url,
                &[("q", self.query.clone()), ("limit", self.limit.to_string())],
            )
            .await?;

        let candidates = decode_pairs(&body, self.max_candidates)?;
        debug!("Discovered {} candidate pairs", candidates.len());
        Ok(candidates)
    }
}

/// RugCheck project endpoint.
pub struct RugCheckClient {
    api: ApiClient,
    base_url: String,
}

impl RugCheckClient {
    pub fn new(api: ApiClient, config: &AlertConfig) -> Self {
        Self {
            api,
            base_url: config.rugcheck_api_url.clone(),
        }
    }
}

#[async_trait]
impl LiquidityRiskSource for RugCheckClient {
    #[instrument(skip(self))]
    async fn liquidity_report(&self, address: &str) -> Result<LiquidityReport, SourceError> {
        let url = join_url(&self.base_url, &format!("api/projects/{address}"));
        let body = self.api.get_text(&url, &[]).await?;
        decode_liquidity_report(&body)
    }
}

/// Solscan token transfer endpoint.
pub struct SolscanClient {
    api: ApiClient,
    base_url: String,
    limit: usize,
}

impl SolscanClient {
    pub fn new(api: ApiClient, config: &AlertConfig) -> Self {
        Self {
            api,
            base_url: config.solscan_api_url.clone(),
            limit: config.transfer_limit,
        }
    }
}

#[async_trait]
impl TransferHistorySource for SolscanClient {
    #[instrument(skip(self))]
    async fn recent_transfers(&self, address: &str) -> Result<Vec<TransferRecord>, SourceError> {
        let url = join_url(&self.base_url, "token/transfers");
        let body = self
            .api
            .get_text(
                &url,
                &[
                    ("tokenAddress", address.to_string()),
                    ("limit", self.limit.to_string()),
                ],
            )
            .await?;

        let transfers = decode_transfers(&body)?;
        debug!("Fetched {} transfers", transfers.len());
        Ok(transfers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH_BODY: &str = r#"{
        "schemaVersion": "1.0.0",
        "pairs": [
            {
                "chainId": "solana",
                "baseToken": {"symbol": "ABC", "address": "0xAAAA1111", "totalSupply": "1000000000"},
                "priceUsd": "0.001234",
                "liquidity": {"usd": 45000}
            },
            {
                "baseToken": {"symbol": "NUL", "address": "NullLiquidity"},
                "priceUsd": null,
                "liquidity": null
            }
        ]
    }"#;

    #[test]
    fn test_decode_pairs_maps_fields() {
        let pairs = decode_pairs(SEARCH_BODY, 10).unwrap();

        assert_eq!(pairs.len(), 2);
        let abc = &pairs[0];
        assert_eq!(abc.symbol, "ABC");
        assert_eq!(abc.address, "0xAAAA1111");
        assert_eq!(abc.price_usd, Some(0.001234));
        assert_eq!(abc.liquidity_usd, 45000.0);
        assert!((abc.market_cap_usd - 1_234_000.0).abs() < 1e-3);
    }

    #[test]
    fn test_decode_pairs_missing_numbers_degrade_to_zero() {
        let pairs = decode_pairs(SEARCH_BODY, 10).unwrap();
        let nul = &pairs[1];

        assert_eq!(nul.price_usd, None);
        assert_eq!(nul.liquidity_usd, 0.0);
        assert_eq!(nul.market_cap_usd, 0.0);
        assert_eq!(nul.price_display(), "$0.00");
    }

    #[test]
    fn test_decode_pairs_takes_prefix_before_mapping() {
        // The malformed third entry lies beyond the cap and is never mapped.
        let body = r#"{"pairs": [
            {"baseToken": {"symbol": "A", "address": "a"}},
            {"baseToken": {"symbol": "B", "address": "b"}},
            {"broken": true}
        ]}"#;

        let pairs = decode_pairs(body, 2).unwrap();
        assert_eq!(pairs.len(), 2);
        assert!(decode_pairs(body, 3).is_err());
    }

    #[test]
    fn test_decode_pairs_without_pairs_is_empty() {
        assert!(decode_pairs(r#"{"pairs": null}"#, 10).unwrap().is_empty());
        assert!(decode_pairs("{}", 10).unwrap().is_empty());
        assert!(decode_pairs("not json", 10).is_err());
    }

    #[test]
    fn test_decode_liquidity_report() {
        assert!(decode_liquidity_report(r#"{"liquidityLocked": true}"#).unwrap().liquidity_locked);
        assert!(!decode_liquidity_report(r#"{"liquidityLocked": false}"#).unwrap().liquidity_locked);
        assert!(!decode_liquidity_report(r#"{"liquidityLocked": null}"#).unwrap().liquidity_locked);
        assert!(!decode_liquidity_report(r#"{"name": "x"}"#).unwrap().liquidity_locked);
    }

    #[test]
    fn test_decode_transfers_both_shapes() {
        let list = r#"[{"address": "W1", "changeType": "inc", "changeAmount": "3.5"}]"#;
        let wrapped = r#"{"data": [{"address": "W1", "changeType": "inc", "changeAmount": 3.5}], "total": 1}"#;

        let from_list = decode_transfers(list).unwrap();
        let from_wrapped = decode_transfers(wrapped).unwrap();

        assert_eq!(from_list, from_wrapped);
        assert!(from_list[0].is_increase());
        assert_eq!(from_list[0].change_amount, Some(3.5));
    }

    #[test]
    fn test_decode_transfers_skips_malformed_records() {
        let body = r#"[
            {"address": "W1", "changeType": "inc", "changeAmount": "lots"},
            {"address": "Whale1111111", "changeType": "inc", "changeAmount": 5},
            {"changeType": "dec", "changeAmount": 1}
        ]"#;

        let transfers = decode_transfers(body).unwrap();
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].address, "Whale1111111");
    }

    #[test]
    fn test_malformed_record_after_match_keeps_alpha() {
        let body = r#"[
            {"address": "Whale1111111", "changeType": "inc", "changeAmount": 5},
            {"changeType": "dec", "changeAmount": 1}
        ]"#;

        let alpha = crate::scanner::alpha::find_alpha(&decode_transfers(body).unwrap(), 2.0);
        assert_eq!(alpha.wallet.as_deref(), Some("Whale1111111"));
        assert_eq!(alpha.buy_amount, 5.0);
    }

    #[test]
    fn test_decode_transfers_rejects_non_list_body() {
        assert!(decode_transfers(r#"{"error": "rate limited"}"#).is_err());
        assert!(decode_transfers("not json").is_err());
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("https://api.rugcheck.xyz/", "/api/projects/abc"),
            "https://api.rugcheck.xyz/api/projects/abc"
        );
    }
}
