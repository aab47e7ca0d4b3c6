//! Liquidity-lock safety check.
//!
//! A single signal gates every alert: the risk API must answer and must report
//! the liquidity as locked. No scoring, keyword screening or authority checks
//! are performed.

use crate::scanner::data_sources::{LiquidityReport, LiquidityRiskSource};
use crate::scanner::errors::SourceError;
use crate::scanner::types::{SafetyVerdict, NOT_LOCKED_REASON, UNVERIFIED_REASON};
use tracing::{debug, warn};

/// Map the outcome of a risk lookup to a verdict.
pub fn evaluate_liquidity(report: Result<LiquidityReport, SourceError>) -> SafetyVerdict {
    match report {
        Ok(report) if report.liquidity_locked => SafetyVerdict::pass(),
        Ok(_) => SafetyVerdict::fail(NOT_LOCKED_REASON),
        Err(e) => {
            warn!(transient = e.is_transient(), "Liquidity check failed: {}", e);
            SafetyVerdict::fail(UNVERIFIED_REASON)
        }
    }
}

/// Query the risk source for `address` and evaluate the answer.
pub async fn check_safety(risk: &dyn LiquidityRiskSource, address: &str) -> SafetyVerdict {
    let verdict = evaluate_liquidity(risk.liquidity_report(address).await);
    debug!(address, passed = verdict.passed, "Safety verdict: {}", verdict.reason);
    verdict
}
