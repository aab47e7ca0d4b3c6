//! Stratos - new-pair alert scanner for Solana DEX listings
//!
//! Polls a DEX aggregator for newly listed pairs, gates each one on a
//! liquidity-lock check, enriches survivors with early-buyer momentum and
//! posts an embed to a Discord channel.

pub mod types;
pub mod scanner;
pub mod config;
pub mod discord;

// Re-export main types for convenience
pub use config::Settings;
pub use scanner::{AlertScanner, ScannerBuilder};
pub use types::{PairCandidate, Pubkey};
