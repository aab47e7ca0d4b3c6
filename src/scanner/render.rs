//! Rendering of alert notifications.
//!
//! [`AlertMessage`] is a platform-neutral embed; the Discord sink converts it
//! into a serenity embed at delivery time.

use crate::scanner::types::{AlphaSignal, SafetyVerdict};
use crate::types::PairCandidate;

pub const ALERT_TITLE: &str = "🕋 Stratos Halal Alpha Alert";
pub const ALERT_FOOTER: &str = "Stratos.ai - Clean Alpha";
pub const ALERT_COLOUR: u32 = 0x00ff00;

pub const MOMENTUM_FIELD: &str = "🚀 Momentum";
pub const LIQUIDITY_FIELD: &str = "💧 Liquidity";
pub const MARKET_CAP_FIELD: &str = "📊 Market Cap";
pub const AGE_FIELD: &str = "⏰ Age";
pub const COMPLIANCE_FIELD: &str = "✅ Halal Certified";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// A fully rendered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub title: String,
    pub description: String,
    pub url: String,
    pub colour: u32,
    pub fields: Vec<EmbedField>,
    pub footer: String,
}

impl AlertMessage {
    pub fn field(&self, name: &str) -> Option<&EmbedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    fn push_field(&mut self, name: &str, value: String, inline: bool) {
        self.fields.push(EmbedField {
            name: name.to_string(),
            value,
            inline,
        });
    }
}

/// Build the alert for a candidate that passed the safety check.
pub fn render_alert(
    candidate: &PairCandidate,
    alpha: &AlphaSignal,
    verdict: &SafetyVerdict,
    age: &str,
    pair_page_url: &str,
) -> AlertMessage {
    let mut message = AlertMessage {
        title: ALERT_TITLE.to_string(),
        description: format!(
            "**${}** is up **{}** in {}.",
            candidate.symbol, alpha.price_change, age
        ),
        url: format!(
            "{}/{}",
            pair_page_url.trim_end_matches('/'),
            candidate.address
        ),
        colour: ALERT_COLOUR,
        fields: Vec::with_capacity(5),
        footer: ALERT_FOOTER.to_string(),
    };

    if let Some(wallet) = &alpha.wallet {
        message.push_field(
            MOMENTUM_FIELD,
            format!(
                "First large buy ({} SOL) from alpha wallet `{}`.",
                format_amount(alpha.buy_amount),
                shorten(wallet, 4, 4)
            ),
            false,
        );
    }

    message.push_field(
        LIQUIDITY_FIELD,
        format!("**{}** locked", format_usd_compact(candidate.liquidity_usd)),
        true,
    );
    message.push_field(
        MARKET_CAP_FIELD,
        format!("**{}**", format_usd_compact(candidate.market_cap_usd)),
        true,
    );
    message.push_field(AGE_FIELD, age.to_string(), true);
    message.push_field(COMPLIANCE_FIELD, verdict.reason.clone(), false);

    message
}

/// `$N.NK` for values of at least 1000, otherwise `$N`, both thousands-grouped.
pub fn format_usd_compact(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    if value >= 1000.0 {
        format!("${}K", group_thousands(value / 1000.0, 1))
    } else {
        format!("${}", group_thousands(value, 0))
    }
}

/// Format with `decimals` places and comma-separated thousands.
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value);
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Shortest round-trip decimal, always with a fractional part (`3.0`, `7.25`).
/// Below 1e-4 and from 1e16 up, scientific with a signed two-digit exponent
/// (`1e+16`, `1.5e-05`).
pub fn format_amount(value: f64) -> String {
    // Debug picks the same notation thresholds; only the exponent differs.
    let repr = format!("{value:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => repr,
    }
}

/// Keep the first `head` and last `tail` characters around an ellipsis.
pub fn shorten(address: &str, head: usize, tail: usize) -> String {
    let chars: Vec<char> = address.chars().collect();
    let prefix: String = chars.iter().take(head).collect();
    let suffix: String = chars[chars.len().saturating_sub(tail)..].iter().collect();
    format!("{prefix}...{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::types::PLACEHOLDER_AGE;

    fn candidate() -> PairCandidate {
        PairCandidate {
            symbol: "ABC".to_string(),
            address: "0xAAAA1111".to_string(),
            price_usd: Some(0.001234),
            liquidity_usd: 45_000.0,
            market_cap_usd: 1_234_000.0,
        }
    }

    #[test]
    fn test_format_usd_compact() {
        assert_eq!(format_usd_compact(2_500_000.0), "$2,500.0K");
        assert_eq!(format_usd_compact(500.0), "$500");
        assert_eq!(format_usd_compact(45_000.0), "$45.0K");
        assert_eq!(format_usd_compact(1000.0), "$1.0K");
        assert_eq!(format_usd_compact(0.0), "$0");
        assert_eq!(format_usd_compact(f64::NAN), "$0");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(1_234_567.0, 0), "1,234,567");
        assert_eq!(group_thousands(1234.56, 1), "1,234.6");
        assert_eq!(group_thousands(-9876.0, 0), "-9,876");
        assert_eq!(group_thousands(12.0, 0), "12");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(3.0), "3.0");
        assert_eq!(format_amount(7.25), "7.25");
        assert_eq!(format_amount(1234.5), "1234.5");
        assert_eq!(format_amount(1e16), "1e+16");
        assert_eq!(format_amount(2.5e20), "2.5e+20");
        assert_eq!(format_amount(1.5e-5), "1.5e-05");
        assert_eq!(format_amount(1e-100), "1e-100");
    }

    #[test]
    fn test_shorten() {
        assert_eq!(shorten("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU", 4, 4), "7xKX...gAsU");
        assert_eq!(shorten("abc", 4, 4), "abc...abc");
    }

    #[test]
    fn test_render_without_momentum() {
        let message = render_alert(
            &candidate(),
            &AlphaSignal::default(),
            &SafetyVerdict::pass(),
            PLACEHOLDER_AGE,
            "https://dexscreener.com/solana/",
        );

        assert_eq!(message.title, ALERT_TITLE);
        assert_eq!(message.description, "**$ABC** is up **+0%** in 5 minutes.");
        assert_eq!(message.url, "https://dexscreener.com/solana/0xAAAA1111");
        assert!(message.field(MOMENTUM_FIELD).is_none());
        assert_eq!(message.field(LIQUIDITY_FIELD).unwrap().value, "**$45.0K** locked");
        assert_eq!(message.field(MARKET_CAP_FIELD).unwrap().value, "**$1,234.0K**");
        assert_eq!(message.field(AGE_FIELD).unwrap().value, "5 minutes");
        assert_eq!(
            message.field(COMPLIANCE_FIELD).unwrap().value,
            "LP Burned. Mint Renounced. No haram associations."
        );
        assert_eq!(message.fields.len(), 4);
    }

    #[test]
    fn test_render_with_momentum() {
        let alpha = AlphaSignal {
            wallet: Some("9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM".to_string()),
            buy_amount: 3.0,
            price_change: "+1,250%".to_string(),
        };

        let message = render_alert(
            &candidate(),
            &alpha,
            &SafetyVerdict::pass(),
            PLACEHOLDER_AGE,
            "https://dexscreener.com/solana",
        );

        let momentum = message.field(MOMENTUM_FIELD).unwrap();
        assert_eq!(
            momentum.value,
            "First large buy (3.0 SOL) from alpha wallet `9WzD...AWWM`."
        );
        assert!(!momentum.inline);
        assert_eq!(message.fields[0].name, MOMENTUM_FIELD);
        assert_eq!(message.description, "**$ABC** is up **+1,250%** in 5 minutes.");
    }
}
