//! Extraction of scoring inputs from a risk-flags document
//!
//! The document shape is `{ issues: [{ tags: [{ key }] }], details: { ... } }`.
//! Missing or unparsable members read as zero / false; extraction never fails.

use chainwatch_core::normalize::fields;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Rank assumed when the document carries none
pub const UNRANKED: u64 = 9999;

/// Scoring inputs pulled from one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFlags {
    /// Every `issues[].tags[].key` seen
    pub tags: BTreeSet<String>,
    pub access_control: bool,
    pub buy_tax_percentage: Decimal,
    pub is_blacklisted: bool,
    pub is_trusted: bool,
    pub locked_liquidity_percent: Decimal,
    pub creator_percent: Decimal,
    pub top10_holder_percent: Decimal,
    pub price_change_7d: Decimal,
    pub ath_change: Decimal,
    pub atl_change: Decimal,
    pub market_cap_rank: u64,
}

impl Default for RiskFlags {
    fn default() -> Self {
        Self {
            tags: BTreeSet::new(),
            access_control: false,
            buy_tax_percentage: Decimal::ZERO,
            is_blacklisted: false,
            is_trusted: false,
            locked_liquidity_percent: Decimal::ZERO,
            creator_percent: Decimal::ZERO,
            top10_holder_percent: Decimal::ZERO,
            price_change_7d: Decimal::ZERO,
            ath_change: Decimal::ZERO,
            atl_change: Decimal::ZERO,
            market_cap_rank: UNRANKED,
        }
    }
}

impl RiskFlags {
    pub fn from_value(doc: &Value) -> Self {
        let tags = issue_tags(doc);
        let details = doc.get("details");
        let token_risk = details.and_then(|d| d.get("token_risk"));
        let market = details.and_then(|d| d.get("marketData"));
        let ownership = market.and_then(|m| m.get("ownershipDistribution"));

        let member = |parent: Option<&Value>, key: &str| -> Decimal {
            fields::decimal(parent.and_then(|p| p.get(key))).value
        };

        let is_blacklisted = tags.contains("is_blacklisted")
            || fields::flag(token_risk.and_then(|t| t.get("is_blacklisted")));

        let rank = member(market, "market_cap_rank").trunc().to_u64().unwrap_or(0);

        let flags = Self {
            access_control: fields::flag(token_risk.and_then(|t| t.get("access_control"))),
            buy_tax_percentage: member(token_risk, "buy_tax_percentage"),
            is_blacklisted,
            is_trusted: fields::flag(token_risk.and_then(|t| t.get("is_trusted"))),
            locked_liquidity_percent: member(details, "lockedLiquidityPercent"),
            creator_percent: member(details, "creator_percent"),
            top10_holder_percent: member(ownership, "percentageHeldByTop10"),
            price_change_7d: member(market, "price_change_percentage_7d"),
            ath_change: member(market, "ath_change_percentage"),
            atl_change: member(market, "atl_change_percentage"),
            market_cap_rank: if rank == 0 { UNRANKED } else { rank },
            tags,
        };

        log::debug!("Extracted {} issue tags from risk document", flags.tags.len());
        flags
    }

    pub fn has(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

fn issue_tags(doc: &Value) -> BTreeSet<String> {
    doc.get("issues")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|issue| issue.get("tags").and_then(Value::as_array))
        .flatten()
        .filter_map(|tag| tag.get("key").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

/// Display metadata for the assessed token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub market_cap: Option<Decimal>,
    pub current_price: Option<Decimal>,
}

impl TokenMetadata {
    pub fn from_value(doc: &Value) -> Self {
        let details = doc.get("details");
        let sources = [
            details.and_then(|d| d.get("token_metadata_risk")),
            details.and_then(|d| d.get("marketData")),
            details.and_then(|d| d.get("token_risk")),
            Some(doc),
        ];
        let first_text = |key: &str| {
            sources
                .iter()
                .map(|source| fields::text(source.and_then(|s| s.get(key))))
                .find(|s| !s.is_empty())
        };

        let market = details.and_then(|d| d.get("marketData"));
        let optional = |key: &str| {
            let parsed = fields::decimal(market.and_then(|m| m.get(key)));
            parsed.is_ok().then_some(parsed.value)
        };

        Self {
            name: first_text("name").unwrap_or_else(|| "Unknown Token".to_string()),
            symbol: first_text("symbol").unwrap_or_else(|| "N/A".to_string()),
            market_cap: optional("market_cap"),
            current_price: optional("current_price"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_empty_document_defaults() {
        let flags = RiskFlags::from_value(&json!({}));
        assert!(flags.tags.is_empty());
        assert_eq!(flags.market_cap_rank, UNRANKED);
        assert_eq!(flags.buy_tax_percentage, Decimal::ZERO);
        assert!(!flags.is_blacklisted);
    }

    #[test]
    fn test_tags_and_details() {
        let doc = json!({
            "issues": [
                {"tags": [{"key": "is_proxy"}, {"key": "hacker"}]},
                {"tags": [{"key": "unlocked-liquidity"}, {"name": "no key"}]}
            ],
            "details": {
                "token_risk": {"access_control": true, "buy_tax_percentage": "5.5", "is_trusted": false},
                "marketData": {
                    "price_change_percentage_7d": -12.5,
                    "market_cap_rank": 150,
                    "ownershipDistribution": {"percentageHeldByTop10": 42}
                },
                "lockedLiquidityPercent": 80,
                "creator_percent": 3
            }
        });

        let flags = RiskFlags::from_value(&doc);
        assert_eq!(flags.tags.len(), 3);
        assert!(flags.has("is_proxy"));
        assert!(flags.has("unlocked-liquidity"));
        assert!(flags.access_control);
        assert_eq!(flags.buy_tax_percentage, dec!(5.5));
        assert_eq!(flags.price_change_7d, dec!(-12.5));
        assert_eq!(flags.market_cap_rank, 150);
        assert_eq!(flags.top10_holder_percent, dec!(42));
        assert_eq!(flags.locked_liquidity_percent, dec!(80));
        assert_eq!(flags.creator_percent, dec!(3));
    }

    #[test]
    fn test_blacklist_from_tag_or_detail() {
        let by_tag = json!({"issues": [{"tags": [{"key": "is_blacklisted"}]}]});
        let by_detail = json!({"details": {"token_risk": {"is_blacklisted": true}}});
        assert!(RiskFlags::from_value(&by_tag).is_blacklisted);
        assert!(RiskFlags::from_value(&by_detail).is_blacklisted);
    }

    #[test]
    fn test_zero_rank_is_unranked() {
        let doc = json!({"details": {"marketData": {"market_cap_rank": 0}}});
        assert_eq!(RiskFlags::from_value(&doc).market_cap_rank, UNRANKED);
    }

    #[test]
    fn test_metadata_fallback_chain() {
        let doc = json!({
            "details": {
                "token_metadata_risk": {"name": ""},
                "marketData": {"name": "Pepe", "market_cap": 1000000},
                "token_risk": {"symbol": "PEPE"}
            }
        });
        let meta = TokenMetadata::from_value(&doc);
        assert_eq!(meta.name, "Pepe");
        assert_eq!(meta.symbol, "PEPE");
        assert_eq!(meta.market_cap, Some(dec!(1000000)));
        assert_eq!(meta.current_price, None);

        let bare = TokenMetadata::from_value(&json!({}));
        assert_eq!(bare.name, "Unknown Token");
        assert_eq!(bare.symbol, "N/A");
    }
}
