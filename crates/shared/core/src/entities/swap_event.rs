use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{SubCategory, TransactionType};
use crate::values::{Address, BlockNumber, Price, Timestamp, Usd};

/// Amount of a token moved by one side of a swap
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenAmount {
    /// Always non-negative
    pub amount: Decimal,
    pub symbol: String,
}

impl TokenAmount {
    pub fn new(amount: Decimal, symbol: impl Into<String>) -> Self {
        Self {
            amount: amount.abs(),
            symbol: symbol.into(),
        }
    }
}

/// Canonical swap event
///
/// Built once by the normalizer (or the `with_*` builders in tests) and never
/// mutated afterwards. Within a block, `transaction_index` is the only valid
/// ordering key; timestamps are identical for every event of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapEvent {
    pub transaction_hash: String,
    pub transaction_index: u64,
    pub transaction_type: TransactionType,
    pub block_number: BlockNumber,
    pub block_timestamp: Timestamp,
    /// Lower-cased
    pub wallet_address: Address,
    pub pair_address: Address,
    pub pair_label: String,
    pub base_token: Address,
    pub quote_token: Address,
    pub bought: TokenAmount,
    pub sold: TokenAmount,
    pub total_value_usd: Usd,
    pub base_quote_price: Price,
    pub sub_category: SubCategory,
}

impl SwapEvent {
    /// Create an event with the identity fields set and everything else zeroed
    pub fn new(
        transaction_hash: impl Into<String>,
        transaction_type: TransactionType,
        block_number: BlockNumber,
        wallet_address: impl AsRef<str>,
    ) -> Self {
        Self {
            transaction_hash: transaction_hash.into(),
            transaction_index: 0,
            transaction_type,
            block_number,
            block_timestamp: DateTime::<Utc>::UNIX_EPOCH,
            wallet_address: wallet_address.as_ref().to_lowercase(),
            pair_address: String::new(),
            pair_label: String::new(),
            base_token: String::new(),
            quote_token: String::new(),
            bought: TokenAmount::default(),
            sold: TokenAmount::default(),
            total_value_usd: Decimal::ZERO,
            base_quote_price: Decimal::ZERO,
            sub_category: SubCategory::None,
        }
    }

    pub fn with_index(mut self, transaction_index: u64) -> Self {
        self.transaction_index = transaction_index;
        self
    }

    pub fn with_timestamp(mut self, block_timestamp: Timestamp) -> Self {
        self.block_timestamp = block_timestamp;
        self
    }

    pub fn with_pair(mut self, pair_address: impl Into<String>, pair_label: impl Into<String>) -> Self {
        self.pair_address = pair_address.into();
        self.pair_label = pair_label.into();
        self
    }

    pub fn with_tokens(mut self, base_token: impl Into<String>, quote_token: impl Into<String>) -> Self {
        self.base_token = base_token.into();
        self.quote_token = quote_token.into();
        self
    }

    pub fn with_amounts(mut self, bought: TokenAmount, sold: TokenAmount) -> Self {
        self.bought = bought;
        self.sold = sold;
        self
    }

    pub fn with_value(mut self, total_value_usd: Usd) -> Self {
        self.total_value_usd = total_value_usd;
        self
    }

    pub fn with_price(mut self, base_quote_price: Price) -> Self {
        self.base_quote_price = base_quote_price;
        self
    }

    pub fn with_sub_category(mut self, sub_category: SubCategory) -> Self {
        self.sub_category = sub_category;
        self
    }

    pub fn is_buy(&self) -> bool {
        self.transaction_type == TransactionType::Buy
    }

    pub fn is_sell(&self) -> bool {
        self.transaction_type == TransactionType::Sell
    }

    /// Same wallet, same pair
    pub fn same_actor_and_pair(&self, other: &SwapEvent) -> bool {
        self.wallet_address == other.wallet_address && self.pair_address == other.pair_address
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_wallet_is_lowercased() {
        let event = SwapEvent::new("0xabc", TransactionType::Buy, 1, "0xAbCdEf");
        assert_eq!(event.wallet_address, "0xabcdef");
    }

    #[test]
    fn test_token_amount_is_non_negative() {
        let amount = TokenAmount::new(dec!(-12.5), "WETH");
        assert_eq!(amount.amount, dec!(12.5));
    }

    #[test]
    fn test_builders() {
        let event = SwapEvent::new("0x1", TransactionType::Sell, 10, "0xa")
            .with_index(3)
            .with_pair("0xpair", "PEPE/WETH")
            .with_value(dec!(100))
            .with_price(dec!(0.5));

        assert!(event.is_sell());
        assert!(!event.is_buy());
        assert_eq!(event.transaction_index, 3);
        assert_eq!(event.pair_label, "PEPE/WETH");
        assert_eq!(event.total_value_usd, dec!(100));
    }
}
