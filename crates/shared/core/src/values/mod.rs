use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Price value (base token quoted in the quote token) - uses Decimal for precision
pub type Price = Decimal;

/// USD value - uses Decimal for precision
pub type Usd = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Block height
pub type BlockNumber = u64;

/// On-chain address (wallets are always lower-cased by the normalizer)
pub type Address = String;
