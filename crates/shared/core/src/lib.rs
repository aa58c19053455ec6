//! Chainwatch Core Domain
//!
//! Pure domain types for the Chainwatch detection engine.
//! This crate contains no async, no I/O, and is 100% unit testable.
//!
//! - **Entities**: the canonical [`SwapEvent`] and the small enums shared by findings
//! - **Normalize**: turns raw provider records into `SwapEvent`s, never failing on bad numbers
//! - **Grouping**: ordered wallet/block/pair groupings used by every detector
//! - **Window**: trailing-window aggregation

pub mod entities;
pub mod error;
pub mod grouping;
pub mod normalize;
pub mod values;
pub mod window;

// Re-export commonly used types at crate root
pub use entities::{RiskLevel, Severity, SubCategory, SwapEvent, TokenAmount, TransactionType};
pub use error::{NormalizeError, NormalizeResult};
pub use normalize::{DroppedRecord, EventNormalizer, FieldDiagnostic, NormalizedBatch};
pub use values::{Address, BlockNumber, Price, Timestamp, Usd};
