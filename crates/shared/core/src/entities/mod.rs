mod severity;
mod sub_category;
mod swap_event;
mod transaction_type;

pub use severity::{RiskLevel, Severity};
pub use sub_category::SubCategory;
pub use swap_event::{SwapEvent, TokenAmount};
pub use transaction_type::TransactionType;
