use serde::{Deserialize, Serialize};

/// Provider classification of a swap within the wallet's position history
///
/// Only `newPosition` and `sellAll` drive detection logic; every other
/// provider value is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SubCategory {
    /// First buy of a token by this wallet
    NewPosition,
    /// Wallet exited its entire position
    SellAll,
    /// Any other provider tag (e.g. `accumulation`, `partialSell`)
    Other(String),
    /// Field absent or empty
    #[default]
    None,
}

impl SubCategory {
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim() {
            "" => SubCategory::None,
            "newPosition" => SubCategory::NewPosition,
            "sellAll" => SubCategory::SellAll,
            other => SubCategory::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SubCategory::NewPosition => "newPosition",
            SubCategory::SellAll => "sellAll",
            SubCategory::Other(raw) => raw,
            SubCategory::None => "",
        }
    }

    pub fn is_new_position(&self) -> bool {
        matches!(self, SubCategory::NewPosition)
    }

    pub fn is_sell_all(&self) -> bool {
        matches!(self, SubCategory::SellAll)
    }
}
