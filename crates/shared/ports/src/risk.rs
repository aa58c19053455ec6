use rust_decimal::Decimal;

/// Port for an independently scored risk dimension
///
/// Implementations compute their score once at construction; both methods are
/// pure reads.
pub trait RiskFactor {
    /// Module name used as the key in score documents
    fn name(&self) -> &'static str;

    /// Weighted percentage score in [0, 100]
    fn score(&self) -> Decimal;

    /// Human-readable explanation of the score
    fn explain(&self) -> String;
}
