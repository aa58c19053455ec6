use chainwatch_core::{EventNormalizer, NormalizedBatch, SwapEvent};
use log::warn;
use serde_json::Value;

use crate::error::{AnalysisError, AnalysisResult};

/// Port for batch detectors
///
/// A detector is a pure function over an immutable event batch: running it
/// twice on the same input yields the same report. Empty input yields the
/// detector's zero report, never an error.
pub trait Detector: Send + Sync {
    /// Report produced by one run
    type Report;

    /// Get the name of the detector
    fn name(&self) -> &str;

    /// Run the detector over a batch
    fn detect(&self, events: &[SwapEvent]) -> Self::Report;
}

/// Normalize a provider response, failing only when records were supplied
/// and none of them survived
pub fn normalize_events(response: &Value) -> AnalysisResult<NormalizedBatch> {
    let batch = EventNormalizer::new().normalize_response(response);
    if batch.is_total_loss() {
        warn!("Rejecting batch: {} records, none valid", batch.total());
        return Err(AnalysisError::NoValidEvents {
            total: batch.total(),
            dropped: batch.dropped.len(),
        });
    }
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_response_is_not_an_error() {
        let batch = normalize_events(&json!({ "result": [] })).unwrap();
        assert!(batch.events.is_empty());
    }

    #[test]
    fn test_all_rejected_is_an_error() {
        let err = normalize_events(&json!([{ "transactionType": "buy" }, 7])).unwrap_err();
        assert_eq!(err, AnalysisError::NoValidEvents { total: 2, dropped: 2 });
    }
}
