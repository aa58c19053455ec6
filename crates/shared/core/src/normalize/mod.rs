//! Raw provider records to canonical [`SwapEvent`]s
//!
//! Identity fields (hash, wallet, block, transaction type) are mandatory and
//! drop the record when absent. Every other field is parsed leniently: bad
//! values become zero and leave a [`FieldDiagnostic`] behind.

pub mod fields;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::entities::{SubCategory, SwapEvent, TokenAmount, TransactionType};
use crate::error::{NormalizeError, NormalizeResult};
pub use fields::{FieldIssue, Parsed};

/// A record that could not be normalized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedRecord {
    /// Position in the input batch
    pub index: usize,
    pub reason: String,
}

/// A field that was defaulted while normalizing a kept record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDiagnostic {
    pub index: usize,
    pub field: String,
    pub issue: FieldIssue,
}

/// Output of a batch normalization
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizedBatch {
    pub events: Vec<SwapEvent>,
    pub dropped: Vec<DroppedRecord>,
    pub diagnostics: Vec<FieldDiagnostic>,
}

impl NormalizedBatch {
    /// Number of input records seen
    pub fn total(&self) -> usize {
        self.events.len() + self.dropped.len()
    }

    /// True when there was input but nothing survived
    pub fn is_total_loss(&self) -> bool {
        self.events.is_empty() && !self.dropped.is_empty()
    }
}

/// Stateless record normalizer
#[derive(Debug, Clone, Copy, Default)]
pub struct EventNormalizer;

impl EventNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize one record, discarding field diagnostics
    pub fn normalize(&self, raw: &Value) -> NormalizeResult<SwapEvent> {
        self.normalize_record(raw).map(|(event, _)| event)
    }

    /// Normalize one record, returning the fields that had to be defaulted
    pub fn normalize_record(&self, raw: &Value) -> NormalizeResult<(SwapEvent, Vec<(String, FieldIssue)>)> {
        let record = raw.as_object().ok_or(NormalizeError::NotAnObject)?;
        let mut issues = Vec::new();

        let hash = required_text(record, "transactionHash")?;
        let wallet = required_text(record, "walletAddress")?;

        let block = fields::unsigned(record.get("blockNumber"));
        if !block.is_ok() {
            return Err(NormalizeError::MissingField { field: "blockNumber" });
        }

        let tx_type = match record.get("transactionType") {
            None | Some(Value::Null) => {
                return Err(NormalizeError::MissingField {
                    field: "transactionType",
                });
            }
            Some(value) => {
                let raw_type = fields::text(Some(value));
                TransactionType::from_raw(&raw_type)
                    .ok_or(NormalizeError::UnknownTransactionType(raw_type))?
            }
        };

        let index = take(&mut issues, "transactionIndex", fields::unsigned(record.get("transactionIndex")));
        let timestamp = take(&mut issues, "blockTimestamp", fields::timestamp(record.get("blockTimestamp")));
        let value_usd = take(&mut issues, "totalValueUsd", fields::decimal(record.get("totalValueUsd")));
        let price = take(&mut issues, "baseQuotePrice", fields::decimal(record.get("baseQuotePrice")));

        let bought = token_amount(record, "bought", "baseTokenAmount", &mut issues);
        let sold = token_amount(record, "sold", "quoteTokenAmount", &mut issues);

        let sub_category = SubCategory::from_raw(&fields::text(record.get("subCategory")));

        let event = SwapEvent::new(hash, tx_type, block.value, wallet)
            .with_index(index)
            .with_timestamp(timestamp)
            .with_pair(
                fields::text(record.get("pairAddress")),
                fields::text(record.get("pairLabel")),
            )
            .with_tokens(
                fields::text(record.get("baseToken")),
                fields::text(record.get("quoteToken")),
            )
            .with_amounts(bought, sold)
            .with_value(value_usd)
            .with_price(price)
            .with_sub_category(sub_category);

        Ok((event, issues))
    }

    /// Normalize a batch, dropping bad records instead of failing
    pub fn normalize_batch(&self, records: &[Value]) -> NormalizedBatch {
        let mut batch = NormalizedBatch::default();

        for (index, raw) in records.iter().enumerate() {
            match self.normalize_record(raw) {
                Ok((event, issues)) => {
                    for (field, issue) in issues {
                        debug!("Record {} field {} defaulted: {:?}", index, field, issue);
                        batch.diagnostics.push(FieldDiagnostic { index, field, issue });
                    }
                    batch.events.push(event);
                }
                Err(err) => {
                    warn!("Dropping record {}: {}", index, err);
                    batch.dropped.push(DroppedRecord {
                        index,
                        reason: err.to_string(),
                    });
                }
            }
        }

        if batch.is_total_loss() {
            warn!("All {} records were rejected", batch.dropped.len());
        } else {
            debug!(
                "Normalized {} events ({} dropped, {} field diagnostics)",
                batch.events.len(),
                batch.dropped.len(),
                batch.diagnostics.len()
            );
        }

        batch
    }

    /// Normalize a provider response: a bare array or `{ "result": [...] }`
    pub fn normalize_response(&self, response: &Value) -> NormalizedBatch {
        match response {
            Value::Array(records) => self.normalize_batch(records),
            Value::Object(map) => match map.get("result") {
                Some(Value::Array(records)) => {
                    let inherited = inherit_pair_fields(map, records);
                    self.normalize_batch(&inherited)
                }
                // A single record object
                _ => self.normalize_batch(std::slice::from_ref(response)),
            },
            other => self.normalize_batch(std::slice::from_ref(other)),
        }
    }
}

/// Pair-level fields some responses carry once at the top level
const PAIR_FIELDS: [&str; 4] = ["pairAddress", "pairLabel", "baseToken", "quoteToken"];

/// Copy top-level pair fields into records that lack them
fn inherit_pair_fields(response: &Map<String, Value>, records: &[Value]) -> Vec<Value> {
    records
        .iter()
        .map(|record| {
            let mut record = record.clone();
            if let Value::Object(fields) = &mut record {
                for key in PAIR_FIELDS {
                    if let Some(value) = response.get(key)
                        && !fields.contains_key(key)
                    {
                        fields.insert(key.to_string(), value.clone());
                    }
                }
            }
            record
        })
        .collect()
}

fn required_text(record: &Map<String, Value>, field: &'static str) -> NormalizeResult<String> {
    let value = fields::text(record.get(field));
    if value.is_empty() {
        return Err(NormalizeError::MissingField { field });
    }
    Ok(value)
}

fn take<T>(issues: &mut Vec<(String, FieldIssue)>, field: &str, parsed: Parsed<T>) -> T {
    if let Some(issue) = parsed.issue {
        issues.push((field.to_string(), issue));
    }
    parsed.value
}

fn token_amount(
    record: &Map<String, Value>,
    side: &str,
    fallback: &str,
    issues: &mut Vec<(String, FieldIssue)>,
) -> TokenAmount {
    match record.get(side) {
        Some(Value::Object(inner)) => {
            let amount = take(issues, &format!("{side}.amount"), fields::decimal(inner.get("amount")));
            TokenAmount::new(amount, fields::text(inner.get("symbol")))
        }
        _ => match record.get(fallback) {
            Some(value) if !value.is_null() => {
                let amount = take(issues, fallback, fields::decimal(Some(value)));
                TokenAmount::new(amount, String::new())
            }
            _ => TokenAmount::default(),
        },
    }
}
