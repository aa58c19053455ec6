//! Trailing-window aggregation

use rust_decimal::Decimal;
use std::collections::VecDeque;

/// Fixed-size trailing mean
///
/// Until the window fills, the mean covers whatever values exist.
#[derive(Debug, Clone)]
pub struct TrailingMean {
    size: usize,
    values: VecDeque<Decimal>,
    sum: Decimal,
}

impl TrailingMean {
    pub fn new(size: usize) -> Self {
        Self {
            size: size.max(1),
            values: VecDeque::with_capacity(size.max(1)),
            sum: Decimal::ZERO,
        }
    }

    /// Push a value and return the mean of the window including it
    pub fn push(&mut self, value: Decimal) -> Decimal {
        self.values.push_back(value);
        self.sum += value;
        if self.values.len() > self.size {
            if let Some(evicted) = self.values.pop_front() {
                self.sum -= evicted;
            }
        }
        self.mean()
    }

    pub fn mean(&self) -> Decimal {
        if self.values.is_empty() {
            return Decimal::ZERO;
        }
        self.sum / Decimal::from(self.values.len())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Arithmetic mean, zero for an empty slice
pub fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let count = Decimal::from(values.len());
    match values.iter().try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v)) {
        Some(sum) => sum / count,
        // sum out of range: scale each value down first
        None => values.iter().map(|v| *v / count).sum(),
    }
}

/// Population variance, zero for an empty slice
///
/// Saturates at `Decimal::MAX` when the squared deviations leave the
/// representable range.
pub fn population_variance(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let avg = mean(values);
    values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| {
            let deviation = v.checked_sub(avg)?;
            acc.checked_add(deviation.checked_mul(deviation)?)
        })
        .map_or(Decimal::MAX, |squares| squares / Decimal::from(values.len()))
}

/// Population variance divided by the squared mean
///
/// Values are scaled by their mean before squaring, so large magnitudes stay
/// in range. `None` unless the mean is positive.
pub fn relative_variance(values: &[Decimal]) -> Option<Decimal> {
    let avg = mean(values);
    if avg <= Decimal::ZERO {
        return None;
    }
    let scaled = values
        .iter()
        .map(|v| v.checked_div(avg))
        .collect::<Option<Vec<Decimal>>>()?;
    Some(population_variance(&scaled))
}
