//! Ordered groupings of events
//!
//! Groups keep first-appearance order of their keys and input order of their
//! members, so every detector iterating them is deterministic.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::entities::SwapEvent;
use crate::values::BlockNumber;

/// Group items by key, keys in order of first appearance
pub fn group_ordered<'a, T, K, F>(items: impl IntoIterator<Item = &'a T>, key: F) -> Vec<(K, Vec<&'a T>)>
where
    T: 'a,
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a T>)> = Vec::new();

    for item in items {
        let k = key(item);
        match slots.get(&k) {
            Some(&slot) => groups[slot].1.push(item),
            None => {
                slots.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }

    groups
}

/// Events per wallet, wallets in first-appearance order
pub fn by_wallet(events: &[SwapEvent]) -> Vec<(String, Vec<&SwapEvent>)> {
    group_ordered(events, |e| e.wallet_address.clone())
}

/// Events per block, ascending block number
pub fn by_block(events: &[SwapEvent]) -> BTreeMap<BlockNumber, Vec<&SwapEvent>> {
    let mut blocks: BTreeMap<BlockNumber, Vec<&SwapEvent>> = BTreeMap::new();
    for event in events {
        blocks.entry(event.block_number).or_default().push(event);
    }
    blocks
}

/// Count of distinct values, preserving nothing but the count
pub fn count_unique<'a, I>(values: I) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: Vec<&str> = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen.len()
}

/// Distinct values in order of first appearance
pub fn unique_ordered<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}
