//! Sandwich attack detection
//!
//! Within one block, an attacker buys, a victim trades the same pair, and the
//! attacker sells. Transaction index is the only ordering used; block
//! timestamps are identical for every trade of a block.

use chainwatch_core::grouping::{by_block, count_unique, group_ordered};
use chainwatch_core::{BlockNumber, SwapEvent, Timestamp, Usd};
use chainwatch_ports::Detector;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fewest trades a block can hold and still contain a sandwich
const MIN_BLOCK_TRADES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SandwichAttack {
    pub attacker: String,
    pub victim: String,
    pub block: BlockNumber,
    pub front_run: SwapEvent,
    pub victim_tx: SwapEvent,
    pub back_run: SwapEvent,
    /// `back_run` value minus `front_run` value; may be negative
    pub profit_usd: Usd,
    pub pair_label: String,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SandwichReport {
    pub attacks: Vec<SandwichAttack>,
    pub total_transactions: usize,
    pub unique_blocks: usize,
    pub blocks_with_attacks: usize,
    pub total_profit: Usd,
    pub average_profit: Usd,
    pub unique_attackers: usize,
    pub unique_victims: usize,
}

impl SandwichReport {
    /// First attack with the highest profit
    pub fn most_profitable(&self) -> Option<&SandwichAttack> {
        self.attacks.iter().fold(None, |best: Option<&SandwichAttack>, attack| match best {
            Some(current) if current.profit_usd >= attack.profit_usd => Some(current),
            _ => Some(attack),
        })
    }

    pub fn is_clean(&self) -> bool {
        self.attacks.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SandwichDetector;

impl SandwichDetector {
    pub fn new() -> Self {
        Self
    }

    /// Attacks in one block whose trades are sorted by transaction index
    fn detect_in_block(&self, trades: &[&SwapEvent]) -> Vec<SandwichAttack> {
        let mut attacks = Vec::new();

        for (attacker, attacker_trades) in by_wallet_refs(trades) {
            if attacker_trades.len() < 2 {
                continue;
            }

            for pair in attacker_trades.windows(2) {
                let (front, back) = (pair[0], pair[1]);
                if !(front.is_buy() && back.is_sell() && front.pair_address == back.pair_address) {
                    continue;
                }

                let victims = trades.iter().copied().filter(|t| {
                    t.wallet_address != attacker
                        && t.pair_address == front.pair_address
                        && t.transaction_index > front.transaction_index
                        && t.transaction_index < back.transaction_index
                });

                for victim in victims {
                    attacks.push(SandwichAttack {
                        attacker: attacker.clone(),
                        victim: victim.wallet_address.clone(),
                        block: front.block_number,
                        front_run: front.clone(),
                        victim_tx: victim.clone(),
                        back_run: back.clone(),
                        profit_usd: back.total_value_usd - front.total_value_usd,
                        pair_label: front.pair_label.clone(),
                        timestamp: front.block_timestamp,
                    });
                }
            }
        }

        attacks
    }
}

fn by_wallet_refs<'a>(trades: &[&'a SwapEvent]) -> Vec<(String, Vec<&'a SwapEvent>)> {
    group_ordered(trades.iter().copied(), |e: &SwapEvent| e.wallet_address.clone())
}

impl Detector for SandwichDetector {
    type Report = SandwichReport;

    fn name(&self) -> &str {
        "sandwich_attack"
    }

    fn detect(&self, events: &[SwapEvent]) -> SandwichReport {
        let blocks = by_block(events);
        let unique_blocks = blocks.len();
        let mut attacks = Vec::new();
        let mut blocks_with_attacks = 0;

        // Newest block first
        for (block, mut trades) in blocks.into_iter().rev() {
            if trades.len() < MIN_BLOCK_TRADES {
                continue;
            }
            trades.sort_by_key(|t| t.transaction_index);

            let found = self.detect_in_block(&trades);
            if !found.is_empty() {
                debug!("Block {}: {} sandwich attacks", block, found.len());
                blocks_with_attacks += 1;
                attacks.extend(found);
            }
        }

        let total_profit: Usd = attacks.iter().map(|a| a.profit_usd).sum();
        let average_profit = if attacks.is_empty() {
            Decimal::ZERO
        } else {
            total_profit / Decimal::from(attacks.len())
        };

        SandwichReport {
            total_transactions: events.len(),
            unique_blocks,
            blocks_with_attacks,
            total_profit,
            average_profit,
            unique_attackers: count_unique(attacks.iter().map(|a| a.attacker.as_str())),
            unique_victims: count_unique(attacks.iter().map(|a| a.victim.as_str())),
            attacks,
        }
    }
}
