//! Plain-text and JSON rendering of analysis results

use chainwatch_detectors::SandwichReport;
use chainwatch_risk_engine::ThreatAssessment;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt::Write;

use crate::analysis::Analysis;
use crate::config::ReportLimits;
use crate::error::RunnerResult;
use crate::pool::PoolAnalysis;
use crate::token::TokenAnalysis;
use crate::wallet::WalletAnalysis;

const RULE: &str = "============================================================";

pub fn render_json(analysis: &Analysis) -> RunnerResult<String> {
    Ok(serde_json::to_string_pretty(analysis)?)
}

pub fn render_text(analysis: &Analysis, limits: &ReportLimits) -> String {
    let mut out = String::new();
    match analysis {
        Analysis::Token(a) => token(&mut out, a, limits),
        Analysis::Sandwich(r) => sandwich(&mut out, r, limits),
        Analysis::Pool(a) => pool(&mut out, a, limits),
        Analysis::Wallet(a) => wallet(&mut out, a, limits),
        Analysis::Threat(a) => threat(&mut out, a),
    }
    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{RULE}\n{title}\n{RULE}");
}

fn percent(ratio: Decimal) -> Decimal {
    (ratio * dec!(100)).round_dp(1)
}

fn token(out: &mut String, a: &TokenAnalysis, limits: &ReportLimits) {
    section(out, "TRANSACTION ANOMALY DETECTION");
    let _ = writeln!(out, "Total Transactions Analyzed: {}", a.total_transactions);
    let _ = writeln!(out, "\nOVERALL RISK SCORE: {:.1}/100", a.risk_score);
    let _ = writeln!(out, "RISK LEVEL: {}", a.risk_level);

    section(out, "WASH TRADING DETECTION");
    let wash = &a.wash_trading;
    let _ = writeln!(out, "Suspicious Wallets: {}", wash.suspicious_wallets);
    let _ = writeln!(out, "Total Suspicious Volume: ${:.2}", wash.total_suspicious_volume);
    let _ = writeln!(out, "{}", wash.note);
    for w in wash.top_suspicious(limits.top_wallets) {
        let _ = writeln!(
            out,
            "  {} | round trips: {} | same-block: {} | volume: ${:.2}",
            w.wallet, w.round_trips, w.same_block_trades, w.total_volume
        );
    }

    section(out, "PRICE MANIPULATION DETECTION");
    let price = &a.price_manipulation;
    let _ = writeln!(out, "Total Events: {}", price.total_events);
    let _ = writeln!(out, "Manipulation Events: {}", price.manipulation_events.len());
    let _ = writeln!(out, "Coordinated Trading Events: {}", price.coordinated_trading.len());
    let _ = writeln!(out, "Highest Price Spike: {:.1}%", percent(price.highest_spike));
    for e in price.manipulation_events.iter().take(limits.max_events) {
        let _ = writeln!(
            out,
            "  block {} | {} | change {:.1}% | volume x{:.1} | ${:.2}",
            e.block,
            e.wallet,
            percent(e.price_change),
            e.volume_spike,
            e.value_usd
        );
    }

    section(out, "PUMP & DUMP DETECTION");
    let pump = &a.pump_dump;
    if pump.insufficient_data {
        let _ = writeln!(out, "Insufficient data for pump & dump analysis");
    }
    let _ = writeln!(out, "Detected Schemes: {}", pump.num_schemes);
    let _ = writeln!(out, "High Confidence Schemes: {}", pump.high_confidence);
    for s in pump.schemes.iter().take(limits.max_schemes) {
        let _ = writeln!(
            out,
            "  {} | pump +{:.1}% | dump -{:.1}% | {} wallets | confidence {:.2}",
            s.pump_time.format("%Y-%m-%d %H:%M"),
            percent(s.pump_increase),
            percent(s.dump_decrease),
            s.dump_wallets,
            s.confidence
        );
    }

    section(out, "ACTIVITY PROFILE");
    let activity = &a.activity;
    let _ = writeln!(out, "Institutional Trades: {}", activity.institutional_trades);
    let _ = writeln!(out, "High Value Trades: {}", activity.high_value_trades);
    let _ = writeln!(out, "High Frequency Actors: {}", activity.high_frequency_actors);
    let _ = writeln!(out, "Anomalous Wallets: {}", activity.anomalous_wallets);
}

fn sandwich(out: &mut String, r: &SandwichReport, limits: &ReportLimits) {
    section(out, "SANDWICH ATTACK DETECTION");
    let _ = writeln!(out, "Transactions Analyzed: {}", r.total_transactions);
    let _ = writeln!(out, "Blocks Analyzed: {}", r.unique_blocks);
    if r.is_clean() {
        let _ = writeln!(out, "\nNo sandwich attacks detected");
        return;
    }

    let _ = writeln!(out, "Attacks Detected: {}", r.attacks.len());
    let _ = writeln!(out, "Blocks With Attacks: {}", r.blocks_with_attacks);
    let _ = writeln!(out, "Total Attacker Profit: ${:.2}", r.total_profit);
    let _ = writeln!(out, "Average Profit: ${:.2}", r.average_profit);
    let _ = writeln!(out, "Unique Attackers: {}", r.unique_attackers);
    let _ = writeln!(out, "Unique Victims: {}", r.unique_victims);
    if let Some(best) = r.most_profitable() {
        let _ = writeln!(
            out,
            "Most Profitable: {} in block {} (${:.2})",
            best.attacker, best.block, best.profit_usd
        );
    }

    for attack in r.attacks.iter().take(limits.max_events) {
        let _ = writeln!(
            out,
            "  block {} | {} | attacker {} -> victim {} | profit ${:.2}",
            attack.block, attack.pair_label, attack.attacker, attack.victim, attack.profit_usd
        );
    }
}

fn pool(out: &mut String, a: &PoolAnalysis, limits: &ReportLimits) {
    section(out, &format!("LIQUIDITY POOL ANALYSIS: {}", a.pair_label));
    let _ = writeln!(out, "Transactions Analyzed: {}", a.total_transactions);

    section(out, "LIQUIDITY MANIPULATION");
    if a.manipulation.is_empty() {
        let _ = writeln!(out, "No liquidity manipulation detected");
    }
    for e in a.manipulation.iter().take(limits.max_events) {
        let _ = writeln!(
            out,
            "  [{}] {} | risk {:.1} | {}",
            e.severity,
            e.kind.as_str(),
            e.risk_score,
            e.description
        );
    }

    section(out, "CONCENTRATED LIQUIDITY ATTACKS");
    if a.concentrated_attacks.is_empty() {
        let _ = writeln!(out, "No concentrated attacks detected");
    }
    for attack in a.concentrated_attacks.iter().take(limits.max_events) {
        let _ = writeln!(
            out,
            "  {} | {} | block {} | impact {:.1}% | confidence {:.0}",
            attack.kind.as_str(),
            attack.attacker,
            attack.block,
            attack.price_impact,
            attack.confidence
        );
    }

    section(out, "POOL DOMINATION");
    for d in a.dominations.iter().take(limits.top_wallets) {
        let _ = writeln!(
            out,
            "  [{}] {} | {:.1}% | {} | likelihood {}%",
            d.risk_level,
            d.dominant_wallet,
            d.domination_percentage,
            d.pattern.as_str(),
            d.manipulation_likelihood
        );
    }
    let _ = writeln!(out, "{}", a.message);
}

fn wallet(out: &mut String, a: &WalletAnalysis, limits: &ReportLimits) {
    let subject = a.wallet.as_deref().unwrap_or("all wallets");
    section(out, &format!("WALLET BEHAVIOR ANALYSIS: {subject}"));
    let _ = writeln!(out, "Transactions Analyzed: {}", a.total_transactions);

    section(out, "INSIDER TRADING");
    if a.insider_trades.is_empty() {
        let _ = writeln!(out, "No suspicious insider positions");
    }
    for t in a.insider_trades.iter().take(limits.max_events) {
        let _ = writeln!(
            out,
            "  {} | {:.1}% | entered {} ago | score {:.0}",
            t.token_symbol,
            t.price_change_pct.round_dp(1),
            t.time_since_entry,
            t.suspicion_score
        );
        if !t.flags.is_empty() {
            let _ = writeln!(out, "    {}", t.flags.join(", "));
        }
    }

    section(out, "SNIPING BOT");
    if a.sniping.is_empty() {
        let _ = writeln!(out, "Insufficient buy history for a sniping profile");
    }
    for p in a.sniping.iter().take(limits.top_wallets) {
        let _ = writeln!(out, "Wallet: {}", p.wallet);
        let _ = writeln!(out, "  Classification: {}", p.classification.as_str());
        let _ = writeln!(out, "  Bot Confidence: {:.0}%", p.bot_confidence);
        let _ = writeln!(out, "  Total Snipes: {}", p.total_snipes);
        let _ = writeln!(out, "  Success Rate: {:.1}%", p.success_rate);
        let _ = writeln!(out, "  Average Entry Speed: {:.1}", p.avg_entry_speed);
        let _ = writeln!(out, "  Unique Tokens: {}", p.unique_tokens);
    }
}

fn threat(out: &mut String, a: &ThreatAssessment) {
    section(out, &format!("THREAT ASSESSMENT: {}", a.address));
    let _ = writeln!(out, "Token: {} ({})", a.token_name, a.token_symbol);
    let _ = writeln!(out, "\nModule Scores:");
    for (name, module) in &a.risk_modules {
        let _ = writeln!(out, "- {:<15} | score: {:6.2} | label: {}", name, module.score, module.label);
    }
    let _ = writeln!(
        out,
        "\nOverall Risk: {:.2} -> {}",
        a.overall_risk_score, a.overall_risk_level
    );
    let _ = writeln!(out, "\nTop Risk Contributors:");
    for c in &a.top_risk_contributors {
        let _ = writeln!(out, "  {:<15} -> {:.2}", c.module, c.score);
    }
}
