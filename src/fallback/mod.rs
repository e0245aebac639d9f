//! Deterministic stand-in used when the scoring provider cannot answer.
//!
//! The score is derived from a sine hash of the address text, so the same
//! address always yields the same result. It is not an analysis and not a
//! source of randomness.

use std::time::Duration;

use tracing::debug;

use crate::core::{AuditStatus, ScanResult, ScanSource};

pub const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

pub const RISK_CANDIDATES: [&str; 9] = [
    "Unverified source code",
    "No formal security audit",
    "Centralized admin controls",
    "Known reentrancy vulnerabilities",
    "Uses deprecated Solidity patterns",
    "Contains self-destruct capability",
    "Unlimited token approvals",
    "High gas usage patterns",
    "Proxy implementation with storage conflicts",
];

pub const POSITIVE_CANDIDATES: [&str; 9] = [
    "Verified source code",
    "Multiple security audits",
    "Time-locked admin functions",
    "No centralized control mechanisms",
    "Uses recent Solidity version",
    "Implementation follows EIP standards",
    "Low complexity code",
    "Community-reviewed",
    "Transparent upgradeability pattern",
];

pub const RECOMMENDATION_SECURE: &str = "This contract appears to be well-constructed and secure. Standard precautions are advised but no specific concerns were identified.";
pub const RECOMMENDATION_MINOR: &str = "This contract is generally trustworthy, but consider reviewing the identified minor concerns before engaging with high-value transactions.";
pub const RECOMMENDATION_CAUTION: &str = "Exercise caution when interacting with this contract. Consider consulting with a security expert before proceeding with significant transactions.";
pub const RECOMMENDATION_SIGNIFICANT: &str = "This contract has significant security concerns. We recommend avoiding interactions unless you fully understand the associated risks.";
pub const RECOMMENDATION_CRITICAL: &str = "This contract has critical security issues. We strongly advise against any interaction with this contract.";

/// Sum of the character codes of the lower-cased address.
pub fn seed_of(address: &str) -> u64 {
    address
        .to_lowercase()
        .encode_utf16()
        .map(u64::from)
        .sum()
}

/// Sine hash mapped into `[min, max]`. Depends only on `seed` and `floor(min)`.
pub fn pseudo_random(seed: u64, min: f64, max: f64) -> i64 {
    let rnd = (seed as f64 * (min.floor() + 1.0)).sin() * 10000.0;
    let frac = rnd - rnd.floor();
    ((frac * (max - min + 1.0)).floor() + min) as i64
}

pub fn score_for(address: &str) -> u8 {
    pseudo_random(seed_of(address), 0.0, 100.0).clamp(0, 100) as u8
}

pub fn risk_count(score: u8) -> usize {
    if score < 85 {
        usize::from((100 - score) / 15)
    } else {
        0
    }
}

pub fn positive_count(score: u8) -> usize {
    usize::from(score / 15)
}

pub fn audit_status_for(score: u8) -> AuditStatus {
    if score >= 70 {
        AuditStatus::Verified
    } else if score < 40 {
        AuditStatus::Issues
    } else {
        AuditStatus::Unverified
    }
}

pub fn recommendation_for(score: u8) -> &'static str {
    match score {
        85.. => RECOMMENDATION_SECURE,
        70.. => RECOMMENDATION_MINOR,
        50.. => RECOMMENDATION_CAUTION,
        30.. => RECOMMENDATION_SIGNIFICANT,
        _ => RECOMMENDATION_CRITICAL,
    }
}

/// Pure part of the fallback: same address, same result.
pub fn synthesize(address: &str) -> ScanResult {
    let score = score_for(address);

    ScanResult {
        address: address.to_string(),
        score,
        verified_source: score > 50,
        audit_status: audit_status_for(score),
        risk_factors: take_prefix(&RISK_CANDIDATES, risk_count(score)),
        positive_factors: take_prefix(&POSITIVE_CANDIDATES, positive_count(score)),
        recommendation: recommendation_for(score).to_string(),
        source: ScanSource::Fallback,
    }
}

pub async fn alternative_scan_contract(address: &str, delay: Duration) -> ScanResult {
    debug!(address, delay_ms = delay.as_millis() as u64, "fallback scan");
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    synthesize(address)
}

fn take_prefix(candidates: &[&str], n: usize) -> Vec<String> {
    candidates
        .iter()
        .take(n)
        .map(|s| (*s).to_string())
        .collect()
}
