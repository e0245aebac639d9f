use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustTier {
    CriticalRisk,
    HighRisk,
    ModerateRisk,
    Trusted,
    HighlyTrusted,
}

impl TrustTier {
    pub const fn from_score(score: u8) -> Self {
        match score {
            85.. => TrustTier::HighlyTrusted,
            70.. => TrustTier::Trusted,
            50.. => TrustTier::ModerateRisk,
            30.. => TrustTier::HighRisk,
            _ => TrustTier::CriticalRisk,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            TrustTier::HighlyTrusted => "Highly Trusted",
            TrustTier::Trusted => "Trusted",
            TrustTier::ModerateRisk => "Moderate Risk",
            TrustTier::HighRisk => "High Risk",
            TrustTier::CriticalRisk => "Critical Risk",
        }
    }
}

impl fmt::Display for TrustTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One-line verdict shown after a scan completes.
pub fn summary_for_score(score: u8) -> &'static str {
    if score > 70 {
        "This contract appears to be trustworthy"
    } else if score > 40 {
        "This contract has some potential issues"
    } else {
        "This contract has significant trust issues"
    }
}
