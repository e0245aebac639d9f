use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Verified,
    Unverified,
    Issues,
}

impl AuditStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            AuditStatus::Verified => "verified",
            AuditStatus::Unverified => "unverified",
            AuditStatus::Issues => "issues",
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanSource {
    Provider,
    Fallback,
}

impl ScanSource {
    pub const fn as_str(self) -> &'static str {
        match self {
            ScanSource::Provider => "provider",
            ScanSource::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub address: String,
    pub score: u8,
    pub verified_source: bool,
    pub audit_status: AuditStatus,
    pub risk_factors: Vec<String>,
    pub positive_factors: Vec<String>,
    pub recommendation: String,
    pub source: ScanSource,
}
