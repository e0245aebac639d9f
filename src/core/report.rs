use crate::core::{ScanResult, TrustTier};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub schema_version: String,
    pub tool_version: String,
    pub generated_at: String,
    pub chain_id: u64,
    pub tier: TrustTier,
    pub summary: String,
    pub result: ScanResult,
    pub notes: Vec<String>,
}
