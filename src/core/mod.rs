mod address;
mod report;
mod result;
mod tier;

pub use address::{check_address, validate_address};
pub use report::Report;
pub use result::{AuditStatus, ScanResult, ScanSource};
pub use tier::{TrustTier, summary_for_score};
