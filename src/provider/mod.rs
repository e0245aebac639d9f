mod error;
pub mod quill;

pub use error::{MAX_ERROR_BODY_CHARS, ProviderError};
pub use quill::{QuillCheckOptions, QuillCheckProvider};

use crate::core::ScanResult;

/// Remote source of token scores.
#[async_trait::async_trait]
pub trait ScoreProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_score(&self, address: &str) -> Result<ScanResult, ProviderError>;
}
