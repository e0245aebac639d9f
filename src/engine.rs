use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{info, warn};

use crate::core::{Report, ScanResult, TrustTier, summary_for_score};
use crate::provider::ScoreProvider;

#[derive(Debug, Clone)]
pub struct ScannerOptions {
    pub chain_id: u64,
    pub fallback_delay: Duration,
    pub show_progress: bool,
}

/// Resolves a score for an address: provider first, deterministic fallback otherwise.
#[derive(Clone)]
pub struct Scanner {
    opts: ScannerOptions,
    provider: Option<Arc<dyn ScoreProvider>>,
    skip_reason: Option<String>,
}

/// A result plus what happened on the way to it.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub result: ScanResult,
    pub notes: Vec<String>,
}

impl Scanner {
    pub fn new(opts: ScannerOptions, provider: Arc<dyn ScoreProvider>) -> Self {
        Self {
            opts,
            provider: Some(provider),
            skip_reason: None,
        }
    }

    /// A scanner that never calls out. `reason` is recorded on every report.
    pub fn offline(opts: ScannerOptions, reason: impl Into<String>) -> Self {
        Self {
            opts,
            provider: None,
            skip_reason: Some(reason.into()),
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.opts.chain_id
    }

    /// Never fails: provider errors are logged and answered by the fallback.
    pub async fn scan_contract(&self, address: &str) -> ScanResult {
        self.resolve(address).await.result
    }

    pub async fn resolve(&self, address: &str) -> Resolution {
        let mut notes = Vec::new();

        match &self.provider {
            Some(provider) => match provider.fetch_score(address).await {
                Ok(result) => {
                    info!(
                        address,
                        provider = provider.name(),
                        score = result.score,
                        "provider scan complete"
                    );
                    return Resolution { result, notes };
                }
                Err(err) => {
                    warn!(
                        address,
                        provider = provider.name(),
                        error = %err,
                        "provider scan failed; using fallback"
                    );
                    notes.push(format!(
                        "フォールバック: {} に問い合わせできませんでした（{err}）。決定的な推定スコアを表示しています。",
                        provider.name()
                    ));
                }
            },
            None => {
                if let Some(reason) = &self.skip_reason {
                    notes.push(format!(
                        "フォールバック: {reason}。決定的な推定スコアを表示しています。"
                    ));
                }
            }
        }

        let result =
            crate::fallback::alternative_scan_contract(address, self.opts.fallback_delay).await;
        info!(address, score = result.score, "fallback scan complete");
        Resolution { result, notes }
    }

    pub async fn report(&self, address: &str) -> Report {
        use std::io::IsTerminal;
        let progress_enabled = self.opts.show_progress && std::io::stderr().is_terminal();
        let pb = if progress_enabled {
            let pb = indicatif::ProgressBar::new_spinner();
            pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
            pb.set_message(format!("スキャン中 {address}"));
            pb.enable_steady_tick(Duration::from_millis(120));
            Some(pb)
        } else {
            None
        };

        let resolution = self.resolve(address).await;

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        self.report_from_resolution(resolution)
    }

    fn report_from_resolution(&self, resolution: Resolution) -> Report {
        let Resolution { result, mut notes } = resolution;

        let generated_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string());

        notes.sort();
        notes.dedup();

        Report {
            schema_version: "1.0".to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at,
            chain_id: self.opts.chain_id,
            tier: TrustTier::from_score(result.score),
            summary: summary_for_score(result.score).to_string(),
            result,
            notes,
        }
    }
}
