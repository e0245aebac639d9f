use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{ProviderError, ScoreProvider};
use crate::core::{AuditStatus, ScanResult, ScanSource};

pub const DEFAULT_BASE_URL: &str = "https://check-api.quillai.network";
pub const DEFAULT_CHAIN_ID: u64 = 8453;
pub const API_KEY_HEADER: &str = "x-api-key";

pub const RISK_MINTABLE: &str = "Token supply is mintable";
pub const RISK_BLACKLIST: &str = "Blacklist functionality present";
pub const RISK_PROXY: &str = "Upgradeable proxy contract";

pub const POSITIVE_OPEN_SOURCE: &str = "Verified source code";
pub const POSITIVE_NO_HIDDEN_OWNER: &str = "No hidden owner";
pub const POSITIVE_FIXED_SLIPPAGE: &str = "Slippage cannot be modified";

pub const RECOMMENDATION_HIGH: &str = "High confidence: this token shows strong trust signals. Standard precautions still apply.";
pub const RECOMMENDATION_MODERATE: &str = "Moderate confidence: review the identified risk factors before committing significant funds.";
pub const RECOMMENDATION_LOW: &str = "Low confidence: this token exhibits notable risk indicators. Avoid interaction unless you fully understand the risks.";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInformationResponse {
    pub token_information: Option<serde_json::Value>,
    pub token_score: Option<TokenScore>,
    pub code_checks: Option<CodeChecks>,
    pub honeypot_details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenScore {
    pub total_score: Option<f64>,
    pub score_percent: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeChecks {
    pub is_open_source: Option<bool>,
    pub is_mintable: Option<bool>,
    pub is_blacklisted: Option<bool>,
    pub is_proxy: Option<bool>,
    pub has_hidden_owner: Option<bool>,
    pub is_slippage_modifiable: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct QuillCheckOptions {
    pub base_url: String,
    pub chain_id: u64,
    pub api_key: String,
    pub timeout: Duration,
}

pub struct QuillCheckProvider {
    client: Client,
    opts: QuillCheckOptions,
}

impl QuillCheckProvider {
    pub fn new(opts: QuillCheckOptions) -> Result<Self, ProviderError> {
        let mut builder =
            Client::builder().user_agent(concat!("trustscan/", env!("CARGO_PKG_VERSION")));
        // Zero means no limit.
        if !opts.timeout.is_zero() {
            builder = builder.timeout(opts.timeout);
        }
        let client = builder.build()?;
        Ok(Self { client, opts })
    }

    pub fn endpoint(&self, address: &str) -> String {
        format!(
            "{}/api/v1/tokens/information/{address}",
            self.opts.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait::async_trait]
impl ScoreProvider for QuillCheckProvider {
    fn name(&self) -> &'static str {
        "quillcheck"
    }

    async fn fetch_score(&self, address: &str) -> Result<ScanResult, ProviderError> {
        let url = self.endpoint(address);
        debug!(%url, chain_id = self.opts.chain_id, "requesting token information");

        let resp = self
            .client
            .get(&url)
            .query(&[("chainId", self.opts.chain_id)])
            .header(API_KEY_HEADER, &self.opts.api_key)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::http_status(status, body));
        }

        let body = resp.text().await?;
        let payload: TokenInformationResponse = serde_json::from_str(&body)?;
        map_response(address, &payload)
    }
}

/// Maps a provider payload onto a result. Fails only when no usable score is present.
pub fn map_response(
    address: &str,
    payload: &TokenInformationResponse,
) -> Result<ScanResult, ProviderError> {
    let percent = payload
        .token_score
        .as_ref()
        .and_then(|s| s.score_percent)
        .ok_or_else(|| ProviderError::malformed("tokenScore.scorePercent is missing"))?;
    if !percent.is_finite() {
        return Err(ProviderError::malformed(format!(
            "tokenScore.scorePercent is not a number: {percent}"
        )));
    }
    let score = percent.round().clamp(0.0, 100.0) as u8;

    let checks = payload.code_checks.clone().unwrap_or_default();
    let open_source = checks.is_open_source == Some(true);

    let mut risk_factors = Vec::new();
    if checks.is_mintable == Some(true) {
        risk_factors.push(RISK_MINTABLE.to_string());
    }
    if checks.is_blacklisted == Some(true) {
        risk_factors.push(RISK_BLACKLIST.to_string());
    }
    if checks.is_proxy == Some(true) {
        risk_factors.push(RISK_PROXY.to_string());
    }

    let mut positive_factors = Vec::new();
    if open_source {
        positive_factors.push(POSITIVE_OPEN_SOURCE.to_string());
    }
    if checks.has_hidden_owner == Some(false) {
        positive_factors.push(POSITIVE_NO_HIDDEN_OWNER.to_string());
    }
    if checks.is_slippage_modifiable == Some(false) {
        positive_factors.push(POSITIVE_FIXED_SLIPPAGE.to_string());
    }

    let audit_status = if score < 40 {
        AuditStatus::Issues
    } else if open_source {
        AuditStatus::Verified
    } else {
        AuditStatus::Unverified
    };

    Ok(ScanResult {
        address: address.to_string(),
        score,
        verified_source: open_source,
        audit_status,
        risk_factors,
        positive_factors,
        recommendation: recommendation_for(score).to_string(),
        source: ScanSource::Provider,
    })
}

pub fn recommendation_for(score: u8) -> &'static str {
    if score > 70 {
        RECOMMENDATION_HIGH
    } else if score > 50 {
        RECOMMENDATION_MODERATE
    } else {
        RECOMMENDATION_LOW
    }
}
