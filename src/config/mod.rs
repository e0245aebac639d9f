use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::provider::quill::{DEFAULT_BASE_URL, DEFAULT_CHAIN_ID};

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub provider: ProviderConfig,
    pub fallback: FallbackConfig,
    pub ui: UiConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderConfig {
    pub enabled: bool,
    pub base_url: String,
    pub chain_id: u64,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FallbackConfig {
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UiConfig {
    pub color: bool,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig {
                enabled: true,
                base_url: DEFAULT_BASE_URL.to_string(),
                chain_id: DEFAULT_CHAIN_ID,
                api_key: None,
                timeout_secs: 30,
            },
            fallback: FallbackConfig {
                delay_ms: crate::fallback::DEFAULT_DELAY.as_millis() as u64,
            },
            ui: UiConfig { color: true },
            config_path: None,
        }
    }
}

impl EffectiveConfig {
    /// Copy safe to print: the API key is replaced by a marker.
    pub fn redacted(&self) -> RedactedConfig<'_> {
        RedactedConfig {
            provider: RedactedProvider {
                settings: &self.provider,
                api_key: if self.provider.api_key.is_some() {
                    "<set>"
                } else {
                    "<unset>"
                },
            },
            fallback: &self.fallback,
            ui: &self.ui,
            config_path: self.config_path.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RedactedConfig<'a> {
    pub provider: RedactedProvider<'a>,
    pub fallback: &'a FallbackConfig,
    pub ui: &'a UiConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct RedactedProvider<'a> {
    #[serde(flatten)]
    pub settings: &'a ProviderConfig,
    pub api_key: &'static str,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    provider: Option<RawProviderConfig>,
    fallback: Option<RawFallbackConfig>,
    ui: Option<RawUiConfig>,
}

#[derive(Debug, Deserialize)]
struct RawProviderConfig {
    enabled: Option<bool>,
    base_url: Option<String>,
    chain_id: Option<u64>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawFallbackConfig {
    delay_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawUiConfig {
    color: Option<bool>,
}

pub fn default_config_path(home_dir: &Path) -> PathBuf {
    home_dir.join(".config/trustscan/config.toml")
}

pub fn load(config_path: Option<&Path>, home_dir: &Path) -> Result<EffectiveConfig> {
    let mut cfg = EffectiveConfig::default();

    let path = config_path
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| default_config_path(home_dir));

    if path.exists() {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("設定ファイルの読み取りに失敗しました: {}", path.display()))?;
        let raw: RawConfig =
            toml::from_str(&s).context("設定ファイル(TOML)の解析に失敗しました")?;
        apply_raw_config(&mut cfg, raw);
        cfg.config_path = Some(path.display().to_string());
    }

    apply_env_overrides(&mut cfg)?;

    Ok(cfg)
}

fn apply_raw_config(cfg: &mut EffectiveConfig, raw: RawConfig) {
    if let Some(provider) = raw.provider {
        if let Some(enabled) = provider.enabled {
            cfg.provider.enabled = enabled;
        }
        if let Some(base_url) = provider.base_url {
            cfg.provider.base_url = base_url;
        }
        if let Some(chain_id) = provider.chain_id {
            cfg.provider.chain_id = chain_id;
        }
        if let Some(api_key) = provider.api_key {
            cfg.provider.api_key = non_empty(&api_key);
        }
        if let Some(timeout_secs) = provider.timeout_secs {
            cfg.provider.timeout_secs = timeout_secs;
        }
    }

    if let Some(fallback) = raw.fallback {
        if let Some(delay_ms) = fallback.delay_ms {
            cfg.fallback.delay_ms = delay_ms;
        }
    }

    if let Some(ui) = raw.ui {
        if let Some(color) = ui.color {
            cfg.ui.color = color;
        }
    }
}

fn apply_env_overrides(cfg: &mut EffectiveConfig) -> Result<()> {
    if let Ok(v) = std::env::var("TRUSTSCAN_PROVIDER_ENABLED") {
        cfg.provider.enabled = parse_bool(&v).with_context(|| "TRUSTSCAN_PROVIDER_ENABLED")?;
    }
    if let Ok(v) = std::env::var("TRUSTSCAN_PROVIDER_BASE_URL") {
        let v = v.trim();
        if !v.is_empty() {
            cfg.provider.base_url = v.to_string();
        }
    }
    if let Ok(v) = std::env::var("TRUSTSCAN_PROVIDER_CHAIN_ID") {
        cfg.provider.chain_id = v
            .trim()
            .parse::<u64>()
            .with_context(|| "TRUSTSCAN_PROVIDER_CHAIN_ID")?;
    }
    if let Ok(v) = std::env::var("TRUSTSCAN_PROVIDER_API_KEY") {
        if let Some(key) = non_empty(&v) {
            cfg.provider.api_key = Some(key);
        }
    }
    if let Ok(v) = std::env::var("TRUSTSCAN_PROVIDER_TIMEOUT_SECS") {
        cfg.provider.timeout_secs = v
            .trim()
            .parse::<u64>()
            .with_context(|| "TRUSTSCAN_PROVIDER_TIMEOUT_SECS")?;
    }
    if let Ok(v) = std::env::var("TRUSTSCAN_FALLBACK_DELAY_MS") {
        cfg.fallback.delay_ms = v
            .trim()
            .parse::<u64>()
            .with_context(|| "TRUSTSCAN_FALLBACK_DELAY_MS")?;
    }
    if let Ok(v) = std::env::var("TRUSTSCAN_UI_COLOR") {
        cfg.ui.color = parse_bool(&v).with_context(|| "TRUSTSCAN_UI_COLOR")?;
    }

    Ok(())
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

fn parse_bool(s: &str) -> Result<bool> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!(
            "真偽値が不正です: {s}（true|false|1|0|yes|no|on|off を指定してください）"
        )),
    }
}
