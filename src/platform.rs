use std::path::PathBuf;

use anyhow::{Result, anyhow};

pub fn effective_home_dir() -> Result<PathBuf> {
    std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("環境変数 HOME が設定されていません"))
}
