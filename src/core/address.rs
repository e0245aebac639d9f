use anyhow::Result;

/// `0x` followed by exactly 40 hex digits, either case.
pub fn validate_address(address: &str) -> bool {
    let Some(hex) = address.strip_prefix("0x") else {
        return false;
    };
    hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Input gate used before a scan is started.
pub fn check_address(address: &str) -> Result<()> {
    if address.trim().is_empty() {
        return Err(crate::exit::invalid_args(
            "コントラクトアドレスを入力してください",
        ));
    }
    if !validate_address(address) {
        return Err(crate::exit::invalid_args(format!(
            "EVM コントラクトアドレスが不正です: {address}（0x + 16進数40桁）"
        )));
    }
    Ok(())
}
