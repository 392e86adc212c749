use crate::tools::CancellationToken;
use anyhow::{Context, Result};

/// 將 Ctrl-C 連接到取消權杖
pub fn setup_shutdown_signal() -> Result<CancellationToken> {
    let token = CancellationToken::new();
    let handler_token = token.clone();

    ctrlc::set_handler(move || {
        handler_token.cancel();
        eprintln!("\n收到中斷信號，正在安全關閉...");
    })
    .context("無法設定 Ctrl-C 處理器")?;

    Ok(token)
}
