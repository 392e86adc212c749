use crate::config::types::{MAX_RECENT_VIDEOS, UserSettings};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn save_settings(settings: &UserSettings, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(settings).context("Failed to serialize settings")?;

    fs::write(path, content)
        .with_context(|| format!("Failed to write settings to {}", path.display()))?;

    Ok(())
}

/// 更新最近處理的影片
/// 將新路徑加入最前面，去重並限制數量
pub fn add_recent_video(settings: &mut UserSettings, path: &str) {
    settings.recent_videos.retain(|p| p != path);
    settings.recent_videos.insert(0, path.to_string());
    settings.recent_videos.truncate(MAX_RECENT_VIDEOS);
}
