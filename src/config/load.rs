use crate::config::types::{Config, UserSettings};
use anyhow::{Context, Result};
use log::warn;
use std::fs;
use std::path::Path;

/// 設定檔名稱（位於目前工作目錄）
pub const SETTINGS_FILE: &str = "keyframe_settings.json";

impl Config {
    pub fn new() -> Result<Self> {
        let settings = match Self::load_settings(Path::new(SETTINGS_FILE)) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("讀取設定失敗，改用預設值: {e:#}");
                UserSettings::default()
            }
        };

        Ok(Self { settings })
    }

    pub fn load_settings(path: &Path) -> Result<UserSettings> {
        if !path.exists() {
            return Ok(UserSettings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Config::load_settings(&dir.path().join("none.json")).unwrap();
        assert_eq!(settings.ffmpeg_path, "ffmpeg");
        assert!(settings.recent_videos.is_empty());
    }

    #[test]
    fn test_partial_file_is_merged_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"selector": {"max_frames": 12}, "ffmpeg_path": "/opt/ffmpeg"}"#,
        )
        .unwrap();

        let settings = Config::load_settings(&path).unwrap();
        assert_eq!(settings.selector.max_frames, 12);
        assert_eq!(settings.ffmpeg_path, "/opt/ffmpeg");
        assert_eq!(settings.ffprobe_path, "ffprobe");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(Config::load_settings(&path).is_err());
    }
}
