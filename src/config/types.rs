use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 最近使用影片的保留數量
pub const MAX_RECENT_VIDEOS: usize = 10;

/// 關鍵畫面選取參數
///
/// 每次呼叫 `select` 時視為不可變；依影片長度調整後的版本見
/// `AdaptiveConfig`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// 最多回傳幾張畫面
    pub max_frames: usize,
    /// 場景變換門檻 (0-1)，越低越敏感
    pub scene_threshold: f64,
    /// 每個場景最多保留幾張候選 (1-3)
    pub per_scene_max: usize,
    /// 相鄰場景邊界的最小間隔（秒）
    pub min_scene_gap_sec: f64,
    /// dHash 漢明距離小於此值視為重複
    pub dedupe_hash_distance: u32,
    /// 平均亮度低於此值視為黑畫面 (0-255)
    pub black_frame_luma_threshold: f64,
    /// Laplacian 變異數低於此值視為模糊
    pub blur_variance_threshold: f64,
    /// 擷取畫面的寬度（像素，等比縮放）
    pub extract_width: u32,
    /// 整體時間預算（毫秒），0 表示不限制
    pub timeout_ms: u64,
    /// 同時處理的候選畫面數量，1 表示完全循序
    pub sample_concurrency: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            max_frames: 24,
            scene_threshold: 0.3,
            per_scene_max: 2,
            min_scene_gap_sec: 2.0,
            dedupe_hash_distance: 6,
            black_frame_luma_threshold: 18.0,
            blur_variance_threshold: 40.0,
            extract_width: 640,
            timeout_ms: 180_000,
            sample_concurrency: 1,
        }
    }
}

impl SelectorConfig {
    /// 將呼叫端輸入限制在合法範圍內
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            max_frames: self.max_frames.max(1),
            scene_threshold: clamp_or(self.scene_threshold, 0.0, 1.0, 0.3),
            per_scene_max: self.per_scene_max.clamp(1, 3),
            min_scene_gap_sec: clamp_or(self.min_scene_gap_sec, 0.0, f64::MAX, 0.0),
            dedupe_hash_distance: self.dedupe_hash_distance.min(64),
            black_frame_luma_threshold: clamp_or(self.black_frame_luma_threshold, 0.0, 255.0, 0.0),
            blur_variance_threshold: clamp_or(self.blur_variance_threshold, 0.0, f64::MAX, 0.0),
            extract_width: self.extract_width.max(16),
            timeout_ms: self.timeout_ms,
            sample_concurrency: self.sample_concurrency.max(1),
        }
    }
}

/// NaN 以 `fallback` 取代，其餘數值夾在範圍內
fn clamp_or(value: f64, min: f64, max: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

/// 使用者設定（儲存在 keyframe_settings.json）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub selector: SelectorConfig,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    /// 設定後將選出的畫面保存在此資料夾；未設定則使用暫存資料夾
    pub persist_directory: Option<PathBuf>,
    pub recent_videos: Vec<String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            selector: SelectorConfig::default(),
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            persist_directory: None,
            recent_videos: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: UserSettings,
}
