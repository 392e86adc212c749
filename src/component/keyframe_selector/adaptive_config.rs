use crate::config::SelectorConfig;
use std::fmt;

const SHORT_MAX_SEC: f64 = 8.0 * 60.0;
const MEDIUM_MAX_SEC: f64 = 25.0 * 60.0;
const LONG_MAX_SEC: f64 = 60.0 * 60.0;

/// 影片長度分級
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationProfile {
    Short,
    Medium,
    Long,
    ExtraLong,
}

impl DurationProfile {
    #[must_use]
    pub fn classify(duration_sec: f64) -> Self {
        if duration_sec <= SHORT_MAX_SEC {
            Self::Short
        } else if duration_sec <= MEDIUM_MAX_SEC {
            Self::Medium
        } else if duration_sec <= LONG_MAX_SEC {
            Self::Long
        } else {
            Self::ExtraLong
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
            Self::ExtraLong => "extra_long",
        }
    }
}

impl fmt::Display for DurationProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 依影片長度調整後的參數，產生後不再變動
#[derive(Debug, Clone, PartialEq)]
pub struct AdaptiveConfig {
    pub profile: DurationProfile,
    pub config: SelectorConfig,
}

impl AdaptiveConfig {
    /// 說明所選分級的資訊性警告
    #[must_use]
    pub fn profile_tag(&self) -> String {
        format!("duration profile: {}", self.profile)
    }
}

/// 依影片長度調整參數
///
/// 短片放寬門檻以取得更多畫面，長片收緊門檻並降低張數上限。
#[must_use]
pub fn derive_adaptive_config(config: &SelectorConfig, duration_sec: f64) -> AdaptiveConfig {
    let profile = DurationProfile::classify(duration_sec);
    let mut adapted = config.clone();

    match profile {
        DurationProfile::Short => {
            adapted.max_frames = config.max_frames.max(28);
            adapted.scene_threshold = clamp_threshold(config.scene_threshold - 0.05);
            adapted.min_scene_gap_sec = clamp_gap(config.min_scene_gap_sec - 0.5);
            adapted.dedupe_hash_distance =
                config.dedupe_hash_distance.saturating_add(1).clamp(1, 64);
        }
        DurationProfile::Medium => {}
        DurationProfile::Long => {
            adapted.max_frames = scaled_budget(config.max_frames, 0.85, 12);
            adapted.scene_threshold = clamp_threshold(config.scene_threshold + 0.04);
            adapted.min_scene_gap_sec = clamp_gap(config.min_scene_gap_sec + 0.8);
        }
        DurationProfile::ExtraLong => {
            adapted.max_frames = scaled_budget(config.max_frames, 0.7, 10);
            adapted.scene_threshold = clamp_threshold(config.scene_threshold + 0.08);
            adapted.min_scene_gap_sec = clamp_gap(config.min_scene_gap_sec + 1.5);
        }
    }

    AdaptiveConfig {
        profile,
        config: adapted,
    }
}

fn clamp_threshold(value: f64) -> f64 {
    value.clamp(0.05, 0.95)
}

fn clamp_gap(value: f64) -> f64 {
    value.clamp(0.2, 30.0)
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scaled_budget(max_frames: usize, factor: f64, floor: usize) -> usize {
    let scaled = (max_frames as f64 * factor).floor() as usize;
    scaled.max(floor)
}
