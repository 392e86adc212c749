//! 自適應關鍵畫面選取元件
//!
//! 五階段流程：
//! A. 取得影片長度（ffprobe）
//! B. 依長度分級調整參數
//! C. 場景邊界偵測與切割
//! D. 每個場景取樣、評分（亮度 / 清晰度 / dHash）
//! E. 過濾黑畫面與模糊、去重、均勻抽樣到張數上限

mod adaptive_config;
mod backend;
mod budget_limiter;
mod candidate_sampler;
mod deduplicator;
mod frame_metrics;
mod main;
mod quality_filter;
mod scene_builder;
mod scene_detector;
mod types;
mod workspace;

pub use adaptive_config::{AdaptiveConfig, DurationProfile, derive_adaptive_config};
pub use backend::{FfmpegBackend, MediaBackend};
pub use budget_limiter::limit_to_budget;
pub use candidate_sampler::{candidate_score, rank_scene_candidates, sample_offsets};
pub use deduplicator::remove_duplicates;
pub use frame_metrics::{
    ANALYSIS_SIZE, HASH_HEIGHT, HASH_WIDTH, difference_hash, hamming_distance,
    laplacian_variance, luma_mean,
};
pub use main::{KeyframeSelector, SelectOptions, Stage, select_keyframes};
pub use quality_filter::{filter_black, filter_blur};
pub use scene_builder::{SceneLayout, UNIFORM_FALLBACK_WARNING, build_scenes};
pub use scene_detector::parse_boundaries;
pub use types::{
    ArtifactMode, Candidate, FrameMetrics, FrameSample, KeyframeRecord, SceneRange,
    SelectionOutcome, SelectionResult, SelectionStats,
};
