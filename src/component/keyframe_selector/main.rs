use super::adaptive_config::derive_adaptive_config;
use super::backend::{FfmpegBackend, MediaBackend};
use super::budget_limiter::limit_to_budget;
use super::candidate_sampler::sample_candidates;
use super::deduplicator::remove_duplicates;
use super::quality_filter::{filter_black, filter_blur};
use super::scene_builder::{UNIFORM_FALLBACK_WARNING, build_scenes};
use super::scene_detector::detect_boundaries;
use super::types::{
    ArtifactMode, KeyframeRecord, SelectionOutcome, SelectionResult, SelectionStats,
};
use super::workspace::FrameWorkspace;
use crate::config::SelectorConfig;
use crate::tools::{CancellationToken, Interrupted, interruption_of, validate_duration};
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// 選取流程的狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Probing,
    BuildingScenes,
    Sampling,
    Filtering,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Probing => "probing",
            Self::BuildingScenes => "building_scenes",
            Self::Sampling => "sampling",
            Self::Filtering => "filtering",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// 單次選取的呼叫選項
#[derive(Debug, Clone, Default)]
pub struct SelectOptions {
    pub cancellation: CancellationToken,
    pub artifacts: ArtifactMode,
}

/// 成功跑完所有階段後的中間結果
struct StageOutput {
    frames: Vec<KeyframeRecord>,
    stats: SelectionStats,
}

/// 關鍵畫面選取器
///
/// 流程：
/// A. 取得影片長度
/// B. 依長度調整參數
/// C. 場景邊界偵測與切割
/// D. 每個場景取樣並評分
/// E. 黑畫面 / 模糊過濾、去重、張數上限
pub struct KeyframeSelector {
    backend: Box<dyn MediaBackend>,
}

impl KeyframeSelector {
    #[must_use]
    pub fn new(backend: Box<dyn MediaBackend>) -> Self {
        Self { backend }
    }

    #[must_use]
    pub fn with_ffmpeg(ffmpeg_path: &str, ffprobe_path: &str) -> Self {
        Self::new(Box::new(FfmpegBackend::new(ffmpeg_path, ffprobe_path)))
    }

    /// 選取關鍵畫面
    ///
    /// 永遠不會回傳錯誤：任何失敗都轉成 `success = false` 的結果，
    /// 並在 `warnings` 中說明原因。工作區在任何結束路徑都會被清理。
    pub fn select(
        &self,
        video_path: &Path,
        config: &SelectorConfig,
        options: &SelectOptions,
    ) -> SelectionResult {
        let started = Instant::now();
        let config = config.normalized();
        let token = if config.timeout_ms > 0 {
            options
                .cancellation
                .with_deadline(Duration::from_millis(config.timeout_ms))
        } else {
            options.cancellation.clone()
        };

        info!("開始選取關鍵畫面: {}", video_path.display());

        let mut warnings = Vec::new();
        let mut stage = Stage::Init;

        let workspace = match FrameWorkspace::create(&options.artifacts) {
            Ok(workspace) => workspace,
            Err(e) => {
                error!("無法建立工作區: {e:#}");
                warnings.push(format!("pipeline failed: {e:#}"));
                return SelectionResult::unsuccessful(SelectionOutcome::Failed, warnings);
            }
        };

        let outcome = self.run_stages(
            video_path,
            &config,
            &workspace,
            &token,
            &mut stage,
            &mut warnings,
        );

        let keep: Vec<PathBuf> = match &outcome {
            Ok(output) => output.frames.iter().map(|f| f.image_path.clone()).collect(),
            Err(_) => Vec::new(),
        };
        if let Err(e) = workspace.finish(&keep) {
            warn!("清理工作區失敗: {e:#}");
            warnings.push(format!("cleanup failed: {e:#}"));
        }

        match outcome {
            Ok(StageOutput { frames, mut stats }) => {
                stats.elapsed_ms = elapsed_ms(started);
                info!(
                    "選取完成 - 場景: {}, 候選: {}, 黑畫面後: {}, 模糊後: {}, 去重後: {}, 最終: {} ({} ms)",
                    stats.scene_count,
                    stats.candidate_count,
                    stats.after_black_filter,
                    stats.after_blur_filter,
                    stats.after_dedupe,
                    stats.final_count,
                    stats.elapsed_ms
                );
                SelectionResult::completed(frames, stats, warnings)
            }
            Err(e) => {
                let outcome = match interruption_of(&e) {
                    Some(Interrupted::Cancelled) => SelectionOutcome::Cancelled,
                    Some(Interrupted::TimedOut) | None => SelectionOutcome::Failed,
                };
                let message = failure_message(&e, config.timeout_ms);

                if outcome == SelectionOutcome::Cancelled {
                    warn!("選取在 {stage} 階段被取消: {message}");
                    warnings.push(format!("pipeline cancelled: {message}"));
                } else {
                    error!("選取在 {stage} 階段失敗: {message}");
                    warnings.push(format!("pipeline failed: {message}"));
                }
                SelectionResult::unsuccessful(outcome, warnings)
            }
        }
    }

    fn run_stages(
        &self,
        video_path: &Path,
        config: &SelectorConfig,
        workspace: &FrameWorkspace,
        token: &CancellationToken,
        stage: &mut Stage,
        warnings: &mut Vec<String>,
    ) -> Result<StageOutput> {
        let backend = self.backend.as_ref();

        // Stage A: 影片長度
        advance(stage, Stage::Probing);
        let duration_sec = backend
            .probe_duration(video_path, token)
            .and_then(validate_duration)
            .with_context(|| format!("無法讀取影片長度: {}", video_path.display()))?;

        // Stage B: 依長度調整參數
        let adaptive = derive_adaptive_config(config, duration_sec);
        let adapted = &adaptive.config;
        debug!(
            "影片長度 {duration_sec:.1}s → {}，max_frames={}，scene_threshold={:.3}",
            adaptive.profile, adapted.max_frames, adapted.scene_threshold
        );
        warnings.push(adaptive.profile_tag());

        // Stage C: 場景邊界與切割
        advance(stage, Stage::BuildingScenes);
        let boundaries = detect_boundaries(
            backend,
            video_path,
            adapted.scene_threshold,
            adapted.min_scene_gap_sec,
            token,
        )?;
        let layout = build_scenes(duration_sec, &boundaries, adapted.min_scene_gap_sec);
        if layout.used_uniform_fallback {
            warnings.push(UNIFORM_FALLBACK_WARNING.to_string());
        }
        let scene_count = layout.scenes.len();

        // Stage D: 取樣與評分
        advance(stage, Stage::Sampling);
        let candidates =
            sample_candidates(backend, video_path, &layout.scenes, adapted, workspace, token)?;
        let candidate_count = candidates.len();

        // Stage E: 過濾、去重、張數上限
        advance(stage, Stage::Filtering);
        token.check()?;
        let candidates = filter_black(candidates, adapted.black_frame_luma_threshold);
        let after_black_filter = candidates.len();
        let candidates = filter_blur(candidates, adapted.blur_variance_threshold);
        let after_blur_filter = candidates.len();
        let candidates = remove_duplicates(candidates, adapted.dedupe_hash_distance);
        let after_dedupe = candidates.len();
        let frames: Vec<KeyframeRecord> = limit_to_budget(candidates, adapted.max_frames)
            .into_iter()
            .map(KeyframeRecord::from)
            .collect();

        advance(stage, Stage::Done);

        Ok(StageOutput {
            stats: SelectionStats {
                scene_count,
                candidate_count,
                after_black_filter,
                after_blur_filter,
                after_dedupe,
                final_count: frames.len(),
                elapsed_ms: 0,
            },
            frames,
        })
    }
}

impl Default for KeyframeSelector {
    fn default() -> Self {
        Self::new(Box::new(FfmpegBackend::default()))
    }
}

/// 以預設的 ffmpeg 後端選取關鍵畫面
#[must_use]
pub fn select_keyframes(
    video_path: &Path,
    config: &SelectorConfig,
    options: &SelectOptions,
) -> SelectionResult {
    KeyframeSelector::default().select(video_path, config, options)
}

fn advance(stage: &mut Stage, next: Stage) {
    debug!("階段 {stage} → {next}");
    *stage = next;
}

fn failure_message(error: &anyhow::Error, timeout_ms: u64) -> String {
    match interruption_of(error) {
        Some(Interrupted::TimedOut) => format!("timed out after {timeout_ms} ms"),
        Some(Interrupted::Cancelled) => "cancelled by caller".to_string(),
        None => format!("{error:#}"),
    }
}

#[allow(clippy::cast_possible_truncation)]
fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}
