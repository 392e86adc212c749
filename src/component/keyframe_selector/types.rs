use serde::Serialize;
use std::path::PathBuf;

/// 影片中的一段時間區間
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneRange {
    pub start_sec: f64,
    pub end_sec: f64,
}

impl SceneRange {
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end_sec - self.start_sec
    }
}

/// 擷取出的單張畫面
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSample {
    pub timestamp_sec: f64,
    pub image_path: PathBuf,
}

/// 單張畫面的分析結果，只由像素資料決定
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMetrics {
    pub luma_mean: f64,
    pub sharpness_variance: f64,
    pub hash: u64,
}

/// 候選畫面，只存在於單次 `select` 呼叫內
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub sample: FrameSample,
    pub metrics: FrameMetrics,
}

impl Candidate {
    #[must_use]
    pub const fn timestamp_sec(&self) -> f64 {
        self.sample.timestamp_sec
    }
}

/// 最終選出的關鍵畫面
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyframeRecord {
    pub timestamp_sec: f64,
    pub image_path: PathBuf,
    pub luma_mean: f64,
    pub sharpness_variance: f64,
}

impl From<Candidate> for KeyframeRecord {
    fn from(candidate: Candidate) -> Self {
        Self {
            timestamp_sec: candidate.sample.timestamp_sec,
            image_path: candidate.sample.image_path,
            luma_mean: candidate.metrics.luma_mean,
            sharpness_variance: candidate.metrics.sharpness_variance,
        }
    }
}

/// 各階段的統計數字，沿著過濾鏈單調不增
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SelectionStats {
    pub scene_count: usize,
    pub candidate_count: usize,
    pub after_black_filter: usize,
    pub after_blur_filter: usize,
    pub after_dedupe: usize,
    pub final_count: usize,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOutcome {
    Completed,
    Failed,
    Cancelled,
}

/// `select` 的回傳值
///
/// 非 `Completed` 時 `frames` 為空、`stats` 為零值。
#[derive(Debug, Clone, Serialize)]
pub struct SelectionResult {
    pub success: bool,
    pub outcome: SelectionOutcome,
    pub frames: Vec<KeyframeRecord>,
    pub stats: SelectionStats,
    pub warnings: Vec<String>,
}

impl SelectionResult {
    #[must_use]
    pub fn completed(
        frames: Vec<KeyframeRecord>,
        stats: SelectionStats,
        warnings: Vec<String>,
    ) -> Self {
        Self {
            success: true,
            outcome: SelectionOutcome::Completed,
            frames,
            stats,
            warnings,
        }
    }

    #[must_use]
    pub fn unsuccessful(outcome: SelectionOutcome, warnings: Vec<String>) -> Self {
        Self {
            success: false,
            outcome,
            frames: Vec::new(),
            stats: SelectionStats::default(),
            warnings,
        }
    }
}

/// 呼叫端選擇的畫面檔案保存方式
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ArtifactMode {
    /// 使用自有暫存資料夾，結束時一律刪除
    #[default]
    Ephemeral,
    /// 寫入呼叫端擁有的資料夾，資料夾本身不會被刪除
    Persist(PathBuf),
}
