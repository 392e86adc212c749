use super::backend::MediaBackend;
use super::frame_metrics::compute_metrics;
use super::types::{Candidate, FrameMetrics, FrameSample, SceneRange};
use super::workspace::FrameWorkspace;
use crate::config::SelectorConfig;
use crate::tools::CancellationToken;
use anyhow::{Context, Result};
use log::debug;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// 低於此亮度開始扣分
const DARK_LUMA_LIMIT: f64 = 32.0;
/// 每低一階亮度扣的分數
const DARK_PENALTY_PER_LEVEL: f64 = 8.0;

/// 三點取樣位置（片段長度的比例）
const SAMPLE_FRACTIONS: [f64; 3] = [0.15, 0.5, 0.85];

/// 單一候選畫面的擷取工作
#[derive(Debug, Clone)]
struct SampleJob {
    scene_index: usize,
    timestamp_sec: f64,
    image_path: PathBuf,
}

/// 片段內的取樣時間點
#[must_use]
pub fn sample_offsets(scene: &SceneRange, per_scene_max: usize) -> Vec<f64> {
    if per_scene_max <= 1 {
        return vec![scene.start_sec + scene.duration() / 2.0];
    }

    let mut offsets: Vec<f64> = SAMPLE_FRACTIONS
        .iter()
        .map(|fraction| scene.start_sec + scene.duration() * fraction)
        .collect();
    offsets.dedup();
    offsets
}

/// 排序分數：清晰度減去過暗懲罰
#[must_use]
pub fn candidate_score(metrics: &FrameMetrics) -> f64 {
    let penalty = if metrics.luma_mean < DARK_LUMA_LIMIT {
        (DARK_LUMA_LIMIT - metrics.luma_mean) * DARK_PENALTY_PER_LEVEL
    } else {
        0.0
    };
    metrics.sharpness_variance - penalty
}

/// 保留片段內分數最高的 `per_scene_max` 張，再依時間排序
#[must_use]
pub fn rank_scene_candidates(
    mut candidates: Vec<Candidate>,
    per_scene_max: usize,
) -> Vec<Candidate> {
    candidates.sort_by(|a, b| {
        candidate_score(&b.metrics)
            .total_cmp(&candidate_score(&a.metrics))
            .then_with(|| a.timestamp_sec().total_cmp(&b.timestamp_sec()))
    });
    candidates.truncate(per_scene_max);
    sort_by_timestamp(&mut candidates);
    candidates
}

pub fn sort_by_timestamp(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| a.timestamp_sec().total_cmp(&b.timestamp_sec()));
}

/// 對每個片段擷取候選畫面並評分
///
/// `sample_concurrency` 大於 1 時以固定大小的執行緒池平行處理，
/// 結果仍依工作順序收集，之後的排序與循序版本一致。
pub fn sample_candidates(
    backend: &dyn MediaBackend,
    video_path: &Path,
    scenes: &[SceneRange],
    config: &SelectorConfig,
    workspace: &FrameWorkspace,
    token: &CancellationToken,
) -> Result<Vec<Candidate>> {
    let per_scene_max = config.per_scene_max;
    let extract_width = config.extract_width;
    let concurrency = config.sample_concurrency;

    let jobs: Vec<SampleJob> = scenes
        .iter()
        .enumerate()
        .flat_map(|(scene_index, scene)| {
            sample_offsets(scene, per_scene_max)
                .into_iter()
                .map(move |timestamp_sec| (scene_index, timestamp_sec))
        })
        .enumerate()
        .map(|(job_index, (scene_index, timestamp_sec))| SampleJob {
            scene_index,
            timestamp_sec,
            image_path: workspace.frame_path(job_index),
        })
        .collect();

    debug!(
        "{} 個片段共 {} 個取樣點，並行數 {concurrency}",
        scenes.len(),
        jobs.len()
    );

    let run =
        |job: &SampleJob| process_job(backend, video_path, extract_width, workspace, token, job);

    let results: Vec<(usize, Candidate)> = if concurrency <= 1 {
        jobs.iter().map(run).collect::<Result<_>>()?
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(concurrency)
            .build()
            .context("無法建立取樣執行緒池")?;
        pool.install(|| jobs.par_iter().map(run).collect::<Result<_>>())?
    };

    let mut per_scene: Vec<Vec<Candidate>> = vec![Vec::new(); scenes.len()];
    for (scene_index, candidate) in results {
        per_scene[scene_index].push(candidate);
    }

    let mut candidates: Vec<Candidate> = per_scene
        .into_iter()
        .flat_map(|group| rank_scene_candidates(group, per_scene_max))
        .collect();
    sort_by_timestamp(&mut candidates);

    Ok(candidates)
}

/// 擷取 → 解碼 64x64 → 解碼 9x8，三個步驟依序執行
fn process_job(
    backend: &dyn MediaBackend,
    video_path: &Path,
    extract_width: u32,
    workspace: &FrameWorkspace,
    token: &CancellationToken,
    job: &SampleJob,
) -> Result<(usize, Candidate)> {
    token.check()?;

    workspace.record(&job.image_path);
    backend
        .extract_frame(
            video_path,
            job.timestamp_sec,
            &job.image_path,
            extract_width,
            token,
        )
        .with_context(|| format!("擷取 {:.3}s 畫面失敗", job.timestamp_sec))?;

    let metrics = compute_metrics(backend, &job.image_path, token)?;

    Ok((
        job.scene_index,
        Candidate {
            sample: FrameSample {
                timestamp_sec: job.timestamp_sec,
                image_path: job.image_path.clone(),
            },
            metrics,
        },
    ))
}
