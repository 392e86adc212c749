use super::backend::MediaBackend;
use crate::tools::CancellationToken;
use anyhow::{Context, Result};
use log::debug;
use regex::Regex;
use std::path::Path;

/// 執行場景變換分析並解析出邊界時間點
///
/// 分析失敗會直接回傳錯誤，而不是當成沒有邊界。
pub fn detect_boundaries(
    backend: &dyn MediaBackend,
    video_path: &Path,
    scene_threshold: f64,
    min_scene_gap_sec: f64,
    token: &CancellationToken,
) -> Result<Vec<f64>> {
    debug!("場景偵測設定: threshold={scene_threshold:.3}, min_gap={min_scene_gap_sec:.2}s");

    let diagnostic = backend
        .detect_scene_changes(video_path, scene_threshold, token)
        .context("場景偵測失敗")?;

    let boundaries = parse_boundaries(&diagnostic, min_scene_gap_sec)?;
    debug!("偵測到 {} 個場景邊界", boundaries.len());

    Ok(boundaries)
}

/// 解析診斷輸出中的 `pts_time:<秒>`
///
/// 排序後由左至右貪婪去重：距離上一個保留點不足 `min_gap_sec` 的點會被丟棄。
pub fn parse_boundaries(diagnostic: &str, min_gap_sec: f64) -> Result<Vec<f64>> {
    let pts_regex = Regex::new(r"pts_time:\s*([-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?)")?;

    let mut timestamps: Vec<f64> = pts_regex
        .captures_iter(diagnostic)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .filter(|t| t.is_finite())
        .collect();

    timestamps.sort_by(f64::total_cmp);

    let mut kept: Vec<f64> = Vec::with_capacity(timestamps.len());
    for timestamp in timestamps {
        match kept.last() {
            Some(&last) if timestamp - last < min_gap_sec => {}
            _ => kept.push(timestamp),
        }
    }

    Ok(kept)
}
