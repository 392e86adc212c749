use super::frame_metrics::hamming_distance;
use super::types::Candidate;

/// 移除與上一張「保留」畫面過於相似的候選
///
/// 第一張一定保留；之後每張與最後保留的那張比較 dHash，
/// 距離達到 `min_distance` 才保留。
#[must_use]
pub fn remove_duplicates(candidates: Vec<Candidate>, min_distance: u32) -> Vec<Candidate> {
    let mut kept: Vec<Candidate> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let is_distinct = kept.last().is_none_or(|last| {
            hamming_distance(last.metrics.hash, candidate.metrics.hash) >= min_distance
        });
        if is_distinct {
            kept.push(candidate);
        }
    }

    kept
}
