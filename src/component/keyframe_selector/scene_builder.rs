use super::types::SceneRange;

/// 最後一段至少要有的長度（秒），不足則併入前一段
const MIN_TAIL_SEC: f64 = 0.1;

/// 均勻切割的最小片段長度（秒）
const MIN_UNIFORM_CHUNK_SEC: f64 = 8.0;

pub const UNIFORM_FALLBACK_WARNING: &str = "scene detector found nothing, used uniform split";

/// 場景切割結果
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLayout {
    pub scenes: Vec<SceneRange>,
    pub used_uniform_fallback: bool,
}

/// 將場景邊界轉為依序排列、互不重疊且完整覆蓋 `[0, duration]` 的片段
///
/// 沒有邊界或切不出任何片段時改用均勻切割。
#[must_use]
pub fn build_scenes(duration_sec: f64, boundaries: &[f64], min_scene_gap_sec: f64) -> SceneLayout {
    let scenes = split_at_boundaries(duration_sec, boundaries, min_scene_gap_sec);

    if scenes.is_empty() {
        return SceneLayout {
            scenes: uniform_split(duration_sec, min_scene_gap_sec),
            used_uniform_fallback: true,
        };
    }

    SceneLayout {
        scenes,
        used_uniform_fallback: false,
    }
}

fn split_at_boundaries(
    duration_sec: f64,
    boundaries: &[f64],
    min_scene_gap_sec: f64,
) -> Vec<SceneRange> {
    let mut scenes = Vec::with_capacity(boundaries.len() + 1);
    let mut cursor = 0.0;

    for &boundary in boundaries {
        if cursor >= duration_sec {
            break;
        }
        if boundary <= cursor || boundary - cursor < min_scene_gap_sec {
            continue;
        }
        scenes.push(SceneRange {
            start_sec: cursor,
            end_sec: boundary.min(duration_sec),
        });
        cursor = boundary;
    }

    if scenes.is_empty() {
        return scenes;
    }

    if duration_sec - cursor >= MIN_TAIL_SEC {
        scenes.push(SceneRange {
            start_sec: cursor,
            end_sec: duration_sec,
        });
    } else if let Some(last) = scenes.last_mut() {
        // 尾端太短，延長最後一段以維持完整覆蓋
        last.end_sec = duration_sec;
    }

    scenes
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn uniform_split(duration_sec: f64, min_scene_gap_sec: f64) -> Vec<SceneRange> {
    let chunk = (min_scene_gap_sec * 2.0).max(MIN_UNIFORM_CHUNK_SEC);
    let scene_count = ((duration_sec / chunk).ceil() as usize).max(1);
    let step = duration_sec / scene_count as f64;

    (0..scene_count)
        .map(|i| SceneRange {
            start_sec: step * i as f64,
            end_sec: if i + 1 == scene_count {
                duration_sec
            } else {
                step * (i + 1) as f64
            },
        })
        .collect()
}
