use super::types::Candidate;

/// 去除過暗的畫面（保持原順序）
#[must_use]
pub fn filter_black(candidates: Vec<Candidate>, luma_threshold: f64) -> Vec<Candidate> {
    candidates
        .into_iter()
        .filter(|c| c.metrics.luma_mean >= luma_threshold)
        .collect()
}

/// 去除模糊的畫面（保持原順序）
#[must_use]
pub fn filter_blur(candidates: Vec<Candidate>, variance_threshold: f64) -> Vec<Candidate> {
    candidates
        .into_iter()
        .filter(|c| c.metrics.sharpness_variance >= variance_threshold)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::keyframe_selector::types::{FrameMetrics, FrameSample};
    use std::path::PathBuf;

    fn candidate(timestamp: f64, luma: f64, sharpness: f64) -> Candidate {
        Candidate {
            sample: FrameSample {
                timestamp_sec: timestamp,
                image_path: PathBuf::from("/tmp/x.jpg"),
            },
            metrics: FrameMetrics {
                luma_mean: luma,
                sharpness_variance: sharpness,
                hash: 0,
            },
        }
    }

    #[test]
    fn test_black_filter_keeps_threshold_and_order() {
        let input = vec![
            candidate(1.0, 5.0, 100.0),
            candidate(2.0, 18.0, 100.0),
            candidate(3.0, 200.0, 100.0),
        ];
        let kept = filter_black(input, 18.0);
        let times: Vec<f64> = kept.iter().map(Candidate::timestamp_sec).collect();
        assert_eq!(times, vec![2.0, 3.0]);
    }

    #[test]
    fn test_blur_filter() {
        let input = vec![
            candidate(1.0, 100.0, 39.9),
            candidate(2.0, 100.0, 40.0),
            candidate(3.0, 100.0, 0.0),
        ];
        let kept = filter_blur(input, 40.0);
        assert_eq!(kept.len(), 1);
        assert!((kept[0].timestamp_sec() - 2.0).abs() < f64::EPSILON);
    }
}
