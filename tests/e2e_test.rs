//! E2E Integration Tests
//!
//! 使用真實的 ffmpeg / ffprobe。系統上沒有 ffmpeg 時跳過。

use std::path::{Path, PathBuf};
use std::process::Command;

use keyframe_selector::component::keyframe_selector::{
    ArtifactMode, FfmpegBackend, KeyframeSelector, MediaBackend, SelectOptions, SelectionOutcome,
};
use keyframe_selector::config::SelectorConfig;
use keyframe_selector::tools::CancellationToken;

fn ffmpeg_available() -> bool {
    let ok = |bin: &str| {
        Command::new(bin)
            .arg("-version")
            .output()
            .is_ok_and(|o| o.status.success())
    };
    ok("ffmpeg") && ok("ffprobe")
}

/// 產生 12 秒、每 4 秒換一種畫面的測試影片
fn generate_test_video(dir: &Path) -> PathBuf {
    let output = dir.join("scenes.mp4");
    let status = Command::new("ffmpeg")
        .args([
            "-hide_banner",
            "-loglevel",
            "error",
            "-f",
            "lavfi",
            "-i",
            "testsrc=duration=4:size=320x240:rate=10",
            "-f",
            "lavfi",
            "-t",
            "4",
            "-i",
            "mandelbrot=size=320x240:rate=10",
            "-f",
            "lavfi",
            "-i",
            "smptebars=duration=4:size=320x240:rate=10",
            "-filter_complex",
            "[0:v][1:v][2:v]concat=n=3:v=1:a=0,format=yuv420p[v]",
            "-map",
            "[v]",
            "-y",
        ])
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success(), "無法產生測試影片");
    output
}

/// 測試 ffprobe 取得影片長度
#[test]
fn test_probe_duration_e2e() {
    if !ffmpeg_available() {
        println!("跳過測試：找不到 ffmpeg / ffprobe");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let video = generate_test_video(dir.path());

    let backend = FfmpegBackend::default();
    let duration = backend
        .probe_duration(&video, &CancellationToken::new())
        .unwrap();
    println!("影片長度: {duration:.2}s");
    assert!((duration - 12.0).abs() < 0.5);
}

/// 測試完整選取流程（保存模式，方便檢查輸出檔案）
#[test]
fn test_select_keyframes_e2e() {
    if !ffmpeg_available() {
        println!("跳過測試：找不到 ffmpeg / ffprobe");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let video = generate_test_video(dir.path());
    let frames_dir = dir.path().join("frames");

    let config = SelectorConfig {
        black_frame_luma_threshold: 10.0,
        blur_variance_threshold: 1.0,
        dedupe_hash_distance: 1,
        ..SelectorConfig::default()
    };
    let options = SelectOptions {
        cancellation: CancellationToken::new(),
        artifacts: ArtifactMode::Persist(frames_dir.clone()),
    };

    let result = KeyframeSelector::default().select(&video, &config, &options);
    println!("{result:#?}");

    assert!(result.success, "warnings: {:?}", result.warnings);
    assert_eq!(result.outcome, SelectionOutcome::Completed);
    assert!(!result.frames.is_empty());
    assert!(result.frames.len() <= 28);
    assert!(
        result
            .frames
            .windows(2)
            .all(|w| w[0].timestamp_sec < w[1].timestamp_sec)
    );
    for frame in &result.frames {
        assert!(frame.image_path.exists(), "{}", frame.image_path.display());
        assert!(frame.timestamp_sec >= 0.0 && frame.timestamp_sec <= 12.0);
    }
}

/// 測試找不到影片時回傳失敗結果
#[test]
fn test_missing_video_e2e() {
    if !ffmpeg_available() {
        println!("跳過測試：找不到 ffmpeg / ffprobe");
        return;
    }
    let result = KeyframeSelector::default().select(
        Path::new("/nonexistent/video.mp4"),
        &SelectorConfig::default(),
        &SelectOptions::default(),
    );
    assert!(!result.success);
    assert_eq!(result.outcome, SelectionOutcome::Failed);
    assert!(result.frames.is_empty());
}
