use crate::tools::{CancellationToken, FfmpegCommand, probe_duration, run_with_cancellation};
use anyhow::{Context, Result, bail};
use std::path::Path;

/// 關鍵畫面選取所需的外部工具能力
///
/// 所有呼叫都必須遵守取消權杖；測試可以用固定資料的實作替換真實的執行檔。
pub trait MediaBackend: Send + Sync {
    /// 影片總長度（秒）
    fn probe_duration(&self, video_path: &Path, token: &CancellationToken) -> Result<f64>;

    /// 場景變換分析的診斷輸出，內含零或多個 `pts_time:<秒>`
    fn detect_scene_changes(
        &self,
        video_path: &Path,
        threshold: f64,
        token: &CancellationToken,
    ) -> Result<String>;

    /// 在指定時間點擷取一張 JPEG，寬度為 `width`
    fn extract_frame(
        &self,
        video_path: &Path,
        timestamp_sec: f64,
        output_path: &Path,
        width: u32,
        token: &CancellationToken,
    ) -> Result<()>;

    /// 將圖片解碼為 `width * height` 的逐列 8-bit 灰階像素
    fn decode_grayscale(
        &self,
        image_path: &Path,
        width: u32,
        height: u32,
        token: &CancellationToken,
    ) -> Result<Vec<u8>>;
}

/// 以 ffmpeg / ffprobe 執行檔實作的後端
pub struct FfmpegBackend {
    ffmpeg: FfmpegCommand,
    ffprobe: String,
}

impl FfmpegBackend {
    #[must_use]
    pub fn new(ffmpeg_path: &str, ffprobe_path: &str) -> Self {
        Self {
            ffmpeg: FfmpegCommand::new(ffmpeg_path),
            ffprobe: ffprobe_path.to_string(),
        }
    }
}

impl Default for FfmpegBackend {
    fn default() -> Self {
        Self::new("ffmpeg", "ffprobe")
    }
}

impl MediaBackend for FfmpegBackend {
    fn probe_duration(&self, video_path: &Path, token: &CancellationToken) -> Result<f64> {
        probe_duration(&self.ffprobe, video_path, token)
    }

    fn detect_scene_changes(
        &self,
        video_path: &Path,
        threshold: f64,
        token: &CancellationToken,
    ) -> Result<String> {
        let command = self.ffmpeg.scene_detection(video_path, threshold);
        let output = run_with_cancellation(command, token)
            .with_context(|| format!("無法執行 ffmpeg 場景偵測: {}", video_path.display()))?;

        // showinfo 的輸出在 stderr
        let stderr = output.stderr_text();
        if !output.status.success() {
            bail!("ffmpeg 場景偵測失敗: {}", last_line(&stderr));
        }
        Ok(stderr)
    }

    fn extract_frame(
        &self,
        video_path: &Path,
        timestamp_sec: f64,
        output_path: &Path,
        width: u32,
        token: &CancellationToken,
    ) -> Result<()> {
        let command = self
            .ffmpeg
            .extract_frame(video_path, timestamp_sec, output_path, width);
        let output = run_with_cancellation(command, token)
            .with_context(|| format!("無法執行 ffmpeg 擷取畫面: {}", video_path.display()))?;

        if !output.status.success() {
            bail!("ffmpeg 擷取畫面失敗: {}", output.stderr_text().trim());
        }

        if !output_path.exists() {
            bail!(
                "畫面檔案未建立 ({timestamp_sec:.3}s): {}",
                output_path.display()
            );
        }

        Ok(())
    }

    fn decode_grayscale(
        &self,
        image_path: &Path,
        width: u32,
        height: u32,
        token: &CancellationToken,
    ) -> Result<Vec<u8>> {
        let command = self.ffmpeg.decode_grayscale(image_path, width, height);
        let output = run_with_cancellation(command, token)
            .with_context(|| format!("無法執行 ffmpeg 解碼: {}", image_path.display()))?;

        if !output.status.success() {
            bail!("ffmpeg 解碼失敗: {}", output.stderr_text().trim());
        }

        let expected = width as usize * height as usize;
        if output.stdout.len() != expected {
            bail!(
                "灰階像素數量不符: 預期 {expected}，實際 {} ({})",
                output.stdout.len(),
                image_path.display()
            );
        }

        Ok(output.stdout)
    }
}

/// ffmpeg 的錯誤訊息通常在最後一行
fn last_line(stderr: &str) -> &str {
    stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_line() {
        assert_eq!(last_line("a\nb: No such file\n\n"), "b: No such file");
        assert_eq!(last_line(""), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_binary_is_an_error() {
        let backend = FfmpegBackend::new("/nonexistent/ffmpeg", "/nonexistent/ffprobe");
        let token = CancellationToken::new();
        assert!(
            backend
                .probe_duration(Path::new("/tmp/a.mp4"), &token)
                .is_err()
        );
        assert!(
            backend
                .detect_scene_changes(Path::new("/tmp/a.mp4"), 0.3, &token)
                .is_err()
        );
    }
}
