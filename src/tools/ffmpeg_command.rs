use std::path::Path;
use std::process::Command;

/// 兩段式 seek 的前置緩衝時間（秒）
const SEEK_MARGIN: f64 = 2.0;

/// ffmpeg 命令產生器
///
/// 只負責組出參數，執行交給 `run_with_cancellation`。
pub struct FfmpegCommand {
    program: String,
}

impl FfmpegCommand {
    #[must_use]
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }

    fn base(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["-hide_banner", "-nostdin"]);
        cmd
    }

    /// 場景變換分析
    ///
    /// `select` 只放行場景分數大於門檻的畫面，`showinfo` 會在 stderr
    /// 為每張放行的畫面印出 `pts_time:<秒>`。
    #[must_use]
    pub fn scene_detection(&self, video_path: &Path, threshold: f64) -> Command {
        let filter = format!("select='gt(scene,{threshold:.4})',showinfo");

        let mut cmd = self.base();
        cmd.args(["-loglevel", "info", "-i"])
            .arg(video_path)
            .args(["-an", "-sn", "-dn", "-vf", &filter, "-f", "null", "-"]);
        cmd
    }

    /// 擷取單張畫面（兩段式 seek，等比縮放到指定寬度）
    ///
    /// 1. `-ss` 在 `-i` 前：快速跳轉到最近的關鍵幀
    /// 2. `-ss` 在 `-i` 後：精準解碼到目標時間點
    #[must_use]
    pub fn extract_frame(
        &self,
        video_path: &Path,
        timestamp: f64,
        output_path: &Path,
        width: u32,
    ) -> Command {
        let t0 = (timestamp - SEEK_MARGIN).max(0.0);
        let delta = timestamp - t0;

        let mut cmd = self.base();
        cmd.args(["-loglevel", "error"]);
        if t0 > 0.0 {
            cmd.args(["-ss", &format!("{t0:.3}")]);
        }
        cmd.arg("-i").arg(video_path);
        if delta > 0.0 {
            cmd.args(["-ss", &format!("{delta:.3}")]);
        }
        cmd.args([
            "-frames:v",
            "1",
            "-an",
            "-sn",
            "-dn",
            "-vf",
            &format!("scale={width}:-2"),
            "-q:v",
            "2",
            "-y",
        ])
        .arg(output_path);
        cmd
    }

    /// 將圖片解碼成 8-bit 灰階原始像素，輸出到 stdout
    #[must_use]
    pub fn decode_grayscale(&self, image_path: &Path, width: u32, height: u32) -> Command {
        let filter = format!("scale={width}:{height}:flags=area,format=gray");

        let mut cmd = self.base();
        cmd.args(["-loglevel", "error", "-i"])
            .arg(image_path)
            .args([
                "-vf", &filter, "-frames:v", "1", "-f", "rawvideo", "-pix_fmt", "gray", "-",
            ]);
        cmd
    }
}
