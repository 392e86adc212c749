use crate::tools::{CancellationToken, run_with_cancellation};
use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

#[derive(Deserialize)]
struct StreamInfo {
    codec_type: Option<String>,
    duration: Option<String>,
}

/// 使用 ffprobe 取得影片長度（秒）
///
/// 非正數、非有限值或無法解析皆視為錯誤，不提供預設長度。
pub fn probe_duration(ffprobe: &str, path: &Path, token: &CancellationToken) -> Result<f64> {
    let mut command = Command::new(ffprobe);
    command
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path);

    let output = run_with_cancellation(command, token)
        .with_context(|| format!("無法執行 ffprobe: {}", path.display()))?;

    if !output.status.success() {
        bail!("ffprobe 執行失敗: {}", output.stderr_text().trim());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_duration(&stdout).with_context(|| format!("無法取得影片長度: {}", path.display()))
}

/// 解析 ffprobe JSON 輸出中的長度（優先從 format，其次從視訊串流）
fn parse_duration(json: &str) -> Result<f64> {
    let probe: FfprobeOutput = serde_json::from_str(json).context("無法解析 ffprobe 輸出")?;

    let stream_duration = probe.streams.as_ref().and_then(|streams| {
        streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .and_then(|s| s.duration.as_ref())
    });

    let raw = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .or(stream_duration)
        .ok_or_else(|| anyhow!("ffprobe 輸出缺少 duration 欄位"))?;

    let duration: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("duration 不是數字: {raw}"))?;

    validate_duration(duration)
}

/// 影片長度必須是有限的正數
pub fn validate_duration(duration: f64) -> Result<f64> {
    if !duration.is_finite() || duration <= 0.0 {
        bail!("影片長度無效: {duration}");
    }
    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_from_format() {
        let json = r#"{"format":{"duration":"240.500000"},"streams":[]}"#;
        assert!((parse_duration(json).unwrap() - 240.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_duration_falls_back_to_video_stream() {
        let json = r#"{
            "format": {},
            "streams": [
                {"codec_type": "audio", "duration": "99.0"},
                {"codec_type": "video", "duration": "12.25"}
            ]
        }"#;
        assert!((parse_duration(json).unwrap() - 12.25).abs() < 1e-9);
    }

    #[test]
    fn test_parse_duration_rejects_invalid_values() {
        assert!(parse_duration(r#"{"format":{"duration":"0.0"}}"#).is_err());
        assert!(parse_duration(r#"{"format":{"duration":"-3"}}"#).is_err());
        assert!(parse_duration(r#"{"format":{"duration":"N/A"}}"#).is_err());
        assert!(parse_duration(r#"{"format":{"duration":"inf"}}"#).is_err());
        assert!(parse_duration(r#"{"format":{}}"#).is_err());
        assert!(parse_duration("not json").is_err());
    }

    #[test]
    fn test_validate_duration() {
        assert!(validate_duration(1.0).is_ok());
        assert!(validate_duration(f64::NAN).is_err());
        assert!(validate_duration(f64::INFINITY).is_err());
        assert!(validate_duration(0.0).is_err());
    }
}
