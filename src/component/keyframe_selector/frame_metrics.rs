use super::backend::MediaBackend;
use super::types::FrameMetrics;
use crate::tools::CancellationToken;
use anyhow::{Context, Result, bail};
use std::path::Path;

/// 亮度與清晰度分析用的灰階尺寸
pub const ANALYSIS_SIZE: u32 = 64;

/// dHash 用的灰階尺寸（9x8：每列 8 次左右比較）
pub const HASH_WIDTH: u32 = 9;
pub const HASH_HEIGHT: u32 = 8;

/// 解碼畫面並計算亮度、清晰度與差異雜湊
///
/// 解碼失敗一律回傳錯誤，不會略過該畫面。
pub fn compute_metrics(
    backend: &dyn MediaBackend,
    image_path: &Path,
    token: &CancellationToken,
) -> Result<FrameMetrics> {
    let analysis = backend
        .decode_grayscale(image_path, ANALYSIS_SIZE, ANALYSIS_SIZE, token)
        .with_context(|| format!("無法解碼分析用灰階: {}", image_path.display()))?;
    ensure_len(&analysis, ANALYSIS_SIZE, ANALYSIS_SIZE)?;

    let hash_pixels = backend
        .decode_grayscale(image_path, HASH_WIDTH, HASH_HEIGHT, token)
        .with_context(|| format!("無法解碼雜湊用灰階: {}", image_path.display()))?;
    ensure_len(&hash_pixels, HASH_WIDTH, HASH_HEIGHT)?;

    Ok(FrameMetrics {
        luma_mean: luma_mean(&analysis),
        sharpness_variance: laplacian_variance(
            &analysis,
            ANALYSIS_SIZE as usize,
            ANALYSIS_SIZE as usize,
        ),
        hash: difference_hash(&hash_pixels),
    })
}

fn ensure_len(pixels: &[u8], width: u32, height: u32) -> Result<()> {
    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        bail!(
            "灰階像素數量不符: 預期 {width}x{height}={expected}，實際 {}",
            pixels.len()
        );
    }
    Ok(())
}

/// 所有像素的算術平均
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn luma_mean(pixels: &[u8]) -> f64 {
    if pixels.is_empty() {
        return 0.0;
    }
    let sum: u64 = pixels.iter().map(|&p| u64::from(p)).sum();
    sum as f64 / pixels.len() as f64
}

/// 內部像素的 Laplacian 變異數
///
/// 核心為 `[[0,-1,0],[-1,4,-1],[0,-1,0]]`，邊緣像素不參與計算。
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn laplacian_variance(pixels: &[u8], width: usize, height: usize) -> f64 {
    if width < 3 || height < 3 || pixels.len() < width * height {
        return 0.0;
    }

    let at = |x: usize, y: usize| f64::from(pixels[y * width + x]);

    let mut responses = Vec::with_capacity((width - 2) * (height - 2));
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let value =
                4.0 * at(x, y) - at(x, y - 1) - at(x - 1, y) - at(x + 1, y) - at(x, y + 1);
            responses.push(value);
        }
    }

    let count = responses.len() as f64;
    let mean = responses.iter().sum::<f64>() / count;
    responses.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count
}

/// 64-bit 差異雜湊
///
/// 9x8 灰階中每列比較相鄰兩個像素，左邊嚴格大於右邊時設定第 k 個位元。
#[must_use]
pub fn difference_hash(pixels: &[u8]) -> u64 {
    let width = HASH_WIDTH as usize;
    let mut hash = 0u64;
    let mut bit = 0;

    for row in pixels.chunks_exact(width).take(HASH_HEIGHT as usize) {
        for pair in row.windows(2) {
            if pair[0] > pair[1] {
                hash |= 1u64 << bit;
            }
            bit += 1;
        }
    }

    hash
}

#[must_use]
pub const fn hamming_distance(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_mean() {
        assert!((luma_mean(&[0, 255]) - 127.5).abs() < 1e-9);
        assert!((luma_mean(&[10; 4096]) - 10.0).abs() < 1e-9);
        assert!(luma_mean(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn test_flat_image_has_zero_variance() {
        let flat = vec![128u8; 64 * 64];
        assert!(laplacian_variance(&flat, 64, 64).abs() < 1e-9);
    }

    #[test]
    fn test_checkerboard_is_sharper_than_gradient() {
        let checker: Vec<u8> = (0..64 * 64)
            .map(|i| if (i % 64 + i / 64) % 2 == 0 { 0 } else { 255 })
            .collect();
        let gradient: Vec<u8> = (0..64 * 64).map(|i| ((i % 64) * 4) as u8).collect();

        let sharp = laplacian_variance(&checker, 64, 64);
        let smooth = laplacian_variance(&gradient, 64, 64);
        assert!(sharp > 1000.0);
        assert!(smooth < 1.0);
    }

    #[test]
    fn test_laplacian_uses_interior_only() {
        // 3x3 只有中心一個內部像素，變異數為 0
        let pixels = [255, 0, 255, 0, 100, 0, 255, 0, 255];
        assert!(laplacian_variance(&pixels, 3, 3).abs() < 1e-9);
        assert!(laplacian_variance(&pixels, 2, 2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_difference_hash_bits() {
        // 每列遞減 → 每次比較左 > 右 → 全部 64 位元
        let descending: Vec<u8> = (0..8).flat_map(|_| (0..9).map(|x| 200 - x * 10)).collect();
        assert_eq!(difference_hash(&descending), u64::MAX);

        // 每列遞增或相等 → 沒有位元
        let ascending: Vec<u8> = (0..8).flat_map(|_| (0..9).map(|x| x * 10)).collect();
        assert_eq!(difference_hash(&ascending), 0);
        assert_eq!(difference_hash(&[50; 72]), 0);
    }

    #[test]
    fn test_difference_hash_bit_position() {
        // 只有第 1 列 (row=1) 的第 0 次比較成立 → 第 8 個位元
        let mut pixels = vec![0u8; 72];
        pixels[9] = 1;
        assert_eq!(difference_hash(&pixels), 1 << 8);
    }

    #[test]
    fn test_hamming_distance() {
        assert_eq!(hamming_distance(0, 0), 0);
        assert_eq!(hamming_distance(u64::MAX, 0), 64);
        assert_eq!(hamming_distance(0b1011, 0b0001), 2);
        let (a, b) = (0xDEAD_BEEF_u64, 0x1234_5678_u64);
        assert_eq!(hamming_distance(a, a), 0);
        assert_eq!(hamming_distance(a, b), hamming_distance(b, a));
    }
}
