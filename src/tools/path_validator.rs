use anyhow::{Context, Result, bail};
use std::path::Path;

pub fn validate_video_file(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("影片不存在: {}", path.display());
    }
    if !path.is_file() {
        bail!("路徑不是檔案: {}", path.display());
    }
    Ok(())
}

pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if path.exists() && !path.is_dir() {
        bail!("路徑不是資料夾: {}", path.display());
    }
    if !path.exists() {
        std::fs::create_dir_all(path)
            .with_context(|| format!("無法建立資料夾: {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_video_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("clip.mp4");
        std::fs::write(&file, b"x").unwrap();

        assert!(validate_video_file(&file).is_ok());
        assert!(validate_video_file(dir.path()).is_err());
        assert!(validate_video_file(&dir.path().join("missing.mp4")).is_err());
    }

    #[test]
    fn test_ensure_directory_exists() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_directory_exists(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_directory_exists(&nested).unwrap();

        let file = dir.path().join("file");
        std::fs::write(&file, b"x").unwrap();
        assert!(ensure_directory_exists(&file).is_err());
    }
}
