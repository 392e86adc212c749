use super::types::ArtifactMode;
use crate::tools::ensure_directory_exists;
use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

/// 單次 `select` 呼叫的畫面工作區
///
/// - `Ephemeral`：自行建立 `<tmp>/keyframes-<uuid>`，結束時整個刪除
/// - `Persist`：寫入呼叫端的資料夾，只清除這次寫入但未被選中的檔案
pub struct FrameWorkspace {
    directory: PathBuf,
    call_id: String,
    owns_directory: bool,
    written: Mutex<Vec<PathBuf>>,
}

impl FrameWorkspace {
    pub fn create(mode: &ArtifactMode) -> Result<Self> {
        let call_id = Uuid::new_v4().simple().to_string();

        let (directory, owns_directory) = match mode {
            ArtifactMode::Ephemeral => {
                let directory = std::env::temp_dir().join(format!("keyframes-{call_id}"));
                fs::create_dir_all(&directory)
                    .with_context(|| format!("無法建立暫存資料夾: {}", directory.display()))?;
                (directory, true)
            }
            ArtifactMode::Persist(directory) => {
                ensure_directory_exists(directory)?;
                (directory.clone(), false)
            }
        };

        debug!(
            "工作區: {} ({})",
            directory.display(),
            if owns_directory { "ephemeral" } else { "persist" }
        );

        Ok(Self {
            directory,
            call_id,
            owns_directory,
            written: Mutex::new(Vec::new()),
        })
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// 第 `index` 個取樣工作的輸出路徑，檔名包含呼叫 id 因此不會與其他呼叫衝突
    #[must_use]
    pub fn frame_path(&self, index: usize) -> PathBuf {
        let short_id = &self.call_id[..12];
        self.directory.join(format!("frame_{short_id}_{index:04}.jpg"))
    }

    /// 記錄這次呼叫寫入（或即將寫入）的檔案
    pub fn record(&self, path: &Path) {
        match self.written.lock() {
            Ok(mut written) => written.push(path.to_path_buf()),
            Err(poisoned) => poisoned.into_inner().push(path.to_path_buf()),
        }
    }

    /// 結束工作區
    ///
    /// `keep` 為要留給呼叫端的檔案；`Ephemeral` 模式下無論如何都會刪除整個資料夾。
    /// 回傳的錯誤只代表清理失敗，不影響選取結果。
    pub fn finish(self, keep: &[PathBuf]) -> Result<()> {
        if self.owns_directory {
            if self.directory.exists() {
                fs::remove_dir_all(&self.directory).with_context(|| {
                    format!("無法清理暫存資料夾: {}", self.directory.display())
                })?;
            }
            return Ok(());
        }

        let written = self
            .written
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let keep: HashSet<&PathBuf> = keep.iter().collect();

        let mut failures = Vec::new();
        for path in written.iter().filter(|p| !keep.contains(p) && p.exists()) {
            if let Err(e) = fs::remove_file(path) {
                warn!("無法刪除未選中的畫面 {}: {e}", path.display());
                failures.push(path.display().to_string());
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(anyhow!(
                "無法刪除 {} 個未選中的畫面: {}",
                failures.len(),
                failures.join(", ")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ephemeral_directory_is_removed() {
        let workspace = FrameWorkspace::create(&ArtifactMode::Ephemeral).unwrap();
        let dir = workspace.directory().to_path_buf();
        assert!(dir.is_dir());

        let frame = workspace.frame_path(0);
        fs::write(&frame, b"jpeg").unwrap();
        workspace.record(&frame);

        workspace.finish(&[frame]).unwrap();
        assert!(!dir.exists());
    }

    #[test]
    fn test_frame_paths_are_unique_per_call() {
        let a = FrameWorkspace::create(&ArtifactMode::Ephemeral).unwrap();
        let b = FrameWorkspace::create(&ArtifactMode::Ephemeral).unwrap();
        assert_ne!(a.directory(), b.directory());
        assert_ne!(a.frame_path(0), a.frame_path(1));
        assert_ne!(a.frame_path(0).file_name(), b.frame_path(0).file_name());
        a.finish(&[]).unwrap();
        b.finish(&[]).unwrap();
    }

    #[test]
    fn test_persist_prunes_unselected_only() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("frames");
        let unrelated = {
            fs::create_dir_all(&target).unwrap();
            let p = target.join("keep_me.txt");
            fs::write(&p, b"x").unwrap();
            p
        };

        let workspace = FrameWorkspace::create(&ArtifactMode::Persist(target.clone())).unwrap();
        let selected = workspace.frame_path(0);
        let rejected = workspace.frame_path(1);
        for path in [&selected, &rejected] {
            fs::write(path, b"jpeg").unwrap();
            workspace.record(path);
        }
        // 記錄了但從未寫入的檔案不算錯誤
        workspace.record(&workspace.frame_path(2));

        workspace.finish(std::slice::from_ref(&selected)).unwrap();
        assert!(target.is_dir());
        assert!(selected.exists());
        assert!(!rejected.exists());
        assert!(unrelated.exists());
    }
}
