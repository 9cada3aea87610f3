//! Filesystem pad store
//!
//! Each pad is `<dir>/<key>.md`. In single-file mode every key maps to the
//! same file, which is how the service ran before pads were keyed by chat.

use super::{PadKey, PadStore, Result};
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;

#[derive(Debug)]
enum Layout {
    Dir(PathBuf),
    SingleFile(PathBuf),
}

#[derive(Debug)]
pub struct FsPadStore {
    layout: Layout,
    tmp_counter: AtomicU64,
}

impl FsPadStore {
    /// Store pads under `dir`, creating it if needed.
    pub fn new(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)?;
        log::info!("[PAD] Filesystem pads under {}", dir.display());
        Ok(Self {
            layout: Layout::Dir(dir),
            tmp_counter: AtomicU64::new(0),
        })
    }

    /// Store every pad in one file.
    pub fn single_file(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        log::info!("[PAD] Single-file pad at {}", path.display());
        Ok(Self {
            layout: Layout::SingleFile(path),
            tmp_counter: AtomicU64::new(0),
        })
    }

    pub fn path_for(&self, key: &PadKey) -> PathBuf {
        match &self.layout {
            Layout::Dir(dir) => dir.join(format!("{}.md", key)),
            Layout::SingleFile(path) => path.clone(),
        }
    }

    /// Sibling temp path, unique per write so concurrent writers never share one.
    fn tmp_path_for(&self, path: &Path) -> PathBuf {
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "pad".to_string());
        path.with_file_name(format!(".{}.{}.{}.tmp", name, std::process::id(), n))
    }
}

#[async_trait]
impl PadStore for FsPadStore {
    async fn read(&self, key: &PadKey) -> Result<String> {
        match fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, key: &PadKey, text: &str) -> Result<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        // Write aside then rename so a reader never sees a half-written pad.
        let tmp = self.tmp_path_for(&path);
        if let Err(e) = fs::write(&tmp, text.as_bytes()).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        log::debug!("[PAD] Wrote {} bytes to {}", text.len(), path.display());
        Ok(())
    }

    fn location(&self, key: &PadKey) -> String {
        self.path_for(key).display().to_string()
    }

    fn backend_name(&self) -> &'static str {
        "fs"
    }
}
