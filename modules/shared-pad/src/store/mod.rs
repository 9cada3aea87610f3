//! Pad storage backends.
//!
//! A pad is one markdown document keyed by a sanitized chat id. Every backend
//! offers the same two operations: read the whole text, replace the whole
//! text. A pad that was never written reads as an empty string.

pub mod blob;
pub mod fs;
pub mod memory;

pub use blob::BlobPadStore;
pub use fs::FsPadStore;
pub use memory::MemoryPadStore;

use crate::config::BackendConfig;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Storage key a pad id collapses to when it is absent or unsafe
pub const DEFAULT_PAD_KEY: &str = "default";

/// A pad id restricted to `[A-Za-z0-9_-]`.
///
/// Safe to splice into file names and object paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PadKey(String);

impl PadKey {
    pub fn sanitize(raw: Option<&str>) -> Self {
        match raw {
            Some(id) if is_safe_id(id) => Self(id.to_string()),
            _ => Self::default(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PadKey {
    fn default() -> Self {
        Self(DEFAULT_PAD_KEY.to_string())
    }
}

impl fmt::Display for PadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[derive(Debug, thiserror::Error)]
pub enum PadStoreError {
    #[error("pad I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("blob request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("blob store returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, PadStoreError>;

/// Read/replace capability shared by every backend.
#[async_trait]
pub trait PadStore: Send + Sync {
    /// Stored text, or `""` if the pad has never been written.
    async fn read(&self, key: &PadKey) -> Result<String>;

    /// Replace the whole pad. Readers see either the old or the new text.
    async fn write(&self, key: &PadKey, text: &str) -> Result<()>;

    /// Where the pad lives, for display (file path, URL, ...).
    fn location(&self, key: &PadKey) -> String;

    fn backend_name(&self) -> &'static str;
}

/// Build the backend selected by configuration.
pub fn build_store(backend: &BackendConfig) -> Result<Arc<dyn PadStore>> {
    let store: Arc<dyn PadStore> = match backend {
        BackendConfig::Memory => Arc::new(MemoryPadStore::new()),
        BackendConfig::Fs {
            dir,
            single_file: Some(file),
        } => {
            log::info!(
                "[PAD] PAD_FILE set, ignoring PAD_DIR {} for single-file mode",
                dir.display()
            );
            Arc::new(FsPadStore::single_file(file.clone())?)
        }
        BackendConfig::Fs {
            dir,
            single_file: None,
        } => Arc::new(FsPadStore::new(dir.clone())?),
        BackendConfig::Blob(creds) => Arc::new(BlobPadStore::new(creds.clone())?),
    };
    Ok(store)
}
