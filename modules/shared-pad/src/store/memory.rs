//! In-process pad store. Contents are lost on restart.

use super::{PadKey, PadStore, Result};
use async_trait::async_trait;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct MemoryPadStore {
    pads: DashMap<PadKey, String>,
}

impl MemoryPadStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PadStore for MemoryPadStore {
    async fn read(&self, key: &PadKey) -> Result<String> {
        Ok(self
            .pads
            .get(key)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }

    async fn write(&self, key: &PadKey, text: &str) -> Result<()> {
        self.pads.insert(key.clone(), text.to_string());
        Ok(())
    }

    fn location(&self, key: &PadKey) -> String {
        format!("memory://{}", key)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
