//! Pad read/write on top of a store, with optional frontmatter decoration.

use crate::frontmatter::{self, PadFrontmatter};
use crate::store::{PadKey, PadStore, Result};
use std::sync::Arc;

pub struct PadService {
    store: Arc<dyn PadStore>,
    frontmatter: bool,
}

impl PadService {
    pub fn new(store: Arc<dyn PadStore>, frontmatter: bool) -> Self {
        Self { store, frontmatter }
    }

    /// Current pad text for `chat_id` (empty if never written).
    pub async fn get(&self, chat_id: Option<&str>) -> Result<String> {
        let key = PadKey::sanitize(chat_id);
        let text = self.store.read(&key).await?;
        if !self.frontmatter {
            return Ok(text);
        }
        Ok(self.decorate(&key, &text, None))
    }

    /// Replace the pad and return the text to echo back to the client.
    ///
    /// With frontmatter on, a block the client sent back is dropped before
    /// storing, and the echo reports the previous length.
    pub async fn set(&self, chat_id: Option<&str>, text: &str) -> Result<String> {
        let key = PadKey::sanitize(chat_id);
        if !self.frontmatter {
            self.store.write(&key, text).await?;
            log::debug!("[PAD] Set {} ({} chars)", key, text.chars().count());
            return Ok(text.to_string());
        }

        let previous = self.store.read(&key).await?;
        let old_length = frontmatter::content_length(frontmatter::strip_frontmatter(&previous));
        let body = frontmatter::strip_frontmatter(text);
        self.store.write(&key, body).await?;
        log::debug!("[PAD] Set {} ({} -> {} chars)", key, old_length, body.chars().count());

        Ok(self.decorate(&key, body, Some(old_length)))
    }

    fn decorate(&self, key: &PadKey, text: &str, old_content_length: Option<usize>) -> String {
        let location = self.store.location(key);
        frontmatter::decorate(
            &PadFrontmatter {
                chat_id: key.as_str(),
                file_path: &location,
                old_content_length,
            },
            text,
        )
    }
}
