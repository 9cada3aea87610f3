//! Remote blob store backend.
//!
//! Pads live at `pads/<url-encoded key>.md`. Reads hit the store's public
//! URL; writes go through the authenticated upload API with overwrite
//! allowed, so concurrent writers race and the last one wins.

use super::{PadKey, PadStore, PadStoreError, Result};
use crate::config::BlobCredentials;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;

pub const API_BASE: &str = "https://vercel.com/api/blob/";
pub const READ_TIMEOUT: Duration = Duration::from_secs(15);
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(30);
const CONTENT_TYPE: &str = "text/markdown; charset=utf-8";

pub struct BlobPadStore {
    credentials: BlobCredentials,
    public_base: String,
    api_base: String,
    client: reqwest::Client,
}

impl BlobPadStore {
    pub fn new(credentials: BlobCredentials) -> Result<Self> {
        let public_base = public_base_for(credentials.store_id());
        Self::with_endpoints(credentials, &public_base, API_BASE)
    }

    /// Point the store at explicit read/upload endpoints.
    pub fn with_endpoints(
        credentials: BlobCredentials,
        public_base: &str,
        api_base: &str,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        log::info!(
            "[BLOB] Using store {} (public base {})",
            credentials.store_id(),
            public_base
        );
        Ok(Self {
            credentials,
            public_base: public_base.trim_end_matches('/').to_string(),
            api_base: api_base.to_string(),
            client,
        })
    }

    fn object_url(&self, pathname: &str) -> String {
        format!("{}/{}", self.public_base, pathname)
    }
}

pub fn public_base_for(store_id: &str) -> String {
    format!("https://{}.public.blob.vercel-storage.com", store_id)
}

/// Object path for a pad. Encoding keeps any `/` out of the key.
pub fn pad_pathname(key: &PadKey) -> String {
    format!("pads/{}.md", urlencoding::encode(key.as_str()))
}

#[async_trait]
impl PadStore for BlobPadStore {
    async fn read(&self, key: &PadKey) -> Result<String> {
        let url = self.object_url(&pad_pathname(key));
        let resp = self
            .client
            .get(&url)
            .timeout(READ_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(String::new());
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            log::error!("[BLOB] GET {} -> HTTP {}", url, status);
            return Err(PadStoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn write(&self, key: &PadKey, text: &str) -> Result<()> {
        let pathname = pad_pathname(key);
        let resp = self
            .client
            .put(&self.api_base)
            .query(&[("pathname", pathname.as_str())])
            .bearer_auth(self.credentials.token())
            .header("x-content-type", CONTENT_TYPE)
            .header("x-allow-overwrite", "1")
            .body(text.to_string())
            .timeout(WRITE_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            log::error!("[BLOB] PUT {} -> HTTP {}", pathname, status);
            return Err(PadStoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        log::debug!("[BLOB] Stored {} ({} bytes): {}", pathname, text.len(), body);
        Ok(())
    }

    fn location(&self, key: &PadKey) -> String {
        self.object_url(&pad_pathname(key))
    }

    fn backend_name(&self) -> &'static str {
        "blob"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query, State};
    use axum::http::{HeaderMap, StatusCode as AxumStatus};
    use axum::routing::{get, put};
    use axum::{Json, Router};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    const TOKEN: &str = "vercel_blob_rw_teststore_s3cr3t";

    /// Stand-in for the blob service: public GETs plus the upload API.
    #[derive(Clone, Default)]
    struct FakeBlob {
        objects: Arc<Mutex<HashMap<String, String>>>,
        last_put_headers: Arc<Mutex<Option<HeaderMap>>>,
    }

    async fn fake_get(
        State(fake): State<FakeBlob>,
        Path(file): Path<String>,
    ) -> std::result::Result<String, AxumStatus> {
        if file == "broken.md" {
            return Err(AxumStatus::INTERNAL_SERVER_ERROR);
        }
        fake.objects
            .lock()
            .unwrap()
            .get(&format!("pads/{}", file))
            .cloned()
            .ok_or(AxumStatus::NOT_FOUND)
    }

    async fn fake_put(
        State(fake): State<FakeBlob>,
        Query(query): Query<HashMap<String, String>>,
        headers: HeaderMap,
        body: String,
    ) -> (AxumStatus, Json<serde_json::Value>) {
        let Some(pathname) = query.get("pathname").cloned() else {
            return (AxumStatus::BAD_REQUEST, Json(serde_json::json!({})));
        };
        if pathname == "pads/locked.md" {
            return (
                AxumStatus::FORBIDDEN,
                Json(serde_json::json!({"error": "forbidden"})),
            );
        }
        *fake.last_put_headers.lock().unwrap() = Some(headers);
        fake.objects.lock().unwrap().insert(pathname.clone(), body);
        (
            AxumStatus::OK,
            Json(serde_json::json!({ "pathname": pathname })),
        )
    }

    async fn spawn_fake() -> (FakeBlob, BlobPadStore) {
        let fake = FakeBlob::default();
        let app = Router::new()
            .route("/pads/:file", get(fake_get))
            .route("/api/blob/", put(fake_put))
            .with_state(fake.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let store = BlobPadStore::with_endpoints(
            BlobCredentials::parse(TOKEN).unwrap(),
            &format!("http://{}/", addr),
            &format!("http://{}/api/blob/", addr),
        )
        .unwrap();
        (fake, store)
    }

    fn key(id: &str) -> PadKey {
        PadKey::sanitize(Some(id))
    }

    #[test]
    fn test_pathname_and_public_base() {
        assert_eq!(pad_pathname(&key("chat-1")), "pads/chat-1.md");
        assert_eq!(pad_pathname(&PadKey::sanitize(None)), "pads/default.md");
        assert_eq!(
            public_base_for("AbC"),
            "https://AbC.public.blob.vercel-storage.com"
        );
    }

    #[test]
    fn test_location_is_public_object_url() {
        let store = BlobPadStore::new(BlobCredentials::parse(TOKEN).unwrap()).unwrap();
        assert_eq!(
            store.location(&key("abc")),
            "https://teststore.public.blob.vercel-storage.com/pads/abc.md"
        );
    }

    #[tokio::test]
    async fn test_missing_object_reads_empty() {
        let (_fake, store) = spawn_fake().await;
        assert_eq!(store.read(&key("never-seen")).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_existing_object_returns_exact_body() {
        let (fake, store) = spawn_fake().await;
        fake.objects
            .lock()
            .unwrap()
            .insert("pads/abc.md".to_string(), "# hi\n\nthere ✓\n".to_string());
        assert_eq!(store.read(&key("abc")).await.unwrap(), "# hi\n\nthere ✓\n");
    }

    #[tokio::test]
    async fn test_server_error_on_read_propagates() {
        let (_fake, store) = spawn_fake().await;
        match store.read(&key("broken")).await {
            Err(PadStoreError::Status { status, .. }) => assert_eq!(status, 500),
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_write_sends_auth_and_overwrite_headers() {
        let (fake, store) = spawn_fake().await;
        store.write(&key("abc"), "hello").await.unwrap();

        assert_eq!(
            fake.objects.lock().unwrap().get("pads/abc.md").cloned(),
            Some("hello".to_string())
        );
        let headers = fake.last_put_headers.lock().unwrap().clone().unwrap();
        assert_eq!(
            headers.get("authorization").unwrap(),
            &format!("Bearer {}", TOKEN)
        );
        assert_eq!(headers.get("x-allow-overwrite").unwrap(), "1");
        assert_eq!(
            headers.get("x-content-type").unwrap(),
            "text/markdown; charset=utf-8"
        );

        assert_eq!(store.read(&key("abc")).await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_rejected_write_propagates() {
        let (_fake, store) = spawn_fake().await;
        match store.write(&key("locked"), "nope").await {
            Err(PadStoreError::Status { status, body }) => {
                assert_eq!(status, 403);
                assert!(body.contains("forbidden"));
            }
            other => panic!("expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_store_is_an_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let store = BlobPadStore::with_endpoints(
            BlobCredentials::parse(TOKEN).unwrap(),
            &format!("http://{}", addr),
            &format!("http://{}/api/blob/", addr),
        )
        .unwrap();
        assert!(matches!(
            store.read(&key("abc")).await,
            Err(PadStoreError::Http(_))
        ));
    }
}
