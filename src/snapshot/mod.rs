//! Render-and-capture pipeline for links no provider rule recognizes.
//!
//! The renderer produces image bytes and a best-effort page title; the blob
//! store publishes the image and hands back its public address. Both sit
//! behind traits so the ingestion flow never knows which backend is active.

use thiserror::Error;

pub mod renderer;
pub mod storage;

pub use renderer::{PageRenderer, RemoteRenderer, Snapshot};
pub use storage::{BlobStore, HttpBlobStore};

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to render page: {0}")]
    Render(String),
    #[error("Failed to publish thumbnail: {0}")]
    Upload(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// A published snapshot: where the thumbnail ended up, plus the page title
/// when one was recovered.
pub struct StoredSnapshot {
    pub thumbnail_url: String,
    pub page_title: Option<String>,
}

/// Composes the renderer and the blob store into one capture step.
pub struct SnapshotService {
    renderer: Box<dyn PageRenderer>,
    store: Box<dyn BlobStore>,
}

impl SnapshotService {
    pub fn new(renderer: Box<dyn PageRenderer>, store: Box<dyn BlobStore>) -> Self {
        Self { renderer, store }
    }

    /// Renders `url` and publishes the captured image under the owner's
    /// thumbnail key. The caller-supplied title wins for the object key; the
    /// recovered page title rides along for the caller to fall back on.
    pub async fn capture_and_store(
        &self,
        user_id: i32,
        title_hint: Option<&str>,
        url: &str,
    ) -> Result<StoredSnapshot, SnapshotError> {
        let snapshot = self.renderer.capture(url).await?;

        let key_title = title_hint
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .or_else(|| snapshot.title.clone())
            .unwrap_or_default();
        let key = thumbnail_key(user_id, &key_title);

        let thumbnail_url = self.store.put(&key, snapshot.image, "image/png").await?;

        Ok(StoredSnapshot {
            thumbnail_url,
            page_title: snapshot.title,
        })
    }
}

/// `user_<id>/thumbnails/<title>.png`, whitespace flattened to underscores.
fn thumbnail_key(user_id: i32, title: &str) -> String {
    let sanitized = title.split_whitespace().collect::<Vec<_>>().join("_");
    let sanitized = if sanitized.is_empty() {
        "untitled"
    } else {
        sanitized.as_str()
    };
    format!("user_{user_id}/thumbnails/{sanitized}.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct StaticRenderer {
        title: Option<String>,
    }

    #[async_trait]
    impl PageRenderer for StaticRenderer {
        async fn capture(&self, _url: &str) -> Result<Snapshot, SnapshotError> {
            Ok(Snapshot {
                image: vec![0x89, 0x50, 0x4e, 0x47],
                title: self.title.clone(),
            })
        }
    }

    /// Echoes the key back in the URL so tests can observe it.
    struct EchoStore;

    #[async_trait]
    impl BlobStore for EchoStore {
        async fn put(
            &self,
            key: &str,
            _bytes: Vec<u8>,
            _content_type: &str,
        ) -> Result<String, SnapshotError> {
            Ok(format!("https://cdn.example.com/{key}"))
        }
    }

    #[test]
    fn thumbnail_key_sanitizes_whitespace() {
        assert_eq!(
            thumbnail_key(7, "My Saved Page"),
            "user_7/thumbnails/My_Saved_Page.png"
        );
    }

    #[test]
    fn thumbnail_key_falls_back_when_title_is_blank() {
        assert_eq!(thumbnail_key(7, "   "), "user_7/thumbnails/untitled.png");
        assert_eq!(thumbnail_key(7, ""), "user_7/thumbnails/untitled.png");
    }

    #[tokio::test]
    async fn caller_title_wins_for_the_object_key() {
        let service = SnapshotService::new(
            Box::new(StaticRenderer {
                title: Some("Derived Title".to_string()),
            }),
            Box::new(EchoStore),
        );

        let stored = service
            .capture_and_store(3, Some("my bookmark"), "https://example.org")
            .await
            .unwrap();

        assert_eq!(
            stored.thumbnail_url,
            "https://cdn.example.com/user_3/thumbnails/my_bookmark.png"
        );
        assert_eq!(stored.page_title.as_deref(), Some("Derived Title"));
    }

    #[tokio::test]
    async fn derived_title_is_used_when_caller_gave_none() {
        let service = SnapshotService::new(
            Box::new(StaticRenderer {
                title: Some("Derived Title".to_string()),
            }),
            Box::new(EchoStore),
        );

        let stored = service
            .capture_and_store(3, None, "https://example.org")
            .await
            .unwrap();

        assert_eq!(
            stored.thumbnail_url,
            "https://cdn.example.com/user_3/thumbnails/Derived_Title.png"
        );
    }
}
