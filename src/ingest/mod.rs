//! Content ingestion: the path from a raw user-supplied link to a persisted,
//! tagged bookmark.

use sea_orm::DatabaseConnection;

pub mod classify;
pub mod url;

pub use classify::classify;
pub use url::{NormalizedUrl, normalize_url};

use crate::db::enums::ContentType;
use crate::db::services::content_service::{self, ContentWithTags, NewContent};
use crate::snapshot::SnapshotService;
use crate::web::error::AppError;
use crate::web::models::CreateContentRequest;

/// Drives "save a bookmark" end to end: validate the link, classify its
/// provider, snapshot pages no rule recognizes, resolve the title, and
/// persist the row with its tags.
///
/// Built once at startup and shared across requests; the snapshot pipeline
/// is optional so a deployment without a rendering backend still saves
/// bookmarks (just without thumbnails).
pub struct ContentIngestor {
    snapshots: Option<SnapshotService>,
    extended_provider_rules: bool,
}

impl ContentIngestor {
    pub fn new(snapshots: Option<SnapshotService>, extended_provider_rules: bool) -> Self {
        Self {
            snapshots,
            extended_provider_rules,
        }
    }

    pub async fn ingest(
        &self,
        db: &DatabaseConnection,
        user_id: i32,
        req: CreateContentRequest,
    ) -> Result<ContentWithTags, AppError> {
        // Reject bad links before any side effect.
        let normalized = normalize_url(&req.link);
        if !normalized.is_valid {
            return Err(AppError::InvalidLink);
        }
        let link = normalized.url;

        let content_type = classify(&link, self.extended_provider_rules);

        let mut thumbnail = None;
        let mut derived_title = None;
        if content_type == ContentType::Others {
            match &self.snapshots {
                Some(snapshots) => {
                    match snapshots
                        .capture_and_store(user_id, req.title.as_deref(), &link)
                        .await
                    {
                        Ok(stored) => {
                            thumbnail = Some(stored.thumbnail_url);
                            derived_title = stored.page_title;
                        }
                        // Degrade: the bookmark is still saved, just without
                        // a thumbnail or derived title.
                        Err(err) => {
                            tracing::warn!(%link, error = %err, "snapshot failed; storing content without thumbnail");
                        }
                    }
                }
                None => {
                    tracing::debug!(%link, "snapshot pipeline not configured; skipping thumbnail");
                }
            }
        }

        let title = resolve_title(req.title, derived_title);
        let tag_labels = req.tags.unwrap_or_default();

        let created = content_service::create_content(
            db,
            NewContent {
                user_id,
                title,
                description: req.description,
                link,
                content_type,
                thumbnail,
            },
            &tag_labels,
        )
        .await?;

        Ok(created)
    }
}

/// The caller-supplied title wins; the title recovered by the renderer is
/// the fallback. May legitimately end up empty.
fn resolve_title(supplied: Option<String>, derived: Option<String>) -> String {
    supplied
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .or(derived)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::db::entities::content;
    use crate::snapshot::{BlobStore, PageRenderer, Snapshot, SnapshotError};

    struct FailingRenderer;

    #[async_trait]
    impl PageRenderer for FailingRenderer {
        async fn capture(&self, _url: &str) -> Result<Snapshot, SnapshotError> {
            Err(SnapshotError::Render("boom".to_string()))
        }
    }

    struct UnreachableRenderer;

    #[async_trait]
    impl PageRenderer for UnreachableRenderer {
        async fn capture(&self, _url: &str) -> Result<Snapshot, SnapshotError> {
            panic!("renderer must not run for recognized providers");
        }
    }

    struct UnreachableStore;

    #[async_trait]
    impl BlobStore for UnreachableStore {
        async fn put(
            &self,
            _key: &str,
            _bytes: Vec<u8>,
            _content_type: &str,
        ) -> Result<String, SnapshotError> {
            panic!("nothing to upload when rendering failed");
        }
    }

    fn saved(content_type: ContentType, thumbnail: Option<String>) -> content::Model {
        content::Model {
            id: 1,
            user_id: 7,
            title: "saved".to_string(),
            description: None,
            link: "https://example.org".to_string(),
            content_type,
            thumbnail,
            deleted_at: None,
            created_at: chrono::Utc::now(),
        }
    }

    fn request(link: &str) -> CreateContentRequest {
        CreateContentRequest {
            title: Some("saved".to_string()),
            description: None,
            link: link.to_string(),
            tags: None,
        }
    }

    #[tokio::test]
    async fn invalid_link_fails_before_any_side_effect() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let ingestor = ContentIngestor::new(None, false);

        let result = ingestor.ingest(&db, 7, request("ftp://x")).await;

        assert!(matches!(result, Err(AppError::InvalidLink)));
        // Nothing reached the database.
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn snapshot_failure_degrades_to_no_thumbnail() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![saved(ContentType::Others, None)]])
            .into_connection();
        let snapshots = SnapshotService::new(Box::new(FailingRenderer), Box::new(UnreachableStore));
        let ingestor = ContentIngestor::new(Some(snapshots), false);

        let (content, tags) = ingestor
            .ingest(&db, 7, request("https://example.org"))
            .await
            .unwrap();

        assert_eq!(content.content_type, ContentType::Others);
        assert!(tags.is_empty());
    }

    #[tokio::test]
    async fn recognized_providers_skip_the_renderer() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![saved(ContentType::Youtube, None)]])
            .into_connection();
        let snapshots =
            SnapshotService::new(Box::new(UnreachableRenderer), Box::new(UnreachableStore));
        let ingestor = ContentIngestor::new(Some(snapshots), false);

        let (content, _) = ingestor
            .ingest(&db, 7, request("https://youtu.be/abc"))
            .await
            .unwrap();

        assert_eq!(content.content_type, ContentType::Youtube);
    }

    #[tokio::test]
    async fn missing_pipeline_still_saves_generic_links() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![saved(ContentType::Others, None)]])
            .into_connection();
        let ingestor = ContentIngestor::new(None, false);

        let result = ingestor.ingest(&db, 7, request("https://example.org")).await;

        assert!(result.is_ok());
    }

    #[test]
    fn supplied_title_beats_derived_title() {
        assert_eq!(
            resolve_title(Some("mine".to_string()), Some("theirs".to_string())),
            "mine"
        );
    }

    #[test]
    fn blank_supplied_title_falls_back_to_derived() {
        assert_eq!(
            resolve_title(Some("   ".to_string()), Some("theirs".to_string())),
            "theirs"
        );
        assert_eq!(resolve_title(None, Some("theirs".to_string())), "theirs");
    }

    #[test]
    fn title_may_end_up_empty() {
        assert_eq!(resolve_title(None, None), "");
    }
}
