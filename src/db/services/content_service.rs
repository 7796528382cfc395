use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, QueryTrait, Set, TransactionTrait,
};

use super::tag_service;
use crate::db::entities::{content, tag};
use crate::db::enums::ContentType;

/// Field set for a fully resolved bookmark, ready to persist. The link is
/// already normalized and the title already carries any derived fallback.
pub struct NewContent {
    pub user_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub link: String,
    pub content_type: ContentType,
    pub thumbnail: Option<String>,
}

pub type ContentWithTags = (content::Model, Vec<tag::Model>);

/// Persists a content row together with its tag attachments in one
/// transaction, so partial tag linkage never leaves a half-created bookmark
/// behind.
pub async fn create_content(
    db: &DatabaseConnection,
    new: NewContent,
    tag_labels: &[String],
) -> Result<ContentWithTags, DbErr> {
    let txn = db.begin().await?;

    let content = content::ActiveModel {
        user_id: Set(new.user_id),
        title: Set(new.title),
        description: Set(new.description),
        link: Set(new.link),
        content_type: Set(new.content_type),
        thumbnail: Set(new.thumbnail),
        deleted_at: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let tags = tag_service::attach_tags(&txn, content.id, tag_labels).await?;

    txn.commit().await?;
    Ok((content, tags))
}

/// Live bookmarks for a user, newest first, optionally narrowed to one
/// provider, with their tags.
pub async fn list_active(
    db: &DatabaseConnection,
    user_id: i32,
    content_type: Option<ContentType>,
) -> Result<Vec<ContentWithTags>, DbErr> {
    content::Entity::find()
        .filter(content::Column::UserId.eq(user_id))
        .filter(content::Column::DeletedAt.is_null())
        .apply_if(content_type, |query, ct| {
            query.filter(content::Column::ContentType.eq(ct))
        })
        .order_by_desc(content::Column::CreatedAt)
        .find_with_related(tag::Entity)
        .all(db)
        .await
}

/// Soft-deleted bookmarks, kept around for audit/restore.
pub async fn list_deleted(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<ContentWithTags>, DbErr> {
    content::Entity::find()
        .filter(content::Column::UserId.eq(user_id))
        .filter(content::Column::DeletedAt.is_not_null())
        .order_by_desc(content::Column::CreatedAt)
        .find_with_related(tag::Entity)
        .all(db)
        .await
}

/// Stamps `deleted_at` on a bookmark the user owns. Returns `None` when the
/// row does not exist or belongs to someone else; the row itself is never
/// removed.
pub async fn soft_delete(
    db: &DatabaseConnection,
    user_id: i32,
    content_id: i32,
) -> Result<Option<ContentWithTags>, DbErr> {
    let Some(existing) = content::Entity::find_by_id(content_id)
        .filter(content::Column::UserId.eq(user_id))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let mut active: content::ActiveModel = existing.into();
    active.deleted_at = Set(Some(Utc::now()));
    let updated = active.update(db).await?;

    let tags = updated.find_related(tag::Entity).all(db).await?;
    Ok(Some((updated, tags)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn saved_content() -> content::Model {
        content::Model {
            id: 42,
            user_id: 7,
            title: "Example".to_string(),
            description: None,
            link: "https://example.org".to_string(),
            content_type: ContentType::Others,
            thumbnail: None,
            deleted_at: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_without_tags_persists_the_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![saved_content()]])
            .into_connection();

        let (content, tags) = create_content(
            &db,
            NewContent {
                user_id: 7,
                title: "Example".to_string(),
                description: None,
                link: "https://example.org".to_string(),
                content_type: ContentType::Others,
                thumbnail: None,
            },
            &[],
        )
        .await
        .unwrap();

        assert_eq!(content.id, 42);
        assert!(tags.is_empty());
    }

    #[tokio::test]
    async fn soft_delete_misses_on_foreign_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<content::Model>::new()])
            .into_connection();

        let result = soft_delete(&db, 7, 42).await.unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn soft_delete_stamps_deleted_at() {
        let mut deleted = saved_content();
        deleted.deleted_at = Some(Utc::now());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![saved_content()]])
            .append_query_results([vec![deleted.clone()]])
            .append_query_results([Vec::<tag::Model>::new()])
            .into_connection();

        let (content, tags) = soft_delete(&db, 7, 42).await.unwrap().unwrap();

        assert!(content.deleted_at.is_some());
        assert!(tags.is_empty());
    }
}
