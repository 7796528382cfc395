use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set,
};

use super::is_unique_violation;
use crate::db::entities::{content_tag, tag};

/// Resolves a label to its canonical tag row: fetch by name, create if
/// missing. A concurrent create of the same name surfaces as a unique
/// violation and resolves to a re-fetch, so duplicate labels always land on
/// one row.
async fn find_or_create_tag<C: ConnectionTrait>(conn: &C, name: &str) -> Result<tag::Model, DbErr> {
    if let Some(existing) = tag::Entity::find()
        .filter(tag::Column::Name.eq(name))
        .one(conn)
        .await?
    {
        return Ok(existing);
    }

    let inserted = tag::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(conn)
    .await;

    match inserted {
        Ok(model) => Ok(model),
        Err(err) if is_unique_violation(&err) => tag::Entity::find()
            .filter(tag::Column::Name.eq(name))
            .one(conn)
            .await?
            .ok_or_else(|| DbErr::Custom(format!("tag '{name}' missing after unique conflict"))),
        Err(err) => Err(err),
    }
}

/// Attaches tag labels to a content row, creating missing tags on the way.
/// Labels are lower-cased and trimmed; blanks are dropped; re-attaching an
/// already-linked tag is a no-op. Returns the resolved tag set.
pub async fn attach_tags<C: ConnectionTrait>(
    conn: &C,
    content_id: i32,
    labels: &[String],
) -> Result<Vec<tag::Model>, DbErr> {
    let mut tags: Vec<tag::Model> = Vec::with_capacity(labels.len());

    for label in labels {
        let name = label.trim().to_lowercase();
        if name.is_empty() || tags.iter().any(|t| t.name == name) {
            continue;
        }

        let tag = find_or_create_tag(conn, &name).await?;

        content_tag::Entity::insert(content_tag::ActiveModel {
            content_id: Set(content_id),
            tag_id: Set(tag.id),
        })
        .on_conflict(
            OnConflict::columns([content_tag::Column::ContentId, content_tag::Column::TagId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;

        tags.push(tag);
    }

    Ok(tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn rust_tag() -> tag::Model {
        tag::Model {
            id: 11,
            name: "rust".to_string(),
        }
    }

    #[tokio::test]
    async fn existing_tag_is_linked_not_duplicated() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![rust_tag()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let tags = attach_tags(&db, 5, &["Rust".to_string()]).await.unwrap();

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].id, 11);
        assert_eq!(tags[0].name, "rust");
    }

    #[tokio::test]
    async fn missing_tag_is_created() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            // lookup misses, then the insert returns the fresh row
            .append_query_results([Vec::<tag::Model>::new(), vec![rust_tag()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let tags = attach_tags(&db, 5, &["rust".to_string()]).await.unwrap();

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "rust");
    }

    #[tokio::test]
    async fn duplicate_labels_resolve_to_one_tag_per_request() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![rust_tag()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        // "Rust" and " rust " normalize to the same label; the second one is
        // dropped before it touches the database.
        let tags = attach_tags(&db, 5, &["Rust".to_string(), " rust ".to_string()])
            .await
            .unwrap();

        assert_eq!(tags.len(), 1);
    }

    #[tokio::test]
    async fn blank_labels_are_dropped() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let tags = attach_tags(&db, 5, &["   ".to_string()]).await.unwrap();

        assert!(tags.is_empty());
    }
}
