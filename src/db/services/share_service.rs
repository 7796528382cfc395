use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::content_service::{self, ContentWithTags};
use super::is_unique_violation;
use crate::db::entities::{share_link, user};

/// Creates the user's share link on the first toggle; afterwards only the
/// flag flips. The hash token is generated once and survives every toggle.
pub async fn set_shareable(
    db: &DatabaseConnection,
    user_id: i32,
    is_shared: bool,
) -> Result<share_link::Model, DbErr> {
    if let Some(existing) = find_by_user(db, user_id).await? {
        return update_flag(db, existing, is_shared).await;
    }

    let created = share_link::ActiveModel {
        user_id: Set(user_id),
        hash: Set(Uuid::new_v4().simple().to_string()),
        is_shared: Set(is_shared),
        ..Default::default()
    }
    .insert(db)
    .await;

    match created {
        Ok(model) => Ok(model),
        // Concurrent first toggles race on the unique owner index; the loser
        // flips the flag on the winner's row instead.
        Err(err) if is_unique_violation(&err) => {
            let existing = find_by_user(db, user_id).await?.ok_or_else(|| {
                DbErr::Custom("share link missing after unique conflict".to_string())
            })?;
            update_flag(db, existing, is_shared).await
        }
        Err(err) => Err(err),
    }
}

/// The published view behind a hash: the owner plus their live bookmarks.
/// An unknown hash and an unpublished link are indistinguishable — both
/// resolve to `None`.
pub async fn resolve_share(
    db: &DatabaseConnection,
    hash: &str,
) -> Result<Option<(share_link::Model, user::Model, Vec<ContentWithTags>)>, DbErr> {
    let Some(link) = share_link::Entity::find()
        .filter(share_link::Column::Hash.eq(hash))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    if !link.is_shared {
        return Ok(None);
    }

    let Some(owner) = user::Entity::find_by_id(link.user_id).one(db).await? else {
        return Ok(None);
    };

    let contents = content_service::list_active(db, owner.id, None).await?;
    Ok(Some((link, owner, contents)))
}

async fn find_by_user(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Option<share_link::Model>, DbErr> {
    share_link::Entity::find()
        .filter(share_link::Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// Flips `is_shared` in place; the hash is never touched.
async fn update_flag(
    db: &DatabaseConnection,
    model: share_link::Model,
    is_shared: bool,
) -> Result<share_link::Model, DbErr> {
    let mut active: share_link::ActiveModel = model.into();
    active.is_shared = Set(is_shared);
    active.update(db).await
}
