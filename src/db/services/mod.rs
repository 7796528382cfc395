use sea_orm::DbErr;

pub mod content_service;
pub mod share_service;
pub mod tag_service;

/// True when `err` is a database unique-constraint violation. Unique indexes
/// are the race arbiter for tag names and share-link owners; callers catch
/// this and re-fetch the canonical row instead of failing.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    let runtime_err = match err {
        DbErr::Query(runtime_err) | DbErr::Exec(runtime_err) => runtime_err,
        _ => return false,
    };
    match runtime_err {
        sea_orm::RuntimeErr::SqlxError(sqlx::Error::Database(db_err)) => {
            db_err.is_unique_violation()
        }
        _ => false,
    }
}
