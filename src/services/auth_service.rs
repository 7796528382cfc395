use axum::Extension;
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};

use crate::db::entities::user;
use crate::db::services::is_unique_violation;
use crate::web::error::{AppError, FieldError};
use crate::web::models::{
    AuthenticatedUser, Claims, LoginRequest, LoginResponse, RegisterRequest, UserResponse,
};

const USERNAME_MIN: usize = 4;
const USERNAME_MAX: usize = 15;
const PASSWORD_MIN: usize = 8;
const PASSWORD_MAX: usize = 20;

/// Validates the credential pair, collecting per-field errors so the caller
/// sees everything wrong with the request at once.
fn validate_credentials(username: &str, password: &str) -> Result<(), AppError> {
    let mut errors = Vec::new();

    let username_len = username.chars().count();
    if username_len < USERNAME_MIN {
        errors.push(FieldError {
            field: "username",
            message: "username is too short".to_string(),
        });
    } else if username_len > USERNAME_MAX {
        errors.push(FieldError {
            field: "username",
            message: "username is too long".to_string(),
        });
    }

    let password_len = password.chars().count();
    if password_len < PASSWORD_MIN {
        errors.push(FieldError {
            field: "password",
            message: format!("password should be at least {PASSWORD_MIN} characters"),
        });
    } else if password_len > PASSWORD_MAX {
        errors.push(FieldError {
            field: "password",
            message: format!("password should be at most {PASSWORD_MAX} characters"),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationFailed(errors))
    }
}

pub async fn register_user(
    db: &DatabaseConnection,
    req: RegisterRequest,
) -> Result<UserResponse, AppError> {
    validate_credentials(&req.username, &req.password)?;

    let existing: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(&req.username))
        .one(db)
        .await
        .map_err(|e: DbErr| AppError::DatabaseError(format!("failed to check username: {e}")))?;

    if existing.is_some() {
        return Err(AppError::UserAlreadyExists("Username already taken".to_string()));
    }

    let password_hash = hash(&req.password, DEFAULT_COST)
        .map_err(|e| AppError::PasswordHashingError(format!("password hashing failed: {e}")))?;

    let new_user = user::ActiveModel {
        username: Set(req.username.clone()),
        password_hash: Set(password_hash),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    match new_user.insert(db).await {
        Ok(user_model) => Ok(UserResponse {
            id: user_model.id,
            username: user_model.username,
        }),
        // Two concurrent signups with the same name race on the unique
        // index; the loser gets the same answer as the sequential case.
        Err(err) if is_unique_violation(&err) => {
            Err(AppError::UserAlreadyExists("Username already taken".to_string()))
        }
        Err(err) => Err(AppError::DatabaseError(format!("failed to create user: {err}"))),
    }
}

pub async fn login_user(
    db: &DatabaseConnection,
    req: LoginRequest,
    jwt_secret: &str,
) -> Result<LoginResponse, AppError> {
    validate_credentials(&req.username, &req.password)?;

    let user_model = user::Entity::find()
        .filter(user::Column::Username.eq(&req.username))
        .one(db)
        .await
        .map_err(|e: DbErr| AppError::DatabaseError(format!("failed to look up user: {e}")))?;

    let user = match user_model {
        Some(u) => u,
        None => return Err(AppError::UserNotFound),
    };

    let valid_password = verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("password verification failed: {e}")))?;

    if !valid_password {
        return Err(AppError::InvalidCredentials);
    }

    create_jwt_for_user(&user, jwt_secret)
}

pub fn create_jwt_for_user(
    user: &user::Model,
    jwt_secret: &str,
) -> Result<LoginResponse, AppError> {
    let now = Utc::now();
    let expiration = (now + Duration::hours(1)).timestamp() as usize;

    let claims = Claims {
        sub: user.username.clone(),
        user_id: user.id,
        exp: expiration,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::TokenCreationError(format!("failed to issue token: {e}")))?;

    Ok(LoginResponse {
        token,
        user_id: user.id,
        username: user.username.clone(),
    })
}

pub async fn me(
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<axum::Json<UserResponse>, AppError> {
    Ok(axum::Json(UserResponse {
        id: user.id,
        username: user.username,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn signup_rejects_short_username_before_touching_the_database() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = register_user(
            &db,
            RegisterRequest {
                username: "abc".to_string(),
                password: "long-enough-pw".to_string(),
            },
        )
        .await;

        match result {
            Err(AppError::ValidationFailed(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "username");
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn signup_reports_all_bad_fields_at_once() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let result = register_user(
            &db,
            RegisterRequest {
                username: "ab".to_string(),
                password: "short".to_string(),
            },
        )
        .await;

        match result {
            Err(AppError::ValidationFailed(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec!["username", "password"]);
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn signup_refuses_taken_usernames() {
        let existing = user::Model {
            id: 1,
            username: "somebody".to_string(),
            password_hash: "$2b$irrelevant".to_string(),
            created_at: Utc::now(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![existing]])
            .into_connection();

        let result = register_user(
            &db,
            RegisterRequest {
                username: "somebody".to_string(),
                password: "long-enough-pw".to_string(),
            },
        )
        .await;

        assert!(matches!(result, Err(AppError::UserAlreadyExists(_))));
    }

    #[test]
    fn issued_tokens_round_trip() {
        use jsonwebtoken::{DecodingKey, Validation, decode};

        let user = user::Model {
            id: 9,
            username: "somebody".to_string(),
            password_hash: "$2b$irrelevant".to_string(),
            created_at: Utc::now(),
        };

        let response = create_jwt_for_user(&user, "test-secret").unwrap();
        let decoded = decode::<Claims>(
            &response.token,
            &DecodingKey::from_secret("test-secret".as_ref()),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(decoded.claims.user_id, 9);
        assert_eq!(decoded.claims.sub, "somebody");
    }
}
