use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::entities::{content, tag, user};
use crate::db::enums::ContentType;

/// Envelope every successful response uses: a human-readable message plus
/// the payload.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i32,
    pub username: String,
}

// JWT Claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub user_id: i32,
    pub exp: usize,
}

/// Authenticated user details, passed along as a request extension.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateContentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: String,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct ListContentQuery {
    #[serde(rename = "type")]
    pub content_type: Option<ContentType>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteContentRequest {
    pub content_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct ShareToggleRequest {
    pub shareable: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareLinkResponse {
    pub link_hash: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub link: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Only present in the "deleted" listing; active listings omit it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

impl ContentResponse {
    /// Active-listing shape: tags flattened to names, `deletedAt` omitted.
    pub fn from_active(content: content::Model, tags: Vec<tag::Model>) -> Self {
        Self::build(content, tags, false)
    }

    /// Deleted-listing shape: includes the `deletedAt` stamp.
    pub fn from_deleted(content: content::Model, tags: Vec<tag::Model>) -> Self {
        Self::build(content, tags, true)
    }

    fn build(content: content::Model, tags: Vec<tag::Model>, keep_deleted_at: bool) -> Self {
        Self {
            id: content.id,
            user_id: content.user_id,
            title: content.title,
            description: content.description,
            link: content.link,
            content_type: content.content_type,
            thumbnail: content.thumbnail,
            created_at: content.created_at,
            deleted_at: if keep_deleted_at {
                content.deleted_at
            } else {
                None
            },
            tags: tags.into_iter().map(|tag| tag.name).collect(),
        }
    }
}

/// Owner identity exposed on a published view; the credential stays out.
#[derive(Debug, Serialize)]
pub struct ShareOwner {
    pub id: i32,
    pub username: String,
}

impl From<user::Model> for ShareOwner {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareViewResponse {
    pub hash: String,
    pub user: ShareOwner,
    pub contents: Vec<ContentResponse>,
}
