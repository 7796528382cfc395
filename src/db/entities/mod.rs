//! SeaORM entities, one module per table.

pub mod content;
pub mod content_tag;
pub mod share_link;
pub mod tag;
pub mod user;

// Prelude module for easy importing of all entities and their related types
pub mod prelude {
    pub use super::user::Entity as User;
    pub use super::user::Model as UserModel;

    pub use super::content::Entity as Content;
    pub use super::content::Model as ContentModel;

    pub use super::tag::Entity as Tag;
    pub use super::tag::Model as TagModel;

    pub use super::content_tag::Entity as ContentTag;
    pub use super::content_tag::Model as ContentTagModel;

    pub use super::share_link::Entity as ShareLink;
    pub use super::share_link::Model as ShareLinkModel;
}
