use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of link providers a saved bookmark can be classified into.
/// `Others` is the catch-all that triggers the snapshot pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "content_type_enum")]
pub enum ContentType {
    #[sea_orm(string_value = "Youtube")]
    Youtube,
    #[sea_orm(string_value = "Twitter")]
    Twitter,
    #[sea_orm(string_value = "Instagram")]
    Instagram,
    #[sea_orm(string_value = "Facebook")]
    Facebook,
    #[sea_orm(string_value = "LinkedIn")]
    LinkedIn,
    #[sea_orm(string_value = "Others")]
    Others,
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
