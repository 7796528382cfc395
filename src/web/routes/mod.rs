pub mod auth_routes;
pub mod content_routes;
pub mod share_routes;
