use std::env;

#[derive(Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub database_url: String,
    pub jwt_secret: String,
    /// Enables the Facebook/LinkedIn classification rules.
    pub extended_provider_rules: bool,
    /// Absent when no rendering backend is configured; bookmarks are then
    /// saved without thumbnails.
    pub snapshot: Option<SnapshotConfig>,
}

#[derive(Clone)]
pub struct SnapshotConfig {
    pub screenshot_api_url: String,
    pub screenshot_api_key: String,
    pub blob_endpoint: String,
    pub blob_public_base_url: String,
    pub blob_api_token: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set".to_string())?;

        let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let extended_provider_rules = env::var("EXTENDED_PROVIDER_RULES")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let snapshot = SnapshotConfig::from_env()?;

        Ok(ServerConfig {
            bind_address,
            database_url,
            jwt_secret,
            extended_provider_rules,
            snapshot,
        })
    }
}

impl SnapshotConfig {
    /// All-or-nothing: the pipeline is only enabled when the renderer and
    /// the blob store are both configured.
    fn from_env() -> Result<Option<Self>, String> {
        let screenshot_api_url = env::var("SCREENSHOT_API_URL").ok();
        let screenshot_api_key = env::var("SCREENSHOT_API_KEY").ok();
        let blob_endpoint = env::var("BLOB_STORE_ENDPOINT").ok();
        let blob_public_base_url = env::var("BLOB_PUBLIC_BASE_URL").ok();

        match (
            screenshot_api_url,
            screenshot_api_key,
            blob_endpoint,
            blob_public_base_url,
        ) {
            (None, None, None, None) => Ok(None),
            (
                Some(screenshot_api_url),
                Some(screenshot_api_key),
                Some(blob_endpoint),
                Some(blob_public_base_url),
            ) => Ok(Some(SnapshotConfig {
                screenshot_api_url,
                screenshot_api_key,
                blob_endpoint,
                blob_public_base_url,
                blob_api_token: env::var("BLOB_API_TOKEN").ok(),
            })),
            _ => Err(
                "SCREENSHOT_API_URL, SCREENSHOT_API_KEY, BLOB_STORE_ENDPOINT and \
                 BLOB_PUBLIC_BASE_URL must be set together"
                    .to_string(),
            ),
        }
    }
}
