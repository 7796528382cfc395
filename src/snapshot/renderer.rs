use async_trait::async_trait;
use scraper::{Html, Selector};
use std::time::Duration;

use super::SnapshotError;

/// A rendered page: raster image bytes plus whatever title was recovered.
pub struct Snapshot {
    pub image: Vec<u8>,
    pub title: Option<String>,
}

/// Renders a page into a `Snapshot`.
///
/// The orchestrator only depends on this trait, so the rendering backend can
/// be swapped (or faked in tests) without touching the ingestion flow.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn capture(&self, url: &str) -> Result<Snapshot, SnapshotError>;
}

const VIEWPORT_WIDTH: u32 = 1280;
const VIEWPORT_HEIGHT: u32 = 720;
/// Upper bound for the remote render, overlay handling included.
const RENDER_TIMEOUT: Duration = Duration::from_secs(30);
const PAGE_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
/// How long the rendering service waits for consent overlays to settle
/// before capturing.
const OVERLAY_DELAY_SECONDS: u32 = 5;

/// Renderer backed by a third-party screenshot API. The image comes from the
/// remote service; the title comes from fetching the raw markup ourselves.
pub struct RemoteRenderer {
    client: reqwest::Client,
    api_url: String,
    access_key: String,
}

impl RemoteRenderer {
    pub fn new(api_url: String, access_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            access_key,
        }
    }

    async fn render_image(&self, url: &str) -> Result<Vec<u8>, SnapshotError> {
        let query = [
            ("access_key", self.access_key.clone()),
            ("url", url.to_string()),
            ("viewport_width", VIEWPORT_WIDTH.to_string()),
            ("viewport_height", VIEWPORT_HEIGHT.to_string()),
            ("format", "png".to_string()),
            ("block_banners", "true".to_string()),
            ("delay", OVERLAY_DELAY_SECONDS.to_string()),
        ];

        let response = self
            .client
            .get(&self.api_url)
            .query(&query)
            .timeout(RENDER_TIMEOUT)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| SnapshotError::Render(e.to_string()))?;

        Ok(response.bytes().await?.to_vec())
    }

    /// Best effort only: any failure here means "no title", never an error.
    async fn fetch_title(&self, url: &str) -> Option<String> {
        let response = self
            .client
            .get(url)
            .timeout(PAGE_FETCH_TIMEOUT)
            .send()
            .await
            .ok()?;
        let body = response.text().await.ok()?;
        extract_title(&body)
    }
}

#[async_trait]
impl PageRenderer for RemoteRenderer {
    async fn capture(&self, url: &str) -> Result<Snapshot, SnapshotError> {
        let title = self.fetch_title(url).await;
        if title.is_none() {
            tracing::debug!(url, "no page title recovered");
        }
        let image = self.render_image(url).await?;
        Ok(Snapshot { image, title })
    }
}

/// Extracts the text of the first `<title>` element, if any.
fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("title").ok()?;
    let element = document.select(&selector).next()?;
    let title = element.text().collect::<String>().trim().to_string();
    (!title.is_empty()).then_some(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_title_text() {
        let html = "<html><head><title> My Page </title></head><body></body></html>";
        assert_eq!(extract_title(html), Some("My Page".to_string()));
    }

    #[test]
    fn missing_title_yields_none() {
        assert_eq!(extract_title("<html><body><p>hi</p></body></html>"), None);
    }

    #[test]
    fn empty_title_yields_none() {
        assert_eq!(
            extract_title("<html><head><title>  </title></head></html>"),
            None
        );
    }

    #[test]
    fn tolerates_malformed_markup() {
        assert_eq!(
            extract_title("<title>Broken</title><p>unclosed"),
            Some("Broken".to_string())
        );
    }
}
