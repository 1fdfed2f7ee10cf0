use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{model::ImageHit, provider::truncate_body};

use super::ImageProvider;

const SEARCH_URL: &str = "https://pixabay.com/api/";

#[derive(Debug, Clone)]
pub struct PixabayProvider {
    api_key: String,
    http: Client,
}

impl PixabayProvider {
    pub fn new(api_key: String, http: Client) -> Self {
        Self { api_key, http }
    }
}

#[derive(Debug, Deserialize)]
struct PxHit {
    id: u64,
    #[serde(rename = "webformatURL")]
    webformat_url: String,
    #[serde(default)]
    tags: String,
    #[serde(rename = "webformatWidth")]
    webformat_width: u32,
    #[serde(rename = "webformatHeight")]
    webformat_height: u32,
    #[serde(rename = "pageURL")]
    page_url: Option<String>,
    user: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PxSearchResponse {
    hits: Option<Vec<PxHit>>,
}

impl From<PxHit> for ImageHit {
    fn from(hit: PxHit) -> Self {
        ImageHit {
            id: hit.id,
            preview_url: hit.webformat_url,
            tags: hit.tags,
            width: hit.webformat_width,
            height: hit.webformat_height,
            page_url: hit.page_url,
            author: hit.user,
        }
    }
}

fn parse_hits(body: &str) -> Result<Vec<ImageHit>> {
    let parsed: PxSearchResponse =
        serde_json::from_str(body).context("Failed to parse Pixabay search JSON")?;

    Ok(parsed.hits.unwrap_or_default().into_iter().map(ImageHit::from).collect())
}

#[async_trait]
impl ImageProvider for PixabayProvider {
    async fn search_images(&self, query: &str, per_page: usize) -> Result<Vec<ImageHit>> {
        let per_page = per_page.to_string();

        let res = self
            .http
            .get(SEARCH_URL)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", query),
                ("image_type", "photo"),
                ("orientation", "horizontal"),
                ("safesearch", "true"),
                ("per_page", per_page.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to Pixabay (image search)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read Pixabay search response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Pixabay search request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let hits = parse_hits(&body)?;
        tracing::debug!(query, hits = hits.len(), "pixabay search done");
        Ok(hits)
    }
}
