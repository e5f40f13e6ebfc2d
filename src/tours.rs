//! Live tour-inventory API client.
//!
//! The third tier of the tour fallback chain. The wire client stays out of
//! the core pipeline: the resolver sees only [`TourApi`], and the reqwest
//! adapter is constructed at the edge when a base URL is configured.

use crate::store::TourProduct;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Upstream tour-inventory lookups. Every error is a soft failure that
/// advances the resolver's fallback chain.
#[async_trait]
pub trait TourApi: Send + Sync {
    async fn product_details(&self, id: &str, currency: &str) -> Result<TourProduct>;
}

/// HTTP adapter for the tour API.
///
/// Retries twice on 5xx with exponential backoff; connection errors and 4xx
/// are returned immediately. Redirects are capped, and the request timeout
/// keeps a slow upstream from stalling a crawler response.
pub struct HttpTourApi {
    client: reqwest::Client,
    base_url: String,
}

const MAX_RETRIES: u32 = 2;

impl HttpTourApi {
    pub fn new(base_url: &str, timeout_ms: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(3))
            .user_agent(concat!("meridian-seo/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl TourApi for HttpTourApi {
    async fn product_details(&self, id: &str, currency: &str) -> Result<TourProduct> {
        let url = format!("{}/products/{id}", self.base_url);
        let mut retries = 0u32;

        loop {
            let resp = self
                .client
                .get(&url)
                .query(&[("currency", currency)])
                .send()
                .await
                .with_context(|| format!("tour API request failed: {url}"))?;

            let status = resp.status();
            if status.is_server_error() && retries < MAX_RETRIES {
                retries += 1;
                let delay = Duration::from_millis(250 * 2u64.pow(retries - 1));
                tokio::time::sleep(delay).await;
                continue;
            }
            if !status.is_success() {
                anyhow::bail!("tour API returned {status} for product {id}");
            }

            let product: TourProduct = resp
                .json()
                .await
                .with_context(|| format!("tour API returned invalid JSON for product {id}"))?;
            return Ok(product);
        }
    }
}
