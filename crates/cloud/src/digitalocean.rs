//! REST client for the DigitalOcean v2 API.
//!
//! Wraps the droplet and catalog endpoints using [`reqwest`]. Every call
//! authenticates with a bearer token.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use skiff_core::catalog::{Image, Region, Size};
use skiff_core::worker::Droplet;

use crate::error::ProviderError;
use crate::provider::{ComputeProvider, CreateDropletRequest, Page, ProviderConnector};

/// Public DigitalOcean API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.digitalocean.com";

/// Entries requested per catalog page. DigitalOcean caps this at 200.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

const MAX_PAGE_SIZE: u32 = 200;

/// Pagination metadata attached to every list response.
#[derive(Debug, Deserialize)]
struct Meta {
    total: u64,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    images: Vec<Image>,
    meta: Meta,
}

#[derive(Debug, Deserialize)]
struct SizesResponse {
    sizes: Vec<Size>,
    meta: Meta,
}

#[derive(Debug, Deserialize)]
struct RegionsResponse {
    regions: Vec<Region>,
    meta: Meta,
}

#[derive(Debug, Deserialize)]
struct DropletResponse {
    droplet: Droplet,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    id: Option<String>,
    message: Option<String>,
}

/// HTTP client for one DigitalOcean account.
pub struct DigitalOceanClient {
    client: reqwest::Client,
    api_url: String,
    token: String,
    page_size: u32,
}

impl DigitalOceanClient {
    /// Create a client for the public API endpoint.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), DEFAULT_API_URL, token)
    }

    /// Create a client reusing an existing [`reqwest::Client`] against
    /// `api_url` (useful for connection pooling and for tests).
    pub fn with_client(
        client: reqwest::Client,
        api_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the number of entries requested per catalog page (1..=200).
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        resource: &str,
        page: u32,
    ) -> Result<T, ProviderError> {
        let response = self
            .client
            .get(format!("{}/v2/{resource}", self.api_url))
            .bearer_auth(&self.token)
            .query(&[("page", page), ("per_page", self.page_size)])
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, turning failures
    /// into [`ProviderError::Api`] with the provider's error id and message.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let (id, message) = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => (parsed.id, parsed.message.unwrap_or(body)),
            Err(_) => (None, body),
        };

        Err(ProviderError::Api {
            status: status.as_u16(),
            id,
            message,
        })
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ComputeProvider for DigitalOceanClient {
    async fn create_droplet(&self, request: &CreateDropletRequest) -> Result<Droplet, ProviderError> {
        tracing::debug!(name = %request.name, "POST /v2/droplets");

        let response = self
            .client
            .post(format!("{}/v2/droplets", self.api_url))
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;

        let created: DropletResponse = Self::parse_response(response).await?;
        Ok(created.droplet)
    }

    async fn list_images(&self, page: u32) -> Result<Page<Image>, ProviderError> {
        let body: ImagesResponse = self.get_page("images", page).await?;
        Ok(Page {
            entries: body.images,
            total: body.meta.total,
        })
    }

    async fn list_sizes(&self, page: u32) -> Result<Page<Size>, ProviderError> {
        let body: SizesResponse = self.get_page("sizes", page).await?;
        Ok(Page {
            entries: body.sizes,
            total: body.meta.total,
        })
    }

    async fn list_regions(&self, page: u32) -> Result<Page<Region>, ProviderError> {
        let body: RegionsResponse = self.get_page("regions", page).await?;
        Ok(Page {
            entries: body.regions,
            total: body.meta.total,
        })
    }

    fn page_size(&self) -> Option<u32> {
        Some(self.page_size)
    }
}

/// Builds [`DigitalOceanClient`]s that share one connection pool.
pub struct DigitalOceanConnector {
    client: reqwest::Client,
    api_url: String,
    page_size: u32,
}

impl DigitalOceanConnector {
    /// Create a connector whose clients time out after `request_timeout`.
    pub fn new(
        api_url: impl Into<String>,
        page_size: u32,
        request_timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            page_size,
        })
    }
}

impl ProviderConnector for DigitalOceanConnector {
    fn connect(&self, api_token: &str) -> Arc<dyn ComputeProvider> {
        Arc::new(
            DigitalOceanClient::with_client(self.client.clone(), self.api_url.clone(), api_token)
                .with_page_size(self.page_size),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_trimmed_from_api_url() {
        let client = DigitalOceanClient::with_client(
            reqwest::Client::new(),
            "http://localhost:9000/",
            "t",
        );
        assert_eq!(client.api_url, "http://localhost:9000");
    }

    #[test]
    fn page_size_clamped_to_provider_limits() {
        assert_eq!(DigitalOceanClient::new("t").with_page_size(0).page_size, 1);
        assert_eq!(DigitalOceanClient::new("t").with_page_size(500).page_size, 200);
        assert_eq!(DigitalOceanClient::new("t").page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(
            ComputeProvider::page_size(&DigitalOceanClient::new("t").with_page_size(7)),
            Some(7)
        );
    }

    #[test]
    fn droplet_response_decodes_with_extra_fields() {
        let json = r#"{
            "droplet": {
                "id": 3164494,
                "name": "skiff-1",
                "memory": 1024,
                "status": "new",
                "created_at": "2024-05-01T12:00:00Z",
                "networks": {}
            },
            "links": {}
        }"#;
        let parsed: DropletResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.droplet.id, 3_164_494);
        assert_eq!(parsed.droplet.status.as_deref(), Some("new"));
        assert!(parsed.droplet.created_at.is_some());
    }

    #[test]
    fn list_response_requires_meta_total() {
        let json = r#"{"regions": [], "links": {}}"#;
        assert!(serde_json::from_str::<RegionsResponse>(json).is_err());
    }
}
