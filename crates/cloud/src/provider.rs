//! The compute provider seam.
//!
//! Only the calls provisioning depends on are modelled: create a droplet
//! and list the image, size and region catalogs one page at a time.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use skiff_core::catalog::{Image, Region, Size};
use skiff_core::worker::Droplet;

use crate::error::ProviderError;

/// Image reference in a create request: DigitalOcean takes either a
/// numeric image id or a slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ImageRef {
    Id(u64),
    Slug(String),
}

impl ImageRef {
    /// Interpret a template image id. All-digit values are numeric ids.
    pub fn parse(image_id: &str) -> Self {
        match image_id.parse::<u64>() {
            Ok(id) => ImageRef::Id(id),
            Err(_) => ImageRef::Slug(image_id.to_string()),
        }
    }
}

/// Body of a create-droplet call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateDropletRequest {
    pub name: String,
    pub region: String,
    pub size: String,
    pub image: ImageRef,
    /// Registered key ids injected into the droplet. Skiff always sends
    /// exactly one.
    pub ssh_keys: Vec<u64>,
}

/// One page of a catalog listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub entries: Vec<T>,
    /// Total number of entries across all pages, as reported by the
    /// provider.
    pub total: u64,
}

/// A cloud compute API.
///
/// Implementations must be safe to call concurrently; Skiff adds no
/// locking around them.
#[async_trait]
pub trait ComputeProvider: Send + Sync {
    async fn create_droplet(&self, request: &CreateDropletRequest) -> Result<Droplet, ProviderError>;

    /// Fetch one page of images. Pages are numbered from 1.
    async fn list_images(&self, page: u32) -> Result<Page<Image>, ProviderError>;

    /// Fetch one page of sizes. Pages are numbered from 1.
    async fn list_sizes(&self, page: u32) -> Result<Page<Size>, ProviderError>;

    /// Fetch one page of regions. Pages are numbered from 1.
    async fn list_regions(&self, page: u32) -> Result<Page<Region>, ProviderError>;

    /// Entries requested per catalog page, when the client fixes one.
    fn page_size(&self) -> Option<u32> {
        None
    }
}

/// Builds an authenticated provider client from an API credential.
pub trait ProviderConnector: Send + Sync {
    fn connect(&self, api_token: &str) -> Arc<dyn ComputeProvider>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_image_ids_serialize_as_numbers() {
        let request = CreateDropletRequest {
            name: "skiff-1".into(),
            region: "nyc1".into(),
            size: "s-1vcpu-1gb".into(),
            image: ImageRef::parse("106569146"),
            ssh_keys: vec![7],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["image"], 106_569_146);
        assert_eq!(json["ssh_keys"], serde_json::json!([7]));
    }

    #[test]
    fn slug_image_ids_serialize_as_strings() {
        assert_eq!(
            ImageRef::parse("ubuntu-24-04-x64"),
            ImageRef::Slug("ubuntu-24-04-x64".into())
        );
        let json = serde_json::to_value(ImageRef::parse("ubuntu-24-04-x64")).unwrap();
        assert_eq!(json, "ubuntu-24-04-x64");
    }
}
