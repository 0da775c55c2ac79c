//! Provider catalog entries and their mapping to form options.
//!
//! Entries are transient: they are fetched on demand to populate the
//! image, size and region selectors and never stored.

use serde::{Deserialize, Serialize};

/// A machine image offered by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub distribution: String,
    #[serde(default)]
    pub slug: Option<String>,
}

/// A droplet size (plan) offered by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub slug: String,
    #[serde(default, rename = "memory")]
    pub memory_mb: u64,
    #[serde(default)]
    pub vcpus: u32,
    #[serde(default)]
    pub price_monthly: f64,
}

/// A datacenter region offered by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub slug: String,
    pub name: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

/// One entry of a selection widget: the submitted `value` and the
/// human-readable `label`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl From<&Size> for SelectOption {
    fn from(size: &Size) -> Self {
        SelectOption::new(&size.slug, &size.slug)
    }
}

impl From<&Image> for SelectOption {
    fn from(image: &Image) -> Self {
        SelectOption::new(
            image.id.to_string(),
            format!("{} {}", image.distribution, image.name),
        )
    }
}

impl From<&Region> for SelectOption {
    fn from(region: &Region) -> Self {
        SelectOption::new(&region.slug, &region.name)
    }
}

/// Map catalog entries to options, preserving provider order.
pub fn to_options<'a, T>(entries: &'a [T]) -> Vec<SelectOption>
where
    &'a T: Into<SelectOption>,
{
    entries.iter().map(Into::into).collect()
}
