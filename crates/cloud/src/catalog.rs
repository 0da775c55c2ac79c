//! Paginated catalog retrieval for the template form.
//!
//! Each listing walks pages from 1 upward and concatenates them in page
//! order until the cumulative entry count reaches the total the provider
//! reports. The walk is bounded by [`MAX_CATALOG_ENTRIES`] worth of pages
//! (or [`MAX_CATALOG_PAGES`] when the page size is unknown) so a provider
//! reporting an unreachable total cannot keep it going forever.

use std::future::Future;

use skiff_core::catalog::{self, Image, Region, SelectOption, Size};

use crate::error::ProviderError;
use crate::provider::{ComputeProvider, Page, ProviderConnector};

/// Upper bound on pages fetched for one listing when the provider does not
/// report its page size.
pub const MAX_CATALOG_PAGES: u32 = 100;

/// Upper bound on entries gathered for one listing. With a known page size
/// the page bound is derived from this, so small pages do not shrink it.
pub const MAX_CATALOG_ENTRIES: u32 = 10_000;

/// Pages needed to reach [`MAX_CATALOG_ENTRIES`] at `page_size` entries
/// per page.
pub fn page_limit(page_size: u32) -> u32 {
    MAX_CATALOG_ENTRIES.div_ceil(page_size.max(1))
}

/// Errors from a catalog listing. No partial data is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to fetch {catalog} page {page}: {source}")]
    Provider {
        catalog: &'static str,
        page: u32,
        #[source]
        source: ProviderError,
    },

    #[error("Gave up listing {catalog} after {max_pages} pages ({fetched} of {total} entries)")]
    PageLimitExceeded {
        catalog: &'static str,
        max_pages: u32,
        fetched: usize,
        total: u64,
    },
}

/// Lists provider catalogs page by page.
pub struct CatalogFetcher<'a> {
    provider: &'a dyn ComputeProvider,
    max_pages: u32,
}

impl<'a> CatalogFetcher<'a> {
    pub fn new(provider: &'a dyn ComputeProvider) -> Self {
        Self {
            provider,
            max_pages: provider.page_size().map_or(MAX_CATALOG_PAGES, page_limit),
        }
    }

    /// Override the page bound. Values below 1 are raised to 1.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub async fn list_sizes(&self) -> Result<Vec<Size>, CatalogError> {
        collect_pages("sizes", self.max_pages, |page| self.provider.list_sizes(page)).await
    }

    pub async fn list_images(&self) -> Result<Vec<Image>, CatalogError> {
        collect_pages("images", self.max_pages, |page| self.provider.list_images(page)).await
    }

    pub async fn list_regions(&self) -> Result<Vec<Region>, CatalogError> {
        collect_pages("regions", self.max_pages, |page| self.provider.list_regions(page)).await
    }
}

/// Walk pages starting at 1 until the reported total is reached.
///
/// - A first page reporting `total == 0` ends the walk with no entries,
///   whatever the page itself contained.
/// - A page that adds nothing before the total is reached ends the walk
///   with what was gathered so far.
/// - Needing more than `max_pages` pages is an error.
async fn collect_pages<T, F, Fut>(
    catalog: &'static str,
    max_pages: u32,
    mut fetch: F,
) -> Result<Vec<T>, CatalogError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>, ProviderError>>,
{
    let mut entries: Vec<T> = Vec::new();
    let mut page = 0u32;
    let mut reported_total = 0u64;

    loop {
        if page >= max_pages {
            return Err(CatalogError::PageLimitExceeded {
                catalog,
                max_pages,
                fetched: entries.len(),
                total: reported_total,
            });
        }
        page += 1;

        let Page {
            entries: batch,
            total,
        } = fetch(page)
            .await
            .map_err(|source| CatalogError::Provider {
                catalog,
                page,
                source,
            })?;

        tracing::debug!(catalog, page, batch = batch.len(), total, "Fetched catalog page");
        reported_total = total;

        if page == 1 && total == 0 {
            if !batch.is_empty() {
                tracing::warn!(
                    catalog,
                    discarded = batch.len(),
                    "Provider reported zero total with a non-empty first page",
                );
            }
            return Ok(Vec::new());
        }

        let added = batch.len();
        entries.extend(batch);

        if entries.len() as u64 >= total {
            break;
        }
        if added == 0 {
            tracing::warn!(
                catalog,
                page,
                fetched = entries.len(),
                total,
                "Provider returned an empty page before reaching its reported total",
            );
            break;
        }
    }

    Ok(entries)
}

/// Size options for the template form.
pub async fn fill_size_options(
    connector: &dyn ProviderConnector,
    api_token: &str,
) -> Result<Vec<SelectOption>, CatalogError> {
    let provider = connector.connect(api_token);
    let sizes = CatalogFetcher::new(provider.as_ref()).list_sizes().await?;
    Ok(catalog::to_options(&sizes))
}

/// Image options for the template form.
pub async fn fill_image_options(
    connector: &dyn ProviderConnector,
    api_token: &str,
) -> Result<Vec<SelectOption>, CatalogError> {
    let provider = connector.connect(api_token);
    let images = CatalogFetcher::new(provider.as_ref()).list_images().await?;
    Ok(catalog::to_options(&images))
}

/// Region options for the template form.
pub async fn fill_region_options(
    connector: &dyn ProviderConnector,
    api_token: &str,
) -> Result<Vec<SelectOption>, CatalogError> {
    let provider = connector.connect(api_token);
    let regions = CatalogFetcher::new(provider.as_ref()).list_regions().await?;
    Ok(catalog::to_options(&regions))
}
