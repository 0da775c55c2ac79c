//! In-memory provider for unit tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use skiff_core::catalog::{Image, Region, Size};
use skiff_core::worker::Droplet;

use crate::error::ProviderError;
use crate::provider::{ComputeProvider, CreateDropletRequest, Page};

/// Serves catalogs from vectors in fixed-size pages and echoes create
/// requests back as droplets.
pub struct FakeProvider {
    pub page_size: usize,
    pub sizes: Vec<Size>,
    pub images: Vec<Image>,
    pub regions: Vec<Region>,
    /// Overrides the reported total when set.
    pub reported_total: Option<u64>,
    /// Page number that fails, if any.
    pub failing_page: Option<u32>,
    /// Error returned by `create_droplet`, if any.
    pub create_error: Mutex<Option<ProviderError>>,
    pub droplet_id: u64,
    pub page_calls: AtomicU32,
    pub create_calls: AtomicU32,
    pub last_request: Mutex<Option<CreateDropletRequest>>,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            page_size: 100,
            sizes: Vec::new(),
            images: Vec::new(),
            regions: Vec::new(),
            reported_total: None,
            failing_page: None,
            create_error: Mutex::new(None),
            droplet_id: 42,
            page_calls: AtomicU32::new(0),
            create_calls: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }
}

pub fn sizes(count: usize) -> Vec<Size> {
    (0..count)
        .map(|i| Size {
            slug: format!("size-{i}"),
            memory_mb: 1024,
            vcpus: 1,
            price_monthly: 6.0,
        })
        .collect()
}

impl FakeProvider {
    pub fn page_calls(&self) -> u32 {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> u32 {
        self.create_calls.load(Ordering::SeqCst)
    }

    fn page<T: Clone>(&self, all: &[T], page: u32) -> Result<Page<T>, ProviderError> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_page == Some(page) {
            return Err(ProviderError::api(503, "service unavailable"));
        }
        let start = (page as usize - 1) * self.page_size;
        let entries = all.iter().skip(start).take(self.page_size).cloned().collect();
        Ok(Page {
            entries,
            total: self.reported_total.unwrap_or(all.len() as u64),
        })
    }
}

#[async_trait]
impl ComputeProvider for FakeProvider {
    async fn create_droplet(&self, request: &CreateDropletRequest) -> Result<Droplet, ProviderError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        if let Some(err) = self.create_error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(Droplet {
            id: self.droplet_id,
            name: request.name.clone(),
            status: Some("new".into()),
            created_at: None,
        })
    }

    async fn list_images(&self, page: u32) -> Result<Page<Image>, ProviderError> {
        self.page(&self.images, page)
    }

    async fn list_sizes(&self, page: u32) -> Result<Page<Size>, ProviderError> {
        self.page(&self.sizes, page)
    }

    async fn list_regions(&self, page: u32) -> Result<Page<Region>, ProviderError> {
        self.page(&self.regions, page)
    }

    fn page_size(&self) -> Option<u32> {
        u32::try_from(self.page_size).ok()
    }
}
