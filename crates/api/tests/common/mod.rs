#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use skiff_api::config::ServerConfig;
use skiff_api::router::build_app_router;
use skiff_api::state::AppState;
use skiff_cloud::error::ProviderError;
use skiff_cloud::provider::{ComputeProvider, CreateDropletRequest, Page, ProviderConnector};
use skiff_core::catalog::{Image, Region, Size};
use skiff_core::pool::{PoolConfig, WorkerPool};
use skiff_core::worker::Droplet;

pub const TEST_TOKEN: &str = "test-token";

/// Build a test `ServerConfig` with safe defaults and a fallback token.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        do_api_url: "http://unused".to_string(),
        do_api_token: Some(TEST_TOKEN.to_string()),
        do_page_size: 100,
        pool_file: None,
    }
}

/// Provider stand-in shared by every connection the test app opens.
#[derive(Default)]
pub struct FakeProvider {
    pub regions: Vec<Region>,
    pub sizes: Vec<Size>,
    pub images: Vec<Image>,
    pub create_error: Mutex<Option<ProviderError>>,
    pub create_calls: AtomicU32,
    pub tokens: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn create_calls(&self) -> u32 {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }
}

fn single_page<T: Clone>(entries: &[T], page: u32) -> Page<T> {
    Page {
        entries: if page == 1 { entries.to_vec() } else { Vec::new() },
        total: entries.len() as u64,
    }
}

#[async_trait]
impl ComputeProvider for FakeProvider {
    async fn create_droplet(&self, request: &CreateDropletRequest) -> Result<Droplet, ProviderError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.create_error.lock().unwrap().take() {
            return Err(err);
        }
        Ok(Droplet {
            id: 42,
            name: request.name.clone(),
            status: Some("new".into()),
            created_at: None,
        })
    }

    async fn list_images(&self, page: u32) -> Result<Page<Image>, ProviderError> {
        Ok(single_page(&self.images, page))
    }

    async fn list_sizes(&self, page: u32) -> Result<Page<Size>, ProviderError> {
        Ok(single_page(&self.sizes, page))
    }

    async fn list_regions(&self, page: u32) -> Result<Page<Region>, ProviderError> {
        if self.regions.is_empty() {
            return Err(ProviderError::api(503, "regions unavailable"));
        }
        Ok(single_page(&self.regions, page))
    }
}

/// Hands out the shared [`FakeProvider`] and records which token was used.
pub struct FakeConnector(pub Arc<FakeProvider>);

impl ProviderConnector for FakeConnector {
    fn connect(&self, api_token: &str) -> Arc<dyn ComputeProvider> {
        self.0.tokens.lock().unwrap().push(api_token.to_string());
        self.0.clone()
    }
}

/// A pool with two templates whose private key lives at `key_path`.
pub fn test_pool(key_path: &Path) -> WorkerPool {
    let config: PoolConfig = serde_json::from_value(serde_json::json!({
        "name": "do-builders",
        "ssh_key_id": 4242,
        "private_key_path": key_path,
        "templates": [
            {
                "image_id": "ubuntu-24-04-x64",
                "size_id": "s-2vcpu-4gb",
                "region_id": "nyc3",
                "idle_termination_minutes": "30",
                "labels": "linux docker",
                "remote_user": "root",
                "remote_path": "/opt/agent"
            },
            {
                "image_id": "106569146",
                "size_id": "s-8vcpu-16gb",
                "region_id": "fra1",
                "idle_termination_minutes": "0",
                "labels": "linux big",
                "remote_user": "builder",
                "remote_path": "/home/builder"
            }
        ]
    }))
    .unwrap();
    WorkerPool::from_config(config).unwrap()
}

/// Build the full application router around a fake provider.
pub fn build_test_app(provider: Arc<FakeProvider>, pool: Option<WorkerPool>) -> Router {
    let config = test_config();
    let state = AppState {
        config: Arc::new(config.clone()),
        connector: Arc::new(FakeConnector(provider)),
        pool: pool.map(Arc::new),
    };
    build_app_router(state, &config)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn get_with_token(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
