use std::fmt;
use std::path::PathBuf;

use skiff_cloud::digitalocean::{DEFAULT_API_URL, DEFAULT_PAGE_SIZE};

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the
/// provider token, which callers may also send per request.
#[derive(Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`). Also bounds each
    /// provider call.
    pub request_timeout_secs: u64,
    /// DigitalOcean API base URL.
    pub do_api_url: String,
    /// Fallback API token used when a request carries none.
    pub do_api_token: Option<String>,
    /// Entries requested per catalog page (clamped to 1..=200). The page
    /// bound of a catalog listing scales with it so that every listing
    /// may gather up to [`skiff_cloud::catalog::MAX_CATALOG_ENTRIES`] entries.
    pub do_page_size: u32,
    /// Pool definition file. Without it provisioning endpoints answer 404.
    pub pool_file: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                         |
    /// |------------------------|---------------------------------|
    /// | `HOST`                 | `0.0.0.0`                       |
    /// | `PORT`                 | `3000`                          |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`         |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                            |
    /// | `DO_API_URL`           | `https://api.digitalocean.com`  |
    /// | `DO_API_TOKEN`         | unset                           |
    /// | `DO_PAGE_SIZE`         | `100`                           |
    /// | `SKIFF_POOL_FILE`      | unset                           |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let do_api_url = std::env::var("DO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());

        let do_api_token = std::env::var("DO_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let do_page_size: u32 = std::env::var("DO_PAGE_SIZE")
            .map(|v| v.parse().expect("DO_PAGE_SIZE must be a valid u32"))
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let pool_file = std::env::var("SKIFF_POOL_FILE").ok().map(PathBuf::from);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            do_api_url,
            do_api_token,
            do_page_size,
            pool_file,
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("cors_origins", &self.cors_origins)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("do_api_url", &self.do_api_url)
            .field("do_api_token", &self.do_api_token.as_ref().map(|_| "[REDACTED]"))
            .field("do_page_size", &self.do_page_size)
            .field("pool_file", &self.pool_file)
            .finish()
    }
}
