/// Errors from a compute provider call.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status code.
    #[error("Provider API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider error id, e.g. `"unauthorized"` or `"unprocessable_entity"`.
        id: Option<String>,
        /// Human-readable message or raw body.
        message: String,
    },

    /// A success response whose body did not match the expected shape.
    #[error("Unexpected provider response: {0}")]
    Decode(String),
}

impl ProviderError {
    /// Shorthand for an [`ProviderError::Api`] without an error id.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            id: None,
            message: message.into(),
        }
    }
}
