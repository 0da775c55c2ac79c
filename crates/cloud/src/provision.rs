//! Provisioning a worker from a template.
//!
//! One call creates exactly one droplet. Failures are never retried here;
//! they come back as a [`ProvisionError`] whose variant tells the caller
//! whether a retry makes sense.

use skiff_core::template::ProvisionTemplate;
use skiff_core::worker::WorkerDescriptor;

use crate::error::ProviderError;
use crate::progress::ProgressSink;
use crate::provider::{ComputeProvider, CreateDropletRequest, ImageRef};

/// Why a droplet could not be created.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// The API token was rejected.
    #[error("Provider rejected credentials while creating {droplet_name}: {source}")]
    Auth {
        droplet_name: String,
        #[source]
        source: ProviderError,
    },

    /// An account limit (droplet count, rate limit) was hit.
    #[error("Provider quota exceeded while creating {droplet_name}: {source}")]
    Quota {
        droplet_name: String,
        #[source]
        source: ProviderError,
    },

    /// The request was refused as invalid (unknown image, size or region,
    /// duplicate name, bad key id).
    #[error("Provider rejected the request for {droplet_name}: {source}")]
    Validation {
        droplet_name: String,
        #[source]
        source: ProviderError,
    },

    /// Transport failure or provider-side error; worth retrying.
    #[error("Provider unreachable while creating {droplet_name}: {source}")]
    Network {
        droplet_name: String,
        #[source]
        source: ProviderError,
    },

    #[error("Unexpected provider failure while creating {droplet_name}: {source}")]
    Unknown {
        droplet_name: String,
        #[source]
        source: ProviderError,
    },
}

impl ProvisionError {
    /// Sort a provider failure into a category.
    ///
    /// - 401 / 403 are authentication failures.
    /// - 429, and 422 responses that mention a limit, are quota failures.
    /// - Any other 4xx is a validation failure.
    /// - 5xx and transport errors are network failures.
    /// - Undecodable responses are unknown.
    pub fn classify(droplet_name: &str, source: ProviderError) -> Self {
        let droplet_name = droplet_name.to_string();
        match &source {
            ProviderError::Api { status: 401 | 403, .. } => Self::Auth { droplet_name, source },
            ProviderError::Api { status: 429, .. } => Self::Quota { droplet_name, source },
            ProviderError::Api {
                status: 422,
                message,
                ..
            } if message.to_lowercase().contains("limit") => Self::Quota { droplet_name, source },
            ProviderError::Api { status: 400..=499, .. } => Self::Validation { droplet_name, source },
            ProviderError::Api { status: 500..=599, .. } => Self::Network { droplet_name, source },
            ProviderError::Request(e) if e.is_decode() => Self::Unknown { droplet_name, source },
            ProviderError::Request(_) => Self::Network { droplet_name, source },
            ProviderError::Api { .. } | ProviderError::Decode(_) => {
                Self::Unknown { droplet_name, source }
            }
        }
    }

    /// Whether retrying the same request might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// Short machine-readable category name.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Auth { .. } => "auth",
            Self::Quota { .. } => "quota",
            Self::Validation { .. } => "validation",
            Self::Network { .. } => "network",
            Self::Unknown { .. } => "unknown",
        }
    }
}

/// Build the create request for one droplet of `template`.
pub fn create_request(
    template: &ProvisionTemplate,
    droplet_name: &str,
    ssh_key_id: u64,
) -> CreateDropletRequest {
    CreateDropletRequest {
        name: droplet_name.to_string(),
        region: template.region_id().to_string(),
        size: template.size_id().to_string(),
        image: ImageRef::parse(template.image_id()),
        ssh_keys: vec![ssh_key_id],
    }
}

/// Create a droplet for `template` and hand it off as a worker.
///
/// `droplet_name` must be unique in the account (see
/// [`ProvisionTemplate::create_droplet_name`]) and `ssh_key_id` must name a
/// key already registered with the provider; `private_key` is its private
/// half. Progress lines go to `progress` before and during the call.
pub async fn provision(
    template: &ProvisionTemplate,
    provider: &dyn ComputeProvider,
    droplet_name: &str,
    private_key: &str,
    ssh_key_id: u64,
    progress: &mut dyn ProgressSink,
) -> Result<WorkerDescriptor, ProvisionError> {
    tracing::info!(
        pool = %template.pool_name(),
        droplet_name,
        image_id = %template.image_id(),
        region_id = %template.region_id(),
        size_id = %template.size_id(),
        "Provisioning worker",
    );

    progress.line(&format!(
        "Starting to provision DigitalOcean droplet using image: {}, region: {}, size: {}",
        template.image_id(),
        template.region_id(),
        template.size_id(),
    ));

    let request = create_request(template, droplet_name, ssh_key_id);

    progress.line(&format!("Creating worker with new droplet {droplet_name}"));

    match provider.create_droplet(&request).await {
        Ok(droplet) => {
            tracing::info!(droplet_id = droplet.id, name = %droplet.name, "Droplet created");
            progress.line(&format!("Droplet {} created with id {}", droplet.name, droplet.id));
            Ok(WorkerDescriptor::from_droplet(&droplet, private_key, template))
        }
        Err(source) => {
            let err = ProvisionError::classify(droplet_name, source);
            tracing::error!(
                droplet_name,
                kind = err.kind(),
                retryable = err.is_retryable(),
                error = %err,
                "Failed to provision worker",
            );
            progress.line(&format!("Failed to provision droplet {droplet_name}: {err}"));
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use skiff_core::template::TemplateConfig;

    use super::*;
    use crate::fake::FakeProvider;
    use crate::progress::NullSink;

    fn template() -> ProvisionTemplate {
        ProvisionTemplate::new(TemplateConfig {
            pool_name: "do-pool".into(),
            image_id: "ubuntu-24-04-x64".into(),
            size_id: "s-2vcpu-2gb".into(),
            region_id: "lon1".into(),
            idle_termination_minutes: "10".into(),
            labels: Some("linux".into()),
            remote_user: "agent".into(),
            remote_path: "/srv/agent".into(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn success_hands_off_created_droplet() {
        let provider = FakeProvider::default();
        let mut progress: Vec<String> = Vec::new();

        let worker = provision(&template(), &provider, "skiff-abc", "PRIVATE", 99, &mut progress)
            .await
            .unwrap();

        assert_eq!(worker.droplet_id, 42);
        assert_eq!(worker.name, "skiff-abc");
        assert_eq!(worker.private_key, "PRIVATE");
        assert_eq!(worker.remote_user, "agent");
        assert_eq!(worker.remote_path, "/srv/agent");
        assert_eq!(worker.num_executors, 1);
        assert_eq!(worker.idle_termination_minutes, 10);
        assert_eq!(provider.create_calls(), 1);
        assert!(progress[0].starts_with("Starting to provision"));
        assert!(progress.iter().any(|l| l.contains("skiff-abc")));
    }

    #[tokio::test]
    async fn request_carries_template_fields_and_single_key() {
        let provider = FakeProvider::default();
        provision(&template(), &provider, "skiff-req", "k", 1234, &mut Vec::<String>::new())
            .await
            .unwrap();

        let request = provider.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request, CreateDropletRequest {
            name: "skiff-req".into(),
            region: "lon1".into(),
            size: "s-2vcpu-2gb".into(),
            image: ImageRef::Slug("ubuntu-24-04-x64".into()),
            ssh_keys: vec![1234],
        });
    }

    #[tokio::test]
    async fn progress_output_is_optional() {
        let provider = FakeProvider::default();

        let worker = provision(&template(), &provider, "skiff-quiet", "k", 5, &mut NullSink)
            .await
            .unwrap();

        assert_eq!(worker.name, "skiff-quiet");
        assert_eq!(provider.create_calls(), 1);
    }

    #[tokio::test]
    async fn failure_is_not_retried() {
        let provider = FakeProvider {
            create_error: Mutex::new(Some(ProviderError::api(503, "try later"))),
            ..Default::default()
        };
        let mut progress: Vec<String> = Vec::new();

        let err = provision(&template(), &provider, "skiff-x", "k", 1, &mut progress)
            .await
            .unwrap_err();

        assert_matches!(err, ProvisionError::Network { ref droplet_name, .. } if droplet_name == "skiff-x");
        assert!(err.is_retryable());
        assert_eq!(provider.create_calls(), 1);
        assert!(progress.last().unwrap().contains("Failed to provision"));
    }

    #[test]
    fn classification_by_status() {
        let cases = [
            (ProviderError::api(401, "Unable to authenticate you"), "auth"),
            (ProviderError::api(403, "forbidden"), "auth"),
            (ProviderError::api(429, "too many requests"), "quota"),
            (
                ProviderError::api(422, "creating this/these droplet(s) will exceed your droplet limit"),
                "quota",
            ),
            (ProviderError::api(422, "Region is not available"), "validation"),
            (ProviderError::api(404, "image not found"), "validation"),
            (ProviderError::api(500, "internal"), "network"),
            (ProviderError::api(302, "moved"), "unknown"),
            (ProviderError::Decode("missing droplet".into()), "unknown"),
        ];
        for (source, expected) in cases {
            let err = ProvisionError::classify("n", source);
            assert_eq!(err.kind(), expected, "{err}");
            assert_eq!(err.is_retryable(), expected == "network");
        }
    }
}
