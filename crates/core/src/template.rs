//! Worker templates: the immutable configuration of one worker class.
//!
//! A [`ProvisionTemplate`] is built from administrator input
//! ([`TemplateConfig`]) exactly once, through [`ProvisionTemplate::new`].
//! Deserialization goes through the same constructor, so the parsed label
//! set can never drift from the label string.

use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use crate::error::CoreError;
use crate::labels::{self, LabelSet};
use crate::naming;

/// Every provisioned worker runs exactly one executor.
pub const NUM_EXECUTORS: u32 = 1;

/// Raw template fields as entered by an administrator.
///
/// `pool_name` is not part of the form; the owning pool injects it before
/// the template is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TemplateConfig {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "pool_name is required"))]
    pub pool_name: String,
    /// Image slug or numeric id, e.g. `"ubuntu-24-04-x64"`.
    #[validate(custom(function = "not_blank", message = "image_id is required"))]
    pub image_id: String,
    /// Size slug, e.g. `"s-1vcpu-1gb"`.
    #[validate(custom(function = "not_blank", message = "size_id is required"))]
    pub size_id: String,
    /// Region slug, e.g. `"nyc1"`.
    #[validate(custom(function = "not_blank", message = "region_id is required"))]
    pub region_id: String,
    /// Minutes of idleness before the retention policy destroys the worker.
    /// Kept as text because it arrives from a form; numbers are accepted in
    /// files and converted.
    #[serde(deserialize_with = "minutes_as_text")]
    pub idle_termination_minutes: String,
    /// Space-delimited labels. Absent means no labels.
    #[serde(default)]
    pub labels: Option<String>,
    pub remote_user: String,
    pub remote_path: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn minutes_as_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(n) => n.to_string(),
    })
}

/// Parse an idle-termination value. `0` means never terminate.
///
/// Only plain digits are accepted; surrounding whitespace is an error.
pub fn parse_idle_minutes(raw: &str) -> Result<u32, CoreError> {
    raw.parse::<u32>().map_err(|_| {
        CoreError::Config(format!(
            "idle_termination_minutes must be a non-negative integer, got \"{raw}\""
        ))
    })
}

/// The immutable configuration used to create droplets of one worker class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TemplateConfig", into = "TemplateConfig")]
pub struct ProvisionTemplate {
    pool_name: String,
    image_id: String,
    size_id: String,
    region_id: String,
    idle_termination_minutes: u32,
    label_string: Option<String>,
    labels: String,
    label_set: LabelSet,
    remote_user: String,
    remote_path: String,
}

impl ProvisionTemplate {
    /// Validate `config` and build the template.
    ///
    /// Fails with [`CoreError::Validation`] when a required identifier is
    /// blank and with [`CoreError::Config`] when the idle timeout is not a
    /// non-negative integer.
    pub fn new(config: TemplateConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let idle_termination_minutes = parse_idle_minutes(&config.idle_termination_minutes)?;

        tracing::info!(
            pool = %config.pool_name,
            image_id = %config.image_id,
            size_id = %config.size_id,
            region_id = %config.region_id,
            "Creating provision template",
        );

        let labels = config.labels.clone().unwrap_or_default();
        let label_set = labels::parse_labels(&labels);

        Ok(Self {
            pool_name: config.pool_name,
            image_id: config.image_id,
            size_id: config.size_id,
            region_id: config.region_id,
            idle_termination_minutes,
            label_string: config.labels,
            labels,
            label_set,
            remote_user: config.remote_user,
            remote_path: config.remote_path,
        })
    }

    /// Generate a unique name for the next droplet of this template.
    pub fn create_droplet_name(&self) -> String {
        naming::droplet_name()
    }

    /// Whether this template's labels satisfy a label expression.
    pub fn matches_label(&self, expression: &str) -> bool {
        labels::satisfies(&self.label_set, expression)
    }

    pub fn pool_name(&self) -> &str {
        &self.pool_name
    }

    pub fn image_id(&self) -> &str {
        &self.image_id
    }

    pub fn size_id(&self) -> &str {
        &self.size_id
    }

    pub fn region_id(&self) -> &str {
        &self.region_id
    }

    /// The label string with a missing value normalised to `""`.
    pub fn labels(&self) -> &str {
        &self.labels
    }

    /// The label string exactly as it was entered.
    pub fn label_string(&self) -> Option<&str> {
        self.label_string.as_deref()
    }

    pub fn label_set(&self) -> &LabelSet {
        &self.label_set
    }

    pub fn idle_termination_minutes(&self) -> u32 {
        self.idle_termination_minutes
    }

    pub fn remote_user(&self) -> &str {
        &self.remote_user
    }

    pub fn remote_path(&self) -> &str {
        &self.remote_path
    }

    pub fn num_executors(&self) -> u32 {
        NUM_EXECUTORS
    }
}

impl TryFrom<TemplateConfig> for ProvisionTemplate {
    type Error = CoreError;

    fn try_from(config: TemplateConfig) -> Result<Self, Self::Error> {
        Self::new(config)
    }
}

impl From<ProvisionTemplate> for TemplateConfig {
    fn from(template: ProvisionTemplate) -> Self {
        Self {
            pool_name: template.pool_name,
            image_id: template.image_id,
            size_id: template.size_id,
            region_id: template.region_id,
            idle_termination_minutes: template.idle_termination_minutes.to_string(),
            labels: template.label_string,
            remote_user: template.remote_user,
            remote_path: template.remote_path,
        }
    }
}
