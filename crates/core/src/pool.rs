//! Worker pool definitions.
//!
//! A pool groups the templates of one provider account under a name and
//! records which registered SSH key new droplets receive. Definitions are
//! loaded from a JSON file; every template gets the pool's name injected
//! before construction.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::CoreError;
use crate::template::{ProvisionTemplate, TemplateConfig};

/// On-disk shape of a pool definition.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolConfig {
    pub name: String,
    /// Provider-side id of the registered public key.
    pub ssh_key_id: u64,
    /// Private half of `ssh_key_id`, read when a worker is provisioned.
    pub private_key_path: PathBuf,
    #[serde(default)]
    pub templates: Vec<TemplateConfig>,
}

/// A loaded pool with validated templates.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    name: String,
    ssh_key_id: u64,
    private_key_path: PathBuf,
    templates: Vec<ProvisionTemplate>,
}

impl WorkerPool {
    /// Build a pool from its definition. Fails on the first invalid
    /// template.
    pub fn from_config(config: PoolConfig) -> Result<Self, CoreError> {
        if config.name.trim().is_empty() {
            return Err(CoreError::Validation("Pool name must not be empty".to_string()));
        }

        let templates = config
            .templates
            .into_iter()
            .map(|template| {
                ProvisionTemplate::new(TemplateConfig {
                    pool_name: config.name.clone(),
                    ..template
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: config.name,
            ssh_key_id: config.ssh_key_id,
            private_key_path: config.private_key_path,
            templates,
        })
    }

    /// Load a pool definition from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("Cannot read pool file {}: {e}", path.display()))
        })?;
        let config: PoolConfig = serde_json::from_str(&raw).map_err(|e| {
            CoreError::Config(format!("Invalid pool file {}: {e}", path.display()))
        })?;
        Self::from_config(config)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ssh_key_id(&self) -> u64 {
        self.ssh_key_id
    }

    pub fn templates(&self) -> &[ProvisionTemplate] {
        &self.templates
    }

    /// Pick the template serving a label expression.
    ///
    /// `None` or a blank expression selects the first template; otherwise
    /// the first template whose labels satisfy the expression wins.
    pub fn template_for(&self, label: Option<&str>) -> Result<&ProvisionTemplate, CoreError> {
        let expression = label.unwrap_or_default();
        self.templates
            .iter()
            .find(|t| t.matches_label(expression))
            .ok_or_else(|| CoreError::NotFound {
                entity: "template",
                key: expression.to_string(),
            })
    }

    /// Location of the private key paired with `ssh_key_id`. The file is
    /// read on each provisioning call, so a rotated key takes effect
    /// without reloading the pool.
    pub fn private_key_path(&self) -> &Path {
        &self.private_key_path
    }
}
