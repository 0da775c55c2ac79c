//! Handoff from a created droplet to a pool-facing worker descriptor.
//!
//! The descriptor carries everything the launcher and retention
//! collaborators need (labels, idle timeout, remote access parameters) so
//! they never have to consult the template again.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::template::ProvisionTemplate;
use crate::types::{DropletId, Timestamp};

/// A droplet as returned by the provider after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Droplet {
    pub id: DropletId,
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
}

/// How the pool may schedule work onto the worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeMode {
    /// Use the worker for any work.
    #[default]
    Normal,
    /// Only run work whose label expression matches this worker.
    Exclusive,
}

/// Placeholder for the launcher that boots agent software over SSH.
///
/// Filled in by the launcher collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LauncherSpec {
    #[serde(default)]
    pub kind: Option<String>,
}

/// Retention settings handed to the idle-reclamation collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionSpec {
    /// `0` means the worker is never reclaimed for idleness.
    pub idle_termination_minutes: u32,
}

/// A freshly provisioned worker, ready for registration with the pool.
///
/// The caller owns the descriptor: it registers it with the pool and is
/// responsible for eventually destroying the droplet.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct WorkerDescriptor {
    pub pool_name: String,
    pub name: String,
    pub description: String,
    pub droplet_id: DropletId,
    #[serde(skip_serializing)]
    pub private_key: String,
    pub remote_path: String,
    pub remote_user: String,
    pub num_executors: u32,
    pub idle_termination_minutes: u32,
    pub mode: NodeMode,
    pub labels: String,
    pub launcher: LauncherSpec,
    pub retention: RetentionSpec,
    pub node_properties: BTreeMap<String, String>,
    pub description_override: String,
}

impl WorkerDescriptor {
    /// Build the descriptor for `droplet`, created from `template` with
    /// `private_key` injected for remote access.
    ///
    /// Pure and deterministic: the same inputs always give equal output.
    pub fn from_droplet(droplet: &Droplet, private_key: &str, template: &ProvisionTemplate) -> Self {
        tracing::debug!(droplet_id = droplet.id, name = %droplet.name, "Creating worker descriptor");

        Self {
            pool_name: template.pool_name().to_string(),
            name: droplet.name.clone(),
            description: format!("Computer running on DigitalOcean with name: {}", droplet.name),
            droplet_id: droplet.id,
            private_key: private_key.to_string(),
            remote_path: template.remote_path().to_string(),
            remote_user: template.remote_user().to_string(),
            num_executors: template.num_executors(),
            idle_termination_minutes: template.idle_termination_minutes(),
            mode: NodeMode::default(),
            labels: template.labels().to_string(),
            launcher: LauncherSpec::default(),
            retention: RetentionSpec {
                idle_termination_minutes: template.idle_termination_minutes(),
            },
            node_properties: BTreeMap::new(),
            description_override: String::new(),
        }
    }
}

impl fmt::Debug for WorkerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerDescriptor")
            .field("pool_name", &self.pool_name)
            .field("name", &self.name)
            .field("droplet_id", &self.droplet_id)
            .field("private_key", &"[REDACTED]")
            .field("remote_user", &self.remote_user)
            .field("remote_path", &self.remote_path)
            .field("num_executors", &self.num_executors)
            .field("idle_termination_minutes", &self.idle_termination_minutes)
            .field("mode", &self.mode)
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}
