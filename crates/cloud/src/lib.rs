//! Cloud provider boundary for Skiff.
//!
//! Defines the [`ComputeProvider`](provider::ComputeProvider) trait, a
//! DigitalOcean implementation over [`reqwest`], paginated catalog
//! retrieval for the template form, and the `provision` operation that
//! turns a template into a running worker descriptor.

pub mod catalog;
pub mod digitalocean;
pub mod error;
pub mod progress;
pub mod provider;
pub mod provision;

#[cfg(test)]
mod fake;
