//! Domain logic for Skiff worker provisioning.
//!
//! Pure functions and value types shared by the cloud client and the API
//! server. Nothing in this crate performs I/O apart from reading a pool
//! definition file in [`pool::WorkerPool::load`].

pub mod catalog;
pub mod error;
pub mod labels;
pub mod naming;
pub mod pool;
pub mod template;
pub mod types;
pub mod worker;
