//! AAP controller API client.
//!
//! Translates the five logical operations (list templates, launch, job
//! status, job output, connectivity probe) into authenticated HTTP calls
//! and normalizes the response shapes.

pub mod client;
pub mod error;
pub mod models;
pub mod retry_policy;

pub use client::AapClient;
pub use error::AapError;
pub use models::{ConnectionStatus, Job, JobLaunch, JobTemplate, LaunchRequest};
pub use retry_policy::RetryPolicy;
