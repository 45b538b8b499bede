//! HTTP client for the AAP controller API.
//!
//! Wraps the controller's REST endpoints behind typed method calls and
//! applies the retry policy to transient failures. The client is cheap to
//! clone and safe for concurrent use: the only state is the immutable
//! connection configuration and reqwest's connection pool.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method, Response};
use serde_json::Value;
use tracing::warn;

use super::error::AapError;
use super::models::{
    ConnectionStatus, Job, JobLaunch, JobTemplate, LaunchRequest, PaginatedResults,
};
use super::retry_policy::RetryPolicy;
use crate::config::AapConfig;

const API_PREFIX: &str = "/api/controller/v2";
const LIST_PAGE_SIZE: u32 = 200;

#[derive(Clone)]
pub struct AapClient {
    client: Client,
    config: AapConfig,
    retry_policy: RetryPolicy,
}

impl AapClient {
    /// Create a client from connection configuration.
    pub fn new(config: AapConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .context("AAP token contains invalid header characters")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .context("Failed to create HTTP client")?;

        let retry_policy = RetryPolicy::new(config.max_retries);

        Ok(Self {
            client,
            config,
            retry_policy,
        })
    }

    /// Replace the retry schedule. Used by tests to avoid real backoff
    /// delays.
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn config(&self) -> &AapConfig {
        &self.config
    }

    /// List job templates, defaulting to the configured project.
    pub async fn get_job_templates(
        &self,
        project_id: Option<&str>,
    ) -> Result<Vec<JobTemplate>, AapError> {
        let project = project_id.unwrap_or(&self.config.project_id).to_string();
        let query = [
            ("page_size", LIST_PAGE_SIZE.to_string()),
            ("project", project),
        ];

        let response = self
            .request(Method::GET, "job_templates/", &query, None)
            .await?;
        let page: PaginatedResults<JobTemplate> = response.json().await.map_err(AapError::from)?;
        Ok(page.results)
    }

    /// Launch a job template with optional overrides.
    pub async fn launch_job_template(
        &self,
        request: &LaunchRequest,
    ) -> Result<JobLaunch, AapError> {
        if request.template_id == 0 {
            return Err(AapError::Validation(
                "template_id is required and must be a positive id".to_string(),
            ));
        }

        let path = format!("job_templates/{}/launch/", request.template_id);
        let body = request.to_launch_body();
        let response = self
            .request(Method::POST, &path, &[], Some(&body))
            .await
            .map_err(|err| match err {
                AapError::NotFound(_) => {
                    AapError::NotFound(format!("job template {} not found", request.template_id))
                }
                other => other,
            })?;
        response.json().await.map_err(AapError::from)
    }

    /// Fetch the current status of a job.
    pub async fn get_job_status(&self, job_id: u64) -> Result<Job, AapError> {
        let path = format!("jobs/{}/", job_id);
        let response = self
            .request(Method::GET, &path, &[], None)
            .await
            .map_err(|err| match err {
                AapError::NotFound(_) => {
                    AapError::NotFound(format!("job {} is unknown to the controller", job_id))
                }
                other => other,
            })?;
        response.json().await.map_err(AapError::from)
    }

    /// Fetch a job's stdout as plain text. May be partial while the job is
    /// still running; that policy belongs to the controller.
    pub async fn get_job_stdout(&self, job_id: u64) -> Result<String, AapError> {
        let path = format!("jobs/{}/stdout/", job_id);
        let query = [("format", "txt".to_string())];
        let response = self
            .request(Method::GET, &path, &query, None)
            .await
            .map_err(|err| match err {
                AapError::NotFound(_) => {
                    AapError::NotFound(format!("job {} is unknown to the controller", job_id))
                }
                other => other,
            })?;
        response.text().await.map_err(AapError::from)
    }

    /// Probe connectivity and authentication with a lightweight call.
    ///
    /// Purely diagnostic: expected failure states (unreachable,
    /// unauthenticated) are reported in the result, never raised.
    pub async fn test_connection(&self) -> ConnectionStatus {
        match self.request(Method::GET, "me/", &[], None).await {
            Ok(_) => ConnectionStatus {
                ok: true,
                detail: "ok".to_string(),
            },
            Err(err) => ConnectionStatus {
                ok: false,
                detail: format!("{}: {}", err.kind(), err),
            },
        }
    }

    /// Issue a request with retry on transient failures.
    ///
    /// A failure with `max_retries = n` is attempted exactly `n + 1` times
    /// before it surfaces.
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Response, AapError> {
        let url = format!("{}{}/{}", self.config.url, API_PREFIX, path.trim_start_matches('/'));

        let mut retry_count = 0;
        loop {
            let mut builder = self.client.request(method.clone(), &url);
            if !query.is_empty() {
                builder = builder.query(query);
            }
            if let Some(body) = body {
                builder = builder.json(body);
            }

            let error = match builder.send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    AapError::from_status(status.as_u16(), body_excerpt(response).await)
                }
                Err(err) => AapError::from(err),
            };

            if !self.retry_policy.should_retry(&error, retry_count) {
                return Err(error);
            }

            let delay = self.retry_policy.backoff_delay(retry_count);
            retry_count += 1;
            warn!(
                "AAP request {} {} failed ({}), retry {}/{} in {:?}",
                method, url, error, retry_count, self.retry_policy.max_retries, delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// Read a bounded excerpt of an error response body for diagnostics.
async fn body_excerpt(response: Response) -> String {
    match response.text().await {
        Ok(text) if !text.is_empty() => truncate_excerpt(&text),
        Ok(_) => "<empty body>".to_string(),
        Err(_) => "<unreadable body>".to_string(),
    }
}

/// Truncate to at most 512 bytes, backing up to a char boundary so
/// multibyte bodies cannot split a character.
fn truncate_excerpt(text: &str) -> String {
    const MAX_LEN: usize = 512;
    if text.len() <= MAX_LEN {
        return text.to_string();
    }
    let mut end = MAX_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
