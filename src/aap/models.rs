//! Transient representations of AAP controller responses.
//!
//! These types live for exactly one request/response cycle; nothing is
//! cached or persisted locally. Status values are owned by the controller,
//! so they stay plain strings here.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A job template as listed by the controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobTemplate {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub project: Option<u64>,
    #[serde(default)]
    pub playbook: Option<String>,
    #[serde(default)]
    pub inventory: Option<u64>,
    #[serde(default)]
    pub credential: Option<u64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub extra_vars: Option<Value>,
    #[serde(default)]
    pub survey_enabled: bool,
}

/// Paginated list envelope used by the controller's list endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct PaginatedResults<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Parameters for launching a job template.
#[derive(Debug, Clone, Deserialize)]
pub struct LaunchRequest {
    pub template_id: u64,
    #[serde(default)]
    pub extra_vars: Option<Map<String, Value>>,
    #[serde(default)]
    pub inventory: Option<u64>,
    #[serde(default)]
    pub credentials: Option<Vec<u64>>,
}

impl LaunchRequest {
    /// Body for `POST job_templates/{id}/launch/`. Unset fields are omitted
    /// entirely, no defaults are invented on top of what AAP defines.
    pub fn to_launch_body(&self) -> Value {
        let mut body = Map::new();
        if let Some(extra_vars) = &self.extra_vars {
            body.insert("extra_vars".to_string(), Value::Object(extra_vars.clone()));
        }
        if let Some(inventory) = self.inventory {
            body.insert("inventory".to_string(), inventory.into());
        }
        if let Some(credentials) = &self.credentials {
            body.insert(
                "credentials".to_string(),
                Value::Array(credentials.iter().map(|&c| c.into()).collect()),
            );
        }
        Value::Object(body)
    }
}

/// Response to a job template launch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobLaunch {
    /// Id of the created job.
    pub job: u64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "type", default)]
    pub job_type: Option<String>,
}

/// A job execution instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    /// pending/running/successful/failed/error/canceled — values owned by
    /// the controller.
    pub status: String,
    #[serde(default)]
    pub failed: bool,
    #[serde(default)]
    pub started: Option<String>,
    #[serde(default)]
    pub finished: Option<String>,
    #[serde(default)]
    pub elapsed: Option<f64>,
    #[serde(default)]
    pub job_template: Option<u64>,
    #[serde(default)]
    pub playbook: Option<String>,
}

/// Diagnostic result of a connectivity probe. Never an error: expected
/// failure states are reported in `detail`.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionStatus {
    pub ok: bool,
    pub detail: String,
}

/// The controller reports template `extra_vars` as an empty string when
/// none are set; normalize that to `None`.
fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if s.is_empty() => None,
        other => other,
    })
}
