//! Calcul Québec REST API client.
//!
//! All requests use HTTP basic authentication with the account user name and
//! its access token.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::circuit::WireCircuit;
use crate::error::{MonarqError, MonarqResult};

/// Calcul Québec API client.
#[derive(Clone)]
pub struct MonarqClient {
    /// HTTP client.
    client: Client,
    /// API base URL.
    base_url: String,
    /// Account user name.
    user: String,
    /// Access token.
    access_token: String,
}

impl MonarqClient {
    /// Create a new client.
    pub fn new(
        base_url: impl Into<String>,
        user: impl Into<String>,
        access_token: impl Into<String>,
    ) -> MonarqResult<Self> {
        let base_url = base_url.into();
        let user = user.into();
        let access_token = access_token.into();

        if base_url.is_empty() {
            return Err(MonarqError::MissingCredential("host"));
        }
        if user.is_empty() {
            return Err(MonarqError::MissingCredential("user"));
        }
        if access_token.is_empty() {
            return Err(MonarqError::MissingCredential("access token"));
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            user,
            access_token,
        })
    }

    /// API base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Look up a project by name and return its id.
    #[instrument(skip(self))]
    pub async fn project_id(&self, name: &str) -> MonarqResult<String> {
        let url = format!("{}/projects", self.base_url);
        debug!("Looking up project at {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("name", name)])
            .basic_auth(&self.user, Some(&self.access_token))
            .send()
            .await?;

        let page: Page<ProjectInfo> = self.handle_response(response).await?;
        page.items
            .into_iter()
            .next()
            .map(|p| p.id)
            .ok_or_else(|| MonarqError::ProjectNotFound(name.to_string()))
    }

    /// Get machine information.
    #[instrument(skip(self))]
    pub async fn machine(&self, machine_name: &str) -> MonarqResult<MachineInfo> {
        let url = format!("{}/machines", self.base_url);
        debug!("Getting machine info from {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("machineName", machine_name)])
            .basic_auth(&self.user, Some(&self.access_token))
            .send()
            .await?;

        let page: Page<MachineInfo> = self.handle_response(response).await?;
        page.items
            .into_iter()
            .next()
            .ok_or_else(|| MonarqError::MachineNotFound(machine_name.to_string()))
    }

    /// Submit a job and return its id.
    #[instrument(skip(self, request), fields(machine = %request.machine_name))]
    pub async fn submit_job(&self, request: &SubmitRequest) -> MonarqResult<String> {
        let url = format!("{}/jobs", self.base_url);
        debug!("Submitting job to {}", url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.user, Some(&self.access_token))
            .json(request)
            .send()
            .await?;

        let body: JobResponse = self.handle_response(response).await?;
        body.job
            .id
            .ok_or_else(|| MonarqError::MalformedResponse("submission returned no job id".into()))
    }

    /// Get a job with its status and, once finished, its result.
    #[instrument(skip(self))]
    pub async fn get_job(&self, job_id: &str) -> MonarqResult<JobResponse> {
        let url = format!("{}/jobs/{}", self.base_url, job_id);
        debug!("Getting job from {}", url);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.user, Some(&self.access_token))
            .send()
            .await?;

        match self.handle_response(response).await {
            Err(MonarqError::ApiError { status: 404, .. }) => {
                Err(MonarqError::JobNotFound(job_id.to_string()))
            }
            other => other,
        }
    }

    /// Handle HTTP response, extracting JSON or returning error.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> MonarqResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.json().await?;
            Ok(body)
        } else {
            let message = response.text().await.unwrap_or_default();

            match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    Err(MonarqError::AuthFailed(message))
                }
                _ => Err(MonarqError::ApiError {
                    status: status.as_u16(),
                    message,
                }),
            }
        }
    }
}

impl fmt::Debug for MonarqClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonarqClient")
            .field("base_url", &self.base_url)
            .field("user", &self.user)
            .field("access_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Paged list response.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    /// Matching entries.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// Project entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInfo {
    /// Project id used in submissions.
    pub id: String,
    /// Project name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Machine entry.
#[derive(Debug, Clone, Deserialize)]
pub struct MachineInfo {
    /// Machine name.
    pub name: String,
    /// Operational status, e.g. `"online"`.
    #[serde(default)]
    pub status: Option<String>,
}

impl MachineInfo {
    /// Check if the machine accepts jobs.
    pub fn is_online(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("online"))
    }
}

/// Request to submit a job.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequest {
    /// Job name.
    pub name: String,
    /// Submission time, `YYYY-MM-DD HH:MM:SS`.
    pub datetime: String,
    /// The circuit.
    pub circuit: WireCircuit,
    /// Project id.
    #[serde(rename = "projectID")]
    pub project_id: String,
    /// Target machine.
    #[serde(rename = "machineName")]
    pub machine_name: String,
    /// Number of shots.
    #[serde(rename = "shotCount")]
    pub shot_count: u32,
}

/// Response of a job submission or lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct JobResponse {
    /// Job description.
    pub job: JobInfo,
    /// Result, present once the job succeeded.
    #[serde(default)]
    pub result: Option<JobResult>,
}

/// Job description.
#[derive(Debug, Clone, Deserialize)]
pub struct JobInfo {
    /// Job identifier.
    #[serde(default)]
    pub id: Option<String>,
    /// Job status.
    #[serde(default)]
    pub status: Option<JobState>,
}

/// Job status as reported by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct JobState {
    /// `SUCCEEDED`, `FAILED`, `CANCELLED`, or a pending state.
    #[serde(rename = "type")]
    pub kind: String,
    /// Additional information, e.g. the failure reason.
    #[serde(default)]
    pub information: Option<String>,
}

impl JobState {
    /// Check if the job succeeded.
    pub fn is_succeeded(&self) -> bool {
        self.kind.eq_ignore_ascii_case("SUCCEEDED")
    }

    /// Check if the job failed.
    pub fn is_failed(&self) -> bool {
        self.kind.eq_ignore_ascii_case("FAILED")
    }

    /// Check if the job was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.kind.eq_ignore_ascii_case("CANCELLED")
    }

    /// Check if the job is executing.
    pub fn is_running(&self) -> bool {
        self.kind.eq_ignore_ascii_case("RUNNING")
    }
}

/// Job result.
#[derive(Debug, Clone, Deserialize)]
pub struct JobResult {
    /// Bitstring histogram; character `i` is classical bit `i`.
    #[serde(default)]
    pub histogram: HashMap<String, u64>,
}
