//! MonarQ backend implementation.

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use pileface_hal::{
    Backend, BackendAvailability, Capabilities, Counts, ExecutionResult, HalError, HalResult,
    JobId, JobStatus,
};
use pileface_ir::Circuit;

use crate::api::{JobResponse, MonarqClient, SubmitRequest};
use crate::circuit::WireCircuit;
use crate::error::{MonarqError, MonarqResult};

/// Project used when none is configured.
pub const DEFAULT_PROJECT: &str = "default";

/// Machine name of the 24-qubit MonarQ device.
pub const MONARQ_MACHINE: &str = "yamaska";

/// Machine name of the 24-qubit MonarQ backup device.
pub const MONARQ_BACKUP_MACHINE: &str = "monarq.backup";

/// Machine name of the 6-qubit Yukon device.
pub const YUKON_MACHINE: &str = "yukon";

/// Qubit count assumed for machines not listed in [`machine_qubits`].
const FALLBACK_QUBITS: u32 = 24;

/// Name under which jobs are submitted.
const JOB_NAME: &str = "pileface";

/// Hardware queues are slow; there is no point polling faster.
const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Qubit count of a known machine.
pub fn machine_qubits(machine: &str) -> Option<u32> {
    match machine {
        MONARQ_MACHINE | MONARQ_BACKUP_MACHINE => Some(24),
        YUKON_MACHINE => Some(6),
        _ => None,
    }
}

/// Job cache entry.
struct CachedJob {
    status: JobStatus,
    /// Width every histogram bitstring must have.
    num_clbits: usize,
    result: Option<ExecutionResult>,
}

/// Calcul Québec quantum computer backend.
///
/// Results come from calibrated superconducting hardware: a Hadamard coin is
/// close to fair, but device noise may bias it.
pub struct MonarqBackend {
    /// API client.
    client: MonarqClient,
    /// Target machine name.
    machine: String,
    /// Project to submit under.
    project: String,
    /// Cached capabilities.
    capabilities: Capabilities,
    /// Project id, resolved on first submission.
    project_id: Mutex<Option<String>>,
    /// Cached job information.
    jobs: Arc<Mutex<FxHashMap<String, CachedJob>>>,
}

impl MonarqBackend {
    /// Create a backend with explicit credentials.
    pub fn with_credentials(
        host: impl Into<String>,
        user: impl Into<String>,
        access_token: impl Into<String>,
        machine: impl Into<String>,
    ) -> MonarqResult<Self> {
        let client = MonarqClient::new(host, user, access_token)?;
        let machine = machine.into();
        let num_qubits = machine_qubits(&machine).unwrap_or(FALLBACK_QUBITS);
        let capabilities = Capabilities::monarq(&machine, num_qubits);

        Ok(Self {
            client,
            machine,
            project: DEFAULT_PROJECT.to_string(),
            capabilities,
            project_id: Mutex::new(None),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
        })
    }

    /// Submit under a project other than [`DEFAULT_PROJECT`].
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = project.into();
        self
    }

    /// Get the target machine name.
    pub fn machine(&self) -> &str {
        &self.machine
    }

    /// Get the project name.
    pub fn project(&self) -> &str {
        &self.project
    }

    async fn resolve_project_id(&self) -> MonarqResult<String> {
        let mut cached = self.project_id.lock().await;
        if let Some(id) = cached.as_ref() {
            return Ok(id.clone());
        }
        let id = self.client.project_id(&self.project).await?;
        debug!(project = %self.project, %id, "resolved project");
        *cached = Some(id.clone());
        Ok(id)
    }

    /// Convert the service histogram to counts, checking bitstring widths.
    fn histogram_to_counts(
        &self,
        response: &JobResponse,
        num_clbits: Option<usize>,
    ) -> MonarqResult<Counts> {
        let result = response
            .result
            .as_ref()
            .ok_or_else(|| MonarqError::MalformedResponse("job has no result".into()))?;

        let mut counts = Counts::new();
        for (bitstring, &count) in &result.histogram {
            if !bitstring.chars().all(|c| c == '0' || c == '1') {
                return Err(MonarqError::MalformedResponse(format!(
                    "not a bitstring: {bitstring:?}"
                )));
            }
            if num_clbits.is_some_and(|n| bitstring.len() != n) {
                return Err(MonarqError::MalformedResponse(format!(
                    "bitstring {bitstring:?} does not match the circuit's classical bits"
                )));
            }
            counts.insert(bitstring.clone(), count);
        }

        if counts.is_empty() {
            return Err(MonarqError::MalformedResponse("empty histogram".into()));
        }
        Ok(counts)
    }

    /// Map a job response to a status, caching the result on success.
    async fn record(&self, job_id: &JobId, response: &JobResponse) -> MonarqResult<JobStatus> {
        let state = response
            .job
            .status
            .as_ref()
            .ok_or_else(|| MonarqError::MalformedResponse("job has no status".into()))?;

        let mut jobs = self.jobs.lock().await;
        let cached = jobs.get_mut(&job_id.0);

        let (status, result) = if state.is_succeeded() {
            let counts = self.histogram_to_counts(response, cached.as_ref().map(|c| c.num_clbits))?;
            let shots = counts.total_shots() as u32;
            (JobStatus::Completed, Some(ExecutionResult::new(counts, shots)))
        } else if state.is_failed() {
            let reason = state.information.clone().unwrap_or_default();
            (JobStatus::Failed(reason), None)
        } else if state.is_cancelled() {
            (JobStatus::Cancelled, None)
        } else if state.is_running() {
            (JobStatus::Running, None)
        } else {
            (JobStatus::Queued, None)
        };

        if let Some(cached) = cached {
            cached.status.advance(status.clone());
            if result.is_some() {
                cached.result = result;
            }
        }
        Ok(status)
    }
}

#[async_trait]
impl Backend for MonarqBackend {
    fn name(&self) -> &str {
        &self.machine
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[instrument(skip(self), fields(machine = %self.machine))]
    async fn availability(&self) -> HalResult<BackendAvailability> {
        match self.client.machine(&self.machine).await {
            Ok(info) if info.is_online() => Ok(BackendAvailability {
                is_available: true,
                queue_depth: None,
                status_message: info.status,
            }),
            Ok(info) => Ok(BackendAvailability::unavailable(
                info.status.unwrap_or_else(|| "offline".into()),
            )),
            Err(e) => {
                debug!("Machine availability check failed: {}", e);
                Ok(BackendAvailability::unavailable(e.to_string()))
            }
        }
    }

    #[instrument(skip(self, circuit), fields(machine = %self.machine))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        info!(
            "Submitting circuit to {}: {} qubits, {} shots",
            self.machine,
            circuit.num_qubits(),
            shots
        );

        let caps = self.capabilities();
        if circuit.num_qubits() > caps.num_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but {} only supports {}",
                circuit.num_qubits(),
                self.machine,
                caps.num_qubits
            )));
        }
        if shots == 0 || shots > caps.max_shots {
            return Err(HalError::InvalidShots(format!(
                "Requested {} shots but allowed range is 1..={}",
                shots, caps.max_shots
            )));
        }

        let project_id = self.resolve_project_id().await?;
        let request = SubmitRequest {
            name: JOB_NAME.into(),
            datetime: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            circuit: WireCircuit::from(circuit),
            project_id,
            machine_name: self.machine.clone(),
            shot_count: shots,
        };

        let job_id = JobId::new(self.client.submit_job(&request).await?);
        info!("Job submitted: {}", job_id);

        self.jobs
            .lock()
            .await
            .insert(
                job_id.0.clone(),
                CachedJob {
                    status: JobStatus::Queued,
                    num_clbits: circuit.num_clbits(),
                    result: None,
                },
            );

        Ok(job_id)
    }

    #[instrument(skip(self))]
    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        {
            let jobs = self.jobs.lock().await;
            if let Some(cached) = jobs.get(&job_id.0) {
                if cached.status.is_terminal() {
                    return Ok(cached.status.clone());
                }
            }
        }

        let response = self.client.get_job(&job_id.0).await?;
        Ok(self.record(job_id, &response).await?)
    }

    #[instrument(skip(self))]
    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        {
            let jobs = self.jobs.lock().await;
            if let Some(result) = jobs.get(&job_id.0).and_then(|c| c.result.clone()) {
                return Ok(result);
            }
        }

        let response = self.client.get_job(&job_id.0).await?;
        match self.record(job_id, &response).await? {
            JobStatus::Completed => {
                let counts = self.histogram_to_counts(&response, None)?;
                let shots = counts.total_shots() as u32;
                Ok(ExecutionResult::new(counts, shots))
            }
            JobStatus::Failed(msg) => Err(HalError::JobFailed(msg)),
            JobStatus::Cancelled => Err(HalError::JobCancelled),
            pending => Err(HalError::Backend(format!("Job {job_id} is {pending}"))),
        }
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        // The service offers no cancellation endpoint.
        Err(HalError::Backend(format!(
            "Cancelling job {job_id} is not supported by {}",
            self.machine
        )))
    }

    fn poll_interval(&self) -> Duration {
        POLL_INTERVAL
    }
}
