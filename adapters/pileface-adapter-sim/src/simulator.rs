//! Simulator backend implementation.

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, instrument};
use uuid::Uuid;

use pileface_hal::{
    Backend, BackendAvailability, Capabilities, Counts, ExecutionResult, HalError, HalResult,
    JobId, JobStatus,
};
use pileface_ir::{Circuit, InstructionKind};

use crate::statevector::Statevector;

/// Default qubit limit of the simulator.
pub const DEFAULT_MAX_QUBITS: u32 = 20;

/// Job data for the simulator.
struct SimJob {
    status: JobStatus,
    result: ExecutionResult,
    /// The job reports `Running` until this instant.
    ready_at: tokio::time::Instant,
}

impl SimJob {
    /// Current status, completing the job once its latency has elapsed.
    fn refresh(&mut self) -> &JobStatus {
        if tokio::time::Instant::now() >= self.ready_at {
            self.status.advance(JobStatus::Completed);
        }
        &self.status
    }
}

/// Local simulator backend.
///
/// Circuits run to completion inside [`Backend::submit`]; the optional
/// latency only delays the moment the job reports `Completed`.
pub struct SimulatorBackend {
    /// Cached capabilities.
    capabilities: Capabilities,
    /// Active jobs.
    jobs: Arc<Mutex<FxHashMap<String, SimJob>>>,
    /// Measurement sampler.
    rng: Mutex<StdRng>,
    /// Artificial delay before a job completes.
    latency: Duration,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Create a simulator with custom max qubits.
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        Self {
            capabilities: Capabilities::simulator(max_qubits),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            rng: Mutex::new(StdRng::from_entropy()),
            latency: Duration::ZERO,
        }
    }

    /// Seed the sampler for reproducible outcomes.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// Delay job completion to mimic a hardware queue.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Run simulation synchronously.
    #[instrument(skip(self, circuit), fields(qubits = circuit.num_qubits()))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> ExecutionResult {
        let start = Instant::now();
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let mut counts = Counts::new();

        if measurements_are_final(circuit) {
            // Nothing acts on a qubit after it is read, so one final state
            // serves every shot.
            let mut sv = Statevector::new(circuit.num_qubits());
            for inst in circuit.instructions() {
                sv.apply(inst);
            }
            for _ in 0..shots {
                let outcome = sv.sample(&mut *rng);
                let mut bits = vec!['0'; circuit.num_clbits()];
                for inst in circuit.instructions() {
                    if inst.kind == InstructionKind::Measure {
                        for (qubit, clbit) in inst.qubits.iter().zip(&inst.clbits) {
                            bits[clbit.0 as usize] = bit_char((outcome >> qubit.0) & 1 == 1);
                        }
                    }
                }
                counts.insert(bits.into_iter().collect::<String>(), 1);
            }
        } else {
            debug!("gates follow a measurement, collapsing per shot");
            for _ in 0..shots {
                let mut sv = Statevector::new(circuit.num_qubits());
                let mut bits = vec!['0'; circuit.num_clbits()];
                for inst in circuit.instructions() {
                    match inst.kind {
                        InstructionKind::Gate(_) => sv.apply(inst),
                        InstructionKind::Measure => {
                            for (qubit, clbit) in inst.qubits.iter().zip(&inst.clbits) {
                                let one = sv.measure(qubit.0 as usize, &mut *rng);
                                bits[clbit.0 as usize] = bit_char(one);
                            }
                        }
                    }
                }
                counts.insert(bits.into_iter().collect::<String>(), 1);
            }
        }

        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);

        ExecutionResult::new(counts, shots).with_execution_time(elapsed.as_millis() as u64)
    }
}

/// Whether no gate touches a qubit after it has been measured.
fn measurements_are_final(circuit: &Circuit) -> bool {
    let mut measured = FxHashSet::default();
    for inst in circuit.instructions() {
        match inst.kind {
            InstructionKind::Measure => measured.extend(inst.qubits.iter().copied()),
            InstructionKind::Gate(_) => {
                if inst.qubits.iter().any(|q| measured.contains(q)) {
                    return false;
                }
            }
        }
    }
    true
}

fn bit_char(one: bool) -> char {
    if one { '1' } else { '0' }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.capabilities.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    #[instrument(skip(self, circuit))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        let max_qubits = self.capabilities.num_qubits;
        if circuit.num_qubits() > max_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                max_qubits
            )));
        }
        if shots == 0 || shots > self.capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} (allowed 1..={})",
                self.capabilities.max_shots
            )));
        }

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let sim_job = SimJob {
            status: JobStatus::Running,
            result: self.run_simulation(circuit, shots),
            ready_at: tokio::time::Instant::now() + self.latency,
        };

        self.jobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(job_id.0.clone(), sim_job);

        debug!("Submitted job: {}", job_id);
        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let sim_job = jobs
            .get_mut(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;

        Ok(sim_job.refresh().clone())
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let sim_job = jobs
            .get_mut(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;

        match sim_job.refresh().clone() {
            JobStatus::Completed => Ok(sim_job.result.clone()),
            JobStatus::Cancelled => Err(HalError::JobCancelled),
            other => Err(HalError::Backend(format!("Job {job_id} is {other}"))),
        }
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let sim_job = jobs
            .get_mut(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;

        sim_job.status.advance(JobStatus::Cancelled);
        Ok(())
    }

    fn poll_interval(&self) -> Duration {
        self.latency.clamp(Duration::from_millis(1), Duration::from_millis(100))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pileface_ir::QubitId;

    #[test]
    fn test_simulator_capabilities() {
        let backend = SimulatorBackend::new();
        let caps = backend.capabilities();

        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, DEFAULT_MAX_QUBITS);
        assert!(caps.gate_set.contains("h"));
    }

    #[tokio::test]
    async fn test_x_before_measure_always_reads_one() {
        let backend = SimulatorBackend::new();

        let mut circuit = Circuit::with_size("tails", 1, 1);
        circuit.x(QubitId(0)).unwrap();
        circuit.measure(QubitId(0), 0.into()).unwrap();

        let job_id = backend.submit(&circuit, 500).await.unwrap();
        let result = backend.wait(&job_id).await.unwrap();

        assert_eq!(result.shots, 500);
        assert_eq!(result.counts.get("1"), 500);
        assert_eq!(result.counts.get("0"), 0);
    }

    #[tokio::test]
    async fn test_coin_flip_yields_both_outcomes() {
        let backend = SimulatorBackend::new().with_seed(42);

        let circuit = Circuit::coin_flip(1).unwrap();
        let job_id = backend.submit(&circuit, 1000).await.unwrap();
        let result = backend.wait(&job_id).await.unwrap();

        let heads = result.counts.get("0");
        let tails = result.counts.get("1");
        assert_eq!(heads + tails, 1000);
        assert!(heads > 350 && tails > 350, "heads={heads} tails={tails}");
    }

    #[tokio::test]
    async fn test_bitstring_index_is_clbit() {
        let backend = SimulatorBackend::new();

        // q1 flipped, q0 untouched: clbit 1 reads 1, clbit 0 reads 0.
        let mut circuit = Circuit::with_size("order", 2, 2);
        circuit.x(QubitId(1)).unwrap();
        circuit.measure(QubitId(0), 0.into()).unwrap();
        circuit.measure(QubitId(1), 1.into()).unwrap();

        let job_id = backend.submit(&circuit, 10).await.unwrap();
        let result = backend.result(&job_id).await.unwrap();
        assert_eq!(result.counts.get("01"), 10);
    }

    #[tokio::test]
    async fn test_seed_is_reproducible() {
        let circuit = Circuit::coin_flip(4).unwrap();

        let a = SimulatorBackend::new().with_seed(9);
        let b = SimulatorBackend::new().with_seed(9);
        let ra = a.wait(&a.submit(&circuit, 64).await.unwrap()).await.unwrap();
        let rb = b.wait(&b.submit(&circuit, 64).await.unwrap()).await.unwrap();

        assert_eq!(ra.counts.sorted(), rb.counts.sorted());
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_delays_completion() {
        let backend = SimulatorBackend::new().with_latency(Duration::from_secs(7));

        let circuit = Circuit::coin_flip(1).unwrap();
        let job_id = backend.submit(&circuit, 1).await.unwrap();
        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Running);

        let result = backend.wait(&job_id).await.unwrap();
        assert_eq!(result.counts.total_shots(), 1);
        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Completed);
    }

    #[tokio::test]
    async fn test_simulator_too_many_qubits() {
        let backend = SimulatorBackend::with_max_qubits(5);

        let circuit = Circuit::with_size("test", 10, 0);
        let result = backend.submit(&circuit, 100).await;

        assert!(matches!(result, Err(HalError::CircuitTooLarge(_))));
    }

    #[tokio::test]
    async fn test_zero_shots_rejected() {
        let backend = SimulatorBackend::new();
        let circuit = Circuit::coin_flip(1).unwrap();
        let result = backend.submit(&circuit, 0).await;

        assert!(matches!(result, Err(HalError::InvalidShots(_))));
    }

    #[tokio::test]
    async fn test_cancel_and_unknown_job() {
        let backend = SimulatorBackend::new().with_latency(Duration::from_secs(60));
        let circuit = Circuit::coin_flip(1).unwrap();
        let job_id = backend.submit(&circuit, 1).await.unwrap();

        backend.cancel(&job_id).await.unwrap();
        assert_eq!(backend.status(&job_id).await.unwrap(), JobStatus::Cancelled);
        assert!(matches!(
            backend.wait(&job_id).await,
            Err(HalError::JobCancelled)
        ));

        let missing = JobId::new("missing");
        assert!(matches!(
            backend.status(&missing).await,
            Err(HalError::JobNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_result_available_without_polling() {
        let backend = SimulatorBackend::new();
        let circuit = Circuit::coin_flip(1).unwrap();

        let job_id = backend.submit(&circuit, 3).await.unwrap();
        let result = backend.result(&job_id).await.unwrap();
        assert_eq!(result.counts.total_shots(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_before_latency_elapsed_is_pending() {
        let backend = SimulatorBackend::new().with_latency(Duration::from_secs(7));
        let circuit = Circuit::coin_flip(1).unwrap();
        let job_id = backend.submit(&circuit, 1).await.unwrap();

        assert!(matches!(
            backend.result(&job_id).await,
            Err(HalError::Backend(_))
        ));

        tokio::time::advance(Duration::from_secs(7)).await;
        assert_eq!(backend.result(&job_id).await.unwrap().shots, 1);
    }

    #[tokio::test]
    async fn test_gate_after_measure_sees_collapsed_state() {
        let backend = SimulatorBackend::new().with_seed(42);

        // c0 reads a fair coin; the second H must not undo that reading.
        let mut circuit = Circuit::with_size("remeasure", 1, 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.measure(QubitId(0), 0.into()).unwrap();
        circuit.h(QubitId(0)).unwrap();
        circuit.measure(QubitId(0), 1.into()).unwrap();

        let job_id = backend.submit(&circuit, 1000).await.unwrap();
        let result = backend.wait(&job_id).await.unwrap();

        let first_one: u64 = result
            .counts
            .iter()
            .filter(|(bits, _)| bits.starts_with('1'))
            .map(|(_, &n)| n)
            .sum();
        let second_one: u64 = result
            .counts
            .iter()
            .filter(|(bits, _)| bits.ends_with('1'))
            .map(|(_, &n)| n)
            .sum();
        assert!(first_one > 350 && first_one < 650, "first_one={first_one}");
        assert!(second_one > 350 && second_one < 650, "second_one={second_one}");
    }

    #[test]
    fn test_measurements_are_final() {
        let coin = Circuit::coin_flip(3).unwrap();
        assert!(measurements_are_final(&coin));

        let mut other_qubit = Circuit::with_size("other", 2, 1);
        other_qubit.measure(QubitId(0), 0.into()).unwrap();
        other_qubit.h(QubitId(1)).unwrap();
        assert!(measurements_are_final(&other_qubit));

        let mut after = Circuit::with_size("after", 1, 1);
        after.measure(QubitId(0), 0.into()).unwrap();
        after.x(QubitId(0)).unwrap();
        assert!(!measurements_are_final(&after));
    }
}
