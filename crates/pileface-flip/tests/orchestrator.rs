//! End-to-end checks of the flip sequence against a scripted backend.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use pileface_adapter_sim::SimulatorBackend;
use pileface_flip::config::{ConfigError, Credentials, Device, FlipConfig};
use pileface_flip::{CoinFlipResult, FlipError, Outcome, RenderError, Renderer, flip, run};
use pileface_hal::backend::{Backend, BackendAvailability};
use pileface_hal::capability::Capabilities;
use pileface_hal::error::{HalError, HalResult};
use pileface_hal::job::{JobId, JobStatus};
use pileface_hal::result::{Counts, ExecutionResult};
use pileface_ir::Circuit;

use async_trait::async_trait;

/// What the mock backend does with a submission.
enum Script {
    /// Complete with this bitstring.
    Bits(&'static str),
    /// Refuse the connection.
    Unreachable,
    /// Accept, then fail the job.
    JobFails(&'static str),
    /// Accept and never finish.
    Pending,
}

/// Backend that answers from a script and counts submissions.
struct MockBackend {
    script: Script,
    capabilities: Capabilities,
    submissions: AtomicUsize,
    submitted: Mutex<Vec<Circuit>>,
}

impl MockBackend {
    fn new(script: Script) -> Self {
        Self {
            script,
            capabilities: Capabilities::simulator(4),
            submissions: AtomicUsize::new(0),
            submitted: Mutex::new(Vec::new()),
        }
    }

    fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Backend for MockBackend {
    #[allow(clippy::unnecessary_literal_bound)]
    fn name(&self) -> &str {
        "mock"
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    async fn submit(&self, circuit: &Circuit, _shots: u32) -> HalResult<JobId> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(circuit.clone());
        match self.script {
            Script::Unreachable => Err(HalError::BackendUnavailable("connection refused".into())),
            _ => Ok(JobId::new("mock-1")),
        }
    }

    async fn status(&self, _job_id: &JobId) -> HalResult<JobStatus> {
        match self.script {
            Script::JobFails(reason) => Ok(JobStatus::Failed(reason.into())),
            Script::Pending => Ok(JobStatus::Queued),
            _ => Ok(JobStatus::Completed),
        }
    }

    async fn result(&self, _job_id: &JobId) -> HalResult<ExecutionResult> {
        match self.script {
            Script::Bits(bits) => {
                let counts: Counts = [(bits, 1)].into_iter().collect();
                Ok(ExecutionResult::new(counts, 1))
            }
            _ => Err(HalError::JobNotFound("mock-1".into())),
        }
    }

    async fn cancel(&self, _job_id: &JobId) -> HalResult<()> {
        Ok(())
    }
}

/// Renderer that records what it was asked to show.
#[derive(Default)]
struct RecordingRenderer {
    waiting: Vec<(usize, String)>,
    played: Vec<CoinFlipResult>,
    fail_play: bool,
}

impl Renderer for RecordingRenderer {
    fn waiting(&mut self, circuit: &Circuit, backend: &str) -> Result<(), RenderError> {
        self.waiting.push((circuit.num_qubits(), backend.to_string()));
        Ok(())
    }

    fn play(&mut self, result: &CoinFlipResult) -> Result<(), RenderError> {
        self.played.push(result.clone());
        if self.fail_play {
            return Err(RenderError::Unavailable("no terminal".into()));
        }
        Ok(())
    }
}

/// Renderer with a waiting animation that can give up after some frames.
struct AnimatedRenderer {
    ticks: usize,
    quit_after: Option<usize>,
    played: usize,
}

impl AnimatedRenderer {
    fn new(quit_after: Option<usize>) -> Self {
        Self {
            ticks: 0,
            quit_after,
            played: 0,
        }
    }
}

impl Renderer for AnimatedRenderer {
    fn frame_interval(&self) -> Option<Duration> {
        Some(Duration::from_millis(100))
    }

    fn tick(&mut self) -> Result<(), RenderError> {
        self.ticks += 1;
        if self.quit_after.is_some_and(|n| self.ticks >= n) {
            return Err(RenderError::Interrupted);
        }
        Ok(())
    }

    fn play(&mut self, _result: &CoinFlipResult) -> Result<(), RenderError> {
        self.played += 1;
        Ok(())
    }
}

#[tokio::test]
async fn bit_zero_plays_heads_once() {
    let backend = MockBackend::new(Script::Bits("0"));
    let mut renderer = RecordingRenderer::default();

    let result = flip(&backend, &mut renderer, 1).await.unwrap();

    assert_eq!(result.outcomes(), &[Outcome::Heads]);
    assert_eq!(renderer.played.len(), 1);
    assert_eq!(renderer.played[0].first(), Some(Outcome::Heads));
    assert_eq!(backend.submissions(), 1);
}

#[tokio::test]
async fn bit_one_plays_tails_once() {
    let backend = MockBackend::new(Script::Bits("1"));
    let mut renderer = RecordingRenderer::default();

    let result = flip(&backend, &mut renderer, 1).await.unwrap();

    assert_eq!(result.first(), Some(Outcome::Tails));
    assert_eq!(renderer.played.len(), 1);
    assert_eq!(renderer.played[0].first(), Some(Outcome::Tails));
    assert_eq!(backend.submissions(), 1);
}

#[tokio::test]
async fn submits_hadamard_then_measure_exactly_once() {
    let backend = MockBackend::new(Script::Bits("0"));
    let mut renderer = RecordingRenderer::default();

    flip(&backend, &mut renderer, 1).await.unwrap();

    let submitted = backend.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0], Circuit::coin_flip(1).unwrap());
    assert_eq!(renderer.waiting, vec![(1, "mock".to_string())]);
}

#[tokio::test]
async fn several_coins_map_bit_by_bit() {
    let backend = MockBackend::new(Script::Bits("0110"));
    let mut renderer = RecordingRenderer::default();

    let result = flip(&backend, &mut renderer, 4).await.unwrap();

    assert_eq!(
        result.outcomes(),
        &[Outcome::Heads, Outcome::Tails, Outcome::Tails, Outcome::Heads]
    );
    assert_eq!(result.heads(), 2);
    assert_eq!(result.tails(), 2);
}

#[tokio::test]
async fn connection_failure_never_plays() {
    let backend = MockBackend::new(Script::Unreachable);
    let mut renderer = RecordingRenderer::default();

    let err = flip(&backend, &mut renderer, 1).await.unwrap_err();

    assert!(matches!(err, FlipError::Connection(e) if e.is_unreachable()));
    assert!(renderer.played.is_empty());
    assert_eq!(backend.submissions(), 1);
}

#[tokio::test]
async fn failed_job_never_plays() {
    let backend = MockBackend::new(Script::JobFails("qubit offline"));
    let mut renderer = RecordingRenderer::default();

    let err = flip(&backend, &mut renderer, 1).await.unwrap_err();

    assert!(matches!(err, FlipError::Connection(HalError::JobFailed(msg)) if msg == "qubit offline"));
    assert!(renderer.played.is_empty());
}

#[tokio::test]
async fn malformed_result_is_connection_error() {
    let backend = MockBackend::new(Script::Bits("01"));
    let mut renderer = RecordingRenderer::default();

    let err = flip(&backend, &mut renderer, 1).await.unwrap_err();

    assert!(matches!(err, FlipError::Connection(HalError::MalformedResult(_))));
    assert!(renderer.played.is_empty());
}

#[tokio::test]
async fn render_failure_is_rendering_error_after_one_play() {
    let backend = MockBackend::new(Script::Bits("0"));
    let mut renderer = RecordingRenderer {
        fail_play: true,
        ..Default::default()
    };

    let err = flip(&backend, &mut renderer, 1).await.unwrap_err();

    assert!(matches!(err, FlipError::Rendering(_)));
    assert_eq!(renderer.played.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn animation_ticks_while_job_is_pending() {
    let backend = SimulatorBackend::new()
        .with_seed(3)
        .with_latency(Duration::from_secs(2));
    let mut renderer = AnimatedRenderer::new(None);

    let result = flip(&backend, &mut renderer, 2).await.unwrap();

    assert_eq!(result.len(), 2);
    assert!(renderer.ticks >= 15, "{} ticks", renderer.ticks);
    assert_eq!(renderer.played, 1);
}

#[tokio::test(start_paused = true)]
async fn quitting_during_wait_stops_without_playing() {
    let backend = MockBackend::new(Script::Pending);
    let mut renderer = AnimatedRenderer::new(Some(3));

    let err = flip(&backend, &mut renderer, 1).await.unwrap_err();

    assert!(matches!(err, FlipError::Rendering(RenderError::Interrupted)));
    assert_eq!(renderer.ticks, 3);
    assert_eq!(renderer.played, 0);
    assert_eq!(backend.submissions(), 1);
}

#[tokio::test]
async fn zero_coins_is_circuit_error_without_submission() {
    let backend = MockBackend::new(Script::Bits("0"));
    let mut renderer = RecordingRenderer::default();

    let err = flip(&backend, &mut renderer, 0).await.unwrap_err();

    assert!(matches!(err, FlipError::Circuit(_)));
    assert_eq!(backend.submissions(), 0);
}

#[tokio::test]
async fn too_many_coins_rejected_before_submission() {
    let backend = MockBackend::new(Script::Bits("00000"));
    let mut renderer = RecordingRenderer::default();

    let err = flip(&backend, &mut renderer, 5).await.unwrap_err();

    assert!(matches!(err, FlipError::Connection(HalError::InvalidCircuit(_))));
    assert_eq!(backend.submissions(), 0);
    assert!(renderer.waiting.is_empty());
}

#[tokio::test]
async fn missing_credentials_fail_before_any_display() {
    let mut renderer = RecordingRenderer::default();

    let err = run(&FlipConfig::new(Device::Monarq), &mut renderer)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FlipError::Configuration(ConfigError::MissingCredentials { .. })
    ));
    assert!(renderer.waiting.is_empty());
    assert!(renderer.played.is_empty());
}

#[tokio::test]
async fn unreachable_remote_is_connection_error() {
    let config = FlipConfig::new(Device::Yukon).with_credentials(Credentials {
        host: "http://127.0.0.1:1".into(),
        user: "alice".into(),
        access_token: "token".into(),
    });
    let mut renderer = RecordingRenderer::default();

    let err = run(&config, &mut renderer).await.unwrap_err();

    assert!(matches!(err, FlipError::Connection(HalError::Network(_))));
    assert!(renderer.played.is_empty());
}

#[tokio::test]
async fn simulator_run_plays_once() {
    let config = FlipConfig::new(Device::Simulation).with_coins(3);
    let mut renderer = RecordingRenderer::default();

    let result = run(&config, &mut renderer).await.unwrap();

    assert_eq!(result.len(), 3);
    assert_eq!(result.backend(), "simulator");
    assert_eq!(renderer.played, vec![result]);
}
