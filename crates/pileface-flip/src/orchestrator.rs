//! The coin-flip sequence.

use pileface_hal::{Backend, ExecutionResult, HalError, JobId, ValidationResult};
use pileface_ir::Circuit;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, instrument};

use crate::backend::connect;
use crate::config::FlipConfig;
use crate::error::FlipResult;
use crate::outcome::CoinFlipResult;
use crate::render::Renderer;

/// One shot is one flip.
const SHOTS: u32 = 1;

/// Flip `coins` coins on `backend` and show the result.
///
/// Builds the coin-flip circuit, submits it exactly once, waits for the
/// result, maps `0` to heads and `1` to tails, then calls
/// [`Renderer::play`] exactly once. A backend failure never reaches the
/// renderer's `play`.
#[instrument(skip(backend, renderer), fields(backend = backend.name()))]
pub async fn flip<B, R>(backend: &B, renderer: &mut R, coins: u32) -> FlipResult<CoinFlipResult>
where
    B: Backend + ?Sized,
    R: Renderer + ?Sized,
{
    let circuit = Circuit::coin_flip(coins)?;
    debug!(qubits = circuit.num_qubits(), "built circuit");

    if let ValidationResult::Invalid { reasons } = backend.validate(&circuit).await? {
        return Err(HalError::InvalidCircuit(reasons.join("; ")).into());
    }

    renderer.waiting(&circuit, backend.name())?;

    let job_id = backend.submit(&circuit, SHOTS).await?;
    info!(%job_id, "circuit submitted");

    let execution = wait_animated(backend, renderer, &job_id).await?;
    if let Some(ms) = execution.execution_time_ms {
        debug!(execution_time_ms = ms, "backend reported execution time");
    }
    let result = CoinFlipResult::from_counts(&execution.counts, circuit.num_clbits(), backend.name())?;
    info!(bits = result.bitstring(), heads = result.heads(), tails = result.tails(), "flip complete");

    renderer.play(&result)?;
    Ok(result)
}

/// Wait for `job_id`, ticking the renderer's animation meanwhile.
///
/// An error from [`Renderer::tick`] drops the wait and is returned as a
/// rendering error.
async fn wait_animated<B, R>(backend: &B, renderer: &mut R, job_id: &JobId) -> FlipResult<ExecutionResult>
where
    B: Backend + ?Sized,
    R: Renderer + ?Sized,
{
    let Some(period) = renderer.frame_interval() else {
        return Ok(backend.wait(job_id).await?);
    };

    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let wait = backend.wait(job_id);
    tokio::pin!(wait);

    loop {
        tokio::select! {
            result = &mut wait => return Ok(result?),
            _ = ticker.tick() => renderer.tick()?,
        }
    }
}

/// Select the backend for `config` and flip its coins.
pub async fn run<R>(config: &FlipConfig, renderer: &mut R) -> FlipResult<CoinFlipResult>
where
    R: Renderer + ?Sized,
{
    let backend = connect(config)?;
    flip(backend.as_ref(), renderer, config.coins).await
}
