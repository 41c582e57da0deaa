//! pileface Local Statevector Simulator
//!
//! An ideal, noiseless simulator for the coin-flip circuit family. Every
//! Hadamard is a perfectly fair coin: outcomes `0` and `1` each have
//! probability exactly one half.
//!
//! # Features
//!
//! - **Exact Simulation**: Full statevector representation
//! - **Reproducible Runs**: Optional RNG seed via [`SimulatorBackend::with_seed`]
//! - **Artificial Latency**: Optional delay before a job reports completion,
//!   to mimic the queueing delay of real hardware
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use pileface_adapter_sim::SimulatorBackend;
//! use pileface_hal::Backend;
//! use pileface_ir::Circuit;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::new()
//!         .with_seed(7)
//!         .with_latency(Duration::from_secs(2));
//!
//!     let circuit = Circuit::coin_flip(1)?;
//!     let job_id = backend.submit(&circuit, 1).await?;
//!     let result = backend.wait(&job_id).await?;
//!
//!     println!("Results: {:?}", result.counts);
//!     Ok(())
//! }
//! ```

mod simulator;
mod statevector;

pub use simulator::{DEFAULT_MAX_QUBITS, SimulatorBackend};
