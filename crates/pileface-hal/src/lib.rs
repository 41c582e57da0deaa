//! pileface Hardware Abstraction Layer
//!
//! A unified interface for the backends a coin can be flipped on: the local
//! ideal simulator and the remote Calcul Québec hardware queue.
//!
//! # Overview
//!
//! - A common [`Backend`] trait for job submission and management
//! - [`Capabilities`] to describe qubit count, gates and simulator/hardware
//! - Unified result handling via [`ExecutionResult`] and [`Counts`]
//!
//! # Supported Backends
//!
//! | Backend | Crate | Authentication |
//! |---------|-------|----------------|
//! | Local Simulator | `pileface-adapter-sim` | None |
//! | MonarQ / Yukon | `pileface-adapter-monarq` | `USER` + `ACCESS_TOKEN` (basic auth) |
//!
//! # Example: Flipping a Coin
//!
//! ```ignore
//! use pileface_hal::Backend;
//! use pileface_adapter_sim::SimulatorBackend;
//! use pileface_ir::Circuit;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let circuit = Circuit::coin_flip(1)?;
//!     let backend = SimulatorBackend::new();
//!
//!     let job_id = backend.submit(&circuit, 1).await?;
//!     let result = backend.wait(&job_id).await?;
//!
//!     if let Some((bitstring, _)) = result.counts.most_frequent() {
//!         println!("Measured: {bitstring}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod result;

pub use backend::{Backend, BackendAvailability, DEFAULT_POLL_INTERVAL, ValidationResult};
pub use capability::{Capabilities, GateSet};
pub use error::{HalError, HalResult};
pub use job::{JobId, JobStatus};
pub use result::{Counts, ExecutionResult};
