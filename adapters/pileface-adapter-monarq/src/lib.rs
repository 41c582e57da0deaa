//! pileface adapter for Calcul Québec quantum computers.
//!
//! This crate submits circuits to the MonarQ (`yamaska`, 24 qubits) and
//! Yukon (`yukon`, 6 qubits) superconducting devices through the Calcul
//! Québec REST API.
//!
//! # Authentication
//!
//! Every request carries HTTP basic authentication built from the account
//! user name and its access token. Jobs are submitted under a named project
//! (`default` unless configured), whose id is looked up once per backend.
//!
//! # Example
//!
//! ```ignore
//! use pileface_adapter_monarq::{MonarqBackend, YUKON_MACHINE};
//! use pileface_hal::Backend;
//! use pileface_ir::Circuit;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = MonarqBackend::with_credentials(
//!         "https://manager.example.ca",
//!         "alice",
//!         "token",
//!         YUKON_MACHINE,
//!     )?;
//!
//!     let circuit = Circuit::coin_flip(1)?;
//!     let job_id = backend.submit(&circuit, 1).await?;
//!     let result = backend.wait(&job_id).await?;
//!
//!     println!("Results: {:?}", result.counts);
//!     Ok(())
//! }
//! ```

mod api;
mod backend;
mod circuit;
mod error;

pub use api::MonarqClient;
pub use backend::{
    DEFAULT_PROJECT, MONARQ_BACKUP_MACHINE, MONARQ_MACHINE, MonarqBackend, YUKON_MACHINE,
    machine_qubits,
};
pub use circuit::{WireCircuit, WireOperation};
pub use error::{MonarqError, MonarqResult};
