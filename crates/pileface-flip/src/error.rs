//! Error taxonomy of a coin-flip run.

use pileface_hal::HalError;
use pileface_ir::IrError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::render::RenderError;

/// Why a coin-flip run stopped.
///
/// Every variant is fatal: nothing is retried.
#[derive(Debug, Error)]
pub enum FlipError {
    /// Missing or invalid configuration for the selected device.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The backend was unreachable, rejected the job, or returned garbage.
    #[error("Connection error: {0}")]
    Connection(#[from] HalError),

    /// The display surface failed.
    #[error("Rendering error: {0}")]
    Rendering(#[from] RenderError),

    /// The coin count cannot form a circuit.
    #[error("Circuit error: {0}")]
    Circuit(#[from] IrError),
}

/// Result type for coin-flip operations.
pub type FlipResult<T> = Result<T, FlipError>;
