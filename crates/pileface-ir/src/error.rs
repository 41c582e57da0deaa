//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors that can occur while building a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit not found in circuit.
    #[error("Qubit {0} not found in circuit")]
    QubitNotFound(QubitId),

    /// Classical bit not found in circuit.
    #[error("Classical bit {0} not found in circuit")]
    ClbitNotFound(ClbitId),

    /// A coin-flip circuit needs at least one coin.
    #[error("A coin flip needs at least one coin")]
    NoCoins,
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
