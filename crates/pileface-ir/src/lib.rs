//! pileface Circuit Representation
//!
//! The circuits flipped by pileface are tiny: one superposition gate per coin
//! qubit followed by one measurement per qubit. This crate holds just enough
//! structure to describe them, hand them to a backend and draw them.
//!
//! # Example: A Single Coin
//!
//! ```rust
//! use pileface_ir::{Circuit, InstructionKind, StandardGate};
//!
//! let circuit = Circuit::coin_flip(1).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 1);
//! assert_eq!(circuit.num_clbits(), 1);
//!
//! let kinds: Vec<_> = circuit.instructions().iter().map(|i| &i.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [&InstructionKind::Gate(StandardGate::H), &InstructionKind::Measure]
//! );
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `X` | 1 | Pauli-X (bit flip) |
//! | `H` | 1 | Hadamard (superposition) |

pub mod circuit;
pub mod diagram;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{ClbitId, QubitId};
