//! Conversion of circuits to the Calcul Québec JSON circuit format.
//!
//! ```json
//! {
//!   "type": "circuit",
//!   "bits": [0],
//!   "qubits": [0],
//!   "operations": [
//!     { "type": "h", "qubits": [0] },
//!     { "type": "readout", "qubits": [0], "bits": [0] }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use pileface_ir::{Circuit, InstructionKind};

/// Circuit as sent in the `circuit` field of a job submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCircuit {
    /// Always `"circuit"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Classical bit indices.
    pub bits: Vec<u32>,
    /// Qubit indices.
    pub qubits: Vec<u32>,
    /// Operations in program order.
    pub operations: Vec<WireOperation>,
}

/// One operation of a [`WireCircuit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireOperation {
    /// Lowercase gate name, or `"readout"` for a measurement.
    #[serde(rename = "type")]
    pub kind: String,
    /// Target qubits.
    pub qubits: Vec<u32>,
    /// Classical bits written (readout only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bits: Vec<u32>,
}

impl From<&Circuit> for WireCircuit {
    fn from(circuit: &Circuit) -> Self {
        let operations = circuit
            .instructions()
            .iter()
            .map(|inst| WireOperation {
                kind: match inst.kind {
                    InstructionKind::Gate(gate) => gate.name().to_string(),
                    InstructionKind::Measure => "readout".to_string(),
                },
                qubits: inst.qubits.iter().map(|q| q.0).collect(),
                bits: inst.clbits.iter().map(|c| c.0).collect(),
            })
            .collect();

        Self {
            kind: "circuit".into(),
            bits: (0..circuit.num_clbits() as u32).collect(),
            qubits: (0..circuit.num_qubits() as u32).collect(),
            operations,
        }
    }
}
