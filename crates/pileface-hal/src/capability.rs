//! Backend capability introspection.
//!
//! Describes what a backend can run: how many qubits, which gates, how many
//! shots per job, and whether the outcome comes from an ideal simulation or
//! from calibrated hardware.

/// Hardware capabilities of a quantum backend.
#[derive(Debug, Clone)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported gate set (OpenQASM 3 naming convention).
    pub gate_set: GateSet,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Ideal simulator (`true`) or real hardware (`false`). Hardware outcomes
    /// carry device noise and are not guaranteed to be fair.
    pub is_simulator: bool,
}

impl Capabilities {
    /// Create capabilities for the local simulator.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: GateSet::new(["h", "x"]),
            max_shots: 100_000,
            is_simulator: true,
        }
    }

    /// Create capabilities for a Calcul Québec superconducting device.
    ///
    /// The service transpiles `h` and `x` to its native set server-side.
    pub fn monarq(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            gate_set: GateSet::new(["h", "x"]),
            max_shots: 1_000,
            is_simulator: false,
        }
    }
}

/// Set of gate names a backend accepts.
#[derive(Debug, Clone, Default)]
pub struct GateSet {
    /// Gate names in OpenQASM 3 naming.
    pub native: Vec<String>,
}

impl GateSet {
    /// Create a gate set from names.
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            native: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether a gate is supported.
    pub fn contains(&self, name: &str) -> bool {
        self.native.iter().any(|g| g == name)
    }
}
