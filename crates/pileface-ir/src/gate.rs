//! Quantum gate types.

/// Single-qubit gates the coin-flip backends understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardGate {
    /// Pauli-X gate.
    X,
    /// Hadamard gate.
    H,
}

impl StandardGate {
    /// OpenQASM 3 style lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::X => "x",
            StandardGate::H => "h",
        }
    }

    /// Label drawn inside the gate box of a circuit diagram.
    pub fn label(&self) -> &'static str {
        match self {
            StandardGate::X => "X",
            StandardGate::H => "H",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_names() {
        assert_eq!(StandardGate::H.name(), "h");
        assert_eq!(StandardGate::X.name(), "x");
    }
}
