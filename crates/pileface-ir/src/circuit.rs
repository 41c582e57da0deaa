//! High-level circuit builder API.

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::Instruction;
use crate::qubit::{ClbitId, QubitId};

/// A quantum circuit.
///
/// Instructions are kept in program order. Qubit `i` and classical bit `i`
/// exist for every `i` below the respective sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Number of qubits.
    num_qubits: u32,
    /// Number of classical bits.
    num_clbits: u32,
    /// Instructions in program order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            num_clbits,
            instructions: vec![],
        }
    }

    /// Build the coin-flip circuit: a Hadamard on every coin qubit, then a
    /// measurement of qubit `i` into classical bit `i`.
    pub fn coin_flip(coins: u32) -> IrResult<Self> {
        if coins == 0 {
            return Err(IrError::NoCoins);
        }

        let mut circuit = Self::with_size("coin_flip", coins, coins);
        for i in 0..coins {
            circuit.h(QubitId(i))?;
        }
        for i in 0..coins {
            circuit.measure(QubitId(i), ClbitId(i))?;
        }
        Ok(circuit)
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_gate(StandardGate::H, qubit)
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply_gate(StandardGate::X, qubit)
    }

    /// Measure a qubit into a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.check_qubit(qubit)?;
        if clbit.0 >= self.num_clbits {
            return Err(IrError::ClbitNotFound(clbit));
        }
        self.instructions.push(Instruction::measure(qubit, clbit));
        Ok(self)
    }

    fn apply_gate(&mut self, gate: StandardGate, qubit: QubitId) -> IrResult<&mut Self> {
        self.check_qubit(qubit)?;
        self.instructions
            .push(Instruction::single_qubit_gate(gate, qubit));
        Ok(self)
    }

    fn check_qubit(&self, qubit: QubitId) -> IrResult<()> {
        if qubit.0 >= self.num_qubits {
            return Err(IrError::QubitNotFound(qubit));
        }
        Ok(())
    }

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits as usize
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits as usize
    }

    /// Instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Instructions touching the given qubit, in program order.
    pub fn ops_on(&self, qubit: QubitId) -> impl Iterator<Item = &Instruction> {
        self.instructions
            .iter()
            .filter(move |inst| inst.qubits.contains(&qubit))
    }

    /// Circuit depth: the longest chain of instructions on any single qubit.
    ///
    /// Every instruction here acts on one qubit, so this is the busiest wire.
    pub fn depth(&self) -> usize {
        (0..self.num_qubits)
            .map(|q| self.ops_on(QubitId(q)).count())
            .max()
            .unwrap_or(0)
    }
}
