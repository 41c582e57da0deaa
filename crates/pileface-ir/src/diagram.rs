//! Text diagram of a circuit.
//!
//! Every instruction in a coin-flip circuit touches one qubit, so each wire
//! is drawn independently and padded to the longest one:
//!
//! ```text
//! q0: ──┤H├──┤M├══ c0
//! q1: ──┤H├──┤M├══ c1
//! ```

use crate::circuit::Circuit;
use crate::instruction::InstructionKind;
use crate::qubit::QubitId;

const WIRE: &str = "──";
const CLASSICAL_WIRE: &str = "══";

impl Circuit {
    /// Render the circuit as one text line per qubit.
    pub fn to_text(&self) -> String {
        self.text_lines().join("\n")
    }

    /// Render the circuit as a list of lines, one per qubit.
    pub fn text_lines(&self) -> Vec<String> {
        let label_width = self
            .num_qubits()
            .saturating_sub(1)
            .to_string()
            .len()
            + 1;
        let columns = (0..self.num_qubits() as u32)
            .map(|q| self.ops_on(QubitId(q)).count())
            .max()
            .unwrap_or(0);

        (0..self.num_qubits() as u32)
            .map(|q| {
                let mut line = format!("{:<label_width$}: ", format!("q{q}"));
                let mut measured_into = None;
                let mut drawn = 0;

                for inst in self.ops_on(QubitId(q)) {
                    line.push_str(WIRE);
                    match inst.kind {
                        InstructionKind::Gate(gate) => {
                            line.push('┤');
                            line.push_str(gate.label());
                            line.push('├');
                        }
                        InstructionKind::Measure => {
                            line.push_str("┤M├");
                            measured_into = inst.clbits.first().copied();
                        }
                    }
                    drawn += 1;
                }

                for _ in drawn..columns {
                    line.push_str(WIRE);
                    line.push_str("───");
                }

                match measured_into {
                    Some(clbit) => {
                        line.push_str(CLASSICAL_WIRE);
                        line.push(' ');
                        line.push_str(&clbit.to_string());
                    }
                    None => line.push_str(WIRE),
                }
                line
            })
            .collect()
    }
}
