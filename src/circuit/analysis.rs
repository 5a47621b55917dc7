/// Static circuit profiling.
///
/// Computes structural metrics **without** executing the circuit:
///
/// | Metric                   | Description                                            |
/// |--------------------------|--------------------------------------------------------|
/// | `gate_count`             | Number of gate instructions                            |
/// | `circuit_depth`          | Critical-path length assuming unbounded parallelism    |
/// | `multi_qubit_gate_count` | Gates on 2+ qubits, a proxy for entangling cost        |
/// | `gate_histogram`         | Per-mnemonic gate counts                               |
/// | `qubit_utilization`      | Number of gates touching each qubit                    |
use std::collections::BTreeMap;
use std::fmt::Write;

use super::ir::Circuit;

#[derive(Debug, Clone)]
pub struct CircuitAnalysis {
    pub num_qubits: usize,
    pub num_clbits: usize,
    pub gate_count: usize,
    pub measure_count: usize,

    /// Minimum number of sequential time steps, measurements included.
    /// Barriers synchronize every qubit but add no depth of their own.
    pub circuit_depth: usize,

    pub multi_qubit_gate_count: usize,

    /// Count of each gate mnemonic, ordered by name.
    pub gate_histogram: BTreeMap<&'static str, usize>,

    /// Gate touches per qubit (measurements excluded).
    pub qubit_utilization: Vec<usize>,
}

impl CircuitAnalysis {
    /// Fraction of gates that act on more than one qubit.
    pub fn entanglement_ratio(&self) -> f64 {
        if self.gate_count == 0 { return 0.0; }
        self.multi_qubit_gate_count as f64 / self.gate_count as f64
    }

    /// Human-readable profiling report.
    pub fn report(&self) -> String {
        let mut out = String::new();

        // Writing to a String cannot fail.
        let _ = writeln!(out, "  Qubits         : {} (+{} classical)", self.num_qubits, self.num_clbits);
        let _ = writeln!(out, "  Gate count     : {}", self.gate_count);
        let _ = writeln!(out, "  Circuit depth  : {}", self.circuit_depth);
        let _ = writeln!(
            out,
            "  Multi-qubit    : {}  ({:.1}% entangling)",
            self.multi_qubit_gate_count,
            self.entanglement_ratio() * 100.0
        );
        let _ = writeln!(out, "  Measurements   : {}", self.measure_count);

        out.push_str("\n  Gate breakdown:\n");
        let mut hist: Vec<(&&str, &usize)> = self.gate_histogram.iter().collect();
        hist.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        for (mnemonic, count) in hist {
            let _ = writeln!(out, "    {:8}  {count}", mnemonic);
        }

        out.push_str("\n  Qubit utilization (gate touches per qubit):\n");
        let max_uses = self.qubit_utilization.iter().copied().max().unwrap_or(1).max(1);
        for (q, &uses) in self.qubit_utilization.iter().enumerate() {
            let bar_len = (uses * 20 / max_uses).min(20);
            let _ = writeln!(
                out,
                "    q{q:<2}  {}{}  {uses}",
                "█".repeat(bar_len),
                " ".repeat(20 - bar_len)
            );
        }

        out
    }
}

/// Analyze `circuit`. Runs in O(instructions) and never executes anything.
///
/// Operands are assumed to be in range; call [`Circuit::validate`] first for
/// untrusted circuits.
pub fn analyze(circuit: &Circuit) -> CircuitAnalysis {
    // `qubit_time[q]` = depth of the frontier on qubit `q`.
    let mut qubit_time = vec![0usize; circuit.num_qubits];
    let mut gate_count = 0usize;
    let mut measure_count = 0usize;
    let mut multi_qubit_gate_count = 0usize;
    let mut gate_histogram = BTreeMap::new();
    let mut qubit_utilization = vec![0usize; circuit.num_qubits];

    for instr in &circuit.instructions {
        let qubits = instr.qubits();

        if qubits.is_empty() {
            // Barrier: align all frontiers.
            let max_t = qubit_time.iter().copied().max().unwrap_or(0);
            qubit_time.fill(max_t);
            continue;
        }

        if instr.is_measurement() {
            measure_count += 1;
        } else {
            gate_count += 1;
            *gate_histogram.entry(instr.mnemonic()).or_insert(0) += 1;
            for &q in &qubits {
                qubit_utilization[q] += 1;
            }
            if qubits.len() >= 2 {
                multi_qubit_gate_count += 1;
            }
        }

        let start = qubits.iter().map(|&q| qubit_time[q]).max().unwrap_or(0);
        for &q in &qubits {
            qubit_time[q] = start + 1;
        }
    }

    CircuitAnalysis {
        num_qubits: circuit.num_qubits,
        num_clbits: circuit.num_clbits,
        gate_count,
        measure_count,
        circuit_depth: qubit_time.iter().copied().max().unwrap_or(0),
        multi_qubit_gate_count,
        gate_histogram,
        qubit_utilization,
    }
}
