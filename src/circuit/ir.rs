/// Circuit intermediate representation.
///
/// A circuit is a flat, ordered sequence of `Instruction`s over a quantum
/// register of `num_qubits` and a classical register of `num_clbits`.
///
///   - One enum variant per gate, so backends never dispatch on strings
///   - Angles stored as f64 radians
///   - Qubit and classical-bit indices as usize, checked by `Circuit::validate`
///   - `Display` prints an OpenQASM-2-style listing
use crate::core::state::MAX_QUBITS;
use crate::error::{HhlError, Result};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::fmt;

// ── Instruction ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    // ── Single-qubit gates ──────────────────────────────────────────────
    H(usize),
    X(usize),
    Y(usize),
    Z(usize),
    S(usize),
    T(usize),
    Rx    { qubit: usize, theta: f64 },
    Ry    { qubit: usize, theta: f64 },
    Rz    { qubit: usize, theta: f64 },
    Phase { qubit: usize, theta: f64 },

    // ── Controlled and multi-qubit gates ────────────────────────────────
    Cnot    { control: usize, target: usize },
    Cz      { control: usize, target: usize },
    Crx     { control: usize, target: usize, theta: f64 },
    Cry     { control: usize, target: usize, theta: f64 },
    Cp      { control: usize, target: usize, theta: f64 },
    Swap    { qubit_a: usize, qubit_b: usize },
    Toffoli { control0: usize, control1: usize, target: usize },
    Cswap   { control: usize, qubit_a: usize, qubit_b: usize },

    // ── Measurement ─────────────────────────────────────────────────────
    /// Measure `qubit` into classical bit `clbit`.
    Measure { qubit: usize, clbit: usize },

    /// Visual separator, no quantum effect.
    Barrier,
}

impl Instruction {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::H(_)            => "h",
            Self::X(_)            => "x",
            Self::Y(_)            => "y",
            Self::Z(_)            => "z",
            Self::S(_)            => "s",
            Self::T(_)            => "t",
            Self::Rx { .. }       => "rx",
            Self::Ry { .. }       => "ry",
            Self::Rz { .. }       => "rz",
            Self::Phase { .. }    => "p",
            Self::Cnot { .. }     => "cx",
            Self::Cz { .. }       => "cz",
            Self::Crx { .. }      => "crx",
            Self::Cry { .. }      => "cry",
            Self::Cp { .. }       => "cp",
            Self::Swap { .. }     => "swap",
            Self::Toffoli { .. }  => "ccx",
            Self::Cswap { .. }    => "cswap",
            Self::Measure { .. }  => "measure",
            Self::Barrier         => "barrier",
        }
    }

    /// True if this instruction applies a unitary gate.
    pub fn is_gate(&self) -> bool {
        !matches!(self, Self::Measure { .. } | Self::Barrier)
    }

    pub fn is_measurement(&self) -> bool {
        matches!(self, Self::Measure { .. })
    }

    /// Qubit indices referenced by this instruction, controls first.
    pub fn qubits(&self) -> Vec<usize> {
        match self {
            Self::H(q) | Self::X(q) | Self::Y(q) | Self::Z(q)
            | Self::S(q) | Self::T(q)                              => vec![*q],
            Self::Rx { qubit, .. } | Self::Ry { qubit, .. }
            | Self::Rz { qubit, .. } | Self::Phase { qubit, .. }
            | Self::Measure { qubit, .. }                          => vec![*qubit],
            Self::Cnot { control, target } | Self::Cz { control, target }
            | Self::Crx { control, target, .. }
            | Self::Cry { control, target, .. }
            | Self::Cp { control, target, .. }                     => vec![*control, *target],
            Self::Swap { qubit_a, qubit_b }                        => vec![*qubit_a, *qubit_b],
            Self::Toffoli { control0, control1, target }           => vec![*control0, *control1, *target],
            Self::Cswap { control, qubit_a, qubit_b }              => vec![*control, *qubit_a, *qubit_b],
            Self::Barrier                                          => vec![],
        }
    }

    /// The adjoint of this gate, or `None` for a measurement.
    pub fn inverse(&self) -> Option<Self> {
        let inv = match self.clone() {
            Self::S(qubit) => Self::Phase { qubit, theta: -FRAC_PI_2 },
            Self::T(qubit) => Self::Phase { qubit, theta: -FRAC_PI_4 },
            Self::Rx { qubit, theta }    => Self::Rx { qubit, theta: -theta },
            Self::Ry { qubit, theta }    => Self::Ry { qubit, theta: -theta },
            Self::Rz { qubit, theta }    => Self::Rz { qubit, theta: -theta },
            Self::Phase { qubit, theta } => Self::Phase { qubit, theta: -theta },
            Self::Crx { control, target, theta } => Self::Crx { control, target, theta: -theta },
            Self::Cry { control, target, theta } => Self::Cry { control, target, theta: -theta },
            Self::Cp  { control, target, theta } => Self::Cp  { control, target, theta: -theta },
            Self::Measure { .. } => return None,
            // H, X, Y, Z, CX, CZ, SWAP, CCX, CSWAP are self-inverse.
            other => other,
        };
        Some(inv)
    }

    fn theta(&self) -> Option<f64> {
        match self {
            Self::Rx { theta, .. } | Self::Ry { theta, .. } | Self::Rz { theta, .. }
            | Self::Phase { theta, .. } | Self::Crx { theta, .. }
            | Self::Cry { theta, .. } | Self::Cp { theta, .. } => Some(*theta),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())?;
        if let Some(theta) = self.theta() {
            write!(f, "({theta:.6})")?;
        }
        let operands: Vec<String> = self.qubits().iter().map(|q| format!("q[{q}]")).collect();
        if !operands.is_empty() {
            write!(f, " {}", operands.join(","))?;
        }
        if let Self::Measure { clbit, .. } = self {
            write!(f, " -> c[{clbit}]")?;
        }
        Ok(())
    }
}

// ── Circuit ───────────────────────────────────────────────────────────────

/// An ordered gate list with its quantum and classical register sizes.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    pub num_qubits: usize,
    pub num_clbits: usize,
    pub instructions: Vec<Instruction>,
}

impl Circuit {
    pub fn new(num_qubits: usize, num_clbits: usize) -> Self {
        Self { num_qubits, num_clbits, instructions: Vec::new() }
    }

    pub fn push(&mut self, instr: Instruction) -> &mut Self {
        self.instructions.push(instr);
        self
    }

    pub fn h(&mut self, q: usize) -> &mut Self { self.push(Instruction::H(q)) }
    pub fn x(&mut self, q: usize) -> &mut Self { self.push(Instruction::X(q)) }
    pub fn y(&mut self, q: usize) -> &mut Self { self.push(Instruction::Y(q)) }
    pub fn z(&mut self, q: usize) -> &mut Self { self.push(Instruction::Z(q)) }
    pub fn s(&mut self, q: usize) -> &mut Self { self.push(Instruction::S(q)) }
    pub fn t(&mut self, q: usize) -> &mut Self { self.push(Instruction::T(q)) }

    pub fn rx(&mut self, theta: f64, qubit: usize) -> &mut Self {
        self.push(Instruction::Rx { qubit, theta })
    }

    pub fn ry(&mut self, theta: f64, qubit: usize) -> &mut Self {
        self.push(Instruction::Ry { qubit, theta })
    }

    pub fn rz(&mut self, theta: f64, qubit: usize) -> &mut Self {
        self.push(Instruction::Rz { qubit, theta })
    }

    pub fn p(&mut self, theta: f64, qubit: usize) -> &mut Self {
        self.push(Instruction::Phase { qubit, theta })
    }

    pub fn cx(&mut self, control: usize, target: usize) -> &mut Self {
        self.push(Instruction::Cnot { control, target })
    }

    pub fn cz(&mut self, control: usize, target: usize) -> &mut Self {
        self.push(Instruction::Cz { control, target })
    }

    pub fn crx(&mut self, theta: f64, control: usize, target: usize) -> &mut Self {
        self.push(Instruction::Crx { control, target, theta })
    }

    pub fn cry(&mut self, theta: f64, control: usize, target: usize) -> &mut Self {
        self.push(Instruction::Cry { control, target, theta })
    }

    pub fn cp(&mut self, theta: f64, control: usize, target: usize) -> &mut Self {
        self.push(Instruction::Cp { control, target, theta })
    }

    pub fn swap(&mut self, qubit_a: usize, qubit_b: usize) -> &mut Self {
        self.push(Instruction::Swap { qubit_a, qubit_b })
    }

    pub fn ccx(&mut self, control0: usize, control1: usize, target: usize) -> &mut Self {
        self.push(Instruction::Toffoli { control0, control1, target })
    }

    pub fn cswap(&mut self, control: usize, qubit_a: usize, qubit_b: usize) -> &mut Self {
        self.push(Instruction::Cswap { control, qubit_a, qubit_b })
    }

    pub fn measure(&mut self, qubit: usize, clbit: usize) -> &mut Self {
        self.push(Instruction::Measure { qubit, clbit })
    }

    pub fn barrier(&mut self) -> &mut Self {
        self.push(Instruction::Barrier)
    }

    /// Append every instruction of `other`. Register sizes grow to cover both.
    pub fn append(&mut self, other: &Circuit) -> &mut Self {
        self.num_qubits = self.num_qubits.max(other.num_qubits);
        self.num_clbits = self.num_clbits.max(other.num_clbits);
        self.instructions.extend(other.instructions.iter().cloned());
        self
    }

    /// The adjoint circuit: instructions reversed and individually inverted.
    pub fn inverse(&self) -> Result<Circuit> {
        let instructions = self
            .instructions
            .iter()
            .rev()
            .map(|instr| {
                instr
                    .inverse()
                    .ok_or_else(|| HhlError::NonInvertible { instruction: instr.to_string() })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Circuit { num_qubits: self.num_qubits, num_clbits: self.num_clbits, instructions })
    }

    /// Check the register size and every operand against it.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_QUBITS).contains(&self.num_qubits) {
            return Err(HhlError::InvalidRegister { num_qubits: self.num_qubits });
        }
        for instr in &self.instructions {
            let qubits = instr.qubits();
            for (i, &qubit) in qubits.iter().enumerate() {
                if qubit >= self.num_qubits {
                    return Err(HhlError::QubitOutOfRange { qubit, num_qubits: self.num_qubits });
                }
                if qubits[..i].contains(&qubit) {
                    return Err(HhlError::DuplicateQubits { mnemonic: instr.mnemonic() });
                }
            }
            if let Instruction::Measure { clbit, .. } = *instr {
                if clbit >= self.num_clbits {
                    return Err(HhlError::ClbitOutOfRange { clbit, num_clbits: self.num_clbits });
                }
            }
        }
        Ok(())
    }

    /// Number of gate operations (excludes barriers and measurements).
    pub fn gate_count(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_gate()).count()
    }

    pub fn measure_count(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_measurement()).count()
    }

    /// True if no gate follows a measurement on any qubit it measured.
    pub fn has_terminal_measurements(&self) -> bool {
        let mut measured = vec![false; self.num_qubits];
        for instr in &self.instructions {
            match instr {
                Instruction::Measure { qubit, .. } => {
                    if let Some(m) = measured.get_mut(*qubit) {
                        *m = true;
                    }
                }
                Instruction::Barrier => {}
                gate => {
                    if gate.qubits().iter().any(|&q| measured.get(q).copied().unwrap_or(false)) {
                        return false;
                    }
                }
            }
        }
        true
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "qreg q[{}];", self.num_qubits)?;
        writeln!(f, "creg c[{}];", self.num_clbits)?;
        for instr in &self.instructions {
            writeln!(f, "{instr};")?;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_validate_rejects_empty_register() {
        assert!(matches!(
            Circuit::new(0, 0).validate(),
            Err(HhlError::InvalidRegister { num_qubits: 0 })
        ));
    }

    #[test]
    fn test_validate_register_upper_bound() {
        assert!(Circuit::new(MAX_QUBITS, 1).validate().is_ok());
        assert!(matches!(
            Circuit::new(MAX_QUBITS + 1, 1).validate(),
            Err(HhlError::InvalidRegister { num_qubits: 31 })
        ));
    }

    #[test]
    fn test_instruction_mnemonic() {
        assert_eq!(Instruction::H(0).mnemonic(), "h");
        assert_eq!(Instruction::Cnot { control: 0, target: 1 }.mnemonic(), "cx");
        assert_eq!(Instruction::Cswap { control: 0, qubit_a: 1, qubit_b: 2 }.mnemonic(), "cswap");
    }

    #[test]
    fn test_instruction_is_gate() {
        assert!(Instruction::H(0).is_gate());
        assert!(Instruction::Cry { control: 0, target: 1, theta: PI }.is_gate());
        assert!(!Instruction::Measure { qubit: 0, clbit: 0 }.is_gate());
        assert!(!Instruction::Barrier.is_gate());
    }

    #[test]
    fn test_instruction_qubits() {
        assert_eq!(Instruction::H(2).qubits(), vec![2]);
        assert_eq!(Instruction::Cp { control: 0, target: 3, theta: 1.0 }.qubits(), vec![0, 3]);
        assert_eq!(
            Instruction::Cswap { control: 5, qubit_a: 3, qubit_b: 4 }.qubits(),
            vec![5, 3, 4]
        );
        assert_eq!(Instruction::Barrier.qubits(), Vec::<usize>::new());
    }

    #[test]
    fn test_instruction_display() {
        assert_eq!(Instruction::H(0).to_string(), "h q[0]");
        assert_eq!(Instruction::Cnot { control: 0, target: 1 }.to_string(), "cx q[0],q[1]");
        assert_eq!(
            Instruction::Cry { control: 1, target: 0, theta: PI }.to_string(),
            format!("cry({PI:.6}) q[1],q[0]")
        );
        assert_eq!(Instruction::Measure { qubit: 5, clbit: 1 }.to_string(), "measure q[5] -> c[1]");
        assert_eq!(Instruction::Barrier.to_string(), "barrier");
    }

    #[test]
    fn test_inverse_negates_angles() {
        let cp = Instruction::Cp { control: 0, target: 1, theta: -PI / 2.0 };
        assert_eq!(cp.inverse(), Some(Instruction::Cp { control: 0, target: 1, theta: PI / 2.0 }));
        assert_eq!(Instruction::S(2).inverse(), Some(Instruction::Phase { qubit: 2, theta: -PI / 2.0 }));
        assert_eq!(Instruction::H(1).inverse(), Some(Instruction::H(1)));
        assert_eq!(Instruction::Measure { qubit: 0, clbit: 0 }.inverse(), None);
    }

    #[test]
    fn test_circuit_inverse_reverses_order() {
        let mut c = Circuit::new(2, 0);
        c.h(0).rz(0.3, 1).cx(0, 1);
        let inv = c.inverse().unwrap();
        assert_eq!(
            inv.instructions,
            vec![
                Instruction::Cnot { control: 0, target: 1 },
                Instruction::Rz { qubit: 1, theta: -0.3 },
                Instruction::H(0),
            ]
        );
    }

    #[test]
    fn test_inverse_rejects_measurement() {
        let mut c = Circuit::new(1, 1);
        c.h(0).measure(0, 0);
        assert!(matches!(c.inverse(), Err(HhlError::NonInvertible { .. })));
    }

    #[test]
    fn test_validate_ranges() {
        let mut ok = Circuit::new(2, 1);
        ok.h(0).cx(0, 1).measure(1, 0);
        assert!(ok.validate().is_ok());

        let mut bad_qubit = Circuit::new(2, 1);
        bad_qubit.cx(0, 2);
        assert!(matches!(
            bad_qubit.validate(),
            Err(HhlError::QubitOutOfRange { qubit: 2, num_qubits: 2 })
        ));

        let mut bad_clbit = Circuit::new(2, 1);
        bad_clbit.measure(0, 1);
        assert!(matches!(bad_clbit.validate(), Err(HhlError::ClbitOutOfRange { clbit: 1, .. })));

        let mut dup = Circuit::new(3, 0);
        dup.cswap(0, 1, 1);
        assert!(matches!(dup.validate(), Err(HhlError::DuplicateQubits { mnemonic: "cswap" })));
    }

    #[test]
    fn test_gate_and_measure_counts() {
        let mut c = Circuit::new(2, 2);
        c.h(0).cx(0, 1).barrier().measure(0, 0).measure(1, 1);
        assert_eq!(c.gate_count(), 2);
        assert_eq!(c.measure_count(), 2);
    }

    #[test]
    fn test_terminal_measurements() {
        let mut terminal = Circuit::new(2, 2);
        terminal.h(0).measure(0, 0).h(1).measure(1, 1);
        assert!(terminal.has_terminal_measurements());

        let mut mid = Circuit::new(2, 1);
        mid.h(0).measure(0, 0).cx(0, 1);
        assert!(!mid.has_terminal_measurements());
    }

    #[test]
    fn test_append_grows_registers() {
        let mut a = Circuit::new(1, 0);
        a.h(0);
        let mut b = Circuit::new(3, 1);
        b.measure(2, 0);
        a.append(&b);
        assert_eq!((a.num_qubits, a.num_clbits), (3, 1));
        assert_eq!(a.instructions.len(), 2);
    }

    #[test]
    fn test_circuit_display() {
        let mut c = Circuit::new(2, 1);
        c.h(0).cx(0, 1).measure(1, 0);
        let s = c.to_string();
        assert!(s.starts_with("qreg q[2];\ncreg c[1];\n"));
        assert!(s.contains("cx q[0],q[1];"));
        assert!(s.contains("measure q[1] -> c[0];"));
    }
}
