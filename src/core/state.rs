/// Quantum state vector representation.
///
/// An n-qubit register has 2^n basis states, one complex amplitude each.
/// The vector must satisfy the normalization constraint: Σ|αᵢ|² = 1
use num_complex::Complex64;
use std::fmt;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Largest register the state vector accepts (2^30 amplitudes, 16 GiB).
pub const MAX_QUBITS: usize = 30;

#[derive(Debug, Clone)]
pub struct StateVector {
    pub num_qubits: usize,
    pub amplitudes: Vec<Complex64>,
}

impl StateVector {
    /// Create a new state vector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        assert!(num_qubits >= 1, "at least one qubit required");
        assert!(num_qubits <= MAX_QUBITS, "num_qubits > 30 would require >16 GB RAM");

        let mut amplitudes = vec![ZERO; 1 << num_qubits];
        amplitudes[0] = ONE;

        Self {
            num_qubits,
            amplitudes,
        }
    }

    /// Dimension of the state space: 2^n
    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Probability of measuring basis state `index`: |αᵢ|²
    #[inline(always)]
    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes[index].norm_sqr()
    }

    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Re-normalize the state vector to unit length.
    pub fn normalize(&mut self) {
        let total = self.total_probability();
        assert!(total > 1e-12, "state vector collapsed to zero: unphysical state");
        let inv_norm = 1.0 / total.sqrt();
        for amp in self.amplitudes.iter_mut() {
            *amp *= inv_norm;
        }
    }

    /// Reset to |0...0⟩
    pub fn reset(&mut self) {
        self.amplitudes.fill(ZERO);
        self.amplitudes[0] = ONE;
    }

    /// Check if `qubit`'s bit is set in basis state `basis_idx`.
    /// Qubit 0 is the least-significant bit.
    #[inline(always)]
    pub fn qubit_bit(basis_idx: usize, qubit: usize) -> bool {
        (basis_idx >> qubit) & 1 == 1
    }

    /// Basis state `index` as a bit string, qubit 0 rightmost.
    pub fn basis_label(&self, index: usize) -> String {
        (0..self.num_qubits)
            .rev()
            .map(|q| if Self::qubit_bit(index, q) { '1' } else { '0' })
            .collect()
    }

    /// Probability of measuring `qubit` as |1⟩, marginalized over all other qubits.
    pub fn marginal_probability_one(&self, qubit: usize) -> f64 {
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| Self::qubit_bit(*i, qubit))
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Projective measurement of `qubit` driven by a uniform sample `rng` in [0, 1).
    ///
    /// Returns `true` for |1⟩. The state is collapsed and re-normalized in place.
    pub fn collapse(&mut self, qubit: usize, rng: f64) -> bool {
        let outcome = rng < self.marginal_probability_one(qubit);
        self.zero_branch(qubit, !outcome);
        self.normalize();
        outcome
    }

    /// Post-select `qubit` on `outcome`.
    ///
    /// Returns the probability of the kept branch. The state is re-normalized
    /// when that probability is nonzero and left all-zero otherwise.
    pub fn project(&mut self, qubit: usize, outcome: bool) -> f64 {
        let p_one = self.marginal_probability_one(qubit);
        let p_kept = if outcome { p_one } else { 1.0 - p_one };
        self.zero_branch(qubit, !outcome);
        if p_kept > 1e-12 {
            self.normalize();
        }
        p_kept
    }

    /// Amplitudes of the `keep` qubits with every other qubit pinned.
    ///
    /// `fixed` lists `(qubit, value)` pairs for the qubits that are not kept;
    /// qubits absent from both lists are pinned to 0. The result is indexed by
    /// the kept qubits, `keep[0]` being the least-significant bit, and is
    /// not re-normalized.
    pub fn reduced_amplitudes(&self, keep: &[usize], fixed: &[(usize, bool)]) -> Vec<Complex64> {
        let base = fixed
            .iter()
            .filter(|(_, v)| *v)
            .fold(0usize, |acc, (q, _)| acc | (1 << q));

        (0..1usize << keep.len())
            .map(|sub| {
                let index = keep
                    .iter()
                    .enumerate()
                    .filter(|(bit, _)| (sub >> bit) & 1 == 1)
                    .fold(base, |acc, (_, q)| acc | (1 << q));
                self.amplitudes[index]
            })
            .collect()
    }

    fn zero_branch(&mut self, qubit: usize, value: bool) {
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if Self::qubit_bit(i, qubit) == value {
                *amp = ZERO;
            }
        }
    }
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "StateVector ({} qubits, dim={}):", self.num_qubits, self.dim())?;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            let prob = amp.norm_sqr();
            if prob > 1e-12 {
                writeln!(
                    f,
                    "  |{}⟩  amplitude: {:.6}{:+.6}i  probability: {:.4}",
                    self.basis_label(i),
                    amp.re,
                    amp.im,
                    prob
                )?;
            }
        }
        Ok(())
    }
}
