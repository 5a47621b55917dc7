/// High-level quantum simulator interface.
///
/// `Simulator` wraps the state vector and gate kernels behind a chainable API:
///   - Gate application (H, X, Y, Z, S, T, Rx, Ry, Rz, P, CNOT, CZ, CRx, CRy,
///     CP, SWAP, Toffoli, CSWAP)
///   - Measurement with wavefunction collapse
///   - Seeded mode for reproducible sampling
///   - Optional noise channel applied after every gate
use super::gates::{
    self, apply_cnot, apply_controlled_gate, apply_cz, apply_fredkin, apply_single_qubit_gate,
    apply_swap, apply_toffoli,
};
use super::noise::NoiseChannel;
use super::state::StateVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

pub struct Simulator {
    pub state: StateVector,
    /// Measurement results per qubit (None = not yet measured)
    pub measurements: Vec<Option<bool>>,
    rng_seed: Option<u64>,
    rng: StdRng,
    noise_model: Option<NoiseChannel>,
}

impl Simulator {
    /// Create a simulator for `num_qubits` qubits in |0...0⟩, seeded from OS entropy.
    pub fn new(num_qubits: usize) -> Self {
        Self::build(num_qubits, None)
    }

    /// Create a simulator whose measurement outcomes are fully determined by `seed`.
    pub fn with_seed(num_qubits: usize, seed: u64) -> Self {
        Self::build(num_qubits, Some(seed))
    }

    /// Create a noisy simulator. `channel` is applied after every gate on the
    /// affected qubit(s).
    pub fn with_noise(num_qubits: usize, channel: NoiseChannel) -> Self {
        let mut sim = Self::new(num_qubits);
        sim.noise_model = Some(channel);
        sim
    }

    fn build(num_qubits: usize, rng_seed: Option<u64>) -> Self {
        Self {
            state: StateVector::new(num_qubits),
            measurements: vec![None; num_qubits],
            rng_seed,
            rng: Self::make_rng(rng_seed),
            noise_model: None,
        }
    }

    fn make_rng(seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    pub fn set_noise(&mut self, channel: NoiseChannel) {
        self.noise_model = Some(channel);
    }

    pub fn clear_noise(&mut self) {
        self.noise_model = None;
    }

    pub fn noise(&self) -> Option<NoiseChannel> {
        self.noise_model
    }

    pub fn num_qubits(&self) -> usize {
        self.state.num_qubits
    }

    // ── Single-Qubit Gates ────────────────────────────────────────────────

    pub fn h(&mut self, qubit: usize) -> &mut Self {
        self.apply(&gates::hadamard(), qubit)
    }

    pub fn x(&mut self, qubit: usize) -> &mut Self {
        self.apply(&gates::pauli_x(), qubit)
    }

    pub fn y(&mut self, qubit: usize) -> &mut Self {
        self.apply(&gates::pauli_y(), qubit)
    }

    pub fn z(&mut self, qubit: usize) -> &mut Self {
        self.apply(&gates::pauli_z(), qubit)
    }

    pub fn s(&mut self, qubit: usize) -> &mut Self {
        self.apply(&gates::s_gate(), qubit)
    }

    pub fn t(&mut self, qubit: usize) -> &mut Self {
        self.apply(&gates::t_gate(), qubit)
    }

    pub fn rx(&mut self, qubit: usize, theta: f64) -> &mut Self {
        self.apply(&gates::rx(theta), qubit)
    }

    pub fn ry(&mut self, qubit: usize, theta: f64) -> &mut Self {
        self.apply(&gates::ry(theta), qubit)
    }

    pub fn rz(&mut self, qubit: usize, theta: f64) -> &mut Self {
        self.apply(&gates::rz(theta), qubit)
    }

    pub fn phase(&mut self, qubit: usize, theta: f64) -> &mut Self {
        self.apply(&gates::phase_gate(theta), qubit)
    }

    /// Apply an arbitrary 2×2 matrix to `qubit`.
    pub fn apply(&mut self, gate: &gates::Matrix2x2, qubit: usize) -> &mut Self {
        apply_single_qubit_gate(&mut self.state, gate, qubit);
        self.apply_noise_if_set(&[qubit]);
        self
    }

    // ── Multi-Qubit Gates ─────────────────────────────────────────────────

    pub fn cnot(&mut self, control: usize, target: usize) -> &mut Self {
        apply_cnot(&mut self.state, control, target);
        self.apply_noise_if_set(&[control, target]);
        self
    }

    pub fn cz(&mut self, control: usize, target: usize) -> &mut Self {
        apply_cz(&mut self.state, control, target);
        self.apply_noise_if_set(&[control, target]);
        self
    }

    pub fn crx(&mut self, control: usize, target: usize, theta: f64) -> &mut Self {
        self.controlled(&gates::rx(theta), control, target)
    }

    pub fn cry(&mut self, control: usize, target: usize, theta: f64) -> &mut Self {
        self.controlled(&gates::ry(theta), control, target)
    }

    pub fn cp(&mut self, control: usize, target: usize, theta: f64) -> &mut Self {
        self.controlled(&gates::phase_gate(theta), control, target)
    }

    /// Apply `gate` to `target` controlled on `control`.
    pub fn controlled(&mut self, gate: &gates::Matrix2x2, control: usize, target: usize) -> &mut Self {
        apply_controlled_gate(&mut self.state, gate, control, target);
        self.apply_noise_if_set(&[control, target]);
        self
    }

    pub fn swap(&mut self, qubit_a: usize, qubit_b: usize) -> &mut Self {
        apply_swap(&mut self.state, qubit_a, qubit_b);
        self.apply_noise_if_set(&[qubit_a, qubit_b]);
        self
    }

    pub fn toffoli(&mut self, control0: usize, control1: usize, target: usize) -> &mut Self {
        apply_toffoli(&mut self.state, control0, control1, target);
        self.apply_noise_if_set(&[control0, control1, target]);
        self
    }

    pub fn cswap(&mut self, control: usize, qubit_a: usize, qubit_b: usize) -> &mut Self {
        apply_fredkin(&mut self.state, control, qubit_a, qubit_b);
        self.apply_noise_if_set(&[control, qubit_a, qubit_b]);
        self
    }

    // ── Measurement ───────────────────────────────────────────────────────

    /// Measure a single qubit, collapsing the state. Returns `true` for |1⟩.
    pub fn measure(&mut self, qubit: usize) -> bool {
        let r: f64 = self.rng.gen();
        let result = self.state.collapse(qubit, r);
        self.measurements[qubit] = Some(result);
        result
    }

    pub fn measure_all(&mut self) -> Vec<bool> {
        (0..self.num_qubits()).map(|q| self.measure(q)).collect()
    }

    /// Basis-state probabilities without collapsing.
    pub fn probabilities(&self) -> Vec<f64> {
        self.state.amplitudes.iter().map(|a| a.norm_sqr()).collect()
    }

    pub fn qubit_probability_one(&self, qubit: usize) -> f64 {
        self.state.marginal_probability_one(qubit)
    }

    // ── State Control ─────────────────────────────────────────────────────

    /// Reset to |0...0⟩, clear measurements, and rewind a seeded RNG.
    pub fn reset(&mut self) {
        self.state.reset();
        self.measurements.fill(None);
        if self.rng_seed.is_some() {
            self.rng = Self::make_rng(self.rng_seed);
        }
    }

    fn apply_noise_if_set(&mut self, qubits: &[usize]) {
        let Some(channel) = self.noise_model else { return };
        for &qubit in qubits {
            let r: f64 = self.rng.gen();
            channel.apply(&mut self.state, qubit, r);
        }
    }
}

impl fmt::Display for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.state)?;
        write!(f, "Measurements: [")?;
        for (i, m) in self.measurements.iter().enumerate() {
            match m {
                Some(true) => write!(f, "q{}=1", i)?,
                Some(false) => write!(f, "q{}=0", i)?,
                None => write!(f, "q{}=?", i)?,
            }
            if i + 1 < self.measurements.len() {
                write!(f, ", ")?;
            }
        }
        writeln!(f, "]")
    }
}
