/// Quantum gate definitions and application logic.
///
/// Single-qubit gates are 2×2 complex unitaries. A gate on `target` is applied
/// by pairing every basis state with its partner that differs only in the
/// target bit and multiplying the pair by the matrix, O(2^n) per gate.
/// Controlled variants restrict the pairs to those whose control bits are set.
use super::state::StateVector;
use num_complex::Complex64;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_4};

/// A 2×2 complex unitary matrix, row-major: `matrix[row][col]`.
pub type Matrix2x2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

// ── Standard Gate Matrices ─────────────────────────────────────────────────

/// H = (1/√2) * [[1, 1], [1, -1]]
pub fn hadamard() -> Matrix2x2 {
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

/// X = [[0, 1], [1, 0]]
pub fn pauli_x() -> Matrix2x2 {
    [[ZERO, ONE], [ONE, ZERO]]
}

/// Y = [[0, -i], [i, 0]]
pub fn pauli_y() -> Matrix2x2 {
    [[ZERO, -I], [I, ZERO]]
}

/// Z = [[1, 0], [0, -1]]
pub fn pauli_z() -> Matrix2x2 {
    [[ONE, ZERO], [ZERO, -ONE]]
}

/// S = [[1, 0], [0, i]]
pub fn s_gate() -> Matrix2x2 {
    [[ONE, ZERO], [ZERO, I]]
}

/// T = [[1, 0], [0, e^(iπ/4)]]
pub fn t_gate() -> Matrix2x2 {
    phase_gate(FRAC_PI_4)
}

/// Rx(θ) = [[cos(θ/2), -i·sin(θ/2)], [-i·sin(θ/2), cos(θ/2)]]
pub fn rx(theta: f64) -> Matrix2x2 {
    let (sin, cos) = (theta / 2.0).sin_cos();
    let c = Complex64::new(cos, 0.0);
    let s = Complex64::new(0.0, -sin);
    [[c, s], [s, c]]
}

/// Ry(θ) = [[cos(θ/2), -sin(θ/2)], [sin(θ/2), cos(θ/2)]]
pub fn ry(theta: f64) -> Matrix2x2 {
    let (sin, cos) = (theta / 2.0).sin_cos();
    let c = Complex64::new(cos, 0.0);
    let s = Complex64::new(sin, 0.0);
    [[c, -s], [s, c]]
}

/// Rz(θ) = [[e^(-iθ/2), 0], [0, e^(iθ/2)]]
pub fn rz(theta: f64) -> Matrix2x2 {
    [
        [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
        [ZERO, Complex64::from_polar(1.0, theta / 2.0)],
    ]
}

/// P(θ) = [[1, 0], [0, e^(iθ)]]
pub fn phase_gate(theta: f64) -> Matrix2x2 {
    [[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, theta)]]
}

pub fn identity() -> Matrix2x2 {
    [[ONE, ZERO], [ZERO, ONE]]
}

// ── Gate Application ───────────────────────────────────────────────────────

/// Apply a single-qubit gate to `target`.
pub fn apply_single_qubit_gate(state: &mut StateVector, gate: &Matrix2x2, target: usize) {
    assert!(target < state.num_qubits, "target qubit out of range");
    apply_masked(state, gate, target, 0);
}

/// Apply `gate` to `target` on the branch where `control` is |1⟩.
///
/// Covers CRx, CRy and CP; a controlled phase is symmetric in its operands.
pub fn apply_controlled_gate(
    state: &mut StateVector,
    gate: &Matrix2x2,
    control: usize,
    target: usize,
) {
    assert!(control < state.num_qubits, "control qubit out of range");
    assert!(target < state.num_qubits, "target qubit out of range");
    assert_ne!(control, target, "control and target must be different qubits");
    apply_masked(state, gate, target, 1 << control);
}

/// Flips `target` when `control` is |1⟩.
pub fn apply_cnot(state: &mut StateVector, control: usize, target: usize) {
    assert!(control < state.num_qubits, "control qubit out of range");
    assert!(target < state.num_qubits, "target qubit out of range");
    assert_ne!(control, target, "control and target must be different qubits");

    let control_mask = 1 << control;
    let target_mask = 1 << target;

    for i in 0..state.dim() {
        if (i & control_mask != 0) && (i & target_mask == 0) {
            state.amplitudes.swap(i, i | target_mask);
        }
    }
}

/// Phase flip on |11⟩.
pub fn apply_cz(state: &mut StateVector, control: usize, target: usize) {
    assert!(control < state.num_qubits, "control qubit out of range");
    assert!(target < state.num_qubits, "target qubit out of range");
    assert_ne!(control, target, "control and target must be different qubits");

    let mask = (1 << control) | (1 << target);
    for (i, amp) in state.amplitudes.iter_mut().enumerate() {
        if i & mask == mask {
            *amp = -*amp;
        }
    }
}

/// Exchange the states of two qubits.
pub fn apply_swap(state: &mut StateVector, qubit_a: usize, qubit_b: usize) {
    assert!(qubit_a < state.num_qubits, "qubit_a out of range");
    assert!(qubit_b < state.num_qubits, "qubit_b out of range");
    assert_ne!(qubit_a, qubit_b, "SWAP requires two different qubits");
    swap_masked(state, qubit_a, qubit_b, 0);
}

/// Flips `target` when both controls are |1⟩.
pub fn apply_toffoli(state: &mut StateVector, control0: usize, control1: usize, target: usize) {
    assert!(control0 < state.num_qubits);
    assert!(control1 < state.num_qubits);
    assert!(target < state.num_qubits);
    assert!(control0 != control1 && control0 != target && control1 != target);

    let controls = (1 << control0) | (1 << control1);
    let t_mask = 1 << target;

    for i in 0..state.dim() {
        if (i & controls == controls) && (i & t_mask == 0) {
            state.amplitudes.swap(i, i | t_mask);
        }
    }
}

/// Fredkin gate (CSWAP): exchanges `qubit_a` and `qubit_b` when `control` is |1⟩.
pub fn apply_fredkin(state: &mut StateVector, control: usize, qubit_a: usize, qubit_b: usize) {
    assert!(control < state.num_qubits, "control qubit out of range");
    assert!(qubit_a < state.num_qubits, "qubit_a out of range");
    assert!(qubit_b < state.num_qubits, "qubit_b out of range");
    assert!(
        control != qubit_a && control != qubit_b && qubit_a != qubit_b,
        "CSWAP requires three different qubits"
    );
    swap_masked(state, qubit_a, qubit_b, 1 << control);
}

/// Pairwise 2×2 update on `target`, restricted to indices with all `control_mask` bits set.
fn apply_masked(state: &mut StateVector, gate: &Matrix2x2, target: usize, control_mask: usize) {
    let target_mask = 1 << target;
    for i0 in 0..state.dim() {
        if i0 & target_mask != 0 || i0 & control_mask != control_mask {
            continue;
        }
        let i1 = i0 | target_mask;
        let a0 = state.amplitudes[i0];
        let a1 = state.amplitudes[i1];
        state.amplitudes[i0] = gate[0][0] * a0 + gate[0][1] * a1;
        state.amplitudes[i1] = gate[1][0] * a0 + gate[1][1] * a1;
    }
}

fn swap_masked(state: &mut StateVector, qubit_a: usize, qubit_b: usize, control_mask: usize) {
    let mask_a = 1 << qubit_a;
    let mask_b = 1 << qubit_b;
    for i in 0..state.dim() {
        // Visit each |..1..0..⟩ / |..0..1..⟩ pair once, from the a=1, b=0 side.
        if i & control_mask == control_mask && i & mask_a != 0 && i & mask_b == 0 {
            let j = (i & !mask_a) | mask_b;
            state.amplitudes.swap(i, j);
        }
    }
}
