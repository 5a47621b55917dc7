//! The fixed 2×2 HHL instance and its circuit.
//!
//! ```text
//! A = 1/2 · [[ 3, -1],      b = |0⟩      x = A⁻¹b ∝ (3, 1)
//!            [-1,  3]]
//! ```
//!
//! A has eigenvalues 1 and 2, eigenvectors (1, 1)/√2 and (1, −1)/√2. With
//! evolution time t₀ = π/2 and a two-qubit clock, phase estimation writes
//! each eigenvalue into the clock as its own integer value, so every
//! eigenvalue is a single set clock bit and one controlled rotation per clock
//! qubit inverts it.
//!
//! Register layout:
//!
//! | qubit | role                         | classical bit |
//! |-------|------------------------------|---------------|
//! | 0     | inversion ancilla            | c0            |
//! | 1, 2  | clock (LSB, MSB)             |               |
//! | 3     | solution register, holds b/x |               |
//! | 4     | reference state x_ref        |               |
//! | 5     | swap-test ancilla            | c1            |
//!
//! The outcome the swap test is post-selected on is `"01"`: ancilla 1 and
//! swap test passed. See [`crate::probability`].
use std::f64::consts::FRAC_PI_2;

use num_complex::Complex64;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::backend::{statevector, Backend, Counts};
use crate::circuit::Circuit;
use crate::error::Result;
use crate::probability::{fidelity_estimate, postselection_rate, success_probability};

/// The system matrix A.
pub const MATRIX: [[f64; 2]; 2] = [[1.5, -0.5], [-0.5, 1.5]];
/// The right-hand side b.
pub const RHS: [f64; 2] = [1.0, 0.0];
/// Eigenvalues of [`MATRIX`], ascending.
pub const EIGENVALUES: [f64; 2] = [1.0, 2.0];
/// t₀ in U = e^{iAt₀}.
pub const EVOLUTION_TIME: f64 = FRAC_PI_2;
/// C in the inversion rotation sin(θ/2) = C/λ; must not exceed the smallest eigenvalue.
pub const ROTATION_CONSTANT: f64 = 1.0;

pub const NUM_QUBITS: usize = 6;
pub const NUM_CLBITS: usize = 2;

pub const ANCILLA: usize = 0;
pub const CLOCK: [usize; 2] = [1, 2];
pub const SOLUTION: usize = 3;
pub const REFERENCE: usize = 4;
pub const SWAP_ANCILLA: usize = 5;

pub const ANCILLA_CLBIT: usize = 0;
pub const SWAP_CLBIT: usize = 1;

/// A = αI + βX for a symmetric matrix with equal diagonal.
fn pauli_coefficients() -> (f64, f64) {
    ((MATRIX[0][0] + MATRIX[1][1]) / 2.0, MATRIX[0][1])
}

/// Solve A·x = b directly and normalise.
pub fn classical_solution() -> [f64; 2] {
    let [[a, b], [c, d]] = MATRIX;
    let det = a * d - b * c;
    let x0 = (d * RHS[0] - b * RHS[1]) / det;
    let x1 = (a * RHS[1] - c * RHS[0]) / det;
    let norm = x0.hypot(x1);
    [x0 / norm, x1 / norm]
}

/// θ such that Ry(θ)|0⟩ equals [`classical_solution`].
pub fn reference_angle() -> f64 {
    let [x0, x1] = classical_solution();
    2.0 * x1.atan2(x0)
}

/// Ry angles θⱼ = 2·asin(C/λⱼ) that load 1/λⱼ into the ancilla amplitude.
pub fn inversion_angles() -> [f64; 2] {
    EIGENVALUES.map(|lambda| 2.0 * (ROTATION_CONSTANT / lambda).asin())
}

/// Clock qubit whose |1⟩ state encodes `lambda`.
fn clock_qubit(lambda: f64) -> usize {
    CLOCK[(lambda as usize).trailing_zeros() as usize]
}

fn register() -> Circuit {
    Circuit::new(NUM_QUBITS, NUM_CLBITS)
}

/// Phase estimation of U = e^{iAt₀} onto the clock, ending in the inverse QFT.
///
/// With A = αI + βX, U^(2^k) = e^{iατ}·Rx(−2βτ) for τ = 2^k·t₀, so each
/// controlled power is a phase on its clock qubit plus a controlled Rx.
pub fn phase_estimation() -> Circuit {
    let (alpha, beta) = pauli_coefficients();
    let mut c = register();
    for &clock in &CLOCK {
        c.h(clock);
    }
    for (k, &clock) in CLOCK.iter().enumerate() {
        let tau = EVOLUTION_TIME * (1 << k) as f64;
        c.p(alpha * tau, clock).crx(-2.0 * beta * tau, clock, SOLUTION);
    }

    // Inverse QFT, CLOCK[1] most significant.
    c.swap(CLOCK[0], CLOCK[1])
        .h(CLOCK[0])
        .cp(-FRAC_PI_2, CLOCK[0], CLOCK[1])
        .h(CLOCK[1]);
    c
}

/// Controlled Ry from each eigenvalue's clock qubit onto the ancilla.
pub fn eigenvalue_inversion() -> Circuit {
    let mut c = register();
    for (&lambda, theta) in EIGENVALUES.iter().zip(inversion_angles()) {
        c.cry(theta, clock_qubit(lambda), ANCILLA);
    }
    c
}

/// Undo phase estimation, returning the clock to |00⟩.
pub fn uncompute() -> Result<Circuit> {
    phase_estimation().inverse()
}

/// HHL proper: after this block the solution qubit holds |x⟩ on the ancilla = 1 branch.
pub fn solver() -> Result<Circuit> {
    let mut c = register();
    c.append(&phase_estimation())
        .barrier()
        .append(&eigenvalue_inversion())
        .barrier()
        .append(&uncompute()?);
    Ok(c)
}

pub fn reference_preparation() -> Circuit {
    let mut c = register();
    c.ry(reference_angle(), REFERENCE);
    c
}

/// Compare the solution and reference qubits.
pub fn swap_test() -> Circuit {
    let mut c = register();
    c.h(SWAP_ANCILLA)
        .cswap(SWAP_ANCILLA, SOLUTION, REFERENCE)
        .h(SWAP_ANCILLA);
    c
}

pub fn measurement() -> Circuit {
    let mut c = register();
    c.measure(ANCILLA, ANCILLA_CLBIT).measure(SWAP_ANCILLA, SWAP_CLBIT);
    c
}

/// The full demonstration circuit.
pub fn build_circuit() -> Result<Circuit> {
    let blocks = [
        ("phase_estimation", phase_estimation()),
        ("eigenvalue_inversion", eigenvalue_inversion()),
        ("uncompute", uncompute()?),
        ("reference_preparation", reference_preparation()),
        ("swap_test", swap_test()),
        ("measurement", measurement()),
    ];

    let mut c = register();
    for (i, (name, block)) in blocks.iter().enumerate() {
        debug!(block = *name, gates = block.gate_count(), "appending block");
        if i > 0 {
            c.barrier();
        }
        c.append(block);
    }
    debug!(
        gates = c.gate_count(),
        reference_angle = reference_angle(),
        "built HHL circuit"
    );
    Ok(c)
}

/// Ideal post-selected solution state, as real amplitudes with the global phase removed.
///
/// Reads the solution qubit from the noiseless [`solver`] state with the
/// ancilla pinned to 1 and the clock to |00⟩.
pub fn solution_amplitudes() -> Result<[f64; 2]> {
    let mut state = statevector(&solver()?)?;
    if state.project(ANCILLA, true) < 1e-12 {
        return Ok([0.0, 0.0]);
    }
    let fixed = [(ANCILLA, true), (CLOCK[0], false), (CLOCK[1], false)];
    let amps = state.reduced_amplitudes(&[SOLUTION], &fixed);

    let norm = amps.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt();
    if norm < 1e-12 {
        return Ok([0.0, 0.0]);
    }
    let phase = if amps[0].norm() > 1e-12 {
        amps[0].conj() / amps[0].norm()
    } else {
        Complex64::new(1.0, 0.0)
    };
    Ok([(amps[0] * phase).re / norm, (amps[1] * phase).re / norm])
}

/// Probability that the ideal solver leaves the ancilla in |1⟩.
pub fn ideal_postselection_rate() -> Result<f64> {
    let mut state = statevector(&solver()?)?;
    Ok(state.project(ANCILLA, true))
}

/// Result of sampling the HHL circuit on a backend.
#[derive(Debug, Clone, Serialize)]
pub struct HhlOutcome {
    pub backend: String,
    pub shots: u64,
    pub counts: Counts,
    pub success_probability: f64,
    pub postselection_rate: f64,
    pub fidelity_estimate: f64,
}

/// Build the circuit, sample it `shots` times on `backend`, and reduce the counts.
pub fn run(backend: &dyn Backend, shots: u64) -> Result<HhlOutcome> {
    let circuit = build_circuit()?;
    let counts = backend.run(&circuit, shots)?;

    let success = success_probability(&counts);
    let postselection = postselection_rate(&counts);
    if postselection == 0.0 {
        warn!(shots, "no shots survived post-selection; success probability reported as 0");
    }
    info!(
        backend = backend.name(),
        success_probability = success,
        postselection_rate = postselection,
        "HHL run finished"
    );

    Ok(HhlOutcome {
        backend: backend.name().to_string(),
        shots,
        counts,
        success_probability: success,
        postselection_rate: postselection,
        fidelity_estimate: fidelity_estimate(success),
    })
}
