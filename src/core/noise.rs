/// Quantum noise channels for state-vector simulation.
///
/// Noise is modeled with the quantum-trajectory method: at each noise site a
/// uniform sample selects one Kraus operator, which is applied to the pure
/// state. Pauli channels are unitary; amplitude damping re-normalizes.
///
/// | Channel             | Model                                      |
/// |---------------------|--------------------------------------------|
/// | BitFlip(p)          | X applied with probability p               |
/// | PhaseFlip(p)        | Z applied with probability p               |
/// | Depolarizing(p)     | X, Y, or Z each with probability p/3       |
/// | AmplitudeDamping(γ) | |1⟩→|0⟩ decay with probability γ·P(|1⟩)  |
use super::gates::{apply_single_qubit_gate, pauli_x, pauli_y, pauli_z};
use super::state::StateVector;
use crate::error::{HhlError, Result};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A noise channel applied after each gate on the qubits it touches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoiseChannel {
    BitFlip { prob: f64 },
    PhaseFlip { prob: f64 },
    /// Total error probability is `prob`, split evenly over X, Y and Z.
    Depolarizing { prob: f64 },
    /// `gamma` is the decay probability per gate.
    AmplitudeDamping { gamma: f64 },
}

impl NoiseChannel {
    /// The channel's error probability (`gamma` for amplitude damping).
    pub fn strength(&self) -> f64 {
        match *self {
            Self::BitFlip { prob } | Self::PhaseFlip { prob } | Self::Depolarizing { prob } => prob,
            Self::AmplitudeDamping { gamma } => gamma,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let prob = self.strength();
        if (0.0..=1.0).contains(&prob) {
            Ok(())
        } else {
            Err(HhlError::InvalidNoise { prob })
        }
    }

    /// Apply this channel to `qubit`. `rng` must be uniform in [0, 1).
    pub fn apply(&self, state: &mut StateVector, qubit: usize, rng: f64) {
        match *self {
            Self::BitFlip { prob } => {
                if rng < prob {
                    apply_single_qubit_gate(state, &pauli_x(), qubit);
                }
            }

            Self::PhaseFlip { prob } => {
                if rng < prob {
                    apply_single_qubit_gate(state, &pauli_z(), qubit);
                }
            }

            Self::Depolarizing { prob } => {
                let p3 = prob / 3.0;
                if rng < p3 {
                    apply_single_qubit_gate(state, &pauli_x(), qubit);
                } else if rng < 2.0 * p3 {
                    apply_single_qubit_gate(state, &pauli_y(), qubit);
                } else if rng < prob {
                    apply_single_qubit_gate(state, &pauli_z(), qubit);
                }
            }

            // Kraus operators:
            //   K0 = [[1, 0], [0, √(1−γ)]]   P(K0) = 1 − γ·P(|1⟩)
            //   K1 = [[0, √γ], [0, 0]]         P(K1) = γ·P(|1⟩)
            Self::AmplitudeDamping { gamma } => {
                let zero = Complex64::new(0.0, 0.0);
                let p_decay = gamma * state.marginal_probability_one(qubit);
                let kraus = if rng < p_decay {
                    [[zero, Complex64::new(gamma.sqrt(), 0.0)], [zero, zero]]
                } else {
                    [
                        [Complex64::new(1.0, 0.0), zero],
                        [zero, Complex64::new((1.0 - gamma).sqrt(), 0.0)],
                    ]
                };
                apply_single_qubit_gate(state, &kraus, qubit);
                state.normalize();
            }
        }
    }
}

impl fmt::Display for NoiseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BitFlip { prob } => write!(f, "bit-flip(p={prob})"),
            Self::PhaseFlip { prob } => write!(f, "phase-flip(p={prob})"),
            Self::Depolarizing { prob } => write!(f, "depolarizing(p={prob})"),
            Self::AmplitudeDamping { gamma } => write!(f, "amplitude-damping(γ={gamma})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::gates::hadamard;

    fn excited() -> StateVector {
        let mut state = StateVector::new(1);
        apply_single_qubit_gate(&mut state, &pauli_x(), 0);
        state
    }

    #[test]
    fn test_bitflip_p0_no_error() {
        let mut state = StateVector::new(1);
        NoiseChannel::BitFlip { prob: 0.0 }.apply(&mut state, 0, 0.0);
        assert!(state.marginal_probability_one(0).abs() < 1e-10);
    }

    #[test]
    fn test_bitflip_p1_always_flips() {
        let mut state = StateVector::new(1);
        NoiseChannel::BitFlip { prob: 1.0 }.apply(&mut state, 0, 0.0);
        assert!((state.marginal_probability_one(0) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_phaseflip_keeps_probabilities() {
        let mut state = StateVector::new(1);
        apply_single_qubit_gate(&mut state, &hadamard(), 0);
        NoiseChannel::PhaseFlip { prob: 1.0 }.apply(&mut state, 0, 0.0);
        assert!((state.marginal_probability_one(0) - 0.5).abs() < 1e-10);
        assert!((state.amplitudes[1].re + std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-10);
    }

    #[test]
    fn test_depolarizing_applies_x_in_first_third() {
        let mut state = StateVector::new(1);
        NoiseChannel::Depolarizing { prob: 0.3 }.apply(&mut state, 0, 0.0);
        assert!((state.marginal_probability_one(0) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_depolarizing_no_error_outside_range() {
        let mut state = StateVector::new(1);
        NoiseChannel::Depolarizing { prob: 0.3 }.apply(&mut state, 0, 0.99);
        assert!(state.marginal_probability_one(0).abs() < 1e-10);
    }

    #[test]
    fn test_amplitude_damping_decays_excited_state() {
        let mut state = excited();
        NoiseChannel::AmplitudeDamping { gamma: 1.0 }.apply(&mut state, 0, 0.0);
        assert!(state.marginal_probability_one(0).abs() < 1e-10);
    }

    #[test]
    fn test_amplitude_damping_gamma0_no_change() {
        let mut state = excited();
        NoiseChannel::AmplitudeDamping { gamma: 0.0 }.apply(&mut state, 0, 0.5);
        assert!((state.marginal_probability_one(0) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(NoiseChannel::Depolarizing { prob: 0.1 }.validate().is_ok());
        assert!(matches!(
            NoiseChannel::BitFlip { prob: 1.5 }.validate(),
            Err(HhlError::InvalidNoise { .. })
        ));
        assert!(NoiseChannel::AmplitudeDamping { gamma: -0.1 }.validate().is_err());
    }

    #[test]
    fn test_serde_tagged_representation() {
        let json = r#"{"kind":"depolarizing","prob":0.05}"#;
        let channel: NoiseChannel = serde_json::from_str(json).unwrap();
        assert_eq!(channel, NoiseChannel::Depolarizing { prob: 0.05 });
        assert_eq!(serde_json::to_string(&channel).unwrap(), json);
    }
}
