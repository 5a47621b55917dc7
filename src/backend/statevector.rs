/// In-process state-vector backend.
///
/// Each shot runs the circuit on a fresh [`Simulator`]; measurements collapse
/// the state and write the classical register. When the circuit is noiseless
/// and every measurement is terminal, the unitary prefix is evolved once and
/// each shot only replays the measurements on a copy of that state.
///
/// Seeding: a run-level `StdRng` seeded from `seed` hands each shot its own
/// seed, so a seeded run is reproducible end to end.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::{Backend, Counts};
use crate::circuit::{Circuit, Instruction};
use crate::core::{NoiseChannel, Simulator, StateVector};
use crate::error::{HhlError, Result};

#[derive(Debug, Clone, Default)]
pub struct StateVectorBackend {
    seed: Option<u64>,
    noise: Option<NoiseChannel>,
}

impl StateVectorBackend {
    /// Ideal, entropy-seeded backend.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Apply `channel` after every gate.
    pub fn with_noise(mut self, channel: NoiseChannel) -> Self {
        self.noise = Some(channel);
        self
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn noise(&self) -> Option<NoiseChannel> {
        self.noise
    }

    fn shot_simulator(&self, num_qubits: usize, rng: &mut StdRng) -> Simulator {
        let mut sim = Simulator::with_seed(num_qubits, rng.gen());
        if let Some(channel) = self.noise {
            sim.set_noise(channel);
        }
        sim
    }
}

impl Backend for StateVectorBackend {
    fn name(&self) -> &str {
        if self.noise.is_some() { "statevector-noisy" } else { "statevector" }
    }

    fn run(&self, circuit: &Circuit, shots: u64) -> Result<Counts> {
        if shots == 0 {
            return Err(HhlError::InvalidShots);
        }
        circuit.validate()?;
        if let Some(channel) = self.noise {
            channel.validate()?;
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let replay = self.noise.is_none() && circuit.has_terminal_measurements();
        debug!(
            backend = self.name(),
            shots,
            qubits = circuit.num_qubits,
            gates = circuit.gate_count(),
            replay,
            "running circuit"
        );

        let mut counts = Counts::new();
        let mut clbits = vec![false; circuit.num_clbits];

        if replay {
            let prepared = statevector(circuit)?;
            let measurements: Vec<&Instruction> =
                circuit.instructions.iter().filter(|i| i.is_measurement()).collect();
            for _ in 0..shots {
                let mut sim = self.shot_simulator(circuit.num_qubits, &mut rng);
                sim.state = prepared.clone();
                clbits.fill(false);
                for instr in &measurements {
                    execute_instruction(&mut sim, instr, &mut clbits);
                }
                counts.record(bitstring(&clbits));
            }
        } else {
            for _ in 0..shots {
                let mut sim = self.shot_simulator(circuit.num_qubits, &mut rng);
                clbits.fill(false);
                for instr in &circuit.instructions {
                    execute_instruction(&mut sim, instr, &mut clbits);
                }
                counts.record(bitstring(&clbits));
            }
        }

        info!(
            backend = self.name(),
            shots,
            outcomes = counts.len(),
            "run complete"
        );
        Ok(counts)
    }
}

/// Evolve `circuit` from |0…0⟩ ignoring measurements and return the final state.
///
/// Noise is never applied, so this is the ideal pre-measurement state.
pub fn statevector(circuit: &Circuit) -> Result<StateVector> {
    circuit.validate()?;
    let mut sim = Simulator::with_seed(circuit.num_qubits, 0);
    let mut scratch = vec![false; circuit.num_clbits];
    for instr in circuit.instructions.iter().filter(|i| !i.is_measurement()) {
        execute_instruction(&mut sim, instr, &mut scratch);
    }
    Ok(sim.state)
}

/// Classical register as a bitstring, bit 0 rightmost.
fn bitstring(clbits: &[bool]) -> String {
    clbits.iter().rev().map(|&b| if b { '1' } else { '0' }).collect()
}

/// Dispatch one validated instruction onto the simulator.
fn execute_instruction(sim: &mut Simulator, instr: &Instruction, clbits: &mut [bool]) {
    // Discard the `&mut Self` builder return value with `; }` so all arms return `()`.
    match *instr {
        Instruction::H(q)                   => { sim.h(q); }
        Instruction::X(q)                   => { sim.x(q); }
        Instruction::Y(q)                   => { sim.y(q); }
        Instruction::Z(q)                   => { sim.z(q); }
        Instruction::S(q)                   => { sim.s(q); }
        Instruction::T(q)                   => { sim.t(q); }
        Instruction::Rx { qubit, theta }    => { sim.rx(qubit, theta); }
        Instruction::Ry { qubit, theta }    => { sim.ry(qubit, theta); }
        Instruction::Rz { qubit, theta }    => { sim.rz(qubit, theta); }
        Instruction::Phase { qubit, theta } => { sim.phase(qubit, theta); }

        Instruction::Cnot { control, target }       => { sim.cnot(control, target); }
        Instruction::Cz { control, target }         => { sim.cz(control, target); }
        Instruction::Crx { control, target, theta } => { sim.crx(control, target, theta); }
        Instruction::Cry { control, target, theta } => { sim.cry(control, target, theta); }
        Instruction::Cp { control, target, theta }  => { sim.cp(control, target, theta); }
        Instruction::Swap { qubit_a, qubit_b }      => { sim.swap(qubit_a, qubit_b); }
        Instruction::Toffoli { control0, control1, target } => {
            sim.toffoli(control0, control1, target);
        }
        Instruction::Cswap { control, qubit_a, qubit_b } => {
            sim.cswap(control, qubit_a, qubit_b);
        }

        Instruction::Measure { qubit, clbit } => {
            clbits[clbit] = sim.measure(qubit);
        }
        Instruction::Barrier => {}
    }
}
