//! Circuit description: an instruction IR with a chained builder, plus static
//! profiling.
pub mod analysis;
pub mod ir;

pub use analysis::{analyze, CircuitAnalysis};
pub use ir::{Circuit, Instruction};
