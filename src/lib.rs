//! # hhlsim
//!
//! The HHL algorithm for a 2×2 linear system, checked with a swap test and
//! sampled on an in-process state-vector simulator.
//!
//! ## Quick Start
//!
//! ```rust
//! use hhlsim::backend::StateVectorBackend;
//! use hhlsim::hhl;
//!
//! // Seeded ideal simulator
//! let backend = StateVectorBackend::new().with_seed(42);
//!
//! // Build, sample, and reduce the HHL + swap-test circuit
//! let outcome = hhl::run(&backend, 100)?;
//! println!("counts  = {}", outcome.counts);
//! println!("P(pass) = {:.3}", outcome.success_probability);
//! # Ok::<(), hhlsim::HhlError>(())
//! ```
//!
//! Lower layers are usable on their own: [`core::Simulator`] for direct
//! state-vector work and [`circuit::Circuit`] for building instruction lists.

pub mod backend;
pub mod circuit;
pub mod config;
pub mod core;
pub mod error;
pub mod hhl;
pub mod probability;

pub use backend::{Backend, Counts, StateVectorBackend};
pub use circuit::{Circuit, Instruction};
pub use config::RunConfig;
pub use error::{ConfigError, HhlError, Result};
pub use hhl::HhlOutcome;
