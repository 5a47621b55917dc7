//! Error types shared across the crate.

use std::path::PathBuf;

/// Result alias used by every fallible operation in the crate.
pub type Result<T> = std::result::Result<T, HhlError>;

/// Errors raised while building, validating, or running a circuit.
#[derive(Debug, thiserror::Error)]
pub enum HhlError {
    /// A quantum register the state vector cannot hold.
    #[error("register of {num_qubits} qubits is outside 1..={max}", max = crate::core::state::MAX_QUBITS)]
    InvalidRegister { num_qubits: usize },

    /// An instruction references a qubit outside the register.
    #[error("qubit {qubit} out of range (register has {num_qubits} qubits)")]
    QubitOutOfRange { qubit: usize, num_qubits: usize },

    /// A measurement writes a classical bit outside the classical register.
    #[error("classical bit {clbit} out of range (register has {num_clbits} bits)")]
    ClbitOutOfRange { clbit: usize, num_clbits: usize },

    /// A multi-qubit gate names the same qubit twice.
    #[error("{mnemonic} requires distinct qubit operands")]
    DuplicateQubits { mnemonic: &'static str },

    /// A circuit containing a measurement cannot be inverted.
    #[error("cannot invert non-unitary instruction `{instruction}`")]
    NonInvertible { instruction: String },

    /// A backend was asked for zero samples.
    #[error("shot count must be at least 1")]
    InvalidShots,

    /// A noise channel probability outside [0, 1].
    #[error("noise probability {prob} is outside [0, 1]")]
    InvalidNoise { prob: f64 },

    /// A run outcome could not be encoded as JSON.
    #[error("cannot encode outcome: {0}")]
    Encode(#[from] serde_json::Error),

    /// Run configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors from loading or validating a [`RunConfig`](crate::config::RunConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A field has an invalid value.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue {
        field: &'static str,
        reason: String,
    },

    /// The configuration file could not be read or written.
    #[error("cannot access config file `{path}`: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for a `RunConfig`.
    #[error("malformed config file `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub fn invalid_value(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue { field, reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_out_of_range_message() {
        let e = HhlError::QubitOutOfRange { qubit: 7, num_qubits: 6 };
        assert_eq!(e.to_string(), "qubit 7 out of range (register has 6 qubits)");
    }

    #[test]
    fn test_invalid_register_message() {
        let e = HhlError::InvalidRegister { num_qubits: 40 };
        assert_eq!(e.to_string(), "register of 40 qubits is outside 1..=30");
    }

    #[test]
    fn test_encode_error_from_serde_json() {
        let source = serde_json::from_str::<u64>("not json").unwrap_err();
        let e: HhlError = source.into();
        assert!(matches!(e, HhlError::Encode(_)));
        assert!(e.to_string().starts_with("cannot encode outcome: "));
    }

    #[test]
    fn test_config_error_is_transparent() {
        let e: HhlError = ConfigError::invalid_value("shots", "must be > 0").into();
        assert_eq!(e.to_string(), "invalid value for `shots`: must be > 0");
    }
}
