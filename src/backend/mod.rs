//! Execution backends.
//!
//! A [`Backend`] takes a circuit and a shot count and returns the histogram of
//! classical-register bitstrings it observed. The crate ships one
//! implementation, the in-process [`StateVectorBackend`].
pub mod statevector;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::error::Result;

pub use statevector::{statevector, StateVectorBackend};

/// Anything that can sample a circuit.
pub trait Backend {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &str;

    /// Execute `circuit` `shots` times and histogram the classical register.
    fn run(&self, circuit: &Circuit, shots: u64) -> Result<Counts>;
}

/// Measurement histogram keyed by classical-register bitstring.
///
/// Bitstrings put classical bit 0 in the rightmost position, so with two
/// classical bits `"01"` means c1 = 0 and c0 = 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Counts {
    counts: BTreeMap<String, u64>,
}

impl Counts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Occurrences of `bitstring`; an outcome never observed counts as zero.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.counts.get(bitstring).copied().unwrap_or(0)
    }

    /// Add one occurrence of `bitstring`. Saturates at `u64::MAX`.
    pub fn record(&mut self, bitstring: impl Into<String>) {
        let n = self.counts.entry(bitstring.into()).or_insert(0);
        *n = n.saturating_add(1);
    }

    /// Total number of recorded shots, saturating at `u64::MAX`.
    pub fn shots(&self) -> u64 {
        self.counts.values().fold(0u64, |acc, &v| acc.saturating_add(v))
    }

    /// Exact total over all outcomes.
    pub fn total(&self) -> u128 {
        self.counts.values().map(|&v| u128::from(v)).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Number of distinct outcomes observed.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The most frequent outcome, ties broken by the smaller bitstring.
    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.iter().fold(None, |best, (k, v)| match best {
            Some((_, bv)) if bv >= v => best,
            _ => Some((k, v)),
        })
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for Counts {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        let mut counts = BTreeMap::new();
        for (k, v) in iter {
            let n = counts.entry(k.into()).or_insert(0u64);
            *n = n.saturating_add(v);
        }
        Self { counts }
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{k}': {v}")?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_zero() {
        let counts: Counts = [("11", 50)].into_iter().collect();
        assert_eq!(counts.get("11"), 50);
        assert_eq!(counts.get("01"), 0);
    }

    #[test]
    fn test_record_and_shots() {
        let mut counts = Counts::new();
        counts.record("01");
        counts.record("01");
        counts.record("11");
        assert_eq!(counts.shots(), 3);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.most_frequent(), Some(("01", 2)));
    }

    #[test]
    fn test_from_iter_merges_duplicates() {
        let counts: Counts = [("00", 1), ("00", 2)].into_iter().collect();
        assert_eq!(counts.get("00"), 3);
    }

    #[test]
    fn test_display_and_json() {
        let counts: Counts = [("01", 30), ("11", 20)].into_iter().collect();
        assert_eq!(counts.to_string(), "{'01': 30, '11': 20}");
        assert_eq!(serde_json::to_string(&counts).unwrap(), r#"{"01":30,"11":20}"#);
    }

    #[test]
    fn test_large_counts_saturate() {
        let mut counts: Counts = [("01", u64::MAX), ("01", 5), ("11", 1)].into_iter().collect();
        counts.record("01");
        assert_eq!(counts.get("01"), u64::MAX);
        assert_eq!(counts.shots(), u64::MAX);
        assert_eq!(counts.total(), u128::from(u64::MAX) + 1);
    }

    #[test]
    fn test_empty() {
        let counts = Counts::new();
        assert!(counts.is_empty());
        assert_eq!(counts.shots(), 0);
        assert_eq!(counts.most_frequent(), None);
    }
}
