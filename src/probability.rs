//! Reduction of HHL swap-test counts to scalar figures of merit.
//!
//! Outcome keys are two-bit strings `"<swap><ancilla>"`: the right bit is the
//! HHL ancilla (post-selected on 1) and the left bit is the swap-test ancilla
//! (0 means the test passed).
use crate::backend::Counts;

/// Ancilla = 1, swap test passed.
pub const SUCCESS_OUTCOME: &str = "01";
/// Ancilla = 1, swap test failed.
pub const FAILURE_OUTCOME: &str = "11";

/// `counts["01"] / (counts["01"] + counts["11"])`.
///
/// Missing keys count as zero and an empty post-selected set gives 0.
/// Sums are taken in `u128` so any `u64` counts are accepted.
pub fn success_probability(counts: &Counts) -> f64 {
    let success = u128::from(counts.get(SUCCESS_OUTCOME));
    let postselected = success + u128::from(counts.get(FAILURE_OUTCOME));
    if postselected == 0 {
        return 0.0;
    }
    success as f64 / postselected as f64
}

/// Fraction of all shots in which the HHL ancilla measured 1.
pub fn postselection_rate(counts: &Counts) -> f64 {
    let shots = counts.total();
    if shots == 0 {
        return 0.0;
    }
    let postselected =
        u128::from(counts.get(SUCCESS_OUTCOME)) + u128::from(counts.get(FAILURE_OUTCOME));
    postselected as f64 / shots as f64
}

/// Swap-test overlap estimate |⟨x|x_ref⟩|² = 2·P(pass) − 1, clamped to [0, 1].
pub fn fidelity_estimate(success_probability: f64) -> f64 {
    (2.0 * success_probability - 1.0).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u64)]) -> Counts {
        pairs.iter().map(|&(k, v)| (k, v)).collect()
    }

    #[test]
    fn test_only_failures_is_zero() {
        assert_eq!(success_probability(&counts(&[("11", 50)])), 0.0);
    }

    #[test]
    fn test_mixed_outcomes() {
        let p = success_probability(&counts(&[("01", 30), ("11", 20)]));
        assert!((p - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_empty_counts_is_zero() {
        assert_eq!(success_probability(&Counts::new()), 0.0);
        assert_eq!(postselection_rate(&Counts::new()), 0.0);
    }

    #[test]
    fn test_unselected_outcomes_ignored() {
        let c = counts(&[("00", 40), ("10", 10), ("01", 50)]);
        assert_eq!(success_probability(&c), 1.0);
        assert!((postselection_rate(&c) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_counts_near_u64_max() {
        let c = counts(&[("01", u64::MAX), ("11", 1)]);
        let p = success_probability(&c);
        assert!((0.0..=1.0).contains(&p));
        assert!((p - 1.0).abs() < 1e-12);

        let c = counts(&[("01", u64::MAX), ("11", u64::MAX), ("00", u64::MAX)]);
        assert!((success_probability(&c) - 0.5).abs() < 1e-12);
        assert!((postselection_rate(&c) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_fidelity_estimate() {
        assert_eq!(fidelity_estimate(1.0), 1.0);
        assert!((fidelity_estimate(0.75) - 0.5).abs() < 1e-12);
        // Statistical noise can push P(pass) below ½; the overlap never goes negative.
        assert_eq!(fidelity_estimate(0.3), 0.0);
    }
}
