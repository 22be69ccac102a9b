// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Decision Policy (Top-Two Ratio Test)
// ─────────────────────────────────────────────────────────────────────
//! A class wins when its score beats the runner-up by more than
//! `threshold` times: `scores[second] * threshold < scores[best]`.
//! The inequality is strict, so an exact tie on the boundary is not a
//! decision.

use evidence_types::score::top_two;

/// Winning class for `scores`, if the evidence is conclusive.
///
/// Always `None` with fewer than two classes or non-finite scores.
pub fn decide(scores: &[f64], threshold: f64) -> Option<usize> {
    if scores.iter().any(|s| !s.is_finite()) {
        log::warn!("decision skipped: non-finite scores {scores:?}");
        return None;
    }
    let (best, second) = top_two(scores)?;
    (scores[second] * threshold < scores[best]).then_some(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decide_confident() {
        assert_eq!(decide(&[0.85, 0.15], 2.0), Some(0));
        assert_eq!(decide(&[0.1, 0.2, 0.7], 3.0), Some(2));
    }

    #[test]
    fn test_decide_inconclusive() {
        assert_eq!(decide(&[0.55, 0.45], 2.0), None);
    }

    #[test]
    fn test_boundary_is_not_a_decision() {
        // 0.25 * 3 == 0.75 exactly.
        assert_eq!(decide(&[0.75, 0.25], 3.0), None);
    }

    #[test]
    fn test_single_class_inert() {
        assert_eq!(decide(&[1.0], 2.0), None);
        assert_eq!(decide(&[], 2.0), None);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(decide(&[f64::NAN, 0.1], 2.0), None);
        assert_eq!(decide(&[f64::INFINITY, 0.1], 2.0), None);
    }

    #[test]
    fn test_only_top_two_matter() {
        // Third class is irrelevant to the ratio test.
        assert_eq!(decide(&[0.6, 0.25, 0.15], 2.0), Some(0));
        assert_eq!(decide(&[0.5, 0.3, 0.2], 2.0), None);
    }

    #[test]
    fn test_uniform_never_decides() {
        assert_eq!(decide(&[0.25; 4], 1.0001), None);
    }
}
