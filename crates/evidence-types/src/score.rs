// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Evidence Kernel Score Types
// ─────────────────────────────────────────────────────────────────────
//! Probability-vector validation and the normalization helpers shared by
//! every scorer.

use crate::error::{AccumulationError, AccumulationResult};

/// Uniform distribution over `n_classes` classes.
///
/// Returns an empty vector for `n_classes == 0`.
pub fn uniform(n_classes: usize) -> Vec<f64> {
    if n_classes == 0 {
        return Vec::new();
    }
    vec![1.0 / n_classes as f64; n_classes]
}

/// Normalize `values` in place so that they sum to one.
///
/// Returns `false` and leaves `values` untouched when the sum is zero or
/// not finite; callers decide what the degenerate fallback is.
pub fn normalize_in_place(values: &mut [f64]) -> bool {
    let total: f64 = values.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        return false;
    }
    for v in values.iter_mut() {
        *v /= total;
    }
    true
}

/// Normalize into a fresh vector, falling back to the uniform distribution
/// when the input cannot be normalized.
pub fn normalized_or_uniform(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    if !normalize_in_place(&mut out) {
        log::warn!(
            "degenerate score vector (sum={}), falling back to uniform",
            values.iter().sum::<f64>()
        );
        return uniform(values.len());
    }
    out
}

/// Check that `proba` is a usable evidence vector.
///
/// Requires exactly `expected` entries, each finite and non-negative.
/// The vector is not required to sum to one.
pub fn validate_probabilities(proba: &[f64], expected: usize) -> AccumulationResult<()> {
    if proba.len() != expected {
        return Err(AccumulationError::Dimension {
            expected,
            got: proba.len(),
        });
    }
    if let Some((idx, v)) = proba
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite() || **v < 0.0)
    {
        return Err(AccumulationError::Validation(format!(
            "class {idx} has invalid probability {v}"
        )));
    }
    Ok(())
}

/// Index pair `(best, second)` of the two largest entries.
///
/// Ties keep the lower class index first. `None` with fewer than two
/// entries.
pub fn top_two(scores: &[f64]) -> Option<(usize, usize)> {
    if scores.len() < 2 {
        return None;
    }
    let mut order: Vec<usize> = (0..scores.len()).collect();
    // Stable sort: equal scores stay in class-index order.
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Some((order[0], order[1]))
}
