// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Evidence Scorers (Windowed + Bayesian)
// ─────────────────────────────────────────────────────────────────────
//! Turns accumulated evidence into one normalized score per class.
//!
//! Two strategies share the [`Scorer`] interface:
//! - [`WindowedScorer`] keeps the last `buffer_size` vectors and reduces
//!   them (sum or product) on every call. Old evidence ages out on its own.
//! - [`BayesianScorer`] keeps a single running posterior updated by
//!   elementwise multiplication. It only forgets on `reset()`, so the
//!   router resets it at every trial boundary.
//!
//! Every score vector returned is finite, non-negative and sums to one;
//! degenerate states fall back to the uniform distribution.

use std::collections::VecDeque;

use evidence_types::score::{normalize_in_place, normalized_or_uniform, uniform};
use evidence_types::{AccumulationConfig, AccumulationError, AccumulationResult, ScorerKind};

/// Shared capability of every accumulation strategy.
pub trait Scorer {
    /// Fold one evidence vector into the accumulator.
    ///
    /// The caller has already checked the vector length.
    fn ingest(&mut self, proba: &[f64]);

    /// Current normalized scores.
    fn score(&mut self) -> Vec<f64>;

    /// Return to the initial state.
    fn reset(&mut self);

    /// Evidence vectors currently folded in.
    fn depth(&self) -> usize;

    fn n_classes(&self) -> usize;
}

/// Elementwise reduction applied over the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Sum,
    Product,
}

/// Sliding-window scorer over the last `capacity` evidence vectors.
#[derive(Debug, Clone)]
pub struct WindowedScorer {
    reduction: Reduction,
    capacity: usize,
    n_classes: usize,
    history: VecDeque<Vec<f64>>,
}

impl WindowedScorer {
    pub fn new(reduction: Reduction, capacity: usize, n_classes: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            reduction,
            capacity,
            n_classes,
            history: VecDeque::with_capacity(capacity + 1),
        }
    }

    pub fn reduction(&self) -> Reduction {
        self.reduction
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Elementwise reduction of the window, before normalization.
    ///
    /// Recomputed in full on every call.
    pub fn reduce(&self) -> Vec<f64> {
        let mut rows = self.history.iter();
        let Some(first) = rows.next() else {
            return vec![0.0; self.n_classes];
        };
        let mut acc = first.clone();
        for row in rows {
            for (a, &v) in acc.iter_mut().zip(row.iter()) {
                match self.reduction {
                    Reduction::Sum => *a += v,
                    Reduction::Product => *a *= v,
                }
            }
        }
        acc
    }
}

impl Scorer for WindowedScorer {
    fn ingest(&mut self, proba: &[f64]) {
        self.history.push_back(proba.to_vec());
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
    }

    fn score(&mut self) -> Vec<f64> {
        if self.history.is_empty() {
            return uniform(self.n_classes);
        }
        normalized_or_uniform(&self.reduce())
    }

    fn reset(&mut self) {
        self.history.clear();
    }

    fn depth(&self) -> usize {
        self.history.len()
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }
}

/// Running-posterior scorer under a naive-Bayes independence assumption.
#[derive(Debug, Clone)]
pub struct BayesianScorer {
    n_classes: usize,
    prior: Vec<f64>,
    running: Vec<f64>,
    depth: usize,
}

impl BayesianScorer {
    /// Start from `prior` (normalized) or the uniform distribution.
    pub fn new(n_classes: usize, prior: Option<&[f64]>) -> AccumulationResult<Self> {
        let prior = normalized_prior(n_classes, prior)?;
        Ok(Self {
            n_classes,
            running: prior.clone(),
            prior,
            depth: 0,
        })
    }

    /// Replace the running vector with `prior`, or uniform when `None`.
    ///
    /// The prior used by `reset()` is not changed. An unusable prior leaves
    /// the state untouched.
    pub fn reset_with(&mut self, prior: Option<&[f64]>) -> AccumulationResult<()> {
        self.running = normalized_prior(self.n_classes, prior)?;
        self.depth = 0;
        Ok(())
    }

    /// Prior restored by `reset()`.
    pub fn prior(&self) -> &[f64] {
        &self.prior
    }
}

fn normalized_prior(n_classes: usize, prior: Option<&[f64]>) -> AccumulationResult<Vec<f64>> {
    let Some(prior) = prior else {
        return Ok(uniform(n_classes));
    };
    if prior.len() != n_classes {
        return Err(AccumulationError::Dimension {
            expected: n_classes,
            got: prior.len(),
        });
    }
    let mut out = prior.to_vec();
    if out.iter().any(|p| *p < 0.0) || !normalize_in_place(&mut out) {
        return Err(AccumulationError::Config(format!(
            "prior cannot be normalized: {prior:?}"
        )));
    }
    Ok(out)
}

impl Scorer for BayesianScorer {
    fn ingest(&mut self, proba: &[f64]) {
        for (r, &p) in self.running.iter_mut().zip(proba.iter()) {
            *r *= p;
        }
        self.depth += 1;
        // Keep the running vector normalized so long trials do not underflow.
        // A zero sum is left in place for `score()` to recover from.
        normalize_in_place(&mut self.running);
    }

    fn score(&mut self) -> Vec<f64> {
        let mut scores = self.running.clone();
        if !normalize_in_place(&mut scores) {
            log::warn!(
                "bayesian accumulator collapsed after {} updates, resetting to uniform",
                self.depth
            );
            self.running = uniform(self.n_classes);
            self.depth = 0;
            return self.running.clone();
        }
        scores
    }

    fn reset(&mut self) {
        self.running.clone_from(&self.prior);
        self.depth = 0;
    }

    fn depth(&self) -> usize {
        self.depth
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }
}

/// Scorer selected once from `AccumulationConfig::scorer`.
#[derive(Debug, Clone)]
pub enum AnyScorer {
    Windowed(WindowedScorer),
    Bayesian(BayesianScorer),
}

impl AnyScorer {
    pub fn from_config(config: &AccumulationConfig, n_classes: usize) -> AccumulationResult<Self> {
        Ok(match config.scorer {
            ScorerKind::Sum => AnyScorer::Windowed(WindowedScorer::new(
                Reduction::Sum,
                config.buffer_size,
                n_classes,
            )),
            ScorerKind::Product => AnyScorer::Windowed(WindowedScorer::new(
                Reduction::Product,
                config.buffer_size,
                n_classes,
            )),
            ScorerKind::Bayesian => AnyScorer::Bayesian(BayesianScorer::new(
                n_classes,
                config.prior.as_deref(),
            )?),
        })
    }

    fn inner(&self) -> &dyn Scorer {
        match self {
            AnyScorer::Windowed(s) => s,
            AnyScorer::Bayesian(s) => s,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Scorer {
        match self {
            AnyScorer::Windowed(s) => s,
            AnyScorer::Bayesian(s) => s,
        }
    }
}

impl Scorer for AnyScorer {
    fn ingest(&mut self, proba: &[f64]) {
        self.inner_mut().ingest(proba)
    }

    fn score(&mut self) -> Vec<f64> {
        self.inner_mut().score()
    }

    fn reset(&mut self) {
        self.inner_mut().reset()
    }

    fn depth(&self) -> usize {
        self.inner().depth()
    }

    fn n_classes(&self) -> usize {
        self.inner().n_classes()
    }
}
