// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Evidence Accumulation Kernel
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Decision layer of a real-time classification pipeline: accumulates
//! per-window class probabilities until one class clearly dominates,
//! emits a decision, then cools down.
//!
//! # Invariants
//!
//! 1. **Scores are always a distribution**: every score vector handed to
//!    the decision policy is finite, non-negative and sums to one. Zero or
//!    overflowing reductions fall back to the uniform distribution, which
//!    can never clear a threshold > 1.
//!
//! 2. **Bad input never corrupts state**: an evidence vector with the wrong
//!    length or negative/non-finite entries is rejected before it reaches
//!    the recovery gate or the scorer.
//!
//! 3. **Strict ordering**: the kernel is a synchronous transform of an
//!    ordered event stream; one `handle()` call runs to completion before
//!    the next. Multiple kernels (distinct `source`) share no state.
//!
//! 4. **Recovery counts updates, not time**: after a decision arming `N`,
//!    exactly the next `N` valid evidence updates are dropped.

pub mod kernel;
pub mod policy;
pub mod recovery;
pub mod scorer;

pub use kernel::{AccumulationKernel, RouterState};
pub use policy::decide;
pub use recovery::RecoveryGate;
pub use scorer::{AnyScorer, BayesianScorer, Reduction, Scorer, WindowedScorer};
