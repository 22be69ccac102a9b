//! Property tests for the scorers, decision policy and recovery gate.

use evidence_core::{
    decide, AccumulationKernel, BayesianScorer, Reduction, Scorer, WindowedScorer,
};
use evidence_types::{AccumulationConfig, InboundEvent, ScorerKind};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// A non-negative evidence vector of length `n` (zeros included).
fn arb_proba(n: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(prop_oneof![Just(0.0), 0.0f64..1.0, 1e-300f64..1e-200], n)
}

fn arb_stream(n: usize, max_len: usize) -> impl Strategy<Value = Vec<Vec<f64>>> {
    prop::collection::vec(arb_proba(n), 1..max_len)
}

fn assert_distribution(scores: &[f64]) {
    assert!(scores.iter().all(|s| s.is_finite() && *s >= 0.0), "{scores:?}");
    assert!((scores.iter().sum::<f64>() - 1.0).abs() < 1e-9, "{scores:?}");
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn window_scores_are_distributions(
        stream in arb_stream(3, 30),
        capacity in 1usize..12,
        product in any::<bool>(),
    ) {
        let reduction = if product { Reduction::Product } else { Reduction::Sum };
        let mut scorer = WindowedScorer::new(reduction, capacity, 3);
        for proba in &stream {
            scorer.ingest(proba);
            assert_distribution(&scorer.score());
        }
    }

    #[test]
    fn bayesian_scores_are_distributions(stream in arb_stream(4, 60)) {
        let mut scorer = BayesianScorer::new(4, None).unwrap();
        for proba in &stream {
            scorer.ingest(proba);
            assert_distribution(&scorer.score());
        }
    }

    #[test]
    fn window_depends_only_on_last_entries(
        stream in arb_stream(3, 40),
        capacity in 1usize..8,
        product in any::<bool>(),
    ) {
        let reduction = if product { Reduction::Product } else { Reduction::Sum };
        let mut full = WindowedScorer::new(reduction, capacity, 3);
        for proba in &stream {
            full.ingest(proba);
            prop_assert!(full.depth() <= capacity);
        }
        let mut tail = WindowedScorer::new(reduction, capacity, 3);
        let start = stream.len().saturating_sub(capacity);
        for proba in &stream[start..] {
            tail.ingest(proba);
        }
        prop_assert_eq!(full.reduce(), tail.reduce());
    }

    #[test]
    fn reset_is_idempotent(stream in arb_stream(3, 10), w in prop::collection::vec(0.1f64..5.0, 3)) {
        let mut scorer = BayesianScorer::new(3, Some(&w)).unwrap();
        for proba in &stream {
            scorer.ingest(proba);
        }
        scorer.reset();
        let once = scorer.score();
        scorer.reset();
        let twice = scorer.score();
        prop_assert_eq!(&once, &twice);
        let total: f64 = w.iter().sum();
        for (s, p) in once.iter().zip(&w) {
            prop_assert!((s - p / total).abs() < 1e-12);
        }
    }

    #[test]
    fn decision_is_monotone_in_best_score(
        second in 0.01f64..1.0,
        threshold in 1.01f64..10.0,
        steps in prop::collection::vec(0.0f64..0.5, 1..20),
    ) {
        let mut best = second;
        let mut decided = false;
        for step in steps {
            best += step;
            let outcome = decide(&[best, second], threshold);
            if decided {
                prop_assert_eq!(outcome, Some(0));
            }
            if outcome.is_some() {
                prop_assert_eq!(outcome, Some(0));
                decided = true;
            }
        }
    }

    #[test]
    fn recovery_drops_exactly_n_updates(recovery in 0usize..8, filler in arb_stream(2, 12)) {
        let mut kernel = AccumulationKernel::new(AccumulationConfig {
            threshold: 3.0,
            recovery,
            scorer: ScorerKind::Bayesian,
            feedback: true,
            n_classes: Some(2),
            ..Default::default()
        }).unwrap();
        let out = kernel.handle(&InboundEvent::evidence(0.0, &[0.9, 0.1]));
        prop_assert!(out.iter().any(|e| e.decision().is_some()));

        let dropped = recovery.min(filler.len());
        for (i, proba) in filler.iter().take(dropped).enumerate() {
            let out = kernel.handle(&InboundEvent::evidence(1.0 + i as f64, proba));
            prop_assert!(out.is_empty());
            prop_assert_eq!(kernel.accumulation_depth(), 0);
        }
        if filler.len() > recovery {
            let out = kernel.handle(&InboundEvent::evidence(100.0, &filler[recovery]));
            // Feedback is on, so a processed update always emits something.
            prop_assert!(!out.is_empty());
        }
    }
}
