// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Accumulation Kernel (Event Router + Control)
// ─────────────────────────────────────────────────────────────────────
//! Outward-facing state machine of the evidence accumulator.
//!
//! Each inbound row is classified by label and handled to completion
//! before the next one: validation → recovery gate → scorer → optional
//! feedback → decision policy → (on decision) scorer reset + gate arm.
//! Control rows (`reset_<source>_accumulation`, `get_<source>_accumulation`)
//! are only honoured when `<source>` equals the configured source.

use evidence_types::event::EventKind;
use evidence_types::score::validate_probabilities;
use evidence_types::{
    AccumulationConfig, AccumulationError, AccumulationResult, ConfigPatch, ConfigSnapshot,
    Decision, Feedback, InboundEvent, Outbound, OutboundEvent,
};

use crate::policy::decide;
use crate::recovery::RecoveryGate;
use crate::scorer::{AnyScorer, Scorer};

/// Router state. The kernel never leaves `Active` once there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterState {
    /// No model-ready notice and no evidence seen yet.
    Idle,
    /// Accepting evidence.
    Active,
}

/// One evidence accumulator instance.
///
/// Not internally synchronized: events must be fed in arrival order from
/// a single owner. Independent instances share nothing.
#[derive(Debug, Clone)]
pub struct AccumulationKernel {
    config: AccumulationConfig,
    scorer: Option<AnyScorer>,
    gate: RecoveryGate,
    state: RouterState,
    n_classes: Option<usize>,
}

impl AccumulationKernel {
    /// Build a kernel. The scorer is created now if `n_classes` is
    /// configured, otherwise on the first evidence vector.
    pub fn new(config: AccumulationConfig) -> AccumulationResult<Self> {
        config.validate()?;
        let mut kernel = Self {
            n_classes: None,
            scorer: None,
            gate: RecoveryGate::new(),
            state: RouterState::Idle,
            config,
        };
        if let Some(n) = kernel.config.n_classes {
            kernel.install_scorer(n)?;
        }
        Ok(kernel)
    }

    /// Handle one inbound row and return the events it produced.
    pub fn handle(&mut self, event: &InboundEvent) -> Vec<OutboundEvent> {
        let mut out = Vec::new();
        match event.kind() {
            EventKind::ModelReady => self.on_ready(event, &mut out),
            EventKind::Evidence => {
                if let Err(e) = self.on_evidence(event, &mut out) {
                    log::warn!(
                        "[{}] rejected evidence at t={}: {e}",
                        self.config.source,
                        event.timestamp
                    );
                }
            }
            EventKind::Reset { source } => {
                if self.addresses_me(source, &event.label) {
                    self.on_reset(event);
                }
            }
            EventKind::Query { source } => {
                if self.addresses_me(source, &event.label) {
                    out.push(OutboundEvent::new(
                        event.timestamp,
                        Outbound::Accumulation(self.snapshot()),
                    ));
                }
            }
            EventKind::Unknown => {
                log::debug!("ignoring event with label '{}'", event.label);
            }
        }
        out
    }

    /// Handle rows strictly in order.
    pub fn handle_batch(&mut self, events: &[InboundEvent]) -> Vec<OutboundEvent> {
        events.iter().flat_map(|event| self.handle(event)).collect()
    }

    /// Clear accumulated evidence and the recovery gate.
    pub fn reset(&mut self) {
        if let Some(scorer) = self.scorer.as_mut() {
            scorer.reset();
        }
        self.gate.clear();
    }

    pub fn config(&self) -> &AccumulationConfig {
        &self.config
    }

    pub fn state(&self) -> RouterState {
        self.state
    }

    pub fn n_classes(&self) -> Option<usize> {
        self.n_classes
    }

    pub fn recovery_remaining(&self) -> usize {
        self.gate.remaining()
    }

    /// Evidence vectors folded in since the last reset.
    pub fn accumulation_depth(&self) -> usize {
        self.scorer.as_ref().map_or(0, |s| s.depth())
    }

    pub fn snapshot(&self) -> ConfigSnapshot {
        self.config.snapshot()
    }

    // ── Handlers ──────────────────────────────────────────────────

    fn on_ready(&mut self, event: &InboundEvent, out: &mut Vec<OutboundEvent>) {
        if self.state == RouterState::Idle {
            log::info!("[{}] model ready, accepting evidence", self.config.source);
        }
        self.state = RouterState::Active;
        out.push(OutboundEvent::new(event.timestamp, Outbound::Ready));
    }

    fn on_evidence(
        &mut self,
        event: &InboundEvent,
        out: &mut Vec<OutboundEvent>,
    ) -> AccumulationResult<()> {
        let proba = event.probabilities()?;
        if proba.is_empty() {
            return Err(AccumulationError::Validation(
                "empty evidence vector".to_string(),
            ));
        }
        let n = match self.n_classes {
            Some(n) => n,
            None => {
                // A rejected first row must not fix the class count.
                validate_probabilities(&proba, proba.len())?;
                self.infer_class_count(proba.len())?;
                proba.len()
            }
        };
        validate_probabilities(&proba, n)?;

        if self.state == RouterState::Idle {
            log::debug!(
                "[{}] evidence before model ready, activating",
                self.config.source
            );
            self.state = RouterState::Active;
        }

        if self.gate.should_ignore() {
            log::debug!(
                "[{}] recovery: dropped update at t={} ({} left)",
                self.config.source,
                event.timestamp,
                self.gate.remaining()
            );
            return Ok(());
        }

        let scorer = self
            .scorer
            .as_mut()
            .ok_or_else(|| AccumulationError::Config("scorer not initialised".to_string()))?;
        scorer.ingest(&proba);
        let scores = scorer.score();

        if self.config.feedback {
            out.push(OutboundEvent::new(
                event.timestamp,
                Outbound::Feedback(Feedback {
                    scores: scores.clone(),
                    source: self.config.source.clone(),
                }),
            ));
        }

        let Some(target) = decide(&scores, self.config.threshold) else {
            return Ok(());
        };

        let decision = Decision {
            target,
            scores,
            accumulation_depth: scorer.depth(),
            source: self.config.source.clone(),
        };
        log::debug!("[{}] decision: {decision:?}", self.config.source);
        scorer.reset();
        self.gate.arm(self.config.recovery_for(target));
        out.push(OutboundEvent::new(event.timestamp, Outbound::Predict(decision)));
        Ok(())
    }

    fn on_reset(&mut self, event: &InboundEvent) {
        let patch = event
            .payload()
            .and_then(|value| ConfigPatch::from_value(&value))
            .unwrap_or_else(|e| {
                log::warn!("[{}] {e}; resetting without changes", self.config.source);
                ConfigPatch::default()
            });

        if !patch.is_empty() {
            match self.rebuild(&patch) {
                Ok(()) => {
                    log::info!("[{}] configuration updated: {patch:?}", self.config.source)
                }
                Err(e) => log::warn!("[{}] reset patch rejected: {e}", self.config.source),
            }
        }
        self.reset();
    }

    /// Apply `patch` and rebuild the scorer from it, committing both or
    /// neither, so scorer kind and buffer depth always match the config.
    fn rebuild(&mut self, patch: &ConfigPatch) -> AccumulationResult<()> {
        let next = patch.apply(&self.config)?;
        let scorer = match self.n_classes {
            Some(n) => Some(AnyScorer::from_config(&next, n)?),
            None => None,
        };
        self.config = next;
        if scorer.is_some() {
            self.scorer = scorer;
        }
        Ok(())
    }

    // ── Helpers ───────────────────────────────────────────────────

    fn addresses_me(&self, source: &str, label: &str) -> bool {
        if source == self.config.source {
            true
        } else {
            log::debug!("[{}] ignoring '{label}'", self.config.source);
            false
        }
    }

    /// Fix the class count from the first valid evidence vector.
    ///
    /// A configured prior of another length is dropped once, with an
    /// error, in favour of the uniform prior.
    fn infer_class_count(&mut self, n_classes: usize) -> AccumulationResult<()> {
        if let Some(prior) = &self.config.prior {
            if prior.len() != n_classes {
                log::error!(
                    "[{}] prior has {} entries but evidence has {n_classes} classes: using a uniform prior",
                    self.config.source,
                    prior.len()
                );
                self.config.prior = None;
            }
        }
        self.install_scorer(n_classes)
    }

    fn install_scorer(&mut self, n_classes: usize) -> AccumulationResult<()> {
        let scorer = AnyScorer::from_config(&self.config, n_classes)?;
        if self.n_classes.is_none() && n_classes < 2 {
            log::warn!(
                "[{}] only {n_classes} class configured: no decision will ever be made",
                self.config.source
            );
        }
        self.scorer = Some(scorer);
        self.n_classes = Some(n_classes);
        Ok(())
    }
}
