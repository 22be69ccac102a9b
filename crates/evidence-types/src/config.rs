// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Evidence Kernel Configuration
// ─────────────────────────────────────────────────────────────────────

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{AccumulationError, AccumulationResult};

/// Accumulation strategy used to turn evidence into scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerKind {
    /// Sliding window, elementwise sum.
    #[default]
    Sum,
    /// Sliding window, elementwise product.
    #[serde(alias = "prod")]
    Product,
    /// Running posterior, reset at trial boundaries.
    Bayesian,
}

impl ScorerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScorerKind::Sum => "sum",
            ScorerKind::Product => "product",
            ScorerKind::Bayesian => "bayesian",
        }
    }
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScorerKind {
    type Err = AccumulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(ScorerKind::Sum),
            "product" | "prod" => Ok(ScorerKind::Product),
            "bayesian" | "bayes" => Ok(ScorerKind::Bayesian),
            other => Err(AccumulationError::Config(format!(
                "unknown scorer '{other}' (expected sum, product or bayesian)"
            ))),
        }
    }
}

/// Runtime configuration for one accumulation kernel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccumulationConfig {
    /// Ratio the best score must exceed the second-best by.
    /// Default: 2.0.
    pub threshold: f64,

    /// Number of evidence vectors kept by the windowed scorers.
    /// Default: 10.
    pub buffer_size: usize,

    /// Evidence updates ignored after a decision.
    /// Default: 5.
    pub recovery: usize,

    /// Accumulation strategy. Default: sum.
    pub scorer: ScorerKind,

    /// Emit a `feedback` event on every accepted update.
    pub feedback: bool,

    /// When set, recovery applies only to decisions for these classes.
    pub classes: Option<Vec<usize>>,

    /// Identifier used to address this kernel and tag its output.
    pub source: String,

    /// Class count. Inferred from the first evidence vector when absent.
    pub n_classes: Option<usize>,

    /// Bayesian prior (normalized on use). Uniform when absent.
    pub prior: Option<Vec<f64>>,
}

impl Default for AccumulationConfig {
    fn default() -> Self {
        Self {
            threshold: 2.0,
            buffer_size: 10,
            recovery: 5,
            scorer: ScorerKind::Sum,
            feedback: false,
            classes: None,
            source: String::new(),
            n_classes: None,
            prior: None,
        }
    }
}

impl AccumulationConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> AccumulationResult<()> {
        if !self.threshold.is_finite() || self.threshold <= 1.0 {
            return Err(AccumulationError::Config(format!(
                "threshold must be a finite value > 1, got {}",
                self.threshold
            )));
        }
        if self.buffer_size < 1 {
            return Err(AccumulationError::Config(format!(
                "buffer_size must be >= 1, got {}",
                self.buffer_size
            )));
        }
        if self.n_classes == Some(0) {
            return Err(AccumulationError::Config(
                "n_classes must be >= 1".to_string(),
            ));
        }
        if let Some(prior) = &self.prior {
            if prior.iter().any(|p| !p.is_finite() || *p < 0.0) {
                return Err(AccumulationError::Config(format!(
                    "prior must be finite and non-negative, got {prior:?}"
                )));
            }
            if prior.iter().sum::<f64>() <= 0.0 {
                return Err(AccumulationError::Config(
                    "prior must not sum to zero".to_string(),
                ));
            }
            if let Some(n) = self.n_classes {
                if prior.len() != n {
                    return Err(AccumulationError::Config(format!(
                        "prior has {} entries but n_classes is {n}",
                        prior.len()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Load from JSON string. Missing keys take their defaults.
    pub fn from_json(json: &str) -> AccumulationResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| AccumulationError::Config(format!("JSON parse error: {e}")))
    }

    /// Recovery length to arm after a decision for `target`.
    pub fn recovery_for(&self, target: usize) -> usize {
        match &self.classes {
            Some(classes) if !classes.contains(&target) => 0,
            _ => self.recovery,
        }
    }

    /// Snapshot returned to `get_<source>_accumulation` queries.
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            threshold: self.threshold,
            buffer_size: self.buffer_size,
            recovery: self.recovery,
            scorer: self.scorer,
            source: self.source.clone(),
        }
    }
}

/// Query response payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub threshold: f64,
    pub buffer_size: usize,
    pub recovery: usize,
    pub scorer: ScorerKind,
    pub source: String,
}

/// Partial configuration update carried by reset events.
///
/// Only keys present in the payload overwrite the running configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ConfigPatch {
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub buffer_size: Option<usize>,
    #[serde(default)]
    pub recovery: Option<usize>,
    /// Kept as text so an unknown identifier drops only this key.
    #[serde(default)]
    pub scorer: Option<String>,
    #[serde(default)]
    pub feedback: Option<bool>,
    /// `Some(None)` is an explicit `null`: clear the class restriction.
    #[serde(default, deserialize_with = "present")]
    pub classes: Option<Option<Vec<usize>>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl ConfigPatch {
    /// Decode a patch from an event payload. `null` decodes to an empty patch.
    pub fn from_value(value: &serde_json::Value) -> AccumulationResult<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value.clone())
            .map_err(|e| AccumulationError::Decode(format!("reset payload: {e}")))
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge into a copy of `base` and validate the result.
    ///
    /// An unknown scorer identifier is dropped with a warning; every other
    /// invalid value rejects the whole patch.
    pub fn apply(&self, base: &AccumulationConfig) -> AccumulationResult<AccumulationConfig> {
        let mut next = base.clone();
        if let Some(threshold) = self.threshold {
            next.threshold = threshold;
        }
        if let Some(buffer_size) = self.buffer_size {
            next.buffer_size = buffer_size;
        }
        if let Some(recovery) = self.recovery {
            next.recovery = recovery;
        }
        if let Some(scorer) = &self.scorer {
            match scorer.parse::<ScorerKind>() {
                Ok(kind) => next.scorer = kind,
                Err(e) => log::warn!("ignoring scorer in reset: {e}"),
            }
        }
        if let Some(feedback) = self.feedback {
            next.feedback = feedback;
        }
        if let Some(classes) = &self.classes {
            next.classes = classes.clone();
        }
        next.validate()?;
        Ok(next)
    }
}
