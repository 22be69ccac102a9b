// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Command-Line Arguments
// ─────────────────────────────────────────────────────────────────────
//! Command-line arguments and their merge onto a configuration file.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use evidence_types::{AccumulationConfig, ScorerKind};

/// Accumulate streamed class probabilities into decisions.
///
/// Reads newline-delimited JSON events (`{"timestamp", "label", "data"}`)
/// and writes the resulting `ready` / `feedback` / `predict` /
/// `accumulation` events to stdout, one JSON object per line.
#[derive(Parser, Debug)]
#[command(name = "accumulate", version, long_about = None)]
pub struct Args {
    /// JSON configuration file. Flags below override its values.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Ratio the best score must exceed the second-best by (> 1).
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Evidence vectors kept by the sum/product scorers.
    #[arg(long)]
    pub buffer_size: Option<usize>,

    /// Evidence updates ignored after a decision.
    #[arg(long)]
    pub recovery: Option<usize>,

    /// sum, product (prod) or bayesian.
    #[arg(long)]
    pub scorer: Option<ScorerKind>,

    /// Emit a feedback event on every accepted update.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub feedback: Option<bool>,

    /// Restrict recovery to these class ids (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub classes: Option<Vec<usize>>,

    /// Source tag addressed by control events and stamped on output.
    #[arg(long)]
    pub source: Option<String>,

    /// Class count. Inferred from the first evidence vector when absent.
    #[arg(long)]
    pub n_classes: Option<usize>,

    /// Bayesian prior (comma separated, normalized on use).
    #[arg(long, value_delimiter = ',')]
    pub prior: Option<Vec<f64>>,

    /// NDJSON input file; stdin when absent or `-`.
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Log level when RUST_LOG is unset: trace, debug, info, warn, error.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Base configuration (file or defaults) with flag overrides applied.
    pub fn to_config(&self) -> anyhow::Result<AccumulationConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                AccumulationConfig::from_json(&raw)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => AccumulationConfig::default(),
        };

        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(buffer_size) = self.buffer_size {
            config.buffer_size = buffer_size;
        }
        if let Some(recovery) = self.recovery {
            config.recovery = recovery;
        }
        if let Some(scorer) = self.scorer {
            config.scorer = scorer;
        }
        if let Some(feedback) = self.feedback {
            config.feedback = feedback;
        }
        if let Some(classes) = &self.classes {
            config.classes = Some(classes.clone());
        }
        if let Some(source) = &self.source {
            config.source = source.clone();
        }
        if let Some(n_classes) = self.n_classes {
            config.n_classes = Some(n_classes);
        }
        if let Some(prior) = &self.prior {
            config.prior = Some(prior.clone());
        }

        config.validate()?;
        Ok(config)
    }

    /// Input path, `None` meaning stdin.
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|p| p.as_os_str() != "-")
    }
}
