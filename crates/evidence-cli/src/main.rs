// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Evidence Accumulation CLI
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! `accumulate` — drive one accumulation kernel from an NDJSON stream.
//!
//! ```bash
//! # Bayesian accumulation with continuous feedback
//! accumulate --scorer bayesian --threshold 3 --feedback < events.ndjson
//!
//! # Settings from a file, source tag from the command line
//! accumulate --config motor.json --source motor --input events.ndjson
//! ```
//!
//! Logs go to stderr (`RUST_LOG` or `--log-level`); stdout carries events only.

mod args;
mod stream;

use std::fs::File;
use std::io::{self, BufReader};

use anyhow::Context;
use clap::Parser;

use evidence_core::AccumulationKernel;

use crate::args::Args;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    let config = args.to_config()?;
    let mut kernel = AccumulationKernel::new(config).context("invalid configuration")?;
    let c = kernel.config();
    log::info!(
        "accumulating: scorer={} threshold={} buffer_size={} recovery={} source='{}'",
        c.scorer,
        c.threshold,
        c.buffer_size,
        c.recovery,
        c.source
    );

    let stdout = io::stdout();
    let output = stdout.lock();
    let stats = match args.input_path() {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("opening {}", path.display()))?;
            stream::run(&mut kernel, BufReader::new(file), output)?
        }
        None => stream::run(&mut kernel, io::stdin().lock(), output)?,
    };

    log::info!(
        "done: {} events read, {} skipped, {} emitted, {} decisions",
        stats.lines,
        stats.skipped,
        stats.emitted,
        stats.decisions
    );
    Ok(())
}
