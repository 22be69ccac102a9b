// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — NDJSON Event Stream
// ─────────────────────────────────────────────────────────────────────
//! NDJSON driver: one inbound event per line in, one outbound event per
//! line out.

use std::io::{BufRead, Write};

use anyhow::Context;

use evidence_core::AccumulationKernel;
use evidence_types::InboundEvent;

/// Counters reported when the stream ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub lines: usize,
    pub skipped: usize,
    pub emitted: usize,
    pub decisions: usize,
}

/// Feed every line of `input` through `kernel`, writing results to `output`.
///
/// Lines that are not valid events are logged and skipped. Output is
/// flushed after each input line so downstream consumers see decisions
/// as soon as they are made.
pub fn run<R, W>(
    kernel: &mut AccumulationKernel,
    input: R,
    mut output: W,
) -> anyhow::Result<StreamStats>
where
    R: BufRead,
    W: Write,
{
    let mut stats = StreamStats::default();
    for (lineno, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("reading line {}", lineno + 1))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        stats.lines += 1;

        let event: InboundEvent = match serde_json::from_str(line) {
            Ok(event) => event,
            Err(e) => {
                log::warn!("line {}: not an event ({e}), skipped", lineno + 1);
                stats.skipped += 1;
                continue;
            }
        };

        let emitted = kernel.handle(&event);
        if emitted.is_empty() {
            continue;
        }
        for out in &emitted {
            if out.decision().is_some() {
                stats.decisions += 1;
            }
            serde_json::to_writer(&mut output, out)?;
            output.write_all(b"\n")?;
        }
        stats.emitted += emitted.len();
        output.flush()?;
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use serde_json::Value;

    use super::*;
    use evidence_types::AccumulationConfig;

    fn run_lines(config: AccumulationConfig, input: &str) -> (StreamStats, Vec<Value>) {
        let mut kernel = AccumulationKernel::new(config).unwrap();
        let mut out = Vec::new();
        let stats = run(&mut kernel, Cursor::new(input), &mut out).unwrap();
        let events = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (stats, events)
    }

    #[test]
    fn test_end_to_end_stream() {
        let input = r#"
{"timestamp": 0.0, "label": "ready"}
{"timestamp": 1.0, "label": "predict_proba", "data": {"result": [0.9, 0.1]}}
{"timestamp": 2.0, "label": "predict_proba", "data": "{\"result\": [0.2, 0.8]}"}
{"timestamp": 3.0, "label": "get_motor_accumulation"}
"#;
        let config = AccumulationConfig {
            source: "motor".into(),
            recovery: 1,
            ..Default::default()
        };
        let (stats, events) = run_lines(config, input);
        assert_eq!(stats.lines, 4);
        assert_eq!(stats.decisions, 1);
        assert_eq!(events.len(), 3);

        assert_eq!(events[0]["label"], "ready");
        assert_eq!(events[1]["label"], "predict");
        assert_eq!(events[1]["timestamp"], 1.0);
        assert_eq!(events[1]["data"]["target"], 0);
        assert_eq!(events[1]["data"]["accumulation"], 1);
        assert_eq!(events[1]["data"]["source"], "motor");
        // t=2 is swallowed by recovery.
        assert_eq!(events[2]["label"], "accumulation");
        assert_eq!(events[2]["data"]["scorer"], "sum");
    }

    #[test]
    fn test_garbage_lines_skipped() {
        let input = "not json\n{\"label\": \"ready\"}\n{\"data\": 1}\n";
        let (stats, events) = run_lines(AccumulationConfig::default(), input);
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.skipped, 2);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_feedback_lines() {
        let input = r#"{"timestamp": 5.0, "label": "predict_proba", "data": [0.6, 0.4]}"#;
        let config = AccumulationConfig {
            feedback: true,
            ..Default::default()
        };
        let (stats, events) = run_lines(config, input);
        assert_eq!(stats.emitted, 1);
        assert_eq!(events[0]["label"], "feedback");
        assert_eq!(events[0]["timestamp"], 5.0);
        let scores = events[0]["data"]["scores"].as_array().unwrap();
        assert!((scores[0].as_f64().unwrap() - 0.6).abs() < 1e-9);
    }
}
