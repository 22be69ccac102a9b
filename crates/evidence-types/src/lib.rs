// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Evidence Kernel Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, event shapes, and error hierarchy
//! for the evidence accumulation kernel.

pub mod config;
pub mod error;
pub mod event;
pub mod score;

pub use config::{AccumulationConfig, ConfigPatch, ConfigSnapshot, ScorerKind};
pub use error::{AccumulationError, AccumulationResult};
pub use event::{Decision, EventKind, Feedback, InboundEvent, Outbound, OutboundEvent};
