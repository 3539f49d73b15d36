//! # gridops-ref-demo
//!
//! Reference data for running the GridOps dashboard without a backend:
//! the five-signal Austin demo fixture and a canned in-memory `TriageApi`.
//!
//! Everything here is hardcoded and fictional. No triage computation is
//! performed — scores, confidence values, and verification flags are fixed
//! constants chosen to exercise every dashboard state.

pub mod backend;
pub mod signals;

pub use backend::CannedBackend;
pub use signals::{charger_locations, demo_signals};
