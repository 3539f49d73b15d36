//! Raw reliability signals about individual chargers.
//!
//! Signals are backend input: the dashboard submits them for triage and never
//! mutates them. One charger typically produces several signals from
//! different sources before a case is opened for it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a signal was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    /// The charger network's own telemetry API.
    ChargerApi,
    /// A municipal 311 service report.
    #[serde(rename = "311")]
    ThreeOneOne,
    /// User-generated content (driver app reports, social posts).
    Ugc,
}

/// The charger status asserted by a signal.
///
/// `Unknown` covers reports that describe a problem without asserting whether
/// the charger is reachable (e.g. "payment terminal issue").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalStatus {
    Down,
    Degraded,
    Online,
    Unknown,
}

/// One observed event about a charger.
///
/// Immutable once created; the triage backend groups signals by `charger_id`
/// and cites them back as case evidence via their ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Stable signal identifier, e.g. "sig_001".
    pub id: String,
    pub source: SignalSource,
    /// When the event was observed.
    pub timestamp: DateTime<Utc>,
    /// The charger this signal is about, e.g. "AUS_0123".
    pub charger_id: String,
    pub lat: f64,
    pub lon: f64,
    pub status: SignalStatus,
    /// Free-text description from the reporter or telemetry feed.
    pub text: String,
}
