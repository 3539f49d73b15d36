//! Triage cases: the backend's findings about suspected charger issues.
//!
//! A case is read-only on the client. It is keyed by `id`; uniqueness within
//! a queue is assumed, not enforced. The same charger may appear in both the
//! baseline and certainty queues with different scores and actions, because
//! the two pipelines are computed independently by the backend.

use serde::{Deserialize, Serialize};

/// Which triage queue a case belongs to.
///
/// Baseline ranks by severity alone; certainty additionally scores
/// confidence and flags low-confidence cases for human verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseMode {
    Baseline,
    Certainty,
}

impl CaseMode {
    /// The query-string value used by the cases endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            CaseMode::Baseline => "baseline",
            CaseMode::Certainty => "certainty",
        }
    }
}

/// The action the triage backend recommends for a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendedAction {
    DispatchFieldTech,
    RemoteReset,
    NeedsVerification,
}

impl RecommendedAction {
    /// The wire string, also used verbatim as a badge label.
    pub fn as_str(self) -> &'static str {
        match self {
            RecommendedAction::DispatchFieldTech => "dispatch_field_tech",
            RecommendedAction::RemoteReset => "remote_reset",
            RecommendedAction::NeedsVerification => "needs_verification",
        }
    }
}

/// The backend's best guess at what is wrong with the charger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootCauseTag {
    PaymentTerminal,
    Connector,
    Network,
    Unknown,
}

impl RootCauseTag {
    pub fn as_str(self) -> &'static str {
        match self {
            RootCauseTag::PaymentTerminal => "payment_terminal",
            RootCauseTag::Connector => "connector",
            RootCauseTag::Network => "network",
            RootCauseTag::Unknown => "unknown",
        }
    }
}

/// Grid load context at the charger's location when the case was scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridStressLevel {
    Normal,
    Elevated,
    High,
}

impl GridStressLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            GridStressLevel::Normal => "normal",
            GridStressLevel::Elevated => "elevated",
            GridStressLevel::High => "high",
        }
    }
}

/// Display tier derived from a case's priority score.
///
/// Drives row and map-pin coloring. Not a wire type — the backend only ships
/// the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityTier {
    High,
    Medium,
    Low,
}

impl PriorityTier {
    /// Classify a 0-100 priority score: high ≥ 75, medium ≥ 50, else low.
    pub fn for_score(score: u32) -> Self {
        if score >= 75 {
            PriorityTier::High
        } else if score >= 50 {
            PriorityTier::Medium
        } else {
            PriorityTier::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PriorityTier::High => "high",
            PriorityTier::Medium => "medium",
            PriorityTier::Low => "low",
        }
    }
}

/// A triage finding for one charger.
///
/// Created by backend triage runs; the client never recomputes any field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    /// Stable case identifier, e.g. "case_AUS_0123".
    pub id: String,
    pub charger_id: String,
    /// 0-100 severity ranking; queues render in non-increasing score order.
    pub priority_score: u32,
    /// Response-time target in hours for this case.
    pub sla_hours: u32,
    pub root_cause_tag: RootCauseTag,
    /// 0-1 fraction; certainty mode flags low values for verification.
    pub confidence: f64,
    pub recommended_action: RecommendedAction,
    /// Ids of the signals this case was built from.
    pub evidence_ids: Vec<String>,
    pub grid_stress_level: GridStressLevel,
    /// Backend-written rationale shown in the detail panel.
    pub explanation: String,
    /// Why the backend is unsure, ordered most significant first.
    pub uncertainty_reasons: Vec<String>,
    /// True when the certainty pipeline wants a human to confirm the issue
    /// before a truck rolls.
    pub verification_required: bool,
}

impl Case {
    /// The display tier for this case's score.
    pub fn priority_tier(&self) -> PriorityTier {
        PriorityTier::for_score(self.priority_score)
    }
}

/// Sort cases for queue display: non-increasing by priority score.
///
/// No secondary key; relative order of equal scores is whatever the sort
/// leaves it as.
pub fn sorted_by_priority(cases: &[Case]) -> Vec<Case> {
    let mut sorted = cases.to_vec();
    sorted.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));
    sorted
}
