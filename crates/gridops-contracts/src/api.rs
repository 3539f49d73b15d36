//! Request/response payloads for the backend HTTP contract.
//!
//! Every backend response is wrapped in the same `{ok, data, error}`
//! envelope. The payload types here mirror the backend's JSON field names
//! exactly; no renaming happens at the transport layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::case::{Case, CaseMode};
use crate::signal::Signal;
use crate::task::{VerificationResult, VerificationTask, WorkOrder, WorkOrderState};

/// The uniform success/error envelope around every backend response.
///
/// Exactly one of `data` / `error` is meaningful: `ok: true` promises `data`
/// is present, `ok: false` promises `error` explains why. Responses that
/// break either promise are treated as failures by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// Body for both triage endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageRequest {
    pub signals: Vec<Signal>,
}

/// Success data of `POST /api/triage/baseline`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineTriageData {
    pub cases: Vec<Case>,
}

/// Success data of `POST /api/triage/certainty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertaintyTriageData {
    pub cases: Vec<Case>,
    pub verification_tasks: Vec<VerificationTask>,
}

/// Success data of `GET /api/cases?mode=<mode>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CasesData {
    pub mode: CaseMode,
    pub cases: Vec<Case>,
}

/// Body of `POST /api/cases/{caseId}/dispatch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchRequest {
    pub assigned_team: String,
    pub due_at: DateTime<Utc>,
    pub state: WorkOrderState,
}

/// Success data of the dispatch endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchData {
    pub work_order: WorkOrder,
}

/// Body of `POST /api/cases/{caseId}/verify`.
///
/// `notes` is omitted from the JSON entirely when `None`; the backend never
/// sees an empty-string notes field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub result: VerificationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Success data of the verify endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyData {
    pub verification_task: VerificationTask,
}

/// Success data of `GET /api/metrics/compare`.
///
/// Three aggregate percentages describing baseline-vs-certainty improvement.
/// Recomputed wholesale on every fetch, never merged client-side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompareMetrics {
    pub false_dispatch_reduction_pct: f64,
    pub triage_time_reduction_pct: f64,
    pub critical_catch_rate_delta_pct: f64,
}
