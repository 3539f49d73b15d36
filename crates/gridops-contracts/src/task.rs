//! Human follow-up records: verification tasks and dispatch work orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a verification task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Open,
    Done,
}

/// What a human reviewer concluded about a flagged case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationResult {
    ConfirmedIssue,
    FalseAlarm,
    NeedsMoreData,
}

impl VerificationResult {
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationResult::ConfirmedIssue => "confirmed_issue",
            VerificationResult::FalseAlarm => "false_alarm",
            VerificationResult::NeedsMoreData => "needs_more_data",
        }
    }
}

/// A pending or resolved human-review request tied to one case.
///
/// The client treats at most one task per case id as authoritative: a newly
/// returned task replaces any prior task for that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationTask {
    pub id: String,
    pub case_id: String,
    /// The concrete question the reviewer must answer.
    pub question: String,
    /// Team or person responsible for answering, e.g. "FieldOps".
    pub owner: String,
    pub status: VerificationStatus,
    /// Present once the task has been resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<VerificationResult>,
}

/// Lifecycle of a dispatch work order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkOrderState {
    Created,
    InProgress,
    Done,
}

impl WorkOrderState {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkOrderState::Created => "created",
            WorkOrderState::InProgress => "in_progress",
            WorkOrderState::Done => "done",
        }
    }
}

/// A dispatch record returned by the dispatch endpoint.
///
/// Not persisted client-side beyond a transient "dispatched" badge on the
/// originating case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: String,
    pub case_id: String,
    pub assigned_team: String,
    pub due_at: DateTime<Utc>,
    pub state: WorkOrderState,
}
