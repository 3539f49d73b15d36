//! Assembly of dispatch and verification request payloads from form state.

use chrono::{DateTime, Duration, Utc};

use gridops_contracts::{
    api::{DispatchRequest, VerifyRequest},
    task::{VerificationResult, WorkOrderState},
};

/// The team every dispatch is assigned to.
pub const DEFAULT_TEAM: &str = "FieldOps";

/// Fallback due window when the requested hours are not a finite number.
pub const DEFAULT_DUE_HOURS: f64 = 8.0;

/// Minimum due window; shorter requests are floored, not rejected.
pub const MIN_DUE_HOURS: f64 = 1.0;

/// Build a dispatch payload for the selected case.
///
/// `due_at` is `now` plus `max(1, hours)` hours; a non-finite `hours` falls
/// back to the 8-hour default. `now` is an explicit argument so the due-time
/// arithmetic stays deterministic under test.
pub fn dispatch_request(
    hours: f64,
    state: WorkOrderState,
    now: DateTime<Utc>,
) -> DispatchRequest {
    let safe_hours = if hours.is_finite() {
        hours.max(MIN_DUE_HOURS)
    } else {
        DEFAULT_DUE_HOURS
    };

    DispatchRequest {
        assigned_team: DEFAULT_TEAM.to_string(),
        due_at: now + Duration::milliseconds((safe_hours * 3_600_000.0) as i64),
        state,
    }
}

/// Build a verification payload.
///
/// Notes are trimmed; empty or whitespace-only notes are omitted entirely
/// rather than sent as an empty string.
pub fn verify_request(result: VerificationResult, notes: &str) -> VerifyRequest {
    let trimmed = notes.trim();
    VerifyRequest {
        result,
        notes: if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        },
    }
}
