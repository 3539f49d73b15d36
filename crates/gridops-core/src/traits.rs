//! The trait seam between the dashboard controller and the triage backend.
//!
//! The controller owns a `Box<dyn TriageApi>` and never knows whether it is
//! talking HTTP (`gridops-client`) or canned in-memory data
//! (`gridops-ref-demo`). Every operation is a single-shot request/response
//! pair: no retry, no caching, no coordination between calls beyond the
//! sequential ordering the controller itself imposes.

use gridops_contracts::{
    api::{
        BaselineTriageData, CasesData, CertaintyTriageData, CompareMetrics, DispatchData,
        DispatchRequest, VerifyData, VerifyRequest,
    },
    case::CaseMode,
    error::GridOpsResult,
    signal::Signal,
};

/// The six backend operations the dashboard consumes.
///
/// Implementations must be synchronous and side-effect-free on the client:
/// a call either resolves to the endpoint's success data or fails with a
/// `GridOpsError` carrying a human-readable message for the UI error slot.
pub trait TriageApi: Send + Sync {
    /// Submit signals for baseline (severity-only) triage.
    fn run_baseline(&self, signals: &[Signal]) -> GridOpsResult<BaselineTriageData>;

    /// Submit signals for certainty-aware triage.
    ///
    /// The success data carries verification tasks for cases the backend
    /// flagged as needing human review.
    fn run_certainty(&self, signals: &[Signal]) -> GridOpsResult<CertaintyTriageData>;

    /// Fetch the persisted case queue for one mode.
    fn fetch_cases(&self, mode: CaseMode) -> GridOpsResult<CasesData>;

    /// Create a dispatch work order for a case.
    fn dispatch_case(&self, case_id: &str, request: &DispatchRequest)
        -> GridOpsResult<DispatchData>;

    /// Submit a human verification result for a case.
    fn verify_case(&self, case_id: &str, request: &VerifyRequest) -> GridOpsResult<VerifyData>;

    /// Fetch the baseline-vs-certainty comparison metrics.
    fn compare_metrics(&self) -> GridOpsResult<CompareMetrics>;
}
