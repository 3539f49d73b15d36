//! The page controller: top-level state holder for the dashboard.
//!
//! `Dashboard` owns the case queues, the authoritative verification tasks,
//! the comparison metrics, the current selection, and all transient UI state
//! (loading flags, error/message slots, local status badges). Handlers call
//! into the `TriageApi` seam and update state from the responses; every
//! failure lands in a dedicated error slot and leaves prior successful state
//! intact. Secondary re-fetches are best-effort: a failed read-back is
//! logged and ignored, preferring stale-but-present data over blank panels.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use gridops_contracts::{
    api::CompareMetrics,
    case::{sorted_by_priority, Case, CaseMode},
    signal::Signal,
    task::{VerificationResult, VerificationStatus, VerificationTask, WorkOrderState},
};

use crate::actions;
use crate::traits::TriageApi;
use crate::workflow::{derive_stage, WorkflowStage};

/// The case currently under review, pointing into one of the two queues.
///
/// A selection may dangle after a queue reload; it then resolves to no case
/// and the workflow reads as stage 3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub mode: CaseMode,
    pub case_id: String,
}

/// One boolean loading flag per operation category.
///
/// The UI disables the triggering control while its flag is set. Rebuilt on
/// each page load, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingState {
    pub baseline: bool,
    pub certainty: bool,
    pub dispatch: bool,
    pub verify: bool,
    pub metrics: bool,
}

/// Locally tracked outcome badges for one case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseLocalStatus {
    /// A dispatch was created for this case in this session.
    pub dispatched: bool,
    /// The result the operator submitted for this case, if any.
    pub verification_result: Option<VerificationResult>,
}

/// Top-level state holder and orchestrator for the dashboard page.
pub struct Dashboard {
    api: Box<dyn TriageApi>,
    /// Owner written onto locally synthesized verification tasks.
    verification_owner: String,

    baseline_cases: Vec<Case>,
    certainty_cases: Vec<Case>,
    verification_tasks: Vec<VerificationTask>,
    metrics: Option<CompareMetrics>,
    selection: Option<Selection>,
    action_taken: bool,
    loading: LoadingState,
    action_error: Option<String>,
    metrics_error: Option<String>,
    action_message: Option<String>,
    case_status: HashMap<String, CaseLocalStatus>,
}

impl Dashboard {
    /// Create a controller with empty queues over the given backend seam.
    pub fn new(api: Box<dyn TriageApi>) -> Self {
        Self {
            api,
            verification_owner: actions::DEFAULT_TEAM.to_string(),
            baseline_cases: Vec::new(),
            certainty_cases: Vec::new(),
            verification_tasks: Vec::new(),
            metrics: None,
            selection: None,
            action_taken: false,
            loading: LoadingState::default(),
            action_error: None,
            metrics_error: None,
            action_message: None,
            case_status: HashMap::new(),
        }
    }

    /// Override the owner label used for synthesized verification tasks.
    pub fn with_verification_owner(mut self, owner: impl Into<String>) -> Self {
        self.verification_owner = owner.into();
        self
    }

    // ── Read accessors ────────────────────────────────────────────────────────

    pub fn baseline_cases(&self) -> &[Case] {
        &self.baseline_cases
    }

    pub fn certainty_cases(&self) -> &[Case] {
        &self.certainty_cases
    }

    /// The mode's cases sorted non-increasing by priority score.
    pub fn queue(&self, mode: CaseMode) -> Vec<Case> {
        sorted_by_priority(self.cases_for(mode))
    }

    pub fn verification_tasks(&self) -> &[VerificationTask] {
        &self.verification_tasks
    }

    pub fn metrics(&self) -> Option<&CompareMetrics> {
        self.metrics.as_ref()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Resolve the selection against its queue; dangling selections yield None.
    pub fn selected_case(&self) -> Option<&Case> {
        let selection = self.selection.as_ref()?;
        self.cases_for(selection.mode)
            .iter()
            .find(|case| case.id == selection.case_id)
    }

    /// The authoritative verification task for the selected case, if any.
    pub fn selected_task(&self) -> Option<&VerificationTask> {
        let case = self.selected_case()?;
        self.verification_tasks
            .iter()
            .find(|task| task.case_id == case.id)
    }

    pub fn loading(&self) -> LoadingState {
        self.loading
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    pub fn metrics_error(&self) -> Option<&str> {
        self.metrics_error.as_deref()
    }

    pub fn action_message(&self) -> Option<&str> {
        self.action_message.as_deref()
    }

    pub fn case_status(&self, case_id: &str) -> Option<&CaseLocalStatus> {
        self.case_status.get(case_id)
    }

    /// Derive the workflow stage from the current observables.
    pub fn workflow_stage(&self) -> WorkflowStage {
        derive_stage(
            self.baseline_cases.len(),
            self.certainty_cases.len(),
            self.selected_case().is_some(),
            self.action_taken,
        )
    }

    // ── Selection ─────────────────────────────────────────────────────────────

    /// Point the review panel at one case in one queue.
    pub fn select(&mut self, mode: CaseMode, case_id: impl Into<String>) {
        self.selection = Some(Selection {
            mode,
            case_id: case_id.into(),
        });
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    // ── Handlers ──────────────────────────────────────────────────────────────

    /// Run baseline triage over `signals` and load the resulting queue.
    pub fn run_baseline(&mut self, signals: &[Signal]) {
        self.loading.baseline = true;
        self.action_error = None;
        self.action_message = None;

        match self.api.run_baseline(signals) {
            Ok(triage) => {
                // Prefer the persisted read-back; fall back to the direct
                // triage response when the cases route is not populated.
                let cases = match self.api.fetch_cases(CaseMode::Baseline) {
                    Ok(persisted) => persisted.cases,
                    Err(err) => {
                        debug!(error = %err, "baseline read-back unavailable, using triage response");
                        triage.cases
                    }
                };
                info!(count = cases.len(), "baseline triage complete");

                self.action_message =
                    Some(format!("Baseline triage complete: {} case(s).", cases.len()));
                self.baseline_cases = cases;
                self.action_taken = false;
                self.select_first_case_if_needed(CaseMode::Baseline);
                self.refresh_metrics();
            }
            Err(err) => {
                warn!(error = %err, "baseline triage failed");
                self.action_error = Some(err.to_string());
            }
        }

        self.loading.baseline = false;
    }

    /// Run certainty-aware triage over `signals` and load queue plus tasks.
    pub fn run_certainty(&mut self, signals: &[Signal]) {
        self.loading.certainty = true;
        self.action_error = None;
        self.action_message = None;

        match self.api.run_certainty(signals) {
            Ok(triage) => {
                let cases = match self.api.fetch_cases(CaseMode::Certainty) {
                    Ok(persisted) => persisted.cases,
                    Err(err) => {
                        debug!(error = %err, "certainty read-back unavailable, using triage response");
                        triage.cases
                    }
                };

                let mut tasks = triage.verification_tasks;
                self.fill_missing_tasks(&cases, &mut tasks);
                info!(
                    cases = cases.len(),
                    tasks = tasks.len(),
                    "certainty triage complete"
                );

                self.action_message = Some(format!(
                    "Certainty triage complete: {} case(s), {} verification task(s).",
                    cases.len(),
                    tasks.len()
                ));
                self.certainty_cases = cases;
                self.verification_tasks = tasks;
                self.action_taken = false;
                self.select_first_case_if_needed(CaseMode::Certainty);
                self.refresh_metrics();
            }
            Err(err) => {
                warn!(error = %err, "certainty triage failed");
                self.action_error = Some(err.to_string());
            }
        }

        self.loading.certainty = false;
    }

    /// Create a dispatch work order for the selected case.
    ///
    /// `hours` is the requested due window; see `actions::dispatch_request`
    /// for the flooring and default rules.
    pub fn dispatch(&mut self, hours: f64, state: WorkOrderState) {
        let Some(case_id) = self.selected_case().map(|case| case.id.clone()) else {
            self.action_error = Some("Select a case before dispatching.".to_string());
            return;
        };

        self.loading.dispatch = true;
        self.action_error = None;
        self.action_message = None;

        let request = actions::dispatch_request(hours, state, Utc::now());
        match self.api.dispatch_case(&case_id, &request) {
            Ok(data) => {
                info!(
                    case_id = %case_id,
                    work_order = %data.work_order.id,
                    "dispatch created"
                );
                self.action_taken = true;
                self.case_status.entry(case_id.clone()).or_default().dispatched = true;
                self.action_message = Some(format!("Dispatch created for {}.", case_id));

                if let Some(mode) = self.selection.as_ref().map(|sel| sel.mode) {
                    self.reload_queue_best_effort(mode);
                }
                self.refresh_metrics();
            }
            Err(err) => {
                warn!(case_id = %case_id, error = %err, "dispatch failed");
                self.action_error = Some(err.to_string());
            }
        }

        self.loading.dispatch = false;
    }

    /// Submit a human verification result for the selected case.
    pub fn verify(&mut self, result: VerificationResult, notes: &str) {
        let Some(case_id) = self.selected_case().map(|case| case.id.clone()) else {
            self.action_error = Some("Select a case before submitting verification.".to_string());
            return;
        };

        self.loading.verify = true;
        self.action_error = None;
        self.action_message = None;

        let request = actions::verify_request(result, notes);
        match self.api.verify_case(&case_id, &request) {
            Ok(data) => {
                info!(case_id = %case_id, result = result.as_str(), "verification submitted");
                self.action_taken = true;

                // The returned task becomes authoritative for this case.
                self.verification_tasks
                    .retain(|task| task.case_id != case_id);
                self.verification_tasks.push(data.verification_task);

                self.case_status
                    .entry(case_id.clone())
                    .or_default()
                    .verification_result = Some(result);
                self.action_message = Some(format!("Verification submitted for {}.", case_id));

                self.reload_queue_best_effort(CaseMode::Certainty);
                self.refresh_metrics();
            }
            Err(err) => {
                warn!(case_id = %case_id, error = %err, "verification failed");
                self.action_error = Some(err.to_string());
            }
        }

        self.loading.verify = false;
    }

    /// Fetch comparison metrics into the KPI slot.
    ///
    /// A failure writes `metrics_error` and keeps the previously fetched
    /// metrics on screen.
    pub fn refresh_metrics(&mut self) {
        self.loading.metrics = true;
        self.metrics_error = None;

        match self.api.compare_metrics() {
            Ok(metrics) => self.metrics = Some(metrics),
            Err(err) => {
                warn!(error = %err, "metrics fetch failed");
                self.metrics_error = Some(err.to_string());
            }
        }

        self.loading.metrics = false;
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn cases_for(&self, mode: CaseMode) -> &[Case] {
        match mode {
            CaseMode::Baseline => &self.baseline_cases,
            CaseMode::Certainty => &self.certainty_cases,
        }
    }

    fn set_cases(&mut self, mode: CaseMode, cases: Vec<Case>) {
        match mode {
            CaseMode::Baseline => self.baseline_cases = cases,
            CaseMode::Certainty => self.certainty_cases = cases,
        }
    }

    /// Re-fetch one queue, ignoring failure.
    fn reload_queue_best_effort(&mut self, mode: CaseMode) {
        match self.api.fetch_cases(mode) {
            Ok(updated) => self.set_cases(mode, updated.cases),
            Err(err) => {
                debug!(mode = mode.as_str(), error = %err, "queue reload failed, keeping current cases");
            }
        }
    }

    /// Move the selection to the queue's first case unless it already points
    /// at a case that survived the reload in the same mode.
    fn select_first_case_if_needed(&mut self, mode: CaseMode) {
        let next = {
            let cases = self.cases_for(mode);
            let Some(first) = cases.first() else {
                return;
            };
            let keep = self.selection.as_ref().is_some_and(|sel| {
                sel.mode == mode && cases.iter().any(|case| case.id == sel.case_id)
            });
            if keep {
                None
            } else {
                Some(first.id.clone())
            }
        };

        if let Some(case_id) = next {
            self.selection = Some(Selection { mode, case_id });
        }
    }

    /// Synthesize an open task for every flagged case the backend returned
    /// no task for.
    fn fill_missing_tasks(&self, cases: &[Case], tasks: &mut Vec<VerificationTask>) {
        for case in cases {
            if !case.verification_required {
                continue;
            }
            if tasks.iter().any(|task| task.case_id == case.id) {
                continue;
            }

            let question = case.uncertainty_reasons.first().cloned().unwrap_or_else(|| {
                format!("Is charger {} physically offline right now?", case.charger_id)
            });
            debug!(case_id = %case.id, "synthesizing verification task");
            tasks.push(VerificationTask {
                id: format!("vt_{}", Uuid::new_v4()),
                case_id: case.id.clone(),
                question,
                owner: self.verification_owner.clone(),
                status: VerificationStatus::Open,
                result: None,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use gridops_contracts::{
        api::{
            BaselineTriageData, CasesData, CertaintyTriageData, DispatchData, DispatchRequest,
            VerifyData, VerifyRequest,
        },
        case::{GridStressLevel, RecommendedAction, RootCauseTag},
        error::{GridOpsError, GridOpsResult},
        task::WorkOrder,
    };

    fn make_case(id: &str, charger_id: &str, score: u32) -> Case {
        Case {
            id: id.to_string(),
            charger_id: charger_id.to_string(),
            priority_score: score,
            sla_hours: 8,
            root_cause_tag: RootCauseTag::Connector,
            confidence: 0.9,
            recommended_action: RecommendedAction::DispatchFieldTech,
            evidence_ids: vec!["sig_001".to_string()],
            grid_stress_level: GridStressLevel::Normal,
            explanation: "multiple down reports".to_string(),
            uncertainty_reasons: vec![],
            verification_required: false,
        }
    }

    fn flagged_case(id: &str, charger_id: &str, reasons: &[&str]) -> Case {
        Case {
            confidence: 0.4,
            recommended_action: RecommendedAction::NeedsVerification,
            uncertainty_reasons: reasons.iter().map(|r| r.to_string()).collect(),
            verification_required: true,
            ..make_case(id, charger_id, 55)
        }
    }

    fn backend_failure() -> GridOpsError {
        GridOpsError::Backend {
            message: "stub failure".to_string(),
        }
    }

    /// Scriptable `TriageApi` stub recording every call it receives.
    #[derive(Default)]
    struct StubApi {
        baseline_cases: Vec<Case>,
        certainty_cases: Vec<Case>,
        certainty_tasks: Vec<VerificationTask>,
        persisted_baseline: Option<Vec<Case>>,
        persisted_certainty: Option<Vec<Case>>,
        verify_task: Option<VerificationTask>,
        fail_baseline: bool,
        fail_certainty: bool,
        fail_fetch: bool,
        fail_dispatch: bool,
        fail_verify: bool,
        fail_metrics: bool,
        calls: Mutex<Vec<String>>,
    }

    impl StubApi {
        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl TriageApi for StubApi {
        fn run_baseline(&self, _signals: &[Signal]) -> GridOpsResult<BaselineTriageData> {
            self.record("run_baseline");
            if self.fail_baseline {
                return Err(backend_failure());
            }
            Ok(BaselineTriageData {
                cases: self.baseline_cases.clone(),
            })
        }

        fn run_certainty(&self, _signals: &[Signal]) -> GridOpsResult<CertaintyTriageData> {
            self.record("run_certainty");
            if self.fail_certainty {
                return Err(backend_failure());
            }
            Ok(CertaintyTriageData {
                cases: self.certainty_cases.clone(),
                verification_tasks: self.certainty_tasks.clone(),
            })
        }

        fn fetch_cases(&self, mode: CaseMode) -> GridOpsResult<CasesData> {
            self.record(format!("fetch_cases:{}", mode.as_str()));
            if self.fail_fetch {
                return Err(backend_failure());
            }
            let persisted = match mode {
                CaseMode::Baseline => &self.persisted_baseline,
                CaseMode::Certainty => &self.persisted_certainty,
            };
            match persisted {
                Some(cases) => Ok(CasesData {
                    mode,
                    cases: cases.clone(),
                }),
                None => Err(backend_failure()),
            }
        }

        fn dispatch_case(
            &self,
            case_id: &str,
            request: &DispatchRequest,
        ) -> GridOpsResult<DispatchData> {
            self.record(format!("dispatch:{case_id}"));
            if self.fail_dispatch {
                return Err(backend_failure());
            }
            Ok(DispatchData {
                work_order: WorkOrder {
                    id: "wo_1".to_string(),
                    case_id: case_id.to_string(),
                    assigned_team: request.assigned_team.clone(),
                    due_at: request.due_at,
                    state: request.state,
                },
            })
        }

        fn verify_case(&self, case_id: &str, request: &VerifyRequest) -> GridOpsResult<VerifyData> {
            self.record(format!("verify:{case_id}"));
            if self.fail_verify {
                return Err(backend_failure());
            }
            let task = self.verify_task.clone().unwrap_or(VerificationTask {
                id: "vt_done".to_string(),
                case_id: case_id.to_string(),
                question: "resolved".to_string(),
                owner: "FieldOps".to_string(),
                status: VerificationStatus::Done,
                result: Some(request.result),
            });
            Ok(VerifyData {
                verification_task: task,
            })
        }

        fn compare_metrics(&self) -> GridOpsResult<CompareMetrics> {
            self.record("compare_metrics");
            if self.fail_metrics {
                return Err(backend_failure());
            }
            Ok(CompareMetrics {
                false_dispatch_reduction_pct: 50.0,
                triage_time_reduction_pct: 33.3,
                critical_catch_rate_delta_pct: 0.0,
            })
        }
    }

    /// Thin newtype so an `Arc<StubApi>` satisfies `Box<dyn TriageApi>` while
    /// the test keeps a handle on the call log.
    struct SharedStub(std::sync::Arc<StubApi>);

    impl TriageApi for SharedStub {
        fn run_baseline(&self, signals: &[Signal]) -> GridOpsResult<BaselineTriageData> {
            self.0.run_baseline(signals)
        }
        fn run_certainty(&self, signals: &[Signal]) -> GridOpsResult<CertaintyTriageData> {
            self.0.run_certainty(signals)
        }
        fn fetch_cases(&self, mode: CaseMode) -> GridOpsResult<CasesData> {
            self.0.fetch_cases(mode)
        }
        fn dispatch_case(
            &self,
            case_id: &str,
            request: &DispatchRequest,
        ) -> GridOpsResult<DispatchData> {
            self.0.dispatch_case(case_id, request)
        }
        fn verify_case(&self, case_id: &str, request: &VerifyRequest) -> GridOpsResult<VerifyData> {
            self.0.verify_case(case_id, request)
        }
        fn compare_metrics(&self) -> GridOpsResult<CompareMetrics> {
            self.0.compare_metrics()
        }
    }

    fn dashboard_with(stub: StubApi) -> Dashboard {
        Dashboard::new(Box::new(stub))
    }

    // ── Workflow progression ──────────────────────────────────────────────────

    #[test]
    fn fresh_dashboard_starts_at_stage_one() {
        let dash = dashboard_with(StubApi::default());
        assert_eq!(dash.workflow_stage(), WorkflowStage::RunBaseline);
    }

    #[test]
    fn full_workflow_reaches_complete() {
        let stub = StubApi {
            baseline_cases: vec![make_case("case_a", "AUS_0123", 80)],
            certainty_cases: vec![make_case("case_b", "AUS_0123", 70)],
            ..StubApi::default()
        };
        let mut dash = dashboard_with(stub);

        dash.run_baseline(&[]);
        // Auto-selection keeps the operator moving, so certainty is next.
        assert_eq!(dash.workflow_stage(), WorkflowStage::RunCertainty);

        dash.run_certainty(&[]);
        // The certainty load re-selects into the certainty queue.
        assert_eq!(dash.workflow_stage(), WorkflowStage::TakeAction);
        assert_eq!(dash.selection().unwrap().mode, CaseMode::Certainty);

        dash.dispatch(8.0, WorkOrderState::Created);
        assert_eq!(dash.workflow_stage(), WorkflowStage::Complete);

        // Reloading a queue walks the workflow backward.
        dash.run_baseline(&[]);
        assert!(dash.workflow_stage() < WorkflowStage::Complete);
    }

    #[test]
    fn dangling_selection_reads_as_stage_three() {
        let stub = StubApi {
            baseline_cases: vec![make_case("case_a", "AUS_0123", 80)],
            certainty_cases: vec![make_case("case_b", "AUS_0123", 70)],
            ..StubApi::default()
        };
        let mut dash = dashboard_with(stub);
        dash.run_baseline(&[]);
        dash.run_certainty(&[]);

        dash.select(CaseMode::Certainty, "case_gone");
        assert!(dash.selected_case().is_none());
        assert_eq!(dash.workflow_stage(), WorkflowStage::SelectCase);
    }

    // ── Queue loading ─────────────────────────────────────────────────────────

    #[test]
    fn baseline_prefers_persisted_read_back() {
        let stub = StubApi {
            baseline_cases: vec![make_case("case_direct", "AUS_0123", 60)],
            persisted_baseline: Some(vec![make_case("case_persisted", "AUS_0123", 61)]),
            ..StubApi::default()
        };
        let mut dash = dashboard_with(stub);
        dash.run_baseline(&[]);

        assert_eq!(dash.baseline_cases().len(), 1);
        assert_eq!(dash.baseline_cases()[0].id, "case_persisted");
        assert_eq!(
            dash.action_message(),
            Some("Baseline triage complete: 1 case(s).")
        );
    }

    #[test]
    fn baseline_falls_back_to_triage_response() {
        let stub = StubApi {
            baseline_cases: vec![make_case("case_direct", "AUS_0123", 60)],
            persisted_baseline: None,
            ..StubApi::default()
        };
        let mut dash = dashboard_with(stub);
        dash.run_baseline(&[]);

        assert_eq!(dash.baseline_cases()[0].id, "case_direct");
        assert!(dash.action_error().is_none());
    }

    #[test]
    fn baseline_failure_keeps_prior_queue() {
        let stub = StubApi {
            baseline_cases: vec![make_case("case_a", "AUS_0123", 80)],
            persisted_baseline: Some(vec![make_case("case_a", "AUS_0123", 80)]),
            ..StubApi::default()
        };
        let mut dash = dashboard_with(stub);
        dash.run_baseline(&[]);
        assert_eq!(dash.baseline_cases().len(), 1);

        // Swap in a failing backend while keeping the accumulated state.
        let failing = StubApi {
            fail_baseline: true,
            ..StubApi::default()
        };
        let mut dash = Dashboard {
            api: Box::new(failing),
            ..dash
        };

        dash.run_baseline(&[]);
        assert_eq!(dash.action_error(), Some("stub failure"));
        assert_eq!(dash.baseline_cases().len(), 1, "prior queue must survive");
    }

    #[test]
    fn queue_is_sorted_by_priority_descending() {
        let stub = StubApi {
            baseline_cases: vec![
                make_case("low", "AUS_0001", 10),
                make_case("high", "AUS_0002", 90),
                make_case("mid", "AUS_0003", 50),
            ],
            ..StubApi::default()
        };
        let mut dash = dashboard_with(stub);
        dash.run_baseline(&[]);

        let ids: Vec<String> = dash
            .queue(CaseMode::Baseline)
            .iter()
            .map(|case| case.id.clone())
            .collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
    }

    // ── Verification task synthesis ───────────────────────────────────────────

    #[test]
    fn certainty_synthesizes_task_for_flagged_case() {
        let stub = StubApi {
            certainty_cases: vec![
                make_case("case_ok", "AUS_0123", 80),
                flagged_case("case_flagged", "AUS_0450", &["only one source reported"]),
            ],
            certainty_tasks: vec![],
            ..StubApi::default()
        };
        let mut dash = dashboard_with(stub);
        dash.run_certainty(&[]);

        assert_eq!(dash.verification_tasks().len(), 1);
        let task = &dash.verification_tasks()[0];
        assert_eq!(task.case_id, "case_flagged");
        assert_eq!(task.question, "only one source reported");
        assert_eq!(task.owner, "FieldOps");
        assert_eq!(task.status, VerificationStatus::Open);
        assert!(task.result.is_none());
    }

    #[test]
    fn synthesized_question_defaults_without_uncertainty_reasons() {
        let stub = StubApi {
            certainty_cases: vec![flagged_case("case_flagged", "AUS_0450", &[])],
            ..StubApi::default()
        };
        let mut dash = dashboard_with(stub);
        dash.run_certainty(&[]);

        assert_eq!(
            dash.verification_tasks()[0].question,
            "Is charger AUS_0450 physically offline right now?"
        );
    }

    #[test]
    fn backend_supplied_task_is_not_duplicated() {
        let task = VerificationTask {
            id: "vt_backend".to_string(),
            case_id: "case_flagged".to_string(),
            question: "from the backend".to_string(),
            owner: "FieldOps".to_string(),
            status: VerificationStatus::Open,
            result: None,
        };
        let stub = StubApi {
            certainty_cases: vec![flagged_case("case_flagged", "AUS_0450", &["reason"])],
            certainty_tasks: vec![task],
            ..StubApi::default()
        };
        let mut dash = dashboard_with(stub);
        dash.run_certainty(&[]);

        assert_eq!(dash.verification_tasks().len(), 1);
        assert_eq!(dash.verification_tasks()[0].id, "vt_backend");
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    #[test]
    fn dispatch_requires_selection() {
        let mut dash = dashboard_with(StubApi::default());
        dash.dispatch(8.0, WorkOrderState::Created);
        assert_eq!(dash.action_error(), Some("Select a case before dispatching."));
    }

    #[test]
    fn dispatch_marks_action_taken_and_reloads_queue() {
        let stub = StubApi {
            baseline_cases: vec![make_case("case_a", "AUS_0123", 80)],
            certainty_cases: vec![make_case("case_b", "AUS_0123", 70)],
            persisted_baseline: Some(vec![make_case("case_a", "AUS_0123", 80)]),
            ..StubApi::default()
        };
        let mut dash = dashboard_with(stub);
        dash.run_baseline(&[]);
        dash.run_certainty(&[]);
        dash.select(CaseMode::Baseline, "case_a");

        dash.dispatch(8.0, WorkOrderState::Created);

        assert_eq!(dash.action_message(), Some("Dispatch created for case_a."));
        assert!(dash.case_status("case_a").unwrap().dispatched);
        assert_eq!(dash.workflow_stage(), WorkflowStage::Complete);
        assert!(dash.metrics().is_some());
    }

    #[test]
    fn dispatch_failure_sets_error_and_keeps_stage() {
        let stub = StubApi {
            baseline_cases: vec![make_case("case_a", "AUS_0123", 80)],
            certainty_cases: vec![make_case("case_b", "AUS_0123", 70)],
            fail_dispatch: true,
            ..StubApi::default()
        };
        let mut dash = dashboard_with(stub);
        dash.run_baseline(&[]);
        dash.run_certainty(&[]);

        dash.dispatch(8.0, WorkOrderState::Created);

        assert_eq!(dash.action_error(), Some("stub failure"));
        assert!(dash.case_status("case_b").is_none());
        assert_eq!(dash.workflow_stage(), WorkflowStage::TakeAction);
    }

    // ── Verify ────────────────────────────────────────────────────────────────

    #[test]
    fn verify_requires_selection() {
        let mut dash = dashboard_with(StubApi::default());
        dash.verify(VerificationResult::ConfirmedIssue, "");
        assert_eq!(
            dash.action_error(),
            Some("Select a case before submitting verification.")
        );
    }

    #[test]
    fn verify_replaces_prior_task_for_case() {
        let stub = StubApi {
            baseline_cases: vec![make_case("case_a", "AUS_0123", 80)],
            certainty_cases: vec![flagged_case("case_flagged", "AUS_0450", &["reason"])],
            ..StubApi::default()
        };
        let mut dash = dashboard_with(stub);
        dash.run_baseline(&[]);
        dash.run_certainty(&[]);
        assert_eq!(dash.verification_tasks().len(), 1);
        let synthesized_id = dash.verification_tasks()[0].id.clone();

        dash.select(CaseMode::Certainty, "case_flagged");
        dash.verify(VerificationResult::ConfirmedIssue, "  tech confirmed on site  ");

        assert_eq!(dash.verification_tasks().len(), 1);
        let task = &dash.verification_tasks()[0];
        assert_ne!(task.id, synthesized_id);
        assert_eq!(task.status, VerificationStatus::Done);
        assert_eq!(task.result, Some(VerificationResult::ConfirmedIssue));
        assert_eq!(
            dash.case_status("case_flagged").unwrap().verification_result,
            Some(VerificationResult::ConfirmedIssue)
        );
        assert_eq!(
            dash.action_message(),
            Some("Verification submitted for case_flagged.")
        );
    }

    #[test]
    fn verify_survives_failed_certainty_reload() {
        let stub = StubApi {
            baseline_cases: vec![make_case("case_a", "AUS_0123", 80)],
            certainty_cases: vec![flagged_case("case_flagged", "AUS_0450", &["reason"])],
            persisted_certainty: None,
            ..StubApi::default()
        };
        let mut dash = dashboard_with(stub);
        dash.run_baseline(&[]);
        dash.run_certainty(&[]);
        dash.select(CaseMode::Certainty, "case_flagged");

        dash.verify(VerificationResult::FalseAlarm, "");

        // The reload failed, but the queue and the submitted result survive.
        assert!(dash.action_error().is_none());
        assert_eq!(dash.certainty_cases().len(), 1);
        assert_eq!(dash.workflow_stage(), WorkflowStage::Complete);
    }

    // ── Metrics ───────────────────────────────────────────────────────────────

    #[test]
    fn metrics_failure_keeps_previous_metrics() {
        let mut dash = dashboard_with(StubApi::default());
        dash.refresh_metrics();
        assert!(dash.metrics().is_some());
        assert!(dash.metrics_error().is_none());

        let failing = StubApi {
            fail_metrics: true,
            ..StubApi::default()
        };
        let mut dash = Dashboard {
            api: Box::new(failing),
            ..dash
        };

        dash.refresh_metrics();
        assert!(dash.metrics().is_some(), "stale metrics must survive");
        assert_eq!(dash.metrics_error(), Some("stub failure"));
    }

    // ── Call sequencing ───────────────────────────────────────────────────────

    #[test]
    fn dispatch_refetches_queue_then_metrics() {
        let stub = std::sync::Arc::new(StubApi {
            baseline_cases: vec![make_case("case_a", "AUS_0123", 80)],
            certainty_cases: vec![make_case("case_b", "AUS_0123", 70)],
            persisted_baseline: Some(vec![make_case("case_a", "AUS_0123", 80)]),
            ..StubApi::default()
        });
        let mut dash = Dashboard::new(Box::new(SharedStub(std::sync::Arc::clone(&stub))));
        dash.run_baseline(&[]);
        dash.run_certainty(&[]);
        dash.select(CaseMode::Baseline, "case_a");
        stub.calls.lock().unwrap().clear();

        dash.dispatch(8.0, WorkOrderState::Created);

        assert_eq!(
            stub.calls(),
            vec!["dispatch:case_a", "fetch_cases:baseline", "compare_metrics"]
        );
    }
}
