//! A canned in-memory stand-in for the triage backend.
//!
//! `CannedBackend` implements `TriageApi` with hardcoded, fictional results:
//! it performs no scoring of any kind. It exists so the demo binary, the
//! TUI's offline mode, and tests can exercise the full dashboard workflow
//! without a network. State is kept behind a `Mutex` so `fetch_cases`
//! reflects earlier triage runs and `verify_case` resolves stored tasks.

use std::sync::Mutex;

use uuid::Uuid;

use gridops_contracts::{
    api::{
        BaselineTriageData, CasesData, CertaintyTriageData, CompareMetrics, DispatchData,
        DispatchRequest, VerifyData, VerifyRequest,
    },
    case::{Case, CaseMode, GridStressLevel, RecommendedAction, RootCauseTag},
    error::{GridOpsError, GridOpsResult},
    signal::Signal,
    task::{VerificationStatus, VerificationTask, WorkOrder},
};
use gridops_core::traits::TriageApi;

/// What the backend has "persisted" so far.
#[derive(Default)]
struct Store {
    baseline: Vec<Case>,
    certainty: Vec<Case>,
    tasks: Vec<VerificationTask>,
    work_orders: Vec<WorkOrder>,
}

/// An in-memory `TriageApi` returning canned triage results.
#[derive(Default)]
pub struct CannedBackend {
    store: Mutex<Store>,
}

impl CannedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Work orders created so far, for demo output.
    pub fn work_orders(&self) -> Vec<WorkOrder> {
        self.store.lock().expect("store lock poisoned").work_orders.clone()
    }
}

impl TriageApi for CannedBackend {
    fn run_baseline(&self, _signals: &[Signal]) -> GridOpsResult<BaselineTriageData> {
        let cases = baseline_cases();
        self.store.lock().expect("store lock poisoned").baseline = cases.clone();
        Ok(BaselineTriageData { cases })
    }

    fn run_certainty(&self, _signals: &[Signal]) -> GridOpsResult<CertaintyTriageData> {
        let cases = certainty_cases();
        let verification_tasks = certainty_tasks();
        {
            let mut store = self.store.lock().expect("store lock poisoned");
            store.certainty = cases.clone();
            store.tasks = verification_tasks.clone();
        }
        Ok(CertaintyTriageData {
            cases,
            verification_tasks,
        })
    }

    fn fetch_cases(&self, mode: CaseMode) -> GridOpsResult<CasesData> {
        let store = self.store.lock().expect("store lock poisoned");
        let cases = match mode {
            CaseMode::Baseline => store.baseline.clone(),
            CaseMode::Certainty => store.certainty.clone(),
        };
        Ok(CasesData { mode, cases })
    }

    fn dispatch_case(
        &self,
        case_id: &str,
        request: &DispatchRequest,
    ) -> GridOpsResult<DispatchData> {
        let mut store = self.store.lock().expect("store lock poisoned");
        let known = store
            .baseline
            .iter()
            .chain(store.certainty.iter())
            .any(|case| case.id == case_id);
        if !known {
            return Err(GridOpsError::Backend {
                message: format!("case not found: {}", case_id),
            });
        }

        let work_order = WorkOrder {
            id: format!("wo_{}", Uuid::new_v4()),
            case_id: case_id.to_string(),
            assigned_team: request.assigned_team.clone(),
            due_at: request.due_at,
            state: request.state,
        };
        store.work_orders.push(work_order.clone());
        Ok(DispatchData { work_order })
    }

    fn verify_case(&self, case_id: &str, request: &VerifyRequest) -> GridOpsResult<VerifyData> {
        let mut store = self.store.lock().expect("store lock poisoned");

        // Resolve the stored task for this case, or open one on the fly for
        // cases verified without a prior flag.
        let mut task = store
            .tasks
            .iter()
            .find(|task| task.case_id == case_id)
            .cloned()
            .unwrap_or_else(|| VerificationTask {
                id: format!("vt_{}", Uuid::new_v4()),
                case_id: case_id.to_string(),
                question: "Operator-initiated verification".to_string(),
                owner: "FieldOps".to_string(),
                status: VerificationStatus::Open,
                result: None,
            });
        task.status = VerificationStatus::Done;
        task.result = Some(request.result);

        store.tasks.retain(|stored| stored.case_id != case_id);
        store.tasks.push(task.clone());
        Ok(VerifyData {
            verification_task: task,
        })
    }

    fn compare_metrics(&self) -> GridOpsResult<CompareMetrics> {
        // Fixed demo numbers; the real backend recomputes these per fetch.
        Ok(CompareMetrics {
            false_dispatch_reduction_pct: 50.0,
            triage_time_reduction_pct: 33.3,
            critical_catch_rate_delta_pct: 12.5,
        })
    }
}

// ── Canned triage results ─────────────────────────────────────────────────────

fn baseline_cases() -> Vec<Case> {
    vec![
        Case {
            id: "case_AUS_0123".to_string(),
            charger_id: "AUS_0123".to_string(),
            priority_score: 89,
            sla_hours: 2,
            root_cause_tag: RootCauseTag::Connector,
            confidence: 0.99,
            recommended_action: RecommendedAction::DispatchFieldTech,
            evidence_ids: vec![
                "sig_001".to_string(),
                "sig_002".to_string(),
                "sig_003".to_string(),
            ],
            grid_stress_level: GridStressLevel::High,
            explanation: "AUS_0123 scored 89: two down reports and degraded telemetry \
                          across three sources within 10 minutes."
                .to_string(),
            uncertainty_reasons: vec![],
            verification_required: false,
        },
        Case {
            id: "case_AUS_0450".to_string(),
            charger_id: "AUS_0450".to_string(),
            priority_score: 42,
            sla_hours: 24,
            root_cause_tag: RootCauseTag::PaymentTerminal,
            confidence: 0.76,
            recommended_action: RecommendedAction::RemoteReset,
            evidence_ids: vec!["sig_004".to_string(), "sig_005".to_string()],
            grid_stress_level: GridStressLevel::Normal,
            explanation: "AUS_0450 scored 42: one payment complaint while telemetry \
                          reports the charger online."
                .to_string(),
            uncertainty_reasons: vec![],
            verification_required: false,
        },
    ]
}

fn certainty_cases() -> Vec<Case> {
    vec![
        Case {
            id: "case_AUS_0123".to_string(),
            charger_id: "AUS_0123".to_string(),
            priority_score: 89,
            sla_hours: 2,
            root_cause_tag: RootCauseTag::Connector,
            confidence: 0.91,
            recommended_action: RecommendedAction::DispatchFieldTech,
            evidence_ids: vec![
                "sig_001".to_string(),
                "sig_002".to_string(),
                "sig_003".to_string(),
            ],
            grid_stress_level: GridStressLevel::High,
            explanation: "AUS_0123 scored 89 with confidence 0.91: three sources agree \
                          the charger is failing."
                .to_string(),
            uncertainty_reasons: vec![],
            verification_required: false,
        },
        Case {
            id: "case_AUS_0450".to_string(),
            charger_id: "AUS_0450".to_string(),
            priority_score: 42,
            sla_hours: 24,
            root_cause_tag: RootCauseTag::PaymentTerminal,
            confidence: 0.45,
            recommended_action: RecommendedAction::NeedsVerification,
            evidence_ids: vec!["sig_004".to_string(), "sig_005".to_string()],
            grid_stress_level: GridStressLevel::Normal,
            explanation: "AUS_0450 scored 42 with confidence 0.45: the only problem \
                          report conflicts with a healthy heartbeat."
                .to_string(),
            uncertainty_reasons: vec![
                "status reports for AUS_0450 conflict within the last hour".to_string(),
                "no charger_api signal confirms the reported fault".to_string(),
            ],
            verification_required: true,
        },
    ]
}

fn certainty_tasks() -> Vec<VerificationTask> {
    vec![VerificationTask {
        id: "vt_case_AUS_0450".to_string(),
        case_id: "case_AUS_0450".to_string(),
        question: "Is charger AUS_0450 physically offline right now?".to_string(),
        owner: "FieldOps".to_string(),
        status: VerificationStatus::Open,
        result: None,
    }]
}
