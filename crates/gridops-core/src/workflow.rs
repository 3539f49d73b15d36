//! The five-step operator workflow and its stage reducer.
//!
//! The stage is never stored. It is a pure function of four observables —
//! baseline queue length, certainty queue length, whether a selection
//! resolves to a case, and whether an action has been taken since the last
//! queue load — recomputed on every render. Any state change that alters an
//! observable silently moves the stage forward or backward; loading a queue
//! resets the action flag, so even stage 5 can move backward.

/// One step of the guided triage workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkflowStage {
    /// 1 — no baseline cases loaded yet.
    RunBaseline,
    /// 2 — baseline loaded, certainty queue still empty.
    RunCertainty,
    /// 3 — both queues loaded, nothing selected.
    SelectCase,
    /// 4 — a case is selected; no dispatch/verify taken since the last load.
    TakeAction,
    /// 5 — a dispatch or verification has been submitted.
    Complete,
}

impl WorkflowStage {
    /// 1-based step number shown in the workflow indicator.
    pub fn number(self) -> u8 {
        match self {
            WorkflowStage::RunBaseline => 1,
            WorkflowStage::RunCertainty => 2,
            WorkflowStage::SelectCase => 3,
            WorkflowStage::TakeAction => 4,
            WorkflowStage::Complete => 5,
        }
    }

    /// Short imperative label for the current step.
    pub fn label(self) -> &'static str {
        match self {
            WorkflowStage::RunBaseline => "Run baseline triage",
            WorkflowStage::RunCertainty => "Run certainty triage",
            WorkflowStage::SelectCase => "Select a case to review",
            WorkflowStage::TakeAction => "Take action (dispatch or verify)",
            WorkflowStage::Complete => "Workflow complete",
        }
    }

    /// One-line operator hint for the current step.
    pub fn hint(self) -> &'static str {
        match self {
            WorkflowStage::RunBaseline => {
                "Start with baseline ranking to create an initial queue."
            }
            WorkflowStage::RunCertainty => {
                "Now run certainty to find ambiguous cases before dispatch."
            }
            WorkflowStage::SelectCase => {
                "Open a case in either queue to see explanation and evidence."
            }
            WorkflowStage::TakeAction => {
                "Dispatch clear issues or submit verification for uncertain ones."
            }
            WorkflowStage::Complete => {
                "You can refresh triage anytime to process new signals."
            }
        }
    }
}

/// Derive the workflow stage from the four observables.
///
/// Conditions are evaluated in fixed priority order; the first that holds
/// wins. `has_selection` must reflect a selection that actually resolves to
/// a case in its queue — a dangling selection counts as no selection.
pub fn derive_stage(
    baseline_count: usize,
    certainty_count: usize,
    has_selection: bool,
    action_taken: bool,
) -> WorkflowStage {
    if baseline_count == 0 {
        WorkflowStage::RunBaseline
    } else if certainty_count == 0 {
        WorkflowStage::RunCertainty
    } else if !has_selection {
        WorkflowStage::SelectCase
    } else if !action_taken {
        WorkflowStage::TakeAction
    } else {
        WorkflowStage::Complete
    }
}
