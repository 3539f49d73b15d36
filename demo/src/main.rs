//! GridOps — headless demo CLI
//!
//! Walks the dashboard's five-step triage workflow against the canned
//! in-memory backend, printing each transition. Useful for demos and for
//! sanity-checking the controller without a terminal UI or a backend.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- baseline
//!   cargo run -p demo -- certainty
//!   cargo run -p demo -- dispatch
//!   cargo run -p demo -- verify
//!   cargo run -p demo -- metrics

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gridops_contracts::{
    case::CaseMode,
    error::{GridOpsError, GridOpsResult},
    task::{VerificationResult, WorkOrderState},
};
use gridops_core::Dashboard;
use gridops_ref_demo::{demo_signals, CannedBackend};

// ── CLI definition ────────────────────────────────────────────────────────────

/// GridOps — EV charger reliability triage demo.
///
/// Each subcommand drives the dashboard controller against canned demo data,
/// printing queue contents, workflow stages, and action results.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "GridOps triage workflow demo",
    long_about = "Drives the GridOps dashboard controller against a canned in-memory\n\
                  backend: baseline and certainty triage, dispatch, verification,\n\
                  and KPI comparison."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Walk all five workflow stages in sequence.
    RunAll,
    /// Stage 1: run baseline triage and print the queue.
    Baseline,
    /// Stage 2: run certainty triage and print cases plus verification tasks.
    Certainty,
    /// Dispatch the top baseline case.
    Dispatch,
    /// Submit a verification result for the flagged certainty case.
    Verify,
    /// Fetch and print the baseline-vs-certainty comparison metrics.
    Metrics,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Structured logging; set RUST_LOG=debug for verbose controller output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::Baseline => run_baseline(),
        Command::Certainty => run_certainty(),
        Command::Dispatch => run_dispatch(),
        Command::Verify => run_verify(),
        Command::Metrics => run_metrics(),
    };

    match result {
        Ok(()) => println!("Demo completed successfully."),
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn new_dashboard() -> Dashboard {
    Dashboard::new(Box::new(CannedBackend::new()))
}

fn run_all() -> GridOpsResult<()> {
    let signals = demo_signals();
    let mut dash = new_dashboard();
    print_stage(&dash);

    dash.run_baseline(&signals);
    check(&dash)?;
    print_queue(&dash, CaseMode::Baseline);
    print_stage(&dash);

    dash.run_certainty(&signals);
    check(&dash)?;
    print_queue(&dash, CaseMode::Certainty);
    print_tasks(&dash);
    print_stage(&dash);

    // Verify the flagged case first, then dispatch the clear one.
    dash.select(CaseMode::Certainty, "case_AUS_0450");
    dash.verify(VerificationResult::ConfirmedIssue, "driver confirmed dead screen");
    check(&dash)?;
    print_message(&dash);
    print_stage(&dash);

    dash.select(CaseMode::Baseline, "case_AUS_0123");
    dash.dispatch(4.0, WorkOrderState::Created);
    check(&dash)?;
    print_message(&dash);
    print_stage(&dash);

    print_metrics(&dash);
    Ok(())
}

fn run_baseline() -> GridOpsResult<()> {
    let mut dash = new_dashboard();
    dash.run_baseline(&demo_signals());
    check(&dash)?;
    print_queue(&dash, CaseMode::Baseline);
    print_stage(&dash);
    Ok(())
}

fn run_certainty() -> GridOpsResult<()> {
    let mut dash = new_dashboard();
    dash.run_baseline(&demo_signals());
    dash.run_certainty(&demo_signals());
    check(&dash)?;
    print_queue(&dash, CaseMode::Certainty);
    print_tasks(&dash);
    print_stage(&dash);
    Ok(())
}

fn run_dispatch() -> GridOpsResult<()> {
    let signals = demo_signals();
    let mut dash = new_dashboard();
    dash.run_baseline(&signals);
    dash.run_certainty(&signals);
    dash.select(CaseMode::Baseline, "case_AUS_0123");
    dash.dispatch(8.0, WorkOrderState::Created);
    check(&dash)?;
    print_message(&dash);
    print_stage(&dash);
    Ok(())
}

fn run_verify() -> GridOpsResult<()> {
    let signals = demo_signals();
    let mut dash = new_dashboard();
    dash.run_baseline(&signals);
    dash.run_certainty(&signals);
    dash.select(CaseMode::Certainty, "case_AUS_0450");
    dash.verify(VerificationResult::NeedsMoreData, "");
    check(&dash)?;
    print_message(&dash);
    if let Some(task) = dash.selected_task() {
        println!(
            "  task {} -> status {:?}, result {:?}",
            task.id, task.status, task.result
        );
    }
    print_stage(&dash);
    Ok(())
}

fn run_metrics() -> GridOpsResult<()> {
    let mut dash = new_dashboard();
    dash.refresh_metrics();
    if let Some(err) = dash.metrics_error() {
        return Err(GridOpsError::Backend {
            message: err.to_string(),
        });
    }
    print_metrics(&dash);
    Ok(())
}

// ── Output helpers ────────────────────────────────────────────────────────────

/// Promote a handler's error slot to a hard failure for the CLI.
fn check(dash: &Dashboard) -> GridOpsResult<()> {
    match dash.action_error() {
        Some(err) => Err(GridOpsError::Backend {
            message: err.to_string(),
        }),
        None => Ok(()),
    }
}

fn print_stage(dash: &Dashboard) {
    let stage = dash.workflow_stage();
    println!();
    println!("Workflow step {} of 5: {}", stage.number(), stage.label());
    println!("  {}", stage.hint());
}

fn print_queue(dash: &Dashboard, mode: CaseMode) {
    println!();
    println!("{} queue:", mode.as_str());
    for case in dash.queue(mode) {
        println!(
            "  [{:>3}] {} charger {} — {} (confidence {:.0}%){}",
            case.priority_score,
            case.id,
            case.charger_id,
            case.recommended_action.as_str(),
            case.confidence * 100.0,
            if case.verification_required {
                "  [verification required]"
            } else {
                ""
            }
        );
    }
}

fn print_tasks(dash: &Dashboard) {
    println!();
    println!("verification tasks:");
    for task in dash.verification_tasks() {
        println!("  {} ({}): {}", task.id, task.owner, task.question);
    }
}

fn print_message(dash: &Dashboard) {
    if let Some(message) = dash.action_message() {
        println!();
        println!("{}", message);
    }
}

fn print_metrics(dash: &Dashboard) {
    println!();
    println!("baseline vs certainty:");
    match dash.metrics() {
        Some(metrics) => {
            println!(
                "  false dispatch reduction: {:.1}%",
                metrics.false_dispatch_reduction_pct
            );
            println!(
                "  triage time reduction:    {:.1}%",
                metrics.triage_time_reduction_pct
            );
            println!(
                "  critical catch delta:     {:.1}%",
                metrics.critical_catch_rate_delta_pct
            );
        }
        None => println!("  (metrics unavailable)"),
    }
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("GridOps — EV Charger Reliability Triage");
    println!("Canned Backend Demo");
    println!("=======================================");
    println!();
    println!("Guided workflow:");
    println!("  [1] Baseline triage ranks chargers by severity");
    println!("  [2] Certainty triage flags low-confidence cases for review");
    println!("  [3] Select a case to inspect explanation and evidence");
    println!("  [4] Dispatch a field tech or submit human verification");
    println!("  [5] Compare baseline vs certainty KPIs");
    println!();
}
