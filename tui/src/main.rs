//! GridOps — interactive Ratatui operations dashboard
//!
//! Layout:
//!   ┌─── header ──────────────────────────────────────────────────────────┐
//!   │  GridOps    Step 1 of 5: Run baseline triage      (1)(2)(3)(4)(5)   │
//!   ├─── KPI cards ───────────────────────────────────────────────────────┤
//!   │  False Dispatch ↓    │  Triage Time ↓    │  Critical Catch Δ        │
//!   ├─── left panel ──────────────────┬─── right panel ───────────────────┤
//!   │  Baseline Queue                 │  Certainty Queue                  │
//!   ├─── map ─────────────────────────┴─── case detail ───────────────────┤
//!   │  charger pins                   │  selected case + verification     │
//!   ├─────────────────────────────────────────────────────────────────────┤
//!   │  action settings, messages, errors                                  │
//!   ├─────────────────────────────────────────────────────────────────────┤
//!   │  footer (key bindings)                                              │
//!   └─────────────────────────────────────────────────────────────────────┘

use std::{io, path::PathBuf, time::Duration};

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};

use gridops_client::{ApiClient, ClientConfig};
use gridops_contracts::{
    case::{CaseMode, PriorityTier},
    error::GridOpsResult,
    signal::Signal,
    task::{VerificationResult, WorkOrderState},
};
use gridops_core::{geo, traits::TriageApi, Dashboard};
use gridops_ref_demo::{charger_locations, demo_signals, CannedBackend};

// ── CLI ───────────────────────────────────────────────────────────────────────

/// GridOps operations dashboard.
#[derive(Parser)]
#[command(
    name = "gridops-tui",
    about = "Terminal dashboard for EV charger reliability triage"
)]
struct Cli {
    /// Path to a TOML client config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend base URL; overrides the config file.
    #[arg(long)]
    api_base: Option<String>,

    /// Use the canned in-memory backend instead of HTTP.
    #[arg(long)]
    offline: bool,
}

// ── App state ─────────────────────────────────────────────────────────────────

struct App {
    dash: Dashboard,
    /// Signals submitted on every triage run (the demo fixture).
    signals: Vec<Signal>,
    /// Charger locations for the map, deduplicated from the signals.
    locations: Vec<geo::LocationPoint>,

    /// Which queue panel owns the selection keys.
    focus: CaseMode,

    // Dispatch form state.
    dispatch_hours: f64,
    dispatch_state: WorkOrderState,

    // Verification form state.
    verify_result: VerificationResult,
    verify_notes: String,
    editing_notes: bool,

    /// Cursor into the map pin cycle driven by [p].
    map_cursor: usize,
}

impl App {
    fn new(dash: Dashboard) -> Self {
        let signals = demo_signals();
        let locations = charger_locations(&signals);
        Self {
            dash,
            signals,
            locations,
            focus: CaseMode::Baseline,
            dispatch_hours: 8.0,
            dispatch_state: WorkOrderState::Created,
            verify_result: VerificationResult::ConfirmedIssue,
            verify_notes: String::new(),
            editing_notes: false,
            map_cursor: 0,
        }
    }

    /// Move the selection within the focused queue, wrapping at the ends.
    fn move_selection(&mut self, delta: i32) {
        let queue = self.dash.queue(self.focus);
        if queue.is_empty() {
            return;
        }
        let current = self
            .dash
            .selection()
            .filter(|sel| sel.mode == self.focus)
            .and_then(|sel| queue.iter().position(|case| case.id == sel.case_id));
        let next = match current {
            Some(index) => (index as i32 + delta).rem_euclid(queue.len() as i32) as usize,
            None => 0,
        };
        let case_id = queue[next].id.clone();
        self.dash.select(self.focus, case_id);
    }

    /// Select the next map pin.
    ///
    /// Pins always select in baseline mode, mirroring the original page's
    /// click handler, regardless of which queue the operator was focused on.
    fn select_next_pin(&mut self) {
        let pins = map_pins(&self.dash, &self.locations);
        if pins.is_empty() {
            return;
        }
        let case_id = pins[self.map_cursor % pins.len()].case_id.clone();
        self.map_cursor = (self.map_cursor + 1) % pins.len();
        self.dash.select(CaseMode::Baseline, case_id);
    }
}

// ── Map pins ──────────────────────────────────────────────────────────────────

/// One projected pin, joined from the baseline queue and the location index.
struct MapPin {
    case_id: String,
    tier: PriorityTier,
    position: geo::PinPosition,
}

/// Build pins for every baseline-queue case with a known charger location.
fn map_pins(dash: &Dashboard, locations: &[geo::LocationPoint]) -> Vec<MapPin> {
    let Some(bounds) = geo::normalize_bounds(locations) else {
        return Vec::new();
    };

    dash.queue(CaseMode::Baseline)
        .iter()
        .filter_map(|case| {
            let location = locations
                .iter()
                .find(|point| point.charger_id == case.charger_id)?;
            Some(MapPin {
                case_id: case.id.clone(),
                tier: case.priority_tier(),
                position: geo::project(location.lat, location.lon, &bounds),
            })
        })
        .collect()
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn ui(f: &mut Frame, app: &App) {
    let full = f.area();

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header + workflow indicator
            Constraint::Length(3), // KPI cards
            Constraint::Min(8),    // queues
            Constraint::Length(11), // map + detail
            Constraint::Length(4), // action settings + messages
            Constraint::Length(3), // footer
        ])
        .split(full);

    render_header(f, outer[0], app);
    render_kpis(f, outer[1], app);

    let queues = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(outer[2]);
    render_queue(f, queues[0], app, CaseMode::Baseline, "Baseline Queue");
    render_queue(f, queues[1], app, CaseMode::Certainty, "Certainty Queue");

    let lower = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(outer[3]);
    render_map(f, lower[0], app);
    render_detail(f, lower[1], app);

    render_status(f, outer[4], app);
    render_footer(f, outer[5], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let stage = app.dash.workflow_stage();

    let mut spans: Vec<Span> = vec![
        Span::styled(
            "GridOps  ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("Step {} of 5: {}  ", stage.number(), stage.label()),
            Style::default().fg(Color::White),
        ),
    ];
    for step in 1..=5u8 {
        let style = if step == stage.number() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if step < stage.number() {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("({})", step), style));
    }
    spans.push(Span::styled(
        format!("  {}", stage.hint()),
        Style::default().fg(Color::Gray),
    ));

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(header, area);
}

fn render_kpis(f: &mut Frame, area: Rect, app: &App) {
    let metrics = app.dash.metrics();
    let loading = app.dash.loading().metrics;

    let cards = [
        (
            "False Dispatch ↓",
            metrics.map(|m| m.false_dispatch_reduction_pct),
        ),
        (
            "Triage Time ↓",
            metrics.map(|m| m.triage_time_reduction_pct),
        ),
        (
            "Critical Catch Δ",
            metrics.map(|m| m.critical_catch_rate_delta_pct),
        ),
    ];

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(area);

    for (chunk, (label, value)) in chunks.iter().zip(cards) {
        let rendered = if loading {
            "...".to_string()
        } else {
            format_percent(value)
        };
        let line = Line::from(vec![
            Span::styled(format!(" {}: ", label), Style::default().fg(Color::Gray)),
            Span::styled(
                rendered,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]);
        let card = Paragraph::new(line).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(card, *chunk);
    }
}

fn render_queue(f: &mut Frame, area: Rect, app: &App, mode: CaseMode, title: &str) {
    let loading = match mode {
        CaseMode::Baseline => app.dash.loading().baseline,
        CaseMode::Certainty => app.dash.loading().certainty,
    };
    let queue = app.dash.queue(mode);
    let selected_id = app
        .dash
        .selection()
        .filter(|sel| sel.mode == mode)
        .map(|sel| sel.case_id.clone());

    let mut items: Vec<ListItem> = Vec::new();
    if queue.is_empty() {
        let empty = if loading {
            "Loading queue..."
        } else {
            "No cases yet. Load this queue to populate it."
        };
        items.push(ListItem::new(Span::styled(
            format!("  {}", empty),
            Style::default().fg(Color::DarkGray),
        )));
    }

    for case in &queue {
        let is_selected = selected_id.as_deref() == Some(case.id.as_str());
        let marker = if is_selected { "▸ " } else { "  " };
        let title_style = if is_selected {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        let head = Line::from(vec![
            Span::raw(marker),
            Span::styled(case.id.clone(), title_style),
            Span::styled(
                format!("  Priority {}", case.priority_score),
                Style::default()
                    .fg(tier_color(case.priority_tier()))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  Confidence {:.0}%", case.confidence * 100.0),
                Style::default().fg(Color::Gray),
            ),
        ]);

        let mut badges: Vec<Span> = vec![
            Span::raw("    "),
            Span::styled(
                format!("charger {}", case.charger_id),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("  {}", case.recommended_action.as_str()),
                Style::default().fg(Color::Gray),
            ),
        ];
        if case.verification_required {
            badges.push(Span::styled(
                "  verification required",
                Style::default().fg(Color::Yellow),
            ));
        }
        if let Some(status) = app.dash.case_status(&case.id) {
            if status.dispatched {
                badges.push(Span::styled("  Dispatched", Style::default().fg(Color::Cyan)));
            }
            if let Some(result) = status.verification_result {
                let (label, color) = match result {
                    VerificationResult::ConfirmedIssue => ("Verified", Color::Green),
                    VerificationResult::FalseAlarm => ("False alarm", Color::Red),
                    VerificationResult::NeedsMoreData => ("Needs more data", Color::Yellow),
                };
                badges.push(Span::styled(format!("  {}", label), Style::default().fg(color)));
            }
        }

        items.push(ListItem::new(vec![head, Line::from(badges)]));
    }

    let focused = app.focus == mode;
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };
    let count_label = if loading {
        "loading...".to_string()
    } else {
        format!("{} cases", queue.len())
    };
    let block = Block::default()
        .title(format!(" {} — {} ", title, count_label))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    f.render_widget(List::new(items).block(block), area);
}

fn render_map(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Case Map — baseline queue view ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    if app.locations.is_empty() {
        let p = Paragraph::new(Span::styled(
            "  No location data available yet.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        f.render_widget(p, area);
        return;
    }

    let pins = map_pins(&app.dash, &app.locations);
    let selected_id = app.dash.selection().map(|sel| sel.case_id.clone());

    // One legend row at the bottom; the rest is pin canvas.
    let canvas_width = area.width.saturating_sub(2) as usize;
    let canvas_height = area.height.saturating_sub(3) as usize;

    let mut grid: Vec<Vec<Option<(char, Style)>>> = vec![vec![None; canvas_width]; canvas_height];
    for pin in &pins {
        if canvas_width == 0 || canvas_height == 0 {
            break;
        }
        let col = (pin.position.x / 100.0 * (canvas_width - 1) as f64).round() as usize;
        let row = (pin.position.y / 100.0 * (canvas_height - 1) as f64).round() as usize;

        let is_selected = selected_id.as_deref() == Some(pin.case_id.as_str());
        let glyph = if is_selected { '◉' } else { '●' };
        let style = Style::default()
            .fg(tier_color(pin.tier))
            .add_modifier(if is_selected { Modifier::BOLD } else { Modifier::empty() });
        grid[row][col] = Some((glyph, style));
    }

    let mut lines: Vec<Line> = Vec::with_capacity(canvas_height + 1);
    for row in &grid {
        let mut spans: Vec<Span> = Vec::new();
        let mut blanks = String::new();
        for cell in row {
            match cell {
                Some((glyph, style)) => {
                    if !blanks.is_empty() {
                        spans.push(Span::raw(std::mem::take(&mut blanks)));
                    }
                    spans.push(Span::styled(glyph.to_string(), *style));
                }
                None => blanks.push(' '),
            }
        }
        if !blanks.is_empty() {
            spans.push(Span::raw(blanks));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(vec![
        Span::styled(" ● ", Style::default().fg(Color::Red)),
        Span::styled("high  ", Style::default().fg(Color::Gray)),
        Span::styled("● ", Style::default().fg(Color::Yellow)),
        Span::styled("medium  ", Style::default().fg(Color::Gray)),
        Span::styled("● ", Style::default().fg(Color::Green)),
        Span::styled("low  ", Style::default().fg(Color::Gray)),
        Span::styled("[p] ", Style::default().fg(Color::Cyan)),
        Span::styled("cycle pins (opens baseline)", Style::default().fg(Color::Gray)),
    ]));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_detail(f: &mut Frame, area: Rect, app: &App) {
    let mode_label = app
        .dash
        .selection()
        .map(|sel| sel.mode.as_str())
        .unwrap_or("none");
    let block = Block::default()
        .title(format!(" Case Detail ({}) ", mode_label))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let Some(case) = app.dash.selected_case() else {
        let p = Paragraph::new(Span::styled(
            "  Select a case from either queue to view details.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        f.render_widget(p, area);
        return;
    };

    let label_style = Style::default().fg(Color::Gray);
    let mut lines: Vec<Line> = vec![
        Line::from(vec![
            Span::styled("  Case:        ", label_style),
            Span::raw(case.id.clone()),
            Span::styled("   Charger: ", label_style),
            Span::raw(case.charger_id.clone()),
        ]),
        Line::from(vec![
            Span::styled("  Priority:    ", label_style),
            Span::styled(
                case.priority_score.to_string(),
                Style::default()
                    .fg(tier_color(case.priority_tier()))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("   Confidence: ", label_style),
            Span::raw(format!("{:.0}%", case.confidence * 100.0)),
            Span::styled("   SLA: ", label_style),
            Span::raw(format!("{}h", case.sla_hours)),
        ]),
        Line::from(vec![
            Span::styled("  Root cause:  ", label_style),
            Span::raw(case.root_cause_tag.as_str()),
            Span::styled("   Action: ", label_style),
            Span::raw(case.recommended_action.as_str()),
            Span::styled("   Grid stress: ", label_style),
            Span::raw(case.grid_stress_level.as_str()),
        ]),
        Line::from(vec![
            Span::styled("  Explanation: ", label_style),
            Span::styled(truncate(&case.explanation, 70), Style::default().fg(Color::White)),
        ]),
    ];

    let uncertainty = if case.uncertainty_reasons.is_empty() {
        "None".to_string()
    } else {
        case.uncertainty_reasons.join("; ")
    };
    lines.push(Line::from(vec![
        Span::styled("  Uncertainty: ", label_style),
        Span::raw(truncate(&uncertainty, 70)),
    ]));

    let evidence = if case.evidence_ids.is_empty() {
        "None".to_string()
    } else {
        case.evidence_ids.join(", ")
    };
    lines.push(Line::from(vec![
        Span::styled("  Evidence:    ", label_style),
        Span::raw(truncate(&evidence, 70)),
    ]));

    match app.dash.selected_task() {
        Some(task) => {
            lines.push(Line::from(vec![
                Span::styled("  Task:        ", label_style),
                Span::raw(truncate(&task.question, 70)),
            ]));
            let result_label = task
                .result
                .map(|result| result.as_str().to_string())
                .unwrap_or_else(|| "pending".to_string());
            lines.push(Line::from(vec![
                Span::styled("  Owner: ", label_style),
                Span::raw(task.owner.clone()),
                Span::styled("   Status: ", label_style),
                Span::raw(format!("{:?}", task.status).to_lowercase()),
                Span::styled("   Result: ", label_style),
                Span::raw(result_label),
            ]));
        }
        None => {
            let note = if case.verification_required {
                "Verification required but no task returned yet."
            } else {
                "Verification not required"
            };
            lines.push(Line::from(vec![
                Span::styled("  Verification: ", label_style),
                Span::styled(note, Style::default().fg(Color::DarkGray)),
            ]));
        }
    }

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn render_status(f: &mut Frame, area: Rect, app: &App) {
    let loading = app.dash.loading();
    let mut lines: Vec<Line> = Vec::new();

    let notes_display = if app.editing_notes {
        format!("{}▏", app.verify_notes)
    } else if app.verify_notes.trim().is_empty() {
        "(none)".to_string()
    } else {
        app.verify_notes.clone()
    };
    lines.push(Line::from(vec![
        Span::styled("  Dispatch: ", Style::default().fg(Color::Gray)),
        Span::raw(format!(
            "due in {}h, state {}",
            app.dispatch_hours,
            app.dispatch_state.as_str()
        )),
        Span::styled("   Verify: ", Style::default().fg(Color::Gray)),
        Span::raw(format!("{}, notes: ", app.verify_result.as_str())),
        Span::styled(
            truncate(&notes_display, 30),
            if app.editing_notes {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            },
        ),
    ]));

    if loading.dispatch || loading.verify {
        lines.push(Line::from(Span::styled(
            "  Working...",
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(error) = app.dash.action_error() {
        lines.push(Line::from(Span::styled(
            format!("  Action error: {}", truncate(error, 90)),
            Style::default().fg(Color::Red),
        )));
    } else if let Some(message) = app.dash.action_message() {
        lines.push(Line::from(Span::styled(
            format!("  {}", truncate(message, 90)),
            Style::default().fg(Color::Green),
        )));
    }

    if let Some(error) = app.dash.metrics_error() {
        lines.push(Line::from(Span::styled(
            format!("  Metrics error: {}", truncate(error, 90)),
            Style::default().fg(Color::Yellow),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let has_selection = app.dash.selected_case().is_some();
    let action_style = if has_selection {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let spans: Vec<Span> = vec![
        Span::styled(" [b] ", Style::default().fg(Color::Cyan)),
        Span::raw("baseline  "),
        Span::styled("[c] ", Style::default().fg(Color::Cyan)),
        Span::raw("certainty  "),
        Span::styled("[Tab] ", Style::default().fg(Color::Cyan)),
        Span::raw("focus  "),
        Span::styled("[↑/↓] ", Style::default().fg(Color::Cyan)),
        Span::raw("select  "),
        Span::styled("[d] ", action_style),
        Span::raw("dispatch  "),
        Span::styled("[v] ", action_style),
        Span::raw("verify  "),
        Span::styled("[[/]] ", Style::default().fg(Color::Cyan)),
        Span::raw("hours  "),
        Span::styled("[s] ", Style::default().fg(Color::Cyan)),
        Span::raw("state  "),
        Span::styled("[r] ", Style::default().fg(Color::Cyan)),
        Span::raw("result  "),
        Span::styled("[n] ", Style::default().fg(Color::Cyan)),
        Span::raw("notes  "),
        Span::styled("[m] ", Style::default().fg(Color::Cyan)),
        Span::raw("metrics  "),
        Span::styled("[q] ", Style::default().fg(Color::Cyan)),
        Span::raw("quit"),
    ];

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(footer, area);
}

// ── Utility helpers ───────────────────────────────────────────────────────────

/// Row/pin color for a priority tier.
fn tier_color(tier: PriorityTier) -> Color {
    match tier {
        PriorityTier::High => Color::Red,
        PriorityTier::Medium => Color::Yellow,
        PriorityTier::Low => Color::Green,
    }
}

/// Format a KPI value to one decimal with a percent sign, or "--".
fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if !v.is_nan() => format!("{:.1}%", v),
        _ => "--".to_string(),
    }
}

/// Truncate a string to at most `max` chars, appending "…" if truncated.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

fn next_work_order_state(state: WorkOrderState) -> WorkOrderState {
    match state {
        WorkOrderState::Created => WorkOrderState::InProgress,
        WorkOrderState::InProgress => WorkOrderState::Done,
        WorkOrderState::Done => WorkOrderState::Created,
    }
}

fn next_verify_result(result: VerificationResult) -> VerificationResult {
    match result {
        VerificationResult::ConfirmedIssue => VerificationResult::FalseAlarm,
        VerificationResult::FalseAlarm => VerificationResult::NeedsMoreData,
        VerificationResult::NeedsMoreData => VerificationResult::ConfirmedIssue,
    }
}

// ── Terminal setup / teardown ─────────────────────────────────────────────────

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

// ── Dashboard construction ────────────────────────────────────────────────────

fn build_dashboard(cli: &Cli) -> GridOpsResult<Dashboard> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };
    if let Some(api_base) = &cli.api_base {
        config.api_base_url = api_base.clone();
    }

    let api: Box<dyn TriageApi> = if cli.offline {
        Box::new(CannedBackend::new())
    } else {
        Box::new(ApiClient::from_config(&config)?)
    };

    Ok(Dashboard::new(api).with_verification_owner(config.verification_owner.clone()))
}

// ── Main event loop ───────────────────────────────────────────────────────────

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let dash = match build_dashboard(&cli) {
        Ok(dash) => dash,
        Err(e) => {
            eprintln!("gridops-tui: {}", e);
            std::process::exit(1);
        }
    };

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let mut app = App::new(dash);

    // Page-load effect: metrics are fetched once before the first frame.
    app.dash.refresh_metrics();

    loop {
        terminal.draw(|f| ui(f, &app))?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        // Notes input mode captures everything except Enter/Esc.
        if app.editing_notes {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => app.editing_notes = false,
                KeyCode::Backspace => {
                    app.verify_notes.pop();
                }
                KeyCode::Char(c) => app.verify_notes.push(c),
                _ => {}
            }
            continue;
        }

        match key.code {
            // Quit.
            KeyCode::Char('q') | KeyCode::Char('Q') => break,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,

            // Queue loads.
            KeyCode::Char('b') | KeyCode::Char('B') => {
                let signals = app.signals.clone();
                app.dash.run_baseline(&signals);
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                let signals = app.signals.clone();
                app.dash.run_certainty(&signals);
            }

            // Focus and selection.
            KeyCode::Tab => {
                app.focus = match app.focus {
                    CaseMode::Baseline => CaseMode::Certainty,
                    CaseMode::Certainty => CaseMode::Baseline,
                };
            }
            KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
            KeyCode::Char('p') | KeyCode::Char('P') => app.select_next_pin(),
            KeyCode::Esc => app.dash.clear_selection(),

            // Dispatch form.
            KeyCode::Char('[') => {
                app.dispatch_hours = (app.dispatch_hours - 1.0).max(1.0);
            }
            KeyCode::Char(']') => {
                app.dispatch_hours += 1.0;
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                app.dispatch_state = next_work_order_state(app.dispatch_state);
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                if !app.dash.loading().dispatch {
                    app.dash.dispatch(app.dispatch_hours, app.dispatch_state);
                }
            }

            // Verification form.
            KeyCode::Char('r') | KeyCode::Char('R') => {
                app.verify_result = next_verify_result(app.verify_result);
            }
            KeyCode::Char('n') | KeyCode::Char('N') => app.editing_notes = true,
            KeyCode::Char('v') | KeyCode::Char('V') => {
                if !app.dash.loading().verify {
                    let notes = app.verify_notes.clone();
                    app.dash.verify(app.verify_result, &notes);
                    app.verify_notes.clear();
                }
            }

            // Metrics.
            KeyCode::Char('m') | KeyCode::Char('M') => app.dash.refresh_metrics(),

            _ => {}
        }
    }

    restore_terminal(&mut terminal)?;
    Ok(())
}
