use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::coverage::CoverageResult;
use crate::goals::GoalCatalog;
use crate::optimizer::{ActionKind, SimulationResult, SuggestedAction, WeekDiff};
use crate::output::{join_labels, week_label};
use crate::plan::{WeekCalendar, WeekKey, WeeklyPlan};
use crate::progress::ProgressReport;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn render_catalog_table(catalog: &GoalCatalog) -> String {
    let mut table = new_table();
    table.set_header(vec!["#", "Kind", "Section", "Item", "Id"]);
    for (idx, goal) in catalog.iter().enumerate() {
        let kind_cell = if goal.is_max() {
            Cell::new("MAX").fg(Color::Yellow)
        } else {
            Cell::new("min")
        };
        table.add_row(Row::from(vec![
            Cell::new(idx + 1),
            kind_cell,
            Cell::new(&goal.section),
            Cell::new(&goal.item),
            Cell::new(goal.id.as_str()),
        ]));
    }
    table.to_string()
}

pub fn render_weeks_table(calendar: &WeekCalendar) -> String {
    let mut table = new_table();
    table.set_header(vec!["Key", "Label", "Start", "End"]);
    for week in &calendar.weeks {
        table.add_row(vec![
            week.key.to_string(),
            week.label.clone(),
            week.start.to_string(),
            week.end.to_string(),
        ]);
    }
    table.to_string()
}

pub fn render_plan_table(
    week_keys: &[WeekKey],
    plan: &WeeklyPlan,
    catalog: &GoalCatalog,
    calendar: Option<&WeekCalendar>,
) -> String {
    let mut table = new_table();
    table.set_header(vec!["Week", "Focus", "Background"]);
    for week in week_keys {
        let (focus, background) = plan
            .week(week)
            .map(|slots| {
                (
                    join_labels(catalog, &slots.focus),
                    join_labels(catalog, &slots.background),
                )
            })
            .unwrap_or_default();
        table.add_row(vec![
            week_label(calendar, week),
            or_dash(focus),
            or_dash(background),
        ]);
    }
    table.to_string()
}

pub fn render_coverage_table(result: &CoverageResult) -> String {
    let mut table = new_table();
    table.set_header(vec!["Goal", "Kind", "Focus", "Background", "Weeks", "Status"]);
    for goal in &result.goals {
        let status = if !goal.kind.is_max() {
            Cell::new("-")
        } else if goal.is_focused() {
            Cell::new("COVERED").fg(Color::Green)
        } else {
            Cell::new("MISSING").fg(Color::Red)
        };
        let weeks = goal
            .weeks
            .iter()
            .map(WeekKey::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(Row::from(vec![
            Cell::new(&goal.label),
            Cell::new(goal.kind),
            Cell::new(goal.focus),
            Cell::new(goal.background),
            Cell::new(or_dash(weeks)),
            status,
        ]));
    }

    let mut out = table.to_string();
    out.push_str(&format!(
        "\nFocus slots: {} for {} must-do goals ({}), {} placed\nCovered: {}  Missing: {}",
        result.total_focus_slots,
        result.num_max_goals,
        if result.capacity_ok {
            "capacity ok"
        } else {
            "over capacity"
        },
        result.total_focus_placements(),
        result.covered_focus.len(),
        result.missing_focus.len(),
    ));
    out
}

pub fn render_actions_table(
    actions: &[SuggestedAction],
    catalog: &GoalCatalog,
    calendar: Option<&WeekCalendar>,
) -> String {
    let mut table = new_table();
    table.set_header(vec!["#", "Action", "Week", "Goal"]);
    for (idx, action) in actions.iter().enumerate() {
        let action_cell = match action.kind() {
            ActionKind::Add => Cell::new("ADD").fg(Color::Green),
            _ => Cell::new("PROMOTE").fg(Color::Cyan),
        };
        table.add_row(Row::from(vec![
            Cell::new(idx + 1),
            action_cell,
            Cell::new(week_label(calendar, action.week())),
            Cell::new(catalog.label_of(action.goal_id())),
        ]));
    }
    table.to_string()
}

pub fn render_simulation_table(
    result: &SimulationResult,
    diffs: &[WeekDiff],
    catalog: &GoalCatalog,
    calendar: Option<&WeekCalendar>,
) -> String {
    let mut log = new_table();
    log.set_header(vec!["Action", "Week", "Goal", "Note"]);
    for entry in &result.applied_log {
        let kind_cell = match entry.action_kind {
            ActionKind::Add => Cell::new("ADD").fg(Color::Green),
            ActionKind::Promote => Cell::new("PROMOTE").fg(Color::Cyan),
            ActionKind::Drop => Cell::new("DROP").fg(Color::Red),
            ActionKind::Skip => Cell::new("SKIP").fg(Color::DarkGrey),
        };
        log.add_row(Row::from(vec![
            kind_cell,
            Cell::new(week_label(calendar, &entry.week)),
            Cell::new(&entry.goal_label),
            Cell::new(&entry.note),
        ]));
    }

    let mut diff = new_table();
    diff.set_header(vec!["Week", "Focus added", "Focus removed"]);
    for item in diffs {
        diff.add_row(vec![
            week_label(calendar, &item.week),
            or_dash(join_labels(catalog, &item.added)),
            or_dash(join_labels(catalog, &item.removed)),
        ]);
    }

    format!("{log}\n{diff}")
}

pub fn render_progress_table(report: &ProgressReport, calendar: Option<&WeekCalendar>) -> String {
    let mut table = new_table();
    table.set_header(vec!["Week", "Done", "Total", "Progress"]);
    for week in &report.weeks {
        table.add_row(vec![
            week_label(calendar, &week.week),
            week.done.to_string(),
            week.total.to_string(),
            format!("{}%", week.percent),
        ]);
    }
    format!(
        "{table}\nMonth: {}/{} done ({}%)",
        report.done, report.total, report.percent
    )
}

fn or_dash(value: String) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value
    }
}
