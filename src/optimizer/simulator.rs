use tracing::debug;

use crate::goals::{GoalCatalog, GoalId};
use crate::optimizer::{ActionKind, AppliedEntry, SimulationResult, SuggestedAction};
use crate::plan::{WeekKey, WeeklyPlan, FOCUS_CAP};

/// Applies `actions` to a copy of `base` and records what each one did.
///
/// A promotion into a full week evicts from the front of the focus list, so
/// the goal just promoted always survives.
pub fn simulate_plan(
    base: &WeeklyPlan,
    actions: &[SuggestedAction],
    catalog: &GoalCatalog,
) -> SimulationResult {
    let mut virtual_plan = base.clone();
    let mut applied_log = Vec::new();

    for action in actions {
        match action {
            SuggestedAction::Add { week, goal_id } => {
                apply_add(&mut virtual_plan, week, goal_id, catalog, &mut applied_log);
            }
            SuggestedAction::Promote { week, goal_id } => {
                apply_promote(&mut virtual_plan, week, goal_id, catalog, &mut applied_log);
            }
        }
    }

    debug!(
        actions = actions.len(),
        log_entries = applied_log.len(),
        "simulated plan"
    );

    SimulationResult {
        virtual_plan,
        applied_log,
    }
}

fn apply_add(
    plan: &mut WeeklyPlan,
    week: &WeekKey,
    goal_id: &GoalId,
    catalog: &GoalCatalog,
    log: &mut Vec<AppliedEntry>,
) {
    let slots = plan.week_mut(week);
    let note = if slots.focus.contains(goal_id) {
        Some("already in focus")
    } else if !slots.has_focus_room() {
        Some("focus slots full")
    } else {
        slots.focus.push(goal_id.clone());
        None
    };

    match note {
        None => log.push(entry(ActionKind::Add, week, goal_id, catalog, "filled empty focus slot")),
        Some(reason) => log.push(entry(ActionKind::Skip, week, goal_id, catalog, reason)),
    }
}

fn apply_promote(
    plan: &mut WeeklyPlan,
    week: &WeekKey,
    goal_id: &GoalId,
    catalog: &GoalCatalog,
    log: &mut Vec<AppliedEntry>,
) {
    let slots = plan.week_mut(week);
    slots.background.retain(|id| id != goal_id);

    if slots.focus.contains(goal_id) {
        log.push(entry(
            ActionKind::Promote,
            week,
            goal_id,
            catalog,
            "already in focus, removed from background",
        ));
        return;
    }

    slots.focus.push(goal_id.clone());
    while slots.focus.len() > FOCUS_CAP {
        let evicted = slots.focus.remove(0);
        log.push(entry(
            ActionKind::Drop,
            week,
            &evicted,
            catalog,
            "evicted to make room for promotion",
        ));
    }
    log.push(entry(
        ActionKind::Promote,
        week,
        goal_id,
        catalog,
        "moved from background to focus",
    ));
}

fn entry(
    kind: ActionKind,
    week: &WeekKey,
    goal_id: &GoalId,
    catalog: &GoalCatalog,
    note: &str,
) -> AppliedEntry {
    AppliedEntry {
        action_kind: kind,
        week: week.clone(),
        goal_label: catalog.label_of(goal_id).to_string(),
        note: note.to_string(),
    }
}
