use std::collections::BTreeMap;

use tracing::debug;

use crate::coverage::{CoverageResult, GoalCoverage, Placement};
use crate::goals::{GoalCatalog, GoalId};
use crate::plan::{WeekKey, WeeklyPlan, FOCUS_CAP};

/// Computes capacity, per-goal placement and remediation candidates.
///
/// Empty focus slots are filled first, one missing goal per free week. Only
/// the goals left over are matched against full weeks whose background already
/// holds them. A full week takes at most `FOCUS_CAP` promotions per pass so a
/// later promotion never evicts an earlier one. Ids absent from the catalog are
/// ignored throughout.
pub fn analyze_coverage(
    week_keys: &[WeekKey],
    plan: &WeeklyPlan,
    catalog: &GoalCatalog,
) -> CoverageResult {
    let mut goals: Vec<GoalCoverage> = catalog.iter().map(GoalCoverage::empty).collect();

    for week in week_keys {
        let Some(slots) = plan.week(week) else {
            continue;
        };
        for id in &slots.focus {
            if let Some(idx) = catalog.position(id) {
                goals[idx].focus += 1;
                push_week(&mut goals[idx].weeks, week);
            }
        }
        for id in &slots.background {
            if let Some(idx) = catalog.position(id) {
                goals[idx].background += 1;
                push_week(&mut goals[idx].weeks, week);
            }
        }
    }

    let num_max_goals = catalog.max_goals().count();
    let total_focus_slots = week_keys.len() * FOCUS_CAP;
    let capacity_ok = total_focus_slots >= num_max_goals;

    let mut covered_focus = Vec::new();
    let mut missing_focus = Vec::new();
    for coverage in goals.iter().filter(|g| g.kind.is_max()) {
        if coverage.is_focused() {
            covered_focus.push(coverage.goal_id.clone());
        } else {
            missing_focus.push(coverage.goal_id.clone());
        }
    }

    let free_weeks = week_keys
        .iter()
        .filter(|week| plan.focus_len(week) < FOCUS_CAP);
    let suggestions: Vec<Placement> = missing_focus
        .iter()
        .zip(free_weeks)
        .map(|(goal, week)| Placement::new(week.clone(), goal.clone()))
        .collect();

    let remaining = &missing_focus[suggestions.len()..];
    let swaps = promotion_swaps(week_keys, plan, remaining);

    debug!(
        weeks = week_keys.len(),
        max_goals = num_max_goals,
        missing = missing_focus.len(),
        suggestions = suggestions.len(),
        swaps = swaps.len(),
        capacity_ok,
        "coverage analyzed"
    );

    CoverageResult {
        goals,
        week_count: week_keys.len(),
        total_focus_slots,
        num_max_goals,
        capacity_ok,
        covered_focus,
        missing_focus,
        suggestions,
        swaps,
    }
}

fn promotion_swaps(
    week_keys: &[WeekKey],
    plan: &WeeklyPlan,
    remaining: &[GoalId],
) -> Vec<Placement> {
    let crowded: Vec<&WeekKey> = week_keys
        .iter()
        .filter(|week| plan.focus_len(week) >= FOCUS_CAP)
        .collect();
    let mut taken: BTreeMap<&WeekKey, usize> = BTreeMap::new();
    let mut swaps = Vec::new();

    for goal in remaining {
        for week in &crowded {
            let used = taken.get(*week).copied().unwrap_or(0);
            if used >= FOCUS_CAP {
                continue;
            }
            let in_background = plan
                .week(week)
                .map(|slots| slots.background.contains(goal))
                .unwrap_or(false);
            if in_background {
                swaps.push(Placement::new((*week).clone(), goal.clone()));
                taken.insert(*week, used + 1);
                break;
            }
        }
    }

    swaps
}

fn push_week(weeks: &mut Vec<WeekKey>, week: &WeekKey) {
    if !weeks.contains(week) {
        weeks.push(week.clone());
    }
}
