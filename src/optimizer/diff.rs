use crate::goals::GoalId;
use crate::optimizer::WeekDiff;
use crate::plan::{WeekKey, WeeklyPlan};

/// Per-week focus set difference between `before` and `after`. Weeks with no
/// change are omitted.
pub fn diff_plans(
    week_keys: &[WeekKey],
    before: &WeeklyPlan,
    after: &WeeklyPlan,
) -> Vec<WeekDiff> {
    let empty: Vec<GoalId> = Vec::new();
    let mut diffs = Vec::new();

    for week in week_keys {
        let old = before.week(week).map(|w| &w.focus).unwrap_or(&empty);
        let new = after.week(week).map(|w| &w.focus).unwrap_or(&empty);
        let added: Vec<GoalId> = new.iter().filter(|id| !old.contains(id)).cloned().collect();
        let removed: Vec<GoalId> = old.iter().filter(|id| !new.contains(id)).cloned().collect();
        if added.is_empty() && removed.is_empty() {
            continue;
        }
        diffs.push(WeekDiff {
            week: week.clone(),
            added,
            removed,
        });
    }

    diffs
}
