use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::goals::GoalId;
use crate::plan::{Bucket, WeekKey, WeeklyPlan};

/// Completed task keys per week.
pub type Completions = BTreeMap<WeekKey, BTreeSet<String>>;

/// Stable checklist key for one planned goal: the same goal in the same week
/// and bucket always hashes to the same key.
pub fn task_key(week: &WeekKey, bucket: Bucket, goal_id: &GoalId) -> String {
    let raw = format!("{week}|{bucket}|{goal_id}");
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("chk_{}", &digest[..16])
}

/// Marks (or clears) a task. Returns whether anything changed.
pub fn set_done(
    completions: &mut Completions,
    week: &WeekKey,
    bucket: Bucket,
    goal_id: &GoalId,
    done: bool,
) -> bool {
    let key = task_key(week, bucket, goal_id);
    if done {
        return completions.entry(week.clone()).or_default().insert(key);
    }
    let Some(set) = completions.get_mut(week) else {
        return false;
    };
    let removed = set.remove(&key);
    if set.is_empty() {
        completions.remove(week);
    }
    removed
}

pub fn is_done(
    completions: &Completions,
    week: &WeekKey,
    bucket: Bucket,
    goal_id: &GoalId,
) -> bool {
    completions
        .get(week)
        .map(|set| set.contains(&task_key(week, bucket, goal_id)))
        .unwrap_or(false)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeekProgress {
    pub week: WeekKey,
    pub total: usize,
    pub done: usize,
    pub percent: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressReport {
    pub weeks: Vec<WeekProgress>,
    pub total: usize,
    pub done: usize,
    pub percent: u32,
}

/// Completion ratio per week and for the whole month. Only tasks still in the
/// plan count, so stale check marks never push a week past 100%.
pub fn compute_progress(
    week_keys: &[WeekKey],
    plan: &WeeklyPlan,
    completions: &Completions,
) -> ProgressReport {
    let mut weeks = Vec::new();
    let mut total = 0usize;
    let mut done = 0usize;

    for week in week_keys {
        let mut week_total = 0usize;
        let mut week_done = 0usize;
        if let Some(slots) = plan.week(week) {
            for bucket in [Bucket::Focus, Bucket::Background] {
                for goal_id in slots.bucket(bucket) {
                    week_total += 1;
                    if is_done(completions, week, bucket, goal_id) {
                        week_done += 1;
                    }
                }
            }
        }
        total += week_total;
        done += week_done;
        weeks.push(WeekProgress {
            week: week.clone(),
            total: week_total,
            done: week_done,
            percent: percent(week_done, week_total),
        });
    }

    ProgressReport {
        weeks,
        total,
        done,
        percent: percent(done, total),
    }
}

fn percent(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((done * 100) / total) as u32
}

#[cfg(test)]
mod tests {
    use crate::goals::GoalId;
    use crate::plan::{Bucket, WeekKey, WeeklyPlan};
    use crate::progress::{compute_progress, is_done, set_done, task_key, Completions};

    #[test]
    fn task_keys_are_stable_and_distinct() {
        let week = WeekKey::nth(1);
        let goal = GoalId::from_label("기타 - 논문초록");
        let key = task_key(&week, Bucket::Focus, &goal);
        assert_eq!(key, task_key(&week, Bucket::Focus, &goal));
        assert!(key.starts_with("chk_"));
        assert_ne!(key, task_key(&week, Bucket::Background, &goal));
        assert_ne!(key, task_key(&WeekKey::nth(2), Bucket::Focus, &goal));
    }

    #[test]
    fn set_done_toggles_and_cleans_up() {
        let mut completions = Completions::new();
        let week = WeekKey::nth(1);
        let goal = GoalId::from_label("A");
        assert!(set_done(&mut completions, &week, Bucket::Focus, &goal, true));
        assert!(!set_done(&mut completions, &week, Bucket::Focus, &goal, true));
        assert!(is_done(&completions, &week, Bucket::Focus, &goal));
        assert!(set_done(&mut completions, &week, Bucket::Focus, &goal, false));
        assert!(completions.is_empty());
        assert!(!set_done(&mut completions, &week, Bucket::Focus, &goal, false));
    }

    #[test]
    fn progress_floors_percentages_and_ignores_stale_marks() {
        let keys = vec![WeekKey::nth(1), WeekKey::nth(2)];
        let a = GoalId::from_label("A");
        let b = GoalId::from_label("B");
        let c = GoalId::from_label("C");
        let mut plan = WeeklyPlan::new();
        plan.assign(&keys[0], vec![a.clone()], vec![b.clone(), c.clone()]);

        let mut completions = Completions::new();
        set_done(&mut completions, &keys[0], Bucket::Focus, &a, true);
        set_done(&mut completions, &keys[0], Bucket::Focus, &b, true);
        set_done(&mut completions, &keys[1], Bucket::Focus, &a, true);

        let report = compute_progress(&keys, &plan, &completions);
        assert_eq!(report.weeks[0].total, 3);
        assert_eq!(report.weeks[0].done, 1);
        assert_eq!(report.weeks[0].percent, 33);
        assert_eq!(report.weeks[1].total, 0);
        assert_eq!(report.weeks[1].percent, 0);
        assert_eq!((report.total, report.done, report.percent), (3, 1, 33));
    }
}
