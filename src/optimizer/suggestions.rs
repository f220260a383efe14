use crate::coverage::CoverageResult;
use crate::optimizer::SuggestedAction;

/// Slot-fill suggestions become `Add`, background swaps become `Promote`.
pub fn summarize_actions(result: &CoverageResult) -> Vec<SuggestedAction> {
    let adds = result.suggestions.iter().map(|p| SuggestedAction::Add {
        week: p.week.clone(),
        goal_id: p.goal_id.clone(),
    });
    let promotes = result.swaps.iter().map(|p| SuggestedAction::Promote {
        week: p.week.clone(),
        goal_id: p.goal_id.clone(),
    });
    adds.chain(promotes).collect()
}

#[cfg(test)]
mod tests {
    use crate::coverage::analyze_coverage;
    use crate::goals::{Goal, GoalCatalog, GoalId, GoalKind};
    use crate::optimizer::suggestions::summarize_actions;
    use crate::optimizer::SuggestedAction;
    use crate::plan::{WeekKey, WeeklyPlan, FOCUS_CAP};

    fn goal_ids(catalog: &GoalCatalog) -> Vec<GoalId> {
        catalog.iter().map(|g| g.id.clone()).collect()
    }

    #[test]
    fn adds_come_before_promotes() {
        let mut catalog = GoalCatalog::new();
        for item in ["A", "B", "C", "D"] {
            catalog.insert(Goal::new(GoalKind::Max, "기타", item));
        }
        let ids = goal_ids(&catalog);
        let mut plan = WeeklyPlan::new();
        plan.assign(
            &WeekKey::nth(1),
            vec![ids[0].clone(), ids[1].clone()],
            vec![ids[2].clone(), ids[3].clone()],
        );
        let keys = vec![WeekKey::nth(1), WeekKey::nth(2)];
        let actions = summarize_actions(&analyze_coverage(&keys, &plan, &catalog));
        assert_eq!(
            actions,
            vec![
                SuggestedAction::Add {
                    week: WeekKey::nth(2),
                    goal_id: ids[2].clone(),
                },
                SuggestedAction::Promote {
                    week: WeekKey::nth(1),
                    goal_id: ids[3].clone(),
                },
            ]
        );
    }

    #[test]
    fn applying_adds_never_overfills_focus() {
        let mut catalog = GoalCatalog::new();
        for n in 0..9 {
            catalog.insert(Goal::new(GoalKind::Max, "목표", n.to_string()));
        }
        let ids = goal_ids(&catalog);
        let keys: Vec<WeekKey> = (1..=4).map(WeekKey::nth).collect();
        let mut plan = WeeklyPlan::new();
        plan.assign(&keys[0], vec![ids[0].clone()], vec![]);
        plan.assign(&keys[1], vec![ids[1].clone(), ids[2].clone()], vec![]);
        plan.assign(&keys[3], vec![ids[3].clone()], vec![]);

        let actions = summarize_actions(&analyze_coverage(&keys, &plan, &catalog));
        let mut applied = plan.clone();
        for action in &actions {
            if let SuggestedAction::Add { week, goal_id } = action {
                applied.week_mut(week).focus.push(goal_id.clone());
            }
        }
        for key in &keys {
            assert!(applied.focus_len(key) <= FOCUS_CAP, "{key} overfilled");
        }
        assert_eq!(actions.len(), 3);
    }
}
