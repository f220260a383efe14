use anyhow::Result;

use crate::coverage::CoverageResult;
use crate::goals::GoalCatalog;
use crate::optimizer::{AppliedEntry, SimulationResult, SuggestedAction};
use crate::output::{join_labels, week_label};
use crate::plan::{WeekCalendar, WeekKey, WeeklyPlan};
use crate::progress::ProgressReport;

pub fn catalog_to_csv(catalog: &GoalCatalog) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["id", "kind", "section", "item"])?;
    for goal in catalog.iter() {
        writer.write_record([
            goal.id.as_str(),
            goal.kind.as_slug(),
            goal.section.as_str(),
            goal.item.as_str(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn weeks_to_csv(calendar: &WeekCalendar) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["week", "label", "start", "end"])?;
    for week in &calendar.weeks {
        writer.write_record([
            week.key.to_string(),
            week.label.clone(),
            week.start.to_string(),
            week.end.to_string(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn coverage_to_csv(result: &CoverageResult) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["goal", "kind", "focus", "background", "weeks", "status"])?;
    for goal in &result.goals {
        let status = if !goal.kind.is_max() {
            "-"
        } else if goal.is_focused() {
            "covered"
        } else {
            "missing"
        };
        writer.write_record([
            goal.label.clone(),
            goal.kind.to_string(),
            goal.focus.to_string(),
            goal.background.to_string(),
            goal.weeks
                .iter()
                .map(WeekKey::as_str)
                .collect::<Vec<_>>()
                .join(" "),
            status.to_string(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn plan_to_csv(
    week_keys: &[WeekKey],
    plan: &WeeklyPlan,
    catalog: &GoalCatalog,
    calendar: Option<&WeekCalendar>,
) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["week", "label", "focus", "background"])?;
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
        writer.write_record([
            week.to_string(),
            week_label(calendar, week),
            focus,
            background,
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn actions_to_csv(actions: &[SuggestedAction], catalog: &GoalCatalog) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["action", "week", "goal"])?;
    for action in actions {
        writer.write_record([
            action.kind().to_string(),
            action.week().to_string(),
            catalog.label_of(action.goal_id()).to_string(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn applied_log_to_csv(log: &[AppliedEntry]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["action", "week", "goal", "note"])?;
    for entry in log {
        writer.write_record([
            entry.action_kind.to_string(),
            entry.week.to_string(),
            entry.goal_label.clone(),
            entry.note.clone(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

/// Applied log followed by the virtual plan, separated by a blank line.
pub fn simulation_to_csv(
    result: &SimulationResult,
    week_keys: &[WeekKey],
    catalog: &GoalCatalog,
    calendar: Option<&WeekCalendar>,
) -> Result<String> {
    let log = applied_log_to_csv(&result.applied_log)?;
    let plan = plan_to_csv(week_keys, &result.virtual_plan, catalog, calendar)?;
    Ok(format!("{log}\n{plan}"))
}

pub fn progress_to_csv(report: &ProgressReport) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["week", "total", "done", "percent"])?;
    for week in &report.weeks {
        writer.write_record([
            week.week.to_string(),
            week.total.to_string(),
            week.done.to_string(),
            week.percent.to_string(),
        ])?;
    }
    writer.write_record([
        "total".to_string(),
        report.total.to_string(),
        report.done.to_string(),
        report.percent.to_string(),
    ])?;
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

#[cfg(test)]
mod tests {
    use crate::coverage::analyze_coverage;
    use crate::goals::{Goal, GoalCatalog, GoalKind};
    use crate::optimizer::simulator::simulate_plan;
    use crate::optimizer::suggestions::summarize_actions;
    use crate::output::csv::{
        applied_log_to_csv, catalog_to_csv, coverage_to_csv, plan_to_csv, simulation_to_csv,
        weeks_to_csv,
    };
    use crate::plan::{WeekCalendar, WeeklyPlan};

    #[test]
    fn exports_coverage_plan_and_log_rows() {
        let mut catalog = GoalCatalog::new();
        catalog.insert(Goal::new(GoalKind::Max, "연구", "논문초록"));
        catalog.insert(Goal::new(GoalKind::Min, "건강", "식단기록"));
        let calendar = WeekCalendar::for_month(2024, 10).expect("valid month");
        let keys = calendar.keys();
        let plan = WeeklyPlan::new();

        let coverage = analyze_coverage(&keys, &plan, &catalog);
        let csv = coverage_to_csv(&coverage).expect("coverage csv");
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "goal,kind,focus,background,weeks,status");
        assert_eq!(lines[1], "연구 - 논문초록,max,0,0,,missing");
        assert_eq!(lines[2], "건강 - 식단기록,min,0,0,,-");

        let actions = summarize_actions(&coverage);
        let sim = simulate_plan(&plan, &actions, &catalog);
        let plan_csv =
            plan_to_csv(&keys, &sim.virtual_plan, &catalog, Some(&calendar)).expect("plan csv");
        assert_eq!(plan_csv.lines().count(), 6);
        assert!(plan_csv.contains("week1,1주차 (10/1~10/6),연구 - 논문초록,"));

        let log_csv = applied_log_to_csv(&sim.applied_log).expect("log csv");
        assert_eq!(
            log_csv.lines().nth(1),
            Some("add,week1,연구 - 논문초록,filled empty focus slot")
        );
    }

    #[test]
    fn exports_catalog_and_weeks_as_csv() {
        let mut catalog = GoalCatalog::new();
        catalog.insert(Goal::new(GoalKind::Max, "연구", "논문초록"));
        catalog.insert(Goal::new(GoalKind::Min, "건강", "식단, 기록"));
        let csv = catalog_to_csv(&catalog).expect("catalog csv");
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "id,kind,section,item");
        assert_eq!(lines[1], "연구 - 논문초록,max,연구,논문초록");
        assert_eq!(lines[2], "\"건강 - 식단, 기록\",min,건강,\"식단, 기록\"");

        let calendar = WeekCalendar::for_month(2024, 10).expect("valid month");
        let weeks = weeks_to_csv(&calendar).expect("weeks csv");
        let lines: Vec<_> = weeks.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "week1,1주차 (10/1~10/6),2024-10-01,2024-10-06");
        assert_eq!(lines[5], "week5,5주차 (10/28~10/31),2024-10-28,2024-10-31");
    }

    #[test]
    fn simulation_export_carries_log_and_virtual_plan() {
        let mut catalog = GoalCatalog::new();
        catalog.insert(Goal::new(GoalKind::Max, "연구", "논문초록"));
        let calendar = WeekCalendar::for_month(2024, 10).expect("valid month");
        let keys = calendar.keys();
        let plan = WeeklyPlan::new();
        let actions = summarize_actions(&analyze_coverage(&keys, &plan, &catalog));
        let sim = simulate_plan(&plan, &actions, &catalog);

        let csv = simulation_to_csv(&sim, &keys, &catalog, Some(&calendar)).expect("sim csv");
        let (log, virtual_plan) = csv.split_once("\n\n").expect("two sections");
        assert_eq!(log.lines().next(), Some("action,week,goal,note"));
        assert_eq!(virtual_plan.lines().next(), Some("week,label,focus,background"));
        assert!(virtual_plan.contains("week1,1주차 (10/1~10/6),연구 - 논문초록,"));
        assert!(!plan_to_csv(&keys, &plan, &catalog, Some(&calendar))
            .expect("plan csv")
            .contains("논문초록"));
    }
}
