pub mod csv;
pub mod table;

use anyhow::Result;
use serde::Serialize;

use crate::goals::{GoalCatalog, GoalId};
use crate::plan::{WeekCalendar, WeekKey};

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Display label of a week, or its key when no calendar is loaded.
pub fn week_label(calendar: Option<&WeekCalendar>, key: &WeekKey) -> String {
    calendar
        .and_then(|c| c.label_for(key))
        .map(str::to_string)
        .unwrap_or_else(|| key.to_string())
}

/// Pipe-joined goal labels, the format the checklist sheet splits on.
pub fn join_labels(catalog: &GoalCatalog, ids: &[GoalId]) -> String {
    ids.iter()
        .map(|id| catalog.label_of(id))
        .collect::<Vec<_>>()
        .join(" | ")
}
