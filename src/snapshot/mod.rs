pub mod store;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::plan::{WeekCalendar, WeekKey, WeeklyPlan};
use crate::progress::Completions;

/// Everything a planning session owns. Loaded at start, saved after each
/// mutating command.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppState {
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub calendar: Option<WeekCalendar>,
    #[serde(default)]
    pub plan: WeeklyPlan,
    #[serde(default)]
    pub completions: Completions,
    #[serde(default)]
    pub notes: BTreeMap<WeekKey, String>,
}

impl AppState {
    /// Fresh state for a new month.
    pub fn for_calendar(month: impl Into<String>, calendar: WeekCalendar) -> Self {
        Self {
            month: Some(month.into()),
            calendar: Some(calendar),
            ..Self::default()
        }
    }

    pub fn week_keys(&self) -> Vec<WeekKey> {
        self.calendar.as_ref().map(WeekCalendar::keys).unwrap_or_default()
    }

    pub fn set_note(&mut self, week: &WeekKey, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            self.notes.remove(week);
        } else {
            self.notes.insert(week.clone(), text.to_string());
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use crate::goals::GoalId;
    use crate::plan::{WeekCalendar, WeekKey};
    use crate::snapshot::AppState;

    #[test]
    fn state_tracks_calendar_keys_and_notes() {
        let calendar = WeekCalendar::for_month(2024, 10).expect("valid month");
        let mut state = AppState::for_calendar("10", calendar);
        assert_eq!(state.week_keys().len(), 5);

        let week = WeekKey::nth(1);
        state.set_note(&week, "  발레 빠짐  ");
        assert_eq!(state.notes.get(&week).map(String::as_str), Some("발레 빠짐"));
        state.set_note(&week, " ");
        assert!(state.notes.is_empty());

        state
            .plan
            .assign(&week, vec![GoalId::from_label("A")], vec![]);
        state.reset();
        assert_eq!(state, AppState::default());
        assert!(state.week_keys().is_empty());
    }
}
