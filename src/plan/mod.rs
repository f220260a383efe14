pub mod calendar;

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::goals::GoalId;

pub use calendar::{CalendarError, CalendarWeek, WeekCalendar};

/// Maximum number of focus goals a week can hold.
pub const FOCUS_CAP: usize = 2;
/// Maximum number of background goals a week can hold.
pub const BACKGROUND_CAP: usize = 5;

/// Stable storage key of a calendar week (`week3`), independent of its label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct WeekKey(String);

impl WeekKey {
    pub fn nth(n: usize) -> Self {
        Self(format!("week{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for WeekKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
#[error("invalid week key: {0:?}")]
pub struct WeekKeyParseError(pub String);

impl FromStr for WeekKey {
    type Err = WeekKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(WeekKeyParseError(s.to_string()));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Focus,
    Background,
}

impl Bucket {
    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Focus => "focus",
            Self::Background => "background",
        }
    }

    pub fn cap(&self) -> usize {
        match self {
            Self::Focus => FOCUS_CAP,
            Self::Background => BACKGROUND_CAP,
        }
    }
}

impl Display for Bucket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_slug())
    }
}

#[derive(Debug, Error)]
#[error("unknown bucket: {0} (expected focus or background)")]
pub struct BucketParseError(pub String);

impl FromStr for Bucket {
    type Err = BucketParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "focus" | "main" | "메인" => Ok(Self::Focus),
            "background" | "routine" | "배경" | "루틴" => Ok(Self::Background),
            _ => Err(BucketParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeekSlots {
    #[serde(default)]
    pub focus: Vec<GoalId>,
    #[serde(default)]
    pub background: Vec<GoalId>,
}

impl WeekSlots {
    pub fn bucket(&self, bucket: Bucket) -> &[GoalId] {
        match bucket {
            Bucket::Focus => &self.focus,
            Bucket::Background => &self.background,
        }
    }

    pub fn has_focus_room(&self) -> bool {
        self.focus.len() < FOCUS_CAP
    }

    pub fn is_empty(&self) -> bool {
        self.focus.is_empty() && self.background.is_empty()
    }
}

/// Result of a direct assignment after the caps were applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignOutcome {
    pub focus_clamped: Vec<GoalId>,
    pub background_clamped: Vec<GoalId>,
}

impl AssignOutcome {
    pub fn was_clamped(&self) -> bool {
        !self.focus_clamped.is_empty() || !self.background_clamped.is_empty()
    }
}

/// Week-by-week focus/background assignment; the authoritative plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct WeeklyPlan {
    weeks: BTreeMap<WeekKey, WeekSlots>,
}

impl WeeklyPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn week(&self, key: &WeekKey) -> Option<&WeekSlots> {
        self.weeks.get(key)
    }

    /// Slots of `key`, creating an empty entry on first reference.
    pub fn week_mut(&mut self, key: &WeekKey) -> &mut WeekSlots {
        self.weeks.entry(key.clone()).or_default()
    }

    pub fn focus_len(&self, key: &WeekKey) -> usize {
        self.week(key).map(|w| w.focus.len()).unwrap_or(0)
    }

    /// Replaces a week's assignment. Duplicate ids are collapsed and anything
    /// beyond the focus/background caps is cut off and reported.
    pub fn assign(
        &mut self,
        key: &WeekKey,
        focus: Vec<GoalId>,
        background: Vec<GoalId>,
    ) -> AssignOutcome {
        let (focus, focus_clamped) = clamp_unique(focus, FOCUS_CAP);
        let (background, background_clamped) = clamp_unique(background, BACKGROUND_CAP);
        let outcome = AssignOutcome {
            focus_clamped,
            background_clamped,
        };
        if outcome.was_clamped() {
            warn!(
                week = %key,
                focus_dropped = outcome.focus_clamped.len(),
                background_dropped = outcome.background_clamped.len(),
                "assignment exceeded slot caps, extra goals ignored"
            );
        }
        let slots = self.week_mut(key);
        slots.focus = focus;
        slots.background = background;
        outcome
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WeekKey, &WeekSlots)> {
        self.weeks.iter()
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}

fn clamp_unique(ids: Vec<GoalId>, cap: usize) -> (Vec<GoalId>, Vec<GoalId>) {
    let mut kept: Vec<GoalId> = Vec::new();
    let mut clamped = Vec::new();
    for id in ids {
        if id.is_empty() || kept.contains(&id) {
            continue;
        }
        if kept.len() < cap {
            kept.push(id);
        } else {
            clamped.push(id);
        }
    }
    (kept, clamped)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use crate::goals::GoalId;
    use crate::plan::{Bucket, WeekKey, WeeklyPlan, BACKGROUND_CAP, FOCUS_CAP};

    fn ids(labels: &[&str]) -> Vec<GoalId> {
        labels.iter().map(|l| GoalId::from_label(l)).collect()
    }

    #[test]
    fn week_entries_are_created_on_first_reference() {
        let mut plan = WeeklyPlan::new();
        let week = WeekKey::nth(1);
        assert!(plan.week(&week).is_none());
        assert!(plan.week_mut(&week).is_empty());
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.focus_len(&WeekKey::nth(9)), 0);
    }

    #[test]
    fn assign_clamps_to_caps_and_dedups() {
        let mut plan = WeeklyPlan::new();
        let week = WeekKey::nth(2);
        let outcome = plan.assign(
            &week,
            ids(&["a", "a ", "b", "c"]),
            ids(&["1", "2", "3", "4", "5", "6"]),
        );
        let slots = plan.week(&week).expect("week present");
        assert_eq!(slots.focus, ids(&["a", "b"]));
        assert_eq!(slots.focus.len(), FOCUS_CAP);
        assert_eq!(slots.background.len(), BACKGROUND_CAP);
        assert_eq!(outcome.focus_clamped, ids(&["c"]));
        assert_eq!(outcome.background_clamped, ids(&["6"]));
        assert!(outcome.was_clamped());
    }

    #[test]
    fn parses_week_keys_and_buckets() {
        assert_eq!(WeekKey::from_str(" Week3 ").expect("key"), WeekKey::nth(3));
        assert!(WeekKey::from_str("week 3").is_err());
        assert!(WeekKey::from_str("").is_err());
        assert_eq!(Bucket::from_str("루틴").expect("bucket"), Bucket::Background);
        assert_eq!(Bucket::from_str("MAIN").expect("bucket"), Bucket::Focus);
        assert!(Bucket::from_str("later").is_err());
    }

    #[test]
    fn plan_serializes_as_week_map() {
        let mut plan = WeeklyPlan::new();
        plan.assign(&WeekKey::nth(1), ids(&["a"]), ids(&["b"]));
        let json = serde_json::to_value(&plan).expect("serialize");
        assert_eq!(json["week1"]["focus"][0], "a");
        let back: WeeklyPlan = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, plan);
    }
}
