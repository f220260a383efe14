pub mod diff;
pub mod simulator;
pub mod suggestions;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::goals::GoalId;
use crate::plan::{WeekKey, WeeklyPlan};

/// A proposed plan change. Describes the edit; the simulator performs it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SuggestedAction {
    /// Put a goal into a free focus slot.
    Add { week: WeekKey, goal_id: GoalId },
    /// Move a goal from the week's background into its focus.
    Promote { week: WeekKey, goal_id: GoalId },
}

impl SuggestedAction {
    pub fn week(&self) -> &WeekKey {
        match self {
            Self::Add { week, .. } | Self::Promote { week, .. } => week,
        }
    }

    pub fn goal_id(&self) -> &GoalId {
        match self {
            Self::Add { goal_id, .. } | Self::Promote { goal_id, .. } => goal_id,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Add { .. } => ActionKind::Add,
            Self::Promote { .. } => ActionKind::Promote,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Add,
    Promote,
    Drop,
    Skip,
}

impl Display for ActionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let slug = match self {
            Self::Add => "add",
            Self::Promote => "promote",
            Self::Drop => "drop",
            Self::Skip => "skip",
        };
        f.write_str(slug)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppliedEntry {
    pub action_kind: ActionKind,
    pub week: WeekKey,
    pub goal_label: String,
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimulationResult {
    pub virtual_plan: WeeklyPlan,
    pub applied_log: Vec<AppliedEntry>,
}

impl SimulationResult {
    pub fn count(&self, kind: ActionKind) -> usize {
        self.applied_log
            .iter()
            .filter(|entry| entry.action_kind == kind)
            .count()
    }
}

/// Focus changes of one week between two plans.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeekDiff {
    pub week: WeekKey,
    pub added: Vec<GoalId>,
    pub removed: Vec<GoalId>,
}
