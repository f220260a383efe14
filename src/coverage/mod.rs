pub mod analyzer;

use serde::{Deserialize, Serialize};

use crate::goals::{Goal, GoalId, GoalKind};
use crate::plan::WeekKey;

pub use analyzer::analyze_coverage;

/// Placement counts of one catalog goal across the month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoalCoverage {
    pub goal_id: GoalId,
    pub label: String,
    pub kind: GoalKind,
    pub focus: usize,
    pub background: usize,
    /// Weeks the goal appears in, each listed once, in calendar order.
    pub weeks: Vec<WeekKey>,
}

impl GoalCoverage {
    pub fn empty(goal: &Goal) -> Self {
        Self {
            goal_id: goal.id.clone(),
            label: goal.label.clone(),
            kind: goal.kind,
            focus: 0,
            background: 0,
            weeks: Vec::new(),
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focus > 0
    }
}

/// A goal paired with the week a suggestion targets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Placement {
    pub week: WeekKey,
    pub goal_id: GoalId,
}

impl Placement {
    pub fn new(week: WeekKey, goal_id: GoalId) -> Self {
        Self { week, goal_id }
    }
}

/// Snapshot derived from one plan and one catalog. Never stored; recompute it
/// whenever either input changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoverageResult {
    pub goals: Vec<GoalCoverage>,
    pub week_count: usize,
    pub total_focus_slots: usize,
    pub num_max_goals: usize,
    pub capacity_ok: bool,
    pub covered_focus: Vec<GoalId>,
    pub missing_focus: Vec<GoalId>,
    /// Missing goals paired with weeks that still have a free focus slot.
    pub suggestions: Vec<Placement>,
    /// Missing goals already sitting in a full week's background.
    pub swaps: Vec<Placement>,
}

impl CoverageResult {
    pub fn goal(&self, id: &GoalId) -> Option<&GoalCoverage> {
        self.goals.iter().find(|g| &g.goal_id == id)
    }

    pub fn total_focus_placements(&self) -> usize {
        self.goals.iter().map(|g| g.focus).sum()
    }

    /// Missing goals that neither pass could place.
    pub fn unresolved(&self) -> Vec<&GoalId> {
        self.missing_focus
            .iter()
            .filter(|id| {
                !self.suggestions.iter().any(|p| &p.goal_id == *id)
                    && !self.swaps.iter().any(|p| &p.goal_id == *id)
            })
            .collect()
    }

    pub fn is_fully_covered(&self) -> bool {
        self.missing_focus.is_empty()
    }
}
