use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::goals::normalize::{normalize_text, same_label};
use crate::goals::parser::{parse_goal_text, DEFAULT_SECTION};
use crate::goals::rows::MonthRow;
use crate::goals::schema::{Goal, GoalId, GoalKind};

/// What to do with a goal cell that contains no bullet at all.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmptyCellPolicy {
    /// Keep the whole cell as one item under the fallback section.
    #[default]
    Fallback,
    /// Ignore the cell.
    Drop,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogOptions {
    pub empty_cell_policy: EmptyCellPolicy,
    pub fallback_section: String,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            empty_cell_policy: EmptyCellPolicy::default(),
            fallback_section: DEFAULT_SECTION.to_string(),
        }
    }
}

/// Deduplicated goals of one month, kept in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Goal>", into = "Vec<Goal>")]
pub struct GoalCatalog {
    goals: Vec<Goal>,
    index: HashMap<GoalId, usize>,
}

impl GoalCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `goal` unless its id is already present. Returns whether it was added.
    pub fn insert(&mut self, goal: Goal) -> bool {
        if goal.id.is_empty() || self.index.contains_key(&goal.id) {
            return false;
        }
        self.index.insert(goal.id.clone(), self.goals.len());
        self.goals.push(goal);
        true
    }

    pub fn get(&self, id: &GoalId) -> Option<&Goal> {
        self.position(id).map(|idx| &self.goals[idx])
    }

    pub fn position(&self, id: &GoalId) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &GoalId) -> bool {
        self.index.contains_key(id)
    }

    /// Looks a goal up by any user-facing spelling of its label.
    pub fn resolve(&self, label: &str) -> Option<&Goal> {
        self.get(&GoalId::from_label(label))
    }

    /// Ids from `ids` that the catalog does not know, in input order.
    pub fn unknown_ids<'a>(&self, ids: &'a [GoalId]) -> Vec<&'a GoalId> {
        ids.iter().filter(|id| !self.contains(id)).collect()
    }

    /// First goal whose bare item matches `item`, whatever its section.
    pub fn find_by_item(&self, item: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| same_label(&g.item, item))
    }

    /// Display label for `id`, falling back to the id itself for stale entries.
    pub fn label_of<'a>(&'a self, id: &'a GoalId) -> &'a str {
        self.get(id).map(|g| g.label.as_str()).unwrap_or(id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Goal> {
        self.goals.iter()
    }

    pub fn max_goals(&self) -> impl Iterator<Item = &Goal> {
        self.goals.iter().filter(|g| g.kind == GoalKind::Max)
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }
}

impl From<Vec<Goal>> for GoalCatalog {
    fn from(goals: Vec<Goal>) -> Self {
        let mut catalog = Self::new();
        for goal in goals {
            catalog.insert(goal);
        }
        catalog
    }
}

impl From<GoalCatalog> for Vec<Goal> {
    fn from(catalog: GoalCatalog) -> Self {
        catalog.goals
    }
}

/// Builds the month's catalog. Every "max" cell is processed before any
/// "min" cell, so a collision between kinds keeps the "max" entry.
pub fn build_catalog(rows: &[MonthRow], options: &CatalogOptions) -> GoalCatalog {
    let mut catalog = GoalCatalog::new();
    let mut dropped = 0usize;

    for kind in [GoalKind::Max, GoalKind::Min] {
        for row in rows {
            let cell = match kind {
                GoalKind::Max => row.max.as_deref(),
                GoalKind::Min => row.min.as_deref(),
            };
            let Some(cell) = cell else {
                continue;
            };
            for goal in goals_from_cell(cell, kind, options) {
                if !catalog.insert(goal) {
                    dropped += 1;
                }
            }
        }
    }

    debug!(
        goals = catalog.len(),
        duplicates = dropped,
        "built goal catalog"
    );
    catalog
}

fn goals_from_cell(cell: &str, kind: GoalKind, options: &CatalogOptions) -> Vec<Goal> {
    if cell.trim().is_empty() {
        return Vec::new();
    }

    let parsed = parse_goal_text(cell, &options.fallback_section);
    if !parsed.is_empty() {
        return parsed
            .into_iter()
            .map(|p| Goal::new(kind, p.section, p.item))
            .collect();
    }

    match options.empty_cell_policy {
        EmptyCellPolicy::Drop => {
            debug!(kind = %kind, "dropping goal cell without bullets");
            Vec::new()
        }
        EmptyCellPolicy::Fallback => {
            let item = normalize_text(cell);
            warn!(kind = %kind, item = %item, "goal cell has no bullets, keeping it as one item");
            vec![Goal::new(kind, options.fallback_section.clone(), item)]
        }
    }
}
