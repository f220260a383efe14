use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::goals::normalize::normalize_text;

/// Normalized goal label, used as the dedup and lookup key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct GoalId(String);

impl GoalId {
    pub fn from_label(label: &str) -> Self {
        Self(normalize_text(label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for GoalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GoalId {
    fn from(value: &str) -> Self {
        Self::from_label(value)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    /// Must-do; participates in capacity and coverage checks.
    Max,
    /// Nice-to-have; meant for background slots.
    Min,
}

impl GoalKind {
    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Max => "max",
            Self::Min => "min",
        }
    }

    pub fn is_max(self) -> bool {
        self == Self::Max
    }
}

impl Display for GoalKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_slug())
    }
}

#[derive(Debug, Error)]
#[error("unknown goal kind: {0}")]
pub struct GoalKindParseError(pub String);

impl FromStr for GoalKind {
    type Err = GoalKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" | "must" | "최대선" => Ok(Self::Max),
            "min" | "nice" | "최소선" => Ok(Self::Min),
            _ => Err(GoalKindParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Goal {
    pub id: GoalId,
    pub label: String,
    pub kind: GoalKind,
    pub section: String,
    pub item: String,
}

impl Goal {
    pub fn new(kind: GoalKind, section: impl Into<String>, item: impl Into<String>) -> Self {
        let section = section.into();
        let item = item.into();
        let label = format!("{section} - {item}");
        Self {
            id: GoalId::from_label(&label),
            label,
            kind,
            section,
            item,
        }
    }

    pub fn is_max(&self) -> bool {
        self.kind.is_max()
    }
}

/// One bullet extracted by the goal parser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParsedItem {
    pub section: String,
    pub item: String,
}
