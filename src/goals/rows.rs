use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::goals::normalize::normalize_text;

/// Header names of the goal sheet export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoalColumns {
    pub month: String,
    pub max: String,
    pub min: String,
    pub project: Option<String>,
}

impl Default for GoalColumns {
    fn default() -> Self {
        Self {
            month: "월".to_string(),
            max: "최대선".to_string(),
            min: "최소선".to_string(),
            project: Some("프로젝트".to_string()),
        }
    }
}

/// One spreadsheet row: the month it belongs to and its two goal cells.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthRow {
    pub month: String,
    pub project: Option<String>,
    pub max: Option<String>,
    pub min: Option<String>,
}

pub fn read_goal_rows(path: &Path, columns: &GoalColumns) -> Result<Vec<MonthRow>> {
    let file = File::open(path)
        .with_context(|| format!("failed opening goal sheet: {}", path.display()))?;
    parse_goal_rows(file, columns)
        .with_context(|| format!("failed reading goal sheet: {}", path.display()))
}

pub fn parse_goal_rows<R: Read>(reader: R, columns: &GoalColumns) -> Result<Vec<MonthRow>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers()?.clone();

    let find = |name: &str| -> Option<usize> {
        let wanted = normalize_text(name);
        headers
            .iter()
            .position(|h| normalize_text(h.trim_start_matches('\u{feff}')) == wanted)
    };
    let month_idx = find(&columns.month)
        .ok_or_else(|| anyhow!("missing month column '{}'", columns.month))?;
    let max_idx =
        find(&columns.max).ok_or_else(|| anyhow!("missing max column '{}'", columns.max))?;
    let min_idx =
        find(&columns.min).ok_or_else(|| anyhow!("missing min column '{}'", columns.min))?;
    let project_idx = columns.project.as_deref().and_then(find);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let month = normalize_text(record.get(month_idx).unwrap_or_default());
        if month.is_empty() {
            continue;
        }
        rows.push(MonthRow {
            month,
            project: project_idx.and_then(|idx| non_empty(record.get(idx))),
            max: non_empty(record.get(max_idx)),
            min: non_empty(record.get(min_idx)),
        });
    }
    Ok(rows)
}

pub fn rows_for_month(rows: &[MonthRow], month: &str) -> Vec<MonthRow> {
    let wanted = normalize_text(month);
    rows.iter()
        .filter(|row| row.month == wanted)
        .cloned()
        .collect()
}

/// Distinct month values in order of first appearance.
pub fn available_months(rows: &[MonthRow]) -> Vec<String> {
    let mut months: Vec<String> = Vec::new();
    for row in rows {
        if !months.contains(&row.month) {
            months.push(row.month.clone());
        }
    }
    months
}

fn non_empty(cell: Option<&str>) -> Option<String> {
    cell.filter(|c| !c.trim().is_empty()).map(str::to_string)
}
