use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::goals::{CatalogOptions, EmptyCellPolicy, GoalColumns, DEFAULT_SECTION};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub goals: GoalsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_state_path")]
    pub state_path: String,
    #[serde(default)]
    pub goals_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalsConfig {
    #[serde(default = "default_month_column")]
    pub month_column: String,
    #[serde(default = "default_max_column")]
    pub max_column: String,
    #[serde(default = "default_min_column")]
    pub min_column: String,
    #[serde(default = "default_project_column")]
    pub project_column: Option<String>,
    #[serde(default)]
    pub empty_cell_policy: EmptyCellPolicy,
    #[serde(default = "default_fallback_section")]
    pub fallback_section: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub state_path: Option<String>,
    pub goals_path: Option<String>,
    pub empty_cell_policy: Option<EmptyCellPolicy>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/focus-planner/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(state_path) = overrides.state_path {
            self.storage.state_path = state_path;
        }
        if let Some(goals_path) = overrides.goals_path {
            self.storage.goals_path = Some(goals_path);
        }
        if let Some(policy) = overrides.empty_cell_policy {
            self.goals.empty_cell_policy = policy;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_state_path(&self) -> PathBuf {
        expand_tilde(&self.storage.state_path)
    }

    pub fn resolved_goals_path(&self) -> Option<PathBuf> {
        self.storage.goals_path.as_deref().map(expand_tilde)
    }

    pub fn default_template() -> String {
        let template = r#"[storage]
state_path = "~/.local/share/focus-planner/state.json"
# goals_path = "~/Documents/goals.csv"

[goals]
month_column = "월"
max_column = "최대선"
min_column = "최소선"
project_column = "프로젝트"
# "fallback" keeps a cell without bullets as one item, "drop" ignores it
empty_cell_policy = "fallback"
fallback_section = "기타"
"#;
        template.to_string()
    }
}

impl GoalsConfig {
    pub fn columns(&self) -> GoalColumns {
        GoalColumns {
            month: self.month_column.clone(),
            max: self.max_column.clone(),
            min: self.min_column.clone(),
            project: self.project_column.clone(),
        }
    }

    pub fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions {
            empty_cell_policy: self.empty_cell_policy,
            fallback_section: self.fallback_section.clone(),
        }
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
            goals_path: None,
        }
    }
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            month_column: default_month_column(),
            max_column: default_max_column(),
            min_column: default_min_column(),
            project_column: default_project_column(),
            empty_cell_policy: EmptyCellPolicy::default(),
            fallback_section: default_fallback_section(),
        }
    }
}

fn default_state_path() -> String {
    "~/.local/share/focus-planner/state.json".to_string()
}

fn default_month_column() -> String {
    "월".to_string()
}

fn default_max_column() -> String {
    "최대선".to_string()
}

fn default_min_column() -> String {
    "최소선".to_string()
}

fn default_project_column() -> Option<String> {
    Some("프로젝트".to_string())
}

fn default_fallback_section() -> String {
    DEFAULT_SECTION.to_string()
}
