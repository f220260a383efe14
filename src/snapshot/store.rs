use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::snapshot::AppState;

/// Whole-state JSON file. The plan, completions and notes are written together
/// on every save.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn open(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<AppState> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no state file, starting empty");
            return Ok(AppState::default());
        }
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("failed reading state: {}", self.path.display()))?;
        let state = serde_json::from_str(&data)
            .with_context(|| format!("failed parsing state JSON: {}", self.path.display()))?;
        Ok(state)
    }

    pub fn save(&self, state: &AppState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed creating state directory: {}", parent.display())
                })?;
            }
        }
        let json = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .with_context(|| format!("failed writing state: {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed replacing state: {}", self.path.display()))?;
        info!(path = %self.path.display(), weeks = state.plan.len(), "saved state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::goals::GoalId;
    use crate::plan::{Bucket, WeekCalendar, WeekKey};
    use crate::progress::set_done;
    use crate::snapshot::store::StateStore;
    use crate::snapshot::AppState;

    #[test]
    fn missing_file_loads_default_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = StateStore::open(&dir.path().join("absent.json"));
        assert_eq!(store.load().expect("load"), AppState::default());
    }

    #[test]
    fn saves_and_reloads_whole_state() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = StateStore::open(&dir.path().join("nested/state.json"));

        let calendar = WeekCalendar::for_month(2024, 10).expect("valid month");
        let mut state = AppState::for_calendar("10", calendar);
        let week = WeekKey::nth(2);
        let goal = GoalId::from_label("기타 - 논문초록");
        state.plan.assign(&week, vec![goal.clone()], vec![]);
        set_done(&mut state.completions, &week, Bucket::Focus, &goal, true);
        state.set_note(&week, "초록 초안 완료");

        store.save(&state).expect("save");
        assert!(store.path().exists());
        assert_eq!(store.load().expect("load"), state);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{not json").expect("write");
        let err = StateStore::open(&path).load().expect_err("should fail");
        assert!(err.to_string().contains("failed parsing state JSON"));
    }
}
