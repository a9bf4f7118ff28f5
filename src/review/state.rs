use std::{
    fs,
    path::Path,
};

use chrono::{
    DateTime,
    Utc,
};
use log::warn;
use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    core::CihuiError,
    persistence::save_json,
};

pub const STATE_FILE: &str = "learning_state.json";

/// Session counters. Advisory only; never consulted by scheduling decisions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionStats {
    pub total_learned: usize,
    pub session_start_time: DateTime<Utc>,
    pub session_words: u32,
    pub session_kept: u32,
    pub session_discarded: u32,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self {
            total_learned: 0,
            session_start_time: Utc::now(),
            session_words: 0,
            session_kept: 0,
            session_discarded: 0,
        }
    }
}

/// The scheduler's own persisted state, kept in a separate file from the
/// word library.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearningState {
    #[serde(default)]
    pub old_queue: Vec<String>,
    #[serde(default)]
    pub stats: SessionStats,
}

/// On disk the state is either the current object shape or, from older
/// versions, a bare array of learned word ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum StateFile {
    Current(LearningState),
    Legacy(Vec<String>),
}

impl LearningState {
    /// Loads the state file, accepting the legacy bare-array format. Missing
    /// or malformed files fall back to an empty state rather than erroring.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read learning state {}: {}. Starting fresh.", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str::<StateFile>(&content) {
            Ok(StateFile::Current(state)) => state,
            Ok(StateFile::Legacy(old_queue)) => {
                Self { old_queue, stats: SessionStats::default() }
            }
            Err(e) => {
                warn!("Failed to parse learning state {}: {}. Starting fresh.", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), CihuiError> {
        save_json(self, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let state = LearningState::load(&dir.path().join(STATE_FILE));
        assert!(state.old_queue.is_empty());
        assert_eq!(state.stats.total_learned, 0);
    }

    #[test]
    fn test_legacy_bare_array_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STATE_FILE);
        fs::write(&path, r#"["w1", "w2"]"#).unwrap();

        let state = LearningState::load(&path);
        assert_eq!(state.old_queue, vec!["w1".to_string(), "w2".to_string()]);
        assert_eq!(state.stats.session_words, 0);
        assert_eq!(state.stats.session_kept, 0);
    }

    #[test]
    fn test_malformed_json_falls_back_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STATE_FILE);
        fs::write(&path, "{not json").unwrap();

        let state = LearningState::load(&path);
        assert!(state.old_queue.is_empty());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STATE_FILE);

        let state = LearningState {
            old_queue: vec!["a".into(), "b".into()],
            stats: SessionStats {
                total_learned: 2,
                session_words: 7,
                session_kept: 4,
                session_discarded: 3,
                ..SessionStats::default()
            },
        };
        state.save(&path).unwrap();

        let loaded = LearningState::load(&path);
        assert_eq!(loaded.old_queue, state.old_queue);
        assert_eq!(loaded.stats, state.stats);
    }
}
