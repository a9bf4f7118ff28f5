use std::{
    collections::HashSet,
    path::PathBuf,
};

use chrono::Utc;
use log::warn;
use rand::{
    rngs::StdRng,
    seq::IndexedRandom,
    SeedableRng,
};

use super::{
    scoring,
    state::{
        LearningState,
        SessionStats,
    },
};
use crate::{
    core::{
        CihuiError,
        LearningMetadata,
        WordRecord,
    },
    library::WordLibrary,
};

/// How many unlearned words a fresh learning session picks up.
pub const NEW_WORDS_PER_SESSION: usize = 5;

/// The learner's verdict on a word presented from the current queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordAction {
    /// Put the word back at the end of the current queue.
    Relearn,
    /// Mark the word as known and reinforce its metadata.
    Keep,
    /// Drop the word from this session without touching its metadata.
    Discard,
}

/// Per-id outcome of a review-selection batch, so callers can inspect what
/// happened instead of digging through logs.
#[derive(Debug, Clone, Default)]
pub struct SelectionOutcome {
    /// Demoted from the learned pool back into the current queue.
    pub requeued: Vec<String>,
    /// Lightly reinforced as remembered.
    pub reinforced: Vec<String>,
    /// Unresolvable or metadata-less ids that were left untouched.
    pub skipped: Vec<String>,
}

/// Review scheduler: owns today's learning queue and the durable pool of
/// learned word ids, scores words by review urgency, and records learning
/// actions. Word records live in the WordLibrary; the scheduler's own queue
/// state persists to a separate file.
pub struct ReviewScheduler {
    library: WordLibrary,
    state_path: PathBuf,
    current_queue: Vec<String>,
    old_queue: Vec<String>,
    learned_words: HashSet<String>,
    stats: SessionStats,
    rng: StdRng,
}

impl ReviewScheduler {
    pub fn new(library: WordLibrary, state_path: impl Into<PathBuf>) -> Self {
        Self::with_rng(library, state_path, StdRng::from_os_rng())
    }

    /// Takes an explicit rng so tests can seed the sampling.
    pub fn with_rng(library: WordLibrary, state_path: impl Into<PathBuf>, rng: StdRng) -> Self {
        let state_path = state_path.into();
        let state = LearningState::load(&state_path);
        let learned_words: HashSet<String> = state.old_queue.iter().cloned().collect();
        let stats = SessionStats {
            total_learned: learned_words.len(),
            session_start_time: Utc::now(),
            ..SessionStats::default()
        };

        Self {
            library,
            state_path,
            current_queue: Vec::new(),
            old_queue: state.old_queue,
            learned_words,
            stats,
            rng,
        }
    }

    /// Fills today's queue with unlearned words: all of them if fewer than
    /// NEW_WORDS_PER_SESSION exist, otherwise a uniform random sample.
    /// Replaces any previous queue content. An empty result means there is
    /// nothing new to learn.
    pub fn init_session(&mut self) -> Vec<WordRecord> {
        let unlearned: Vec<&WordRecord> = self
            .library
            .all_words()
            .iter()
            .filter(|word| !self.learned_words.contains(&word.id))
            .collect();

        let selected: Vec<WordRecord> = if unlearned.len() < NEW_WORDS_PER_SESSION {
            unlearned.into_iter().cloned().collect()
        } else {
            unlearned
                .choose_multiple(&mut self.rng, NEW_WORDS_PER_SESSION)
                .map(|word| (*word).clone())
                .collect()
        };

        self.current_queue = selected.iter().map(|word| word.id.clone()).collect();
        selected
    }

    /// Picks up to `count` learned words for review, biased toward high
    /// review-priority scores. Candidates are sorted by score, shortlisted to
    /// the top `2 * count`, and the batch is drawn uniformly from the
    /// shortlist so repeated calls do not always present the identical words.
    pub fn get_review_batch(&mut self, count: usize) -> Vec<WordRecord> {
        if count == 0 || self.old_queue.is_empty() {
            return Vec::new();
        }

        let now = Utc::now();
        let mut candidates: Vec<(WordRecord, f64)> = Vec::new();
        for word_id in &self.old_queue {
            match self.library.get(word_id) {
                Some(word) => {
                    let score = scoring::review_score(word.learning_metadata.as_ref(), now);
                    candidates.push((word.clone(), score));
                }
                None => {
                    warn!("Skipping review scoring for {}: not in the word library", word_id);
                }
            }
        }

        candidates
            .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let shortlist = &candidates[..(count * 2).min(candidates.len())];
        shortlist
            .choose_multiple(&mut self.rng, count.min(shortlist.len()))
            .map(|(word, _)| word.clone())
            .collect()
    }

    /// Records the learner's verdict on one word from the current queue.
    /// Absent ids are tolerated: the queue removal is skipped and the action
    /// still counts toward session stats.
    pub fn submit_action(&mut self, word_id: &str, action: WordAction) -> Result<(), CihuiError> {
        self.stats.session_words += 1;

        if let Some(pos) = self.current_queue.iter().position(|id| id == word_id) {
            self.current_queue.remove(pos);
        }

        match action {
            WordAction::Keep => self.keep_word(word_id)?,
            WordAction::Discard => self.stats.session_discarded += 1,
            WordAction::Relearn => self.current_queue.push(word_id.to_string()),
        }

        Ok(())
    }

    fn keep_word(&mut self, word_id: &str) -> Result<(), CihuiError> {
        self.stats.session_kept += 1;
        if self.learned_words.insert(word_id.to_string()) {
            self.old_queue.push(word_id.to_string());
        }

        let now = Utc::now();
        let resolved = match self.library.get_mut(word_id) {
            Some(word) => {
                let metadata =
                    word.learning_metadata.get_or_insert_with(|| LearningMetadata::new(now));
                metadata.reinforce(now);
                true
            }
            None => false,
        };

        if resolved {
            self.library.save()?;
        } else {
            // Keep on an id the library does not know becomes a no-op.
            warn!("Cannot keep {}: not in the word library", word_id);
            self.old_queue.retain(|id| id != word_id);
            self.learned_words.remove(word_id);
        }

        Ok(())
    }

    /// Applies the outcome of a review session: `selected_ids` were flagged
    /// as still needing work and are demoted into the current queue;
    /// `unselected_ids` were implicitly confirmed as remembered and get a
    /// light reinforcement. A failure on one id never aborts the rest.
    pub fn submit_selection(
        &mut self,
        selected_ids: &[String],
        unselected_ids: &[String],
    ) -> Result<SelectionOutcome, CihuiError> {
        let mut outcome = SelectionOutcome::default();
        let now = Utc::now();

        for word_id in selected_ids {
            self.old_queue.retain(|id| id != word_id);
            self.learned_words.remove(word_id);
            self.current_queue.push(word_id.clone());
            outcome.requeued.push(word_id.clone());
        }

        for word_id in unselected_ids {
            let reinforced = self
                .library
                .get_mut(word_id)
                .and_then(|word| word.learning_metadata.as_mut())
                .map(|metadata| metadata.reinforce_light(now))
                .is_some();

            if reinforced {
                outcome.reinforced.push(word_id.clone());
            } else {
                outcome.skipped.push(word_id.clone());
            }
        }

        if !outcome.reinforced.is_empty() {
            self.library.save()?;
        }

        Ok(outcome)
    }

    /// Resolves a word id to its record. If the id is in the learned pool but
    /// the in-memory library does not know it, the library is reloaded from
    /// disk and rescanned; a still-missing id is pruned from the pool (with
    /// the corrected state persisted) before the not-found error is returned,
    /// so dangling references do not recur.
    pub fn lookup(&mut self, word_id: &str) -> Result<WordRecord, CihuiError> {
        if let Some(word) = self.library.get(word_id) {
            return Ok(word.clone());
        }

        if self.old_queue.iter().any(|id| id == word_id) {
            self.library.reload();
            if let Some(word) = self.library.get(word_id) {
                return Ok(word.clone());
            }

            warn!(
                "Word {} is in the learned pool but missing from the library, pruning it",
                word_id
            );
            self.old_queue.retain(|id| id != word_id);
            self.learned_words.remove(word_id);
            self.persist()?;
        }

        Err(CihuiError::WordNotFound(word_id.to_string()))
    }

    /// Flushes queue state and stats to the scheduler's state file.
    pub fn persist(&mut self) -> Result<(), CihuiError> {
        self.stats.total_learned = self.learned_words.len();
        let state =
            LearningState { old_queue: self.old_queue.clone(), stats: self.stats.clone() };
        state.save(&self.state_path)
    }

    pub fn is_session_complete(&self) -> bool {
        self.current_queue.is_empty()
    }

    pub fn current_queue(&self) -> &[String] {
        &self.current_queue
    }

    pub fn old_queue(&self) -> &[String] {
        &self.old_queue
    }

    pub fn learned_count(&self) -> usize {
        self.learned_words.len()
    }

    pub fn is_learned(&self, word_id: &str) -> bool {
        self.learned_words.contains(word_id)
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn library(&self) -> &WordLibrary {
        &self.library
    }

    pub fn library_mut(&mut self) -> &mut WordLibrary {
        &mut self.library
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let pool: HashSet<&String> = self.old_queue.iter().collect();
        assert_eq!(pool.len(), self.old_queue.len(), "old_queue contains duplicates");
        assert_eq!(
            self.learned_words,
            self.old_queue.iter().cloned().collect::<HashSet<String>>(),
            "learned_words is out of sync with old_queue"
        );
    }
}
