use std::{
    collections::HashSet,
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use log::warn;

use crate::{
    core::{
        CihuiError,
        WordRecord,
    },
    persistence::save_json,
};

pub const LIBRARY_FILE: &str = "word_library.json";

/// Flat-file word store: a JSON array of word records, held in memory in
/// insertion order and rewritten as a whole on every save.
#[derive(Debug)]
pub struct WordLibrary {
    words: Vec<WordRecord>,
    word_ids: HashSet<String>,
    file_path: PathBuf,
}

impl WordLibrary {
    /// Opens the library at `path`. A missing file or an unreadable/invalid
    /// one yields an empty library; storage problems are never fatal here.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let file_path = path.into();
        let words = Self::read_words(&file_path);
        let word_ids = words.iter().map(|word| word.id.clone()).collect();
        Self { words, word_ids, file_path }
    }

    fn read_words(path: &Path) -> Vec<WordRecord> {
        if !path.exists() {
            return Vec::new();
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read word library {}: {}. Starting empty.", path.display(), e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<WordRecord>>(&content) {
            Ok(words) => words,
            Err(e) => {
                warn!(
                    "Word library {} is not a valid word array: {}. Starting empty.",
                    path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    pub fn all_words(&self) -> &[WordRecord] {
        &self.words
    }

    pub fn get(&self, word_id: &str) -> Option<&WordRecord> {
        self.words.iter().find(|word| word.id == word_id)
    }

    pub fn get_mut(&mut self, word_id: &str) -> Option<&mut WordRecord> {
        self.words.iter_mut().find(|word| word.id == word_id)
    }

    pub fn contains(&self, word_id: &str) -> bool {
        self.word_ids.contains(word_id)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Appends records whose ids are not already present, then saves. Returns
    /// how many records were actually added.
    pub fn add_words(&mut self, new_words: Vec<WordRecord>) -> Result<usize, CihuiError> {
        let mut added = 0;
        for word in new_words {
            if self.word_ids.insert(word.id.clone()) {
                self.words.push(word);
                added += 1;
            }
        }
        self.save()?;
        Ok(added)
    }

    /// Removes the record with `word_id` and saves immediately. Returns
    /// whether the record existed.
    pub fn remove_word(&mut self, word_id: &str) -> Result<bool, CihuiError> {
        if let Some(pos) = self.words.iter().position(|word| word.id == word_id) {
            self.words.remove(pos);
            self.word_ids.remove(word_id);
            self.save()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Whole-file overwrite of the current record set.
    pub fn save(&self) -> Result<(), CihuiError> {
        save_json(&self.words, &self.file_path)
    }

    /// Re-reads the backing file, discarding in-memory state. Used by the
    /// scheduler's self-healing lookup when another path may have rewritten
    /// the file.
    pub fn reload(&mut self) {
        self.words = Self::read_words(&self.file_path);
        self.word_ids = self.words.iter().map(|word| word.id.clone()).collect();
    }
}
