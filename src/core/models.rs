use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};
use uuid::Uuid;

/// Strength is a scalar proxy for memory retention; higher means less urgent
/// to review. It never decreases and never exceeds this ceiling.
pub const MAX_STRENGTH: f64 = 10.0;

/// Per-word spaced-repetition statistics. Absent on a record until the first
/// "keep" action, which is how "never formally reviewed" is distinguished
/// from "reviewed with low strength".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LearningMetadata {
    pub first_learned: DateTime<Utc>,
    pub review_count: u32,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub strength: f64,
}

impl LearningMetadata {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { first_learned: now, review_count: 0, last_reviewed: None, strength: 1.0 }
    }

    /// Full reinforcement from an explicit "keep" action. Early reviews grow
    /// strength by 1.1x, later ones by 1.2x, capped at MAX_STRENGTH.
    pub fn reinforce(&mut self, now: DateTime<Utc>) {
        self.review_count += 1;
        self.last_reviewed = Some(now);
        let multiplier = if self.review_count >= 3 { 1.2 } else { 1.1 };
        self.strength = (self.strength * multiplier).min(MAX_STRENGTH);
    }

    /// Light reinforcement from a review session where the learner implicitly
    /// confirmed the word as remembered (1.05x).
    pub fn reinforce_light(&mut self, now: DateTime<Utc>) {
        self.review_count += 1;
        self.last_reviewed = Some(now);
        self.strength = (self.strength * 1.05).min(MAX_STRENGTH);
    }
}

/// One vocabulary item as persisted in the word library. The display fields
/// are never touched by the scheduler; only `learning_metadata` is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WordRecord {
    pub id: String,
    pub word: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_metadata: Option<LearningMetadata>,
}

impl WordRecord {
    pub fn new(
        word: impl Into<String>,
        translation: impl Into<String>,
        pronunciation: Option<String>,
        example: Option<String>,
        note: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            word: word.into(),
            translation: translation.into(),
            pronunciation,
            example,
            note,
            created_at: Utc::now(),
            learning_metadata: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reinforce_grows_strength_with_cap() {
        let now = Utc::now();
        let mut metadata = LearningMetadata::new(now);
        assert_eq!(metadata.review_count, 0);
        assert!(metadata.last_reviewed.is_none());

        metadata.reinforce(now);
        assert_eq!(metadata.review_count, 1);
        assert!((metadata.strength - 1.1).abs() < 1e-9);
        assert_eq!(metadata.last_reviewed, Some(now));

        metadata.reinforce(now);
        assert!((metadata.strength - 1.21).abs() < 1e-9);

        // Third review onward uses the 1.2x multiplier
        metadata.reinforce(now);
        assert!((metadata.strength - 1.452).abs() < 1e-9);

        for _ in 0..50 {
            metadata.reinforce(now);
        }
        assert!(metadata.strength <= MAX_STRENGTH);
        assert_eq!(metadata.review_count, 53);
    }

    #[test]
    fn test_light_reinforcement() {
        let now = Utc::now();
        let mut metadata = LearningMetadata::new(now);
        metadata.reinforce_light(now);
        assert_eq!(metadata.review_count, 1);
        assert!((metadata.strength - 1.05).abs() < 1e-9);
    }

    #[test]
    fn test_metadata_absent_until_serialized() {
        let record = WordRecord::new("学习", "to study", Some("xué xí".into()), None, None);
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("learning_metadata"));

        let parsed: WordRecord = serde_json::from_str(&json).unwrap();
        assert!(parsed.learning_metadata.is_none());
        assert_eq!(parsed.word, "学习");
    }
}
