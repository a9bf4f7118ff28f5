use chrono::{
    DateTime,
    Utc,
};

use crate::core::LearningMetadata;

/// Score for words in the learned pool that carry no metadata yet. Keeps them
/// reviewable without over- or under-prioritizing them.
pub const NEUTRAL_SCORE: f64 = 5.0;

/// Time factor for words that were kept but never reviewed since.
pub const NEVER_REVIEWED_TIME_FACTOR: f64 = 2.0;

/// Caps the influence of very old reviews.
pub const MAX_TIME_FACTOR: f64 = 3.0;

const REVIEW_INTERVAL_DAYS: f64 = 7.0;

/// Composite review-priority score. Higher means more urgent to review:
/// fewer past reviews, longer since the last one, and weaker retention all
/// push the score up.
pub fn review_score(metadata: Option<&LearningMetadata>, now: DateTime<Utc>) -> f64 {
    let Some(metadata) = metadata else {
        return NEUTRAL_SCORE;
    };

    review_factor(metadata.review_count)
        * time_factor(metadata.last_reviewed, now)
        * strength_factor(metadata.strength)
}

/// Strictly decreasing in review count, in (0, 1].
pub fn review_factor(review_count: u32) -> f64 {
    1.0 / (review_count as f64 + 1.0)
}

/// One whole review interval since the last review contributes a factor of
/// 1.0, growing linearly up to MAX_TIME_FACTOR. Whole days only.
pub fn time_factor(last_reviewed: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    match last_reviewed {
        Some(last) => {
            let days = (now - last).num_days().max(0) as f64;
            (days / REVIEW_INTERVAL_DAYS).min(MAX_TIME_FACTOR)
        }
        None => NEVER_REVIEWED_TIME_FACTOR,
    }
}

/// Strictly decreasing in strength, in [1/MAX_STRENGTH, 1].
pub fn strength_factor(strength: f64) -> f64 {
    1.0 / strength
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_missing_metadata_scores_neutral() {
        assert_eq!(review_score(None, Utc::now()), NEUTRAL_SCORE);
    }

    #[test]
    fn test_time_factor_caps_at_three() {
        let now = Utc::now();
        assert_eq!(time_factor(Some(now - Duration::days(7)), now), 1.0);
        assert_eq!(time_factor(Some(now - Duration::days(365)), now), MAX_TIME_FACTOR);
        assert_eq!(time_factor(None, now), NEVER_REVIEWED_TIME_FACTOR);
    }

    #[test]
    fn test_score_rewards_urgency() {
        let now = Utc::now();

        let mut fresh = LearningMetadata::new(now);
        fresh.review_count = 1;
        fresh.last_reviewed = Some(now - Duration::days(10));
        fresh.strength = 1.1;

        let mut consolidated = LearningMetadata::new(now);
        consolidated.review_count = 8;
        consolidated.last_reviewed = Some(now - Duration::days(1));
        consolidated.strength = 9.0;

        let urgent = review_score(Some(&fresh), now);
        let settled = review_score(Some(&consolidated), now);
        assert!(urgent > settled);

        // review_count=1, 10 days ago, strength 1.1:
        // 1/2 * 10/7 * 1/1.1
        let expected = 0.5 * (10.0 / 7.0) / 1.1;
        assert!((urgent - expected).abs() < 1e-9);
    }

    #[test]
    fn test_more_reviews_lower_urgency() {
        assert!(review_factor(0) > review_factor(1));
        assert!(review_factor(1) > review_factor(10));
        assert!(strength_factor(1.0) > strength_factor(10.0));
    }
}
