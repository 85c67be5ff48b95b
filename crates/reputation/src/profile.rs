use serde::{Deserialize, Serialize};

use vouch_core::config::TrustConfig;
use vouch_core::types::{Opinion, OpinionType};

use crate::level::{TrustBand, TrustLevel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustProfile {
    /// Always within `[min_score, max_score]`. Never rounded.
    pub trust_score: f64,
    pub trust_level: TrustLevel,
    pub average_rating: Option<f64>,
    pub review_count: usize,
}

impl TrustProfile {
    pub fn band(&self) -> TrustBand {
        TrustBand::from_score(self.trust_score)
    }

    pub fn display_score(&self) -> u32 {
        self.trust_score.round() as u32
    }

    pub fn display_rating(&self) -> String {
        match self.average_rating {
            Some(rating) => format!("{rating:.1}"),
            None => "N/A".to_string(),
        }
    }
}

/// Scores one business's opinions with the default weights.
pub fn compute_trust_profile<'a, I>(opinions: I, is_verified: bool) -> TrustProfile
where
    I: IntoIterator<Item = &'a Opinion>,
{
    compute_trust_profile_with(&TrustConfig::default(), opinions, is_verified)
}

/// Scores one business's opinions.
///
/// The score is the mean rating scaled to 100, plus a bonus per praise, minus
/// a penalty per complaint, clamped to the configured range. Suggestions only
/// count towards the rating mean and the review count. An opinion with no
/// rating contributes `missing_rating` to the mean.
pub fn compute_trust_profile_with<'a, I>(
    config: &TrustConfig,
    opinions: I,
    is_verified: bool,
) -> TrustProfile
where
    I: IntoIterator<Item = &'a Opinion>,
{
    let mut review_count = 0usize;
    let mut rating_sum = 0.0;
    let mut complaints = 0usize;
    let mut praise = 0usize;

    for opinion in opinions {
        review_count += 1;
        rating_sum += opinion
            .rating
            .map(f64::from)
            .unwrap_or(config.missing_rating);
        match opinion.opinion_type {
            OpinionType::Complaint => complaints += 1,
            OpinionType::Praise => praise += 1,
            OpinionType::Suggestion => {}
        }
    }

    if review_count == 0 {
        let trust_score = config.neutral_score;
        return TrustProfile {
            trust_score,
            trust_level: TrustLevel::derive(config, is_verified, trust_score),
            average_rating: None,
            review_count: 0,
        };
    }

    let average_rating = rating_sum / review_count as f64;
    let raw_score = (average_rating / 5.0) * 100.0 + config.praise_bonus * praise as f64
        - config.complaint_penalty * complaints as f64;
    let trust_score = raw_score.clamp(config.min_score, config.max_score);

    TrustProfile {
        trust_score,
        trust_level: TrustLevel::derive(config, is_verified, trust_score),
        average_rating: Some(average_rating),
        review_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use vouch_core::ids::{BusinessId, OpinionId};
    use vouch_core::types::OpinionStatus;

    fn opinion(opinion_type: OpinionType, rating: Option<u8>) -> Opinion {
        Opinion {
            id: OpinionId::new(),
            business_id: BusinessId::from("2"),
            user_id: None,
            opinion_type,
            title: "t".to_string(),
            content: "c".to_string(),
            rating,
            status: OpinionStatus::Pending,
            is_anonymous: false,
            is_public: true,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn empty_set_is_neutral() {
        let none: Vec<Opinion> = Vec::new();
        let profile = compute_trust_profile(&none, true);
        assert_eq!(profile.trust_score, 50.0);
        assert_eq!(profile.average_rating, None);
        assert_eq!(profile.review_count, 0);
        assert_eq!(profile.display_rating(), "N/A");
    }

    #[test]
    fn marys_kitchen_scenario() {
        let opinions = vec![
            opinion(OpinionType::Praise, Some(5)),
            opinion(OpinionType::Praise, Some(5)),
            opinion(OpinionType::Complaint, Some(1)),
        ];
        let profile = compute_trust_profile(&opinions, true);
        let average = profile.average_rating.unwrap();
        assert!((average - 11.0 / 3.0).abs() < 1e-9);
        assert!((profile.trust_score - (average / 5.0 * 100.0 + 10.0 - 5.0)).abs() < 1e-9);
        assert!((profile.trust_score - 78.333).abs() < 0.01);
        assert_eq!(profile.review_count, 3);
        assert_eq!(profile.trust_level, TrustLevel::Verified);
        assert_eq!(profile.display_score(), 78);
    }

    #[test]
    fn missing_rating_counts_as_three() {
        let opinions = vec![opinion(OpinionType::Suggestion, None)];
        let profile = compute_trust_profile(&opinions, false);
        assert_eq!(profile.average_rating, Some(3.0));
        assert_eq!(profile.trust_score, 60.0);
    }

    #[test]
    fn suggestions_count_as_reviews_without_bonus() {
        let opinions = vec![
            opinion(OpinionType::Suggestion, Some(4)),
            opinion(OpinionType::Suggestion, Some(4)),
        ];
        let profile = compute_trust_profile(&opinions, false);
        assert_eq!(profile.review_count, 2);
        assert_eq!(profile.trust_score, 80.0);
    }

    #[test]
    fn score_clamps_high() {
        let opinions: Vec<_> = (0..4).map(|_| opinion(OpinionType::Praise, Some(5))).collect();
        let profile = compute_trust_profile(&opinions, true);
        assert_eq!(profile.trust_score, 100.0);
    }

    #[test]
    fn score_clamps_low() {
        let opinions: Vec<_> = (0..5).map(|_| opinion(OpinionType::Complaint, Some(1))).collect();
        let profile = compute_trust_profile(&opinions, true);
        assert_eq!(profile.trust_score, 10.0);
        assert_eq!(profile.band(), TrustBand::Terrible);
    }

    #[test]
    fn unverified_is_always_pending() {
        let glowing: Vec<_> = (0..3).map(|_| opinion(OpinionType::Praise, Some(5))).collect();
        let dismal: Vec<_> = (0..3).map(|_| opinion(OpinionType::Complaint, Some(1))).collect();
        assert_eq!(compute_trust_profile(&glowing, false).trust_level, TrustLevel::Pending);
        assert_eq!(compute_trust_profile(&dismal, false).trust_level, TrustLevel::Pending);
    }

    #[test]
    fn custom_weights_apply() {
        let config = TrustConfig {
            complaint_penalty: 20.0,
            ..TrustConfig::default()
        };
        let opinions = vec![opinion(OpinionType::Complaint, Some(5))];
        let profile = compute_trust_profile_with(&config, &opinions, true);
        assert_eq!(profile.trust_score, 80.0);
    }
}
