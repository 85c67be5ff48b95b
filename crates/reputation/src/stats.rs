use serde::{Deserialize, Serialize};

use vouch_core::config::TrustConfig;
use vouch_core::types::{Opinion, OpinionStatus, OpinionType};

/// Counters shown on a business owner's dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessStats {
    pub total_opinions: u32,
    pub complaints: u32,
    pub praise: u32,
    pub suggestions: u32,
    pub pending: u32,
    pub open: u32,
    pub average_rating: Option<f64>,
}

impl BusinessStats {
    pub fn from_opinions<'a, I>(config: &TrustConfig, opinions: I) -> Self
    where
        I: IntoIterator<Item = &'a Opinion>,
    {
        let mut stats = BusinessStats {
            total_opinions: 0,
            complaints: 0,
            praise: 0,
            suggestions: 0,
            pending: 0,
            open: 0,
            average_rating: None,
        };
        let mut rating_sum = 0.0;

        for opinion in opinions {
            stats.total_opinions = stats.total_opinions.saturating_add(1);
            rating_sum += opinion
                .rating
                .map(f64::from)
                .unwrap_or(config.missing_rating);
            match opinion.opinion_type {
                OpinionType::Complaint => stats.complaints = stats.complaints.saturating_add(1),
                OpinionType::Praise => stats.praise = stats.praise.saturating_add(1),
                OpinionType::Suggestion => stats.suggestions = stats.suggestions.saturating_add(1),
            }
            if opinion.status == OpinionStatus::Pending {
                stats.pending = stats.pending.saturating_add(1);
            }
            if opinion.status.is_open() {
                stats.open = stats.open.saturating_add(1);
            }
        }

        if stats.total_opinions > 0 {
            stats.average_rating = Some(rating_sum / f64::from(stats.total_opinions));
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use vouch_core::ids::{BusinessId, OpinionId};

    fn opinion(opinion_type: OpinionType, status: OpinionStatus, rating: Option<u8>) -> Opinion {
        Opinion {
            id: OpinionId::new(),
            business_id: BusinessId::from("1"),
            user_id: None,
            opinion_type,
            title: "t".to_string(),
            content: "c".to_string(),
            rating,
            status,
            is_anonymous: true,
            is_public: true,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn counts_by_type_and_status() {
        let opinions = vec![
            opinion(OpinionType::Complaint, OpinionStatus::Pending, Some(1)),
            opinion(OpinionType::Complaint, OpinionStatus::Resolved, Some(2)),
            opinion(OpinionType::Praise, OpinionStatus::UnderReview, None),
            opinion(OpinionType::Suggestion, OpinionStatus::Dismissed, Some(4)),
        ];
        let stats = BusinessStats::from_opinions(&TrustConfig::default(), &opinions);
        assert_eq!(stats.total_opinions, 4);
        assert_eq!(stats.complaints, 2);
        assert_eq!(stats.praise, 1);
        assert_eq!(stats.suggestions, 1);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.open, 2);
        assert_eq!(stats.average_rating, Some(2.5));
    }

    #[test]
    fn no_opinions_has_no_average() {
        let none: Vec<Opinion> = Vec::new();
        let stats = BusinessStats::from_opinions(&TrustConfig::default(), &none);
        assert_eq!(stats.total_opinions, 0);
        assert_eq!(stats.average_rating, None);
    }
}
