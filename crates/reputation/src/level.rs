use std::fmt;

use serde::{Deserialize, Serialize};

use vouch_core::config::{LevelPolicy, TrustConfig};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TrustLevel {
    Verified,
    Pending,
    UnderReview,
    Flagged,
}

/// Display bucket for a numeric score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrustBand {
    Excellent,
    Good,
    Okay,
    Poor,
    Terrible,
}

impl TrustLevel {
    /// Under the default policy the score is informational only: a verified
    /// business is `Verified` whatever its score.
    pub fn derive(config: &TrustConfig, is_verified: bool, trust_score: f64) -> Self {
        match config.level_policy {
            LevelPolicy::VerificationOnly => Self::from_verification(is_verified),
            LevelPolicy::Banded => {
                if trust_score < config.flagged_below {
                    TrustLevel::Flagged
                } else if trust_score < config.under_review_below {
                    TrustLevel::UnderReview
                } else {
                    Self::from_verification(is_verified)
                }
            }
        }
    }

    fn from_verification(is_verified: bool) -> Self {
        if is_verified {
            TrustLevel::Verified
        } else {
            TrustLevel::Pending
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrustLevel::Verified => "Verified",
            TrustLevel::Pending => "Pending",
            TrustLevel::UnderReview => "Under Review",
            TrustLevel::Flagged => "Flagged",
        }
    }
}

impl TrustBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            TrustBand::Excellent
        } else if score >= 60.0 {
            TrustBand::Good
        } else if score >= 40.0 {
            TrustBand::Okay
        } else if score >= 20.0 {
            TrustBand::Poor
        } else {
            TrustBand::Terrible
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TrustBand::Excellent => "Excellent",
            TrustBand::Good => "Good",
            TrustBand::Okay => "Okay",
            TrustBand::Poor => "Poor",
            TrustBand::Terrible => "Terrible",
        }
    }
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            TrustLevel::Verified => "verified",
            TrustLevel::Pending => "pending",
            TrustLevel::UnderReview => "under-review",
            TrustLevel::Flagged => "flagged",
        };
        write!(f, "{value}")
    }
}
