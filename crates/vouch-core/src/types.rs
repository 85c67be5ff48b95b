use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::VouchError;
use crate::ids::{BusinessId, OpinionId, UserId};

pub const UNCATEGORIZED: &str = "Uncategorized";
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub id: BusinessId,
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_claimed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_by: Option<UserId>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Fields a caller supplies when creating a business explicitly.
#[derive(Debug, Clone, Default)]
pub struct BusinessDraft {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpinionType {
    Complaint,
    Praise,
    Suggestion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpinionStatus {
    Pending,
    #[serde(alias = "reviewed", alias = "under-review")]
    UnderReview,
    Resolved,
    #[serde(alias = "rejected")]
    Dismissed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opinion {
    pub id: OpinionId,
    pub business_id: BusinessId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(rename = "type")]
    pub opinion_type: OpinionType,
    pub title: String,
    pub content: String,
    pub rating: Option<u8>,
    pub status: OpinionStatus,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default = "default_public")]
    pub is_public: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A submission before it has been given an id, timestamp and status.
#[derive(Debug, Clone)]
pub struct OpinionDraft {
    pub business_id: BusinessId,
    pub opinion_type: OpinionType,
    pub title: String,
    pub content: String,
    pub rating: Option<u8>,
    pub is_anonymous: bool,
    pub is_public: bool,
    pub user_id: Option<UserId>,
}

fn default_public() -> bool {
    true
}

impl Business {
    pub fn new(name: &str, category: &str) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: BusinessId::new(),
            name: name.trim().to_string(),
            category: category.to_string(),
            description: None,
            image_url: None,
            website: None,
            phone: None,
            email: None,
            address: None,
            city: None,
            state: None,
            zip_code: None,
            latitude: None,
            longitude: None,
            is_verified: false,
            is_claimed: false,
            claimed_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Case and surrounding whitespace are not significant for name lookups.
    pub fn matches_name(&self, name: &str) -> bool {
        normalize_name(&self.name) == normalize_name(name)
    }
}

pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

impl BusinessDraft {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), VouchError> {
        if self.name.trim().is_empty() {
            return Err(VouchError::Validation("business name is required".to_string()));
        }
        Ok(())
    }

    pub fn into_business(self) -> Business {
        let category = self
            .category
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        let mut business = Business::new(&self.name, &category);
        business.description = self.description;
        business.image_url = self.image_url;
        business.website = self.website;
        business.phone = self.phone;
        business.email = self.email;
        business.address = self.address;
        business.city = self.city;
        business.state = self.state;
        business.zip_code = self.zip_code;
        business.latitude = self.latitude;
        business.longitude = self.longitude;
        business
    }
}

impl OpinionDraft {
    /// Checks the fields a submission form requires before anything is stored.
    pub fn validate(&self) -> Result<(), VouchError> {
        if self.business_id.0.trim().is_empty() {
            return Err(VouchError::Validation("business is required".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(VouchError::Validation("title is required".to_string()));
        }
        if self.content.trim().is_empty() {
            return Err(VouchError::Validation("content is required".to_string()));
        }
        match self.rating {
            None => Err(VouchError::Validation("a rating must be chosen".to_string())),
            Some(rating) if !(MIN_RATING..=MAX_RATING).contains(&rating) => Err(
                VouchError::Validation(format!(
                    "rating {rating} is outside {MIN_RATING}..={MAX_RATING}"
                )),
            ),
            Some(_) => Ok(()),
        }
    }
}

impl OpinionStatus {
    /// Business-side review moves an opinion forward, never back.
    pub fn can_transition_to(self, next: OpinionStatus) -> bool {
        use OpinionStatus::*;
        matches!(
            (self, next),
            (Pending, UnderReview)
                | (Pending, Resolved)
                | (Pending, Dismissed)
                | (UnderReview, Resolved)
                | (UnderReview, Dismissed)
        )
    }

    pub fn is_open(self) -> bool {
        match self {
            OpinionStatus::Pending | OpinionStatus::UnderReview => true,
            OpinionStatus::Resolved | OpinionStatus::Dismissed => false,
        }
    }
}

impl FromStr for OpinionType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "complaint" => Ok(OpinionType::Complaint),
            "praise" => Ok(OpinionType::Praise),
            "suggestion" => Ok(OpinionType::Suggestion),
            _ => Err(format!("unknown opinion type: {value}")),
        }
    }
}

impl fmt::Display for OpinionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            OpinionType::Complaint => "complaint",
            OpinionType::Praise => "praise",
            OpinionType::Suggestion => "suggestion",
        };
        write!(f, "{value}")
    }
}

impl FromStr for OpinionStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "pending" => Ok(OpinionStatus::Pending),
            "under_review" | "under-review" | "reviewed" => Ok(OpinionStatus::UnderReview),
            "resolved" => Ok(OpinionStatus::Resolved),
            "dismissed" | "rejected" => Ok(OpinionStatus::Dismissed),
            _ => Err(format!("unknown opinion status: {value}")),
        }
    }
}

impl fmt::Display for OpinionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            OpinionStatus::Pending => "pending",
            OpinionStatus::UnderReview => "under_review",
            OpinionStatus::Resolved => "resolved",
            OpinionStatus::Dismissed => "dismissed",
        };
        write!(f, "{value}")
    }
}
