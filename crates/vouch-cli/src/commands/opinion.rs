use std::path::PathBuf;

use anyhow::Result;

use vouch_core::error::VouchError;
use vouch_core::ids::{BusinessId, OpinionId, UserId};
use vouch_core::types::{Opinion, OpinionDraft, OpinionStatus, OpinionType};

use super::open_registry;

#[derive(Debug)]
pub struct SubmitInputs {
    pub business: String,
    pub opinion_type: OpinionType,
    pub title: String,
    pub content: String,
    pub rating: Option<u8>,
    pub is_anonymous: bool,
    pub is_public: bool,
    pub user_id: Option<UserId>,
}

#[derive(Debug)]
pub enum OpinionAction {
    Submit(SubmitInputs),
    List { business: Option<BusinessId>, json: bool },
    Status { id: OpinionId, status: OpinionStatus },
}

pub fn execute(config_path: Option<PathBuf>, action: OpinionAction) -> Result<()> {
    let (_, _, mut registry) = open_registry(config_path)?;

    match action {
        OpinionAction::Submit(inputs) => {
            if inputs.business.trim().is_empty() {
                return Err(VouchError::Validation("business name is required".to_string()).into());
            }
            // A rejected form must not create a business.
            let mut draft = OpinionDraft {
                business_id: BusinessId::from(inputs.business.trim()),
                opinion_type: inputs.opinion_type,
                title: inputs.title,
                content: inputs.content,
                rating: inputs.rating,
                is_anonymous: inputs.is_anonymous,
                is_public: inputs.is_public,
                user_id: inputs.user_id,
            };
            draft.validate()?;
            let business = registry.resolve_or_create_business(&inputs.business)?;
            draft.business_id = business.id.clone();
            let opinion = registry.submit_opinion(draft)?;
            println!("Submitted {} about {} ({})", opinion.opinion_type, business.name, opinion.id);
        }
        OpinionAction::List { business, json } => {
            let opinions = registry.list_opinions(business.as_ref());
            if json {
                println!("{}", serde_json::to_string_pretty(&opinions)?);
            } else {
                for opinion in opinions {
                    println!("{}", opinion_line(opinion));
                }
            }
        }
        OpinionAction::Status { id, status } => {
            let opinion = registry.update_opinion_status(&id, status)?;
            println!("Opinion {} is now {}", opinion.id, opinion.status);
        }
    }
    Ok(())
}

fn opinion_line(opinion: &Opinion) -> String {
    let author = match (&opinion.user_id, opinion.is_anonymous) {
        (Some(user), false) => user.to_string(),
        _ => "anonymous".to_string(),
    };
    let rating = opinion
        .rating
        .map(|rating| format!("{rating}/5"))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{id}  {kind:<10} {status:<12} {rating:>3}  {title} by {author}",
        id = opinion.id,
        kind = opinion.opinion_type.to_string(),
        status = opinion.status.to_string(),
        title = opinion.title,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    #[test]
    fn anonymous_opinions_hide_author() {
        let opinion = Opinion {
            id: OpinionId::from("o-1"),
            business_id: BusinessId::from("1"),
            user_id: Some(UserId::from("ada")),
            opinion_type: OpinionType::Complaint,
            title: "Overcharged".to_string(),
            content: "Billed twice".to_string(),
            rating: Some(1),
            status: OpinionStatus::Pending,
            is_anonymous: true,
            is_public: true,
            created_at: OffsetDateTime::now_utc(),
        };
        let line = opinion_line(&opinion);
        assert!(line.contains("by anonymous"));
        assert!(!line.contains("ada"));
        assert!(line.contains("1/5"));
    }
}
