use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use registry::Registry;
use reputation::{BusinessStats, TrustProfile};
use vouch_core::ids::{BusinessId, UserId};
use vouch_core::types::{Business, BusinessDraft};

use super::{find_business, open_registry};

#[derive(Debug)]
pub enum BusinessAction {
    List { json: bool },
    Search { query: String, category: Option<String>, json: bool },
    Add(BusinessDraft),
    Show { business: String, json: bool },
    Claim { id: BusinessId, user: UserId },
    Verify { id: BusinessId },
    Claimed { user: UserId },
}

#[derive(Debug, Serialize)]
struct BusinessSummary<'a> {
    #[serde(flatten)]
    business: &'a Business,
    trust: TrustProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<BusinessStats>,
}

pub fn execute(config_path: Option<PathBuf>, action: BusinessAction) -> Result<()> {
    let (_, _, mut registry) = open_registry(config_path)?;

    match action {
        BusinessAction::List { json } => {
            print_businesses(&registry, registry.list_businesses().iter().collect(), json)?;
        }
        BusinessAction::Search {
            query,
            category,
            json,
        } => {
            let found = registry.search_businesses(&query, category.as_deref());
            print_businesses(&registry, found, json)?;
        }
        BusinessAction::Add(draft) => {
            let business = registry.create_business(draft)?;
            println!("Added {} ({})", business.name, business.id);
        }
        BusinessAction::Show { business, json } => {
            let business = find_business(&registry, &business)?;
            let trust = registry.trust_profile(&business.id)?;
            let stats = registry.business_stats(&business.id)?;
            if json {
                let summary = BusinessSummary {
                    business,
                    trust,
                    stats: Some(stats),
                };
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", business_line(business, &trust));
                println!(
                    "Trust: {}/100 {} ({})",
                    trust.display_score(),
                    trust.band().label(),
                    trust.trust_level.label()
                );
                println!(
                    "Opinions: {} ({} complaints, {} praise, {} suggestions, {} pending)",
                    stats.total_opinions, stats.complaints, stats.praise, stats.suggestions, stats.pending
                );
                if let Some(claimed_by) = &business.claimed_by {
                    println!("Claimed by: {claimed_by}");
                }
            }
        }
        BusinessAction::Claim { id, user } => {
            let business = registry.claim_business(&id, &user)?;
            println!("{} is now claimed by {}", business.name, user);
        }
        BusinessAction::Verify { id } => {
            let business = registry.verify_business(&id)?;
            println!("{} is verified", business.name);
        }
        BusinessAction::Claimed { user } => {
            let claimed = registry.businesses_claimed_by(&user);
            if claimed.is_empty() {
                println!("No claimed businesses for {user}");
            }
            print_businesses(&registry, claimed, false)?;
        }
    }
    Ok(())
}

fn print_businesses(registry: &Registry, businesses: Vec<&Business>, json: bool) -> Result<()> {
    let mut summaries = Vec::with_capacity(businesses.len());
    for business in businesses {
        let trust = registry.trust_profile(&business.id)?;
        summaries.push(BusinessSummary {
            business,
            trust,
            stats: None,
        });
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }
    for summary in &summaries {
        println!("{}", business_line(summary.business, &summary.trust));
    }
    Ok(())
}

fn business_line(business: &Business, trust: &TrustProfile) -> String {
    format!(
        "{id:>8}  {name} [{category}]  trust {score} {level}  rating {rating} ({count} reviews)",
        id = business.id,
        name = business.name,
        category = business.category,
        score = trust.display_score(),
        level = trust.trust_level,
        rating = trust.display_rating(),
        count = trust.review_count,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use reputation::compute_trust_profile;
    use vouch_core::seed::seed_businesses;
    use vouch_core::types::Opinion;

    #[test]
    fn line_shows_neutral_profile_for_new_business() {
        let business = &seed_businesses()[3];
        let none: Vec<Opinion> = Vec::new();
        let trust = compute_trust_profile(&none, business.is_verified);
        let line = business_line(business, &trust);
        assert!(line.contains("The Tiny Needle [Tailoring]"));
        assert!(line.contains("trust 50 pending"));
        assert!(line.contains("rating N/A (0 reviews)"));
    }

    #[test]
    fn summary_json_flattens_business() {
        let business = &seed_businesses()[0];
        let none: Vec<Opinion> = Vec::new();
        let summary = BusinessSummary {
            business,
            trust: compute_trust_profile(&none, true),
            stats: None,
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["name"], "Reflection Beauty Clinic");
        assert_eq!(value["trust"]["trust_level"], "verified");
        assert!(value.get("stats").is_none());
    }
}
