//! A session over the record store.
//!
//! The registry owns the in-memory business and opinion collections for the
//! lifetime of a session. All mutation goes through it, and every mutation
//! rewrites the affected collection in the store before returning. If the
//! write fails the in-memory change is rolled back and the error is returned.

use time::OffsetDateTime;
use tracing::{debug, info};

use reputation::{compute_trust_profile_with, BusinessStats, TrustProfile};
use vouch_core::config::{Config, TrustConfig};
use vouch_core::error::VouchError;
use vouch_core::ids::{BusinessId, OpinionId, UserId};
use vouch_core::source::{ConnectionState, DataSource};
use vouch_core::store::RecordStore;
use vouch_core::types::{
    Business, BusinessDraft, Opinion, OpinionDraft, OpinionStatus, UNCATEGORIZED,
};

pub mod search;

pub use search::ALL_CATEGORIES;

pub struct Registry {
    store: RecordStore,
    trust: TrustConfig,
    businesses: Vec<Business>,
    opinions: Vec<Opinion>,
}

impl Registry {
    /// Connects the data source and loads both collections.
    pub fn open(mut store: RecordStore, trust: TrustConfig) -> Self {
        store.connection();
        let businesses = store.load_businesses();
        let opinions = store.load_opinions();
        debug!(
            businesses = businesses.len(),
            opinions = opinions.len(),
            "registry opened"
        );
        Self {
            store,
            trust,
            businesses,
            opinions,
        }
    }

    pub fn from_config(config: &Config, source: DataSource) -> Self {
        let store = RecordStore::new(source, &config.storage);
        Self::open(store, config.trust.clone())
    }

    pub fn connection(&self) -> &ConnectionState {
        self.store.source().state()
    }

    pub fn trust_config(&self) -> &TrustConfig {
        &self.trust
    }

    pub fn list_businesses(&self) -> &[Business] {
        &self.businesses
    }

    /// All opinions, or only those about one business, in submission order.
    pub fn list_opinions(&self, business_id: Option<&BusinessId>) -> Vec<&Opinion> {
        self.opinions
            .iter()
            .filter(|opinion| business_id.map_or(true, |id| &opinion.business_id == id))
            .collect()
    }

    pub fn business(&self, id: &BusinessId) -> Option<&Business> {
        self.businesses.iter().find(|business| &business.id == id)
    }

    pub fn opinion(&self, id: &OpinionId) -> Option<&Opinion> {
        self.opinions.iter().find(|opinion| &opinion.id == id)
    }

    /// First business whose trimmed, lower-cased name equals `name`'s.
    pub fn find_business_by_name(&self, name: &str) -> Option<&Business> {
        self.businesses.iter().find(|business| business.matches_name(name))
    }

    /// Looks a business up by free-text name, creating an `Uncategorized`
    /// one if nothing matches.
    pub fn resolve_or_create_business(&mut self, name: &str) -> Result<Business, VouchError> {
        if let Some(existing) = self.find_business_by_name(name) {
            return Ok(existing.clone());
        }
        let business = Business::new(name, UNCATEGORIZED);
        self.insert_business(business)
    }

    pub fn create_business(&mut self, draft: BusinessDraft) -> Result<Business, VouchError> {
        draft.validate()?;
        self.insert_business(draft.into_business())
    }

    fn insert_business(&mut self, business: Business) -> Result<Business, VouchError> {
        self.businesses.push(business.clone());
        if let Err(err) = self.store.save_businesses(&self.businesses) {
            self.businesses.pop();
            return Err(err);
        }
        info!(id = %business.id, name = %business.name, "created business");
        Ok(business)
    }

    /// Records a new opinion as `pending`.
    ///
    /// Field validation is the caller's job (see [`OpinionDraft::validate`]);
    /// only the reference to an existing business is checked here.
    pub fn submit_opinion(&mut self, draft: OpinionDraft) -> Result<Opinion, VouchError> {
        if self.business(&draft.business_id).is_none() {
            return Err(VouchError::NotFound(format!("business {}", draft.business_id)));
        }
        let opinion = Opinion {
            id: OpinionId::new(),
            business_id: draft.business_id,
            user_id: draft.user_id,
            opinion_type: draft.opinion_type,
            title: draft.title,
            content: draft.content,
            rating: draft.rating,
            status: OpinionStatus::Pending,
            is_anonymous: draft.is_anonymous,
            is_public: draft.is_public,
            created_at: OffsetDateTime::now_utc(),
        };
        self.opinions.push(opinion.clone());
        if let Err(err) = self.store.save_opinions(&self.opinions) {
            self.opinions.pop();
            return Err(err);
        }
        info!(id = %opinion.id, business = %opinion.business_id, kind = %opinion.opinion_type, "opinion submitted");
        Ok(opinion)
    }

    /// Moves an opinion along the review workflow.
    pub fn update_opinion_status(
        &mut self,
        id: &OpinionId,
        status: OpinionStatus,
    ) -> Result<Opinion, VouchError> {
        let index = self
            .opinions
            .iter()
            .position(|opinion| &opinion.id == id)
            .ok_or_else(|| VouchError::NotFound(format!("opinion {id}")))?;
        let previous = self.opinions[index].status;
        if !previous.can_transition_to(status) {
            return Err(VouchError::InvalidTransition(format!(
                "opinion {id} cannot move from {previous} to {status}"
            )));
        }
        self.opinions[index].status = status;
        if let Err(err) = self.store.save_opinions(&self.opinions) {
            self.opinions[index].status = previous;
            return Err(err);
        }
        info!(%id, from = %previous, to = %status, "opinion status changed");
        Ok(self.opinions[index].clone())
    }

    /// Marks a business as claimed by `user_id`. Claiming again as the same
    /// user is a no-op.
    pub fn claim_business(&mut self, id: &BusinessId, user_id: &UserId) -> Result<Business, VouchError> {
        let index = self.business_index(id)?;
        let business = &self.businesses[index];
        match &business.claimed_by {
            Some(owner) if owner == user_id => return Ok(business.clone()),
            Some(owner) => {
                return Err(VouchError::InvalidTransition(format!(
                    "business {id} is already claimed by {owner}"
                )))
            }
            None => {}
        }
        self.update_business(index, |business| {
            business.is_claimed = true;
            business.claimed_by = Some(user_id.clone());
        })
    }

    pub fn verify_business(&mut self, id: &BusinessId) -> Result<Business, VouchError> {
        let index = self.business_index(id)?;
        if self.businesses[index].is_verified {
            return Ok(self.businesses[index].clone());
        }
        self.update_business(index, |business| business.is_verified = true)
    }

    fn business_index(&self, id: &BusinessId) -> Result<usize, VouchError> {
        self.businesses
            .iter()
            .position(|business| &business.id == id)
            .ok_or_else(|| VouchError::NotFound(format!("business {id}")))
    }

    fn update_business<F>(&mut self, index: usize, apply: F) -> Result<Business, VouchError>
    where
        F: FnOnce(&mut Business),
    {
        let previous = self.businesses[index].clone();
        let business = &mut self.businesses[index];
        apply(business);
        business.updated_at = OffsetDateTime::now_utc();
        if let Err(err) = self.store.save_businesses(&self.businesses) {
            self.businesses[index] = previous;
            return Err(err);
        }
        let business = self.businesses[index].clone();
        info!(id = %business.id, "business updated");
        Ok(business)
    }

    pub fn businesses_claimed_by(&self, user_id: &UserId) -> Vec<&Business> {
        self.businesses
            .iter()
            .filter(|business| business.claimed_by.as_ref() == Some(user_id))
            .collect()
    }

    pub fn search_businesses(&self, query: &str, category: Option<&str>) -> Vec<&Business> {
        search::search_businesses(&self.businesses, query, category)
    }

    pub fn trust_profile(&self, id: &BusinessId) -> Result<TrustProfile, VouchError> {
        let business = self
            .business(id)
            .ok_or_else(|| VouchError::NotFound(format!("business {id}")))?;
        let opinions = self.list_opinions(Some(id));
        Ok(compute_trust_profile_with(
            &self.trust,
            opinions.into_iter(),
            business.is_verified,
        ))
    }

    pub fn business_stats(&self, id: &BusinessId) -> Result<BusinessStats, VouchError> {
        if self.business(id).is_none() {
            return Err(VouchError::NotFound(format!("business {id}")));
        }
        Ok(BusinessStats::from_opinions(
            &self.trust,
            self.list_opinions(Some(id)).into_iter(),
        ))
    }
}
