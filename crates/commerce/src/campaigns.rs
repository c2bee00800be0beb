//! Marketing campaigns: lifecycle, attribution, ROI.
//!
//! There is no scheduler. Expiry is applied lazily: every read boundary runs
//! the pure [`reconcile`] function and persists any transition it produced.
//! Archiving is a soft delete; orders keep their campaign reference so
//! historical ROI still computes.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tech_haven_core::{CampaignId, CampaignStatus};
use tracing::{info, instrument};

use crate::error::{CommerceError, Result};
use crate::models::{Campaign, CampaignInput, CampaignRoi, Order};
use crate::store::{Filter, ResourceStore};

/// Apply lazy expiry to one campaign.
///
/// An `Active` campaign whose end date is strictly in the past becomes
/// `Completed`. Everything else, including `Archived`, is untouched. A
/// campaign is live through the whole of its end date.
#[must_use]
pub fn reconcile(mut campaign: Campaign, today: NaiveDate) -> Campaign {
    if campaign.status == CampaignStatus::Active && campaign.end_date < today {
        campaign.status = CampaignStatus::Completed;
    }
    campaign
}

/// Campaign service over a resource store.
#[derive(Clone)]
pub struct CampaignService<S> {
    store: S,
}

impl<S: ResourceStore> CampaignService<S> {
    /// Create a new campaign service.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Launch a campaign.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::Validation`] for an empty name, a negative
    /// budget, or an end date before the start date, or
    /// [`CommerceError::Store`] if persisting fails.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn launch(&self, input: CampaignInput) -> Result<Campaign> {
        if input.name.trim().is_empty() {
            return Err(CommerceError::Validation("campaign name is required".into()));
        }
        if input.budget < Decimal::ZERO {
            return Err(CommerceError::Validation(
                "campaign budget cannot be negative".into(),
            ));
        }
        if input.end_date < input.start_date {
            return Err(CommerceError::Validation(
                "campaign end date cannot be before its start date".into(),
            ));
        }

        let campaign = Campaign {
            id: CampaignId::generate(),
            name: input.name,
            target_audience: input.target_audience,
            budget: input.budget,
            start_date: input.start_date,
            end_date: input.end_date,
            status: CampaignStatus::Active,
        };
        let created = self
            .store
            .create(&campaign)
            .await
            .map_err(CommerceError::store("launch"))?;
        info!(campaign_id = %created.id, "campaign launched");
        Ok(created)
    }

    /// Fetch one campaign, reconciled.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::NotFound`] for an unknown id, or
    /// [`CommerceError::Store`] on store failure.
    pub async fn get(&self, id: CampaignId) -> Result<Campaign> {
        let campaign: Campaign = self
            .store
            .get(&id.to_string())
            .await
            .map_err(CommerceError::store("get"))?;
        self.persist_if_expired(campaign, Utc::now().date_naive())
            .await
    }

    /// List campaigns (active and completed; archived are hidden).
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::Store`] on store failure.
    pub async fn list(&self) -> Result<Vec<Campaign>> {
        Ok(self
            .reconciled_list()
            .await?
            .into_iter()
            .filter(|campaign| campaign.status != CampaignStatus::Archived)
            .collect())
    }

    /// List only campaigns still running.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::Store`] on store failure.
    pub async fn list_active(&self) -> Result<Vec<Campaign>> {
        Ok(self
            .reconciled_list()
            .await?
            .into_iter()
            .filter(|campaign| campaign.status == CampaignStatus::Active)
            .collect())
    }

    /// Archive a campaign (soft delete).
    ///
    /// Idempotent. Attributed orders are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::NotFound`] for an unknown id, or
    /// [`CommerceError::Store`] on store failure.
    #[instrument(skip(self))]
    pub async fn archive(&self, id: CampaignId) -> Result<Campaign> {
        let mut campaign: Campaign = self
            .store
            .get(&id.to_string())
            .await
            .map_err(CommerceError::store("archive"))?;
        campaign.status = CampaignStatus::Archived;
        self.store
            .replace(&id.to_string(), &campaign)
            .await
            .map_err(CommerceError::store("archive"))
    }

    /// Compute a campaign's return on investment.
    ///
    /// Revenue counts only delivered orders attributed to the campaign;
    /// pending, shipped, and cancelled attribution contributes nothing. ROI
    /// is revenue minus budget and may be negative. Works for archived
    /// campaigns too.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::NotFound`] for an unknown id, or
    /// [`CommerceError::Store`] on store failure.
    #[instrument(skip(self))]
    pub async fn roi(&self, id: CampaignId) -> Result<CampaignRoi> {
        let campaign: Campaign = self
            .store
            .get(&id.to_string())
            .await
            .map_err(CommerceError::store("roi"))?;

        let delivered: Vec<Order> = self
            .store
            .list(&Filter::new().eq("campaignId", id).eq("status", "delivered"))
            .await
            .map_err(CommerceError::store("roi"))?;

        let revenue: Decimal = delivered.iter().map(|order| order.total).sum();
        Ok(CampaignRoi {
            revenue,
            roi: revenue - campaign.budget,
            order_count: delivered.len(),
        })
    }

    async fn reconciled_list(&self) -> Result<Vec<Campaign>> {
        let today = Utc::now().date_naive();
        let campaigns: Vec<Campaign> = self
            .store
            .list(&Filter::new())
            .await
            .map_err(CommerceError::store("list"))?;

        let mut reconciled = Vec::with_capacity(campaigns.len());
        for campaign in campaigns {
            reconciled.push(self.persist_if_expired(campaign, today).await?);
        }
        Ok(reconciled)
    }

    /// Run [`reconcile`] and write back any transition it produced.
    async fn persist_if_expired(&self, campaign: Campaign, today: NaiveDate) -> Result<Campaign> {
        let before = campaign.status;
        let updated = reconcile(campaign, today);
        if updated.status != before {
            info!(campaign_id = %updated.id, "campaign expired, marking completed");
            return self
                .store
                .replace(&updated.id.to_string(), &updated)
                .await
                .map_err(CommerceError::store("reconcile"));
        }
        Ok(updated)
    }
}
