//! The commerce engine's composition root.

use std::sync::Arc;

use tech_haven_core::{CampaignId, CustomerId, OrderId};
use tracing::instrument;

use crate::campaigns::CampaignService;
use crate::catalog::CatalogService;
use crate::config::CommerceConfig;
use crate::error::{CommerceError, Result};
use crate::fulfillment::{FulfillmentService, FulfillmentUpdate};
use crate::loyalty::{AwardOutcome, LoyaltyService};
use crate::models::{CampaignRoi, CheckoutInput, Order};
use crate::orders::OrderService;
use crate::session::Session;
use crate::store::{ResourceStore, RestStore, StoreError};

/// The wired-up commerce engine.
///
/// One store, every service sharing it, behind an `Arc` so handles are cheap
/// to clone into tasks. Single-service calls go through the accessors; the
/// methods here are the operations that span services or touch the session.
#[derive(Clone)]
pub struct Commerce<S: ResourceStore> {
    inner: Arc<CommerceInner<S>>,
}

struct CommerceInner<S: ResourceStore> {
    config: CommerceConfig,
    store: S,
    catalog: CatalogService<S>,
    orders: OrderService<S>,
    fulfillment: FulfillmentService<S>,
    loyalty: LoyaltyService<S>,
    campaigns: CampaignService<S>,
}

impl Commerce<RestStore> {
    /// Wire the engine over the REST store the configuration points at.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the HTTP client cannot be built.
    pub fn connect(config: CommerceConfig) -> std::result::Result<Self, StoreError> {
        let store = RestStore::new(&config.store)?;
        Ok(Self::new(config, store))
    }
}

impl<S: ResourceStore> Commerce<S> {
    /// Wire the engine over an arbitrary store.
    #[must_use]
    pub fn new(config: CommerceConfig, store: S) -> Self {
        let loyalty = LoyaltyService::new(store.clone());
        Self {
            inner: Arc::new(CommerceInner {
                catalog: CatalogService::new(store.clone()),
                orders: OrderService::new(store.clone()),
                fulfillment: FulfillmentService::new(store.clone(), loyalty.clone()),
                loyalty,
                campaigns: CampaignService::new(store.clone()),
                config,
                store,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &CommerceConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.inner.store
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogService<S> {
        &self.inner.catalog
    }

    #[must_use]
    pub fn orders(&self) -> &OrderService<S> {
        &self.inner.orders
    }

    #[must_use]
    pub fn fulfillment(&self) -> &FulfillmentService<S> {
        &self.inner.fulfillment
    }

    #[must_use]
    pub fn loyalty(&self) -> &LoyaltyService<S> {
        &self.inner.loyalty
    }

    #[must_use]
    pub fn campaigns(&self) -> &CampaignService<S> {
        &self.inner.campaigns
    }

    /// Place an order for the session's user.
    ///
    /// Consumes the session's campaign attribution; on failure the
    /// attribution and the cart are both restored so a retry behaves like
    /// the first attempt.
    ///
    /// # Errors
    ///
    /// Returns [`CommerceError::Validation`] if nobody is signed in, plus
    /// everything [`OrderService::place_order`] can return.
    #[instrument(skip_all)]
    pub async fn place_order(
        &self,
        session: &mut Session,
        input: &CheckoutInput,
    ) -> Result<Order> {
        let user_id = session
            .user
            .as_ref()
            .map(|user| user.id)
            .ok_or_else(|| CommerceError::Validation("no user is signed in".into()))?;
        let campaign_id = session.take_campaign();

        let placed = self
            .inner
            .orders
            .place_order(
                &mut session.cart,
                input,
                user_id,
                campaign_id,
                &self.inner.config.checkout,
            )
            .await;

        match placed {
            Ok(order) => {
                session.persist();
                Ok(order)
            }
            Err(e) => {
                if let Some(campaign_id) = campaign_id {
                    session.attribute_campaign(campaign_id);
                }
                Err(e)
            }
        }
    }

    /// Apply a fulfillment update, then mirror any loyalty award into the
    /// session if it belongs to the signed-in user.
    ///
    /// # Errors
    ///
    /// Everything [`FulfillmentService::update_status`] can return.
    pub async fn update_status(
        &self,
        session: &mut Session,
        order_id: OrderId,
        update: FulfillmentUpdate,
        award_points: bool,
    ) -> Result<Order> {
        let (order, award) = self
            .inner
            .fulfillment
            .update_status(order_id, update, award_points)
            .await?;

        if let Some(outcome) = award
            && session
                .user
                .as_ref()
                .is_some_and(|user| user.id == outcome.customer_id)
        {
            session.set_loyalty_points(outcome.balance);
        }
        Ok(order)
    }

    /// Retry the loyalty award for an order that delivered without one.
    ///
    /// # Errors
    ///
    /// Everything [`LoyaltyService::award_for_order`] can return.
    pub async fn retry_award(&self, order_id: OrderId) -> Result<AwardOutcome> {
        self.inner.loyalty.award_for_order(order_id).await
    }

    /// The ledger balance for a customer.
    ///
    /// # Errors
    ///
    /// Everything [`LoyaltyService::balance`] can return.
    pub async fn loyalty_balance(&self, customer_id: CustomerId) -> Result<u64> {
        self.inner.loyalty.balance(customer_id).await
    }

    /// ROI report for a campaign.
    ///
    /// # Errors
    ///
    /// Everything [`CampaignService::roi`] can return.
    pub async fn campaign_roi(&self, campaign_id: CampaignId) -> Result<CampaignRoi> {
        self.inner.campaigns.roi(campaign_id).await
    }
}
