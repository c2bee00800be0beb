//! Marketing campaigns.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tech_haven_core::{CampaignId, CampaignStatus};

use crate::store::Resource;

/// A marketing campaign.
///
/// Dates are calendar dates in the store's timezone; a campaign is live
/// through the whole of `end_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: CampaignId,
    pub name: String,
    pub target_audience: String,
    pub budget: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub status: CampaignStatus,
}

impl Resource for Campaign {
    const COLLECTION: &'static str = "campaigns";

    fn resource_id(&self) -> String {
        self.id.to_string()
    }
}

/// Fields an admin supplies when launching a campaign.
#[derive(Debug, Clone)]
pub struct CampaignInput {
    pub name: String,
    pub target_audience: String,
    pub budget: Decimal,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Return-on-investment report for one campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRoi {
    /// Sum of totals of delivered orders attributed to the campaign.
    pub revenue: Decimal,
    /// `revenue - budget`; negative when the campaign lost money.
    pub roi: Decimal,
    /// How many delivered orders contributed.
    pub order_count: usize,
}
