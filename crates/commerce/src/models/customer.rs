//! Customer accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tech_haven_core::{CustomerId, CustomerRole, Email};

use crate::store::Resource;

/// A customer account.
///
/// `loyalty_points` is the authoritative ledger balance. The session keeps a
/// display copy, but awards always read-modify-write this record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub role: CustomerRole,
    #[serde(default)]
    pub loyalty_points: u64,
    pub created_at: DateTime<Utc>,
}

impl Resource for Customer {
    const COLLECTION: &'static str = "customers";

    fn resource_id(&self) -> String {
        self.id.to_string()
    }
}
