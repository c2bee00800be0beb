//! The signed-in session.
//!
//! Holds the current user, their cart, a display copy of their loyalty
//! balance, and any campaign attribution picked up from a landing link. An
//! optional JSON file mirror survives restarts; mirroring is best-effort and
//! never fails a commerce operation, and the mirrored balance is display
//! state only. The customer record is the ledger of truth.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tech_haven_core::{CampaignId, CustomerId, CustomerRole, Email};
use tracing::{debug, warn};

use crate::cart::Cart;

/// The signed-in user, as the session carries them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: CustomerId,
    pub name: String,
    pub email: Email,
    pub role: CustomerRole,
}

/// On-disk shape of the mirror file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionSnapshot {
    current_user: Option<CurrentUser>,
    cart: Cart,
    loyalty_points: u64,
}

/// Best-effort JSON file mirror for session state.
#[derive(Debug, Clone)]
pub struct SessionCache {
    path: PathBuf,
}

impl SessionCache {
    /// Create a mirror at the given path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load(&self) -> Option<SessionSnapshot> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read session mirror");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "session mirror is corrupt, ignoring");
                None
            }
        }
    }

    fn save(&self, snapshot: &SessionSnapshot) {
        let rendered = match serde_json::to_vec_pretty(snapshot) {
            Ok(rendered) => rendered,
            Err(e) => {
                warn!(error = %e, "could not serialize session mirror");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, rendered) {
            warn!(path = %self.path.display(), error = %e, "could not write session mirror");
        }
    }

    fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %self.path.display(), error = %e, "could not remove session mirror");
        }
    }
}

/// A storefront session.
#[derive(Debug, Default)]
pub struct Session {
    /// The signed-in user, if any.
    pub user: Option<CurrentUser>,
    /// The user's cart. Mutate through [`Cart`]'s methods, then call
    /// [`Session::persist`] if a mirror is wanted.
    pub cart: Cart,
    loyalty_points: u64,
    active_campaign: Option<CampaignId>,
    cache: Option<SessionCache>,
}

impl Session {
    /// A fresh session with no mirror.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A session backed by a file mirror, restored from it when present.
    #[must_use]
    pub fn with_cache(cache: SessionCache) -> Self {
        let snapshot = cache.load().unwrap_or_default();
        if snapshot.current_user.is_some() {
            debug!("session restored from mirror");
        }
        Self {
            user: snapshot.current_user,
            cart: snapshot.cart,
            loyalty_points: snapshot.loyalty_points,
            active_campaign: None,
            cache: Some(cache),
        }
    }

    /// Sign a user in, seeding the display balance from the ledger.
    pub fn login(&mut self, user: CurrentUser, loyalty_points: u64) {
        self.user = Some(user);
        self.loyalty_points = loyalty_points;
        self.persist();
    }

    /// Sign out, dropping cart, balance, attribution, and the mirror file.
    pub fn logout(&mut self) {
        self.user = None;
        self.cart.clear();
        self.loyalty_points = 0;
        self.active_campaign = None;
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    /// Display copy of the loyalty balance.
    #[must_use]
    pub const fn loyalty_points(&self) -> u64 {
        self.loyalty_points
    }

    pub(crate) fn set_loyalty_points(&mut self, points: u64) {
        self.loyalty_points = points;
        self.persist();
    }

    /// Record that this session arrived through a campaign link.
    ///
    /// Overwrites any earlier attribution; the next placed order carries it.
    pub fn attribute_campaign(&mut self, campaign_id: CampaignId) {
        self.active_campaign = Some(campaign_id);
    }

    /// The campaign the next order would be attributed to.
    #[must_use]
    pub const fn active_campaign(&self) -> Option<CampaignId> {
        self.active_campaign
    }

    /// Consume the attribution (at-most-once per order).
    pub(crate) fn take_campaign(&mut self) -> Option<CampaignId> {
        self.active_campaign.take()
    }

    /// Write current state to the mirror, if one is attached.
    pub fn persist(&self) {
        if let Some(cache) = &self.cache {
            cache.save(&SessionSnapshot {
                current_user: self.user.clone(),
                cart: self.cart.clone(),
                loyalty_points: self.loyalty_points,
            });
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn user() -> CurrentUser {
        CurrentUser {
            id: CustomerId::new(4),
            name: "Asha".into(),
            email: "asha@example.com".parse().unwrap(),
            role: CustomerRole::Customer,
        }
    }

    fn temp_mirror(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("techhaven-session-{name}-{}.json", std::process::id()))
    }

    #[test]
    fn test_attribution_is_taken_once() {
        let mut session = Session::new();
        let id = CampaignId::generate();
        session.attribute_campaign(id);
        assert_eq!(session.take_campaign(), Some(id));
        assert_eq!(session.take_campaign(), None);
    }

    #[test]
    fn test_mirror_roundtrip_and_logout() {
        let path = temp_mirror("roundtrip");
        let cache = SessionCache::new(path.clone());

        let mut session = Session::with_cache(cache.clone());
        session.login(user(), 42);

        let restored = Session::with_cache(cache.clone());
        assert_eq!(restored.user, Some(user()));
        assert_eq!(restored.loyalty_points(), 42);

        let mut session = restored;
        session.logout();
        assert!(!path.exists());

        let empty = Session::with_cache(cache);
        assert!(empty.user.is_none());
    }

    #[test]
    fn test_corrupt_mirror_is_ignored() {
        let path = temp_mirror("corrupt");
        std::fs::write(&path, "{not json").unwrap();

        let session = Session::with_cache(SessionCache::new(path.clone()));
        assert!(session.user.is_none());
        assert_eq!(session.loyalty_points(), 0);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_attribution_is_not_mirrored() {
        let path = temp_mirror("attribution");
        let cache = SessionCache::new(path.clone());

        let mut session = Session::with_cache(cache.clone());
        session.attribute_campaign(CampaignId::generate());
        session.login(user(), 0);

        let restored = Session::with_cache(cache);
        assert_eq!(restored.active_campaign(), None);

        std::fs::remove_file(path).ok();
    }
}
