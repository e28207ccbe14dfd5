// Owner enrichment - who currently holds a Deathbat, per the marketplace API
//
// Strictly a post-match decoration: it runs outside the scoring path and any
// failure (network, bad status, bad body) degrades to the "unknown" owner
// instead of propagating. The core match result never depends on it.

use crate::catalog::Deathbat;
use std::time::Duration;

/// Placeholder when the registry cannot resolve an owner.
pub const UNKNOWN_OWNER: &str = "unknown";

/// Marketplace asset API base; the record id is appended.
pub const MARKETPLACE_OWNER_API: &str =
    "https://api.opensea.io/api/v1/asset/0x1D3aDa5856B14D9dF178EA5Cab137d436dC55F1D/";

// ============================================================================
// OWNER REGISTRY
// ============================================================================

/// External lookup from record id to current owner. `None` means the owner
/// could not be resolved; callers substitute `UNKNOWN_OWNER`.
pub trait OwnerRegistry {
    fn resolve_owner(&self, id: u32) -> Option<String>;
}

/// Attach the resolved owner (or the unknown placeholder) to a record.
pub fn attach_owner(registry: &dyn OwnerRegistry, record: &mut Deathbat) {
    record.owner = Some(
        registry
            .resolve_owner(record.id)
            .unwrap_or_else(|| UNKNOWN_OWNER.to_string()),
    );
}

// ============================================================================
// MARKETPLACE REGISTRY (HTTP)
// ============================================================================

/// Blocking HTTP client against the marketplace asset API.
pub struct MarketplaceRegistry {
    http: reqwest::blocking::Client,
    asset_base: String,
}

impl MarketplaceRegistry {
    pub fn new() -> Self {
        Self::with_base(MARKETPLACE_OWNER_API)
    }

    /// Point at a different API base (test servers).
    pub fn with_base(asset_base: impl Into<String>) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("deathbat-twin/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(5))
            .build()
            .expect("failed to create HTTP client");

        MarketplaceRegistry {
            http,
            asset_base: asset_base.into(),
        }
    }
}

impl Default for MarketplaceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OwnerRegistry for MarketplaceRegistry {
    fn resolve_owner(&self, id: u32) -> Option<String> {
        let url = format!("{}{}", self.asset_base, id);

        let response = match self.http.get(&url).send() {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("owner lookup for #{}: {}", id, err);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!("owner lookup for #{}: HTTP {}", id, response.status());
            return None;
        }

        let body: serde_json::Value = match response.json() {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!("owner lookup for #{}: bad body: {}", id, err);
                return None;
            }
        };

        // Prefer the marketplace username, fall back to the wallet address.
        body.pointer("/owner/user/username")
            .and_then(serde_json::Value::as_str)
            .filter(|name| !name.is_empty() && *name != "null")
            .or_else(|| {
                body.pointer("/owner/address")
                    .and_then(serde_json::Value::as_str)
                    .filter(|addr| !addr.is_empty())
            })
            .map(str::to_string)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::TraitProfile;

    struct FixedRegistry(Option<String>);

    impl OwnerRegistry for FixedRegistry {
        fn resolve_owner(&self, _id: u32) -> Option<String> {
            self.0.clone()
        }
    }

    fn bare_bat(id: u32) -> Deathbat {
        Deathbat {
            id,
            name: format!("Deathbat #{}", id),
            description: serde_json::Value::Null,
            minted: true,
            image: String::new(),
            attributes: Vec::new(),
            traits: TraitProfile::default(),
            hyperlink: String::new(),
            owner: None,
        }
    }

    #[test]
    fn test_attach_resolved_owner() {
        let registry = FixedRegistry(Some("foREVer".to_string()));
        let mut bat = bare_bat(7);

        attach_owner(&registry, &mut bat);
        assert_eq!(bat.owner.as_deref(), Some("foREVer"));
    }

    #[test]
    fn test_failed_lookup_degrades_to_unknown() {
        let registry = FixedRegistry(None);
        let mut bat = bare_bat(7);

        attach_owner(&registry, &mut bat);
        assert_eq!(bat.owner.as_deref(), Some(UNKNOWN_OWNER));
    }
}
