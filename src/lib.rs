// Deathbat Twin Finder - Core Library
// Exposes all modules for use in the CLI, the API server, and tests

pub mod catalog;
pub mod error;
pub mod matcher;
pub mod owner;
pub mod profile;

// Re-export commonly used types
pub use catalog::{Catalog, Deathbat, MARKETPLACE_ASSET_URL};
pub use error::TwinError;
pub use matcher::{
    find_twin, resolve_twin, similarity, TraitWeights, TwinMatch, TwinOutcome, WEIGHTS,
};
pub use owner::{
    attach_owner, MarketplaceRegistry, OwnerRegistry, MARKETPLACE_OWNER_API, UNKNOWN_OWNER,
};
pub use profile::{RawAttribute, TraitProfile, SIGNATURE_TRAITS};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
