// Error taxonomy for catalog lookup and trait extraction.
//
// A one-of-one record having no twin is NOT an error - see
// `matcher::TwinOutcome::OneOfOne`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TwinError {
    /// Token id is non-numeric or outside the loaded catalog's id range.
    /// Caller's fault; reject before any catalog scan, never retry.
    #[error("invalid token id, must be between {min} and {max} inclusive")]
    InvalidTokenId { min: u32, max: u32 },

    /// Well-formed id with no record in the loaded catalog. The catalog is
    /// immutable for the process lifetime, so a retry cannot help.
    #[error("Deathbat #{0} not found")]
    NotFound(u32),

    /// An attribute category outside the recognized closed set. Data
    /// integrity problem in the source catalog; aborts the record's profile
    /// (and the load that triggered it) rather than dropping the attribute.
    #[error("unknown trait type: {0}")]
    UnknownTraitType(String),
}
