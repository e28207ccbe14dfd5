// Trait Profile - normalized, fixed-shape view of a record's attributes
//
// Raw attributes arrive as an ordered list of (trait_type, value) pairs.
// Extraction maps each pair into its single corresponding slot; anything
// outside the recognized closed set fails the whole profile.

use crate::error::TwinError;
use serde::{Deserialize, Serialize};

// ============================================================================
// RAW ATTRIBUTES
// ============================================================================

/// One raw (category, value) pair as it appears in the catalog source data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAttribute {
    pub trait_type: String,
    pub value: String,
}

impl RawAttribute {
    pub fn new(trait_type: impl Into<String>, value: impl Into<String>) -> Self {
        RawAttribute {
            trait_type: trait_type.into(),
            value: value.into(),
        }
    }
}

// ============================================================================
// SIGNATURE TRAITS (one-of-one markers)
// ============================================================================

/// Closed set of band-member signature categories. A record carrying any of
/// these is a one-of-one: it has no twin by definition.
pub const SIGNATURE_TRAITS: &[&str] = &[
    "Brooks Wackerman",
    "Johnny Christ",
    "M. Shadows",
    "Synyster Gates",
    "Zacky Vengeance",
];

// ============================================================================
// TRAIT PROFILE
// ============================================================================

/// Fixed-shape trait slots derived from a record's raw attributes.
///
/// An empty string means the record does not carry that trait. Built once per
/// record at catalog load and never mutated afterwards. `perk` is kept for
/// display but never scored; `signature` marks a one-of-one record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitProfile {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub background: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub eyes: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub facial_hair: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub head: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mask: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mouth: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub nose: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub skin: String,

    /// Retained for display only; the matcher ignores it.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub perk: String,

    /// Which signature category this record carries, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl TraitProfile {
    /// Map raw attributes into trait slots.
    ///
    /// Fails with `UnknownTraitType` on any category outside the recognized
    /// set - no partial profile is ever produced. If a category repeats, the
    /// later occurrence wins (quirk of the reference catalog data, kept
    /// as-is; see DESIGN.md).
    pub fn extract(attributes: &[RawAttribute]) -> Result<TraitProfile, TwinError> {
        let mut profile = TraitProfile::default();

        for attr in attributes {
            match attr.trait_type.as_str() {
                "Background" => profile.background = attr.value.clone(),
                "Eyes" => profile.eyes = attr.value.clone(),
                "Facial Hair" => profile.facial_hair = attr.value.clone(),
                "Head" => profile.head = attr.value.clone(),
                "Mask" => profile.mask = attr.value.clone(),
                "Mouth" => profile.mouth = attr.value.clone(),
                "Nose" => profile.nose = attr.value.clone(),
                "Skin" => profile.skin = attr.value.clone(),
                "Perk" => profile.perk = attr.value.clone(),
                member if SIGNATURE_TRAITS.contains(&member) => {
                    profile.signature = Some(member.to_string());
                }
                unknown => {
                    return Err(TwinError::UnknownTraitType(unknown.to_string()));
                }
            }
        }

        Ok(profile)
    }

    /// One-of-one records carry a signature trait and have no twin.
    pub fn is_one_of_one(&self) -> bool {
        self.signature.is_some()
    }
}

// ============================================================================
// TESTS
// ============================================================================
