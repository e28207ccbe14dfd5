// Similarity Matcher - find the catalog record most alike a source record
//
// Weighted exact-equality scoring over the comparable trait slots, best match
// tracked in a single pass over the catalog in its fixed load order. One-of-one
// records short-circuit to a distinguished no-twin outcome before any scan.

use crate::catalog::{Catalog, Deathbat};
use crate::error::TwinError;
use crate::profile::TraitProfile;
use serde::Serialize;

// ============================================================================
// TRAIT WEIGHTS
// ============================================================================

/// Per-slot weights: which matching traits matter more. Stable for the
/// lifetime of a matching session; `perk` and the signature slot never score.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TraitWeights {
    pub mask: u32,
    pub facial_hair: u32,
    pub eyes: u32,
    pub mouth: u32,
    pub nose: u32,
    pub head: u32,
    pub skin: u32,
    pub background: u32,
}

pub const WEIGHTS: TraitWeights = TraitWeights {
    mask: 6,
    facial_hair: 5,
    eyes: 4,
    mouth: 4,
    nose: 4,
    head: 3,
    skin: 2,
    background: 1,
};

/// The comparable slots of a profile, paired with their weights.
fn scored_slots(profile: &TraitProfile) -> [(&str, u32); 8] {
    [
        (profile.mask.as_str(), WEIGHTS.mask),
        (profile.facial_hair.as_str(), WEIGHTS.facial_hair),
        (profile.eyes.as_str(), WEIGHTS.eyes),
        (profile.mouth.as_str(), WEIGHTS.mouth),
        (profile.nose.as_str(), WEIGHTS.nose),
        (profile.head.as_str(), WEIGHTS.head),
        (profile.skin.as_str(), WEIGHTS.skin),
        (profile.background.as_str(), WEIGHTS.background),
    ]
}

/// Weighted similarity between two profiles: a slot contributes its weight
/// when and only when both values are nonempty and exactly equal
/// (case-sensitive; no partial credit). Symmetric by construction.
pub fn similarity(a: &TraitProfile, b: &TraitProfile) -> u32 {
    scored_slots(a)
        .iter()
        .zip(scored_slots(b).iter())
        .map(|((value_a, weight), (value_b, _))| {
            if !value_a.is_empty() && value_a == value_b {
                *weight
            } else {
                0
            }
        })
        .sum()
}

// ============================================================================
// TWIN SELECTION
// ============================================================================

/// Result of a twin search. `OneOfOne` is a defined outcome for signature
/// records, not an error, and is distinct from a failed lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum TwinOutcome<'a> {
    /// The most similar other record, with its score.
    Twin { record: &'a Deathbat, score: u32 },

    /// The source carries a signature trait; no twin exists.
    OneOfOne,
}

/// A resolved query: the source record plus its twin outcome.
#[derive(Debug, Clone)]
pub struct TwinMatch<'a> {
    pub source: &'a Deathbat,
    pub outcome: TwinOutcome<'a>,
}

/// Find the record most alike `source` in catalog order.
///
/// The running best starts at (source, score 0). A candidate replaces it on a
/// strictly greater score, or on an equal score when its id is strictly
/// closer to the source's; equal score at equal distance keeps the earlier
/// candidate. The scan is read-only, bounded, and deterministic over the
/// catalog's fixed order, so repeated calls always agree.
pub fn find_twin<'a>(source: &'a Deathbat, catalog: &'a Catalog) -> TwinOutcome<'a> {
    if source.traits.is_one_of_one() {
        return TwinOutcome::OneOfOne;
    }

    let mut best = source;
    let mut best_score = 0u32;

    for candidate in catalog.records() {
        // can't be its own twin
        if candidate.id == source.id {
            continue;
        }

        let score = similarity(&source.traits, &candidate.traits);

        if score > best_score {
            best = candidate;
            best_score = score;
        } else if score == best_score
            && source.id.abs_diff(candidate.id) < source.id.abs_diff(best.id)
        {
            best = candidate;
        }
    }

    TwinOutcome::Twin {
        record: best,
        score: best_score,
    }
}

/// Query boundary: look up `id` and run the twin search against the whole
/// catalog. The transport is expected to have range-checked `id` already;
/// a well-formed id that is simply absent comes back as `NotFound`.
pub fn resolve_twin(catalog: &Catalog, id: u32) -> Result<TwinMatch<'_>, TwinError> {
    let source = catalog.lookup(id)?;
    Ok(TwinMatch {
        source,
        outcome: find_twin(source, catalog),
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::RawAttribute;

    fn bat(id: u32, pairs: &[(&str, &str)]) -> Deathbat {
        Deathbat {
            id,
            name: format!("Deathbat #{}", id),
            description: serde_json::Value::Null,
            minted: true,
            image: String::new(),
            attributes: pairs
                .iter()
                .map(|(t, v)| RawAttribute::new(*t, *v))
                .collect(),
            traits: TraitProfile::default(),
            hyperlink: String::new(),
            owner: None,
        }
    }

    fn catalog(records: Vec<Deathbat>) -> Catalog {
        Catalog::from_records(records).expect("test records use recognized traits")
    }

    fn twin_id(catalog: &Catalog, id: u32) -> u32 {
        match resolve_twin(catalog, id).unwrap().outcome {
            TwinOutcome::Twin { record, .. } => record.id,
            TwinOutcome::OneOfOne => panic!("expected a twin for #{}", id),
        }
    }

    #[test]
    fn test_heavier_trait_beats_lighter_trait() {
        // Mask (6) on id 2 outweighs Eyes (4) on id 3.
        let cat = catalog(vec![
            bat(1, &[("Mask", "Red"), ("Eyes", "Blue")]),
            bat(2, &[("Mask", "Red"), ("Eyes", "Green")]),
            bat(3, &[("Mask", "Blue"), ("Eyes", "Blue")]),
        ]);

        match resolve_twin(&cat, 1).unwrap().outcome {
            TwinOutcome::Twin { record, score } => {
                assert_eq!(record.id, 2);
                assert_eq!(score, WEIGHTS.mask);
            }
            TwinOutcome::OneOfOne => panic!("id 1 is not a one-of-one"),
        }
    }

    #[test]
    fn test_equal_score_prefers_closer_id() {
        // All three share the mask; id 2 is closer to id 1 than id 3 is.
        let cat = catalog(vec![
            bat(1, &[("Mask", "Red")]),
            bat(2, &[("Mask", "Red")]),
            bat(3, &[("Mask", "Red")]),
        ]);

        assert_eq!(twin_id(&cat, 1), 2);
    }

    #[test]
    fn test_equal_score_equal_distance_keeps_earlier_in_catalog_order() {
        // Ids 1 and 5 are both distance 2 from id 3 with identical scores;
        // id 5 is loaded first, so it wins and keeps winning.
        let cat = catalog(vec![
            bat(5, &[("Mask", "Red")]),
            bat(1, &[("Mask", "Red")]),
            bat(3, &[("Mask", "Red")]),
        ]);

        assert_eq!(twin_id(&cat, 3), 5);
    }

    #[test]
    fn test_one_of_one_has_no_twin() {
        let cat = catalog(vec![
            bat(1, &[("Mask", "Red")]),
            bat(2, &[("Mask", "Red")]),
            bat(5, &[("Mask", "Red"), ("M. Shadows", "Signature")]),
        ]);

        let resolved = resolve_twin(&cat, 5).unwrap();
        assert_eq!(resolved.outcome, TwinOutcome::OneOfOne);
    }

    #[test]
    fn test_one_of_one_can_still_be_someone_elses_twin() {
        // The signature record is skipped as a source but stays a candidate.
        let cat = catalog(vec![
            bat(1, &[("Mask", "Red")]),
            bat(2, &[("Mask", "Red"), ("Johnny Christ", "Signature")]),
            bat(9, &[("Eyes", "Blue")]),
        ]);

        assert_eq!(twin_id(&cat, 1), 2);
    }

    #[test]
    fn test_never_returns_source_when_overlap_exists() {
        let cat = catalog(vec![
            bat(1, &[("Background", "Black")]),
            bat(2, &[("Background", "Black")]),
            bat(3, &[("Background", "Black")]),
        ]);

        for id in [1, 2, 3] {
            assert_ne!(twin_id(&cat, id), id);
        }
    }

    #[test]
    fn test_similarity_is_symmetric() {
        let a = TraitProfile::extract(&[
            RawAttribute::new("Mask", "Red"),
            RawAttribute::new("Eyes", "Blue"),
            RawAttribute::new("Skin", "Bone"),
        ])
        .unwrap();
        let b = TraitProfile::extract(&[
            RawAttribute::new("Mask", "Red"),
            RawAttribute::new("Eyes", "Green"),
            RawAttribute::new("Skin", "Bone"),
        ])
        .unwrap();

        assert_eq!(similarity(&a, &b), similarity(&b, &a));
        assert_eq!(similarity(&a, &b), WEIGHTS.mask + WEIGHTS.skin);
    }

    #[test]
    fn test_empty_slots_never_score() {
        // Both profiles leave every slot empty; equality of empty strings
        // must not award any weight.
        let a = TraitProfile::default();
        let b = TraitProfile::default();
        assert_eq!(similarity(&a, &b), 0);
    }

    #[test]
    fn test_case_sensitive_no_partial_credit() {
        let a = TraitProfile::extract(&[RawAttribute::new("Mask", "Red")]).unwrap();
        let b = TraitProfile::extract(&[RawAttribute::new("Mask", "red")]).unwrap();
        assert_eq!(similarity(&a, &b), 0);
    }

    #[test]
    fn test_perk_never_scores() {
        let a = TraitProfile::extract(&[RawAttribute::new("Perk", "Backstage Pass")]).unwrap();
        let b = TraitProfile::extract(&[RawAttribute::new("Perk", "Backstage Pass")]).unwrap();
        assert_eq!(similarity(&a, &b), 0);
    }

    #[test]
    fn test_repeated_queries_agree() {
        let cat = catalog(vec![
            bat(1, &[("Mask", "Red"), ("Head", "Mohawk")]),
            bat(2, &[("Mask", "Red")]),
            bat(3, &[("Head", "Mohawk"), ("Eyes", "Blue")]),
            bat(4, &[("Mask", "Red"), ("Eyes", "Blue")]),
        ]);

        let first = twin_id(&cat, 1);
        for _ in 0..10 {
            assert_eq!(twin_id(&cat, 1), first);
        }
    }

    #[test]
    fn test_resolve_twin_absent_id() {
        let cat = catalog(vec![bat(1, &[("Mask", "Red")])]);
        assert_eq!(
            resolve_twin(&cat, 42).unwrap_err(),
            TwinError::NotFound(42)
        );
    }
}
