// Deathbat Twin Finder - CLI
// Loads the catalog, resolves the twin for one token id, prints both.

use anyhow::{bail, Context, Result};
use deathbat_twin::{
    attach_owner, resolve_twin, Catalog, Deathbat, MarketplaceRegistry, TwinError, TwinOutcome,
};
use std::env;

const DEFAULT_CATALOG: &str = "deathbats.json";

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: deathbat-twin <token_id> [catalog.json]");
        eprintln!("       catalog defaults to {}", DEFAULT_CATALOG);
        bail!("missing token id");
    }

    let catalog_path = args.get(2).map(String::as_str).unwrap_or(DEFAULT_CATALOG);
    let catalog = Catalog::load(catalog_path)?;
    println!("✓ Loaded {} Deathbats from {}", catalog.len(), catalog_path);

    let range = catalog
        .id_range()
        .context("catalog is empty, nothing to match against")?;

    // Validate before any scan; non-numeric and out-of-range ids are both
    // the caller's fault.
    let invalid = TwinError::InvalidTokenId {
        min: *range.start(),
        max: *range.end(),
    };
    let token_id: u32 = match args[1].parse() {
        Ok(id) if range.contains(&id) => id,
        _ => bail!(invalid),
    };

    let resolved = resolve_twin(&catalog, token_id)?;
    let registry = MarketplaceRegistry::new();

    let mut source = resolved.source.clone();
    attach_owner(&registry, &mut source);
    print_deathbat(&source);

    match resolved.outcome {
        TwinOutcome::Twin { record, score } => {
            let mut twin = record.clone();
            attach_owner(&registry, &mut twin);
            println!("\nClosest twin (score {}):\n", score);
            print_deathbat(&twin);
        }
        TwinOutcome::OneOfOne => {
            println!("\nDeathbat #{} is a one-of-one - it has no twin.", token_id);
        }
    }

    Ok(())
}

/// Pretty-print one record: id, raw traits, owner, marketplace link.
fn print_deathbat(deathbat: &Deathbat) {
    println!("Deathbat #{}", deathbat.id);
    println!("{}", deathbat.attribute_summary());
    if let Some(owner) = &deathbat.owner {
        println!("Owner: {}", owner);
    }
    println!("OpenSea.io link: {}", deathbat.hyperlink);
}
